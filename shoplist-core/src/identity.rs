//! Item identity.
//!
//! Two item representations refer to the same entry when their names are
//! equal after case-folding. This is the only notion of identity used for
//! lookup, de-duplication and filtering, locally and against the remote.
//! An absent name behaves as the empty string, so it only matches another
//! absent or empty name.

/// Anything that carries an item name.
pub trait Identified {
    /// The name used as the identity key, before case-folding.
    fn identity_name(&self) -> &str;

    /// The case-folded identity key.
    fn identity_key(&self) -> String {
        fold(self.identity_name())
    }
}

impl Identified for str {
    fn identity_name(&self) -> &str {
        self
    }
}

impl Identified for String {
    fn identity_name(&self) -> &str {
        self.as_str()
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn identity_name(&self) -> &str {
        (**self).identity_name()
    }
}

impl<T: Identified> Identified for Option<T> {
    fn identity_name(&self) -> &str {
        self.as_ref().map(Identified::identity_name).unwrap_or("")
    }
}

/// Case-fold a name into its identity key.
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Returns true iff `a` and `b` name the same item.
///
/// Total: never fails, for any pair of inputs.
pub fn matches<A, B>(a: &A, b: &B) -> bool
where
    A: Identified + ?Sized,
    B: Identified + ?Sized,
{
    let (a, b) = (a.identity_name(), b.identity_name());
    a == b || fold(a) == fold(b)
}
