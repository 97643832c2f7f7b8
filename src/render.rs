//! Terminal rendering of the item list.

use clap::ValueEnum;
use shoplist_core::Item;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render a snapshot as a table with a grand total.
pub fn format_items(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items on the list".to_string();
    }

    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "{:<24} {:>4} x {:>8}  {:>10.2}\n",
            item.name,
            item.quantity,
            item.price.to_string(),
            item.line_total()
        ));
    }
    let total: f64 = items.iter().map(Item::line_total).sum();
    out.push_str(&format!("\nTotal: {:.2} ({} item(s))", total, items.len()));
    out
}

pub fn print_items(
    items: &[Item],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Text => println!("{}", format_items(items)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_items(&[]), "No items on the list");
    }

    #[test]
    fn test_format_items_with_total() {
        let items = vec![Item::new("Milk", 2, 3.5), Item::new("Bread", 1, 5.0)];
        let out = format_items(&items);

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Milk"));
        assert!(lines[0].ends_with("7.00"));
        assert!(lines[1].contains("5.00"));
        assert_eq!(lines.last().unwrap(), &"Total: 12.00 (2 item(s))");
    }
}
