mod config_cmd;
mod item;
mod shell;

pub use config_cmd::ConfigCommand;
pub use item::ItemCommand;
pub use shell::ShellCommand;

use shoplist_core::{ChannelNotifier, HttpRemote, Notification, Reconciler};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::Config;

/// The engine as the CLI runs it: HTTP remote, notifications over a channel.
pub type Engine = Reconciler<HttpRemote, ChannelNotifier>;

/// Build an engine for the configured server.
pub fn connect(
    config: &Config,
) -> Result<(Engine, UnboundedReceiver<Notification>), Box<dyn std::error::Error>> {
    let url = config.server_url.value.clone();
    let remote = match config.timeout() {
        Some(timeout) => HttpRemote::with_timeout(url, timeout)?,
        None => HttpRemote::new(url),
    };
    let (notifier, rx) = ChannelNotifier::channel();
    Ok((Reconciler::new(remote, notifier), rx))
}

/// Print pending notifications, if enabled.
pub fn flush_notifications(rx: &mut UnboundedReceiver<Notification>, config: &Config) {
    while let Ok(notification) = rx.try_recv() {
        if config.notifications.value {
            println!("{}", notification);
        }
    }
}
