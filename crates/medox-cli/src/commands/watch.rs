//! `medox watch` — run a reload command whenever watched files change.

use medox_watch::WatchOptions;

use crate::context;

pub async fn run(path: Option<String>, command: Option<String>) -> anyhow::Result<()> {
    let config = context::load_config()?;
    let settings = config.watch;

    let mut options = WatchOptions::new(
        path.unwrap_or(settings.path),
        command.unwrap_or(settings.command),
    );
    options.ignore = settings.ignore;

    // The watcher blocks on a sync channel; keep it off the async runtime.
    tokio::task::spawn_blocking(move || medox_watch::watch_and_reload(options)).await??;
    Ok(())
}
