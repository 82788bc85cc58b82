//! medox-watch: dev reload watcher — run a shell command when files change.
//!
//! Deliberately thin: watch a directory, debounce, filter ignored paths,
//! run one configured command per change batch (the classic use is
//! reloading the web server that fronts the medox API during development).

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};
use regex::RegexSet;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watch path does not exist: {0}")]
    MissingPath(PathBuf),
    #[error("invalid ignore pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// What to watch and what to run.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub path: PathBuf,
    /// Shell command executed on each change batch.
    pub command: String,
    /// Regex patterns; a path matching any of them is ignored.
    pub ignore: Vec<String>,
    pub debounce: Duration,
}

impl WatchOptions {
    pub fn new(path: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            command: command.into(),
            ignore: vec!["node_modules".to_string()],
            debounce: Duration::from_secs(1),
        }
    }
}

/// Compiled ignore patterns.
pub struct IgnoreList {
    set: RegexSet,
}

impl IgnoreList {
    pub fn compile(patterns: &[String]) -> Result<Self, WatchError> {
        Ok(Self {
            set: RegexSet::new(patterns)?,
        })
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.set.is_match(&path.to_string_lossy())
    }
}

/// Watch `options.path` and run the reload command on every change batch.
///
/// Blocks the calling thread; run it under `spawn_blocking` from async
/// contexts. Returns when the watch channel closes.
pub fn watch_and_reload(options: WatchOptions) -> Result<(), WatchError> {
    if !options.path.exists() {
        return Err(WatchError::MissingPath(options.path));
    }
    let ignore = IgnoreList::compile(&options.ignore)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(options.debounce, tx)?;
    debouncer
        .watcher()
        .watch(&options.path, notify::RecursiveMode::Recursive)?;

    info!("Watching {} for file changes", options.path.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| e.kind == DebouncedEventKind::Any && !ignore.is_ignored(&e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    info!("File {} has been changed", event.path.display());
                }
                run_reload_command(&options.command);
            }
            Ok(Err(e)) => {
                warn!("Watcher error: {e:?}");
            }
            Err(_) => {
                info!("Watch channel closed, stopping");
                return Ok(());
            }
        }
    }
}

/// Run the reload command through the shell, logging its output. A failing
/// reload is logged, not fatal; the watch keeps going.
fn run_reload_command(command: &str) {
    match Command::new("sh").arg("-c").arg(command).output() {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !output.status.success() {
                warn!("Reload command failed ({}): {}", output.status, stderr.trim());
            } else if !stderr.trim().is_empty() {
                warn!("Reload stderr: {}", stderr.trim());
            } else {
                info!("Reload done: {}", stdout.trim());
            }
        }
        Err(e) => {
            warn!("Failed to run reload command: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_list_default_pattern() {
        let ignore = IgnoreList::compile(&["node_modules".to_string()]).unwrap();
        assert!(ignore.is_ignored(Path::new("web/node_modules/pkg/index.js")));
        assert!(!ignore.is_ignored(Path::new("web/js/script.js")));
    }

    #[test]
    fn test_ignore_list_multiple_patterns() {
        let patterns = vec![r"\.git".to_string(), r"target/".to_string()];
        let ignore = IgnoreList::compile(&patterns).unwrap();
        assert!(ignore.is_ignored(Path::new("repo/.git/HEAD")));
        assert!(ignore.is_ignored(Path::new("target/debug/build")));
        assert!(!ignore.is_ignored(Path::new("src/lib.rs")));
    }

    #[test]
    fn test_ignore_list_rejects_bad_pattern() {
        assert!(matches!(
            IgnoreList::compile(&["[".to_string()]),
            Err(WatchError::Pattern(_))
        ));
    }

    #[test]
    fn test_missing_watch_path() {
        let options = WatchOptions::new("/nope/missing-dir", "true");
        assert!(matches!(
            watch_and_reload(options),
            Err(WatchError::MissingPath(_))
        ));
    }
}
