//! File watching for `--watch`.
//!
//! Uses the notify crate for cross-platform file system events.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::timer::DelayedAction;

/// Quiet period after the last file event before a reload.
pub const WATCH_DEBOUNCE_MS: u64 = 200;

/// Watches a single file and emits debounced change notifications.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    pending: DelayedAction,
}

impl FileWatcher {
    /// Create a watcher for `path`.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or the path cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce_ms: u64) -> notify::Result<Self> {
        // Event paths from the OS are canonical.
        let target_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = watch_root_for(&target_path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        // Editors often replace the file on save, so watch its directory.
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
        tracing::debug!(
            target = %target_path.display(),
            root = %watch_root.display(),
            "file watcher started"
        );

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            pending: DelayedAction::new(debounce_ms),
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Returns true once a debounced file change is ready at `now_ms`.
    pub fn take_change_ready(&mut self, now_ms: u64) -> bool {
        let mut relevant = 0u32;
        let mut irrelevant = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => relevant += 1,
                Ok(ev) => {
                    irrelevant += 1;
                    tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "ignored file event");
                }
                Err(err) => tracing::warn!(%err, "file watcher error"),
            }
        }

        if relevant + irrelevant > 0 {
            tracing::debug!(relevant, irrelevant, "file events polled");
        }
        if relevant > 0 {
            self.pending.arm(now_ms);
        }
        self.pending.take_ready(now_ms)
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("target_path", &self.target_path)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn event_at(path: PathBuf) -> Event {
        Event {
            kind: EventKind::Any,
            paths: vec![path],
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_directory_level_event_is_relevant_for_watched_file() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("newsletter.mjml");
        std::fs::write(&path, "<mjml></mjml>").expect("write");
        let watcher = FileWatcher::new(&path, 10).expect("watcher");

        assert!(watcher.is_relevant(&event_at(canonical_dir)));
    }

    #[test]
    fn test_sibling_file_event_is_irrelevant() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("newsletter.mjml");
        std::fs::write(&path, "<mjml></mjml>").expect("write");
        let watcher = FileWatcher::new(&path, 10).expect("watcher");

        assert!(!watcher.is_relevant(&event_at(canonical_dir.join("newsletter.html"))));
    }

    #[test]
    fn test_watch_root_for_relative_file_is_dot() {
        assert_eq!(watch_root_for(Path::new("draft.mjml")), PathBuf::from("."));
    }

    #[test]
    fn test_no_events_never_ready() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("draft.mjml");
        std::fs::write(&path, "x").expect("write");
        let mut watcher = FileWatcher::new(&path, 10).expect("watcher");
        assert!(!watcher.take_change_ready(0));
        assert!(!watcher.take_change_ready(10_000));
    }

    #[test]
    fn test_real_file_modification_detected() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("watched.mjml");
        std::fs::write(&path, "<mjml></mjml>").expect("write");

        let mut watcher = FileWatcher::new(&path, WATCH_DEBOUNCE_MS).expect("watcher");
        std::thread::sleep(Duration::from_millis(500));
        std::fs::write(&path, "<mjml><mj-body></mj-body></mjml>").expect("write");

        let start = Instant::now();
        let deadline = start + Duration::from_secs(5);
        let mut detected = false;
        while Instant::now() < deadline {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if watcher.take_change_ready(now_ms) {
                detected = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        assert!(detected, "watcher should report the modification within 5 seconds");
    }
}
