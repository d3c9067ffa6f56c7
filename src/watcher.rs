//! Debounced change detection for the live preview.
//!
//! Editors often save by writing a temp file and renaming it over the
//! original, so the parent directory is watched and events are matched back
//! to the description file by path or file name.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Quiet period after the last event before a change is reported.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches one description file.
pub struct DescriptionWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    dir: PathBuf,
    file: PathBuf,
    file_name: Option<OsString>,
    debounce: Duration,
    last_event: Option<Instant>,
}

impl DescriptionWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the OS watcher cannot be created or the
    /// directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Event paths from the OS are canonical.
        let file = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let file_name = file.file_name().map(std::ffi::OsStr::to_os_string);
        let dir = parent_dir(&file);

        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(file = %file.display(), "watching description");

        Ok(Self {
            _watcher: watcher,
            events,
            dir,
            file,
            file_name,
            debounce,
            last_event: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Drain pending events; true once a change has settled.
    pub fn poll_changed(&mut self) -> bool {
        let mut relevant = 0u32;
        while let Ok(event) = self.events.try_recv() {
            match event {
                Ok(ev) if self.concerns_file(&ev) => relevant += 1,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "file watcher error");
                    crate::perf::log_event("watcher.error", err.to_string());
                }
            }
        }

        if relevant > 0 {
            crate::perf::log_event("watcher.events", format!("relevant={relevant}"));
            self.last_event = Some(Instant::now());
        }

        match self.last_event {
            Some(at) if at.elapsed() >= self.debounce => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    /// Block until the file changes, polling every `interval`.
    pub fn wait_for_change(&mut self, interval: Duration) {
        while !self.poll_changed() {
            std::thread::sleep(interval);
        }
    }

    fn concerns_file(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.dir
                || path == &self.file
                || self
                    .file_name
                    .as_ref()
                    .is_some_and(|name| path.file_name() == Some(name.as_os_str()))
        })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use tempfile::tempdir;

    fn event(paths: Vec<PathBuf>) -> Event {
        Event {
            kind: EventKind::Any,
            paths,
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_parent_dir_of_bare_file_is_dot() {
        assert_eq!(parent_dir(Path::new("description.md")), PathBuf::from("."));
    }

    #[test]
    fn test_directory_event_concerns_file() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("day-01.md");
        std::fs::write(&path, "# Day 1").expect("write");
        let watcher = DescriptionWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        assert!(watcher.concerns_file(&event(vec![canonical_dir])));
    }

    #[test]
    fn test_rename_target_with_same_name_concerns_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("day-02.md");
        std::fs::write(&path, "x").expect("write");
        let watcher = DescriptionWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        assert!(watcher.concerns_file(&event(vec![PathBuf::from("/elsewhere/day-02.md")])));
        assert!(!watcher.concerns_file(&event(vec![PathBuf::from("/elsewhere/other.md")])));
    }

    #[test]
    fn test_no_events_means_no_change() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("day-03.md");
        std::fs::write(&path, "x").expect("write");
        let mut watcher =
            DescriptionWatcher::new(&path, Duration::from_millis(10)).expect("watcher");

        assert!(!watcher.poll_changed());
    }
}
