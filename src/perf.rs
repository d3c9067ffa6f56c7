//! Opt-in timing and a debug event log.
//!
//! Timing scopes print to stderr when `--perf` is on. The event log records
//! render and edit events with a timestamp relative to when it was opened.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: Mutex<Option<EventLog>> = Mutex::new(None);

/// Times the enclosing block; reports on drop.
#[derive(Debug)]
#[must_use = "the scope reports when dropped"]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("[perf] {}: {:.2} ms", self.name, elapsed_ms);
    }
}

#[derive(Debug)]
struct EventLog {
    opened: Instant,
    writer: BufWriter<File>,
}

fn event_log() -> MutexGuard<'static, Option<EventLog>> {
    EVENT_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Open (or with `None`, close) the event log.
///
/// # Errors
/// Fails when the log file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = event_log();
    let Some(path) = path else {
        *log = None;
        return Ok(());
    };
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "folio debug log start")?;
    writer.flush()?;
    *log = Some(EventLog {
        opened: Instant::now(),
        writer,
    });
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    event_log().is_some()
}

/// Append one event to the log, if it is open.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = event_log();
    let Some(log) = log.as_mut() else {
        return;
    };
    let elapsed_ms = log.opened.elapsed().as_secs_f64() * 1000.0;
    let _ = writeln!(
        log.writer,
        "[{elapsed_ms:>10.3} ms] {name}: {}",
        detail.as_ref()
    );
    let _ = log.writer.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_debug_log_path_enables_logging_and_writes() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        assert!(is_debug_log_enabled());
        log_event("render.blocks", "count=3");
        set_debug_log_path(None).unwrap();
        assert!(!is_debug_log_enabled());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("folio debug log start"));
        assert!(content.contains("render.blocks: count=3"));
    }

    #[test]
    fn test_log_event_without_log_is_noop() {
        log_event("ignored", "nothing open");
    }
}
