use std::fs;
use std::path::Path;

use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Environment variable holding a `target=level,...` filter.
pub const LOG_ENV: &str = "PSALMS_LOG";

/// Install a file-only subscriber. The terminal belongs to the TUI, so there
/// is no console layer. Returns `None` (logging disabled) when the log
/// directory is unusable; the returned guard must outlive the app.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    if fs::create_dir_all(log_dir).is_err() {
        return None;
    }

    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix("psalms-reader")
        .filename_suffix("log")
        .max_log_files(10)
        .build(log_dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_writer(writer)
        .with_filter(filter_from_env(std::env::var(LOG_ENV).ok().as_deref()));

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .ok()?;

    Some(guard)
}

/// Parse the user's filter, falling back to `psalms_reader=info`.
fn filter_from_env(raw: Option<&str>) -> Targets {
    raw.and_then(|raw| raw.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_target("psalms_reader", LevelFilter::INFO))
}

/// Route panics into the log file, then hand the terminal back before the
/// default hook prints; the alternate screen would swallow its message.
pub fn panic_hook() {
    install_panic_hook(crate::ui::restore_terminal);
}

fn install_panic_hook(restore: fn()) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("main");
        error!(target: "psalms_reader::panic", "thread {thread}: {info}");
        restore();
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use tracing::Level;

    #[test]
    fn default_filter_is_crate_info() {
        let targets = filter_from_env(None);
        assert!(targets.would_enable("psalms_reader::db", &Level::INFO));
        assert!(!targets.would_enable("psalms_reader::db", &Level::DEBUG));
        assert!(!targets.would_enable("rusqlite", &Level::INFO));
    }

    #[test]
    fn env_filter_overrides_default() {
        let targets = filter_from_env(Some("psalms_reader=debug"));
        assert!(targets.would_enable("psalms_reader::query", &Level::DEBUG));
    }

    static RESTORED: AtomicBool = AtomicBool::new(false);

    fn mark_restored() {
        RESTORED.store(true, Ordering::SeqCst);
    }

    #[test]
    fn panic_hook_restores_terminal() {
        install_panic_hook(mark_restored);
        let outcome = std::panic::catch_unwind(|| panic!("boom"));
        let _ = std::panic::take_hook();

        assert!(outcome.is_err());
        assert!(RESTORED.load(Ordering::SeqCst));
    }

    #[test]
    fn garbage_filter_falls_back() {
        let targets = filter_from_env(Some("psalms_reader=loud"));
        assert!(targets.would_enable("psalms_reader", &Level::INFO));
    }
}
