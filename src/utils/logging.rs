use anyhow::{Context, Result};
use dialoguer::console::style;
use std::fs;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::{warn, Level};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Target for lines meant for the user rather than the log.
pub const PLAIN: &str = "plain";

const FILE_FILTER: &str = "warn,price_tracker=info";

/// Set up the three logging layers:
///
/// - plain: `target: "plain"` events as bare messages, errors and warnings on
///   stderr, everything else on stdout
/// - console: diagnostics on stderr, silent unless `RUST_LOG` is set
/// - file: info-level diagnostics appended to `log_file`
///
/// If the log file can't be opened the console layers still work and a
/// warning is printed. The returned guard flushes the file on drop.
pub fn init_logging(log_file: &Path) -> Result<Option<WorkerGuard>> {
    let plain_fmt = fmt::format()
        .without_time()
        .with_level(false)
        .with_target(false)
        .compact();
    let plain_layer = fmt::layer()
        .event_format(plain_fmt)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
        .with_filter(Targets::new().with_target(PLAIN, LevelFilter::TRACE));

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("off"))
        .add_directive(format!("{PLAIN}=off").parse()?);
    let rich_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (file_layer, guard, file_error) = match file_writer(log_file) {
        Ok((writer, guard)) => {
            let file_filter =
                EnvFilter::new(FILE_FILTER).add_directive(format!("{PLAIN}=off").parse()?);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(file_filter);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(plain_layer)
        .with(rich_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        warn!(
            target: PLAIN,
            "{} file logging disabled: {e:#}",
            style("warning:").yellow().bold()
        );
    }

    Ok(guard)
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log path '{}' has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory '{}'", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)
        .with_context(|| format!("failed to open log file '{}'", path.display()))?;

    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("price-tracker-{name}-{}", std::process::id()))
    }

    #[test]
    fn file_writer_creates_missing_directories() {
        let root = scratch_dir("logs");
        let path = root.join("nested").join("app.log");

        let (_writer, guard) = file_writer(&path).unwrap();
        drop(guard);

        assert!(path.exists());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn file_writer_rejects_path_without_file_name() {
        assert!(file_writer(Path::new("/")).is_err());
    }
}
