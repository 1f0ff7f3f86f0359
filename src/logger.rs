use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const CRATE_TARGET: &str = "quire";

/// `log` backend writing to stderr and, optionally, a file.
///
/// Records from other crates (hyper, axum) are only shown at warn and above
/// unless the level is `trace`.
pub struct Logger {
    severity: Level,
    file: Option<Mutex<File>>,
    enable_colors: bool,
}

impl Logger {
    /// Create a new logger
    pub fn new(severity: Level, file_path: Option<&Path>, enable_colors: bool) -> Self {
        let file = file_path.and_then(|path| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                let _ = std::fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => Some(Mutex::new(f)),
                Err(e) => {
                    eprintln!("cannot open log file {:?}: {}", path, e);
                    None
                }
            }
        });

        Logger { severity, file, enable_colors }
    }

    /// Install the logger, configured from `QUIRE_LOG`/`RUST_LOG`,
    /// `QUIRE_LOG_FILE` and `NO_COLOR`
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("QUIRE_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .and_then(|raw| raw.parse::<Level>().ok())
            .unwrap_or(Level::Info);
        let file_path = std::env::var("QUIRE_LOG_FILE").ok().map(PathBuf::from);
        let enable_colors = std::env::var("NO_COLOR").is_err();

        let logger = Logger::new(severity, file_path.as_deref(), enable_colors);
        log::set_max_level(severity.to_level_filter().max(LevelFilter::Warn));
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }

    fn format_line(timestamp: &str, record: &Record, colored: bool) -> String {
        let level = record.level();
        let target = record.target();
        if colored {
            format!("{}[{timestamp}] {level:<5}\x1b[0m {target}: {}", Self::color(level), record.args())
        } else {
            format!("[{timestamp}] {level:<5} {target}: {}", record.args())
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let ours = metadata.target().starts_with(CRATE_TARGET);
        if ours || self.severity == Level::Trace {
            metadata.level() <= self.severity
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
        let line = Self::format_line(&timestamp, record, self.enable_colors);
        let _ = writeln!(std::io::stderr(), "{line}");

        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", Self::format_line(&timestamp, record, false));
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = guard.flush();
            }
        }
    }
}
