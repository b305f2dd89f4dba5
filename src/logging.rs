//! Logger setup for the binary.
//!
//! Every record is written as `<timestamp> - <LEVEL> - <message>` both to
//! stdout and, appended, to a log file, so a run leaves a durable trace next
//! to where it was started.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::{Error, Result};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "repo_splitter.log";

/// Writer that duplicates everything to stdout and a file.
pub struct TeeWriter {
    file: File,
}

impl TeeWriter {
    /// Open `path` for appending, creating it if needed.
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Install the global logger.
///
/// `level` (from `--log-level`) takes a filter spec such as `debug` or
/// `monorepo_split=trace`; without it `RUST_LOG` is used, then `info`.
pub fn init(level: Option<&str>, log_file: &Path) -> Result<()> {
    let mut builder = match level {
        Some(spec) => {
            let mut builder = Builder::new();
            builder.parse_filters(spec);
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("info")),
    };

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter::append_to(log_file)?)))
        .write_style(env_logger::WriteStyle::Never);

    builder
        .try_init()
        .map_err(|e| Error::config(format!("Failed to initialize logging: {}", e)))
}
