//! Logger setup: user-facing output goes through the `log` macros.
//!
//! `info!` lines are printed as-is to stdout, warnings and errors get a
//! coloured prefix, and `--verbose` adds timestamps and debug records. With
//! `--logfile` every line is also appended to the file with ANSI codes
//! removed.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Stdout plus an optional ANSI-stripped file copy.
struct Tee {
    file: Option<strip_ansi_escapes::Writer<File>>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = match logfile {
        Some(path) => Some(strip_ansi_escapes::Writer::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };

    Builder::new()
        .filter_level(level)
        .filter_module("rusqlite", LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .target(Target::Pipe(Box::new(Tee { file })))
        .format(move |buf, record| {
            let prefix = match record.level() {
                Level::Error => format!(
                    "{} ",
                    "error:".if_supports_color(Stdout, |t| t.red().bold().to_string())
                ),
                Level::Warn => format!(
                    "{} ",
                    "warning:".if_supports_color(Stdout, |t| t.yellow().bold().to_string())
                ),
                Level::Info => String::new(),
                Level::Debug | Level::Trace => format!(
                    "{} ",
                    format!("[{} {}]", record.level(), record.target())
                        .if_supports_color(Stdout, |t| t.dimmed().to_string())
                ),
            };
            if verbose {
                let ts = chrono::Local::now().format("%H:%M:%S%.3f");
                writeln!(buf, "{ts} {prefix}{}", record.args())
            } else {
                writeln!(buf, "{prefix}{}", record.args())
            }
        })
        .try_init()
        .map_err(io::Error::other)
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
