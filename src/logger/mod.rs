//! Logger module
//!
//! Timestamped logging for the server: lifecycle and error lines filtered
//! by the configured level, plus an access log in common log format gated
//! by configuration.

use crate::config::Config;
use chrono::Local;
use std::net::SocketAddr;
use std::sync::OnceLock;

/// Log verbosity threshold, ordered from quietest to noisiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
}

impl LogLevel {
    /// Parse a configured level string; unknown values mean everything
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            _ => Self::Info,
        }
    }
}

static LEVEL: OnceLock<LogLevel> = OnceLock::new();

/// Install the configured level; later calls are ignored
pub fn init(config: &Config) {
    let _ = LEVEL.set(LogLevel::parse(&config.logging.level));
}

fn enabled(threshold: LogLevel) -> bool {
    *LEVEL.get().unwrap_or(&LogLevel::Info) >= threshold
}

fn write_info(message: &str) {
    if enabled(LogLevel::Info) {
        println!("{message}");
    }
}

fn write_error(message: &str) {
    eprintln!("{message}");
}

// Access lines have their own config switch, not a level
fn write_access(message: &str) {
    println!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Static file server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Document root: {}",
        config.static_files.root
    ));
    write_info(&format!("Header rules: {}", config.rules.len()));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if enabled(LogLevel::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

/// Log one served request in common log format
pub fn log_access(remote_addr: &SocketAddr, method: &str, path: &str, status: u16, bytes: usize) {
    write_access(&format!(
        "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
        remote_addr.ip(),
        Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        path,
        status,
        bytes
    ));
}
