use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

static RELAY_LOGGER: Lazy<RelayLogger> = Lazy::new(RelayLogger::new);

/// Dependency targets that are only interesting when something is wrong.
const QUIET_TARGETS: [&str; 5] = ["hyper", "h2", "rustls", "mio", "reqwest::connect"];

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let max_level = config.min_level.to_level_filter();
    RELAY_LOGGER.update_config(config);

    log::set_logger(&*RELAY_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))?;
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Parses `LOG_LEVEL`-style names, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        self.to_level().to_level_filter()
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub target: String,
    pub file: String,
    pub line: u32,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level: LogLevel::from_level(record.level()),
            message: record.args().to_string(),
            target: record.target().to_string(),
            file: record.file().unwrap_or("unknown").to_string(),
            line: record.line().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_file_location: bool,
    pub show_target: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file_path: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_file_location: false,
            show_target: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file_path: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_file_path = Some(path.to_string());
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_file_location: true,
            ..Default::default()
        }
    }

    /// `LOG_FORMAT` picks a preset (`json` or `dev`); `LOG_LEVEL` and `LOG_FILE` override it.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => Self::production(),
            Some("dev") => Self::development(),
            _ => Self::default(),
        };
        if let Some(level) = lookup("LOG_LEVEL").and_then(|l| LogLevel::parse(&l)) {
            config = config.with_level(level);
        }
        if let Some(path) = lookup("LOG_FILE").filter(|path| !path.trim().is_empty()) {
            config = config.with_file_output(&path);
        }
        config
    }
}

pub struct RelayLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl RelayLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        if let Some(path) = &new_config.log_file_path {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => {
                    if let Ok(mut log_file) = self.log_file.lock() {
                        *log_file = Some(file);
                    }
                }
                Err(e) => eprintln!("Failed to open log file {}: {}", path, e),
            }
        }
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
    }

    fn is_quiet(target: &str) -> bool {
        QUIET_TARGETS.iter().any(|quiet| target.starts_with(quiet))
    }

    fn format_console_output(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        let level = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };

        let mut output = if config.show_colors {
            format!(
                "{} [{}] ",
                timestamp.bright_black(),
                level.color(entry.level.color()).bold()
            )
        } else {
            format!("{} [{}] ", timestamp, level)
        };

        if config.show_target && !entry.target.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{}: ", entry.target.bright_blue()));
            } else {
                output.push_str(&format!("{}: ", entry.target));
            }
        }

        output.push_str(&entry.message);

        if config.show_file_location {
            let location = format!("{}:{}", entry.file, entry.line);
            if config.show_colors {
                output.push_str(&format!(" ({})", location.bright_black()));
            } else {
                output.push_str(&format!(" ({})", location));
            }
        }

        output
    }

    fn render(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            serde_json::to_string(entry).unwrap_or_default()
        } else {
            self.format_console_output(entry, config)
        }
    }
}

impl Default for RelayLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for RelayLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if Self::is_quiet(metadata.target()) && metadata.level() > Level::Warn {
            return false;
        }
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_record(record);
        let config = match self.config.lock() {
            Ok(config) => config.clone(),
            Err(_) => return,
        };

        println!("{}", self.render(&entry, &config));

        if let Ok(mut log_file) = self.log_file.lock() {
            if let Some(file) = log_file.as_mut() {
                // Files never get ANSI colors.
                let plain = config.clone().with_colors(false);
                let _ = writeln!(file, "{}", self.render(&entry, &plain));
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Ok(mut log_file) = self.log_file.lock() {
            if let Some(file) = log_file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long an operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  {} completed in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_startup_info(app_name: &str, version: &str, host: &str, port: u16) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("🌐 Listening on http://{}:{}", host, port);
}

pub fn log_config_info(config: &crate::config::Config) {
    let mut hosts: Vec<&str> = config.proxy.allowed_hosts.iter().map(String::as_str).collect();
    hosts.sort_unstable();

    log::info!("⚙️  Configuration loaded:");
    log::info!("   Upstream: {}", config.krea.create_url());
    log::info!(
        "   API token: {}",
        if config.krea.api_token.is_some() { "✅" } else { "❌" }
    );
    log::info!(
        "   Polling: {} attempts every {}ms",
        config.poll.max_attempts,
        config.poll.interval_ms
    );
    log::info!("   Allowed image hosts: {}", hosts.join(", "));
    log::info!("   Body limit: {} bytes", config.body_limit);
}
