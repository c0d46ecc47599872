//! File-based intent audit log
//!
//! Every routed turn can be appended to a log file for security auditing.
//! Values of sensitive parameter keys (account numbers, card numbers,
//! recipients) are masked before they are written.

use crate::params::ParamValue;
use chrono::Local;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

/// Parameter keys whose values are masked in the audit trail
const SENSITIVE_KEYS: &[&str] = &["account-number", "card-number", "recipient", "pin"];

/// Initialize the log file
pub fn init_logger() -> anyhow::Result<()> {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let mut log_file = LOG_FILE.lock().unwrap();
    *log_file = Some(file);

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    if let Some(ref mut f) = *log_file {
        let _ = writeln!(f, "\n=== Teller Session Started at {} ===\n", timestamp);
    }

    Ok(())
}

/// Get the log file path
fn get_log_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("teller").join("teller.log")
    } else {
        PathBuf::from("teller.log")
    }
}

/// Log a message to file
pub fn log(level: &str, message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let formatted = format!("[{}] {}: {}", timestamp, level, message);

    let mut log_file = LOG_FILE.lock().unwrap();
    if let Some(ref mut f) = *log_file {
        let _ = writeln!(f, "{}", formatted);
        let _ = f.flush();
    }
}

/// Append one routed turn to the audit trail
pub fn log_intent(
    session_id: &str,
    intent: &str,
    confidence: f32,
    params: &HashMap<String, ParamValue>,
    mask: bool,
) {
    log(
        "INTENT",
        &format!(
            "session={} intent={} confidence={:.2} params={{{}}}",
            session_id,
            intent,
            confidence,
            render_params(params, mask)
        ),
    );
}

/// Render parameters for the audit line, masking sensitive values
fn render_params(params: &HashMap<String, ParamValue>, mask: bool) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();

    keys.into_iter()
        .map(|key| {
            let value = if mask && SENSITIVE_KEYS.contains(&key.as_str()) {
                "***".to_string()
            } else {
                match &params[key] {
                    ParamValue::Text(s) => s.clone(),
                    ParamValue::Number(n) => n.to_string(),
                    ParamValue::Money(m) => m.to_string(),
                }
            };
            format!("{}={}", key, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Macros for easier logging
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log("INFO", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::log("WARN", &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log("ERROR", &format!($($arg)*));
    };
}

/// Get the current log file path for display
pub fn get_log_path_display() -> String {
    get_log_path().display().to_string()
}
