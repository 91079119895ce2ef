use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::explain::Explanation;

/// Route `log` records to ~/.local/share/shexplain/shexplain.log.
/// Best-effort: failures are silently ignored (logging must never block an explanation).
pub fn init(level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    let Some(log_dir) = log_dir() else {
        return;
    };
    let _ = std::fs::create_dir_all(&log_dir);

    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("shexplain.log"))
    else {
        return;
    };

    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = WriteLogger::init(level, config, file);
}

/// Parse a level name from config; unknown names fall back to `warn`.
pub fn level_from_str(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Warn)
}

/// Record what was explained, one compact line per query.
pub fn log_explanation(query: &str, records: &[Explanation]) {
    let query_truncated: String = query.chars().take(200).collect();
    let labels = records
        .iter()
        .map(Explanation::label)
        .collect::<Vec<_>>()
        .join(" | ");
    log::info!("explained\t{query_truncated}\t{labels}");
}

fn log_dir() -> Option<PathBuf> {
    let dir = shellexpand::full("~/.local/share/shexplain").ok()?;
    Some(PathBuf::from(dir.as_ref()))
}
