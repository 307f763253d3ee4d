// src/utils/log.rs

//! Section-style progress output on top of the `log` facade.
//!
//! Level filtering and timestamps come from whatever logger the binary
//! installs (`env_logger` in the CLI).

use std::time::Duration;

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(60);
    log::info!("{}", border);
    log::info!("  {}", title);
    log::info!("{}", border);
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("[STEP {}/{}] {}", step_num, total, message);
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {}", message);
}

/// Log a separator line
pub fn separator() {
    log::info!("{}", "─".repeat(60));
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {}", title);
    for (key, value) in items {
        log::info!("    {}: {}", key, value);
    }
}

/// Format an elapsed duration as seconds with one decimal.
pub fn elapsed(duration: Duration) -> String {
    format!("{:.1}s", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_format() {
        assert_eq!(elapsed(Duration::from_millis(1240)), "1.2s");
        assert_eq!(elapsed(Duration::from_secs(42)), "42.0s");
    }
}
