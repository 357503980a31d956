//! Terminal output for the `shop` CLI.
//!
//! Human output goes to stdout, diagnostics to stderr. In `--json` mode
//! only structured values and errors are printed.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Writes CLI messages in the selected mode.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Whether `--json` was given.
    pub fn is_json(&self) -> bool {
        self.json
    }

    fn out(&self, marker: StyledObject<&str>, msg: &str) {
        if !self.json {
            println!("{} {}", marker, msg);
        }
    }

    fn err(&self, marker: StyledObject<&str>, msg: &str) {
        if !self.json {
            eprintln!("{} {}", marker, msg);
        }
    }

    pub fn info(&self, msg: &str) {
        self.out(style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.out(style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.err(style("⚠").yellow(), msg);
    }

    /// Errors are printed in every mode; as `{"error": ..}` under `--json`.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.err(style("→").dim(), &style(msg).dim().to_string());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.json {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// `[n/total] msg`
    pub fn step(&self, n: usize, total: usize, msg: &str) {
        if !self.json {
            println!("{} {}", style(format!("[{}/{}]", n, total)).dim(), msg);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        self.out(style("  •").dim(), item);
    }

    /// Pretty-printed JSON on stdout, in any mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(text) = serde_json::to_string_pretty(value) {
            println!("{}", text);
        }
    }

    /// Progress bar over `len` items; hidden under `--json`.
    pub fn progress(&self, len: u64, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let bar = ProgressBar::new(len).with_style(style);
        bar.set_message(msg.to_string());
        bar
    }

    /// Spinner for a wait of unknown length; hidden under `--json`.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new_spinner();
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

/// `512 B`, `2.00 KB`, `1.50 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    match bytes {
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// A revalidation interval: `45s`, `5m 0s`, `2h 0m`.
pub fn format_duration(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m {}s", s / 60, s % 60),
        s => format!("{}h {}m", s / 3600, (s % 3600) / 60),
    }
}
