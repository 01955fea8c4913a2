//! Output formatting for the CLI.

use console::style;
use encore_payments::PaymentStatus;

/// Output handler for CLI messages.
#[derive(Debug, Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored payment status.
pub fn status_badge(status: &PaymentStatus) -> String {
    let label = status.as_str();
    match status {
        PaymentStatus::Approved | PaymentStatus::Authorized => style(label).green().to_string(),
        PaymentStatus::Pending | PaymentStatus::InProcess | PaymentStatus::InMediation => {
            style(label).yellow().to_string()
        }
        PaymentStatus::Rejected | PaymentStatus::Cancelled | PaymentStatus::ChargedBack => {
            style(label).red().to_string()
        }
        PaymentStatus::Refunded => style(label).dim().to_string(),
        PaymentStatus::Other(_) => label.to_string(),
    }
}

/// Format reais as `R$ 22.10`.
pub fn format_brl(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}

/// Format delivery days, e.g. `1 dia`, `6 dias`.
pub fn format_days(days: Option<u32>) -> String {
    match days {
        Some(1) => "1 dia".to_string(),
        Some(days) => format!("{} dias", days),
        None => "-".to_string(),
    }
}
