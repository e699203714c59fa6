//! Terminal and JSON output for the CLI.

use console::{style, StyledObject};
use turbo_commerce::checkout::OrderStatus;
use turbo_store::{Feedback, FeedbackLevel, FeedbackSink};

/// Where human-readable messages go.
#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Output handler shared by commands and the engines' feedback channel.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn emit(&self, stream: Stream, glyph: StyledObject<&str>, msg: &str) {
        if self.json {
            return;
        }
        match stream {
            Stream::Stdout => println!("{} {}", glyph, msg),
            Stream::Stderr => eprintln!("{} {}", glyph, msg),
        }
    }

    pub fn info(&self, msg: &str) {
        self.emit(Stream::Stdout, style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.emit(Stream::Stdout, style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(Stream::Stderr, style("⚠").yellow(), msg);
    }

    /// Errors are the one message kind still printed in JSON mode.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.emit(Stream::Stderr, style("→").dim(), &style(msg).dim().to_string());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Pretty-printed JSON on stdout, regardless of mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.json {
            println!("  {} {}", style("•").dim(), item);
        }
    }

    /// One table row. Cells longer than their column are cut with `…`;
    /// the last cell is printed as is so styled badges keep their colour.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let last = cols.len().saturating_sub(1);
        let cells: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (col, &width))| {
                if i == last {
                    col.to_string()
                } else {
                    format!("{:width$}", fit(col, width), width = width)
                }
            })
            .collect();
        println!("  {}", cells.join("  ").trim_end());
    }
}

fn fit(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut cut: String = cell.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Failures come back as errors and are printed once by `main`, so the
/// feedback channel only repeats them in verbose mode.
impl FeedbackSink for Output {
    fn notify(&self, feedback: Feedback) {
        match feedback.level {
            FeedbackLevel::Success => self.success(&feedback.message),
            FeedbackLevel::Info => self.info(&feedback.message),
            FeedbackLevel::Error => {
                self.debug(&format!("{}: {}", feedback.operation, feedback.message))
            }
        }
    }
}

/// Colored order status.
pub fn status_badge(status: OrderStatus) -> String {
    let name = status.display_name();
    match status {
        OrderStatus::Delivered => style(name).green().to_string(),
        OrderStatus::Pending | OrderStatus::Processing => style(name).yellow().to_string(),
        OrderStatus::Shipped => style(name).cyan().to_string(),
        OrderStatus::Cancelled => style(name).dim().to_string(),
    }
}
