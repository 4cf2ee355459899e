use crate::config::ReportFormat;
use crate::runner::listener::Listener;
use crate::runner::types::{OutcomeKind, OutcomeStatus, TestOutcome, TestSummary};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

/// 控制台报告器，作为监听器逐条打印结果
pub struct ConsoleReporter {
    format: ReportFormat,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(format: ReportFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// 打印测试开始
    pub fn print_header(&self, total: usize) {
        if self.format == ReportFormat::Text {
            println!("\nRunning {} diagnostics...\n", total);
        }
    }

    /// 格式化单个结果（文本模式）
    pub fn render_text(&self, outcome: &TestOutcome) -> String {
        let symbol = match outcome.kind() {
            OutcomeKind::Pass => "✓".green(),
            OutcomeKind::Fail => "✗".red(),
            OutcomeKind::Error => "!".yellow(),
        };

        let timing = outcome
            .duration()
            .map(|d| format!(" ({}ms)", d.as_millis()))
            .unwrap_or_default();

        let mut lines = vec![format!(" {} {}{}", symbol, outcome.name.bold(), timing)];

        if self.verbose {
            let stamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
                t.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string())
            };
            lines.push(format!(
                "   {} {} → {}",
                "at".dimmed(),
                stamp(outcome.started_at),
                stamp(outcome.finished_at)
            ));
        }

        match &outcome.status {
            OutcomeStatus::Pass => {}
            OutcomeStatus::Fail { message } => {
                lines.push(format!("   {}: {}", "Failed".red().bold(), message));
            }
            OutcomeStatus::Error { cause } => {
                lines.push(format!("   {}: {}", "Error".yellow().bold(), cause));
                // verbose 时展开错误链
                if self.verbose {
                    for source in cause.chain().skip(1) {
                        lines.push(format!("     caused by: {}", source));
                    }
                }
            }
        }

        lines.join("\n")
    }

    /// 打印测试摘要
    pub fn print_summary(&self, summary: &TestSummary) {
        if self.format != ReportFormat::Text {
            return;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Passed", "Failed", "Errors", "Total", "Duration"]);

        table.add_row(vec![
            Cell::new(summary.passed).fg(Color::Green),
            Cell::new(summary.failed).fg(if summary.failed > 0 {
                Color::Red
            } else {
                Color::Reset
            }),
            Cell::new(summary.errored).fg(if summary.errored > 0 {
                Color::Yellow
            } else {
                Color::Reset
            }),
            Cell::new(summary.total).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.3}s", summary.total_duration.as_secs_f64())),
        ]);

        println!("\n{}", table);
    }
}

impl Listener<TestOutcome> for ConsoleReporter {
    fn notify(&self, outcome: &TestOutcome) {
        match self.format {
            ReportFormat::Text => println!("{}", self.render_text(outcome)),
            ReportFormat::Json => match serde_json::to_string(&outcome.to_record()) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!(test = %outcome.name, "failed to encode outcome: {}", e),
            },
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(ReportFormat::Text, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    #[test]
    fn test_render_fail_contains_message() {
        colored::control::set_override(false);
        let reporter = ConsoleReporter::default();
        let start = Utc::now();
        let outcome = TestOutcome::fail(
            "T2",
            "expected 5 got 3",
            Some(start),
            Some(start + TimeDelta::milliseconds(12)),
        );

        let text = reporter.render_text(&outcome);
        assert!(text.contains("✗ T2 (12ms)"));
        assert!(text.contains("Failed: expected 5 got 3"));
    }

    #[test]
    fn test_render_verbose_error_chain() {
        colored::control::set_override(false);
        let reporter = ConsoleReporter::new(ReportFormat::Text, true);
        let cause = anyhow::anyhow!("disk full").context("cleanup failed");
        let outcome = TestOutcome::error("T4", cause, None, None);

        let text = reporter.render_text(&outcome);
        assert!(text.contains("Error: cleanup failed"));
        assert!(text.contains("caused by: disk full"));
        assert!(text.contains("at - → -"));
    }
}
