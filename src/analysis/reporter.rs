use crate::analysis::histogram::DeltaHistogram;
use crate::analysis::statistics::{Statistics, StatisticsError};
use colored::*;
use tracing::{debug, info};

/// Renders delta histograms as aligned delta/count columns
pub struct Reporter;

const HISTOGRAM_BAR_WIDTH: usize = 30;

// Share of all deltas above which a delta label is highlighted
const DOMINANT_SHARE: f64 = 50.0;
const NOTABLE_SHARE: f64 = 10.0;

const DELTA_HEADER: &str = "DeltaMs";
const COUNT_HEADER: &str = "Count";

impl Reporter {
    /// Bar of `count / max_count * bar_width` full blocks.
    ///
    /// A non-zero count that scales below one block still gets a thin bar.
    fn render_bar(count: usize, max_count: usize, bar_width: usize) -> String {
        if count == 0 || max_count == 0 {
            return String::new();
        }
        match count * bar_width / max_count {
            0 => "▏".to_string(),
            blocks => "█".repeat(blocks.min(bar_width)),
        }
    }

    /// Share of all deltas, with more decimals for rare deltas
    fn format_share(count: usize, total: usize) -> String {
        let share = count as f64 / total as f64 * 100.0;
        if share < 1.0 {
            format!("{:6.2}%", share)
        } else {
            format!("{:6.1}%", share)
        }
    }

    /// Exact count, right-aligned to the column width
    fn format_count(count: usize, width: usize) -> String {
        format!("{:>width$}", count, width = width)
    }

    /// Column width that fits every rendered value and the header
    fn column_width<I: IntoIterator<Item = String>>(values: I, header: &str) -> usize {
        values
            .into_iter()
            .map(|value| value.len())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(header.len())
    }

    /// Delta label padded before coloring, so ANSI codes do not break alignment
    fn colorize_label(delta_ms: i64, width: usize, share: f64) -> String {
        let padded_label = format!("{:>width$}", delta_ms, width = width);
        if share > DOMINANT_SHARE {
            padded_label.green().to_string()
        } else if share > NOTABLE_SHARE {
            padded_label.cyan().to_string()
        } else {
            padded_label
        }
    }

    /// Render the summary of one session as printable text.
    ///
    /// `title` names the peer that recorded the timestamps, e.g. "Sender cadence".
    pub fn render(
        &self,
        title: &str,
        histogram: &DeltaHistogram,
    ) -> Result<String, StatisticsError> {
        let mut lines = Vec::new();
        lines.push(format!("{}", "┌─────────────────────────────┐".cyan()));
        lines.push(format!("{}", format!("│  {:<27}│", title).cyan()));
        lines.push(format!("{}", "└─────────────────────────────┘".cyan()));
        lines.push(format!("Printing {} deltas...", histogram.total_deltas()));

        if histogram.is_empty() {
            lines.push(format!("{}", "No deltas recorded.".yellow()));
            return Ok(lines.join("\n"));
        }

        let buckets = histogram.buckets();
        let total = histogram.total_deltas();
        let max_count = histogram.mode().map(|bucket| bucket.count).unwrap_or(0);
        let delta_width =
            Self::column_width(buckets.iter().map(|b| b.delta_ms.to_string()), DELTA_HEADER);
        let count_width =
            Self::column_width(buckets.iter().map(|b| b.count.to_string()), COUNT_HEADER);

        lines.push(String::new());
        lines.push(format!(
            "  {:>dw$}  {:>cw$}  {:>7}  {}",
            DELTA_HEADER,
            COUNT_HEADER,
            "Share",
            "",
            dw = delta_width,
            cw = count_width
        ));

        for bucket in buckets {
            let share = bucket.count as f64 / total as f64 * 100.0;
            lines.push(format!(
                "  {}  {}  {}  {}",
                Self::colorize_label(bucket.delta_ms, delta_width, share),
                Self::format_count(bucket.count, count_width),
                Self::format_share(bucket.count, total),
                Self::render_bar(bucket.count, max_count, HISTOGRAM_BAR_WIDTH)
            ));
        }

        let stats = Statistics::new(histogram)?;
        lines.push(String::new());
        lines.push("Cadence Statistics (ms between consecutive messages):".to_string());
        lines.push(format!("  Mean:      {:>8.2}", stats.mean()));
        lines.push(format!("  Stdev:     {:>8.2}", stats.stdev()));
        lines.push(format!("  Min:       {:>8}", stats.min()));
        lines.push(format!("  P50:       {:>8}", stats.percentile(0.5)));
        lines.push(format!("  P99:       {:>8}", stats.percentile(0.99)));
        lines.push(format!("  Max:       {:>8}", stats.max()));

        if stats.clamped_count() > 0 {
            lines.push(format!(
                "  ⚠ Note: {} delta(s) were negative or out of range and were clamped for percentiles",
                stats.clamped_count()
            ));
        }

        Ok(lines.join("\n"))
    }

    /// Print the summary of one session to stdout
    pub fn print(&self, title: &str, histogram: &DeltaHistogram) -> Result<(), StatisticsError> {
        debug!(
            title = title,
            total_deltas = histogram.total_deltas(),
            "Printing delta histogram"
        );
        let rendered = self.render(title, histogram)?;
        println!("\n{}\n", rendered);

        if let Some(mode) = histogram.mode() {
            info!(
                title = title,
                total_deltas = histogram.total_deltas(),
                mode_delta_ms = mode.delta_ms,
                mode_count = mode.count,
                "Histogram reported"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::histogram::aggregate;

    /// Row of the rendered table for one delta, with colors stripped by width
    fn row_for(rendered: &str, delta_ms: i64, delta_width: usize) -> Option<String> {
        let label = format!("  {:>width$}  ", delta_ms, width = delta_width);
        rendered
            .lines()
            .find(|line| line.starts_with(&label))
            .map(str::to_string)
    }

    #[test]
    fn test_render_lists_every_bucket() -> Result<(), StatisticsError> {
        colored::control::set_override(false);
        let rendered = Reporter.render("Receiver cadence", &aggregate(&[0, 10, 10, 25]))?;

        assert!(rendered.contains("Printing 3 deltas..."));
        assert!(rendered.contains("DeltaMs"));
        for delta in [0, 10, 15] {
            let row = row_for(&rendered, delta, DELTA_HEADER.len());
            assert!(row.is_some(), "missing bucket {}", delta);
        }
        assert_eq!(rendered.matches("33.3%").count(), 3);
        Ok(())
    }

    #[test]
    fn test_render_prints_exact_large_counts() -> Result<(), StatisticsError> {
        colored::control::set_override(false);
        let mut sequence: Vec<i64> = (0..1500).map(|i| i * 16).collect();
        sequence.push(sequence[sequence.len() - 1] + 17);
        let rendered = Reporter.render("Send cadence", &aggregate(&sequence))?;

        let row = row_for(&rendered, 16, DELTA_HEADER.len()).expect("row for 16ms");
        assert!(row.contains(" 1499 "), "row was {:?}", row);
        let row = row_for(&rendered, 17, DELTA_HEADER.len()).expect("row for 17ms");
        assert!(row.contains("     1 "), "row was {:?}", row);
        assert!(rendered.contains("Printing 1500 deltas..."));
        Ok(())
    }

    #[test]
    fn test_render_empty_histogram() -> Result<(), StatisticsError> {
        let rendered = Reporter.render("Receiver cadence", &aggregate(&[100]))?;
        assert!(rendered.contains("Printing 0 deltas..."));
        assert!(rendered.contains("No deltas recorded."));
        assert!(!rendered.contains("DeltaMs"));
        Ok(())
    }

    #[test]
    fn test_render_notes_clamped_deltas() -> Result<(), StatisticsError> {
        let rendered = Reporter.render("Sender cadence", &aggregate(&[10, 9, 26]))?;
        assert!(rendered.contains("clamped"));
        Ok(())
    }

    #[test]
    fn test_print_does_not_fail() -> Result<(), StatisticsError> {
        Reporter.print("Sender cadence", &aggregate(&[0, 16, 33, 50]))
    }

    #[test]
    fn test_render_bar_scaling() {
        assert_eq!(Reporter::render_bar(0, 10, 30), "");
        assert_eq!(Reporter::render_bar(10, 10, 30), "█".repeat(30));
        assert_eq!(Reporter::render_bar(5, 10, 30), "█".repeat(15));
        assert_eq!(Reporter::render_bar(1, 1000, 30), "▏");
    }

    #[test]
    fn test_format_share_precision() {
        assert_eq!(Reporter::format_share(1, 200), "  0.50%");
        assert_eq!(Reporter::format_share(1, 2), "  50.0%");
        assert_eq!(Reporter::format_share(3, 3), " 100.0%");
    }

    #[test]
    fn test_format_count_is_exact() {
        assert_eq!(Reporter::format_count(100, 5), "  100");
        assert_eq!(Reporter::format_count(1499, 5), " 1499");
        assert_eq!(Reporter::format_count(123_456, 5), "123456");
    }

    #[test]
    fn test_column_width_fits_widest_value() {
        let values = vec!["-3".to_string(), "16".to_string()];
        assert_eq!(Reporter::column_width(values, "DeltaMs"), 7);
        let values = vec!["12345678".to_string()];
        assert_eq!(Reporter::column_width(values, "Count"), 8);
    }
}
