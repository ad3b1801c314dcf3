use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use circleci_jobs::JobStatus;

use super::styling::Tone;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn color_coded_status_cell(status: Option<&JobStatus>) -> Cell {
    let text = status.map_or("unknown", JobStatus::as_str);
    Cell::new(text).fg(Tone::for_job_status(status).table_color())
}

pub fn color_coded_result_cell(result: &str) -> Cell {
    let text = if result.is_empty() { "-" } else { result };
    Cell::new(text).fg(Tone::for_test_result(result).table_color())
}

/// Formats a millisecond duration as `1h 2m 3s`, dropping leading zero units.
pub fn format_duration_ms(millis: u64) -> String {
    let total_secs = millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else if total_secs > 0 {
        format!("{seconds}s")
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(59_999), "59s");
        assert_eq!(format_duration_ms(93_000), "1m 33s");
        assert_eq!(format_duration_ms(3_723_000), "1h 2m 3s");
    }
}
