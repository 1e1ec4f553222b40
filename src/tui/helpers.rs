use crate::domain::Counts;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Header text, e.g. "3/10 images remaining"
pub fn remaining_label(counts: &Counts) -> String {
    format!("{}/{} images remaining", counts.remaining, counts.total)
}

/// Gauge label, e.g. "70% (7/10)"
pub fn progress_label(counts: &Counts) -> String {
    format!(
        "{}% ({}/{})",
        (counts.ratio() * 100.0).round() as u16,
        counts.processed,
        counts.total
    )
}

/// Spinner glyph for a point in time, advancing every 100ms
pub fn spinner_frame(millis: u128) -> &'static str {
    SPINNER_FRAMES[(millis / 100) as usize % SPINNER_FRAMES.len()]
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
