use ratatui::style::Color;

/// Disapprove, errors
pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 94, 85);
/// Approve, progress
pub const ACCENT_SECONDARY: Color = Color::Rgb(92, 201, 130);
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(242, 193, 78);

pub const TEXT_PRIMARY: Color = Color::Rgb(230, 230, 230);
pub const TEXT_SECONDARY: Color = Color::Rgb(150, 150, 160);
/// Controls that would do nothing right now
pub const TEXT_DISABLED: Color = Color::Rgb(85, 85, 95);

pub const BG_DARK: Color = Color::Rgb(24, 24, 32);
pub const BORDER_COLOR: Color = Color::Rgb(90, 90, 110);
