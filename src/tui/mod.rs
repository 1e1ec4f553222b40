// TUI module for rendering the review screen
pub mod colors;
pub mod helpers;
pub mod input;
pub mod zoom;

// Re-exports
pub use colors::*;
pub use helpers::{centered_rect, progress_label, remaining_label};
pub use input::{handle_key_event, handle_prompt_input, KeyAction, PromptAction};
pub use zoom::Zoom;

use crate::async_preview::{PreviewState, SyncPreviewManager};
use crate::domain::Snapshot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

/// Which line prompt is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// New base name for the current image
    Rename,
    /// Folder to review next
    SelectFolder,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::Rename => " Rename ",
            PromptKind::SelectFolder => " Open Folder ",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            PromptKind::Rename => "New name without extension",
            PromptKind::SelectFolder => "Path of the folder to review",
        }
    }
}

/// UI view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Welcome screen shown on first launch
    Welcome,
    /// Main review view
    Browsing,
    /// Help overlay visible
    Help,
    /// A line prompt is collecting input
    Prompt(PromptKind),
    /// Every image has been sorted; undo is still possible
    Done,
}

impl ViewState {
    /// The view to return to once an overlay closes
    pub fn resting(snapshot: &Snapshot) -> Self {
        if snapshot.queue_empty {
            ViewState::Done
        } else {
            ViewState::Browsing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One-line message under the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Result of feeding a key to an open prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Editing,
    Cancelled,
    Submitted(PromptKind, String),
}

/// Presentation state the session does not own
#[derive(Debug, Clone)]
pub struct UiState {
    pub view: ViewState,
    pub zoom: Zoom,
    pub prompt: String,
    pub status: Option<StatusMessage>,
}

impl UiState {
    pub fn new(zoom: Zoom, show_welcome: bool, snapshot: &Snapshot) -> Self {
        let view = if show_welcome {
            ViewState::Welcome
        } else {
            ViewState::resting(snapshot)
        };
        Self {
            view,
            zoom,
            prompt: String::new(),
            status: None,
        }
    }

    /// Close any overlay and show the review (or done) screen
    pub fn resume(&mut self, snapshot: &Snapshot) {
        self.view = ViewState::resting(snapshot);
    }

    pub fn open_prompt(&mut self, kind: PromptKind, initial: impl Into<String>) {
        self.prompt = initial.into();
        self.view = ViewState::Prompt(kind);
    }

    /// Applies a key to the open prompt. The caller decides where to go after
    /// `Cancelled` or `Submitted`.
    pub fn edit_prompt(&mut self, action: PromptAction) -> PromptOutcome {
        let ViewState::Prompt(kind) = self.view else {
            return PromptOutcome::Cancelled;
        };

        match action {
            PromptAction::Insert(c) => {
                self.prompt.push(c);
                PromptOutcome::Editing
            }
            PromptAction::Backspace => {
                self.prompt.pop();
                PromptOutcome::Editing
            }
            PromptAction::Submit => {
                PromptOutcome::Submitted(kind, std::mem::take(&mut self.prompt))
            }
            PromptAction::Cancel => {
                self.prompt.clear();
                PromptOutcome::Cancelled
            }
            PromptAction::None => PromptOutcome::Editing,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Error,
        });
    }
}

/// Renders the review screen, requesting the preview for the current image
pub fn render_with_preview(
    frame: &mut Frame,
    snapshot: &Snapshot,
    ui: &UiState,
    folder: &Path,
    preview_manager: &mut SyncPreviewManager,
) {
    let preview = match snapshot.current.as_ref() {
        Some(name) => Some(preview_manager.request_preview(&folder.join(name), ui.zoom.percent())),
        None => None,
    };

    render(frame, snapshot, ui, preview);
}

/// Renders the review screen and whichever overlay the view calls for
pub fn render(frame: &mut Frame, snapshot: &Snapshot, ui: &UiState, preview: Option<&PreviewState>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with progress
            Constraint::Min(0),    // Preview
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], snapshot);
    render_content(frame, chunks[1], snapshot, preview);
    render_status_line(frame, chunks[2], ui.status.as_ref());
    render_footer(frame, chunks[3], snapshot);

    match ui.view {
        ViewState::Welcome => render_welcome_overlay(frame),
        ViewState::Help => render_help_overlay(frame),
        ViewState::Prompt(kind) => render_prompt_overlay(frame, kind, &ui.prompt),
        ViewState::Browsing | ViewState::Done => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let name = match &snapshot.current {
        Some(name) => Span::styled(
            name.clone(),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("Nothing left to review", Style::default().fg(TEXT_SECONDARY)),
    };

    let title_line = Line::from(vec![
        Span::styled(
            " ApproveIT ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        name,
        Span::raw("  "),
        Span::styled(
            remaining_label(&snapshot.counts),
            Style::default().fg(TEXT_SECONDARY),
        ),
    ]);

    let header = Paragraph::new(title_line)
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(snapshot.counts.ratio())
        .label(progress_label(&snapshot.counts));

    frame.render_widget(gauge, chunks[1]);
}

fn render_content(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    preview: Option<&PreviewState>,
) {
    let Some(name) = snapshot.current.as_deref() else {
        frame.render_widget(render_done_widget(snapshot), area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(format!(" {} ", name));

    match preview {
        None | Some(PreviewState::Loading) => {
            frame.render_widget(block, area);
            render_loading_overlay(frame, name);
        }
        Some(PreviewState::Ready(content)) => {
            // Half-block rows must not wrap or the picture tears
            let paragraph = Paragraph::new(content.lines.clone())
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }
        Some(PreviewState::Error(e)) => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  [!] Could not render this image",
                    Style::default()
                        .fg(ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("  {}", e)),
                Line::from(""),
                Line::from(Span::styled(
                    "  It can still be approved, disapproved or renamed.",
                    Style::default().fg(TEXT_SECONDARY),
                )),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block.border_style(Style::default().fg(ACCENT_PRIMARY)))
                .style(Style::default().fg(TEXT_PRIMARY))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
    }
}

/// Shown once the pending queue is empty
fn render_done_widget(snapshot: &Snapshot) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "All images sorted",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if snapshot.undo_available {
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("z", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw(" to undo the last action"),
        ]));
    }
    lines.push(Line::from(vec![
        Span::raw("Press "),
        Span::styled("f", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::raw(" to review another folder or "),
        Span::styled("q", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::raw(" to quit"),
    ]));

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Done "),
        )
        .style(Style::default().fg(TEXT_SECONDARY))
        .alignment(Alignment::Center)
}

fn render_status_line(frame: &mut Frame, area: Rect, status: Option<&StatusMessage>) {
    let Some(status) = status else {
        return;
    };

    let style = match status.kind {
        StatusKind::Info => Style::default().fg(TEXT_SECONDARY),
        StatusKind::Error => Style::default()
            .fg(ACCENT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", status.text), style))),
        area,
    );
}

/// Footer controls; ones that would do nothing are dimmed
fn render_footer(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let enabled = |on: bool, color: Color| {
        if on {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DISABLED)
        }
    };
    let label = |on: bool| {
        if on {
            Style::default().fg(TEXT_SECONDARY)
        } else {
            Style::default().fg(TEXT_DISABLED)
        }
    };

    let has_item = !snapshot.queue_empty;
    let can_move = !(snapshot.at_first && snapshot.at_last);
    let separator = || Span::raw(" │ ");

    let controls = Line::from(vec![
        Span::styled("← ", enabled(has_item, ACCENT_PRIMARY)),
        Span::styled("Disapprove", label(has_item)),
        separator(),
        Span::styled("→ ", enabled(has_item, ACCENT_SECONDARY)),
        Span::styled("Approve", label(has_item)),
        separator(),
        Span::styled("↑↓ ", enabled(can_move, TEXT_SECONDARY)),
        Span::styled("Nav", label(can_move)),
        separator(),
        Span::styled("z ", enabled(snapshot.undo_available, ACCENT_HIGHLIGHT)),
        Span::styled("Undo", label(snapshot.undo_available)),
        separator(),
        Span::styled("+/- ", enabled(has_item, TEXT_SECONDARY)),
        Span::styled("Zoom", label(has_item)),
        separator(),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
        separator(),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
    ]);

    let footer = Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

fn key_line(keys: &'static str, color: Color, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", keys), Style::default().fg(color)),
        Span::raw(text),
    ])
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(60, 80, frame.area());
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key_line("→ / a", ACCENT_SECONDARY, "Approve"),
        key_line("← / d", ACCENT_PRIMARY, "Disapprove"),
        key_line("↑ / k", TEXT_SECONDARY, "Previous image"),
        key_line("↓ / j", TEXT_SECONDARY, "Next image"),
        key_line("z / u", ACCENT_HIGHLIGHT, "Undo"),
        key_line("+ / -", TEXT_SECONDARY, "Zoom in / out"),
        key_line("Space", TEXT_SECONDARY, "Reset zoom"),
        key_line("r", TEXT_SECONDARY, "Rename image"),
        key_line("f", TEXT_SECONDARY, "Open another folder"),
        key_line("o", TEXT_SECONDARY, "Open in image viewer"),
        key_line("q / Esc", TEXT_SECONDARY, "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines).style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let welcome_lines = vec![
        Line::from(""),
        heading("Welcome to ApproveIT!"),
        Line::from(""),
        Line::from("Go through a folder of images one at a time and sort each one."),
        Line::from(vec![
            Span::raw("Approved images move into "),
            Span::styled("approved/", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(", the rest into "),
            Span::styled("disapproved/", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("."),
        ]),
        Line::from(""),
        heading("Essentials:"),
        Line::from(""),
        key_line("→ / a", ACCENT_SECONDARY, "Approve"),
        key_line("← / d", ACCENT_PRIMARY, "Disapprove"),
        key_line("z", ACCENT_HIGHLIGHT, "Undo the last action"),
        key_line("?", TEXT_SECONDARY, "All shortcuts"),
        Line::from(""),
        Line::from(Span::styled(
            "Files are only moved or renamed, never deleted.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(
            Block::default()
                .title(" ApproveIT ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}

/// Renders a single-line input box
pub fn render_prompt_overlay(frame: &mut Frame, kind: PromptKind, buffer: &str) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(kind.title())
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(kind.hint(), Style::default().fg(TEXT_SECONDARY))),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(buffer.to_string(), Style::default().fg(TEXT_PRIMARY)),
            Span::styled("█", Style::default().fg(ACCENT_HIGHLIGHT)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to confirm, Esc to cancel",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Renders a loading overlay
pub fn render_loading_overlay(frame: &mut Frame, name: &str) {
    let loading_area = centered_rect(40, 30, frame.area());
    frame.render_widget(Clear, loading_area);

    let block = Block::default()
        .title(" Loading Preview ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(loading_area);
    frame.render_widget(block, loading_area);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {} ", helpers::spinner_frame(now)),
                Style::default().fg(ACCENT_HIGHLIGHT),
            ),
            Span::styled("Decoding image", Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", name),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
