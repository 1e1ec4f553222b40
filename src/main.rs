use approveit::async_preview::SyncPreviewManager;
use approveit::cli::{AppConfig, Args};
use approveit::config::UserConfig;
use approveit::logging::init_logging;
use approveit::tui::{
    handle_key_event, handle_prompt_input, render_with_preview, KeyAction, PromptKind,
    PromptOutcome, UiState, ViewState, Zoom,
};
use approveit::{
    open_file, open_session, ApproveError, Intent, Label, NavDirection, Result, ReviewSession,
};

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::{Path, PathBuf};
use std::{io, process, time::Duration};
use tracing::{error, info, warn};

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let config: AppConfig = args.into();

    let log_guard = match init_logging(config.verbose) {
        Ok((dir, guard)) => {
            info!(log_dir = %dir.display(), "approveit starting");
            Some(guard)
        }
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    if let Err(e) = run_app_with_config(&config) {
        error!(error = %e, "exiting with error");
        eprintln!("Error: {}", e);
        drop(log_guard);
        process::exit(1);
    }
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> Result<()> {
    let mut user_config = UserConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default user config");
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let history_depth = config.effective_history_depth(&user_config);
    let mut session =
        match open_session(&config.directory, &config.discovery_options(), history_depth) {
            Ok(session) => session,
            Err(ApproveError::NoImagesFound(dir)) => {
                println!("No valid image files found in {}", dir.display());
                return Ok(());
            }
            Err(e) => return Err(e),
        };

    let mut preview_manager = SyncPreviewManager::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(
        &mut terminal,
        &mut session,
        &mut preview_manager,
        config,
        &mut user_config,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let counts = session.counts();
    info!(
        processed = counts.processed,
        remaining = counts.remaining,
        "session closed"
    );

    result
}

/// Suspends the TUI terminal to allow external programs to run
fn suspend_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Resumes the TUI terminal after external program exits
fn resume_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    session: &mut ReviewSession,
    preview_manager: &mut SyncPreviewManager,
    config: &AppConfig,
    user_config: &mut UserConfig,
) -> Result<()> {
    let should_show_welcome = config.show_welcome || !user_config.welcome_shown;
    let mut ui = UiState::new(
        Zoom::from_factor(user_config.default_zoom),
        should_show_welcome,
        &session.snapshot(),
    );

    loop {
        let snapshot = session.snapshot();
        let folder = session.layout().original.clone();

        terminal.draw(|frame| {
            render_with_preview(frame, &snapshot, &ui, &folder, preview_manager);
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match ui.view {
            ViewState::Welcome => {
                // Any key dismisses welcome
                ui.resume(&snapshot);
                user_config.welcome_shown = true;
                if let Err(e) = user_config.save() {
                    warn!(error = %e, "failed to save user config");
                }
                continue;
            }
            ViewState::Help => {
                if matches!(
                    handle_key_event(key),
                    KeyAction::Help | KeyAction::Quit | KeyAction::None
                ) {
                    ui.resume(&snapshot);
                }
                continue;
            }
            ViewState::Prompt(_) => {
                match ui.edit_prompt(handle_prompt_input(key)) {
                    PromptOutcome::Editing => {}
                    PromptOutcome::Cancelled => ui.resume(&snapshot),
                    PromptOutcome::Submitted(PromptKind::Rename, name) => {
                        let old_path = current_path(session);
                        apply_intent(session, &mut ui, Intent::Rename(name));
                        if let Some(old_path) = old_path.filter(|p| !p.exists()) {
                            preview_manager.invalidate(&old_path);
                        }
                    }
                    PromptOutcome::Submitted(PromptKind::SelectFolder, input) => {
                        switch_folder(session, &mut ui, config, user_config, &input);
                    }
                }
                continue;
            }
            ViewState::Browsing | ViewState::Done => {}
        }

        match handle_key_event(key) {
            KeyAction::Quit => break,
            KeyAction::Approve => {
                apply_intent(session, &mut ui, Intent::Classify(Label::Approved));
            }
            KeyAction::Disapprove => {
                apply_intent(session, &mut ui, Intent::Classify(Label::Disapproved));
            }
            KeyAction::Next => {
                apply_intent(session, &mut ui, Intent::Navigate(NavDirection::Next));
            }
            KeyAction::Previous => {
                apply_intent(session, &mut ui, Intent::Navigate(NavDirection::Previous));
            }
            KeyAction::Undo => {
                if session.undo_available() {
                    apply_intent(session, &mut ui, Intent::Undo);
                } else {
                    ui.info("Nothing to undo");
                }
            }
            KeyAction::ZoomIn => change_zoom(&mut ui, snapshot.current.is_some(), Zoom::zoom_in),
            KeyAction::ZoomOut => change_zoom(&mut ui, snapshot.current.is_some(), Zoom::zoom_out),
            KeyAction::ResetZoom => change_zoom(&mut ui, snapshot.current.is_some(), Zoom::reset),
            KeyAction::Rename => {
                if let Some(name) = snapshot.current.as_deref() {
                    let stem = Path::new(name)
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    ui.open_prompt(PromptKind::Rename, stem);
                }
            }
            KeyAction::SelectFolder => {
                ui.open_prompt(PromptKind::SelectFolder, folder.display().to_string());
            }
            KeyAction::OpenExternal => {
                let Some(path) = current_path(session) else {
                    continue;
                };

                suspend_terminal(terminal)?;
                let open_result = open_file(&path);
                resume_terminal(terminal)?;

                if let Err(e) = open_result {
                    ui.error(format!("Failed to open {}: {}", path.display(), e));
                }
            }
            KeyAction::Help => ui.view = ViewState::Help,
            KeyAction::None => {}
        }
    }

    Ok(())
}

fn change_zoom(ui: &mut UiState, has_image: bool, step: fn(&mut Zoom) -> bool) {
    if has_image && step(&mut ui.zoom) {
        ui.info(format!("Zoom {}%", ui.zoom.percent()));
    }
}

fn current_path(session: &ReviewSession) -> Option<PathBuf> {
    session
        .current()
        .map(|name| session.layout().original.join(name))
}

/// Sends an intent to the session and reflects the outcome in the status line
fn apply_intent(session: &mut ReviewSession, ui: &mut UiState, intent: Intent) {
    let before = session.current().map(str::to_string);
    let outcome = session.apply(intent.clone());

    match outcome.error {
        Some(e) => ui.error(e.to_string()),
        None => {
            let after = outcome.snapshot.current.as_deref();
            if let Some(text) = describe(&intent, before.as_deref(), after) {
                ui.info(text);
            }
        }
    }
    ui.resume(&outcome.snapshot);
}

/// Status text for a successful intent
fn describe(intent: &Intent, before: Option<&str>, after: Option<&str>) -> Option<String> {
    match (intent, before, after) {
        (Intent::Classify(label), Some(name), _) => Some(format!("{} → {}/", name, label)),
        (Intent::Rename(_), Some(old), Some(new)) if old != new => Some(format!("Renamed {} to {}", old, new)),
        (Intent::Undo, _, _) => Some("Undone".to_string()),
        _ => None,
    }
}

/// Replaces the session with one over `input`; on failure the current session stays
fn switch_folder(
    session: &mut ReviewSession,
    ui: &mut UiState,
    config: &AppConfig,
    user_config: &UserConfig,
    input: &str,
) {
    let folder = expand_home(input.trim());
    let depth = config.effective_history_depth(user_config);

    match open_session(&folder, &config.discovery_options(), depth) {
        Ok(new_session) => {
            *session = new_session;
            ui.zoom.reset();
            ui.info(format!(
                "Opened {} ({} images)",
                session.layout().original.display(),
                session.counts().remaining
            ));
        }
        Err(e) => {
            warn!(folder = %folder.display(), error = %e, "folder selection failed");
            ui.error(e.to_string());
        }
    }
    ui.resume(&session.snapshot());
}

/// Expands a leading `~` to the home directory
fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(input),
    }
}
