use cf_core::{CaseFileError, TabKey};
use cf_nav::{adjacent_tab, KeyChord, Modifiers, SwipeStep};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dashboard::Dashboard;
use crate::tui_state::TuiUiState;

/// Applies one key press. Returns `true` when the user asked to quit.
pub(crate) fn handle_key(
    key: KeyEvent,
    dashboard: &mut Dashboard,
    ui: &mut TuiUiState,
) -> Result<bool, CaseFileError> {
    if key.code == KeyCode::Esc || key.code == KeyCode::Char('q') {
        return Ok(true);
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    if let Some(chord) = key_chord(&key) {
        if chord.modifiers.is_command() {
            if dashboard.tabs_mut()?.handle_key(&chord) {
                return after_navigation(dashboard, ui);
            }
            return Ok(false);
        }
    }

    match key.code {
        KeyCode::Char('h') => {
            ui.help_visible = !ui.help_visible;
        }
        KeyCode::Char(' ') => {
            if ui.feed.skip() {
                ui.status = "skipped".to_string();
            }
        }
        KeyCode::Left | KeyCode::BackTab => {
            step_tab(dashboard, SwipeStep::Previous)?;
            return after_navigation(dashboard, ui);
        }
        KeyCode::Right | KeyCode::Tab => {
            step_tab(dashboard, SwipeStep::Next)?;
            return after_navigation(dashboard, ui);
        }
        KeyCode::Backspace => {
            if dashboard.tabs_mut()?.go_back().is_none() {
                ui.status = "no previous tab".to_string();
                return Ok(false);
            }
            return after_navigation(dashboard, ui);
        }
        KeyCode::Up => {
            if let Some(blocked) = choice_blocked(dashboard, ui)? {
                ui.status = blocked.to_string();
                return Ok(false);
            }
            ui.select_previous();
        }
        KeyCode::Down => {
            if let Some(blocked) = choice_blocked(dashboard, ui)? {
                ui.status = blocked.to_string();
                return Ok(false);
            }
            ui.select_next(dashboard.choice_states().len());
        }
        KeyCode::Enter => {
            if ui.typing_in_progress() {
                ui.status = "text streaming...".to_string();
                return Ok(false);
            }
            if dashboard.tabs()?.current_tab() != TabKey::Chat {
                ui.status = "choices live on the chat tab".to_string();
                return Ok(false);
            }
            if dashboard.choice_states().is_empty() {
                return continue_story(dashboard, ui);
            }
            let state = ui
                .selected_choice(dashboard)
                .cloned()
                .ok_or_else(|| CaseFileError::new("TUI_CHOICE_PARSE", "No choices available"))?;
            dashboard.choose(&state)?;
            ui.status = format!("chose \"{}\"", state.choice().text);
            ui.sync_scene(dashboard)?;
            dashboard.sync()?;
        }
        _ => {}
    }

    Ok(false)
}

/// Maps a crossterm key with a modifier onto the chord the tab shortcuts
/// understand.
pub(crate) fn key_chord(key: &KeyEvent) -> Option<KeyChord> {
    let KeyCode::Char(ch) = key.code else {
        return None;
    };
    let modifiers = Modifiers {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        meta: key.modifiers.contains(KeyModifiers::SUPER)
            || key.modifiers.contains(KeyModifiers::META),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    };
    Some(KeyChord::new(modifiers, ch))
}

fn step_tab(dashboard: &mut Dashboard, step: SwipeStep) -> Result<(), CaseFileError> {
    let tabs = dashboard.tabs_mut()?;
    let target = adjacent_tab(tabs.current_tab(), step);
    tabs.set_tab(target);
    Ok(())
}

/// Drains the router and marks the now visible tab as read.
pub(crate) fn after_navigation(
    dashboard: &mut Dashboard,
    ui: &mut TuiUiState,
) -> Result<bool, CaseFileError> {
    dashboard.sync()?;
    let tabs = dashboard.tabs_mut()?;
    let current = tabs.current_tab();
    tabs.clear_notifications(current);
    ui.status = format!("{} ({})", current.title(), tabs.transition_direction());
    Ok(false)
}

fn continue_story(dashboard: &mut Dashboard, ui: &mut TuiUiState) -> Result<bool, CaseFileError> {
    if dashboard.progress.completed {
        ui.status = "case closed".to_string();
        return Ok(false);
    }
    match dashboard.advance()? {
        Some(scene) => {
            ui.sync_scene(dashboard)?;
            dashboard.sync()?;
            ui.status = format!("entered {} ({}%)", scene, dashboard.progress_percent());
        }
        None if dashboard.progress.completed => ui.status = "case closed".to_string(),
        None => ui.status = "no pending choice".to_string(),
    }
    Ok(false)
}

fn choice_blocked(
    dashboard: &Dashboard,
    ui: &TuiUiState,
) -> Result<Option<&'static str>, CaseFileError> {
    if ui.typing_in_progress() {
        return Ok(Some("text streaming..."));
    }
    if dashboard.tabs()?.current_tab() != TabKey::Chat {
        return Ok(Some("choices live on the chat tab"));
    }
    if dashboard.choice_states().is_empty() {
        return Ok(Some("no pending choice"));
    }
    Ok(None)
}
