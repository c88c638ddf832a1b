#[cfg(coverage)]
pub(super) fn run_tui_ratatui_mode(
    dashboard: &mut super::dashboard::Dashboard,
    _config: &super::config::CaseFileConfig,
) -> Result<i32, cf_core::CaseFileError> {
    super::agent::run_agent(dashboard)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::{Duration, Instant};

    use cf_core::CaseFileError;
    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;
    use tracing::debug;

    use crate::config::CaseFileConfig;
    use crate::dashboard::Dashboard;
    use crate::map_tui_io;
    use crate::tui_actions::{after_navigation, handle_key};
    use crate::tui_render::render_tui;
    use crate::tui_state::TuiUiState;

    const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
    const IDLE_POLL: Duration = Duration::from_millis(50);

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, CaseFileError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }

        fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
            &mut self.terminal
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(crate) fn run_tui_ratatui_mode(
        dashboard: &mut Dashboard,
        config: &CaseFileConfig,
    ) -> Result<i32, CaseFileError> {
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState::new(config.typewriter_speed, config.glossary_mode);
        ui.sync_scene(dashboard)?;
        after_navigation(dashboard, &mut ui)?;

        let char_delay = config.typewriter_speed.char_delay();
        let typing_tick = if char_delay.is_zero() {
            IDLE_POLL
        } else {
            char_delay
        };
        let mut last_typing = Instant::now();
        let mut last_countdown = Instant::now();

        loop {
            terminal
                .terminal_mut()
                .draw(|frame| render_tui(frame, &ui, dashboard))
                .map_err(map_tui_io)?;

            if last_typing.elapsed() >= typing_tick {
                ui.feed.tick();
                last_typing = Instant::now();
            }
            if ui.typing_in_progress() {
                last_countdown = Instant::now();
            } else if last_countdown.elapsed() >= COUNTDOWN_TICK {
                for expired in dashboard.tick_countdowns() {
                    debug!(choice = %expired.id, "timed choice expired");
                    ui.status = format!("time ran out for \"{}\"", expired.text);
                }
                last_countdown = Instant::now();
            }

            let timeout = typing_tick
                .saturating_sub(last_typing.elapsed())
                .min(IDLE_POLL);
            if !event::poll(timeout).map_err(map_tui_io)? {
                continue;
            }

            let evt = event::read().map_err(map_tui_io)?;
            if let Event::Key(key) = evt {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let should_quit = match handle_key(key, dashboard, &mut ui) {
                    Ok(should_quit) => should_quit,
                    Err(error) => {
                        ui.status = error.message;
                        false
                    }
                };
                if should_quit {
                    break;
                }
            }
        }

        dashboard.close();
        Ok(0)
    }
}

#[cfg(not(coverage))]
pub(super) use rich::run_tui_ratatui_mode;
