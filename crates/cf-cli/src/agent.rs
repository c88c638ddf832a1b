use std::io::{self, BufRead, Write};

use cf_core::{CaseFileError, TabKey};
use cf_nav::{KeyChord, NavigateOptions, Router, SwipeGesture};
use tracing::debug;

use crate::dashboard::{outcome_label, Dashboard};
use crate::{map_agent_io, write_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AgentAction {
    Continue,
    Quit,
}

pub(crate) fn run_agent(dashboard: &mut Dashboard) -> Result<i32, CaseFileError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_agent_with_io(dashboard, &mut reader, &mut writer)
}

/// Reads one command per line until `quit` or end of input. A failing
/// command reports its error and the session keeps going.
pub(crate) fn run_agent_with_io(
    dashboard: &mut Dashboard,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, CaseFileError> {
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(map_agent_io)?;
        if read == 0 {
            break;
        }
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let mut out = Vec::new();
        match handle_agent_cmd(raw, dashboard, &mut |entry| out.push(entry)) {
            Ok(action) => {
                writeln!(writer, "RESULT:OK").map_err(map_agent_io)?;
                for entry in out {
                    writeln!(writer, "{}", entry).map_err(map_agent_io)?;
                }
                if action == AgentAction::Quit {
                    break;
                }
            }
            Err(error) => {
                debug!(command = raw, code = %error.code, "agent command failed");
                write_error(writer, &error);
            }
        }
        writer.flush().map_err(map_agent_io)?;
    }

    dashboard.close();
    Ok(0)
}

pub(crate) fn handle_agent_cmd(
    raw: &str,
    dashboard: &mut Dashboard,
    emit: &mut dyn FnMut(String),
) -> Result<AgentAction, CaseFileError> {
    let mut parts = raw.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args = parts.collect::<Vec<_>>();

    match command {
        "tab" => {
            let changed = dashboard.tabs_mut()?.set_tab_by_id(arg(&args, 0)?)?;
            dashboard.sync()?;
            emit(format!("CHANGED:{}", changed));
        }
        "route" => {
            let path = arg(&args, 0)?;
            dashboard
                .tabs_mut()?
                .router_mut()
                .navigate(path, NavigateOptions::default());
            for outcome in dashboard.sync()? {
                emit(format!("OUTCOME:{}", outcome_label(outcome)));
            }
        }
        "back" => {
            let target = dashboard.tabs_mut()?.go_back();
            dashboard.sync()?;
            emit(format!(
                "BACK:{}",
                target.map(|tab| tab.id()).unwrap_or("NONE")
            ));
        }
        "router-back" | "router-forward" => {
            let tabs = dashboard.tabs_mut()?;
            let outcomes = if command == "router-back" {
                tabs.router_back()
            } else {
                tabs.router_forward()
            };
            emit(format!("MOVED:{}", !outcomes.is_empty()));
            for outcome in outcomes {
                emit(format!("OUTCOME:{}", outcome_label(outcome)));
            }
        }
        "key" => {
            let chord = arg(&args, 0)?.parse::<KeyChord>()?;
            let handled = dashboard.tabs_mut()?.handle_key(&chord);
            dashboard.sync()?;
            emit(format!("HANDLED:{}", handled));
        }
        "swipe" => {
            let gesture = SwipeGesture {
                dx: number_arg(&args, 0)?,
                dy: number_arg(&args, 1)?,
                elapsed_ms: number_arg(&args, 2)?,
            };
            let handled = dashboard.tabs_mut()?.handle_swipe(&gesture);
            dashboard.sync()?;
            emit(format!("HANDLED:{}", handled));
        }
        "notify" | "set-notify" => {
            let tab = arg(&args, 0)?.parse::<TabKey>()?;
            let count: i64 = number_arg(&args, 1)?;
            let tabs = dashboard.tabs_mut()?;
            let value = if command == "notify" {
                tabs.add_notification(tab, count)
            } else {
                tabs.set_notification_count(tab, count)
            };
            emit(format!("COUNT:{}", value));
        }
        "clear" => {
            let tab = arg(&args, 0)?.parse::<TabKey>()?;
            dashboard.tabs_mut()?.clear_notifications(tab);
            emit("COUNT:0".to_string());
        }
        "choose" => {
            let next = dashboard.choose_by_id(arg(&args, 0)?)?;
            emit(format!("NEXT:{}", next.as_deref().unwrap_or("NONE")));
        }
        "tick" => {
            let seconds: u32 = number_arg(&args, 0)?;
            for _ in 0..seconds {
                for expired in dashboard.tick_countdowns() {
                    emit(format!("EXPIRED:{}", expired.id));
                }
            }
        }
        "continue" => {
            let next = dashboard.advance()?;
            emit(format!("NEXT:{}", next.as_deref().unwrap_or("NONE")));
        }
        "state" => emit_state(dashboard, emit)?,
        "quit" => return Ok(AgentAction::Quit),
        _ => {
            return Err(CaseFileError::new(
                "CLI_AGENT_COMMAND",
                format!("Unknown command: {}", command),
            ))
        }
    }
    Ok(AgentAction::Continue)
}

fn emit_state(dashboard: &Dashboard, emit: &mut dyn FnMut(String)) -> Result<(), CaseFileError> {
    let tabs = dashboard.tabs()?;
    let snapshot = tabs.snapshot();
    emit(format!("TAB:{}", snapshot.current_tab));
    emit(format!("DIRECTION:{}", snapshot.transition_direction));
    emit(format!("PATH:{}", tabs.router().current_path()));
    emit(format!("HISTORY_JSON:{}", to_json(&snapshot.history)));
    emit(format!("NOTIFICATIONS_JSON:{}", to_json(&snapshot.notifications)));
    emit(format!("SCENE:{}", dashboard.progress.current_scene));
    emit(format!(
        "EVIDENCE_JSON:{}",
        to_json(&dashboard.progress.collected_evidence)
    ));
    emit(format!("PROGRESS:{}", dashboard.progress_percent()));
    emit(format!("COMPLETED:{}", dashboard.progress.completed));
    let choices = dashboard
        .choice_states()
        .iter()
        .map(|state| state.choice().id.clone())
        .collect::<Vec<_>>();
    emit(format!("CHOICES_JSON:{}", to_json(&choices)));
    Ok(())
}

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn arg<'a>(args: &[&'a str], index: usize) -> Result<&'a str, CaseFileError> {
    args.get(index).copied().ok_or_else(|| {
        CaseFileError::new(
            "CLI_AGENT_ARGUMENT",
            format!("Missing argument #{}", index + 1),
        )
    })
}

fn number_arg<T: std::str::FromStr>(args: &[&str], index: usize) -> Result<T, CaseFileError> {
    let raw = arg(args, index)?;
    raw.parse::<T>().map_err(|_| {
        CaseFileError::new(
            "CLI_AGENT_ARGUMENT",
            format!("Argument #{} is not a number: {}", index + 1, raw),
        )
    })
}
