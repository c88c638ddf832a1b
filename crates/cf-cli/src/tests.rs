use super::*;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use cf_core::TabKey;
use cf_nav::Router;
use cf_story::{GlossaryMode, TypewriterSpeed};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::agent::run_agent_with_io;
use crate::case_loader::{load_episodes, read_episodes_from_dir, resolve_case_dir, select_episode};
use crate::tui_actions::{handle_key, key_chord};
use crate::tui_state::TuiUiState;

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("casefile-rs-{}-{}", name, nanos))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn demo_case_dir() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
        .join("cases")
        .to_string_lossy()
        .to_string()
}

fn open_demo(initial_path: &str) -> Dashboard {
    let episodes = load_episodes(&demo_case_dir()).expect("demo case should load");
    let episode = select_episode(episodes, None).expect("demo episode");
    Dashboard::open(episode, initial_path).expect("dashboard should open")
}

fn run_script(dashboard: &mut Dashboard, script: &str) -> String {
    let mut reader = Cursor::new(script.as_bytes().to_vec());
    let mut out = Vec::new();
    let code = run_agent_with_io(dashboard, &mut reader, &mut out).expect("agent should run");
    assert_eq!(code, 0);
    String::from_utf8(out).expect("utf-8")
}

fn value_of<'a>(stdout: &'a str, key: &str) -> Vec<&'a str> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix(key))
        .collect()
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[test]
fn demo_case_loads_and_opens_on_canonical_chat_path() {
    let dashboard = open_demo("/dashboard");
    let tabs = dashboard.tabs().expect("mounted");
    assert_eq!(tabs.current_tab(), TabKey::Chat);
    assert_eq!(tabs.router().current_path(), "/dashboard/chat");
    assert_eq!(tabs.history().as_slice(), &[TabKey::Chat]);
    assert_eq!(dashboard.progress.current_scene, "briefing");
}

#[test]
fn initial_path_selects_starting_tab() {
    let dashboard = open_demo("/dashboard/team/");
    let tabs = dashboard.tabs().expect("mounted");
    assert_eq!(tabs.current_tab(), TabKey::Team);
    assert_eq!(tabs.router().current_path(), "/dashboard/team");
    // The briefing is a chat scene delivered while the team tab is shown.
    assert_eq!(tabs.notifications().get(TabKey::Chat), 2);
}

#[test]
fn agent_navigation_commands_follow_history() {
    let mut dashboard = open_demo("/dashboard/chat");
    let stdout = run_script(
        &mut dashboard,
        "tab files\nstate\nback\nstate\nkey ctrl+3\nstate\nquit\n",
    );

    assert_eq!(value_of(&stdout, "TAB:"), vec!["files", "chat", "files"]);
    assert_eq!(
        value_of(&stdout, "DIRECTION:"),
        vec!["forward", "backward", "forward"]
    );
    assert_eq!(
        value_of(&stdout, "HISTORY_JSON:").last().copied(),
        Some(r#"["chat","files","chat","files"]"#)
    );
    assert_eq!(value_of(&stdout, "BACK:"), vec!["chat"]);
    assert!(dashboard.tabs().is_err(), "agent closes the session on quit");
}

#[test]
fn agent_reports_errors_and_keeps_going() {
    let mut dashboard = open_demo("/dashboard/chat");
    let stdout = run_script(
        &mut dashboard,
        "tab nowhere\nkey ctrl+x+y\nfly\ntab data\nstate\n",
    );

    assert_eq!(
        value_of(&stdout, "ERROR_CODE:"),
        vec!["NAV_UNKNOWN_TAB", "NAV_KEY_INVALID", "CLI_AGENT_COMMAND"]
    );
    assert_eq!(value_of(&stdout, "TAB:"), vec!["data"]);
}

#[test]
fn agent_external_routes_and_router_history() {
    let mut dashboard = open_demo("/dashboard/chat");
    let stdout = run_script(
        &mut dashboard,
        "route /dashboard/data\nroute /dashboard/data/\nroute /elsewhere\nrouter-back\nrouter-forward\nrouter-forward\nstate\n",
    );

    assert_eq!(
        value_of(&stdout, "OUTCOME:"),
        vec![
            "applied:data",
            "unchanged",
            "echo",
            "applied:chat",
            "echo",
            "applied:data",
            "applied:chat",
        ]
    );
    assert_eq!(value_of(&stdout, "MOVED:"), vec!["true", "true", "false"]);
    assert_eq!(value_of(&stdout, "TAB:"), vec!["chat"]);
    assert_eq!(value_of(&stdout, "PATH:"), vec!["/dashboard/chat"]);
}

#[test]
fn agent_swipes_and_notifications() {
    let mut dashboard = open_demo("/dashboard/chat");
    let stdout = run_script(
        &mut dashboard,
        "swipe 120 0 200\nswipe -120 10 200\nswipe -120 10 900\nnotify team 3\nnotify team -5\nset-notify files 7\nclear files\nstate\n",
    );

    assert_eq!(value_of(&stdout, "HANDLED:"), vec!["false", "true", "false"]);
    assert_eq!(value_of(&stdout, "COUNT:"), vec!["3", "0", "7", "0"]);
    assert_eq!(value_of(&stdout, "TAB:"), vec!["data"]);
    assert_eq!(
        value_of(&stdout, "NOTIFICATIONS_JSON:"),
        vec![r#"{"chat":0,"data":0,"files":0,"team":0}"#]
    );
}

#[test]
fn agent_story_flow_raises_badges_off_screen() {
    let mut dashboard = open_demo("/dashboard/chat");
    let stdout = run_script(
        &mut dashboard,
        "choose accuse\nchoose pull-logs\nstate\ncontinue\nchoose press\ncontinue\nstate\n",
    );

    assert_eq!(value_of(&stdout, "ERROR_CODE:"), vec!["STORY_CHOICE_DISABLED"]);
    assert_eq!(
        value_of(&stdout, "NEXT:"),
        vec!["server-logs", "interview", "confrontation", "NONE"]
    );
    assert_eq!(
        value_of(&stdout, "NOTIFICATIONS_JSON:"),
        vec![
            r#"{"chat":0,"data":2,"files":1,"team":0}"#,
            r#"{"chat":0,"data":2,"files":2,"team":2}"#,
        ]
    );
    assert_eq!(
        value_of(&stdout, "EVIDENCE_JSON:"),
        vec![r#"["server-log"]"#, r#"["patch-notes","server-log"]"#]
    );
    assert_eq!(value_of(&stdout, "SCENE:"), vec!["server-logs", "confrontation"]);
    assert_eq!(value_of(&stdout, "PROGRESS:"), vec!["50", "100"]);
    assert_eq!(value_of(&stdout, "COMPLETED:"), vec!["false", "true"]);
}

#[test]
fn agent_timed_choice_expires_between_commands() {
    let mut dashboard = open_demo("/dashboard/chat");
    let stdout = run_script(
        &mut dashboard,
        "tick 14\nstate\ntick 1\nchoose wait-it-out\ntick 5\nstate\n",
    );

    assert_eq!(value_of(&stdout, "EXPIRED:"), vec!["wait-it-out"]);
    assert_eq!(value_of(&stdout, "ERROR_CODE:"), vec!["STORY_CHOICE_DISABLED"]);
    assert_eq!(value_of(&stdout, "SCENE:"), vec!["briefing", "briefing"]);
    assert!(dashboard.progress.made_choices.is_empty());
}

#[test]
fn agent_held_countdown_resets_on_next_scene() {
    let mut dashboard = open_demo("/dashboard/chat");
    let stdout = run_script(&mut dashboard, "tick 10\nchoose wait-it-out\nstate\n");
    assert_eq!(value_of(&stdout, "NEXT:"), vec!["interview"]);
    assert!(value_of(&stdout, "EXPIRED:").is_empty());
    assert_eq!(
        value_of(&stdout, "CHOICES_JSON:"),
        vec![r#"["press","reassure"]"#]
    );
    let countdowns = dashboard
        .choice_states()
        .iter()
        .map(|state| state.remaining_seconds())
        .collect::<Vec<_>>();
    assert_eq!(countdowns, vec![None, None]);
}

#[test]
fn agent_cannot_enter_locked_scene() {
    let root = temp_path("locked-scene");
    write_file(
        &root.join("a.case.json"),
        r#"{"id":"vault","number":1,"title":"Vault","entryScene":"hall",
            "evidence":[{"id":"key-card","kind":"document","title":"Key card"}],
            "scenes":[
                {"id":"hall","title":"Hall","messages":[{"id":"m1","sender":"Maya","content":"Door or desk?",
                    "choices":[
                        {"id":"door","text":"Try the door","nextScene":"vault"},
                        {"id":"desk","text":"Search the desk","nextScene":"vault",
                            "consequences":[{"kind":"evidenceUnlock","evidenceId":"key-card"}]}
                    ]}]},
                {"id":"vault","title":"Vault","requirements":{"evidence":["key-card"]}}
            ]}"#,
    );
    let episode = select_episode(read_episodes_from_dir(&root).expect("episodes"), None)
        .expect("episode");
    let mut dashboard = Dashboard::open(episode, "/dashboard/chat").expect("dashboard");
    let stdout = run_script(&mut dashboard, "choose door\nstate\nchoose desk\nstate\n");

    assert_eq!(value_of(&stdout, "ERROR_CODE:"), vec!["STORY_SCENE_LOCKED"]);
    assert_eq!(value_of(&stdout, "NEXT:"), vec!["vault"]);
    assert_eq!(value_of(&stdout, "SCENE:"), vec!["hall", "vault"]);
    assert_eq!(value_of(&stdout, "PROGRESS:"), vec!["50", "100"]);
    assert_eq!(value_of(&stdout, "COMPLETED:"), vec!["false", "false"]);
}

#[test]
fn case_dir_validation_reports_codes() {
    let missing = temp_path("missing-dir");
    let missing_err =
        resolve_case_dir(missing.to_string_lossy().as_ref()).expect_err("missing path");
    assert_eq!(missing_err.code, "CLI_CASE_NOT_FOUND");

    let file_path = temp_path("plain-file");
    write_file(&file_path, "x");
    let file_err = resolve_case_dir(file_path.to_string_lossy().as_ref()).expect_err("file path");
    assert_eq!(file_err.code, "CLI_CASE_NOT_DIR");

    let empty = temp_path("empty-dir");
    fs::create_dir_all(&empty).expect("empty dir");
    write_file(&empty.join("notes.json"), "{}");
    let empty_err = read_episodes_from_dir(&empty).expect_err("no case files");
    assert_eq!(empty_err.code, "CLI_CASE_EMPTY");
}

#[test]
fn invalid_case_files_are_rejected() {
    let broken = temp_path("broken-json");
    write_file(&broken.join("a.case.json"), "{ not json");
    let error = read_episodes_from_dir(&broken).expect_err("broken json");
    assert_eq!(error.code, "STORY_CASE_INVALID");

    let dangling = temp_path("dangling-scene");
    write_file(
        &dangling.join("a.case.json"),
        r#"{"id":"x","number":1,"title":"X","entryScene":"s1",
            "scenes":[{"id":"s1","title":"S1","nextScene":"gone"}]}"#,
    );
    let error = read_episodes_from_dir(&dangling).expect_err("dangling next scene");
    assert_eq!(error.code, "STORY_CASE_INVALID");
    assert!(error.message.contains("gone"));
}

#[test]
fn case_files_with_unknown_ids_are_rejected() {
    let cases = [
        (
            "unknown-evidence-unlock",
            r#"{"kind":"evidenceUnlock","evidenceId":"forged-memo"}"#,
            r#""behavior":{"kind":"standard"}"#,
            r#"{}"#,
            "forged-memo",
        ),
        (
            "unknown-scene-unlock",
            r#"{"kind":"sceneUnlock","sceneId":"epilogue"}"#,
            r#""behavior":{"kind":"standard"}"#,
            r#"{}"#,
            "epilogue",
        ),
        (
            "unknown-required-evidence",
            r#"{"kind":"relationshipDelta","character":"chief","delta":1}"#,
            r#""behavior":{"kind":"required","evidence":["shredded-note"]}"#,
            r#"{}"#,
            "shredded-note",
        ),
        (
            "unknown-requirement-evidence",
            r#"{"kind":"relationshipDelta","character":"chief","delta":1}"#,
            r#""behavior":{"kind":"standard"}"#,
            r#"{"evidence":["alibi"]}"#,
            "alibi",
        ),
        (
            "unknown-requirement-choice",
            r#"{"kind":"relationshipDelta","character":"chief","delta":1}"#,
            r#""behavior":{"kind":"standard"}"#,
            r#"{"choices":["bribe"]}"#,
            "bribe",
        ),
    ];
    for (name, consequence, behavior, requirements, missing) in cases {
        let dir = temp_path(name);
        write_file(
            &dir.join("a.case.json"),
            &format!(
                r#"{{"id":"x","number":1,"title":"X","entryScene":"s1",
                    "evidence":[{{"id":"log","kind":"log","title":"Log"}}],
                    "scenes":[
                        {{"id":"s1","title":"S1","messages":[{{"id":"m1","sender":"a","content":"?",
                            "choices":[{{"id":"go","text":"Go","nextScene":"s2",
                                "consequences":[{}],{}}}]}}]}},
                        {{"id":"s2","title":"S2","requirements":{}}}
                    ]}}"#,
                consequence, behavior, requirements
            ),
        );
        let error = read_episodes_from_dir(&dir).expect_err(name);
        assert_eq!(error.code, "STORY_CASE_INVALID", "{}", name);
        assert!(error.message.contains(missing), "{}: {}", name, error.message);
    }

    let valid = temp_path("known-ids");
    write_file(
        &valid.join("a.case.json"),
        r#"{"id":"x","number":1,"title":"X","entryScene":"s1",
            "evidence":[{"id":"log","kind":"log","title":"Log"}],
            "scenes":[
                {"id":"s1","title":"S1","messages":[{"id":"m1","sender":"a","content":"?",
                    "choices":[{"id":"go","text":"Go","nextScene":"s2",
                        "consequences":[{"kind":"evidenceUnlock","evidenceId":"log"},
                                        {"kind":"sceneUnlock","sceneId":"s2"}]}]}]},
                {"id":"s2","title":"S2","requirements":{"evidence":["log"],"choices":["go"]}}
            ]}"#,
    );
    assert!(read_episodes_from_dir(&valid).is_ok());
}

#[test]
fn episodes_are_ordered_and_selectable() {
    let root = temp_path("two-episodes");
    for (file, id, number) in [("b.case.json", "second", 2), ("a.case.json", "first", 1)] {
        write_file(
            &root.join(file),
            &format!(
                r#"{{"id":"{}","number":{},"title":"T","entryScene":"s","scenes":[{{"id":"s","title":"S"}}]}}"#,
                id, number
            ),
        );
    }
    let episodes = read_episodes_from_dir(&root).expect("episodes");
    let ids = episodes.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["first", "second"]);

    let picked = select_episode(episodes.clone(), Some("second")).expect("second");
    assert_eq!(picked.number, 2);
    let error = select_episode(episodes, Some("third")).expect_err("unknown");
    assert_eq!(error.code, "CLI_EPISODE_NOT_FOUND");
    let error = select_episode(Vec::new(), None).expect_err("empty");
    assert_eq!(error.code, "CLI_CASE_EMPTY");
}

#[test]
fn key_chord_maps_crossterm_modifiers() {
    let chord = key_chord(&press(KeyCode::Char('2'), KeyModifiers::CONTROL)).expect("chord");
    assert_eq!(chord.tab_shortcut(), Some(TabKey::Data));
    let chord = key_chord(&press(KeyCode::Char('4'), KeyModifiers::SUPER)).expect("chord");
    assert_eq!(chord.tab_shortcut(), Some(TabKey::Team));
    let chord = key_chord(&press(KeyCode::Char('4'), KeyModifiers::ALT)).expect("chord");
    assert_eq!(chord.tab_shortcut(), None);
    assert!(key_chord(&press(KeyCode::Left, KeyModifiers::CONTROL)).is_none());
}

#[test]
fn tui_keys_switch_tabs_and_mark_them_read() {
    let mut dashboard = open_demo("/dashboard/chat");
    let mut ui = TuiUiState::new(TypewriterSpeed::Off, GlossaryMode::Detective);
    ui.sync_scene(&dashboard).expect("scene");
    dashboard
        .tabs_mut()
        .expect("mounted")
        .add_notification(TabKey::Files, 4);

    let quit = handle_key(
        press(KeyCode::Char('3'), KeyModifiers::CONTROL),
        &mut dashboard,
        &mut ui,
    )
    .expect("ctrl+3");
    assert!(!quit);
    let tabs = dashboard.tabs().expect("mounted");
    assert_eq!(tabs.current_tab(), TabKey::Files);
    assert_eq!(tabs.notifications().get(TabKey::Files), 0);

    handle_key(press(KeyCode::Right, KeyModifiers::NONE), &mut dashboard, &mut ui).expect("right");
    handle_key(press(KeyCode::Right, KeyModifiers::NONE), &mut dashboard, &mut ui).expect("right");
    assert_eq!(dashboard.tabs().expect("mounted").current_tab(), TabKey::Team);

    handle_key(press(KeyCode::Backspace, KeyModifiers::NONE), &mut dashboard, &mut ui)
        .expect("back");
    let tabs = dashboard.tabs().expect("mounted");
    assert_eq!(tabs.current_tab(), TabKey::Files);
    assert_eq!(
        tabs.history().as_slice(),
        &[TabKey::Chat, TabKey::Files, TabKey::Team, TabKey::Files]
    );

    assert!(handle_key(press(KeyCode::Char('q'), KeyModifiers::NONE), &mut dashboard, &mut ui)
        .expect("quit"));
}

#[test]
fn tui_enter_picks_selected_choice_on_chat_only() {
    let mut dashboard = open_demo("/dashboard/chat");
    let mut ui = TuiUiState::new(TypewriterSpeed::Off, GlossaryMode::Normal);
    assert!(ui.sync_scene(&dashboard).expect("scene"));
    assert!(!ui.sync_scene(&dashboard).expect("same scene"));
    assert_eq!(dashboard.choice_states().len(), 3);
    assert!(ui
        .feed
        .rendered_lines()
        .iter()
        .any(|line| line.starts_with("Maya: Kestrel")));

    handle_key(press(KeyCode::Right, KeyModifiers::NONE), &mut dashboard, &mut ui).expect("right");
    handle_key(press(KeyCode::Enter, KeyModifiers::NONE), &mut dashboard, &mut ui).expect("enter");
    assert_eq!(ui.status, "choices live on the chat tab");
    assert_eq!(dashboard.progress.current_scene, "briefing");

    handle_key(press(KeyCode::Left, KeyModifiers::NONE), &mut dashboard, &mut ui).expect("left");
    handle_key(press(KeyCode::Enter, KeyModifiers::NONE), &mut dashboard, &mut ui).expect("enter");
    assert_eq!(dashboard.progress.current_scene, "server-logs");
    assert!(dashboard.choice_states().is_empty());
    assert!(!dashboard.progress.completed);
    assert!(ui
        .feed
        .rendered_lines()
        .iter()
        .any(|line| line == "  [attached] Matchmaking server logs"));
}

#[test]
fn tui_timed_choice_expires_and_blocks_enter() {
    let mut dashboard = open_demo("/dashboard/chat");
    let mut ui = TuiUiState::new(TypewriterSpeed::Off, GlossaryMode::Normal);
    ui.sync_scene(&dashboard).expect("scene");
    handle_key(press(KeyCode::Down, KeyModifiers::NONE), &mut dashboard, &mut ui).expect("down");
    assert_eq!(
        ui.selected_choice(&dashboard).expect("selected").choice().id,
        "wait-it-out"
    );

    let mut expired = Vec::new();
    for _ in 0..15 {
        expired.extend(dashboard.tick_countdowns());
    }
    assert_eq!(
        expired.iter().map(|choice| choice.text.as_str()).collect::<Vec<_>>(),
        vec!["Wait for the numbers to settle"]
    );

    let error = handle_key(press(KeyCode::Enter, KeyModifiers::NONE), &mut dashboard, &mut ui)
        .expect_err("expired choice");
    assert_eq!(error.code, "STORY_CHOICE_DISABLED");
    assert_eq!(dashboard.progress.current_scene, "briefing");
}

#[test]
fn tui_choice_selection_stays_in_bounds() {
    let dashboard = open_demo("/dashboard/chat");
    let mut ui = TuiUiState::new(TypewriterSpeed::Off, GlossaryMode::None);
    ui.sync_scene(&dashboard).expect("scene");
    ui.select_previous();
    assert_eq!(ui.selected_choice_index, 0);
    for _ in 0..10 {
        ui.select_next(dashboard.choice_states().len());
    }
    assert_eq!(ui.selected_choice_index, 2);
    assert_eq!(ui.choice_scroll_offset, 0);
}

#[test]
fn cli_parse_errors_return_clap_exit_code() {
    assert_eq!(run_cli_from_args(["casefile", "bogus"]), 2);
}

#[test]
fn cli_reports_missing_case_dir() {
    let missing = temp_path("cli-missing").to_string_lossy().to_string();
    let code = run_cli_from_args(["casefile", "agent", "--case-dir", missing.as_str()]);
    assert_eq!(code, 1);
}
