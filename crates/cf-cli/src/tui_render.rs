#![cfg(not(coverage))]

use cf_core::TabKey;
use cf_story::{BadgeTone, GlossaryMode, Segment};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::dashboard::Dashboard;
use crate::tui_state::{TuiUiState, CHOICE_VIEWPORT_ROWS};

const ELLIPSIS: &str = "…";

pub(crate) fn render_tui(frame: &mut Frame<'_>, ui: &TuiUiState, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = truncate_to_width(
        &format!(
            "Episode {} | {} | {}%",
            dashboard.episode.number,
            dashboard.episode.title,
            dashboard.progress_percent()
        ),
        chunks[0].width as usize,
    );
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let Ok(tabs) = dashboard.tabs() else {
        frame.render_widget(Paragraph::new("dashboard is not mounted"), chunks[2]);
        return;
    };
    draw_tab_bar(frame, chunks[1], tabs.current_tab(), |tab| {
        tabs.notifications().get(tab)
    });

    match tabs.current_tab() {
        TabKey::Chat => draw_chat_tab(frame, chunks[2], ui, dashboard),
        TabKey::Data => draw_data_tab(frame, chunks[2], dashboard),
        TabKey::Files => draw_files_tab(frame, chunks[2], dashboard),
        TabKey::Team => draw_team_tab(frame, chunks[2], dashboard),
    }

    draw_footer(frame, chunks[3], ui);
}

fn draw_tab_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    current: TabKey,
    unread: impl Fn(TabKey) -> u32,
) {
    let titles = TabKey::ALL
        .iter()
        .map(|tab| {
            let mut spans = vec![
                Span::styled(
                    format!("^{}:", tab.shortcut()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(tab.title()),
            ];
            let count = unread(*tab);
            if count > 0 {
                spans.push(Span::styled(
                    format!(" ({})", count),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            }
            Line::from(spans)
        })
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(current.ordinal())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");
    frame.render_widget(tabs, area);
}

fn draw_chat_tab(frame: &mut Frame<'_>, area: Rect, ui: &TuiUiState, dashboard: &Dashboard) {
    let show_choices = !ui.typing_in_progress() && !dashboard.choice_states().is_empty();
    let choice_rows = if show_choices {
        CHOICE_VIEWPORT_ROWS as u16 + 1
    } else if dashboard.progress.completed && !ui.typing_in_progress() {
        1
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(choice_rows)])
        .split(area);

    let lines = ui
        .feed
        .lines()
        .into_iter()
        .map(|line| glossary_line(dashboard, &line, ui.glossary_mode))
        .collect::<Vec<_>>();
    let width = chunks[0].width.max(1) as usize;
    let total_rows = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum::<usize>();
    let scroll = total_rows.saturating_sub(chunks[0].height as usize);
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(transcript, chunks[0]);

    if show_choices {
        draw_choices(frame, chunks[1], ui, dashboard);
    } else if choice_rows > 0 {
        frame.render_widget(
            Paragraph::new(Span::styled("[case closed]", Style::default().fg(Color::Green))),
            chunks[1],
        );
    }
}

fn glossary_line(dashboard: &Dashboard, text: &str, mode: GlossaryMode) -> Line<'static> {
    let term_style = match mode {
        GlossaryMode::Detective => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::UNDERLINED),
        _ => Style::default().add_modifier(Modifier::UNDERLINED),
    };
    let spans = dashboard
        .glossary
        .annotate(text, mode)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(text) => Span::raw(text),
            Segment::Term { text, .. } => Span::styled(text, term_style),
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn draw_choices(frame: &mut Frame<'_>, area: Rect, ui: &TuiUiState, dashboard: &Dashboard) {
    let collected = &dashboard.progress.collected_evidence;
    let width = area.width as usize;
    let mut lines = vec![Line::from(Span::styled(
        "choices (up/down + enter):",
        Style::default().fg(Color::Cyan),
    ))];

    for row_index in 0..CHOICE_VIEWPORT_ROWS {
        let absolute_index = ui.choice_scroll_offset + row_index;
        let Some(state) = dashboard.choice_states().get(absolute_index) else {
            lines.push(Line::from(" "));
            continue;
        };
        let selected = absolute_index == ui.selected_choice_index;
        let disabled = state.is_disabled(false, collected);
        let prefix = if selected { "> " } else { "  " };
        let style = if disabled {
            Style::default().fg(Color::DarkGray)
        } else if selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::styled(
            truncate_to_width(&format!("{}{}", prefix, state.choice().text), width / 2),
            style,
        )];
        for badge in state.badges(collected) {
            spans.push(Span::styled(
                format!(" [{}]", badge.label),
                Style::default().fg(tone_color(badge.tone)),
            ));
        }
        if let Some(reason) = state.disabled_reason(collected) {
            spans.push(Span::styled(
                format!(" {}", reason),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_data_tab(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard) {
    let progress = &dashboard.progress;
    let mut lines = vec![Line::from(Span::styled(
        "Unlocked scenes",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for scene in &dashboard.episode.scenes {
        if !progress.unlocked_scenes.contains(&scene.id) {
            continue;
        }
        let marker = if scene.id == progress.current_scene {
            "*"
        } else {
            " "
        };
        lines.push(Line::from(format!(
            "{} {} ({})",
            marker,
            scene.title,
            scene.tab.title()
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "choices made: {}",
        progress.made_choices.len()
    )));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn draw_files_tab(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard) {
    let collected = &dashboard.progress.collected_evidence;
    let mut lines = vec![Line::from(Span::styled(
        "Evidence",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if collected.is_empty() {
        lines.push(Line::from(Span::styled(
            "nothing collected yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for evidence in dashboard
        .episode
        .evidence
        .iter()
        .filter(|evidence| collected.contains(&evidence.id))
    {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{:?}] ", evidence.importance).to_lowercase(),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(evidence.title.clone()),
        ]));
        if !evidence.summary.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", evidence.summary),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn draw_team_tab(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard) {
    let relationships = &dashboard.progress.relationships;
    let mut lines = vec![Line::from(Span::styled(
        "Team",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if relationships.is_empty() {
        lines.push(Line::from(Span::styled(
            "no one has an opinion of you yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (character, score) in relationships {
        let color = match score.signum() {
            1 => Color::Green,
            -1 => Color::Red,
            _ => Color::Gray,
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{:<16}", character)),
            Span::styled(format!("{:+}", score), Style::default().fg(color)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, ui: &TuiUiState) {
    let width = area.width as usize;
    let keys = if ui.help_visible {
        "ctrl+1..4 tabs | left/right adjacent | backspace back | up/down/enter choose | space skip | q quit"
    } else {
        "keys: ctrl+1..4 | left/right | backspace | enter | space | h help | q quit"
    };
    let lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&format!("status: {}", ui.status), width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            truncate_to_width(keys, width),
            Style::default().fg(Color::Yellow),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn tone_color(tone: BadgeTone) -> Color {
    match tone {
        BadgeTone::Neutral => Color::Gray,
        BadgeTone::Success => Color::Green,
        BadgeTone::Warning => Color::Yellow,
        BadgeTone::Error => Color::Red,
    }
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= width {
        return value.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }
    let mut out = chars.into_iter().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}
