use cf_core::CaseFileError;
use cf_story::{ChoiceState, GlossaryMode, Typewriter, TypewriterSpeed};

use crate::dashboard::Dashboard;

pub(crate) const CHOICE_VIEWPORT_ROWS: usize = 5;

#[derive(Debug)]
pub(crate) struct TuiUiState {
    pub(crate) feed: Typewriter,
    pub(crate) glossary_mode: GlossaryMode,
    pub(crate) shown_scene: Option<String>,
    pub(crate) selected_choice_index: usize,
    pub(crate) choice_scroll_offset: usize,
    pub(crate) help_visible: bool,
    pub(crate) status: String,
}

impl TuiUiState {
    pub(crate) fn new(speed: TypewriterSpeed, glossary_mode: GlossaryMode) -> Self {
        Self {
            feed: Typewriter::new(speed),
            glossary_mode,
            shown_scene: None,
            selected_choice_index: 0,
            choice_scroll_offset: 0,
            help_visible: false,
            status: "ready".to_string(),
        }
    }

    pub(crate) fn typing_in_progress(&self) -> bool {
        self.feed.is_typing()
    }

    /// Queues the messages of the scene the player just reached. Calling it
    /// again for the same scene does nothing.
    pub(crate) fn sync_scene(&mut self, dashboard: &Dashboard) -> Result<bool, CaseFileError> {
        let scene = dashboard.current_scene()?;
        if self.shown_scene.as_deref() == Some(scene.id.as_str()) {
            return Ok(false);
        }

        if self.shown_scene.is_some() {
            self.feed.push_line("");
        }
        self.feed.push_line(format!("== {} ==", scene.title));
        for message in &scene.messages {
            self.feed
                .push_line(format!("{}: {}", message.sender, message.content));
            for attachment in &message.attachments {
                let title = dashboard
                    .episode
                    .evidence(attachment)
                    .map(|evidence| evidence.title.as_str())
                    .unwrap_or(attachment.as_str());
                self.feed.push_line(format!("  [attached] {}", title));
            }
        }

        self.selected_choice_index = 0;
        self.choice_scroll_offset = 0;
        self.shown_scene = Some(scene.id.clone());
        Ok(true)
    }

    pub(crate) fn select_previous(&mut self) {
        self.selected_choice_index = self.selected_choice_index.saturating_sub(1);
        if self.selected_choice_index < self.choice_scroll_offset {
            self.choice_scroll_offset = self.selected_choice_index;
        }
    }

    pub(crate) fn select_next(&mut self, choice_count: usize) {
        let last = choice_count.saturating_sub(1);
        self.selected_choice_index = (self.selected_choice_index + 1).min(last);
        if choice_count > CHOICE_VIEWPORT_ROWS
            && self.selected_choice_index >= self.choice_scroll_offset + CHOICE_VIEWPORT_ROWS
        {
            self.choice_scroll_offset = self.selected_choice_index - CHOICE_VIEWPORT_ROWS + 1;
        }
    }

    pub(crate) fn selected_choice<'a>(&self, dashboard: &'a Dashboard) -> Option<&'a ChoiceState> {
        dashboard.choice_states().get(self.selected_choice_index)
    }
}
