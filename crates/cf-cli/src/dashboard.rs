use cf_core::{CaseFileError, Choice, Episode, Scene};
use cf_nav::{DashboardSession, MemoryRouter, RouteOutcome, TabController};
use cf_story::{default_terms, CaseProgress, ChoiceState, Glossary};
use tracing::info;

/// Host of one dashboard view: the mounted tab session plus the episode
/// being played. The choice buttons of the current scene live here so their
/// countdowns survive between commands.
pub(crate) struct Dashboard {
    pub(crate) episode: Episode,
    pub(crate) progress: CaseProgress,
    pub(crate) glossary: Glossary,
    choices: Vec<ChoiceState>,
    session: DashboardSession<MemoryRouter>,
}

impl Dashboard {
    pub(crate) fn open(episode: Episode, initial_path: &str) -> Result<Self, CaseFileError> {
        let glossary = Glossary::new(
            default_terms()
                .map(|(term, definition)| (term.to_string(), definition.to_string()))
                .chain(episode.glossary.clone()),
        )?;
        let mut session = DashboardSession::new();
        let tabs = session.mount(MemoryRouter::new(initial_path))?;
        tabs.pump_router();

        let mut progress = CaseProgress::new(&episode);
        let entry_scene = episode.entry_scene.clone();
        progress.enter_scene(&episode, &entry_scene, tabs)?;
        let choices = progress.choice_states(&episode)?;
        info!(episode = %episode.id, "dashboard opened");

        Ok(Self {
            episode,
            progress,
            glossary,
            choices,
            session,
        })
    }

    pub(crate) fn tabs(&self) -> Result<&TabController<MemoryRouter>, CaseFileError> {
        self.session.tabs()
    }

    pub(crate) fn tabs_mut(&mut self) -> Result<&mut TabController<MemoryRouter>, CaseFileError> {
        self.session.tabs_mut()
    }

    /// Forwards queued router changes to the controller.
    pub(crate) fn sync(&mut self) -> Result<Vec<RouteOutcome>, CaseFileError> {
        Ok(self.tabs_mut()?.pump_router())
    }

    pub(crate) fn current_scene(&self) -> Result<&Scene, CaseFileError> {
        self.progress.current_scene(&self.episode)
    }

    pub(crate) fn choice_states(&self) -> &[ChoiceState] {
        &self.choices
    }

    /// One second of countdown for every timed choice on offer. Returns the
    /// choices that ran out on this tick.
    pub(crate) fn tick_countdowns(&mut self) -> Vec<Choice> {
        self.choices
            .iter_mut()
            .filter_map(|state| state.tick_second().then(|| state.choice().clone()))
            .collect()
    }

    pub(crate) fn choose(&mut self, state: &ChoiceState) -> Result<Option<String>, CaseFileError> {
        let tabs = self.session.tabs_mut()?;
        let next = self.progress.choose(&self.episode, state, tabs)?;
        match next {
            Some(_) => self.choices = self.progress.choice_states(&self.episode)?,
            None => self.choices.clear(),
        }
        Ok(next)
    }

    /// Picks one of the held choice buttons, countdown included.
    pub(crate) fn choose_by_id(&mut self, choice_id: &str) -> Result<Option<String>, CaseFileError> {
        let state = self
            .choices
            .iter()
            .find(|state| state.choice().id == choice_id)
            .cloned()
            .ok_or_else(|| {
                CaseFileError::new(
                    "STORY_CHOICE_NOT_FOUND",
                    format!(
                        "Choice \"{}\" is not offered in scene \"{}\".",
                        choice_id, self.progress.current_scene
                    ),
                )
            })?;
        self.choose(&state)
    }

    pub(crate) fn advance(&mut self) -> Result<Option<String>, CaseFileError> {
        let tabs = self.session.tabs_mut()?;
        let next = self.progress.advance(&self.episode, tabs)?;
        if next.is_some() {
            self.choices = self.progress.choice_states(&self.episode)?;
        }
        Ok(next)
    }

    pub(crate) fn progress_percent(&self) -> u8 {
        self.progress.progress_percent(&self.episode)
    }

    pub(crate) fn close(&mut self) {
        if self.session.unmount().is_some() {
            info!(episode = %self.episode.id, "dashboard closed");
        }
    }
}

pub(crate) fn outcome_label(outcome: RouteOutcome) -> String {
    match outcome {
        RouteOutcome::Unchanged => "unchanged".to_string(),
        RouteOutcome::Echo => "echo".to_string(),
        RouteOutcome::Applied(tab) => format!("applied:{}", tab),
    }
}
