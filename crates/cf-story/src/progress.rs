use std::collections::{BTreeMap, BTreeSet};

use cf_core::{
    CaseFileError, Choice, Consequence, Episode, Message, Scene, SceneRequirements, TabKey,
};
use cf_nav::{Router, TabController};
use serde::Serialize;
use tracing::debug;

use crate::choice::ChoiceState;

/// Player progress through one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseProgress {
    pub episode_id: String,
    pub current_scene: String,
    pub unlocked_scenes: BTreeSet<String>,
    pub collected_evidence: BTreeSet<String>,
    pub made_choices: Vec<String>,
    pub relationships: BTreeMap<String, i32>,
    pub completed: bool,
}

impl CaseProgress {
    pub fn new(episode: &Episode) -> Self {
        Self {
            episode_id: episode.id.clone(),
            current_scene: episode.entry_scene.clone(),
            unlocked_scenes: BTreeSet::from([episode.entry_scene.clone()]),
            collected_evidence: BTreeSet::new(),
            made_choices: Vec::new(),
            relationships: BTreeMap::new(),
            completed: false,
        }
    }

    /// Share of the episode's scenes unlocked so far, rounded to a whole
    /// percent. A completed episode always reports 100.
    pub fn progress_percent(&self, episode: &Episode) -> u8 {
        if self.completed {
            return 100;
        }
        let total = episode.scenes.len();
        if total == 0 {
            return 0;
        }
        let ratio = (self.unlocked_scenes.len() as f64 / total as f64).min(1.0);
        (ratio * 100.0).round() as u8
    }

    /// Marks the episode completed. Returns `false` if it already was.
    pub fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        debug!(episode = %self.episode_id, "episode completed");
        true
    }

    pub fn can_access_scene(&self, episode: &Episode, scene_id: &str) -> bool {
        episode
            .scene(scene_id)
            .is_some_and(|scene| self.requirements_met(&scene.requirements, None))
    }

    /// Checks scene requirements, optionally counting a choice about to be
    /// picked together with the evidence it would unlock.
    fn requirements_met(
        &self,
        requirements: &SceneRequirements,
        pending: Option<(&Episode, &Choice)>,
    ) -> bool {
        let has_evidence = |id: &String| {
            self.collected_evidence.contains(id)
                || pending.is_some_and(|(episode, choice)| {
                    episode.evidence(id).is_some() && unlocks_evidence(choice, id)
                })
        };
        let has_choice = |id: &String| {
            self.made_choices.contains(id) || pending.is_some_and(|(_, choice)| &choice.id == id)
        };
        requirements.evidence.iter().all(has_evidence)
            && requirements.choices.iter().all(has_choice)
    }

    pub fn current_scene<'a>(&self, episode: &'a Episode) -> Result<&'a Scene, CaseFileError> {
        episode.scene(&self.current_scene).ok_or_else(|| {
            CaseFileError::new(
                "STORY_SCENE_NOT_FOUND",
                format!("Scene \"{}\" not found in episode \"{}\".", self.current_scene, episode.id),
            )
        })
    }

    pub fn choice_states(&self, episode: &Episode) -> Result<Vec<ChoiceState>, CaseFileError> {
        let scene = self.current_scene(episode)?;
        Ok(scene.choices().iter().cloned().map(ChoiceState::new).collect())
    }

    /// Applies one consequence. Newly collected evidence raises the files
    /// badge unless the player is already looking at the files tab. Ids the
    /// episode does not define are ignored.
    pub fn apply<R: Router>(
        &mut self,
        episode: &Episode,
        consequence: &Consequence,
        tabs: &mut TabController<R>,
    ) {
        match consequence {
            Consequence::RelationshipDelta { character, delta } => {
                let score = self.relationships.entry(character.clone()).or_insert(0);
                *score = score.saturating_add(*delta);
            }
            Consequence::EvidenceUnlock { evidence_id }
                if episode.evidence(evidence_id).is_none() =>
            {
                debug!(evidence = %evidence_id, "ignored unlock of unknown evidence");
                return;
            }
            Consequence::SceneUnlock { scene_id } if episode.scene(scene_id).is_none() => {
                debug!(scene = %scene_id, "ignored unlock of unknown scene");
                return;
            }
            Consequence::EvidenceUnlock { evidence_id } => {
                let is_new = self.collected_evidence.insert(evidence_id.clone());
                if is_new && tabs.current_tab() != TabKey::Files {
                    tabs.add_notification(TabKey::Files, 1);
                }
            }
            Consequence::SceneUnlock { scene_id } => {
                self.unlocked_scenes.insert(scene_id.clone());
            }
        }
        debug!(?consequence, "applied consequence");
    }

    /// Picks a choice of the current scene and moves on to the choice's next
    /// scene, or the scene's own. Returns the id of the scene entered, if any;
    /// a choice leading nowhere completes the episode. Nothing changes when
    /// the next scene stays locked even after the choice's consequences.
    pub fn choose<R: Router>(
        &mut self,
        episode: &Episode,
        state: &ChoiceState,
        tabs: &mut TabController<R>,
    ) -> Result<Option<String>, CaseFileError> {
        let scene = self.current_scene(episode)?;
        let choice = state.choice();
        if scene.choice(&choice.id).is_none() {
            return Err(CaseFileError::new(
                "STORY_CHOICE_NOT_FOUND",
                format!("Choice \"{}\" is not offered in scene \"{}\".", choice.id, scene.id),
            ));
        }
        if state.is_disabled(false, &self.collected_evidence) {
            return Err(CaseFileError::new(
                "STORY_CHOICE_DISABLED",
                format!("Choice \"{}\" cannot be picked right now.", choice.id),
            ));
        }

        let next_scene = choice.next_scene.clone().or_else(|| scene.next_scene.clone());
        if let Some(next_scene_id) = next_scene.as_deref() {
            let target = lookup_scene(episode, next_scene_id)?;
            if !self.requirements_met(&target.requirements, Some((episode, choice))) {
                return Err(scene_locked(target));
            }
        }

        self.made_choices.push(choice.id.clone());
        for consequence in &choice.consequences {
            self.apply(episode, consequence, tabs);
        }

        let Some(next_scene_id) = next_scene else {
            self.complete();
            return Ok(None);
        };
        self.enter_scene(episode, &next_scene_id, tabs)?;
        Ok(Some(next_scene_id))
    }

    /// Moves past a scene that offers no choices. Scenes with choices wait
    /// for one to be picked. Moving past the final scene completes the
    /// episode.
    pub fn advance<R: Router>(
        &mut self,
        episode: &Episode,
        tabs: &mut TabController<R>,
    ) -> Result<Option<String>, CaseFileError> {
        let scene = self.current_scene(episode)?;
        if !scene.choices().is_empty() {
            return Ok(None);
        }
        let Some(next_scene_id) = scene.next_scene.clone() else {
            self.complete();
            return Ok(None);
        };
        self.enter_scene(episode, &next_scene_id, tabs)?;
        Ok(Some(next_scene_id))
    }

    /// Looks up a choice of the current scene by id and picks it. Timed
    /// choices start a fresh countdown here; callers that run countdowns
    /// keep their own `ChoiceState`s and use [`CaseProgress::choose`].
    pub fn choose_by_id<R: Router>(
        &mut self,
        episode: &Episode,
        choice_id: &str,
        tabs: &mut TabController<R>,
    ) -> Result<Option<String>, CaseFileError> {
        let state = self
            .choice_states(episode)?
            .into_iter()
            .find(|state| state.choice().id == choice_id)
            .ok_or_else(|| {
                CaseFileError::new(
                    "STORY_CHOICE_NOT_FOUND",
                    format!("Choice \"{}\" is not offered in scene \"{}\".", choice_id, self.current_scene),
                )
            })?;
        self.choose(episode, &state, tabs)
    }

    pub fn enter_scene<R: Router>(
        &mut self,
        episode: &Episode,
        scene_id: &str,
        tabs: &mut TabController<R>,
    ) -> Result<(), CaseFileError> {
        let scene = lookup_scene(episode, scene_id)?;
        if !self.requirements_met(&scene.requirements, None) {
            return Err(scene_locked(scene));
        }
        self.current_scene = scene.id.clone();
        self.unlocked_scenes.insert(scene.id.clone());
        for message in &scene.messages {
            deliver_message(scene.tab, message, tabs);
        }
        debug!(scene = %scene.id, "entered scene");
        Ok(())
    }
}

fn lookup_scene<'a>(episode: &'a Episode, scene_id: &str) -> Result<&'a Scene, CaseFileError> {
    episode.scene(scene_id).ok_or_else(|| {
        CaseFileError::new(
            "STORY_SCENE_NOT_FOUND",
            format!("Scene \"{}\" not found in episode \"{}\".", scene_id, episode.id),
        )
    })
}

fn scene_locked(scene: &Scene) -> CaseFileError {
    CaseFileError::new(
        "STORY_SCENE_LOCKED",
        format!("Scene \"{}\" is locked until its requirements are met.", scene.id),
    )
}

fn unlocks_evidence(choice: &Choice, evidence_id: &str) -> bool {
    choice.consequences.iter().any(|consequence| {
        matches!(consequence, Consequence::EvidenceUnlock { evidence_id: id } if id == evidence_id)
    })
}

/// A new message on a tab the player is not looking at raises its badge.
pub fn deliver_message<R: Router>(tab: TabKey, message: &Message, tabs: &mut TabController<R>) {
    if tabs.current_tab() != tab {
        tabs.add_notification(tab, 1);
        debug!(message = %message.id, %tab, "message delivered in background");
    }
}
