use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tab::TabKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub entry_scene: String,
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default)]
    pub glossary: BTreeMap<String, String>,
}

impl Episode {
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == scene_id)
    }

    pub fn evidence(&self, evidence_id: &str) -> Option<&Evidence> {
        self.evidence.iter().find(|item| item.id == evidence_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    #[serde(default = "default_scene_tab")]
    pub tab: TabKey,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub next_scene: Option<String>,
    #[serde(default)]
    pub requirements: SceneRequirements,
}

/// What the player must have collected and picked before a scene opens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRequirements {
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl SceneRequirements {
    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty() && self.choices.is_empty()
    }
}

fn default_scene_tab() -> TabKey {
    TabKey::Chat
}

impl Scene {
    /// Choices offered by the scene: those attached to its last message.
    pub fn choices(&self) -> &[Choice] {
        self.messages
            .iter()
            .rev()
            .find(|message| !message.choices.is_empty())
            .map(|message| message.choices.as_slice())
            .unwrap_or(&[])
    }

    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices().iter().find(|choice| choice.id == choice_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Evidence,
    System,
    Choice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    Document,
    Log,
    Email,
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub id: String,
    pub kind: EvidenceKind,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub importance: Importance,
}

/// Effect of picking a choice on the player's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Consequence {
    #[serde(rename_all = "camelCase")]
    RelationshipDelta { character: String, delta: i32 },
    #[serde(rename_all = "camelCase")]
    EvidenceUnlock { evidence_id: String },
    #[serde(rename_all = "camelCase")]
    SceneUnlock { scene_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceOutcome {
    Positive,
    Negative,
    Neutral,
}

/// How a choice button presents itself and when it can be picked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChoiceBehavior {
    #[default]
    Standard,
    Consequence {
        outcome: ChoiceOutcome,
        #[serde(default)]
        description: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Timed { duration_seconds: u32 },
    Required { evidence: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub next_scene: Option<String>,
    #[serde(default)]
    pub consequences: Vec<Consequence>,
    #[serde(default)]
    pub behavior: ChoiceBehavior,
    #[serde(default)]
    pub disabled_reason: Option<String>,
}
