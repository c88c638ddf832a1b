use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CaseFileError;

/// One of the dashboard's fixed content sections.
///
/// The declaration order is the canonical tab order: it drives keyboard
/// shortcuts, swipe neighbours and transition direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKey {
    Chat,
    Data,
    Files,
    Team,
}

impl TabKey {
    pub const ALL: [TabKey; 4] = [TabKey::Chat, TabKey::Data, TabKey::Files, TabKey::Team];

    pub const DEFAULT: TabKey = TabKey::Chat;

    pub fn ordinal(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::Data => 1,
            Self::Files => 2,
            Self::Team => 3,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Option<TabKey> {
        Self::ALL.get(ordinal).copied()
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Data => "data",
            Self::Files => "files",
            Self::Team => "team",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Data => "Data",
            Self::Files => "Files",
            Self::Team => "Team",
        }
    }

    /// 1-based digit used with the modifier key to jump to this tab.
    pub fn shortcut(self) -> u8 {
        self.ordinal() as u8 + 1
    }
}

impl fmt::Display for TabKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TabKey {
    type Err = CaseFileError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tab| tab.id() == raw)
            .ok_or_else(|| CaseFileError::unknown_tab(raw))
    }
}

/// Animation hint derived from the ordinals of the previous and next tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionDirection {
    Forward,
    Backward,
    #[default]
    None,
}

impl TransitionDirection {
    pub fn between(previous: TabKey, next: TabKey) -> Self {
        match next.ordinal().cmp(&previous.ordinal()) {
            std::cmp::Ordering::Greater => Self::Forward,
            std::cmp::Ordering::Less => Self::Backward,
            std::cmp::Ordering::Equal => Self::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TransitionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tab_tests {
    use super::*;

    #[test]
    fn ordinals_follow_canonical_order() {
        for (index, tab) in TabKey::ALL.iter().enumerate() {
            assert_eq!(tab.ordinal(), index);
            assert_eq!(TabKey::from_ordinal(index), Some(*tab));
        }
        assert_eq!(TabKey::from_ordinal(4), None);
    }

    #[test]
    fn parse_accepts_ids_and_rejects_others() {
        assert_eq!("files".parse::<TabKey>(), Ok(TabKey::Files));
        let error = "Files".parse::<TabKey>().expect_err("ids are lowercase");
        assert_eq!(error.code, "NAV_UNKNOWN_TAB");
        assert!("".parse::<TabKey>().is_err());
    }

    #[test]
    fn direction_compares_ordinals() {
        assert_eq!(
            TransitionDirection::between(TabKey::Chat, TabKey::Team),
            TransitionDirection::Forward
        );
        assert_eq!(
            TransitionDirection::between(TabKey::Team, TabKey::Chat),
            TransitionDirection::Backward
        );
        assert_eq!(
            TransitionDirection::between(TabKey::Chat, TabKey::Chat),
            TransitionDirection::None
        );
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        let raw = serde_json::to_string(&TabKey::Files).expect("serialize");
        assert_eq!(raw, "\"files\"");
        let direction = serde_json::to_string(&TransitionDirection::Backward).expect("serialize");
        assert_eq!(direction, "\"backward\"");
    }
}
