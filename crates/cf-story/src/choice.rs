use std::collections::BTreeSet;

use cf_core::{Choice, ChoiceBehavior, ChoiceOutcome};

const COUNTDOWN_WARNING_SECONDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Neutral,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceBadge {
    pub label: String,
    pub tone: BadgeTone,
}

/// Presentation state of one choice button: the remaining countdown for
/// timed choices and whether the button can be picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceState {
    choice: Choice,
    remaining_seconds: Option<u32>,
}

impl ChoiceState {
    pub fn new(choice: Choice) -> Self {
        let remaining_seconds = initial_countdown(&choice.behavior);
        Self {
            choice,
            remaining_seconds,
        }
    }

    pub fn choice(&self) -> &Choice {
        &self.choice
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.remaining_seconds
    }

    /// One countdown step. Returns `true` when this tick expired the choice.
    pub fn tick_second(&mut self) -> bool {
        match self.remaining_seconds.as_mut() {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                *remaining == 0
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.remaining_seconds = initial_countdown(&self.choice.behavior);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == Some(0)
    }

    pub fn missing_evidence<'a>(&'a self, collected: &BTreeSet<String>) -> Vec<&'a str> {
        match &self.choice.behavior {
            ChoiceBehavior::Required { evidence } => evidence
                .iter()
                .filter(|id| !collected.contains(*id))
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_requirement_met(&self, collected: &BTreeSet<String>) -> bool {
        self.missing_evidence(collected).is_empty()
    }

    pub fn is_disabled(&self, externally_disabled: bool, collected: &BTreeSet<String>) -> bool {
        externally_disabled || !self.is_requirement_met(collected) || self.is_expired()
    }

    /// Reason shown under a disabled button, if the content provides one.
    pub fn disabled_reason(&self, collected: &BTreeSet<String>) -> Option<&str> {
        if !self.is_disabled(false, collected) {
            return None;
        }
        self.choice.disabled_reason.as_deref()
    }

    pub fn badges(&self, collected: &BTreeSet<String>) -> Vec<ChoiceBadge> {
        let mut badges = Vec::new();
        match &self.choice.behavior {
            ChoiceBehavior::Standard => {}
            ChoiceBehavior::Consequence {
                outcome,
                description,
            } => {
                if description.is_some() {
                    badges.push(outcome_badge(*outcome));
                }
            }
            ChoiceBehavior::Timed { .. } => {
                if let Some(remaining) = self.remaining_seconds {
                    badges.push(countdown_badge(remaining));
                }
            }
            ChoiceBehavior::Required { evidence } => {
                if !evidence.is_empty() {
                    let tone = if self.is_requirement_met(collected) {
                        BadgeTone::Success
                    } else {
                        BadgeTone::Error
                    };
                    badges.push(ChoiceBadge {
                        label: format!("Requires evidence: {}", evidence.len()),
                        tone,
                    });
                }
            }
        }
        badges
    }
}

fn initial_countdown(behavior: &ChoiceBehavior) -> Option<u32> {
    match behavior {
        ChoiceBehavior::Timed { duration_seconds } => Some(*duration_seconds),
        _ => None,
    }
}

fn outcome_badge(outcome: ChoiceOutcome) -> ChoiceBadge {
    let (label, tone) = match outcome {
        ChoiceOutcome::Positive => ("Relationship boost", BadgeTone::Success),
        ChoiceOutcome::Negative => ("Risky decision", BadgeTone::Error),
        ChoiceOutcome::Neutral => ("Narrative choice", BadgeTone::Neutral),
    };
    ChoiceBadge {
        label: label.to_string(),
        tone,
    }
}

fn countdown_badge(remaining: u32) -> ChoiceBadge {
    let tone = if remaining > COUNTDOWN_WARNING_SECONDS {
        BadgeTone::Neutral
    } else {
        BadgeTone::Warning
    };
    let label = if remaining > 0 {
        format!("{}s remaining", remaining)
    } else {
        "Time's up".to_string()
    };
    ChoiceBadge { label, tone }
}
