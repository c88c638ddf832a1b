use std::collections::BTreeMap;

use cf_core::CaseFileError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

const DEFAULT_TERMS: &[(&str, &str)] = &[
    ("overpowered", "A character or item that is too strong compared to others in the game"),
    ("win rate", "The percentage of games won by players using a specific character"),
    ("abnormally", "In an unusual or unexpected way"),
    ("deliberately", "Done on purpose, not by accident"),
    ("manipulated", "Changed or controlled in a dishonest way"),
    ("balance", "Making sure all characters are equally fair and fun to play"),
    ("algorithm", "A set of rules or steps a computer follows to solve a problem"),
    ("stats", "Short for statistics - numbers that show game performance"),
    ("access", "Permission to use or see something"),
    ("database", "A digital storage system where information is kept organized"),
    ("logged in", "Signed into a computer system using a username and password"),
    ("server logs", "Records that show what happened on a computer server"),
    ("anonymously", "Without revealing your name or identity"),
    ("crunch", "A stressful period of long working hours to finish a project"),
    ("perfectionist", "Someone who wants everything to be perfect"),
    ("burnout", "Feeling extremely tired and stressed from too much work"),
    ("suspicious", "Making you think something wrong or dishonest is happening"),
    ("evidence", "Information or facts that help prove something is true"),
    ("analyze", "To examine something carefully to understand it better"),
    ("incident", "An event, especially an unusual or bad one"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlossaryMode {
    /// Terms highlighted for the dark in-case chat style.
    Detective,
    #[default]
    Normal,
    /// No annotation at all.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Term {
        /// Matched text with its original casing.
        text: String,
        term: String,
        definition: String,
    },
}

#[derive(Debug, Clone)]
pub struct Glossary {
    entries: BTreeMap<String, (String, String)>,
    matcher: Option<Regex>,
}

impl Glossary {
    pub fn new<I, K, V>(terms: I) -> Result<Self, CaseFileError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for (term, definition) in terms {
            let term = term.into();
            let key = term.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            entries.insert(key, (term, definition.into()));
        }

        let matcher = build_matcher(&entries)?;
        Ok(Self { entries, matcher })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn definition(&self, term: &str) -> Option<&str> {
        self.entries
            .get(&term.to_lowercase())
            .map(|(_, definition)| definition.as_str())
    }

    /// Splits `text` into plain runs and glossary terms. At each position the
    /// longest matching term wins.
    pub fn annotate(&self, text: &str, mode: GlossaryMode) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(matcher) = self.matcher.as_ref().filter(|_| mode != GlossaryMode::None) else {
            return vec![Segment::Plain(text.to_string())];
        };

        let mut segments = Vec::new();
        let mut cursor = 0;
        for found in matcher.find_iter(text) {
            let Some((term, definition)) = self.entries.get(&found.as_str().to_lowercase()) else {
                continue;
            };
            if found.start() > cursor {
                segments.push(Segment::Plain(text[cursor..found.start()].to_string()));
            }
            segments.push(Segment::Term {
                text: found.as_str().to_string(),
                term: term.clone(),
                definition: definition.clone(),
            });
            cursor = found.end();
        }
        if cursor < text.len() {
            segments.push(Segment::Plain(text[cursor..].to_string()));
        }
        segments
    }
}

/// Terms every episode starts from.
pub fn default_terms() -> impl Iterator<Item = (&'static str, &'static str)> {
    DEFAULT_TERMS.iter().copied()
}

impl Default for Glossary {
    fn default() -> Self {
        Self::new(default_terms()).unwrap_or_else(|_| Self {
            entries: BTreeMap::new(),
            matcher: None,
        })
    }
}

fn build_matcher(
    entries: &BTreeMap<String, (String, String)>,
) -> Result<Option<Regex>, CaseFileError> {
    if entries.is_empty() {
        return Ok(None);
    }
    let mut keys = entries.keys().collect::<Vec<_>>();
    keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    let pattern = keys
        .iter()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|error| CaseFileError::new("STORY_GLOSSARY_INVALID", error.to_string()))
}
