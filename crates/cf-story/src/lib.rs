//! Story presentation state: typewriter reveal, glossary annotation, choice
//! buttons and the player's progress through an episode.

pub mod choice;
pub mod glossary;
pub mod progress;
pub mod typewriter;

pub use choice::{BadgeTone, ChoiceBadge, ChoiceState};
pub use glossary::{default_terms, Glossary, GlossaryMode, Segment};
pub use progress::{deliver_message, CaseProgress};
pub use typewriter::{Typewriter, TypewriterEvent, TypewriterSpeed};
