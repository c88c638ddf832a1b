use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypewriterSpeed {
    Off,
    Fast,
    #[default]
    Normal,
}

impl TypewriterSpeed {
    pub fn char_delay(self) -> Duration {
        match self {
            Self::Off => Duration::ZERO,
            Self::Fast => Duration::from_millis(15),
            Self::Normal => Duration::from_millis(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterEvent {
    /// Nothing queued.
    Idle,
    /// One more character became visible, or a new line started.
    Progress,
    /// A line finished revealing and moved to the rendered lines.
    Completed,
}

/// Reveals queued lines one character per tick.
#[derive(Debug, Clone, Default)]
pub struct Typewriter {
    speed: TypewriterSpeed,
    rendered_lines: Vec<String>,
    pending_lines: Vec<String>,
    typing_line: Option<String>,
    typing_chars: usize,
}

impl Typewriter {
    pub fn new(speed: TypewriterSpeed) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn speed(&self) -> TypewriterSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: TypewriterSpeed) {
        self.speed = speed;
        if speed == TypewriterSpeed::Off {
            self.skip_all();
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.pending_lines.push(line.into());
        if self.speed == TypewriterSpeed::Off {
            self.skip_all();
        }
    }

    /// Shows a line at once without revealing it, e.g. when replaying a
    /// transcript.
    pub fn push_bypassed(&mut self, line: impl Into<String>) {
        self.rendered_lines.push(line.into());
    }

    pub fn clear(&mut self) {
        self.rendered_lines.clear();
        self.pending_lines.clear();
        self.typing_line = None;
        self.typing_chars = 0;
    }

    pub fn is_typing(&self) -> bool {
        self.typing_line.is_some() || !self.pending_lines.is_empty()
    }

    pub fn rendered_lines(&self) -> &[String] {
        &self.rendered_lines
    }

    /// Revealed prefix of the line being typed.
    pub fn visible(&self) -> Option<&str> {
        let line = self.typing_line.as_deref()?;
        let end = line
            .char_indices()
            .nth(self.typing_chars)
            .map(|(index, _)| index)
            .unwrap_or(line.len());
        Some(&line[..end])
    }

    /// Rendered lines followed by the partially revealed one.
    pub fn lines(&self) -> Vec<String> {
        let mut out = self.rendered_lines.clone();
        if let Some(visible) = self.visible() {
            out.push(visible.to_string());
        }
        out
    }

    pub fn tick(&mut self) -> TypewriterEvent {
        let Some(line) = self.typing_line.as_ref() else {
            if self.pending_lines.is_empty() {
                return TypewriterEvent::Idle;
            }
            let next_line = self.pending_lines.remove(0);
            if next_line.is_empty() {
                self.rendered_lines.push(next_line);
                return TypewriterEvent::Completed;
            }
            self.typing_line = Some(next_line);
            self.typing_chars = 1;
            return TypewriterEvent::Progress;
        };

        let total_chars = line.chars().count();
        if self.typing_chars >= total_chars {
            self.finish_typing_line();
            return TypewriterEvent::Completed;
        }
        self.typing_chars += 1;
        TypewriterEvent::Progress
    }

    /// Completes the line being typed. Returns `false` when nothing was typing.
    pub fn skip(&mut self) -> bool {
        if self.typing_line.is_none() {
            return false;
        }
        self.finish_typing_line();
        true
    }

    pub fn skip_all(&mut self) {
        self.skip();
        self.rendered_lines.append(&mut self.pending_lines);
    }

    fn finish_typing_line(&mut self) {
        if let Some(line) = self.typing_line.take() {
            self.rendered_lines.push(line);
        }
        self.typing_chars = 0;
    }
}
