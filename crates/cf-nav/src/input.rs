use std::str::FromStr;

use cf_core::{CaseFileError, TabKey};

pub const SWIPE_MIN_DISTANCE: i32 = 60;
pub const SWIPE_MAX_DURATION_MS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        alt: false,
        shift: false,
    };

    /// Ctrl or Meta (Cmd/Super) may drive tab shortcuts.
    pub fn is_command(self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: char,
}

impl KeyChord {
    pub fn new(modifiers: Modifiers, key: char) -> Self {
        Self { modifiers, key }
    }

    /// Modifier + digit 1..N selects the Nth canonical tab.
    pub fn tab_shortcut(&self) -> Option<TabKey> {
        if !self.modifiers.is_command() {
            return None;
        }
        let digit = self.key.to_digit(10)? as usize;
        if digit == 0 {
            return None;
        }
        TabKey::from_ordinal(digit - 1)
    }
}

impl FromStr for KeyChord {
    type Err = CaseFileError;

    /// Parses chords such as `ctrl+3`, `cmd+1` or `ctrl+shift+x`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || CaseFileError::new("NAV_KEY_INVALID", format!("Invalid key chord: {}", raw));
        let mut parts = raw.split('+').map(str::trim).collect::<Vec<_>>();
        let key_part = parts.pop().ok_or_else(invalid)?;
        let mut key_chars = key_part.chars();
        let key = key_chars.next().ok_or_else(invalid)?;
        if key_chars.next().is_some() {
            return Err(invalid());
        }

        let mut modifiers = Modifiers::default();
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => return Err(invalid()),
            }
        }
        Ok(Self { modifiers, key })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeStep {
    Next,
    Previous,
}

/// Horizontal touch/drag gesture measured from start to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeGesture {
    pub dx: i32,
    pub dy: i32,
    pub elapsed_ms: u64,
}

impl SwipeGesture {
    pub fn step(&self) -> Option<SwipeStep> {
        if self.elapsed_ms > SWIPE_MAX_DURATION_MS {
            return None;
        }
        let horizontal = self.dx.unsigned_abs();
        if horizontal < SWIPE_MIN_DISTANCE as u32 || horizontal < self.dy.unsigned_abs() {
            return None;
        }
        if self.dx < 0 {
            Some(SwipeStep::Next)
        } else {
            Some(SwipeStep::Previous)
        }
    }
}

/// Neighbouring tab in canonical order, clamped at both ends.
pub fn adjacent_tab(current: TabKey, step: SwipeStep) -> TabKey {
    let index = current.ordinal();
    let next = match step {
        SwipeStep::Next => index + 1,
        SwipeStep::Previous => index.saturating_sub(1),
    };
    TabKey::from_ordinal(next).unwrap_or(current)
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn chord_parsing_reads_modifiers() {
        let chord = "ctrl+3".parse::<KeyChord>().expect("chord");
        assert_eq!(chord, KeyChord::new(Modifiers::CTRL, '3'));
        let chord = "Cmd+1".parse::<KeyChord>().expect("chord");
        assert!(chord.modifiers.meta);
        assert_eq!(chord.key, '1');
        assert!("ctrl+".parse::<KeyChord>().is_err());
        assert!("hyper+1".parse::<KeyChord>().is_err());
        assert!("ctrl+12".parse::<KeyChord>().is_err());
    }

    #[test]
    fn shortcuts_need_a_command_modifier_and_valid_digit() {
        assert_eq!(
            KeyChord::new(Modifiers::CTRL, '3').tab_shortcut(),
            Some(TabKey::Files)
        );
        assert_eq!(KeyChord::new(Modifiers::default(), '3').tab_shortcut(), None);
        assert_eq!(KeyChord::new(Modifiers::CTRL, '0').tab_shortcut(), None);
        assert_eq!(KeyChord::new(Modifiers::CTRL, '5').tab_shortcut(), None);
        assert_eq!(KeyChord::new(Modifiers::CTRL, 'x').tab_shortcut(), None);
        let alt_only = Modifiers {
            alt: true,
            ..Modifiers::default()
        };
        assert_eq!(KeyChord::new(alt_only, '1').tab_shortcut(), None);
    }

    #[test]
    fn swipe_thresholds() {
        let swipe = |dx, dy, elapsed_ms| SwipeGesture { dx, dy, elapsed_ms }.step();
        assert_eq!(swipe(-80, 10, 200), Some(SwipeStep::Next));
        assert_eq!(swipe(80, 10, 200), Some(SwipeStep::Previous));
        assert_eq!(swipe(-59, 0, 200), None);
        assert_eq!(swipe(-80, 90, 200), None);
        assert_eq!(swipe(-80, 0, 601), None);
    }

    #[test]
    fn adjacent_tab_clamps_at_ends() {
        assert_eq!(adjacent_tab(TabKey::Chat, SwipeStep::Previous), TabKey::Chat);
        assert_eq!(adjacent_tab(TabKey::Chat, SwipeStep::Next), TabKey::Data);
        assert_eq!(adjacent_tab(TabKey::Team, SwipeStep::Next), TabKey::Team);
        assert_eq!(adjacent_tab(TabKey::Files, SwipeStep::Previous), TabKey::Data);
    }
}
