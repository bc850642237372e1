use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ClearConsole,
    ClearInput,
    ReleaseFocus,
    Submit,
    HistoryOlder,
    HistoryNewer,
    Paste,
}

impl Action {
    /// Actions the console input field intercepts, in display order.
    pub const CONSOLE: [Action; 7] = [
        Action::Submit,
        Action::HistoryOlder,
        Action::HistoryNewer,
        Action::ClearConsole,
        Action::ClearInput,
        Action::Paste,
        Action::ReleaseFocus,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::ClearConsole => "Clear console",
            Action::ClearInput => "Clear input",
            Action::ReleaseFocus => "Release focus",
            Action::Submit => "Run command",
            Action::HistoryOlder => "Previous command",
            Action::HistoryNewer => "Next command",
            Action::Paste => "Paste",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Letters match regardless of case or Shift, so Ctrl+Shift+L still
    /// clears the console.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match (self.code, key.code) {
            (KeyCode::Char(want), KeyCode::Char(got)) => {
                want.eq_ignore_ascii_case(&got)
                    && key.modifiers.difference(KeyModifiers::SHIFT)
                        == self.mods.difference(KeyModifiers::SHIFT)
            }
            (want, got) => want == got && key.modifiers == self.mods,
        }
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SUPER) {
            parts.push("Cmd".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        // Ctrl on every platform, Cmd where the terminal reports it.
        for mods in [KeyModifiers::CONTROL, KeyModifiers::SUPER] {
            kb.add(ClearConsole, KeyCombo::new(KeyCode::Char('l'), mods));
            kb.add(ClearInput, KeyCombo::new(KeyCode::Char('k'), mods));
            kb.add(Paste, KeyCombo::new(KeyCode::Char('v'), mods));
        }
        kb.add(ReleaseFocus, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(Submit, KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE));
        kb.add(HistoryOlder, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(HistoryNewer, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// First of `candidates` bound to `key`.
    pub fn action_among(&self, candidates: &[Action], key: &KeyEvent) -> Option<Action> {
        candidates.iter().copied().find(|a| self.matches(*a, key))
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
    }

    #[test]
    fn letters_ignore_case_and_shift() {
        let kb = KeyBindings::default();
        let shifted = KeyEvent::new(
            KeyCode::Char('L'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert!(kb.matches(Action::ClearConsole, &shifted));
        let cmd = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER);
        assert!(kb.matches(Action::ClearInput, &cmd));
        let plain = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(kb.action_among(&Action::CONSOLE, &plain), None);
    }

    #[test]
    fn combos_are_displayed_readably() {
        let kb = KeyBindings::default();
        assert_eq!(kb.combos_for(Action::Quit), vec!["Ctrl+Q".to_string()]);
    }
}
