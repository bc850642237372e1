use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Smooths over platform differences in key reporting before events reach
/// the console.
///
/// Release events never reach the prompt. Windows additionally reports
/// auto-repeat and a press for every Esc held down; only the first press of
/// a held Esc is kept there. Terminals disagree about the case of a letter
/// pressed together with Ctrl, so those are folded to lowercase.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(mut key) = evt else {
            return Some(evt);
        };
        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_down = false;
                }
                return None;
            }
            KeyEventKind::Repeat if cfg!(windows) => return None,
            _ => {}
        }
        if cfg!(windows) {
            if key.code == KeyCode::Esc {
                if self.esc_down {
                    return None;
                }
                self.esc_down = true;
            } else {
                self.esc_down = false;
            }
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
            && let KeyCode::Char(ch) = key.code
            && ch.is_ascii_uppercase()
        {
            key.code = KeyCode::Char(ch.to_ascii_lowercase());
        }
        Some(Event::Key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn release_events_are_dropped() {
        let mut norm = KeyboardNormalizer::new();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(norm.normalize(Event::Key(key)).is_none());
    }

    #[test]
    fn ctrl_letters_are_lowercased() {
        let mut norm = KeyboardNormalizer::new();
        let key = KeyEvent::new(
            KeyCode::Char('L'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        match norm.normalize(Event::Key(key)) {
            Some(Event::Key(k)) => assert_eq!(k.code, KeyCode::Char('l')),
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn plain_uppercase_is_untouched() {
        let mut norm = KeyboardNormalizer::new();
        let key = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        match norm.normalize(Event::Key(key)) {
            Some(Event::Key(k)) => assert_eq!(k.code, KeyCode::Char('Q')),
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyboardNormalizer::new();
        assert_eq!(
            norm.normalize(Event::Resize(10, 20)),
            Some(Event::Resize(10, 20))
        );
    }
}
