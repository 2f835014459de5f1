use std::time::Duration;
use tracing::trace;

use crate::domain::{GridConfig, GridError, Message};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &GridConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    /// Waits at most `event_poll_time` for a key press. Returning without a message lets the
    /// caller tick the search debouncer.
    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, GridError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            return Ok(self.map_key(key, model.raw_keyevents()));
        }
        Ok(None)
    }

    fn map_key(&self, key: KeyEvent, raw: bool) -> Option<Message> {
        if raw {
            return Some(Message::RawKey(key));
        }
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::MoveUp),
            KeyCode::Char('h') | KeyCode::Left => Some(Message::MoveLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Message::MoveRight),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Message::NextPage),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Message::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Message::LastPage),
            KeyCode::Char('s') => Some(Message::Sort),
            KeyCode::Char('/') => Some(Message::Search),
            KeyCode::Char('c') => Some(Message::Columns),
            KeyCode::Char(' ') => Some(Message::ToggleColumn),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Enter => Some(Message::Enter),
            KeyCode::Esc => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn controller() -> Controller {
        Controller::new(&GridConfig::default())
    }

    #[test]
    fn maps_navigation_keys() {
        let c = controller();
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(c.map_key(press(KeyCode::Char('q')), false), Some(Message::Quit));
        assert_eq!(c.map_key(press(KeyCode::PageDown), false), Some(Message::NextPage));
        assert_eq!(c.map_key(press(KeyCode::Char('G')), false), Some(Message::LastPage));
        assert_eq!(c.map_key(press(KeyCode::Char('/')), false), Some(Message::Search));
        assert_eq!(c.map_key(press(KeyCode::F(5)), false), None);
    }

    #[test]
    fn forwards_raw_keys_while_editing() {
        let c = controller();
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(c.map_key(key, true), Some(Message::RawKey(key)));
    }
}
