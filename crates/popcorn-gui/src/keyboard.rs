//! Global keyboard listener.
//!
//! Every key press that no widget captured is forwarded by name. The app
//! looks the name up in its `KeyBindings` registry, so which keys do
//! something depends on which bindings are alive at the moment.

use iced::event::{self, Event};
use iced::keyboard;
use iced::Subscription;

use crate::app::Message;

pub fn keyboard_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _id| match (event, status) {
        (
            Event::Keyboard(keyboard::Event::KeyPressed { key, .. }),
            event::Status::Ignored,
        ) => key_name(&key).map(Message::KeyPressed),
        _ => None,
    })
}

/// `Escape`, `Enter`, `a`, ... as the registry expects them.
fn key_name(key: &keyboard::Key) -> Option<String> {
    match key {
        keyboard::Key::Named(named) => Some(format!("{named:?}")),
        keyboard::Key::Character(c) => Some(c.to_string()),
        keyboard::Key::Unidentified => None,
    }
}
