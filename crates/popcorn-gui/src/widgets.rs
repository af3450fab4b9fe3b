pub mod pagination;
pub mod star_rating;

pub use pagination::pagination;
pub use star_rating::star_rating;

use iced::widget::{center, text};
use iced::{Element, Length};

use crate::style;

/// Placeholder shown while a request is in flight.
pub fn loader<'a, Message: 'a>() -> Element<'a, Message> {
    center(text("Loading...").size(style::TEXT_LG))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Inline error with the server's (or transport's) message.
pub fn error_message<'a, Message: 'a>(message: &'a str) -> Element<'a, Message> {
    center(
        text(format!("⛔️ {message}"))
            .size(style::TEXT_LG)
            .style(text::danger),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}
