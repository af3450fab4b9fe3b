use iced::widget::{mouse_area, row, text};
use iced::{Alignment, Element};

use popcorn_core::rating::StarRating;

use crate::style;

/// A row of clickable stars followed by the current label.
///
/// Hovering previews a value, leaving the row restores the committed one.
pub fn star_rating<'a, Message: Clone + 'a>(
    stars: &StarRating,
    on_hover: impl Fn(u8) -> Message,
    on_leave: Message,
    on_click: impl Fn(u8) -> Message,
) -> Element<'a, Message> {
    let glyphs = (1..=stars.max()).map(|star| {
        let glyph = if stars.is_filled(star) { "★" } else { "☆" };
        Element::from(
            mouse_area(text(glyph).size(style::STAR_SIZE).style(text::primary))
                .on_enter(on_hover(star))
                .on_press(on_click(star)),
        )
    });

    let glyph_row = row(glyphs).spacing(style::SPACE_XS);

    row![
        mouse_area(glyph_row).on_exit(on_leave),
        text(stars.label()).size(style::TEXT_LG),
    ]
    .spacing(style::SPACE_MD)
    .align_y(Alignment::Center)
    .into()
}
