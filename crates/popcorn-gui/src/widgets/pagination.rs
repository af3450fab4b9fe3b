use iced::widget::{button, container, row, text};
use iced::{Alignment, Element, Length};

use popcorn_core::pagination::PaginationWindow;

use crate::style;

/// `‹ … 4 5 6 … ›` for the current window. Controls that cannot move are
/// drawn disabled.
pub fn pagination<'a, Message: Clone + 'a>(
    window: &PaginationWindow,
    on_select: impl Fn(u32) -> Message,
) -> Element<'a, Message> {
    let prev = button(lucide_icons::iced::icon_chevron_left().size(style::TEXT_BASE))
        .on_press_maybe(window.prev_page().map(&on_select))
        .style(button::text);

    let mut controls = row![prev]
        .spacing(style::SPACE_XS)
        .align_y(Alignment::Center);

    if let Some(target) = window.prev_ellipsis_target() {
        controls = controls.push(page_button("…", on_select(target), false));
    }
    for &page in &window.pages {
        controls = controls.push(page_button(
            page.to_string(),
            on_select(page),
            page == window.page,
        ));
    }
    if let Some(target) = window.next_ellipsis_target() {
        controls = controls.push(page_button("…", on_select(target), false));
    }

    let next = button(lucide_icons::iced::icon_chevron_right().size(style::TEXT_BASE))
        .on_press_maybe(window.next_page().map(&on_select))
        .style(button::text);
    controls = controls.push(next);

    container(controls).center_x(Length::Fill).into()
}

fn page_button<'a, Message: Clone + 'a>(
    label: impl Into<String>,
    on_press: Message,
    active: bool,
) -> Element<'a, Message> {
    let label = container(text(label.into()).size(style::TEXT_SM)).center_x(Length::Fill);
    button(label)
        .width(Length::Fixed(style::PAGE_BUTTON_WIDTH))
        .on_press_maybe((!active).then_some(on_press))
        .style(if active { button::primary } else { button::secondary })
        .into()
}
