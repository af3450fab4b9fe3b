use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length};

use popcorn_core::models::{WatchedEntry, WatchedList};

use crate::screen::Action;
use crate::style;
use crate::theme;

#[derive(Debug, Clone)]
pub enum Message {
    Remove(String),
}

pub fn update(msg: Message) -> Action {
    match msg {
        Message::Remove(id) => Action::RemoveWatched(id),
    }
}

/// Summary strip plus the watched titles, newest first.
pub fn view(list: &WatchedList) -> Element<'_, Message> {
    let summary = list.summary();
    let stats = row![
        text(format!("#️⃣ {} movies", summary.count)),
        text(format!("⭐️ {:.2}", summary.avg_imdb_rating)),
        text(format!("🌟 {:.2}", summary.avg_user_rating)),
        text(format!("⏳ {:.0} min", summary.avg_runtime)),
    ]
    .spacing(style::SPACE_LG);

    let header = container(
        column![
            text("Movies you watched")
                .size(style::TEXT_XL)
                .line_height(style::LINE_HEIGHT_TIGHT),
            stats,
        ]
        .spacing(style::SPACE_SM),
    )
    .padding(style::SPACE_LG)
    .width(Length::Fill)
    .style(theme::summary);

    let entries = column(list.newest_first().map(entry_row)).spacing(style::SPACE_XS);

    column![header, scrollable(entries).height(Length::Fill)]
        .spacing(style::SPACE_SM)
        .into()
}

fn entry_row(entry: &WatchedEntry) -> Element<'_, Message> {
    let movie = &entry.movie;
    let details = column![
        text(&movie.title).size(style::TEXT_LG),
        row![
            text(format!("⭐️ {}", movie.imdb_rating)),
            text(format!("🌟 {}", entry.user_rating)),
            text(format!("⏳ {} min", movie.runtime_minutes)),
        ]
        .spacing(style::SPACE_LG),
    ]
    .spacing(style::SPACE_XS)
    .width(Length::Fill);

    let remove = button(lucide_icons::iced::icon_x().size(style::TEXT_SM))
        .on_press(Message::Remove(entry.id().to_string()))
        .style(button::danger);

    container(
        row![details, remove]
            .spacing(style::SPACE_MD)
            .align_y(Alignment::Center),
    )
    .padding([style::SPACE_SM, style::SPACE_LG])
    .center_y(Length::Fixed(style::LIST_ROW_HEIGHT))
    .into()
}
