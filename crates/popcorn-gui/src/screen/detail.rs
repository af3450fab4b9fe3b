use std::sync::Arc;

use iced::widget::{button, column, container, scrollable, text};
use iced::{Alignment, Element, Length, Task};

use popcorn_api::{MovieDetail, OmdbClient};
use popcorn_core::detail::{DetailFetcher, DetailState};
use popcorn_core::rating::StarRating;
use popcorn_core::title::TitleRegistry;
use tokio::runtime::Handle;

use crate::app;
use crate::screen::Action;
use crate::style;
use crate::widgets;

#[derive(Debug, Clone)]
pub enum Message {
    Close,
    StarHovered(u8),
    StarsLeft,
    StarClicked(u8),
    AddPressed,
    Settled,
}

/// Right-hand panel for the selected title.
pub struct Detail {
    fetcher: DetailFetcher<OmdbClient>,
    state: DetailState,
    stars: StarRating,
}

impl Detail {
    pub fn new(
        client: Arc<OmdbClient>,
        titles: TitleRegistry,
        max_rating: u8,
        runtime: Handle,
    ) -> Self {
        Self {
            fetcher: DetailFetcher::new(client, titles, max_rating, runtime),
            state: DetailState::default(),
            stars: StarRating::new(max_rating, 0),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.selected.is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.state.selected.as_deref()
    }

    /// Open `id`, or close the panel if `id` is already open. The stars
    /// start at the stored rating when the title was watched before.
    pub fn toggle(&mut self, id: &str, watched_rating: Option<u8>) -> Action {
        self.fetcher.toggle(id);
        self.stars.reset_to(watched_rating.unwrap_or(0));
        self.refresh();
        if !self.state.fetch.is_loading {
            return Action::None;
        }
        Action::RunTask(Task::perform(self.fetcher.settled(), |()| {
            app::Message::Detail(Message::Settled)
        }))
    }

    pub fn close(&mut self) {
        self.fetcher.close();
        self.stars.reset_to(0);
        self.refresh();
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::Close => {
                self.close();
                Action::None
            }
            Message::StarHovered(star) => {
                self.stars.hover(star);
                Action::None
            }
            Message::StarsLeft => {
                self.stars.leave();
                Action::None
            }
            Message::StarClicked(star) => {
                let star = self.stars.click(star);
                self.fetcher.rate(star);
                self.refresh();
                Action::None
            }
            Message::AddPressed => match self.fetcher.confirm() {
                Some(entry) => Action::AddWatched(entry),
                None => Action::None,
            },
            Message::Settled => {
                self.refresh();
                Action::None
            }
        }
    }

    fn refresh(&mut self) {
        self.state = self.fetcher.snapshot();
    }

    /// `watched_rating` is the stored rating when the open title is already
    /// in the watched list.
    pub fn view(&self, watched_rating: Option<u8>) -> Element<'_, Message> {
        if self.state.fetch.is_loading {
            return widgets::loader();
        }
        if let Some(error) = &self.state.fetch.error {
            return column![back_button(), widgets::error_message(error)].into();
        }
        let Some(movie) = self.state.movie() else {
            return widgets::loader();
        };

        let mut rating_section = column![widgets::star_rating(
            &self.stars,
            Message::StarHovered,
            Message::StarsLeft,
            Message::StarClicked,
        )]
        .spacing(style::SPACE_MD)
        .align_x(Alignment::Center);

        if let Some(rating) = watched_rating {
            rating_section =
                rating_section.push(text(format!("You rated this movie {rating} ⭐")));
        }
        let rated = self.state.user_rating;
        if rated > 0 && watched_rating != Some(rated) {
            let label = if watched_rating.is_some() {
                "Update rating"
            } else {
                "+ Add to list"
            };
            rating_section = rating_section.push(
                button(text(label).size(style::TEXT_LG))
                    .on_press(Message::AddPressed)
                    .style(button::primary),
            );
        }

        let mut body = column![
            header(movie),
            container(rating_section)
                .padding(style::SPACE_LG)
                .center_x(Length::Fill),
            text(&movie.plot).size(style::TEXT_BASE),
        ]
        .spacing(style::SPACE_LG)
        .padding(style::SPACE_LG);
        for line in credits(movie) {
            body = body.push(text(line).size(style::TEXT_BASE));
        }

        column![back_button(), scrollable(body).height(Length::Fill)].into()
    }
}

/// Cast and crew lines under the plot.
fn credits(movie: &MovieDetail) -> [String; 3] {
    [
        format!("Starring {}", movie.actors),
        format!("Directed by {}", movie.director),
        format!("Written by {}", movie.writer),
    ]
}

fn back_button<'a>() -> Element<'a, Message> {
    button(lucide_icons::iced::icon_arrow_left().size(style::TEXT_LG))
        .on_press(Message::Close)
        .style(button::secondary)
        .into()
}

fn header(movie: &MovieDetail) -> Element<'_, Message> {
    column![
        text(&movie.title)
            .size(style::TEXT_2XL)
            .line_height(style::LINE_HEIGHT_TIGHT),
        text(format!(
            "{} · {} min   {} {}",
            movie.release_date,
            movie.runtime_minutes,
            movie.kind.glyph(),
            movie.kind
        ))
        .size(style::TEXT_BASE),
        text(&movie.genre).size(style::TEXT_BASE),
        text(format!("⭐️ {} IMDb rating", movie.imdb_rating)).size(style::TEXT_BASE),
    ]
    .spacing(style::SPACE_SM)
    .into()
}
