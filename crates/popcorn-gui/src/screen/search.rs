use std::sync::Arc;

use iced::widget::{button, column, container, operation, row, scrollable, text, text_input, Id};
use iced::{Alignment, Element, Length, Task};

use popcorn_api::{OmdbClient, SearchResult};
use popcorn_core::pagination::PaginationWindow;
use popcorn_core::search::{SearchFetcher, SearchOptions, SearchState};
use tokio::runtime::Handle;

use crate::app;
use crate::screen::Action;
use crate::style;
use crate::widgets;

/// The query field, so Enter and startup can hand it focus.
const QUERY_INPUT: Id = Id::new("search-query");

/// Move keyboard focus into the query field.
pub fn focus_query() -> Task<app::Message> {
    operation::focus(QUERY_INPUT)
}

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    /// Enter inside the field. The field keeps the event so the global
    /// Enter binding does not clear what was just typed.
    QuerySubmitted,
    ClearQuery,
    PageSelected(u32),
    ResultPressed(String),
    Settled,
}

/// Query box, result list and pager.
pub struct Search {
    fetcher: SearchFetcher<OmdbClient>,
    query: String,
    page: u32,
    window_size: u32,
    state: SearchState,
}

impl Search {
    pub fn new(
        client: Arc<OmdbClient>,
        options: SearchOptions,
        window_size: u32,
        runtime: Handle,
    ) -> Self {
        Self {
            fetcher: SearchFetcher::new(client, options, runtime),
            query: String::new(),
            page: 1,
            window_size,
            state: SearchState::default(),
        }
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::QueryChanged(query) => {
                self.query = query;
                self.page = 1;
                self.observe()
            }
            Message::QuerySubmitted => Action::None,
            Message::ClearQuery => {
                self.query.clear();
                self.page = 1;
                match self.observe() {
                    Action::RunTask(task) => Action::RunTask(Task::batch([task, focus_query()])),
                    _ => Action::RunTask(focus_query()),
                }
            }
            Message::PageSelected(page) => {
                self.page = page;
                self.observe()
            }
            Message::ResultPressed(id) => Action::ToggleDetail(id),
            Message::Settled => {
                self.state = self.fetcher.snapshot();
                Action::None
            }
        }
    }

    fn observe(&mut self) -> Action {
        self.fetcher.observe(&self.query, self.page);
        self.state = self.fetcher.snapshot();
        if !self.state.is_loading {
            return Action::None;
        }
        Action::RunTask(Task::perform(self.fetcher.settled(), |()| {
            app::Message::Search(Message::Settled)
        }))
    }

    pub fn result_count(&self) -> u32 {
        self.state.data.total_results
    }

    /// Search field and result count for the navigation bar.
    pub fn view_nav(&self) -> Element<'_, Message> {
        let input = text_input("Search movies...", &self.query)
            .id(QUERY_INPUT)
            .on_input(Message::QueryChanged)
            .on_submit(Message::QuerySubmitted)
            .size(style::TEXT_LG)
            .padding([style::SPACE_SM, style::SPACE_MD])
            .width(Length::Fixed(style::SEARCH_WIDTH));

        let mut search_row = row![input]
            .spacing(style::SPACE_SM)
            .align_y(Alignment::Center);
        if !self.query.is_empty() {
            let clear = button(lucide_icons::iced::icon_x().size(style::TEXT_SM))
                .on_press(Message::ClearQuery)
                .style(button::text);
            search_row = search_row.push(clear);
        }

        let found = text(format!("Found {} results", self.result_count())).size(style::TEXT_LG);

        row![search_row, found]
            .spacing(style::SPACE_XL)
            .align_y(Alignment::Center)
            .into()
    }

    /// Left box: loader, error, or the hits plus pager.
    pub fn view_results(&self, selected: Option<&str>) -> Element<'_, Message> {
        if self.state.is_loading {
            return widgets::loader();
        }
        if let Some(error) = &self.state.error {
            return widgets::error_message(error);
        }

        let list = column(
            self.state
                .data
                .results
                .iter()
                .map(|hit| result_row(hit, selected == Some(hit.id.as_str()))),
        )
        .spacing(style::SPACE_XS);

        let window =
            PaginationWindow::compute(self.state.data.total_results, self.page, self.window_size);

        column![
            scrollable(list).height(Length::Fill),
            widgets::pagination(&window, Message::PageSelected),
        ]
        .spacing(style::SPACE_SM)
        .into()
    }
}

fn result_row(hit: &SearchResult, selected: bool) -> Element<'_, Message> {
    let details = column![
        text(&hit.title).size(style::TEXT_LG),
        text(format!("🗓 {}   {} {}", hit.year, hit.kind.glyph(), hit.kind)).size(style::TEXT_SM),
    ]
    .spacing(style::SPACE_XS);

    let content = container(details)
        .center_y(Length::Fixed(style::LIST_ROW_HEIGHT))
        .width(Length::Fill);

    button(content)
        .on_press(Message::ResultPressed(hit.id.clone()))
        .width(Length::Fill)
        .style(if selected { button::primary } else { button::text })
        .into()
}
