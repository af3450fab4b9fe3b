use std::sync::{Arc, Mutex};

use iced::widget::{column, container, row, text};
use iced::window;
use iced::{Alignment, Element, Length, Subscription, Task, Theme};

use popcorn_api::OmdbClient;
use popcorn_core::config::AppConfig;
use popcorn_core::keybinding::{KeyBinding, KeyBindings};
use popcorn_core::models::WatchedList;
use popcorn_core::persisted::PersistedState;
use popcorn_core::search::SearchOptions;
use popcorn_core::storage::KeyValueStore;
use popcorn_core::title::TitleRegistry;
use tokio::runtime::Handle;

use crate::keyboard;
use crate::screen::{detail, search, watched, Action};
use crate::style;
use crate::theme;
use crate::window_state::WindowGeometry;

/// Everything `main` prepares before the event loop starts.
#[derive(Clone)]
pub struct Flags {
    pub config: AppConfig,
    pub client: Arc<OmdbClient>,
    pub store: Arc<dyn KeyValueStore>,
    pub titles: TitleRegistry,
    pub window: Arc<Mutex<PersistedState<WindowGeometry>>>,
    pub runtime: Handle,
    /// Shown as a banner, e.g. a missing API key.
    pub startup_error: Option<String>,
}

/// Application state: a thin router over the three screens.
pub struct Popcorn {
    theme: Theme,
    titles: TitleRegistry,
    search: search::Search,
    detail: detail::Detail,
    watched: PersistedState<WatchedList>,
    window: Arc<Mutex<PersistedState<WindowGeometry>>>,
    bindings: KeyBindings<Message>,
    _clear_query: KeyBinding<Message>,
    close_detail: Option<KeyBinding<Message>>,
    startup_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Search(search::Message),
    Detail(detail::Message),
    Watched(watched::Message),
    KeyPressed(String),
    WindowEvent(window::Event),
    /// The user asked to close the window; pending writes go out first.
    CloseRequested(window::Id),
    Flushed(window::Id),
}

impl Popcorn {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let Flags {
            config,
            client,
            store,
            titles,
            window,
            runtime,
            startup_error,
        } = flags;

        let watched = PersistedState::init(
            store,
            config.storage.watched_key.clone(),
            WatchedList::new(),
        );
        tracing::info!(count = watched.get().len(), "watched list loaded");

        let bindings = KeyBindings::new();
        let clear_query = bindings.bind("Enter", || Message::Search(search::Message::ClearQuery));

        let app = Self {
            theme: theme::iced_theme(config.ui.theme),
            search: search::Search::new(
                Arc::clone(&client),
                SearchOptions::from(&config.search),
                config.ui.pagination_window,
                runtime.clone(),
            ),
            detail: detail::Detail::new(client, titles.clone(), config.ui.max_rating, runtime),
            titles,
            watched,
            window,
            bindings,
            _clear_query: clear_query,
            close_detail: None,
            startup_error,
        };
        (app, search::focus_query())
    }

    pub fn title(&self) -> String {
        self.titles.current()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::Search(msg) => {
                let action = self.search.update(msg);
                self.handle_action(action)
            }
            Message::Detail(msg) => {
                let action = self.detail.update(msg);
                self.handle_action(action)
            }
            Message::Watched(msg) => {
                let action = watched::update(msg);
                self.handle_action(action)
            }
            Message::KeyPressed(key) => {
                let messages = self.bindings.dispatch(&key);
                Task::batch(messages.into_iter().map(Task::done))
            }
            Message::WindowEvent(event) => {
                self.on_window_event(event);
                Task::none()
            }
            Message::CloseRequested(id) => self.flush_before_close(id),
            Message::Flushed(id) => {
                tracing::info!("state flushed, closing");
                window::close(id)
            }
        };
        self.sync_close_binding();
        task
    }

    fn handle_action(&mut self, action: Action) -> Task<Message> {
        match action {
            Action::None => Task::none(),
            Action::ToggleDetail(id) => {
                let watched_rating = self.watched.get().rating_for(&id);
                let action = self.detail.toggle(&id, watched_rating);
                self.handle_action(action)
            }
            Action::AddWatched(entry) => {
                tracing::info!(id = entry.id(), rating = entry.user_rating, "added to watched");
                self.watched.update(|list| list.with_entry(entry));
                self.detail.close();
                Task::none()
            }
            Action::RemoveWatched(id) => {
                tracing::info!(id = %id, "removed from watched");
                self.watched.update(|list| list.without(&id));
                Task::none()
            }
            Action::RunTask(task) => task,
        }
    }

    /// Escape closes the detail panel, but only while one is open.
    fn sync_close_binding(&mut self) {
        match (self.detail.is_open(), self.close_detail.is_some()) {
            (true, false) => {
                self.close_detail = Some(
                    self.bindings
                        .bind("Escape", || Message::Detail(detail::Message::Close)),
                );
            }
            (false, true) => self.close_detail = None,
            _ => {}
        }
    }

    fn on_window_event(&mut self, event: window::Event) {
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        match event {
            window::Event::Resized(size) => window.update(|g| g.resized(size)),
            window::Event::Moved(position) => window.update(|g| g.moved(position)),
            _ => {}
        }
    }

    fn flush_before_close(&self, id: window::Id) -> Task<Message> {
        let watched = self.watched.flush_handle();
        let geometry = self
            .window
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .flush_handle();
        Task::perform(
            async move {
                watched.flush().await;
                geometry.flush().await;
            },
            move |()| Message::Flushed(id),
        )
    }

    pub fn view(&self) -> Element<'_, Message> {
        let nav = container(
            row![
                text("🍿 usePopcorn").size(style::TEXT_XL),
                self.search.view_nav().map(Message::Search),
            ]
            .spacing(style::SPACE_XL)
            .align_y(Alignment::Center),
        )
        .padding([style::SPACE_SM, style::SPACE_XL])
        .center_y(Length::Fixed(style::NAV_HEIGHT))
        .width(Length::Fill)
        .style(theme::nav_bar);

        let results = self
            .search
            .view_results(self.detail.selected())
            .map(Message::Search);

        let right = match self.detail.selected() {
            Some(id) => self
                .detail
                .view(self.watched.get().rating_for(id))
                .map(Message::Detail),
            None => watched::view(self.watched.get()).map(Message::Watched),
        };

        let main = row![content_box(results), content_box(right)]
            .spacing(style::SPACE_XL)
            .height(Length::Fill);

        let mut page = column![nav].spacing(style::SPACE_XL);
        if let Some(error) = &self.startup_error {
            page = page.push(text(error).style(text::danger));
        }
        page = page.push(container(main).center_x(Length::Fill));

        container(page).padding(style::SPACE_XL).into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            keyboard::keyboard_subscription(),
            window::events().map(|(id, event)| match event {
                window::Event::CloseRequested => Message::CloseRequested(id),
                event => Message::WindowEvent(event),
            }),
        ])
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }
}

fn content_box<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fixed(style::BOX_WIDTH))
        .height(Length::Fill)
        .padding(style::SPACE_SM)
        .style(theme::panel)
        .into()
}
