//! The explorer context: turns user intents into fetches and display updates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::card::PokemonCard;
use crate::config::ExplorerConfig;
use crate::error::{FetchError, SearchError, UserMessage};
use crate::fetch::PokemonFetcher;
use crate::images::ImageResolver;
use crate::ports::{DisplayPort, ImageLoaderPort, JsonHttpPort, RandomPort};
use crate::utils::normalize_query;
use crate::view::DisplayState;

/// Keys the core cares about, independent of the terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    F(u8),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS, Super elsewhere.
    pub meta: bool,
}

impl Modifiers {
    #[cfg(test)]
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    FocusSearch,
    RandomSearch,
    DismissHelp,
}

pub struct Explorer {
    fetcher: PokemonFetcher,
    images: ImageResolver,
    display: Arc<dyn DisplayPort>,
    random: Arc<dyn RandomPort>,
    max_random_id: u32,
    help_visible: AtomicBool,
}

impl Explorer {
    pub fn new(
        config: ExplorerConfig,
        http: Arc<dyn JsonHttpPort>,
        image_loader: Arc<dyn ImageLoaderPort>,
        display: Arc<dyn DisplayPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            fetcher: PokemonFetcher::new(http, config.api_base.clone()),
            max_random_id: config.max_random_id,
            images: ImageResolver::new(image_loader, config),
            display,
            random,
            help_visible: AtomicBool::new(false),
        }
    }

    /// Put the display into its initial state.
    pub fn start(&self) {
        self.help_visible.store(false, Ordering::SeqCst);
        self.display.set_help_visible(false);
        self.display.set_display_state(DisplayState::Idle);
    }

    pub async fn on_submit_search(&self, raw: &str) {
        let _ = self.search(raw).await;
    }

    pub async fn on_request_random(&self) {
        let _ = self.random_search().await;
    }

    pub fn on_request_help(&self) {
        self.help_visible.store(true, Ordering::SeqCst);
        self.display.set_help_visible(true);
    }

    pub fn on_dismiss_help(&self) {
        self.help_visible.store(false, Ordering::SeqCst);
        self.display.set_help_visible(false);
    }

    pub fn is_help_visible(&self) -> bool {
        self.help_visible.load(Ordering::SeqCst)
    }

    /// Ctrl/Cmd+K focuses the search box, Ctrl/Cmd+R fetches a random entry,
    /// Escape closes the help overlay when it is open.
    pub fn shortcut_for(&self, key: Key, modifiers: Modifiers) -> Option<Shortcut> {
        match key {
            Key::Char('k') if modifiers.command() => Some(Shortcut::FocusSearch),
            Key::Char('r') if modifiers.command() => Some(Shortcut::RandomSearch),
            Key::Escape if self.is_help_visible() => Some(Shortcut::DismissHelp),
            _ => None,
        }
    }

    pub async fn run_shortcut(&self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::FocusSearch => self.display.focus_input(),
            Shortcut::RandomSearch => self.on_request_random().await,
            Shortcut::DismissHelp => self.on_dismiss_help(),
        }
    }

    /// Returns whether the key was bound to a shortcut.
    pub async fn on_key(&self, key: Key, modifiers: Modifiers) -> bool {
        match self.shortcut_for(key, modifiers) {
            Some(shortcut) => {
                self.run_shortcut(shortcut).await;
                true
            }
            None => false,
        }
    }

    /// Look up a name or id typed by the user.
    pub async fn search(&self, raw: &str) -> Result<(), SearchError> {
        let query = normalize_query(raw);
        if query.is_empty() {
            self.transition(DisplayState::Error(UserMessage::EmptyQuery));
            return Err(SearchError::EmptyQuery);
        }

        let _busy = self.begin_loading();
        match self.lookup(&query).await {
            Ok(state) => {
                self.transition(state);
                self.display.clear_input();
                Ok(())
            }
            Err(e) => {
                let err = SearchError::from(e);
                tracing::warn!(%query, error = %err, "search failed");
                self.transition(DisplayState::Error(UserMessage::for_search(&err, &query)));
                Err(err)
            }
        }
    }

    /// Look up a uniformly random id in `1..=max_random_id`. Returns the id used.
    pub async fn random_search(&self) -> Result<u32, SearchError> {
        let id = self.random.gen_range(1, self.max_random_id);
        let query = id.to_string();

        let _busy = self.begin_loading();
        match self.lookup(&query).await {
            Ok(state) => {
                self.transition(state);
                Ok(id)
            }
            Err(e) => {
                let err = SearchError::from(e);
                tracing::warn!(id, error = %err, "random search failed");
                self.transition(DisplayState::Error(UserMessage::for_random(&err)));
                Err(err)
            }
        }
    }

    async fn lookup(&self, query: &str) -> Result<DisplayState, FetchError> {
        let pokemon = self.fetcher.fetch(query).await?;
        tracing::info!(id = pokemon.id, name = %pokemon.name, "pokemon found");
        let card = PokemonCard::from_pokemon(&pokemon);
        let image = self.images.card_image(&pokemon).await;
        Ok(DisplayState::showing(card, image))
    }

    fn begin_loading(&self) -> BusyGuard<'_> {
        self.transition(DisplayState::Loading);
        self.display.set_search_busy(true);
        BusyGuard {
            display: self.display.as_ref(),
        }
    }

    /// Replace the display state. Any state change also closes the help overlay.
    fn transition(&self, state: DisplayState) {
        if self.help_visible.swap(false, Ordering::SeqCst) {
            self.display.set_help_visible(false);
        }
        self.display.set_display_state(state);
    }
}

/// Re-enables the submit control when dropped, whichever way the search ends.
struct BusyGuard<'a> {
    display: &'a dyn DisplayPort,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.display.set_search_busy(false);
    }
}
