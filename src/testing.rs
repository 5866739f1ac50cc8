//! Shared fixtures and fakes for unit tests.

use crate::error::ImageLoadError;
use crate::images::Sprite;
use crate::models::Pokemon;
use crate::ports::{DisplayPort, ImageLoaderPort, RandomPort};
use crate::view::DisplayState;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Trimmed-down `pokemon/25` response.
pub fn pikachu_json() -> serde_json::Value {
    serde_json::json!({
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "base_experience": 112,
        "order": 35,
        "types": [
            { "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } }
        ],
        "abilities": [
            { "ability": { "name": "static", "url": "https://pokeapi.co/api/v2/ability/9/" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "lightning-rod", "url": "https://pokeapi.co/api/v2/ability/31/" }, "is_hidden": true, "slot": 3 }
        ],
        "sprites": {
            "front_default": "https://img.test/sprites/25.png",
            "front_shiny": "https://img.test/sprites/shiny/25.png",
            "back_default": "https://img.test/sprites/back/25.png",
            "other": {
                "official-artwork": { "front_default": "https://img.test/artwork/25.png" },
                "dream_world": { "front_default": null }
            }
        }
    })
}

pub fn pikachu() -> Pokemon {
    serde_json::from_value(pikachu_json()).unwrap()
}

pub fn tiny_sprite() -> Sprite {
    Sprite {
        w: 2,
        h: 2,
        pixels: vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
    }
}

/// Everything the core pushed at the display, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    State(DisplayState),
    Busy(bool),
    ClearInput,
    FocusInput,
    Help(bool),
}

#[derive(Default)]
pub struct RecordingDisplay {
    calls: Mutex<Vec<DisplayCall>>,
}

impl RecordingDisplay {
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<DisplayState> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DisplayCall::State(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn last_state(&self) -> Option<DisplayState> {
        self.states().pop()
    }

    fn push(&self, call: DisplayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DisplayPort for RecordingDisplay {
    fn set_display_state(&self, state: DisplayState) {
        self.push(DisplayCall::State(state));
    }

    fn set_search_busy(&self, busy: bool) {
        self.push(DisplayCall::Busy(busy));
    }

    fn clear_input(&self) {
        self.push(DisplayCall::ClearInput);
    }

    fn focus_input(&self) {
        self.push(DisplayCall::FocusInput);
    }

    fn set_help_visible(&self, visible: bool) {
        self.push(DisplayCall::Help(visible));
    }
}

/// Always returns the same number and remembers the last requested range.
pub struct FixedRandom {
    value: u32,
    last_max: AtomicU32,
}

impl FixedRandom {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            last_max: AtomicU32::new(0),
        }
    }

    pub fn last_max(&self) -> u32 {
        self.last_max.load(Ordering::SeqCst)
    }
}

impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: u32, max: u32) -> u32 {
        self.last_max.store(max, Ordering::SeqCst);
        self.value
    }
}

/// Image host that accepts the request and never answers.
#[derive(Default)]
pub struct StalledLoader {
    attempts: AtomicU32,
}

impl StalledLoader {
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageLoaderPort for StalledLoader {
    async fn load(&self, _url: &str) -> Result<Sprite, ImageLoadError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}
