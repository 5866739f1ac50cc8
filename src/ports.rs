//! Boundaries between the explorer core and the outside world.
//!
//! The network and image loading sit behind async ports so the HTTP client can
//! be swapped for a fake in tests. The display port is the only way the core
//! talks to whatever draws the screen.

use async_trait::async_trait;
use url::Url;

use crate::error::{HttpError, ImageLoadError};
use crate::images::Sprite;
use crate::view::DisplayState;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonHttpPort: Send + Sync {
    /// Single GET, body parsed as JSON. Non-2xx answers come back as `HttpError::Status`.
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, HttpError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageLoaderPort: Send + Sync {
    /// Download and decode one image. Success means the image is displayable.
    async fn load(&self, url: &str) -> Result<Sprite, ImageLoadError>;
}

pub trait DisplayPort: Send + Sync {
    fn set_display_state(&self, state: DisplayState);
    /// Disable the submit control and relabel it while a search runs.
    fn set_search_busy(&self, busy: bool);
    fn clear_input(&self);
    fn focus_input(&self);
    fn set_help_visible(&self, visible: bool);
}

pub trait RandomPort: Send + Sync {
    /// Uniform in `min..=max`.
    fn gen_range(&self, min: u32, max: u32) -> u32;
}

/// Thread-local RNG.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }
}
