use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2/pokemon/";
pub const DEFAULT_ARTWORK_FALLBACK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/";
pub const DEFAULT_SPRITE_FALLBACK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/";
/// Approximate size of the national dex.
pub const DEFAULT_MAX_RANDOM_ID: u32 = 1010;
/// How long one image candidate may take before the next one is tried.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for one explorer instance. Built once at startup.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub api_base: Url,
    pub max_random_id: u32,
    pub artwork_fallback_base: Url,
    pub sprite_fallback_base: Url,
    pub image_timeout: Duration,
}

impl ExplorerConfig {
    pub fn new(api_base: &str, max_random_id: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_base("api_base", api_base)?,
            max_random_id: validate_max_id(max_random_id)?,
            artwork_fallback_base: parse_base(
                "artwork_fallback_base",
                DEFAULT_ARTWORK_FALLBACK_BASE,
            )?,
            sprite_fallback_base: parse_base("sprite_fallback_base", DEFAULT_SPRITE_FALLBACK_BASE)?,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
        })
    }

    pub fn with_fallback_bases(mut self, artwork: &str, sprite: &str) -> Result<Self, ConfigError> {
        self.artwork_fallback_base = parse_base("artwork_fallback_base", artwork)?;
        self.sprite_fallback_base = parse_base("sprite_fallback_base", sprite)?;
        Ok(self)
    }

    pub fn with_image_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroImageTimeout);
        }
        self.image_timeout = timeout;
        Ok(self)
    }

    /// `<artwork base><id>.png`
    pub fn artwork_fallback(&self, id: u32) -> String {
        join_png(&self.artwork_fallback_base, id)
    }

    /// `<sprite base><id>.png`
    pub fn sprite_fallback(&self, id: u32) -> String {
        join_png(&self.sprite_fallback_base, id)
    }
}

fn parse_base(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            field,
            reason: format!("{url} cannot carry path segments"),
        });
    }
    Ok(url)
}

fn validate_max_id(max: u32) -> Result<u32, ConfigError> {
    if max == 0 {
        Err(ConfigError::EmptyRandomRange)
    } else {
        Ok(max)
    }
}

fn join_png(base: &Url, id: u32) -> String {
    let base = base.as_str();
    let sep = if base.ends_with('/') { "" } else { "/" };
    format!("{base}{sep}{id}.png")
}
