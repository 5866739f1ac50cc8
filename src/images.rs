//! Picture lookup: candidate URLs, sequential verification and the compact
//! thumbnails the terminal paints.

use crate::config::ExplorerConfig;
use crate::error::{ImageLoadError, ImageUnavailable};
use crate::models::Pokemon;
use crate::ports::ImageLoaderPort;
use image::imageops::FilterType;
use std::sync::Arc;

const THUMB_W: u32 = 48;
const THUMB_H: u32 = 48;

/// Compact RGB thumbnail of a decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub w: u32,
    pub h: u32,
    /// RGB pixels in row-major order (len = w*h*3)
    pub pixels: Vec<u8>,
}

impl Sprite {
    /// Decode any format the `image` crate understands and shrink it to a thumbnail.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        let img = image::load_from_memory(bytes).map_err(|e| ImageLoadError::Decode(e.to_string()))?;
        let small = image::imageops::resize(&img.to_rgba8(), THUMB_W, THUMB_H, FilterType::Lanczos3);
        let mut pixels = Vec::with_capacity((THUMB_W * THUMB_H * 3) as usize);
        for p in small.pixels() {
            pixels.extend_from_slice(&[p[0], p[1], p[2]]);
        }
        Ok(Self {
            w: THUMB_W,
            h: THUMB_H,
            pixels,
        })
    }

    /// Pixel rows sized `w` x `h`. Resamples from the thumbnail when the size differs.
    pub fn rows(&self, w: u32, h: u32) -> Vec<Vec<(u8, u8, u8)>> {
        if self.w == w && self.h == h {
            return self
                .pixels
                .chunks_exact((w * 3) as usize)
                .map(|row| row.chunks_exact(3).map(|p| (p[0], p[1], p[2])).collect())
                .collect();
        }

        let mut buf = image::RgbaImage::new(self.w, self.h);
        for (i, px) in self.pixels.chunks_exact(3).enumerate() {
            let x = i as u32 % self.w;
            let y = i as u32 / self.w;
            buf.put_pixel(x, y, image::Rgba([px[0], px[1], px[2], 255]));
        }
        let resized = image::imageops::resize(&buf, w.max(1), h.max(1), FilterType::Lanczos3);
        (0..resized.height())
            .map(|y| {
                (0..resized.width())
                    .map(|x| {
                        let p = resized.get_pixel(x, y);
                        (p[0], p[1], p[2])
                    })
                    .collect()
            })
            .collect()
    }
}

/// The first candidate that loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub alt: String,
    pub sprite: Sprite,
}

/// What the card shows in its picture slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    Resolved(ResolvedImage),
    /// Nothing loaded; the picture is hidden.
    Unavailable,
}

/// Candidate URLs in priority order. Absent and empty entries are skipped.
pub fn image_candidates<'a>(
    pokemon: &'a Pokemon,
    config: &ExplorerConfig,
) -> impl Iterator<Item = String> + 'a {
    let sprites = &pokemon.sprites;
    let known = [
        sprites.official_artwork(),
        sprites.dream_world(),
        sprites.front_default.as_deref(),
        sprites.front_shiny.as_deref(),
    ];
    let fallbacks = [
        config.artwork_fallback(pokemon.id),
        config.sprite_fallback(pokemon.id),
    ];
    known
        .into_iter()
        .flatten()
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .chain(fallbacks)
}

#[derive(Clone)]
pub struct ImageResolver {
    loader: Arc<dyn ImageLoaderPort>,
    config: ExplorerConfig,
}

impl ImageResolver {
    pub fn new(loader: Arc<dyn ImageLoaderPort>, config: ExplorerConfig) -> Self {
        Self { loader, config }
    }

    /// One candidate, bounded by the configured timeout. A stalled request
    /// counts as a failed load.
    async fn load(&self, url: &str) -> Result<Sprite, ImageLoadError> {
        let limit = self.config.image_timeout;
        tokio::time::timeout(limit, self.loader.load(url))
            .await
            .unwrap_or(Err(ImageLoadError::TimedOut(limit)))
    }

    /// Try each candidate in turn; the next one is only requested once the
    /// previous attempt has failed.
    pub async fn resolve(&self, pokemon: &Pokemon) -> Result<ResolvedImage, ImageUnavailable> {
        for (index, url) in image_candidates(pokemon, &self.config).enumerate() {
            match self.load(&url).await {
                Ok(sprite) => {
                    return Ok(ResolvedImage {
                        url,
                        alt: format!("{} sprite", pokemon.name),
                        sprite,
                    })
                }
                Err(e) => {
                    tracing::debug!(source = index + 1, %url, error = %e, "image candidate failed");
                }
            }
        }
        let unavailable = ImageUnavailable {
            name: pokemon.name.clone(),
            id: pokemon.id,
        };
        tracing::info!("{unavailable}");
        Err(unavailable)
    }

    /// Like `resolve`, but a missing picture just hides the image slot.
    pub async fn card_image(&self, pokemon: &Pokemon) -> CardImage {
        match self.resolve(pokemon).await {
            Ok(img) => CardImage::Resolved(img),
            Err(ImageUnavailable { .. }) => CardImage::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_API_BASE, DEFAULT_MAX_RANDOM_ID};
    use crate::error::HttpError;
    use crate::ports::MockImageLoaderPort;
    use crate::testing::{pikachu, tiny_sprite, StalledLoader};
    use mockall::Sequence;
    use std::time::Duration;

    fn config() -> ExplorerConfig {
        ExplorerConfig::new(DEFAULT_API_BASE, DEFAULT_MAX_RANDOM_ID)
            .unwrap()
            .with_fallback_bases("http://fallback.test/art/", "http://fallback.test/sprite/")
            .unwrap()
    }

    fn all_sources() -> Pokemon {
        let mut p = pikachu();
        p.sprites = serde_json::from_value(serde_json::json!({
            "front_default": "http://img.test/1-default.png",
            "front_shiny": "http://img.test/1-shiny.png",
            "other": {
                "official-artwork": { "front_default": "http://img.test/1-art.png" },
                "dream_world": { "front_default": "http://img.test/1-dream.svg" }
            }
        }))
        .unwrap();
        p
    }

    #[test]
    fn candidates_follow_priority_order() {
        let p = all_sources();
        let urls: Vec<String> = image_candidates(&p, &config()).collect();
        assert_eq!(
            urls,
            vec![
                "http://img.test/1-art.png",
                "http://img.test/1-dream.svg",
                "http://img.test/1-default.png",
                "http://img.test/1-shiny.png",
                "http://fallback.test/art/25.png",
                "http://fallback.test/sprite/25.png",
            ]
        );
    }

    #[test]
    fn absent_and_empty_candidates_are_skipped() {
        let mut p = pikachu();
        p.sprites = serde_json::from_value(serde_json::json!({
            "front_default": "",
            "front_shiny": "http://img.test/shiny.png",
            "other": { "official-artwork": { "front_default": null } }
        }))
        .unwrap();
        let urls: Vec<String> = image_candidates(&p, &config()).collect();
        assert_eq!(
            urls,
            vec![
                "http://img.test/shiny.png",
                "http://fallback.test/art/25.png",
                "http://fallback.test/sprite/25.png",
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_first_loadable_candidate() {
        let mut loader = MockImageLoaderPort::new();
        let mut seq = Sequence::new();
        for bad in [
            "http://img.test/1-art.png",
            "http://img.test/1-dream.svg",
            "http://img.test/1-default.png",
        ] {
            loader
                .expect_load()
                .withf(move |url: &str| url == bad)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Err(ImageLoadError::Http(HttpError::Status(404))));
        }
        loader
            .expect_load()
            .withf(|url: &str| url == "http://img.test/1-shiny.png")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(tiny_sprite()));

        let resolver = ImageResolver::new(Arc::new(loader), config());
        let img = resolver.resolve(&all_sources()).await.unwrap();
        assert_eq!(img.url, "http://img.test/1-shiny.png");
        assert_eq!(img.alt, "pikachu sprite");
    }

    #[tokio::test]
    async fn exhausting_every_candidate_is_unavailable() {
        let mut loader = MockImageLoaderPort::new();
        loader
            .expect_load()
            .times(6)
            .returning(|_| Err(ImageLoadError::Decode("not an image".into())));

        let resolver = ImageResolver::new(Arc::new(loader), config());
        let p = all_sources();
        assert_eq!(
            resolver.resolve(&p).await,
            Err(ImageUnavailable {
                name: "pikachu".into(),
                id: 25
            })
        );
    }

    #[tokio::test]
    async fn generated_fallbacks_are_tried_without_api_sprites() {
        let mut loader = MockImageLoaderPort::new();
        let mut seq = Sequence::new();
        loader
            .expect_load()
            .withf(|url: &str| url == "http://fallback.test/art/25.png")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ImageLoadError::Http(HttpError::Transport("reset".into()))));
        loader
            .expect_load()
            .withf(|url: &str| url == "http://fallback.test/sprite/25.png")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(tiny_sprite()));

        let mut p = pikachu();
        p.sprites = Default::default();
        let resolver = ImageResolver::new(Arc::new(loader), config());
        assert!(matches!(
            resolver.card_image(&p).await,
            CardImage::Resolved(ResolvedImage { ref url, .. }) if url == "http://fallback.test/sprite/25.png"
        ));
    }

    #[tokio::test]
    async fn stalled_candidates_count_as_failures() {
        let cfg = config().with_image_timeout(Duration::from_millis(20)).unwrap();
        let loader = Arc::new(StalledLoader::default());
        let resolver = ImageResolver::new(loader.clone(), cfg);

        assert_eq!(
            resolver.load("http://img.test/slow.png").await,
            Err(ImageLoadError::TimedOut(Duration::from_millis(20)))
        );
        assert_eq!(resolver.card_image(&all_sources()).await, CardImage::Unavailable);
        assert_eq!(loader.attempts(), 7);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            Sprite::decode(b"<html>not found</html>"),
            Err(ImageLoadError::Decode(_))
        ));
    }

    #[test]
    fn decode_builds_fixed_size_thumbnail() {
        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();

        let sprite = Sprite::decode(&png).unwrap();
        assert_eq!((sprite.w, sprite.h), (48, 48));
        assert_eq!(sprite.pixels.len(), 48 * 48 * 3);
        assert!(sprite.pixels[0] > 250 && sprite.pixels[1] < 5 && sprite.pixels[2] < 5);
    }

    #[test]
    fn rows_resample_to_requested_size() {
        let sprite = tiny_sprite();
        let same = sprite.rows(sprite.w, sprite.h);
        assert_eq!(same.len(), sprite.h as usize);
        assert_eq!(same[0].len(), sprite.w as usize);

        let scaled = sprite.rows(4, 3);
        assert_eq!(scaled.len(), 3);
        assert!(scaled.iter().all(|r| r.len() == 4));
    }
}
