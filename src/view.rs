use crate::card::PokemonCard;
use crate::error::UserMessage;
use crate::images::CardImage;
use std::fmt;

/// What the result area shows. Exactly one variant is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Error(UserMessage),
    Showing(Box<ShownPokemon>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownPokemon {
    pub card: PokemonCard,
    pub image: CardImage,
}

impl DisplayState {
    pub fn showing(card: PokemonCard, image: CardImage) -> Self {
        DisplayState::Showing(Box::new(ShownPokemon { card, image }))
    }
}

#[cfg(test)]
impl DisplayState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    pub fn error_message(&self) -> Option<&UserMessage> {
        match self {
            DisplayState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn shown(&self) -> Option<&ShownPokemon> {
        match self {
            DisplayState::Showing(shown) => Some(shown),
            _ => None,
        }
    }
}

/// Plain-text rendering, used by the one-shot lookup mode.
impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::Idle => write!(f, "Enter a Pokémon name or ID to begin."),
            DisplayState::Loading => write!(f, "Searching..."),
            DisplayState::Error(msg) => write!(f, "{msg}"),
            DisplayState::Showing(shown) => {
                let card = &shown.card;
                writeln!(f, "{} {}", card.name, card.number)?;
                let types: Vec<&str> = card.types.iter().map(|t| t.label.as_str()).collect();
                writeln!(f, "Types: {}", types.join(", "))?;
                writeln!(f, "Height: {}  Weight: {}", card.height, card.weight)?;
                writeln!(f, "Base EXP: {}", card.base_experience)?;
                writeln!(f, "Abilities: {}", card.abilities.join(", "))?;
                match &shown.image {
                    CardImage::Resolved(img) => write!(f, "Image: {}", img.url),
                    CardImage::Unavailable => write!(f, "Image: unavailable"),
                }
            }
        }
    }
}
