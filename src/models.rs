use serde::{Deserialize, Serialize};

/// A Pokémon record as returned by the `pokemon/{id or name}` endpoint.
///
/// Only the fields the card needs are modelled; everything else in the
/// response body is ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Decimeters.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl Pokemon {
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.kind.name.as_str())
    }

    pub fn ability_names(&self) -> impl Iterator<Item = &str> {
        self.abilities.iter().map(|a| a.ability.name.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u8,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<SpriteSet>,
    #[serde(default)]
    pub dream_world: Option<SpriteSet>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct SpriteSet {
    #[serde(default)]
    pub front_default: Option<String>,
}

impl Sprites {
    pub fn official_artwork(&self) -> Option<&str> {
        self.other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|s| s.front_default.as_deref())
    }

    pub fn dream_world(&self) -> Option<&str> {
        self.other
            .as_ref()
            .and_then(|o| o.dream_world.as_ref())
            .and_then(|s| s.front_default.as_deref())
    }
}
