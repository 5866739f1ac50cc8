use crate::models::Pokemon;
use crate::utils::{
    capitalize, format_ability_name, format_base_experience, format_dex_number, format_height,
    format_weight,
};

/// Display-ready values for one Pokémon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonCard {
    pub name: String,
    pub number: String,
    pub height: String,
    pub weight: String,
    pub base_experience: String,
    pub types: Vec<TypeBadge>,
    pub abilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBadge {
    pub label: String,
    /// Raw type name, used by the view to pick a colour.
    pub kind: String,
}

impl PokemonCard {
    pub fn from_pokemon(p: &Pokemon) -> Self {
        Self {
            name: capitalize(&p.name),
            number: format_dex_number(p.id),
            height: format_height(p.height),
            weight: format_weight(p.weight),
            base_experience: format_base_experience(p.base_experience),
            types: p
                .type_names()
                .map(|t| TypeBadge {
                    label: capitalize(t),
                    kind: t.to_string(),
                })
                .collect(),
            abilities: p.ability_names().map(format_ability_name).collect(),
        }
    }
}
