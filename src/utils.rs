//! Utility helpers used across the application (text formatting, suggestions).
//! Keep helpers small and well-documented for readability.

/// Uppercase the first character and leave the rest untouched.
///
/// Examples: `pikachu` -> `Pikachu`, `mr-mime` -> `Mr-mime`.
pub fn capitalize(s: &str) -> String {
    let mut chs = s.chars();
    match chs.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chs.as_str(),
    }
}

/// Format an ability slug for display.
///
/// Examples: `solar-power` -> `Solar Power`, `static` -> `Static`.
pub fn format_ability_name(name: &str) -> String {
    name.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// `#` followed by the id, zero-padded to at least three digits.
pub fn format_dex_number(id: u32) -> String {
    format!("#{:03}", id)
}

/// Decimeters to meters, one decimal place.
pub fn format_height(decimeters: u32) -> String {
    format!("{:.1} m", decimeters as f64 / 10.0)
}

/// Hectograms to kilograms, one decimal place.
pub fn format_weight(hectograms: u32) -> String {
    format!("{:.1} kg", hectograms as f64 / 10.0)
}

pub fn format_base_experience(exp: Option<u32>) -> String {
    exp.map(|e| e.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// Trim and lowercase raw input into the form the API expects.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Names offered as suggestions while typing.
pub const COMMON_POKEMON: [&str; 20] = [
    "pikachu", "charizard", "blastoise", "venusaur", "alakazam", "machamp", "golem", "gengar",
    "gyarados", "lapras", "eevee", "snorlax", "articuno", "zapdos", "moltres", "dragonite",
    "mewtwo", "mew", "lucario", "garchomp",
];

/// Catalog entries starting with `prefix`, in catalog order.
///
/// Prefixes shorter than two characters produce nothing. The prefix is
/// lowercased but not trimmed.
pub fn suggest<'a>(prefix: &str, catalog: &[&'a str]) -> Vec<&'a str> {
    let prefix = prefix.to_lowercase();
    if prefix.chars().count() < 2 {
        return vec![];
    }
    catalog
        .iter()
        .copied()
        .filter(|name| name.starts_with(&prefix))
        .collect()
}
