//! Pet domain model: species, colors, sizes and the allow-lists that
//! keep user configuration inside the set of bundled sprite sheets.

use serde::{Deserialize, Serialize};

use crate::config::PetsConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum PetType {
    #[default]
    Cat,
    Clippy,
    Dog,
    RubberDuck,
    Snake,
}

impl PetType {
    /// String form used in asset paths and event payloads (kebab-case).
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PetType::Cat => "cat",
            PetType::Clippy => "clippy",
            PetType::Dog => "dog",
            PetType::RubberDuck => "rubber-duck",
            PetType::Snake => "snake",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        ALL_PETS.iter().copied().find(|t| t.as_str() == name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PetColor {
    Black,
    #[default]
    Brown,
    Green,
    Yellow,
}

impl PetColor {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PetColor::Black => "black",
            PetColor::Brown => "brown",
            PetColor::Green => "green",
            PetColor::Yellow => "yellow",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        ALL_COLORS.iter().copied().find(|c| c.as_str() == name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PetSize {
    #[default]
    Nano,
    Medium,
    Large,
}

impl PetSize {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PetSize::Nano => "nano",
            PetSize::Medium => "medium",
            PetSize::Large => "large",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        ALL_SCALES.iter().copied().find(|s| s.as_str() == name)
    }
}

pub(crate) const ALL_PETS: &[PetType] = &[
    PetType::Cat,
    PetType::Clippy,
    PetType::Dog,
    PetType::RubberDuck,
    PetType::Snake,
];

pub(crate) const ALL_COLORS: &[PetColor] = &[
    PetColor::Black,
    PetColor::Brown,
    PetColor::Green,
    PetColor::Yellow,
];

pub(crate) const ALL_SCALES: &[PetSize] = &[PetSize::Nano, PetSize::Medium, PetSize::Large];

/// Some pets can only have certain colors; this repairs misconfigured combos.
/// Snakes are always green, rubber ducks always yellow, and a green cat or
/// dog falls back to brown.
pub(crate) fn normalize_color(color: PetColor, pet_type: PetType) -> PetColor {
    match pet_type {
        PetType::Snake => PetColor::Green,
        PetType::RubberDuck => PetColor::Yellow,
        PetType::Cat | PetType::Dog if color == PetColor::Green => PetColor::Brown,
        _ => color,
    }
}

/// Color choices offered when spawning a pet of the given species.
pub(crate) fn allowed_colors(pet_type: PetType) -> &'static [PetColor] {
    match pet_type {
        PetType::RubberDuck => &[PetColor::Yellow],
        PetType::Snake => &[PetColor::Green],
        PetType::Cat | PetType::Dog => &[PetColor::Black, PetColor::Brown],
        PetType::Clippy => &[PetColor::Black, PetColor::Brown, PetColor::Green],
    }
}

/// One pet instance: the (color, type, size) tuple rendered by the webview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PetSpecification {
    pub(crate) color: PetColor,
    #[serde(rename = "type")]
    pub(crate) kind: PetType,
    pub(crate) size: PetSize,
}

impl PetSpecification {
    pub(crate) fn new(color: PetColor, kind: PetType, size: PetSize) -> Self {
        Self { color, kind, size }
    }

    /// Resolve the user-configured tuple. Fields are already validated at
    /// deserialization time (unknown values fall back to defaults there).
    pub(crate) fn from_config(config: &PetsConfig) -> Self {
        Self::new(config.pet_color, config.pet_type, config.pet_size)
    }

    /// Copy of this spec with per-species color constraints applied.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            color: normalize_color(self.color, self.kind),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Memento serialization
// ---------------------------------------------------------------------------

/// Persisted form of the spawned-pet collection: two parallel arrays, one
/// entry per pet. Size is not persisted; pets are restored at the size
/// configured at restore time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct PetMemento {
    #[serde(default)]
    pub(crate) types: Vec<PetType>,
    #[serde(default)]
    pub(crate) colors: Vec<PetColor>,
}

/// Rebuild the collection from a memento at the given size. Mismatched
/// array lengths zip to the shorter one.
pub(crate) fn collection_from_memento(memento: &PetMemento, size: PetSize) -> Vec<PetSpecification> {
    memento
        .types
        .iter()
        .zip(memento.colors.iter())
        .map(|(&kind, &color)| PetSpecification::new(color, kind, size))
        .collect()
}

/// Split a collection into the parallel arrays stored on disk.
pub(crate) fn collection_to_memento(collection: &[PetSpecification]) -> PetMemento {
    PetMemento {
        types: collection.iter().map(|s| s.kind).collect(),
        colors: collection.iter().map(|s| s.color).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snakes_are_always_green() {
        for &color in ALL_COLORS {
            assert_eq!(normalize_color(color, PetType::Snake), PetColor::Green);
        }
    }

    #[test]
    fn rubber_ducks_are_always_yellow() {
        for &color in ALL_COLORS {
            assert_eq!(
                normalize_color(color, PetType::RubberDuck),
                PetColor::Yellow
            );
        }
    }

    #[test]
    fn green_cat_or_dog_becomes_brown() {
        assert_eq!(
            normalize_color(PetColor::Green, PetType::Cat),
            PetColor::Brown
        );
        assert_eq!(
            normalize_color(PetColor::Green, PetType::Dog),
            PetColor::Brown
        );
    }

    #[test]
    fn other_combinations_pass_through() {
        assert_eq!(
            normalize_color(PetColor::Black, PetType::Cat),
            PetColor::Black
        );
        assert_eq!(
            normalize_color(PetColor::Green, PetType::Clippy),
            PetColor::Green
        );
    }

    #[test]
    fn normalize_color_is_idempotent() {
        for &pet_type in ALL_PETS {
            for &color in ALL_COLORS {
                let once = normalize_color(color, pet_type);
                assert_eq!(normalize_color(once, pet_type), once);
            }
        }
    }

    #[test]
    fn allowed_colors_survive_normalization() {
        for &pet_type in ALL_PETS {
            for &color in allowed_colors(pet_type) {
                assert_eq!(normalize_color(color, pet_type), color);
            }
        }
    }

    #[test]
    fn pet_type_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PetType::RubberDuck).unwrap(),
            r#""rubber-duck""#
        );
        assert_eq!(serde_json::to_string(&PetType::Cat).unwrap(), r#""cat""#);
        assert_eq!(
            serde_json::from_str::<PetType>(r#""rubber-duck""#).unwrap(),
            PetType::RubberDuck
        );
    }

    #[test]
    fn from_name_round_trips() {
        for &t in ALL_PETS {
            assert_eq!(PetType::from_name(t.as_str()), Some(t));
        }
        for &c in ALL_COLORS {
            assert_eq!(PetColor::from_name(c.as_str()), Some(c));
        }
        for &s in ALL_SCALES {
            assert_eq!(PetSize::from_name(s.as_str()), Some(s));
        }
        assert_eq!(PetType::from_name("dragon"), None);
        assert_eq!(PetColor::from_name("purple"), None);
        assert_eq!(PetSize::from_name("giant"), None);
    }

    #[test]
    fn spec_serializes_type_field_name() {
        let spec = PetSpecification::new(PetColor::Black, PetType::Dog, PetSize::Medium);
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains(r#""type":"dog""#));
        assert!(json.contains(r#""color":"black""#));
        assert!(json.contains(r#""size":"medium""#));
    }

    #[test]
    fn normalized_repairs_color_only() {
        let spec = PetSpecification::new(PetColor::Brown, PetType::Snake, PetSize::Large);
        let normalized = spec.normalized();
        assert_eq!(normalized.color, PetColor::Green);
        assert_eq!(normalized.kind, PetType::Snake);
        assert_eq!(normalized.size, PetSize::Large);
    }

    #[test]
    fn memento_round_trip() {
        let collection = vec![
            PetSpecification::new(PetColor::Black, PetType::Cat, PetSize::Nano),
            PetSpecification::new(PetColor::Yellow, PetType::RubberDuck, PetSize::Nano),
        ];
        let memento = collection_to_memento(&collection);
        assert_eq!(memento.types, vec![PetType::Cat, PetType::RubberDuck]);
        assert_eq!(memento.colors, vec![PetColor::Black, PetColor::Yellow]);

        let restored = collection_from_memento(&memento, PetSize::Medium);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].kind, PetType::Cat);
        assert_eq!(restored[0].color, PetColor::Black);
        // Restored at the currently configured size, not the stored one
        assert_eq!(restored[0].size, PetSize::Medium);
    }

    #[test]
    fn memento_with_mismatched_lengths_zips_to_shorter() {
        let memento = PetMemento {
            types: vec![PetType::Cat, PetType::Dog, PetType::Snake],
            colors: vec![PetColor::Black],
        };
        let restored = collection_from_memento(&memento, PetSize::Nano);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].kind, PetType::Cat);
    }

    #[test]
    fn empty_memento_restores_nothing() {
        let restored = collection_from_memento(&PetMemento::default(), PetSize::Nano);
        assert!(restored.is_empty());
    }

    #[test]
    fn memento_deserializes_with_missing_fields() {
        let memento: PetMemento = serde_json::from_str("{}").unwrap();
        assert!(memento.types.is_empty());
        assert!(memento.colors.is_empty());
    }
}
