//! Showdown identifiers

/// Convert a display name to a Showdown id: lowercase ASCII alphanumerics only.
///
/// `to_id("King's Rock") == "kingsrock"`, `to_id("Landorus-Therian") == "landorustherian"`
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Serde helpers that store names as ids, so `"Rough Skin"` and
/// `"roughskin"` load the same.
pub(crate) mod serde_id {
    use serde::{Deserialize, Deserializer};

    use super::to_id;

    pub fn one<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        String::deserialize(de).map(|s| to_id(&s))
    }

    pub fn optional<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Option::<String>::deserialize(de).map(|s| s.map(|s| to_id(&s)))
    }

    pub fn many<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        Vec::<String>::deserialize(de).map(|v| v.iter().map(|s| to_id(s)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_id() {
        assert_eq!(to_id("King's Rock"), "kingsrock");
        assert_eq!(to_id("Landorus-Therian"), "landorustherian");
        assert_eq!(to_id("U-turn"), "uturn");
        assert_eq!(to_id("  Tapu Koko "), "tapukoko");
        assert_eq!(to_id("garchomp"), "garchomp");
    }
}
