//! Venue categories accepted by the places provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of venue to search for, mapped onto the provider's `section`
/// parameter. `TopPicks` is the default when the user never picked one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VenueCategory {
    Food,
    Drinks,
    Coffee,
    Shops,
    Arts,
    TopPicks,
}

impl VenueCategory {
    pub const ALL: [Self; 6] = [
        Self::Food,
        Self::Drinks,
        Self::Coffee,
        Self::Shops,
        Self::Arts,
        Self::TopPicks,
    ];

    /// Parse a category from classifier output or a quick-reply payload.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "food" => Some(Self::Food),
            "drinks" => Some(Self::Drinks),
            "coffee" => Some(Self::Coffee),
            "shops" => Some(Self::Shops),
            "arts" => Some(Self::Arts),
            "top" | "top picks" | "toppicks" => Some(Self::TopPicks),
            _ => None,
        }
    }

    /// Provider-side section name.
    #[must_use]
    pub const fn as_section(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Drinks => "drinks",
            Self::Coffee => "coffee",
            Self::Shops => "shops",
            Self::Arts => "arts",
            Self::TopPicks => "topPicks",
        }
    }

    /// Human-readable label for prompts and quick replies.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Drinks => "drinks",
            Self::Coffee => "coffee",
            Self::Shops => "shops",
            Self::Arts => "arts",
            Self::TopPicks => "top picks",
        }
    }
}

impl fmt::Display for VenueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(VenueCategory::parse("Coffee"), Some(VenueCategory::Coffee));
        assert_eq!(VenueCategory::parse(" FOOD "), Some(VenueCategory::Food));
        assert_eq!(
            VenueCategory::parse("top picks"),
            Some(VenueCategory::TopPicks)
        );
        assert_eq!(VenueCategory::parse("casinos"), None);
    }

    #[test]
    fn section_names_match_provider() {
        assert_eq!(VenueCategory::TopPicks.as_section(), "topPicks");
        assert_eq!(VenueCategory::Drinks.as_section(), "drinks");
    }
}
