use std::fmt;

use serde::Serialize;

use crate::gazetteer;

/// Label for events no tier could place. Such events never reach an output table.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// One strategy in the country resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    /// Trailing segment after the last comma of the place text, used verbatim.
    StructuredText,
    /// Country keyword found anywhere in the place text.
    Keyword,
    /// Coarse bounding box containing the coordinates.
    BoundingBox,
}

/// Tiers in precedence order: first match wins.
pub const RESOLUTION_CHAIN: [ResolutionTier; 3] = [
    ResolutionTier::StructuredText,
    ResolutionTier::Keyword,
    ResolutionTier::BoundingBox,
];

impl ResolutionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTier::StructuredText => "structured_text",
            ResolutionTier::Keyword => "keyword",
            ResolutionTier::BoundingBox => "bounding_box",
        }
    }

    pub fn resolve<'a>(
        &self,
        latitude: f64,
        longitude: f64,
        place: Option<&'a str>,
    ) -> Option<&'a str> {
        match self {
            ResolutionTier::StructuredText => place.and_then(trailing_segment),
            ResolutionTier::Keyword => place.and_then(gazetteer::country_by_keyword),
            ResolutionTier::BoundingBox => gazetteer::country_by_box(latitude, longitude),
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a country label, falling back to [`UNKNOWN_COUNTRY`].
pub fn resolve_country(latitude: f64, longitude: f64, place: Option<&str>) -> String {
    resolve_with_tier(latitude, longitude, place).0
}

/// Like [`resolve_country`] but also reports which tier matched. `None` means the
/// default label was used.
pub fn resolve_with_tier(
    latitude: f64,
    longitude: f64,
    place: Option<&str>,
) -> (String, Option<ResolutionTier>) {
    RESOLUTION_CHAIN
        .iter()
        .find_map(|tier| {
            tier.resolve(latitude, longitude, place)
                .map(|label| (label.to_string(), Some(*tier)))
        })
        .unwrap_or_else(|| (UNKNOWN_COUNTRY.to_string(), None))
}

/// Text after the last comma, trimmed. Empty segments and comma-free text yield `None`.
fn trailing_segment(place: &str) -> Option<&str> {
    let (_, tail) = place.rsplit_once(',')?;
    let tail = tail.trim();
    (!tail.is_empty()).then_some(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_segment_takes_last_comma() {
        assert_eq!(trailing_segment("5 km N of Ridgecrest, CA"), Some("CA"));
        assert_eq!(trailing_segment("a, b,  Fiji  "), Some("Fiji"));
        assert_eq!(trailing_segment("ends with comma,"), None);
        assert_eq!(trailing_segment("ends with comma,   "), None);
        assert_eq!(trailing_segment("no comma here"), None);
    }
}
