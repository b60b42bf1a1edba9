//! Merging address components or coordinate pairs into one canonical
//! location descriptor.

use serde::{Deserialize, Serialize};

use crate::{EventParameters, present};

/// Exactly one location descriptor for a provider query: free-text
/// address or a validated coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    Address(String),
    Coordinates { lat: f64, long: f64 },
}

impl Location {
    /// The value sent to the provider: the address text, or the
    /// canonical `"lat, long"` rendering of the pair.
    #[must_use]
    pub fn query_value(&self) -> String {
        match self {
            Self::Address(address) => address.clone(),
            Self::Coordinates { lat, long } => format!("{lat}, {long}"),
        }
    }
}

/// Whether a coordinate pair is inside the valid lat/long ranges.
#[must_use]
pub fn in_range(lat: f64, long: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&long)
}

/// Join the present address components in fixed order (street, postal
/// code, city, country), single-space separated. `None` when nothing
/// usable is present.
#[must_use]
pub fn from_components(
    street: Option<&str>,
    postal_code: Option<&str>,
    city: Option<&str>,
    country: Option<&str>,
) -> Option<String> {
    let joined = [street, postal_code, city, country]
        .into_iter()
        .filter_map(present)
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}

/// Canonical `"lat, long"` string for a valid pair. An out-of-range pair
/// is treated as absent, never as an error value.
#[must_use]
pub fn from_coordinates(lat: f64, long: f64) -> Option<String> {
    in_range(lat, long).then(|| format!("{lat}, {long}"))
}

/// Resolve one location out of everything the event carried.
///
/// A shared coordinate pair is assumed more authoritative than typed
/// text, and free-text beats assembled address components.
#[must_use]
pub fn resolve(parameters: &EventParameters) -> Option<Location> {
    if let (Some(lat), Some(long)) = (parameters.latitude, parameters.longitude) {
        if in_range(lat, long) {
            return Some(Location::Coordinates { lat, long });
        }
    }
    if let Some(location) = present(parameters.location.as_deref()) {
        return Some(Location::Address(location.to_string()));
    }
    from_components(
        parameters.street.as_deref(),
        parameters.postal_code.as_deref(),
        parameters.city.as_deref(),
        parameters.country.as_deref(),
    )
    .map(Location::Address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_in_valid_range() {
        assert_eq!(
            from_coordinates(37.77, -122.42),
            Some("37.77, -122.42".to_string())
        );
        assert_eq!(from_coordinates(-90.0, 180.0), Some("-90, 180".to_string()));
        assert_eq!(from_coordinates(90.5, 0.0), None);
        assert_eq!(from_coordinates(0.0, -180.1), None);
    }

    #[test]
    fn components_join_in_fixed_order() {
        assert_eq!(
            from_components(Some("Unter den Linden 1"), Some("10117"), Some("Berlin"), None),
            Some("Unter den Linden 1 10117 Berlin".to_string())
        );
        assert_eq!(
            from_components(None, None, Some("Berlin"), Some("Germany")),
            Some("Berlin Germany".to_string())
        );
        assert_eq!(from_components(None, Some("  "), None, None), None);
    }

    #[test]
    fn coordinates_take_precedence_over_text() {
        let parameters = EventParameters {
            location: Some("Berlin".to_string()),
            latitude: Some(52.52),
            longitude: Some(13.4),
            ..EventParameters::default()
        };
        assert_eq!(
            resolve(&parameters),
            Some(Location::Coordinates {
                lat: 52.52,
                long: 13.4
            })
        );
    }

    #[test]
    fn invalid_coordinates_fall_back_to_text() {
        let parameters = EventParameters {
            location: Some("Berlin".to_string()),
            latitude: Some(123.0),
            longitude: Some(13.4),
            ..EventParameters::default()
        };
        assert_eq!(
            resolve(&parameters),
            Some(Location::Address("Berlin".to_string()))
        );
    }

    #[test]
    fn nothing_resolvable_is_none() {
        assert_eq!(resolve(&EventParameters::default()), None);
    }
}
