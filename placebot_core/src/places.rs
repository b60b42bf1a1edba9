//! Provider-bound query parameters and the raw wire shape of the
//! places-search response.

use serde::{Deserialize, Serialize};

use crate::category::VenueCategory;
use crate::location::Location;

/// Error type the provider reports when it could not geocode the
/// requested location. A soft failure, not a transport error.
pub const GEOCODE_ERROR_TYPE: &str = "failed_geocode";

/// One fully-resolved provider query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub category: VenueCategory,
    pub location: Location,
    pub limit: usize,
    pub open_now: bool,
    pub sort_by_distance: bool,
}

impl Query {
    /// Fixed result limit per search.
    pub const DEFAULT_LIMIT: usize = 5;

    #[must_use]
    pub const fn new(category: VenueCategory, location: Location) -> Self {
        Self {
            category,
            location,
            limit: Self::DEFAULT_LIMIT,
            open_now: false,
            sort_by_distance: false,
        }
    }
}

/// A follow-up refinement offerable only after a result set was
/// delivered, and consumable at most once per query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUpFilter {
    OpenOnly,
    SortByDistance,
}

impl FollowUpFilter {
    pub const ALL: [Self; 2] = [Self::OpenOnly, Self::SortByDistance];

    /// Parse a quick-reply payload back into a filter.
    #[must_use]
    pub fn parse(payload: &str) -> Option<Self> {
        match payload.trim().to_lowercase().as_str() {
            "open only" => Some(Self::OpenOnly),
            "sort by distance" => Some(Self::SortByDistance),
            _ => None,
        }
    }

    /// Payload string carried by the quick reply offering this filter.
    #[must_use]
    pub const fn payload(self) -> &'static str {
        match self {
            Self::OpenOnly => "open only",
            Self::SortByDistance => "sort by distance",
        }
    }

    /// Button title shown to the user.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::OpenOnly => "Open only",
            Self::SortByDistance => "Sort by distance",
        }
    }

    /// Flip the matching flag on a saved query.
    pub const fn apply(self, query: &mut Query) {
        match self {
            Self::OpenOnly => query.open_now = true,
            Self::SortByDistance => query.sort_by_distance = true,
        }
    }
}

/// Raw result of a provider `explore` call.
///
/// Every field is optional: a malformed or partial payload deserializes
/// into missing structure and is handled as "nothing usable", never as a
/// crash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
    #[serde(default)]
    pub response: Option<ResponseBody>,
}

impl ExploreResponse {
    /// Detail string of a geocode soft failure, if the provider reported
    /// one in its response metadata.
    #[must_use]
    pub fn geocode_failure(&self) -> Option<&str> {
        let meta = self.meta.as_ref()?;
        if meta.error_type.as_deref() == Some(GEOCODE_ERROR_TYPE) {
            Some(meta.error_detail.as_deref().unwrap_or_default())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(default, rename = "errorDetail")]
    pub error_detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub groups: Vec<VenueGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueGroup {
    #[serde(default)]
    pub items: Vec<GroupItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupItem {
    #[serde(default)]
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hours: Option<VenueHours>,
    #[serde(default)]
    pub location: Option<VenueLocation>,
    #[serde(default)]
    pub photos: Option<VenuePhotos>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueHours {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "postalCode")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenuePhotos {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub groups: Vec<PhotoGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoGroup {
    #[serde(default)]
    pub items: Vec<Photo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn malformed_payload_deserializes_to_missing_structure() {
        let raw = r#"{"unexpected": {"shape": true}}"#;
        let parsed: ExploreResponse =
            serde_json::from_str(raw).expect("partial payload must still parse");
        assert!(parsed.response.is_none());
        assert!(parsed.geocode_failure().is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn geocode_failure_is_detected_from_meta() {
        let raw = r#"{
            "meta": {
                "code": 400,
                "errorType": "failed_geocode",
                "errorDetail": "failed_geocode: 123 Nowhere St"
            }
        }"#;
        let parsed: ExploreResponse = serde_json::from_str(raw).expect("meta must parse");
        assert_eq!(
            parsed.geocode_failure(),
            Some("failed_geocode: 123 Nowhere St")
        );
    }

    #[test]
    fn follow_up_filter_round_trip() {
        for filter in FollowUpFilter::ALL {
            assert_eq!(FollowUpFilter::parse(filter.payload()), Some(filter));
        }
        assert_eq!(FollowUpFilter::parse("louder"), None);
    }

    #[test]
    fn filters_flip_query_flags() {
        let mut query = Query::new(
            VenueCategory::Coffee,
            Location::Address("Berlin".to_string()),
        );
        assert!(!query.open_now);
        FollowUpFilter::OpenOnly.apply(&mut query);
        FollowUpFilter::SortByDistance.apply(&mut query);
        assert!(query.open_now);
        assert!(query.sort_by_distance);
    }
}
