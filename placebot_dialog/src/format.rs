//! Rendering a raw provider result into display cards.
//!
//! Defensive by construction: a payload missing the expected structure
//! is "nothing usable", individual broken venue records are skipped, and
//! the map button is omitted outright rather than rendered with a broken
//! link.

use tracing::debug;

use placebot_core::places::{ExploreResponse, Venue, VenueLocation};
use placebot_core::{CardButton, VenueCard, location, present};

/// Convert a raw result set into an ordered list of display cards.
///
/// `None` means the payload lacked the expected result-group structure,
/// i.e. the provider returned nothing usable. Venues missing a name or
/// an id are dropped, never aborted on.
#[must_use]
pub fn format(response: &ExploreResponse, limit: usize) -> Option<Vec<VenueCard>> {
    let groups = &response.response.as_ref()?.groups;
    let group = groups.first()?;

    let mut cards = Vec::new();
    for item in group.items.iter().take(limit) {
        let Some(venue) = item.venue.as_ref() else {
            continue;
        };
        let (Some(id), Some(name)) = (
            present(venue.id.as_deref()),
            present(venue.name.as_deref()),
        ) else {
            debug!("Skipping venue record without name or id");
            continue;
        };

        let mut buttons = vec![CardButton {
            title: "Visit website".to_string(),
            url: website_url(venue, id),
        }];
        if let Some(query) = venue.location.as_ref().and_then(map_query) {
            buttons.push(CardButton {
                title: "Show on map".to_string(),
                url: map_url(&query),
            });
        }

        cards.push(VenueCard {
            title: name.to_string(),
            image_url: photo_url(venue),
            subtitle: venue
                .hours
                .as_ref()
                .and_then(|hours| present(hours.status.as_deref()))
                .unwrap_or_default()
                .to_string(),
            buttons,
        });
    }
    Some(cards)
}

/// The venue's own URL, else a constructed venue-page fallback.
fn website_url(venue: &Venue, id: &str) -> String {
    present(venue.url.as_deref()).map_or_else(|| format!("https://foursquare.com/v/{id}"), str::to_string)
}

/// Map query sources in priority order: assembled address components
/// first, the raw coordinate pair second. `None` omits the button.
fn map_query(venue_location: &VenueLocation) -> Option<String> {
    location::from_components(
        venue_location.address.as_deref(),
        venue_location.postal_code.as_deref(),
        venue_location.city.as_deref(),
        venue_location.country.as_deref(),
    )
    .or_else(|| match (venue_location.lat, venue_location.lng) {
        (Some(lat), Some(lng)) => Some(format!("{lat},{lng}")),
        _ => None,
    })
}

fn map_url(query: &str) -> String {
    format!("https://www.google.com/maps?q={}", query.replace(' ', "+"))
}

/// Photo URL only when the venue reports a positive photo count and a
/// photo group with an item actually exists.
fn photo_url(venue: &Venue) -> Option<String> {
    let photos = venue.photos.as_ref()?;
    if photos.count == 0 {
        return None;
    }
    let photo = photos.groups.first()?.items.first()?;
    match (
        present(photo.prefix.as_deref()),
        present(photo.suffix.as_deref()),
    ) {
        (Some(prefix), Some(suffix)) => Some(format!("{prefix}original{suffix}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placebot_core::places::{GroupItem, Photo, PhotoGroup, ResponseBody, VenueGroup, VenueHours, VenuePhotos};

    fn venue(id: &str, name: &str) -> Venue {
        Venue {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            ..Venue::default()
        }
    }

    fn wrap(venues: Vec<Venue>) -> ExploreResponse {
        ExploreResponse {
            meta: None,
            response: Some(ResponseBody {
                groups: vec![VenueGroup {
                    items: venues
                        .into_iter()
                        .map(|v| GroupItem { venue: Some(v) })
                        .collect(),
                }],
            }),
        }
    }

    #[test]
    fn missing_group_structure_is_nothing_usable() {
        assert!(format(&ExploreResponse::default(), 5).is_none());

        let empty_groups = ExploreResponse {
            meta: None,
            response: Some(ResponseBody { groups: vec![] }),
        };
        assert!(format(&empty_groups, 5).is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn venues_without_name_or_id_are_skipped() {
        let broken = Venue {
            name: Some("No Id Cafe".to_string()),
            ..Venue::default()
        };
        let cards = format(&wrap(vec![broken, venue("v1", "Complete Cafe")]), 5)
            .expect("group structure present");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Complete Cafe");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn website_button_falls_back_to_venue_page() {
        let cards = format(&wrap(vec![venue("v1", "Cafe")]), 5).expect("group structure present");
        assert_eq!(cards[0].buttons.len(), 1);
        assert_eq!(cards[0].buttons[0].url, "https://foursquare.com/v/v1");
        assert_eq!(cards[0].subtitle, "");

        let mut with_url = venue("v2", "Cafe Two");
        with_url.url = Some("https://cafe.example".to_string());
        let cards = format(&wrap(vec![with_url]), 5).expect("group structure present");
        assert_eq!(cards[0].buttons[0].url, "https://cafe.example");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn map_button_prefers_address_and_falls_back_to_coordinates() {
        let mut with_address = venue("v1", "Cafe");
        with_address.location = Some(VenueLocation {
            address: Some("Main St 1".to_string()),
            city: Some("Berlin".to_string()),
            lat: Some(52.52),
            lng: Some(13.4),
            ..VenueLocation::default()
        });
        let cards = format(&wrap(vec![with_address]), 5).expect("group structure present");
        assert_eq!(
            cards[0].buttons[1].url,
            "https://www.google.com/maps?q=Main+St+1+Berlin"
        );

        let mut coords_only = venue("v2", "Cafe Two");
        coords_only.location = Some(VenueLocation {
            lat: Some(52.52),
            lng: Some(13.4),
            ..VenueLocation::default()
        });
        let cards = format(&wrap(vec![coords_only]), 5).expect("group structure present");
        assert_eq!(
            cards[0].buttons[1].url,
            "https://www.google.com/maps?q=52.52,13.4"
        );

        let mut nothing = venue("v3", "Cafe Three");
        nothing.location = Some(VenueLocation::default());
        let cards = format(&wrap(vec![nothing]), 5).expect("group structure present");
        assert_eq!(cards[0].buttons.len(), 1, "map button must be omitted");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn photo_url_requires_count_and_group() {
        let mut with_photo = venue("v1", "Cafe");
        with_photo.photos = Some(VenuePhotos {
            count: 3,
            groups: vec![PhotoGroup {
                items: vec![Photo {
                    prefix: Some("https://img.example/".to_string()),
                    suffix: Some("/photo.jpg".to_string()),
                }],
            }],
        });
        let cards = format(&wrap(vec![with_photo]), 5).expect("group structure present");
        assert_eq!(
            cards[0].image_url.as_deref(),
            Some("https://img.example/original/photo.jpg")
        );

        let mut count_without_groups = venue("v2", "Cafe Two");
        count_without_groups.photos = Some(VenuePhotos {
            count: 3,
            groups: vec![],
        });
        let cards = format(&wrap(vec![count_without_groups]), 5).expect("group structure present");
        assert_eq!(cards[0].image_url, None);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn limit_caps_the_card_count() {
        let venues = (0..8).map(|i| venue(&format!("v{i}"), &format!("Cafe {i}"))).collect();
        let cards = format(&wrap(venues), 5).expect("group structure present");
        assert_eq!(cards.len(), 5);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn hours_status_becomes_the_subtitle() {
        let mut open = venue("v1", "Cafe");
        open.hours = Some(VenueHours {
            status: Some("Open until 8:00 PM".to_string()),
        });
        let cards = format(&wrap(vec![open]), 5).expect("group structure present");
        assert_eq!(cards[0].subtitle, "Open until 8:00 PM");
    }
}
