//! Place queries, coordinates and the lookup result shared by the adapters

use serde::Serialize;
use std::fmt;

use crate::SahaytaError;

/// Free-text place name as typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    /// Create a query, trimming surrounding whitespace
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    /// An empty query means "nothing to look up", not an error
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive key used by the lookup cache
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("place:{}", self.0.to_lowercase())
    }
}

impl From<&str> for PlaceQuery {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for PlaceQuery {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic coordinate pair in decimal degrees
///
/// Only constructible through [`Coordinate::new`], so every value in the
/// crate is within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SahaytaError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SahaytaError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Position in `[longitude, latitude]` order, as map layers expect it
    #[must_use]
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Outcome of a single adapter call
///
/// Network failures, bad statuses and empty result lists all end up as
/// `NotFound`; callers cannot tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    /// The query was empty and no request was made
    Skipped,
}

impl<T> Lookup<T> {
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_place_query_trims() {
        let query = PlaceQuery::new("  New Delhi ");
        assert_eq!(query.as_str(), "New Delhi");
        assert!(!query.is_empty());
        assert!(PlaceQuery::new("   ").is_empty());
        assert!(PlaceQuery::new("").is_empty());
    }

    #[test]
    fn test_place_query_cache_key() {
        assert_eq!(PlaceQuery::new("Mumbai").cache_key(), "place:mumbai");
        assert_eq!(
            PlaceQuery::new("MUMBAI").cache_key(),
            PlaceQuery::new(" mumbai").cache_key()
        );
    }

    #[rstest]
    #[case(91.0, 8.0)]
    #[case(-91.0, 8.0)]
    #[case(46.0, 181.0)]
    #[case(46.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn test_coordinate_rejects_out_of_range(#[case] lat: f64, #[case] lon: f64) {
        let result = Coordinate::new(lat, lon);
        assert!(matches!(result, Err(SahaytaError::Validation { .. })));
    }

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(19.0760, 72.8777)]
    fn test_coordinate_accepts_bounds(#[case] lat: f64, #[case] lon: f64) {
        let coordinate = Coordinate::new(lat, lon).unwrap();
        assert_eq!(coordinate.latitude(), lat);
        assert_eq!(coordinate.longitude(), lon);
        assert_eq!(coordinate.lon_lat(), [lon, lat]);
    }

    #[test]
    fn test_format_coordinates() {
        let coordinate = Coordinate::new(18.520_43, 73.856_74).unwrap();
        assert_eq!(coordinate.format_coordinates(), "18.5204, 73.8567");
    }

    #[test]
    fn test_lookup_found() {
        let found: Lookup<u8> = Lookup::Found(3);
        assert!(found.is_found());
        assert_eq!(found.found(), Some(3));
        assert_eq!(Lookup::<u8>::NotFound.found(), None);
        assert_eq!(Lookup::<u8>::Skipped.found(), None);
    }
}
