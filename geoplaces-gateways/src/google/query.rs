// Immutable per-call query value objects. Each lookup constructs a fresh
// (cache key, fetch) pair instead of mutating shared gateway state.

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::{fetch_json, response, GEOCODE_URL, TIMEZONE_URL};
use geoplaces_core::cache::Cacheable;

/// Decimal places coordinates are rounded to before timezone cache key
/// computation, coalescing near-identical points into one cache entry.
const LOCATION_ROUND_DECIMALS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Address,
    PlaceId,
}

impl QueryKind {
    /// Doubles as the request parameter name of the geocoding endpoint.
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::PlaceId => "place_id",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.as_param())
    }
}

/// A single address or place-id lookup against the geocoding endpoint.
#[derive(Debug)]
pub struct GeocodeQuery<'a> {
    kind: QueryKind,
    query: String,
    api_key: &'a str,
    client: &'a reqwest::blocking::Client,
}

impl<'a> GeocodeQuery<'a> {
    pub fn new(
        kind: QueryKind,
        query: &str,
        api_key: &'a str,
        client: &'a reqwest::blocking::Client,
    ) -> Self {
        Self {
            kind,
            query: query.to_string(),
            api_key,
            client,
        }
    }
}

impl Cacheable for GeocodeQuery<'_> {
    type Value = Value;

    fn cache_key(&self) -> String {
        format!("google_raw_data_{}_{}", self.kind, sha256_hex(&self.query))
    }

    fn fetch(&self) -> Option<Value> {
        let params = [
            (self.kind.as_param(), self.query.as_str()),
            ("key", self.api_key),
        ];
        match fetch_json(self.client, GEOCODE_URL, &params) {
            // Only usable data may end up in the cache
            Ok(value) if response::has_geocode_results(&value) => Some(value),
            Ok(_) => None,
            Err(err) => {
                log::warn!(
                    "Problem with fetching geocode data for {} query: {}",
                    self.kind,
                    err
                );
                None
            }
        }
    }
}

/// A timezone lookup for a coordinate pair, rounded on construction.
#[derive(Debug)]
pub struct TimezoneQuery<'a> {
    lat: f64,
    lng: f64,
    api_key: &'a str,
    client: &'a reqwest::blocking::Client,
}

impl<'a> TimezoneQuery<'a> {
    pub fn new(
        lat: f64,
        lng: f64,
        api_key: &'a str,
        client: &'a reqwest::blocking::Client,
    ) -> Self {
        Self {
            lat: round_coord(lat),
            lng: round_coord(lng),
            api_key,
            client,
        }
    }

    pub(super) fn location(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl Cacheable for TimezoneQuery<'_> {
    type Value = Value;

    fn cache_key(&self) -> String {
        format!(
            "google_timezone_data_{}",
            sha256_hex(&format!("{}{}", self.lat, self.lng))
        )
    }

    fn fetch(&self) -> Option<Value> {
        // The timezone of a point depends on the date due to DST rules.
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let location = self.location();
        let params = [
            ("location", location.as_str()),
            ("timestamp", timestamp.as_str()),
            ("key", self.api_key),
        ];
        match fetch_json(self.client, TIMEZONE_URL, &params) {
            // Only usable data may end up in the cache
            Ok(value) if response::is_timezone_status_ok(&value) => Some(value),
            Ok(_) => None,
            Err(err) => {
                log::warn!(
                    "Problem with fetching timezone data for location {}: {}",
                    location,
                    err
                );
                None
            }
        }
    }
}

fn round_coord(deg: f64) -> f64 {
    let factor = 10f64.powi(LOCATION_ROUND_DECIMALS);
    (deg * factor).round() / factor
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
