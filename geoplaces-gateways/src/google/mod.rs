// Gateway to the Google Maps geocoding and timezone APIs.
//
// Raw provider responses are cached through the cache-aside accessor;
// every public lookup degrades to `None` after logging a single warning.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use geoplaces_core::{
    cache::{self, Cache, Cacheable},
    gateways::geocode::GeoLookupGateway,
    storage::CacheStorage,
};
use geoplaces_entities::{geo::MapPoint, place::Place, timezone::TimezoneId};

pub mod place_mapper;
mod query;
mod response;

pub use self::query::{GeocodeQuery, QueryKind, TimezoneQuery};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const TIMEZONE_URL: &str = "https://maps.googleapis.com/maps/api/timezone/json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum Error {
    #[error("place for {kind} query '{query}' was not found")]
    PlaceNotFound { kind: QueryKind, query: String },
    #[error("no usable timezone result for location '{location}'")]
    TimezoneNotFound { location: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Cache(#[from] cache::Error),
    #[error(transparent)]
    Mapping(#[from] place_mapper::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Google Maps place and timezone lookups with cached raw responses.
#[derive(Debug)]
pub struct GoogleMaps<C> {
    api_key: String,
    client: reqwest::blocking::Client,
    cache: Cache<C>,
}

impl<C: CacheStorage> GoogleMaps<C> {
    pub fn new(api_key: impl Into<String>, storage: C) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            client,
            cache: Cache::new(storage),
        })
    }

    pub fn place_by_address(&self, address: &str) -> Option<Place> {
        match self.lookup_place(QueryKind::Address, address, true) {
            Ok(place) => Some(place),
            Err(err) => {
                log::warn!("Failed to resolve place for address '{}': {}", address, err);
                None
            }
        }
    }

    pub fn place_by_id(&self, place_id: &str) -> Option<Place> {
        match self.lookup_place(QueryKind::PlaceId, place_id, true) {
            Ok(place) => Some(place),
            Err(err) => {
                log::warn!("Failed to resolve place for id '{}': {}", place_id, err);
                None
            }
        }
    }

    pub fn place_by_point(&self, lat: f64, lng: f64) -> Option<Place> {
        let address = MapPoint::from_lat_lng_deg(lat, lng).to_string();
        // No city backfill here: the point lookup is itself the backfill path.
        match self.lookup_place(QueryKind::Address, &address, false) {
            Ok(place) => Some(place),
            Err(err) => {
                log::warn!("Failed to resolve place for point {}: {}", address, err);
                None
            }
        }
    }

    pub fn timezone_by_point(&self, lat: f64, lng: f64) -> Option<TimezoneId> {
        match self.lookup_timezone(lat, lng) {
            Ok(timezone) => Some(timezone),
            Err(err) => {
                log::warn!(
                    "Failed to resolve timezone for point {},{}: {}",
                    lat,
                    lng,
                    err
                );
                None
            }
        }
    }

    /// Uncached reverse lookup of the city a coordinate pair belongs to.
    pub fn city_by_point(&self, lat: f64, lng: f64) -> Option<String> {
        match self.lookup_city(lat, lng) {
            Ok(city) => city,
            Err(err) => {
                log::warn!("Can't get city by coordinates {},{}: {}", lat, lng, err);
                None
            }
        }
    }

    fn lookup_place(&self, kind: QueryKind, query_str: &str, check_by_point: bool) -> Result<Place> {
        let query = GeocodeQuery::new(kind, query_str, &self.api_key, &self.client);
        let raw = self
            .validated_data(&query, response::has_geocode_results)?
            .ok_or_else(|| Error::PlaceNotFound {
                kind,
                query: query_str.to_string(),
            })?;
        let mut place = place_mapper::map_places(&raw["results"])?;

        // Results carrying only sub-city details (borough, neighborhood,
        // street) sometimes lack a city; a reverse lookup of the same
        // point fills it in. A failed backfill leaves the place as is.
        if check_by_point && place.city.is_none() && place.has_sub_city_details() {
            if let Some(by_point) = self.place_by_point(place.location.lat(), place.location.lng())
            {
                place.city = by_point.city;
            }
        }
        Ok(place)
    }

    fn lookup_timezone(&self, lat: f64, lng: f64) -> Result<TimezoneId> {
        let query = TimezoneQuery::new(lat, lng, &self.api_key, &self.client);
        let location = query.location();
        let not_found = || Error::TimezoneNotFound {
            location: location.clone(),
        };
        let raw = self
            .validated_data(&query, response::is_timezone_status_ok)?
            .ok_or_else(not_found)?;
        let timezone = raw
            .get("timeZoneId")
            .and_then(Value::as_str)
            .ok_or_else(not_found)?;
        Ok(timezone.into())
    }

    fn lookup_city(&self, lat: f64, lng: f64) -> Result<Option<String>> {
        let location = MapPoint::from_lat_lng_deg(lat, lng).to_string();
        let params = [
            ("language", "en"),
            ("result_type", "political"),
            ("latlng", location.as_str()),
            ("key", self.api_key.as_str()),
        ];
        let value = fetch_json(&self.client, GEOCODE_URL, &params)?;
        Ok(city_from_reverse_lookup(&value))
    }

    /// Cached data may be stale or malformed, so it is checked and
    /// refreshed at most once per lookup (a single forced fetch, not
    /// a loop).
    fn validated_data<Q>(
        &self,
        query: &Q,
        is_valid: impl Fn(&Value) -> bool,
    ) -> Result<Option<Value>>
    where
        Q: Cacheable<Value = Value>,
    {
        if let Some(data) = self.cache.get_data(query)?.filter(&is_valid) {
            return Ok(Some(data));
        }
        Ok(self.cache.update_data(query)?.filter(&is_valid))
    }
}

impl<C: CacheStorage> GeoLookupGateway for GoogleMaps<C> {
    fn place_by_address(&self, address: &str) -> Option<Place> {
        GoogleMaps::place_by_address(self, address)
    }

    fn place_by_id(&self, place_id: &str) -> Option<Place> {
        GoogleMaps::place_by_id(self, place_id)
    }

    fn place_by_point(&self, lat: f64, lng: f64) -> Option<Place> {
        GoogleMaps::place_by_point(self, lat, lng)
    }

    fn timezone_by_point(&self, lat: f64, lng: f64) -> Option<TimezoneId> {
        GoogleMaps::timezone_by_point(self, lat, lng)
    }
}

/// First `locality` component of the primary result of a political
/// reverse geocode, if the lookup succeeded at all.
fn city_from_reverse_lookup(value: &Value) -> Option<String> {
    if value.get("status").and_then(Value::as_str) != Some("OK")
        || !response::has_geocode_results(value)
    {
        return None;
    }
    value["results"][0]["address_components"]
        .as_array()?
        .iter()
        .find(|component| {
            component
                .get("types")
                .and_then(Value::as_array)
                .is_some_and(|types| types.iter().any(|t| t == "locality"))
        })
        .and_then(|component| component.get("long_name").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(not(test))]
fn fetch_json(
    client: &reqwest::blocking::Client,
    url: &str,
    params: &[(&str, &str)],
) -> anyhow::Result<Value> {
    let response = client.get(url).query(params).send()?;
    let value = response.error_for_status()?.json()?;
    Ok(value)
}

/// Don't actually talk to the network while running the tests.
#[cfg(test)]
fn fetch_json(
    _: &reqwest::blocking::Client,
    url: &str,
    _: &[(&str, &str)],
) -> anyhow::Result<Value> {
    anyhow::bail!("network access is disabled in tests: {url}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{cell::RefCell, collections::HashMap};

    use geoplaces_core::storage;

    #[derive(Debug, Default)]
    struct MemoryStorage {
        entries: RefCell<HashMap<String, String>>,
    }

    impl CacheStorage for MemoryStorage {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, storage::Error> {
            Ok(self.entries.borrow().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> std::result::Result<(), storage::Error> {
            self.entries.borrow_mut().insert(key.into(), value.into());
            Ok(())
        }
    }

    fn gateway_with_entries(entries: Vec<(String, Value)>) -> GoogleMaps<MemoryStorage> {
        let _ = env_logger::builder().is_test(true).try_init();
        let storage = MemoryStorage::default();
        for (key, value) in entries {
            storage.set(&key, &value.to_string()).unwrap();
        }
        GoogleMaps::new("test-api-key", storage).unwrap()
    }

    fn geocode_cache_key(kind: QueryKind, query: &str) -> String {
        let client = reqwest::blocking::Client::new();
        GeocodeQuery::new(kind, query, "test-api-key", &client).cache_key()
    }

    fn timezone_cache_key(lat: f64, lng: f64) -> String {
        let client = reqwest::blocking::Client::new();
        TimezoneQuery::new(lat, lng, "test-api-key", &client).cache_key()
    }

    fn amphitheatre_payload() -> Value {
        json!({
            "status": "OK",
            "results": [{
                "place_id": "ChIJ2eUgeAK6j4ARbn5u_wAGqWA",
                "types": ["street_address"],
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
                "address_components": [
                    {"long_name": "1600", "short_name": "1600", "types": ["street_number"]},
                    {"long_name": "Amphitheatre Parkway", "short_name": "Amphitheatre Parkway", "types": ["route"]},
                    {"long_name": "Mountain View", "short_name": "Mountain View", "types": ["locality", "political"]},
                    {"long_name": "California", "short_name": "CA", "types": ["administrative_area_level_1", "political"]},
                    {"long_name": "94043", "short_name": "94043", "types": ["postal_code"]}
                ],
                "geometry": {
                    "location": {"lat": 37.4224764, "lng": -122.0842499},
                    "location_type": "ROOFTOP"
                }
            }]
        })
    }

    #[test]
    fn place_by_address_is_served_from_the_cache() {
        let address = "1600 Amphitheatre Parkway, Mountain View, CA";
        let gateway = gateway_with_entries(vec![(
            geocode_cache_key(QueryKind::Address, address),
            amphitheatre_payload(),
        )]);
        let place = gateway.place_by_address(address).unwrap();
        assert_eq!("ChIJ2eUgeAK6j4ARbn5u_wAGqWA", place.id.as_str());
        assert_eq!(
            "1600 Amphitheatre Parkway, Mountain View, CA",
            place.short_address
        );
        assert_eq!(Some("ROOFTOP"), place.location_type.as_deref());
        // No bounds/viewport in the payload: both synthesized around the location.
        assert_eq!(place.bounds, place.viewport);
    }

    #[test]
    fn place_by_id_is_served_from_the_cache() {
        let place_id = "ChIJ2eUgeAK6j4ARbn5u_wAGqWA";
        let gateway = gateway_with_entries(vec![(
            geocode_cache_key(QueryKind::PlaceId, place_id),
            amphitheatre_payload(),
        )]);
        let place = gateway.place_by_id(place_id).unwrap();
        assert_eq!(place_id, place.id.as_str());
    }

    #[test]
    fn cache_miss_without_network_yields_none() {
        let gateway = gateway_with_entries(vec![]);
        assert_eq!(None, gateway.place_by_address("somewhere"));
    }

    #[test]
    fn invalid_cached_data_triggers_one_forced_refresh() {
        let address = "somewhere";
        // An empty results array is not usable; the forced refresh has no
        // network under test, so the lookup must degrade to `None`.
        let gateway = gateway_with_entries(vec![(
            geocode_cache_key(QueryKind::Address, address),
            json!({"status": "ZERO_RESULTS", "results": []}),
        )]);
        assert_eq!(None, gateway.place_by_address(address));
    }

    #[test]
    fn missing_city_is_backfilled_by_a_point_lookup() {
        let address = "some street corner";
        let address_payload = json!({
            "status": "OK",
            "results": [{
                "place_id": "street_result",
                "types": ["route"],
                "formatted_address": "Some St, USA",
                "address_components": [
                    {"long_name": "Some Street", "short_name": "Some St", "types": ["route"]}
                ],
                "geometry": {"location": {"lat": 40.69, "lng": -73.99}}
            }]
        });
        let point_payload = json!({
            "status": "OK",
            "results": [{
                "place_id": "city_result",
                "types": ["locality"],
                "formatted_address": "New York, NY, USA",
                "address_components": [
                    {"long_name": "New York", "short_name": "New York", "types": ["locality", "political"]}
                ],
                "geometry": {"location": {"lat": 40.69, "lng": -73.99}}
            }]
        });
        let gateway = gateway_with_entries(vec![
            (
                geocode_cache_key(QueryKind::Address, address),
                address_payload,
            ),
            (
                geocode_cache_key(QueryKind::Address, "40.69,-73.99"),
                point_payload,
            ),
        ]);
        let place = gateway.place_by_address(address).unwrap();
        assert_eq!("street_result", place.id.as_str());
        assert_eq!(Some("New York"), place.city.as_deref());
    }

    #[test]
    fn point_lookup_does_not_backfill() {
        let payload = json!({
            "status": "OK",
            "results": [{
                "place_id": "street_result",
                "types": ["route"],
                "formatted_address": "Some St, USA",
                "address_components": [
                    {"long_name": "Some Street", "short_name": "Some St", "types": ["route"]}
                ],
                "geometry": {"location": {"lat": 40.69, "lng": -73.99}}
            }]
        });
        let gateway = gateway_with_entries(vec![(
            geocode_cache_key(QueryKind::Address, "40.69,-73.99"),
            payload,
        )]);
        let place = gateway.place_by_point(40.69, -73.99).unwrap();
        assert_eq!(None, place.city);
        assert_eq!(Some("Some St"), place.street.as_deref());
    }

    #[test]
    fn timezone_is_served_from_the_cache() {
        let gateway = gateway_with_entries(vec![(
            timezone_cache_key(40.7128, -74.0060),
            json!({"status": "OK", "timeZoneId": "America/New_York"}),
        )]);
        // Coordinates within rounding distance share the cache entry.
        assert_eq!(
            Some(TimezoneId::from("America/New_York")),
            gateway.timezone_by_point(40.71281, -74.00601)
        );
    }

    #[test]
    fn invalid_timezone_data_yields_none() {
        let gateway = gateway_with_entries(vec![(
            timezone_cache_key(40.7128, -74.0060),
            json!({"status": "ZERO_RESULTS"}),
        )]);
        assert_eq!(None, gateway.timezone_by_point(40.7128, -74.0060));
    }

    #[test]
    fn city_extraction_from_reverse_lookup() {
        let payload = json!({
            "status": "OK",
            "results": [{
                "address_components": [
                    {"long_name": "Brooklyn", "short_name": "Brooklyn", "types": ["sublocality"]},
                    {"long_name": "New York", "short_name": "New York", "types": ["locality", "political"]}
                ]
            }]
        });
        assert_eq!(
            Some("New York".to_string()),
            city_from_reverse_lookup(&payload)
        );
        assert_eq!(
            None,
            city_from_reverse_lookup(&json!({"status": "ZERO_RESULTS", "results": []}))
        );
        assert_eq!(
            None,
            city_from_reverse_lookup(&json!({
                "status": "OK",
                "results": [{"address_components": []}]
            }))
        );
    }

    #[test]
    fn city_by_point_without_network_yields_none() {
        let gateway = gateway_with_entries(vec![]);
        assert_eq!(None, gateway.city_by_point(40.7128, -74.0060));
    }
}
