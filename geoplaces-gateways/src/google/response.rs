// Wire types for the subset of the provider JSON that is consumed:
// `results[]`, `address_components[]`, `geometry.*`, `status` and
// `timeZoneId`. Everything else passes through untouched inside the
// raw `serde_json::Value`.

use serde::Deserialize;
use serde_json::Value;

use geoplaces_entities::{address::AddressComponent, geo::*};

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub place_id: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    pub location_type: Option<String>,
    pub bounds: Option<Rectangle>,
    pub viewport: Option<Rectangle>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Rectangle {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

impl From<LatLng> for MapPoint {
    fn from(from: LatLng) -> Self {
        MapPoint::from_lat_lng_deg(from.lat, from.lng)
    }
}

impl From<Rectangle> for MapBbox {
    fn from(from: Rectangle) -> Self {
        MapBbox::new(from.southwest.into(), from.northeast.into())
    }
}

/// A geocode payload is usable iff it carries at least one result.
pub fn has_geocode_results(value: &Value) -> bool {
    value
        .get("results")
        .and_then(Value::as_array)
        .is_some_and(|results| !results.is_empty())
}

/// A timezone payload is usable iff its status field is `OK`.
pub fn is_timezone_status_ok(value: &Value) -> bool {
    value.get("status").and_then(Value::as_str) == Some("OK")
}
