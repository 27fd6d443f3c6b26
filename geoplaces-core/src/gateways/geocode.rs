use geoplaces_entities::{place::Place, timezone::TimezoneId};

/// Resolution of places and timezones via an external geocoding service.
///
/// All lookups degrade to `None` on failure; implementations are expected
/// to log the cause before discarding it.
pub trait GeoLookupGateway {
    fn place_by_address(&self, address: &str) -> Option<Place>;
    fn place_by_id(&self, place_id: &str) -> Option<Place>;
    fn place_by_point(&self, lat: f64, lng: f64) -> Option<Place>;
    fn timezone_by_point(&self, lat: f64, lng: f64) -> Option<TimezoneId>;
}
