use itertools::Itertools;

use crate::gateways::geocode::GeoLookupGateway;
use geoplaces_entities::place::Place;

/// Look up the place of a zip code within a city.
pub fn search_zip_place<G: GeoLookupGateway>(
    gateway: &G,
    city: &str,
    zip: &str,
    state: Option<&str>,
) -> Option<Place> {
    search_place(gateway, &[Some(city), state, Some(zip)])
}

/// Look up the place of a city.
pub fn search_city_place<G: GeoLookupGateway>(
    gateway: &G,
    city: &str,
    state: Option<&str>,
) -> Option<Place> {
    search_place(gateway, &[Some(city), state])
}

/// Look up the place of a neighborhood within a city.
pub fn search_neighborhood_place<G: GeoLookupGateway>(
    gateway: &G,
    neighborhood: &str,
    city: &str,
    state: Option<&str>,
) -> Option<Place> {
    search_place(gateway, &[Some(neighborhood), Some(city), state])
}

fn search_place<G: GeoLookupGateway>(gateway: &G, parts: &[Option<&str>]) -> Option<Place> {
    let query = parts.iter().copied().flatten().join("-");
    log::debug!("Searching place for composed query '{}'", query);
    gateway.place_by_address(&query)
}
