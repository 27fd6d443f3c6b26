// Maps one or more raw geocode results onto a normalized `Place`.
//
// Reverse geocoding regularly yields several overlapping administrative
// results for the same real-world place. Identity and geometry are taken
// from the first result only; address components are reconciled across
// all of them.

use itertools::Itertools;
use serde_json::Value;
use thiserror::Error;

use super::response::{GeocodeResult, Geometry};
use geoplaces_entities::{address::AddressComponent, geo::*, place::Place};

/// Fallback padding in degrees used to synthesize a bounding box when the
/// provider delivers only a point.
const OVERSIGHT_MARGIN_DEG: f64 = 0.005;

const NYC_BOROUGHS: [&str; 5] = ["Manhattan", "Bronx", "Brooklyn", "Queens", "Staten Island"];

#[derive(Debug, Error)]
pub enum Error {
    #[error("geocode data contains no results")]
    NoResults,
    #[error("malformed geocode results: {0}")]
    Malformed(#[from] serde_json::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Map a raw `results` array onto a `Place`.
///
/// All-or-nothing: a malformed or empty input yields an error and no
/// partially populated place. The raw input is retained in `Place::source`.
pub fn map_places(raw_results: &Value) -> Result<Place> {
    let results: Vec<GeocodeResult> = serde_json::from_value(raw_results.clone())?;
    let first = results.first().ok_or(Error::NoResults)?;

    let location = MapPoint::from(first.geometry.location);
    let (bounds, viewport) = derive_rectangles(&first.geometry, location);
    let fields = reconcile_components(&results);
    let main_neighborhood = main_neighborhood(first, &fields.neighborhoods);
    let short_address = fields.compose_short_address();
    let url = map_url(&first.formatted_address, location);

    Ok(Place {
        id: first.place_id.as_str().into(),
        location,
        location_type: first.geometry.location_type.clone(),
        bounds,
        viewport,
        formatted_address: first.formatted_address.clone(),
        short_address,
        url,
        street_number: fields.street_number,
        street: fields.street,
        city: fields.city,
        state: fields.state,
        zip: fields.zip,
        borough: fields.borough,
        neighborhoods: fields.neighborhoods,
        main_neighborhood,
        types: first.types.clone(),
        address_components: first.address_components.clone(),
        source: raw_results.clone(),
    })
}

/// Bounds and viewport fall back to each other before both fall back to a
/// synthesized box around the location. Each rectangle is produced whole.
fn derive_rectangles(geometry: &Geometry, location: MapPoint) -> (MapBbox, MapBbox) {
    let synthesized = MapBbox::around(location, OVERSIGHT_MARGIN_DEG);
    let bounds = geometry
        .bounds
        .or(geometry.viewport)
        .map_or(synthesized, Into::into);
    let viewport = geometry
        .viewport
        .or(geometry.bounds)
        .map_or(synthesized, Into::into);
    (bounds, viewport)
}

#[derive(Debug, Default)]
struct AddressFields {
    street_number: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    borough: Option<String>,
    neighborhoods: Vec<String>,
}

/// Apply the tag-specific setters over the composite component list of all
/// results, deduplicated by full-record equality in first-seen order.
///
/// City is first-wins while street/state/zip/street number are last-wins;
/// the asymmetry is inherited behavior and kept as is.
fn reconcile_components(results: &[GeocodeResult]) -> AddressFields {
    let mut composite: Vec<&AddressComponent> = Vec::new();
    for result in results {
        for component in &result.address_components {
            if !composite.iter().any(|c| *c == component) {
                composite.push(component);
            }
        }
    }

    let mut fields = AddressFields::default();
    for component in composite {
        for tag in &component.types {
            fields.apply(tag, component);
        }
    }
    fields
}

impl AddressFields {
    fn apply(&mut self, tag: &str, component: &AddressComponent) {
        match tag {
            "street_number" => self.street_number = Some(component.long_name.clone()),
            "route" => self.street = Some(component.short_name.clone()),
            // `postal_town` stands in for `locality` where the latter is absent
            "locality" | "postal_town" => {
                if self.city.is_none() {
                    self.city = Some(component.long_name.clone());
                }
            }
            "administrative_area_level_1" => self.state = Some(component.short_name.clone()),
            "administrative_area_level_2" => {
                if self.city.is_none() {
                    self.city = Some(component.short_name.clone());
                }
            }
            "postal_code" => self.zip = Some(component.long_name.clone()),
            "sublocality" => {
                if self.city.is_none() {
                    self.city = Some(city_from_sublocality(&component.long_name));
                }
            }
            "sublocality_level_1" => self.borough = Some(component.long_name.clone()),
            "neighborhood" => {
                if !self.neighborhoods.contains(&component.long_name) {
                    self.neighborhoods.push(component.long_name.clone());
                }
            }
            _ => {}
        }
    }

    /// `<street_number> <street>, <city>, <state>` where missing parts
    /// contribute no separator.
    fn compose_short_address(&self) -> String {
        let street_line = [self.street_number.as_deref(), self.street.as_deref()]
            .into_iter()
            .flatten()
            .join(" ");
        let mut parts = Vec::new();
        if !street_line.is_empty() {
            parts.push(street_line.as_str());
        }
        parts.extend(self.city.as_deref());
        parts.extend(self.state.as_deref());
        parts.join(", ")
    }
}

/// The five NYC boroughs are reported as sublocalities; the city they
/// belong to is New York, not the borough itself.
fn city_from_sublocality(name: &str) -> String {
    if NYC_BOROUGHS
        .iter()
        .any(|borough| borough.eq_ignore_ascii_case(name))
    {
        "New York".to_string()
    } else {
        name.to_string()
    }
}

/// The main neighborhood comes from the primary result if it is tagged
/// there, otherwise from the head of the accumulated list.
fn main_neighborhood(first: &GeocodeResult, neighborhoods: &[String]) -> Option<String> {
    first
        .address_components
        .iter()
        .find(|component| component.has_type("neighborhood"))
        .map(|component| component.long_name.clone())
        .or_else(|| neighborhoods.first().cloned())
}

fn map_url(formatted_address: &str, location: MapPoint) -> String {
    format!(
        "https://www.google.com/maps/place/{}/@{},{},17z",
        formatted_address,
        location.lat(),
        location.lng()
    )
}
