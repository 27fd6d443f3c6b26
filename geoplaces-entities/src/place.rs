use crate::{address::AddressComponent, geo::*, id::Id};

/// Normalized result of a place lookup.
///
/// A `Place` is constructed once per successful mapping operation and not
/// modified afterwards. `bounds` and `viewport` are always fully populated;
/// `short_address` and `url` are derived at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: Id,
    pub location: MapPoint,
    pub location_type: Option<String>,
    pub bounds: MapBbox,
    pub viewport: MapBbox,
    pub formatted_address: String,
    pub short_address: String,
    pub url: String,
    pub street_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub borough: Option<String>,
    /// Deduplicated, in order of first appearance in the address components.
    pub neighborhoods: Vec<String>,
    pub main_neighborhood: Option<String>,
    /// Provider-defined category tags.
    pub types: Vec<String>,
    /// Raw address components of the primary result, retained for
    /// downstream reuse.
    pub address_components: Vec<AddressComponent>,
    /// Raw provider result(s) this place was mapped from, retained for
    /// audit and debugging.
    pub source: serde_json::Value,
}

impl Place {
    /// Alias for `borough`.
    pub fn sublocality(&self) -> Option<&str> {
        self.borough.as_deref()
    }

    /// Whether any structured address data below the city level is present.
    pub fn has_sub_city_details(&self) -> bool {
        self.borough.is_some()
            || !self.neighborhoods.is_empty()
            || self.street.is_some()
            || self.street_number.is_some()
    }
}
