use itertools::Itertools;
use thiserror::Error;

const LAT_DEG_MAX: f64 = 90.0;
const LAT_DEG_MIN: f64 = -90.0;
const LNG_DEG_MAX: f64 = 180.0;
const LNG_DEG_MIN: f64 = -180.0;

#[derive(Debug, Error, PartialEq)]
pub enum ParsePointError {
    #[error("failed to parse map point: {0}")]
    Syntax(String),
    #[error("invalid coordinate number: {0}")]
    Number(#[from] std::num::ParseFloatError),
    #[error("invalid latitude degrees: {0}")]
    LatitudeDegrees(f64),
    #[error("invalid longitude degrees: {0}")]
    LongitudeDegrees(f64),
}

/// A geographical location on a (flat) map in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    lat: f64,
    lng: f64,
}

impl MapPoint {
    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        let lat = lat.into();
        let lng = lng.into();
        debug_assert!(lat >= LAT_DEG_MIN);
        debug_assert!(lat <= LAT_DEG_MAX);
        debug_assert!(lng >= LNG_DEG_MIN);
        debug_assert!(lng <= LNG_DEG_MAX);
        Self { lat, lng }
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        let lat = lat.into();
        let lng = lng.into();
        if (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat) && (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng)
        {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    pub const fn lat(self) -> f64 {
        self.lat
    }

    pub const fn lng(self) -> f64 {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&self.lat)
            && (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&self.lng)
    }
}

impl std::fmt::Display for MapPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl std::str::FromStr for MapPoint {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat_deg_str, lng_deg_str)) = s.split(',').collect_tuple() else {
            return Err(ParsePointError::Syntax(s.to_string()));
        };
        let lat: f64 = lat_deg_str.parse()?;
        let lng: f64 = lng_deg_str.parse()?;
        if !(LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat) {
            return Err(ParsePointError::LatitudeDegrees(lat));
        }
        if !(LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng) {
            return Err(ParsePointError::LongitudeDegrees(lng));
        }
        Ok(Self { lat, lng })
    }
}

/// An axis-aligned bounding box given by its south-west
/// and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBbox {
    sw: MapPoint,
    ne: MapPoint,
}

impl MapBbox {
    pub const fn new(sw: MapPoint, ne: MapPoint) -> Self {
        Self { sw, ne }
    }

    /// A box of `margin_deg` degrees in each direction around a point.
    pub fn around(center: MapPoint, margin_deg: f64) -> Self {
        debug_assert!(margin_deg >= 0.0);
        Self {
            sw: MapPoint {
                lat: center.lat() - margin_deg,
                lng: center.lng() - margin_deg,
            },
            ne: MapPoint {
                lat: center.lat() + margin_deg,
                lng: center.lng() + margin_deg,
            },
        }
    }

    pub const fn south_west(&self) -> MapPoint {
        self.sw
    }

    pub const fn north_east(&self) -> MapPoint {
        self.ne
    }

    pub fn is_valid(&self) -> bool {
        self.sw.is_valid() && self.ne.is_valid() && self.sw.lat() <= self.ne.lat()
    }
}

impl std::fmt::Display for MapBbox {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{},{}", self.sw, self.ne)
    }
}
