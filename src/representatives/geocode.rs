//! Geocoder response decoding.
//!
//! The geocoder's candidates come in several shapes. Each shape has its own
//! extractor; extractors are tried in priority order on every candidate and
//! the first hit wins. Nothing matching is a typed
//! [`GeocodeError::UnrecognizedShape`], never a silent `None`.

use serde_json::Value;
use thiserror::Error;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Finite and inside the lat/lon ranges.
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("geocoder returned no candidates")]
    NoCandidates,
    #[error("geocoder response matched no known shape")]
    UnrecognizedShape,
}

/// Recognised candidate layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateShape {
    /// `{geometry: {coordinates: [lon, lat]}}`
    GeoJsonGeometry,
    /// `{location: {coordinates: [lon, lat]}}`
    LocationObject,
    /// `{location: [lon, lat]}`
    LocationArray,
    /// `{lat, lon}` / `{latitude, longitude}` / `{lat, lng}`
    FlatFields,
}

type Extractor = fn(&Value) -> Option<Coordinates>;

const EXTRACTORS: &[(CandidateShape, Extractor)] = &[
    (CandidateShape::GeoJsonGeometry, from_geometry),
    (CandidateShape::LocationObject, from_location_object),
    (CandidateShape::LocationArray, from_location_array),
    (CandidateShape::FlatFields, from_flat_fields),
];

/// First usable point in a geocoder response, and the shape it came from.
///
/// The body may be a candidate list, an object wrapping one under
/// `results`/`features`, or a single candidate.
pub fn coordinates_from_response(
    body: &Value,
) -> Result<(Coordinates, CandidateShape), GeocodeError> {
    let candidates: Vec<&Value> = match body {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match ["results", "features"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
        {
            Some(items) => items.iter().collect(),
            None => vec![body],
        },
        _ => Vec::new(),
    };

    if candidates.is_empty() {
        return Err(GeocodeError::NoCandidates);
    }

    candidates
        .iter()
        .find_map(|candidate| {
            EXTRACTORS
                .iter()
                .find_map(|(shape, extract)| extract(candidate).map(|c| (c, *shape)))
        })
        .ok_or(GeocodeError::UnrecognizedShape)
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `[lon, lat, ...]`
fn lon_lat_pair(v: &Value) -> Option<Coordinates> {
    let items = v.as_array()?;
    let lon = number(items.first()?)?;
    let lat = number(items.get(1)?)?;
    Coordinates::checked(lat, lon)
}

fn from_geometry(c: &Value) -> Option<Coordinates> {
    lon_lat_pair(c.get("geometry")?.get("coordinates")?)
}

fn from_location_object(c: &Value) -> Option<Coordinates> {
    lon_lat_pair(c.get("location")?.get("coordinates")?)
}

fn from_location_array(c: &Value) -> Option<Coordinates> {
    lon_lat_pair(c.get("location")?)
}

fn from_flat_fields(c: &Value) -> Option<Coordinates> {
    let lat = ["lat", "latitude"].iter().find_map(|k| c.get(*k).and_then(number))?;
    let lon = ["lon", "lng", "longitude"]
        .iter()
        .find_map(|k| c.get(*k).and_then(number))?;
    Coordinates::checked(lat, lon)
}
