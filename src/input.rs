//! Checks applied to user supplied values before they reach the solver or
//! the record formatter.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

lazy_static! {
    static ref VOR_IDENT_REGEX: Regex = Regex::new(r"^[A-Z]{1,3}$").unwrap();
    static ref RUNWAY_REGEX: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Parses `"lat lon"`, either as decimal degrees (`29.98 -95.34`) or as
/// FAA DMS (`29-58-48.000N 095-20-30.000W`).
pub fn parse_coordinates(s: &str) -> Result<GeoPoint> {
    let parts = s.split_whitespace().collect_vec();
    let (lat, lon) = match parts.as_slice() {
        [lat, lon] => (*lat, *lon),
        _ => {
            return Err(Error::invalid(
                "coordinates",
                format!("expected 'lat lon', got '{}'", s.trim()),
            ))
        }
    };

    if let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) {
        return GeoPoint::checked(lat, lon);
    }

    let point = GeoPoint::from_dms(lat, lon)
        .ok_or_else(|| Error::invalid("coordinates", format!("cannot parse '{}'", s.trim())))?;
    GeoPoint::checked(point.lat, point.lon)
}

pub fn validate_bearing(bearing_deg: f64) -> Result<f64> {
    if bearing_deg.is_finite() && (0.0..360.0).contains(&bearing_deg) {
        Ok(bearing_deg)
    } else {
        Err(Error::invalid("magnetic bearing", "should be within 0-359 degrees"))
    }
}

pub fn validate_distance(distance_nm: f64) -> Result<f64> {
    if distance_nm.is_finite() && distance_nm > 0.0 {
        Ok(distance_nm)
    } else {
        Err(Error::invalid("distance", "should be greater than 0 nautical miles"))
    }
}

pub fn validate_declination(declination_deg: f64) -> Result<f64> {
    if declination_deg.is_finite() {
        Ok(declination_deg)
    } else {
        Err(Error::invalid("declination", "must be a number"))
    }
}

/// Returns the trimmed, uppercased code.
pub fn validate_airport_code(code: &str) -> Result<String> {
    let code = code.trim().to_uppercase();
    if code.chars().count() == 4 {
        Ok(code)
    } else {
        Err(Error::invalid("airport code", format!("'{}' must be 4 letters", code)))
    }
}

/// Returns the trimmed, uppercased identifier. Empty is allowed and means
/// "no VOR".
pub fn validate_vor_identifier(ident: &str) -> Result<String> {
    let ident = ident.trim().to_uppercase();
    if ident.is_empty() || VOR_IDENT_REGEX.is_match(&ident) {
        Ok(ident)
    } else {
        Err(Error::invalid(
            "VOR identifier",
            format!("'{}' should be 1-3 letters and alphabetic", ident),
        ))
    }
}

pub fn validate_runway_code(code: &str) -> Result<u8> {
    let code = code.trim();
    let runway = if RUNWAY_REGEX.is_match(code) {
        code.parse::<u32>().ok().filter(|&r| r <= 99)
    } else {
        None
    };
    runway.map(|r| r as u8).ok_or_else(|| {
        Error::invalid(
            "runway code",
            format!("'{}' should be a two-digit number between 0 and 99", code),
        )
    })
}
