//! Output records for navigation-database coding.
//!
//! Every record starts with the point printed to nine decimals and ends with
//! the airport, its two-letter region prefix and the operation code. Inputs
//! are taken as given: an airport that is not four characters or a VOR
//! identifier longer than three simply produces a malformed record.

use crate::geo::GeoPoint;
use crate::radius::radius_letter;

/// Distances strictly above this use the long WAYPOINT form.
pub const LONG_FORMAT_THRESHOLD_NM: f64 = 26.5;

/// Rounds halves up, `2.5 -> 3`, `26.5 -> 27`. Only meant for the
/// non-negative distances the formatter sees.
pub fn round_half_up(x: f64) -> i64 {
    x.round() as i64
}

fn region(airport: &str) -> String {
    airport.chars().take(2).collect()
}

pub fn format_waypoint_record(
    dest: GeoPoint,
    distance_nm: f64,
    magnetic_bearing_deg: f64,
    airport: &str,
    vor_ident: &str,
    operation_code: &str,
) -> String {
    let bearing = magnetic_bearing_deg.floor() as i64;
    let rounded_distance = round_half_up(distance_nm);

    let mut record = if distance_nm > LONG_FORMAT_THRESHOLD_NM {
        format!(
            "{} {}{} {} {}",
            dest,
            vor_ident,
            rounded_distance,
            airport,
            region(airport)
        )
    } else {
        format!(
            "{} D{:03}{} {} {}",
            dest,
            bearing,
            radius_letter(distance_nm),
            airport,
            region(airport)
        )
    };

    record += " ";
    record += operation_code;
    if !vor_ident.is_empty() {
        record += &format!(" {}{:03}{:03}", vor_ident, bearing, rounded_distance);
    }
    record
}

pub fn format_fix_record(
    point: GeoPoint,
    fix_code: char,
    usage_code: char,
    runway: u8,
    airport: &str,
    operation_code: &str,
) -> String {
    format!(
        "{} {}{}{:02} {} {} {}",
        point,
        usage_code,
        fix_code,
        runway,
        airport,
        region(airport),
        operation_code
    )
}
