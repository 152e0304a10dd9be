//! Radius letters encode the distance from a reference navaid as a single
//! letter in the short WAYPOINT identifier (`D085J`).

/// Inclusive bounds in nautical miles. Values in the gaps between bands
/// get [`FALLBACK_LETTER`].
static RADIUS_BANDS: [(f64, f64, char); 26] = [
    (0.1, 1.4, 'A'),
    (1.5, 2.4, 'B'),
    (2.5, 3.4, 'C'),
    (3.5, 4.4, 'D'),
    (4.5, 5.4, 'E'),
    (5.5, 6.4, 'F'),
    (6.5, 7.4, 'G'),
    (7.5, 8.4, 'H'),
    (8.5, 9.4, 'I'),
    (9.5, 10.4, 'J'),
    (10.5, 11.4, 'K'),
    (11.5, 12.4, 'L'),
    (12.5, 13.4, 'M'),
    (13.5, 14.4, 'N'),
    (14.5, 15.4, 'O'),
    (15.5, 16.4, 'P'),
    (16.5, 17.4, 'Q'),
    (17.5, 18.4, 'R'),
    (18.5, 19.4, 'S'),
    (19.5, 20.4, 'T'),
    (20.5, 21.4, 'U'),
    (21.5, 22.4, 'V'),
    (22.5, 23.4, 'W'),
    (23.5, 24.4, 'X'),
    (24.5, 25.4, 'Y'),
    (25.5, 26.4, 'Z'),
];

/// Letter used when a distance falls outside every band.
pub const FALLBACK_LETTER: char = 'Z';

/// Radius letter for a distance in nautical miles.
///
/// Anything outside every band gets [`FALLBACK_LETTER`], including the gaps
/// such as `1.45`, values below `0.1` and non-finite input.
pub fn radius_letter(distance_nm: f64) -> char {
    RADIUS_BANDS
        .iter()
        .find(|&&(low, high, _)| low <= distance_nm && distance_nm <= high)
        .map(|&(_, _, letter)| letter)
        .unwrap_or(FALLBACK_LETTER)
}
