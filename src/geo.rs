use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

/// Metres per international nautical mile.
pub const NM_TO_METERS: f64 = 1852.0;

/// Convergence threshold (radians) for both Vincenty iterations.
const CONVERGENCE_EPSILON: f64 = 1e-12;

lazy_static! {
    static ref DMS_REGEX: Regex = Regex::new(r"^(\d+)-(\d+)-(\d+(?:\.\d+)?)([NSEW])$").unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Builds a point after checking that both values are finite and in range.
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::invalid("latitude", format!("{} is outside ±90", lat)));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::invalid("longitude", format!("{} is outside ±180", lon)));
        }
        Ok(GeoPoint { lat, lon })
    }

    //Ex: 31-53-00.510N
    pub fn from_dms(lat: &str, lon: &str) -> Option<Self> {
        fn to_dd(d: f64, m: f64, s: f64) -> f64 {
            d + m / 60.0 + s / 3600.0
        }

        fn parse(x: &str, hemispheres: [&str; 2]) -> Option<f64> {
            let cap = DMS_REGEX.captures(x.trim())?;
            let (d, m, s, dir) = (&cap[1], &cap[2], &cap[3], &cap[4]);
            if !hemispheres.contains(&dir) {
                return None;
            }
            let (d, m, s) = (d.parse().ok()?, m.parse().ok()?, s.parse().ok()?);
            let dd = to_dd(d, m, s);
            Some(if dir == "S" || dir == "W" { -dd } else { dd })
        }

        match (parse(lat, ["N", "S"]), parse(lon, ["E", "W"])) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        }
    }

    /// Wraps the longitude into `[-180, 180)`. Latitude is left untouched.
    pub fn normalized(self) -> Self {
        GeoPoint {
            lat: self.lat,
            lon: (self.lon + 180.0).rem_euclid(360.0) - 180.0,
        }
    }

    fn to_radians(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lon.to_radians())
    }
}

/// Fixed nine-digit rendering used by every output record.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // adding 0.0 turns -0.0 into 0.0
        write!(f, "{:.9} {:.9}", self.lat + 0.0, self.lon + 0.0)
    }
}

/// Reference ellipsoid. `b` is derived, so `b = (1 - f) * a` always holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi major axis in metres
    pub a: f64,
    /// Flattening
    pub f: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// Semi minor axis in metres
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }
}

/// Vincenty direct formula with a hard cap on the sigma refinement loop.
///
/// [Wikipedia Vincenty formulae](https://en.wikipedia.org/wiki/Vincenty%27s_formulae)
#[derive(Clone, Debug)]
pub struct VincentyDirect {
    pub max_iterations: usize,
}

impl Default for VincentyDirect {
    fn default() -> Self {
        VincentyDirect {
            max_iterations: 1000,
        }
    }
}

impl VincentyDirect {
    /// Destination reached from `origin` after `distance_nm` along the geodesic
    /// leaving at `bearing_deg` (true). The longitude is not wrapped.
    pub fn solve(
        &self,
        origin: GeoPoint,
        bearing_deg: f64,
        distance_nm: f64,
        ellipsoid: &Ellipsoid,
    ) -> Result<GeoPoint> {
        let origin = GeoPoint::checked(origin.lat, origin.lon)?;
        if !bearing_deg.is_finite() {
            return Err(Error::invalid("bearing", format!("{} is not finite", bearing_deg)));
        }
        if !distance_nm.is_finite() || distance_nm < 0.0 {
            return Err(Error::invalid(
                "distance",
                format!("{} is not a finite, non-negative number", distance_nm),
            ));
        }

        let (lat1, lon1) = origin.to_radians();
        let alpha1 = bearing_deg.to_radians();
        let s = distance_nm * NM_TO_METERS;

        let a = ellipsoid.a;
        let f = ellipsoid.f;
        let b = ellipsoid.b();

        let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

        // u = 'reduced latitude'
        let tan_u1 = (1.0 - f) * lat1.tan();
        let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
        let sin_u1 = tan_u1 * cos_u1;

        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let cap_a =
            1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let cap_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

        let first_guess = s / (b * cap_a);
        let mut sigma = first_guess;
        let mut iterations = 0;

        let (sin_sigma, cos_sigma, cos2_sigma_m) = loop {
            if iterations == self.max_iterations {
                return Err(Error::ConvergenceFailure { iterations });
            }
            iterations += 1;

            let cos2_sigma_m = (2.0 * sigma1 + sigma).cos();
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let delta_sigma = cap_b
                * sin_sigma
                * (cos2_sigma_m
                    + cap_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos2_sigma_m * cos2_sigma_m)
                            - cap_b / 6.0
                                * cos2_sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos2_sigma_m * cos2_sigma_m)));
            let sigma_prime = sigma;
            sigma = first_guess + delta_sigma;

            if (sigma - sigma_prime).abs() <= CONVERGENCE_EPSILON {
                break (sin_sigma, cos_sigma, cos2_sigma_m);
            }
        };

        let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
        let lambda = (sin_sigma * sin_alpha1)
            .atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let l = lambda
            - (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos2_sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos2_sigma_m * cos2_sigma_m)));

        Ok(GeoPoint {
            lat: lat2.to_degrees(),
            lon: (lon1 + l).to_degrees(),
        })
    }
}

/// Distance and azimuths between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseSolution {
    pub distance_m: f64,
    /// Azimuth leaving the first point, `[0, 360)`
    pub initial_bearing_deg: f64,
    /// Azimuth arriving at the second point, `[0, 360)`
    pub final_bearing_deg: f64,
}

/// Vincenty inverse formula, parametrized with the number of maximum iterations
/// for the algorithm
///
/// Known limitation:
/// this iterative method can fail to converge for nearly antipodal point pairs.
/// Hitting the iteration limit maps to `Error::ConvergenceFailure`.
#[derive(Clone, Debug)]
pub struct VincentyInverse {
    pub max_iterations: usize,
}

impl Default for VincentyInverse {
    fn default() -> Self {
        VincentyInverse {
            max_iterations: 200,
        }
    }
}

impl VincentyInverse {
    pub fn solve(&self, p1: GeoPoint, p2: GeoPoint, ellipsoid: &Ellipsoid) -> Result<InverseSolution> {
        // solver output may sit past the antimeridian, so only latitude is range checked
        let p1 = GeoPoint::checked(p1.lat, p1.normalized().lon).map(|_| p1)?;
        let p2 = GeoPoint::checked(p2.lat, p2.normalized().lon).map(|_| p2)?;

        let a = ellipsoid.a;
        let f = ellipsoid.f;
        let b = ellipsoid.b();

        let (lat1, lon1) = p1.to_radians();
        let (lat2, lon2) = p2.to_radians();
        let difference_longitudes = lon2 - lon1;

        let (tan_u1, tan_u2) = ((1.0 - f) * lat1.tan(), (1.0 - f) * lat2.tan());
        let (cos_u1, cos_u2) = (
            1.0 / (1.0 + tan_u1 * tan_u1).sqrt(),
            1.0 / (1.0 + tan_u2 * tan_u2).sqrt(),
        );
        let (sin_u1, sin_u2) = (tan_u1 * cos_u1, tan_u2 * cos_u2);

        let mut lambda = difference_longitudes;
        let mut iterations = 0;

        let (sin_lambda, cos_lambda, sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos2_sigma_m) = loop {
            if iterations == self.max_iterations {
                return Err(Error::ConvergenceFailure { iterations });
            }
            iterations += 1;

            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let sin_sq_sigma = (cos_u2 * sin_lambda) * (cos_u2 * sin_lambda)
                + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda)
                    * (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);

            // Points coincide
            if sin_sq_sigma == 0.0 {
                return Ok(InverseSolution {
                    distance_m: 0.0,
                    initial_bearing_deg: 0.0,
                    final_bearing_deg: 0.0,
                });
            }

            let sin_sigma = sin_sq_sigma.sqrt();
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            // equatorial line
            let cos2_sigma_m = if cos_sq_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                0.0
            };
            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
            let lambda_prime = lambda;
            lambda = difference_longitudes
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos2_sigma_m
                                + c * cos_sigma * (-1.0 + 2.0 * cos2_sigma_m * cos2_sigma_m)));

            if (lambda - lambda_prime).abs() <= CONVERGENCE_EPSILON {
                break (
                    sin_lambda,
                    cos_lambda,
                    sin_sigma,
                    cos_sigma,
                    sigma,
                    cos_sq_alpha,
                    cos2_sigma_m,
                );
            }
        };

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let cap_a =
            1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let cap_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

        let delta_sigma = cap_b
            * sin_sigma
            * (cos2_sigma_m
                + cap_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos2_sigma_m * cos2_sigma_m)
                        - cap_b / 6.0
                            * cos2_sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos2_sigma_m * cos2_sigma_m)));
        let distance_m = b * cap_a * (sigma - delta_sigma);

        let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
        let alpha2 = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);

        Ok(InverseSolution {
            distance_m,
            initial_bearing_deg: alpha1.to_degrees().rem_euclid(360.0),
            final_bearing_deg: alpha2.to_degrees().rem_euclid(360.0),
        })
    }
}

/// Solves the direct problem on WGS84 with the default iteration cap.
pub fn destination(origin: GeoPoint, bearing_deg: f64, distance_nm: f64) -> Result<GeoPoint> {
    VincentyDirect::default().solve(origin, bearing_deg, distance_nm, &Ellipsoid::WGS84)
}

/// Solves the inverse problem on WGS84 with the default iteration cap.
pub fn inverse(p1: GeoPoint, p2: GeoPoint) -> Result<InverseSolution> {
    VincentyInverse::default().solve(p1, p2, &Ellipsoid::WGS84)
}

/// Magnetic to true bearing, always in `[0, 360)`.
pub fn true_bearing(magnetic_deg: f64, declination_deg: f64) -> f64 {
    (magnetic_deg + declination_deg).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_lt, assert_matches, assert_ok};

    fn angle_diff(a: f64, b: f64) -> f64 {
        ((a - b + 540.0).rem_euclid(360.0) - 180.0).abs()
    }

    #[test]
    fn ten_nm_due_east() {
        let origin = GeoPoint::new(40.0, -75.0);
        let dest = assert_ok!(destination(origin, 90.0, 10.0));

        // heading east the geodesic bends slightly south
        assert_lt!(dest.lat, 40.0);
        assert_lt!((dest.lat - 40.0).abs(), 0.001);

        let shift = dest.lon - origin.lon;
        assert!(shift > 0.21 && shift < 0.223, "shift was {}", shift);
    }

    #[test]
    fn round_trip_through_inverse() {
        let cases = [
            (GeoPoint::new(40.0, -75.0), 90.0, 10.0),
            (GeoPoint::new(51.4775, -0.4614), 237.5, 42.3),
            (GeoPoint::new(-33.9461, 151.1772), 12.0, 250.0),
            (GeoPoint::new(64.1333, -21.9403), 315.0, 1.2),
            (GeoPoint::new(0.0, 0.0), 45.0, 3000.0),
        ];

        for &(origin, bearing, distance_nm) in &cases {
            let dest = assert_ok!(destination(origin, bearing, distance_nm));

            let forward = assert_ok!(inverse(origin, dest));
            assert_lt!((forward.distance_m - distance_nm * NM_TO_METERS).abs(), 1.0);
            assert_lt!(angle_diff(forward.initial_bearing_deg, bearing), 1e-6);

            let back = assert_ok!(inverse(dest, origin));
            assert_lt!((back.distance_m - distance_nm * NM_TO_METERS).abs(), 1.0);
            let reciprocal = (forward.final_bearing_deg + 180.0).rem_euclid(360.0);
            assert_lt!(angle_diff(back.initial_bearing_deg, reciprocal), 1e-6);
        }
    }

    #[test]
    fn zero_distance_returns_origin() {
        let origin = GeoPoint::new(29.9844, -95.3414);
        for &bearing in &[0.0, 45.0, 90.0, 179.9, 270.0, 359.99] {
            for &distance in &[0.0, 1e-9] {
                let dest = assert_ok!(destination(origin, bearing, distance));
                assert_lt!((dest.lat - origin.lat).abs(), 1e-9);
                assert_lt!((dest.lon - origin.lon).abs(), 1e-9);
            }
        }
    }

    #[test]
    fn antimeridian_is_not_wrapped() {
        let origin = GeoPoint::new(0.0, 179.9);
        let dest = assert_ok!(destination(origin, 90.0, 20.0));
        assert!(dest.lon > 180.0, "lon was {}", dest.lon);

        let wrapped = dest.normalized();
        assert!(wrapped.lon < -179.0 && wrapped.lon > -180.0, "lon was {}", wrapped.lon);
        assert_eq!(wrapped.lat, dest.lat);
        assert_lt!((wrapped.lon + 360.0 - dest.lon).abs(), 1e-9);
    }

    #[test]
    fn normalized_keeps_in_range_values() {
        let p = GeoPoint::new(12.5, -75.25);
        assert_eq!(p.normalized(), p);
        assert_eq!(GeoPoint::new(0.0, 180.0).normalized().lon, -180.0);
        assert_eq!(GeoPoint::new(0.0, -190.0).normalized().lon, 170.0);
    }

    #[test]
    fn long_spans_converge() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_ok!(destination(origin, 90.0, 10_000.0));
        assert_ok!(destination(GeoPoint::new(-45.0, 100.0), 180.0, 10_700.0));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let solver = VincentyDirect { max_iterations: 0 };
        let result = solver.solve(GeoPoint::new(40.0, -75.0), 90.0, 10.0, &Ellipsoid::WGS84);
        assert_matches!(result, Err(Error::ConvergenceFailure { iterations: 0 }));

        let inverse = VincentyInverse { max_iterations: 0 };
        let result = inverse.solve(
            GeoPoint::new(40.0, -75.0),
            GeoPoint::new(41.0, -74.0),
            &Ellipsoid::WGS84,
        );
        assert_matches!(result, Err(Error::ConvergenceFailure { .. }));
    }

    #[test]
    fn rejects_invalid_input() {
        let origin = GeoPoint::new(40.0, -75.0);
        assert_matches!(destination(origin, f64::NAN, 10.0), Err(Error::InvalidInput { .. }));
        assert_matches!(destination(origin, 90.0, f64::NAN), Err(Error::InvalidInput { .. }));
        assert_matches!(destination(origin, 90.0, -1.0), Err(Error::InvalidInput { .. }));
        assert_err!(destination(GeoPoint::new(91.0, 0.0), 90.0, 1.0));
        assert_err!(destination(GeoPoint::new(0.0, 181.0), 90.0, 1.0));
        assert_err!(destination(GeoPoint::new(f64::NAN, 0.0), 90.0, 1.0));
    }

    #[test]
    fn true_bearing_wraps() {
        assert_eq!(true_bearing(350.0, 20.0), 10.0);
        assert_eq!(true_bearing(10.0, -20.0), 350.0);
        assert_eq!(true_bearing(85.0, 0.0), 85.0);
        assert_eq!(true_bearing(180.0, 180.0), 0.0);
        assert_eq!(true_bearing(5.0, -725.0), 0.0);
    }

    #[test]
    fn dms_parsing() {
        let p = GeoPoint::from_dms("31-53-00.510N", "095-20-30.000W").unwrap();
        assert_lt!((p.lat - (31.0 + 53.0 / 60.0 + 0.51 / 3600.0)).abs(), 1e-12);
        assert_lt!((p.lon + (95.0 + 20.0 / 60.0 + 30.0 / 3600.0)).abs(), 1e-12);

        let p = GeoPoint::from_dms("33-56-46S", "151-10-38E").unwrap();
        assert_lt!(p.lat, 0.0);
        assert!(p.lon > 0.0);

        assert!(GeoPoint::from_dms("095-20-30.000W", "31-53-00.510N").is_none());
        assert!(GeoPoint::from_dms("31.5", "-95.0").is_none());
    }

    #[test]
    fn display_uses_nine_digits() {
        assert_eq!(
            GeoPoint::new(40.123456789, -75.987654321).to_string(),
            "40.123456789 -75.987654321"
        );
        assert_eq!(GeoPoint::new(-0.0, 0.0).to_string(), "0.000000000 0.000000000");
    }
}
