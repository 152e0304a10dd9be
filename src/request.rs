//! One calculation per request. Every input travels in the request value;
//! nothing is cached between calls.

use derive_builder::Builder;

use crate::codes::{FixType, FixUsage, OperationType};
use crate::error::{Error, Result};
use crate::geo::{self, GeoPoint};
use crate::input::{
    validate_airport_code, validate_bearing, validate_declination, validate_distance,
    validate_vor_identifier,
};
use crate::record::{format_fix_record, format_waypoint_record};

/// A waypoint at a bearing and distance from a reference navaid.
#[derive(Clone, Debug, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "Error"))]
pub struct WaypointRequest {
    /// Reference navaid position
    origin: GeoPoint,
    magnetic_bearing: f64,
    #[builder(default)]
    declination: f64,
    distance_nm: f64,
    #[builder(setter(custom))]
    airport: String,
    #[builder(setter(custom), default)]
    vor_ident: String,
    operation: OperationType,
    /// Wrap the destination longitude into `[-180, 180)`
    #[builder(default)]
    wrap_longitude: bool,
}

impl WaypointRequestBuilder {
    pub fn airport(&mut self, code: &str) -> &mut Self {
        self.airport = Some(code.trim().to_uppercase());
        self
    }

    pub fn vor_ident(&mut self, ident: &str) -> &mut Self {
        self.vor_ident = Some(ident.trim().to_uppercase());
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(origin) = self.origin {
            GeoPoint::checked(origin.lat, origin.lon)?;
        }
        if let Some(bearing) = self.magnetic_bearing {
            validate_bearing(bearing)?;
        }
        if let Some(declination) = self.declination {
            validate_declination(declination)?;
        }
        if let Some(distance) = self.distance_nm {
            validate_distance(distance)?;
        }
        if let Some(ref airport) = self.airport {
            validate_airport_code(airport)?;
        }
        if let Some(ref vor_ident) = self.vor_ident {
            validate_vor_identifier(vor_ident)?;
        }
        Ok(())
    }
}

impl WaypointRequest {
    pub fn builder() -> WaypointRequestBuilder {
        WaypointRequestBuilder::default()
    }

    pub fn true_bearing(&self) -> f64 {
        geo::true_bearing(self.magnetic_bearing, self.declination)
    }

    pub fn destination(&self) -> Result<GeoPoint> {
        let dest = geo::destination(self.origin, self.true_bearing(), self.distance_nm)?;
        Ok(if self.wrap_longitude {
            dest.normalized()
        } else {
            dest
        })
    }

    pub fn compute(&self) -> Result<String> {
        let dest = self.destination()?;
        Ok(format_waypoint_record(
            dest,
            self.distance_nm,
            self.magnetic_bearing,
            &self.airport,
            &self.vor_ident,
            self.operation.into(),
        ))
    }
}

/// A fix coded at known coordinates.
#[derive(Clone, Debug, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "Error"))]
pub struct FixRequest {
    point: GeoPoint,
    fix_type: FixType,
    usage: FixUsage,
    runway: u8,
    #[builder(setter(custom))]
    airport: String,
    operation: OperationType,
}

impl FixRequestBuilder {
    pub fn airport(&mut self, code: &str) -> &mut Self {
        self.airport = Some(code.trim().to_uppercase());
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(point) = self.point {
            GeoPoint::checked(point.lat, point.lon)?;
        }
        if let Some(runway) = self.runway {
            if runway > 99 {
                return Err(Error::invalid(
                    "runway code",
                    format!("{} is not between 0 and 99", runway),
                ));
            }
        }
        if let Some(ref airport) = self.airport {
            validate_airport_code(airport)?;
        }
        Ok(())
    }
}

impl FixRequest {
    pub fn builder() -> FixRequestBuilder {
        FixRequestBuilder::default()
    }

    pub fn compute(&self) -> String {
        format_fix_record(
            self.point,
            self.fix_type.into(),
            self.usage.into(),
            self.runway,
            &self.airport,
            self.operation.into(),
        )
    }
}
