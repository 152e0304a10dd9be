//! Waypoint and fix coordinates for navigation-database coding.
//!
//! [`geo`] solves the direct geodetic problem on WGS84, [`record`] turns the
//! result into the fixed-format record string, and the remaining modules
//! collect and check the inputs those two need.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod codes;
pub mod error;
pub mod geo;
pub mod input;
pub mod logging;
pub mod nav_data;
pub mod radius;
pub mod record;
pub mod request;

pub use crate::error::{Error, Result};
pub use crate::geo::GeoPoint;
pub use crate::request::{FixRequest, WaypointRequest};
