//! # Coordinate Constants and Message Helpers
//!
//! Points travel over the wire as fixed-point integers: degrees multiplied by
//! [`COORD_FACTOR`]. This module holds that scale plus small constructors and
//! `Display` impls on the generated [`proto`](crate::proto) messages so call
//! sites and log lines stay readable.

use crate::proto::{Feature, Point, Rectangle, RouteNote, RouteSummary};
use core::fmt;

/// Scale between decimal degrees and the fixed-point wire representation.
pub const COORD_FACTOR: i32 = 10_000_000;

/// A recorded route always traverses at least this many points.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Number of distinct point counts a recorded route may have, starting at
/// [`MIN_ROUTE_POINTS`].
pub const ROUTE_POINT_SPAN: usize = 100;

impl Point {
    pub const fn new(latitude: i32, longitude: i32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Unset message fields render as the origin.
fn or_origin(point: Option<&Point>) -> Point {
    point.copied().unwrap_or_default()
}

impl Rectangle {
    /// Builds a rectangle from its lower-left and upper-right corners.
    ///
    /// The corner order is a convention and is not checked.
    pub const fn new(lo: Point, hi: Point) -> Self {
        Self {
            lo: Some(lo),
            hi: Some(hi),
        }
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = or_origin(self.lo.as_ref());
        let hi = or_origin(self.hi.as_ref());
        write!(f, "[lo {lo}, hi {hi}]")
    }
}

impl Feature {
    /// A feature with an empty name marks a location with nothing on it.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = or_origin(self.location.as_ref());
        if self.is_named() {
            write!(f, "{:?} at {location}", self.name)
        } else {
            write!(f, "unnamed feature at {location}")
        }
    }
}

impl RouteNote {
    pub fn new(latitude: i32, longitude: i32, message: impl Into<String>) -> Self {
        Self {
            location: Some(Point::new(latitude, longitude)),
            message: message.into(),
        }
    }
}

impl fmt::Display for RouteNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = or_origin(self.location.as_ref());
        write!(f, "{} at point {location}", self.message)
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points, {} features, {} m in {} s",
            self.point_count, self.feature_count, self.distance, self.elapsed_time
        )
    }
}
