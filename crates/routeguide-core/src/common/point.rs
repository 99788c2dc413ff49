//! Synthetic point generation for route recording.
//!
//! Points are drawn on a whole-degree grid: latitude in `[-90, 89]` and
//! longitude in `[-180, 179]`, then scaled by [`COORD_FACTOR`]. The random
//! source is borrowed mutably and advanced on every draw, so a seeded source
//! yields a reproducible route.

use crate::proto::Point;
use crate::types::{COORD_FACTOR, MIN_ROUTE_POINTS, ROUTE_POINT_SPAN};
use rand::Rng;

/// Draws a random point on the whole-degree grid.
pub fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Point {
    let latitude = (rng.random_range(0..180) - 90) * COORD_FACTOR;
    let longitude = (rng.random_range(0..360) - 180) * COORD_FACTOR;
    Point::new(latitude, longitude)
}

/// Draws how many points a recorded route traverses, uniform in
/// `[MIN_ROUTE_POINTS, MIN_ROUTE_POINTS + ROUTE_POINT_SPAN)`.
pub fn route_point_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.random_range(0..ROUTE_POINT_SPAN) + MIN_ROUTE_POINTS
}

/// Draws a full route of `count` points, in generation order.
pub fn random_route<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Point> {
    (0..count).map(|_| random_point(rng)).collect()
}
