use chrono::{DateTime, Utc};
use rand::Rng;

use super::mock;
use super::point::Waypoint;

/// Owns the ordered list of waypoints.
///
/// Consumers copy the list once; later changes are not pushed to them.
#[derive(Debug, Clone, Default)]
pub struct PointsModel {
    points: Vec<Waypoint>,
}

impl PointsModel {
    pub fn new(points: Vec<Waypoint>) -> Self {
        Self { points }
    }

    /// A model filled with `count` random waypoints starting around `base`.
    pub fn with_mock<R: Rng + ?Sized>(count: usize, rng: &mut R, base: DateTime<Utc>) -> Self {
        Self::new(mock::random_waypoints(count, rng, base))
    }

    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
