//! Station proximity detection
//!
//! Euclidean distance against a fixed threshold. O(stations) per query.

use glam::Vec2;

use super::state::Station;

/// Result of a proximity query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityHit {
    /// Index into the station list
    pub index: usize,
    pub distance: f32,
}

/// Check whether a point is within `threshold` of a target (inclusive)
#[inline]
pub fn within_range(pos: Vec2, target: Vec2, threshold: f32) -> bool {
    pos.distance(target) <= threshold
}

/// Nearest station no farther than `threshold`.
///
/// Equal distances keep the earlier station in list order.
pub fn nearest_station(pos: Vec2, stations: &[Station], threshold: f32) -> Option<ProximityHit> {
    let mut best: Option<ProximityHit> = None;
    for (index, station) in stations.iter().enumerate() {
        let distance = pos.distance(station.position);
        if distance > threshold {
            continue;
        }
        match best {
            Some(hit) if distance >= hit.distance => {}
            _ => best = Some(ProximityHit { index, distance }),
        }
    }
    best
}
