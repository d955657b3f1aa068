//! Map positions and distance.
//!
//! Locations are integer `(row, col)` pairs. Distances are Euclidean and
//! truncated to an integer, matching the engine's own distance queries.

use serde::{Deserialize, Serialize};

/// A point on the game map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Euclidean distance to `other`, truncated toward zero.
    ///
    /// Saturates at `i32::MAX` for points further apart than that.
    pub fn distance(self, other: Location) -> i32 {
        let dr = f64::from(self.row) - f64::from(other.row);
        let dc = f64::from(self.col) - f64::from(other.col);
        // `as` saturates float to int casts.
        (dr * dr + dc * dc).sqrt() as i32
    }

    /// Returns the location reached by stepping at most `max_step` units
    /// from `self` toward `dest`. Lands exactly on `dest` when it is in reach.
    pub fn towards(self, dest: Location, max_step: i32) -> Location {
        if self == dest || self.distance(dest) <= max_step {
            return dest;
        }
        let dr = f64::from(dest.row) - f64::from(self.row);
        let dc = f64::from(dest.col) - f64::from(self.col);
        let ratio = f64::from(max_step) / (dr * dr + dc * dc).sqrt();
        Location {
            row: (f64::from(self.row) + (dr * ratio).round()) as i32,
            col: (f64::from(self.col) + (dc * ratio).round()) as i32,
        }
    }

    /// Clamps the location into a `rows` x `cols` map.
    pub fn clamp_to(self, rows: i32, cols: i32) -> Location {
        Location {
            row: self.row.clamp(0, rows.max(1) - 1),
            col: self.col.clamp(0, cols.max(1) - 1),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_truncated() {
        let a = Location::new(0, 0);
        let b = Location::new(3, 4);
        assert_eq!(a.distance(b), 5);
        assert_eq!(b.distance(a), 5);
        assert_eq!(a.distance(Location::new(1, 1)), 1);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = Location::new(1200, 800);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn towards_stops_at_destination() {
        let a = Location::new(0, 0);
        let b = Location::new(0, 50);
        assert_eq!(a.towards(b, 100), b);
    }

    #[test]
    fn towards_moves_by_step() {
        let a = Location::new(0, 0);
        let b = Location::new(0, 1000);
        assert_eq!(a.towards(b, 100), Location::new(0, 100));

        let c = Location::new(300, 400);
        let step = a.towards(c, 100);
        assert_eq!(step, Location::new(60, 80));
        assert_eq!(a.distance(step), 100);
    }

    #[test]
    fn far_apart_points_do_not_overflow() {
        let low = Location::new(-2_000_000_000, 0);
        let high = Location::new(2_000_000_000, 0);
        assert_eq!(low.distance(high), i32::MAX);
        assert_eq!(high.distance(low), i32::MAX);

        let corner = Location::new(i32::MIN, i32::MIN);
        assert_eq!(corner.distance(Location::new(i32::MAX, i32::MIN)), i32::MAX);

        let step = low.towards(high, 100);
        assert_eq!(step, Location::new(-1_999_999_900, 0));
        assert_eq!(high.towards(low, 100), Location::new(1_999_999_900, 0));
    }

    #[test]
    fn clamp_keeps_inside_map() {
        let loc = Location::new(-5, 9000).clamp_to(4000, 6400);
        assert_eq!(loc, Location::new(0, 6399));
    }
}
