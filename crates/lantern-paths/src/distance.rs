use lantern_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Squared Euclidean distance, saturating at `i32::MAX`.
#[inline]
pub fn squared_euclidean(a: Point, b: Point) -> i32 {
    i32::try_from(a.distance_squared(b)).unwrap_or(i32::MAX)
}
