//! Symmetric shadowcasting field of view.
//!
//! Iterative form of Albert Ford's symmetric shadowcasting. Each of the four
//! quadrants is scanned row by row, away from the origin; a row covers the
//! columns between its start and end [`Slope`]s. Slopes are exact fractions,
//! so the ties in column rounding and in the symmetry test are decided
//! exactly.
//!
//! The scan is parameterised only by an opacity callback and a reveal
//! callback. [`try_compute_fov`] accepts fallible callbacks and isolates a
//! failure to the quadrant that raised it.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::convert::Infallible;

use lantern_core::Point;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Slope
// ---------------------------------------------------------------------------

/// A rational slope `num / den` with a positive denominator.
#[derive(Debug, Clone, Copy)]
pub struct Slope {
    num: i64,
    den: i64,
}

impl Slope {
    /// Build `num / den`. Panics if `den` is zero.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "slope with zero denominator");
        if den < 0 {
            Self { num: -num, den: -den }
        } else {
            Self { num, den }
        }
    }

    pub const fn whole(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    pub const fn num(self) -> i64 {
        self.num
    }

    pub const fn den(self) -> i64 {
        self.den
    }

    /// The slope through the edge shared by columns `col - 1` and `col` at
    /// `depth`: `(2 col - 1) / (2 depth)`.
    fn edge(depth: i32, col: i32) -> Self {
        Self::new(2 * i64::from(col) - 1, 2 * i64::from(depth))
    }

    /// `self * k`.
    pub fn scale(self, k: i64) -> Self {
        Self {
            num: self.num * k,
            den: self.den,
        }
    }

    /// Nearest integer, rounding halves up.
    pub fn round_ties_up(self) -> i64 {
        (2 * self.num + self.den).div_euclid(2 * self.den)
    }

    /// Nearest integer, rounding halves down.
    pub fn round_ties_down(self) -> i64 {
        -(self.den - 2 * self.num).div_euclid(2 * self.den)
    }
}

impl PartialEq for Slope {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Slope {}

impl PartialOrd for Slope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slope {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

// ---------------------------------------------------------------------------
// Quadrants and rows
// ---------------------------------------------------------------------------

/// One of the four cardinal scan directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    North,
    East,
    South,
    West,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::North,
        Quadrant::East,
        Quadrant::South,
        Quadrant::West,
    ];

    /// Map a `(depth, col)` scan coordinate to a map position.
    pub const fn transform(self, origin: Point, depth: i32, col: i32) -> Point {
        match self {
            Quadrant::North => Point::new(origin.x + col, origin.y - depth),
            Quadrant::East => Point::new(origin.x + depth, origin.y + col),
            Quadrant::South => Point::new(origin.x + col, origin.y + depth),
            Quadrant::West => Point::new(origin.x - depth, origin.y + col),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Row {
    depth: i32,
    start: Slope,
    end: Slope,
}

impl Row {
    fn first() -> Self {
        Self {
            depth: 1,
            start: Slope::whole(-1),
            end: Slope::whole(1),
        }
    }

    fn cols(&self) -> std::ops::RangeInclusive<i32> {
        let depth = i64::from(self.depth);
        let lo = self.start.scale(depth).round_ties_up();
        let hi = self.end.scale(depth).round_ties_down();
        // |col| never exceeds depth, which is an i32.
        (lo as i32)..=(hi as i32)
    }

    fn next(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    /// Whether the centre of `col` lies inside the row's slope range.
    fn is_symmetric(&self, col: i32) -> bool {
        let depth = i64::from(self.depth);
        let col = Slope::whole(i64::from(col));
        col >= self.start.scale(depth) && col <= self.end.scale(depth)
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// A callback failure, tagged with the quadrant it aborted.
///
/// `quadrant` is `None` when revealing the origin failed.
#[derive(Debug, Error)]
#[error("field of view callback failed in {quadrant:?}: {error}")]
pub struct FovFailure<E> {
    pub quadrant: Option<Quadrant>,
    pub error: E,
}

/// Outcome of [`try_compute_fov`]: the callback failures that were isolated.
#[derive(Debug)]
pub struct FovReport<E> {
    pub failures: Vec<FovFailure<E>>,
}

impl<E> FovReport<E> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn scan_quadrant<E>(
    rows: &mut Vec<Row>,
    quadrant: Quadrant,
    origin: Point,
    max_depth: i32,
    is_opaque: &mut impl FnMut(Point) -> Result<bool, E>,
    reveal: &mut impl FnMut(Point) -> Result<(), E>,
) -> Result<(), E> {
    rows.clear();
    rows.push(Row::first());

    while let Some(mut row) = rows.pop() {
        if row.depth > max_depth {
            continue;
        }
        let mut prev_wall = None;
        for col in row.cols() {
            let p = quadrant.transform(origin, row.depth, col);
            let wall = is_opaque(p)?;
            if wall || row.is_symmetric(col) {
                reveal(p)?;
            }
            match (prev_wall, wall) {
                (Some(true), false) => row.start = Slope::edge(row.depth, col),
                (Some(false), true) => rows.push(Row {
                    end: Slope::edge(row.depth, col),
                    ..row.next()
                }),
                _ => {}
            }
            prev_wall = Some(wall);
        }
        if prev_wall == Some(false) {
            rows.push(row.next());
        }
    }
    Ok(())
}

fn scan<E>(
    rows: &mut Vec<Row>,
    origin: Point,
    mut is_opaque: impl FnMut(Point) -> Result<bool, E>,
    mut reveal: impl FnMut(Point) -> Result<(), E>,
    max_depth: i32,
) -> FovReport<E>
where
    E: std::fmt::Display,
{
    let mut failures = Vec::new();
    if let Err(error) = reveal(origin) {
        log::warn!("revealing fov origin {origin} failed: {error}");
        failures.push(FovFailure {
            quadrant: None,
            error,
        });
    }
    for quadrant in Quadrant::ALL {
        let scanned =
            scan_quadrant(rows, quadrant, origin, max_depth, &mut is_opaque, &mut reveal);
        if let Err(error) = scanned {
            log::warn!("fov scan from {origin} abandoned {quadrant:?} quadrant: {error}");
            failures.push(FovFailure {
                quadrant: Some(quadrant),
                error,
            });
        }
    }
    FovReport { failures }
}

/// Compute visibility from `origin` up to `max_depth` rows away, with
/// fallible callbacks.
///
/// The origin is revealed first. A callback error aborts only the quadrant
/// being scanned; tiles already revealed stay revealed and the other
/// quadrants are still scanned. Tiles on quadrant borders may be revealed
/// more than once.
pub fn try_compute_fov<E: std::fmt::Display>(
    origin: Point,
    is_opaque: impl FnMut(Point) -> Result<bool, E>,
    reveal: impl FnMut(Point) -> Result<(), E>,
    max_depth: i32,
) -> FovReport<E> {
    scan(&mut Vec::new(), origin, is_opaque, reveal, max_depth)
}

/// Compute visibility from `origin` with infallible callbacks.
pub fn compute_fov(
    origin: Point,
    mut is_opaque: impl FnMut(Point) -> bool,
    mut reveal: impl FnMut(Point),
    max_depth: i32,
) {
    scan::<Infallible>(
        &mut Vec::new(),
        origin,
        |p| Ok(is_opaque(p)),
        |p| {
            reveal(p);
            Ok(())
        },
        max_depth,
    );
}

/// Reusable visibility buffer.
///
/// Keeps the row stack and result set between queries, so repeated scans at
/// tick rate do not reallocate.
#[derive(Debug, Default)]
pub struct FieldOfView {
    rows: Vec<Row>,
    visible: HashSet<Point>,
    order: Vec<Point>,
}

impl FieldOfView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the visible set from scratch. Returns the visible points,
    /// origin first, each listed once.
    pub fn compute(
        &mut self,
        origin: Point,
        mut is_opaque: impl FnMut(Point) -> bool,
        max_depth: i32,
    ) -> &[Point] {
        self.visible.clear();
        self.order.clear();
        let visible = &mut self.visible;
        let order = &mut self.order;
        scan::<Infallible>(
            &mut self.rows,
            origin,
            |p| Ok(is_opaque(p)),
            |p| {
                if visible.insert(p) {
                    order.push(p);
                }
                Ok(())
            },
            max_depth,
        );
        &self.order
    }

    /// Whether `p` was visible in the last [`compute`](Self::compute).
    pub fn is_visible(&self, p: Point) -> bool {
        self.visible.contains(&p)
    }

    pub fn visible(&self) -> &[Point] {
        &self.order
    }
}

/// Visible set from `origin` as a fresh `HashSet`.
pub fn visible_set(
    origin: Point,
    is_opaque: impl FnMut(Point) -> bool,
    max_depth: i32,
) -> HashSet<Point> {
    let mut fov = FieldOfView::new();
    fov.compute(origin, is_opaque, max_depth);
    fov.visible
}
