//! Geometric primitives: points, segments, and intersection predicates.

use crate::num::CheapOrderedFloat;
use crate::Error;

/// A two-dimensional point.
///
/// Points are ordered by *sweep order*: larger `y` first, and smaller `x`
/// first among points at the same height. This is the order in which a
/// sweep line moving from the top of the plane to the bottom encounters
/// them, and it is the order the event queue pops them in.
#[derive(Clone, Copy, PartialEq)]
pub struct Point {
    /// Vertical coordinate. Larger values are up.
    pub y: f64,
    /// Horizontal coordinate. Larger values are to the right.
    pub x: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        CheapOrderedFloat::from(other.y)
            .cmp(&CheapOrderedFloat::from(self.y))
            .then_with(|| CheapOrderedFloat::from(self.x).cmp(&CheapOrderedFloat::from(other.x)))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    ///
    /// Note that the `x` coordinate comes first, even though we sort by `y`
    /// first; `(x, y)` is the only sane argument order.
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }

    /// Convert to a [`kurbo::Point`].
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// The turn direction of three points, from the sign of a cross product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// All three points lie on one line.
    Collinear,
    /// The path p -> q -> r turns right.
    Clockwise,
    /// The path p -> q -> r turns left.
    CounterClockwise,
}

/// Orientation of the ordered triple `(p, q, r)`.
///
/// Computed from the sign of the cross product `(q - p) x (r - q)`, with
/// zero meaning collinear. No tolerance is applied.
pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let cross = (q.x - p.x) * (r.y - q.y) - (q.y - p.y) * (r.x - q.x);
    if cross == 0.0 {
        Orientation::Collinear
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Does `q` lie within the bounding box of `p` and `r`?
///
/// Only meaningful as an on-segment test when the three points are already
/// known to be collinear.
pub fn on_segment(p: Point, q: Point, r: Point) -> bool {
    (p.x.min(r.x)..=p.x.max(r.x)).contains(&q.x) && (p.y.min(r.y)..=p.y.max(r.y)).contains(&q.y)
}

/// A line segment, stored in sweep order.
///
/// `upper` is the endpoint the sweep line reaches first: the one with the
/// larger `y`, or for horizontal segments the one with the smaller `x`.
/// Segments are canonicalized by [`Segment::new`]; two segments with the
/// same endpoint coordinates compare equal no matter the order their
/// endpoints were given in.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// The endpoint at which this segment becomes active.
    pub upper: Point,
    /// The endpoint at which this segment stops being active.
    pub lower: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Segment { upper, lower } = self;
        write!(f, "{upper:?} -- {lower:?}")
    }
}

impl Segment {
    /// Create a segment from two endpoints, in either order.
    ///
    /// Fails if the endpoints coincide or if any coordinate is non-finite;
    /// everything downstream relies on segments having two distinct, finite
    /// endpoints.
    pub fn new(a: impl Into<Point>, b: impl Into<Point>) -> Result<Self, Error> {
        let (a, b) = (a.into(), b.into());
        for p in [a, b] {
            if p.x.is_nan() || p.y.is_nan() {
                return Err(Error::NaN);
            }
            if p.x.is_infinite() || p.y.is_infinite() {
                return Err(Error::Infinity);
            }
        }
        if a == b {
            return Err(Error::DegenerateSegment(a));
        }
        let (upper, lower) = if a < b { (a, b) } else { (b, a) };
        Ok(Segment { upper, lower })
    }

    /// Convert to a [`kurbo::Line`] running from `upper` to `lower`.
    pub fn to_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.upper.to_kurbo(), self.lower.to_kurbo())
    }

    /// Our minimum horizontal position.
    pub fn min_x(&self) -> f64 {
        self.upper.x.min(self.lower.x)
    }

    /// Our maximum horizontal position.
    pub fn max_x(&self) -> f64 {
        self.upper.x.max(self.lower.x)
    }

    /// Returns true if this segment is exactly horizontal.
    pub fn is_horizontal(&self) -> bool {
        self.upper.y == self.lower.y
    }

    /// Our `x` coordinate at the given `y` coordinate.
    ///
    /// Horizontal segments return their largest `x` coordinate. The height
    /// needn't lie between the endpoint heights: the supporting line is
    /// extrapolated, because status-order comparisons routinely evaluate
    /// segments slightly below the event that ends them. Interpolation is
    /// anchored at `lower`, so at exactly `lower.y` this returns `lower.x`
    /// with no rounding; segments sharing a lower endpoint tie exactly
    /// there.
    pub fn at_y(&self, y: f64) -> f64 {
        if self.is_horizontal() {
            self.lower.x
        } else {
            let t = (y - self.lower.y) / (self.upper.y - self.lower.y);
            self.lower.x + t * (self.upper.x - self.lower.x)
        }
    }

    /// Do the two closed segments have at least one point in common?
    ///
    /// The general crossing case is decided by four orientation tests;
    /// endpoint touches and collinear containment are caught by the
    /// bounding-box special cases. Pure predicate.
    pub fn intersects(&self, other: &Segment) -> bool {
        let (p1, q1) = (self.upper, self.lower);
        let (p2, q2) = (other.upper, other.lower);
        let o1 = orientation(p1, q1, p2);
        let o2 = orientation(p1, q1, q2);
        let o3 = orientation(p2, q2, p1);
        let o4 = orientation(p2, q2, q1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
            || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
            || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
            || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
    }

    /// The point where the two segments cross, if there is exactly one.
    ///
    /// Solves the two-by-two linear system formed by each segment's line
    /// equation `a x + b y = c`. Returns `None` when the determinant is
    /// zero (parallel or coincident supporting lines, including collinear
    /// overlaps) or when the segments don't intersect at all.
    pub fn intersection_point(&self, other: &Segment) -> Option<Point> {
        if !self.intersects(other) {
            return None;
        }

        let a1 = self.lower.y - self.upper.y;
        let b1 = self.upper.x - self.lower.x;
        let c1 = a1 * self.upper.x + b1 * self.upper.y;

        let a2 = other.lower.y - other.upper.y;
        let b2 = other.upper.x - other.lower.x;
        let c2 = a2 * other.upper.x + b2 * other.upper.y;

        let det = a1 * b2 - a2 * b1;
        if det == 0.0 {
            return None;
        }
        Some(Point {
            x: (b2 * c1 - b1 * c2) / det,
            y: (a1 * c2 - a2 * c1) / det,
        })
    }
}

impl TryFrom<kurbo::Line> for Segment {
    type Error = Error;

    fn try_from(line: kurbo::Line) -> Result<Self, Error> {
        Segment::new(Point::from(line.p0), Point::from(line.p1))
    }
}
