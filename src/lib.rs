#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod geom;
pub mod naive;
mod num;
mod segments;
pub mod sweep;

pub use geom::{Point, Segment};
pub use segments::{SegIdx, Segments};

/// The input segments were faulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// A segment's endpoints coincided, leaving it without a direction.
    DegenerateSegment(Point),
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DegenerateSegment(p) => write!(f, "a segment had both endpoints at {p:?}"),
            Error::Infinity => write!(f, "one of the inputs was infinite"),
            Error::NaN => write!(f, "one of the inputs had a NaN"),
        }
    }
}

impl std::error::Error for Error {}

/// Computes the pairwise intersection points of a collection of segments.
///
/// Each input is an `(x1, y1, x2, y2)` coordinate quadruple. The result
/// holds each distinct meeting point once, in sweep order (top to bottom,
/// left to right among ties), no matter how many segments pass through it.
///
/// # Examples
///
/// ```
/// let crossings = sweepline::intersections([
///     (0.0, 0.0, 4.0, 4.0),
///     (0.0, 4.0, 4.0, 0.0),
/// ])?;
/// assert_eq!(crossings.len(), 1);
/// assert_eq!((crossings[0].x, crossings[0].y), (2.0, 2.0));
/// # Ok::<(), sweepline::Error>(())
/// ```
pub fn intersections(
    segments: impl IntoIterator<Item = (f64, f64, f64, f64)>,
) -> Result<Vec<Point>, Error> {
    let segments = Segments::from_coords(segments)?;
    let mut points = Vec::new();
    sweep::sweep(&segments, sweep::DEFAULT_EPS, |p, _| points.push(p));
    Ok(points)
}

/// Like [`intersections`], but for [`kurbo::Line`]s.
pub fn line_intersections(lines: &[kurbo::Line]) -> Result<Vec<kurbo::Point>, Error> {
    let mut segments = Segments::default();
    for line in lines {
        segments.add_segment(Point::from(line.p0), Point::from(line.p1))?;
    }
    let mut points = Vec::new();
    sweep::sweep(&segments, sweep::DEFAULT_EPS, |p, _| points.push(p.to_kurbo()));
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersections_end_to_end() {
        let pts = intersections([
            (0.0, 0.0, 10.0, 10.0),
            (10.0, 0.0, 0.0, 10.0),
            (2.0, 10.0, 2.0, 0.0),
        ])
        .unwrap();
        assert_eq!(
            pts,
            vec![
                Point::new(2.0, 8.0),
                Point::new(5.0, 5.0),
                Point::new(2.0, 2.0)
            ]
        );
    }

    #[test]
    fn rejects_degenerate_segments() {
        assert_eq!(
            intersections([(1.0, 2.0, 1.0, 2.0)]),
            Err(Error::DegenerateSegment(Point::new(1.0, 2.0)))
        );
    }

    #[test]
    fn kurbo_lines() {
        let lines = [
            kurbo::Line::new((0.0, 0.0), (4.0, 4.0)),
            kurbo::Line::new((0.0, 4.0), (4.0, 0.0)),
        ];
        assert_eq!(
            line_intersections(&lines).unwrap(),
            vec![kurbo::Point::new(2.0, 2.0)]
        );
    }
}
