//! Storage and identity for the segments being swept.

use crate::geom::{Point, Segment};
use crate::Error;

/// An index into our segment arena.
///
/// The sweep structures pass these around instead of whole segments; the
/// geometry lives in one [`Segments`] collection and is looked up by index.
/// (This index-as-identifier breaks down if there are multiple `Segments`
/// in flight. Just be careful not to mix them up.)
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct SegIdx(pub usize);

impl std::fmt::Debug for SegIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s_{}", self.0)
    }
}

/// An arena of line segments.
///
/// Segments are indexed by [`SegIdx`] and can be retrieved by indexing
/// (i.e. with square brackets). They are stored in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Segments {
    segs: Vec<Segment>,
}

impl Segments {
    /// Ingest `(x1, y1, x2, y2)` coordinate tuples, one segment each.
    pub fn from_coords(
        coords: impl IntoIterator<Item = (f64, f64, f64, f64)>,
    ) -> Result<Self, Error> {
        let mut segs = Segments::default();
        for (x1, y1, x2, y2) in coords {
            segs.add_segment((x1, y1), (x2, y2))?;
        }
        Ok(segs)
    }

    /// Add one segment with endpoints `a` and `b`, given in either order.
    ///
    /// The endpoints are canonicalized on the way in; degenerate and
    /// non-finite input is rejected, see [`Segment::new`].
    pub fn add_segment(
        &mut self,
        a: impl Into<Point>,
        b: impl Into<Point>,
    ) -> Result<SegIdx, Error> {
        let seg = Segment::new(a, b)?;
        let idx = SegIdx(self.segs.len());
        self.segs.push(seg);
        Ok(idx)
    }

    /// The number of line segments in this arena.
    pub fn len(&self) -> usize {
        self.segs.len()
    }

    /// Is the arena empty?
    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Iterate over all indices that can be used to index into this arena.
    pub fn indices(&self) -> impl Iterator<Item = SegIdx> {
        (0..self.segs.len()).map(SegIdx)
    }

    /// Iterate over all segments, in insertion order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segs.iter()
    }
}

impl std::ops::Index<SegIdx> for Segments {
    type Output = Segment;

    fn index(&self, idx: SegIdx) -> &Segment {
        &self.segs[idx.0]
    }
}
