//! The queue of pending sweep events.

use std::cmp::Ordering;

use crate::geom::Point;
use crate::segments::{SegIdx, Segments};

/// The role a segment plays at an event point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventRole {
    /// The segment's upper endpoint is here: it is about to become active.
    Upper,
    /// The segment's lower endpoint is here: it stops being active.
    Lower,
    /// The segment passes through here; recorded when a crossing in its
    /// interior is discovered.
    Crossing,
}

/// A pending event: a point, plus every segment involved there grouped by
/// role.
///
/// Within each role the segments are deduplicated by endpoint coordinates,
/// so feeding the same segment twice doesn't make it show up twice.
#[derive(Clone)]
pub struct EventPoint {
    /// Where the event happens.
    pub point: Point,
    /// Segments whose upper endpoint is here.
    pub upper: Vec<SegIdx>,
    /// Segments whose lower endpoint is here.
    pub lower: Vec<SegIdx>,
    /// Segments crossing through the interior of this point's neighborhood.
    pub crossing: Vec<SegIdx>,
}

impl EventPoint {
    fn new(point: Point) -> Self {
        EventPoint {
            point,
            upper: Vec::new(),
            lower: Vec::new(),
            crossing: Vec::new(),
        }
    }

    fn role_mut(&mut self, role: EventRole) -> &mut Vec<SegIdx> {
        match role {
            EventRole::Upper => &mut self.upper,
            EventRole::Lower => &mut self.lower,
            EventRole::Crossing => &mut self.crossing,
        }
    }
}

impl std::fmt::Debug for EventPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}: U{:?} L{:?} C{:?}",
            self.point, self.upper, self.lower, self.crossing
        )
    }
}

struct Node {
    event: EventPoint,
    height: i8,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

fn height(node: &Option<Box<Node>>) -> i8 {
    node.as_ref().map_or(0, |n| n.height)
}

impl Node {
    fn leaf(event: EventPoint) -> Box<Node> {
        Box::new(Node {
            event,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i8 {
        height(&self.left) - height(&self.right)
    }
}

/// The schedule of pending sweep events.
///
/// An AVL tree keyed by the sweep order on [`Point`]s (see [`Point`]'s `Ord`
/// impl), so the next event to process is the tree minimum. Every operation
/// takes the segment arena, because deduplication inside the role sets
/// compares segments by their coordinates.
#[derive(Default)]
pub struct EventQueue {
    root: Option<Box<Node>>,
    len: usize,
}

impl EventQueue {
    /// Build the initial schedule: one upper and one lower endpoint event
    /// for every segment in the arena.
    pub fn from_segments(segments: &Segments) -> Self {
        let mut queue = EventQueue::default();
        for idx in segments.indices() {
            queue.insert(segments[idx].upper, idx, EventRole::Upper, segments);
            queue.insert(segments[idx].lower, idx, EventRole::Lower, segments);
        }
        queue
    }

    /// The number of distinct pending event points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the schedule empty?
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Record that `seg` plays `role` at `point`.
    ///
    /// Creates the event if this is the first mention of `point`; otherwise
    /// the existing event is extended. Returns whether anything changed: a
    /// segment that's already present in that role (by coordinate equality)
    /// is left alone.
    pub fn insert(
        &mut self,
        point: Point,
        seg: SegIdx,
        role: EventRole,
        segments: &Segments,
    ) -> bool {
        let mut created = false;
        let mut changed = false;
        self.root = Some(insert_rec(
            self.root.take(),
            point,
            seg,
            role,
            segments,
            &mut created,
            &mut changed,
        ));
        self.len += created as usize;
        changed
    }

    /// The next event in sweep order, without removing it.
    ///
    /// Callers that mutate the queue while processing the event should
    /// clone it first; the event stays scheduled until [`EventQueue::remove`].
    pub fn first(&self) -> Option<&EventPoint> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.event)
    }

    /// Drop the event at `point`, if there is one. Returns whether there was.
    pub fn remove(&mut self, point: Point) -> bool {
        let mut removed = false;
        self.root = remove_rec(self.root.take(), point, &mut removed);
        self.len -= removed as usize;
        removed
    }

    /// Iterate over pending events in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = &EventPoint> {
        let mut stack = Vec::new();
        let mut cur = self.root.as_deref();
        std::iter::from_fn(move || {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }
            let node = stack.pop()?;
            cur = node.right.as_deref();
            Some(&node.event)
        })
    }

    #[cfg(any(test, feature = "slow-asserts"))]
    pub(crate) fn check_invariants(&self) {
        fn check(node: &Node) -> i8 {
            let lh = node.left.as_deref().map_or(0, check);
            let rh = node.right.as_deref().map_or(0, check);
            assert_eq!(node.height, 1 + lh.max(rh));
            assert!((lh - rh).abs() <= 1);
            if let Some(l) = node.left.as_deref() {
                assert!(l.event.point < node.event.point);
            }
            if let Some(r) = node.right.as_deref() {
                assert!(r.event.point > node.event.point);
            }
            node.height
        }
        if let Some(root) = self.root.as_deref() {
            check(root);
        }
        assert_eq!(self.iter().count(), self.len);
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[allow(clippy::too_many_arguments)]
fn insert_rec(
    node: Option<Box<Node>>,
    point: Point,
    seg: SegIdx,
    role: EventRole,
    segments: &Segments,
    created: &mut bool,
    changed: &mut bool,
) -> Box<Node> {
    let mut node = match node {
        None => {
            *created = true;
            *changed = true;
            let mut event = EventPoint::new(point);
            event.role_mut(role).push(seg);
            return Node::leaf(event);
        }
        Some(node) => node,
    };

    match point.cmp(&node.event.point) {
        Ordering::Less => {
            node.left = Some(insert_rec(
                node.left.take(),
                point,
                seg,
                role,
                segments,
                created,
                changed,
            ));
        }
        Ordering::Greater => {
            node.right = Some(insert_rec(
                node.right.take(),
                point,
                seg,
                role,
                segments,
                created,
                changed,
            ));
        }
        Ordering::Equal => {
            let set = node.event.role_mut(role);
            if !set.iter().any(|&s| segments[s] == segments[seg]) {
                set.push(seg);
                *changed = true;
            }
            return node;
        }
    }

    node.update_height();
    rebalance_insert(node, point)
}

// The insert-side rotation is chosen by comparing the freshly inserted key
// against the heavy child, as in the textbook AVL insert.
fn rebalance_insert(mut node: Box<Node>, point: Point) -> Box<Node> {
    let balance = node.balance();
    if balance > 1 {
        // unwrap: a left-heavy node has a left child.
        if point < node.left.as_ref().unwrap().event.point {
            rotate_right(node)
        } else {
            node.left = Some(rotate_left(node.left.take().unwrap()));
            rotate_right(node)
        }
    } else if balance < -1 {
        if point > node.right.as_ref().unwrap().event.point {
            rotate_left(node)
        } else {
            node.right = Some(rotate_right(node.right.take().unwrap()));
            rotate_left(node)
        }
    } else {
        node
    }
}

fn remove_rec(node: Option<Box<Node>>, point: Point, removed: &mut bool) -> Option<Box<Node>> {
    let mut node = node?;
    match point.cmp(&node.event.point) {
        Ordering::Less => node.left = remove_rec(node.left.take(), point, removed),
        Ordering::Greater => node.right = remove_rec(node.right.take(), point, removed),
        Ordering::Equal => {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => return Some(child),
                (Some(left), Some(right)) => {
                    // Splice in the in-order successor.
                    let (right, succ) = take_min(right);
                    node.event = succ;
                    node.left = Some(left);
                    node.right = right;
                }
            }
        }
    }
    node.update_height();
    Some(rebalance_delete(node))
}

fn take_min(mut node: Box<Node>) -> (Option<Box<Node>>, EventPoint) {
    match node.left.take() {
        None => (node.right.take(), node.event),
        Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            node.update_height();
            (Some(rebalance_delete(node)), min)
        }
    }
}

// The delete side decides rotations from structural balance factors alone.
fn rebalance_delete(mut node: Box<Node>) -> Box<Node> {
    let balance = node.balance();
    if balance > 1 {
        // unwrap: a left-heavy node has a left child.
        if node.left.as_ref().unwrap().balance() >= 0 {
            rotate_right(node)
        } else {
            node.left = Some(rotate_left(node.left.take().unwrap()));
            rotate_right(node)
        }
    } else if balance < -1 {
        if node.right.as_ref().unwrap().balance() <= 0 {
            rotate_left(node)
        } else {
            node.right = Some(rotate_right(node.right.take().unwrap()));
            rotate_left(node)
        }
    } else {
        node
    }
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    // unwrap: callers only rotate toward the light side.
    let mut pivot = node.left.take().unwrap();
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let mut pivot = node.right.take().unwrap();
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn one_seg_arena() -> Segments {
        let mut segs = Segments::default();
        segs.add_segment((0.0, 0.0), (1.0, 1.0)).unwrap();
        segs
    }

    #[test]
    fn basic() {
        let mut segs = Segments::default();
        let a = segs.add_segment((0.0, 4.0), (4.0, 0.0)).unwrap();
        let b = segs.add_segment((1.0, 4.0), (1.0, 0.0)).unwrap();

        let queue = EventQueue::from_segments(&segs);
        assert_eq!(queue.len(), 4);

        // The top-left endpoint comes first.
        let first = queue.first().unwrap();
        assert_eq!(first.point, Point::new(0.0, 4.0));
        assert_eq!(first.upper, vec![a]);
        assert!(first.lower.is_empty());

        // Same height: left to right.
        let points: Vec<_> = queue.iter().map(|ev| ev.point).collect();
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 4.0),
                Point::new(1.0, 4.0),
                Point::new(1.0, 0.0),
                Point::new(4.0, 0.0),
            ]
        );
        assert_eq!(queue.iter().nth(1).unwrap().upper, vec![b]);
        queue.check_invariants();
    }

    #[test]
    fn removal() {
        let segs = one_seg_arena();
        let s = SegIdx(0);
        let mut queue = EventQueue::default();
        for y in 0..10 {
            queue.insert(Point::new(0.0, f64::from(y)), s, EventRole::Crossing, &segs);
        }
        assert_eq!(queue.len(), 10);

        assert!(queue.remove(Point::new(0.0, 9.0)));
        assert!(!queue.remove(Point::new(0.0, 9.0)));
        assert!(queue.remove(Point::new(0.0, 4.0)));
        queue.check_invariants();

        let points: Vec<_> = queue.iter().map(|ev| ev.point.y).collect();
        assert_eq!(points, vec![8.0, 7.0, 6.0, 5.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn role_dedup() {
        let mut segs = Segments::default();
        let a = segs.add_segment((0.0, 0.0), (4.0, 4.0)).unwrap();
        // Same coordinates, different index: the queue treats them as one
        // segment.
        let b = segs.add_segment((4.0, 4.0), (0.0, 0.0)).unwrap();

        let mut queue = EventQueue::default();
        let p = Point::new(4.0, 4.0);
        assert!(queue.insert(p, a, EventRole::Upper, &segs));
        assert!(!queue.insert(p, a, EventRole::Upper, &segs));
        assert!(!queue.insert(p, b, EventRole::Upper, &segs));
        assert_eq!(queue.first().unwrap().upper, vec![a]);

        // The same segment can hold two roles at one point, though.
        assert!(queue.insert(p, a, EventRole::Crossing, &segs));
        assert_eq!(queue.len(), 1);
    }

    proptest! {
        #[test]
        fn matches_btree_model(ops in proptest::collection::vec(
            (any::<bool>(), -4i32..=4, -4i32..=4),
            1..80,
        )) {
            let segs = one_seg_arena();
            let s = SegIdx(0);
            let mut queue = EventQueue::default();
            let mut model = BTreeSet::new();

            for (is_insert, x, y) in ops {
                let p = Point::new(f64::from(x), f64::from(y));
                if is_insert {
                    let changed = queue.insert(p, s, EventRole::Upper, &segs);
                    prop_assert_eq!(changed, model.insert(p));
                } else {
                    let removed = queue.remove(p);
                    prop_assert_eq!(removed, model.remove(&p));
                }
                queue.check_invariants();
            }

            let ours: Vec<_> = queue.iter().map(|ev| ev.point).collect();
            let expected: Vec<_> = model.iter().copied().collect();
            prop_assert_eq!(ours, expected);
            prop_assert_eq!(
                queue.first().map(|ev| ev.point),
                model.iter().next().copied()
            );
        }
    }
}
