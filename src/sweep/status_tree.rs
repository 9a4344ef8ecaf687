//! The status of the sweep line: the active segments, in left-to-right order.

use std::cmp::Ordering;

use crate::num::CheapOrderedFloat;
use crate::segments::{SegIdx, Segments};

struct Node {
    seg: SegIdx,
    height: i8,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

fn height(node: &Option<Box<Node>>) -> i8 {
    node.as_ref().map_or(0, |n| n.height)
}

impl Node {
    fn leaf(seg: SegIdx) -> Box<Node> {
        Box::new(Node {
            seg,
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

fn key_at(segments: &Segments, seg: SegIdx, y: f64) -> CheapOrderedFloat {
    CheapOrderedFloat::from(segments[seg].at_y(y))
}

/// The segments currently crossed by the sweep line, ordered left to right.
///
/// An AVL tree whose ordering key is each segment's x-coordinate *at the
/// current sweep height*. The height isn't stored anywhere in the tree: it
/// is external state, passed into every operation, and the key of every
/// stored segment drifts as the sweep moves down. The order of two active
/// segments only changes where they cross, and crossings are events, so as
/// long as mutations happen at event heights the stored structure stays
/// consistent with the keys. Mutating at other heights is not meaningful.
#[derive(Default)]
pub struct StatusTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl StatusTree {
    /// The number of active segments.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the sweep line currently crossing nothing?
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Make `seg` active, ordering it by its position at height `y`.
    ///
    /// All comparisons for this call use the same height. A segment with
    /// the same endpoint coordinates as one already stored at an equal key
    /// is not inserted again; returns whether anything was inserted.
    pub fn insert(&mut self, seg: SegIdx, y: f64, segments: &Segments) -> bool {
        let mut created = false;
        self.root = Some(insert_rec(
            self.root.take(),
            seg,
            key_at(segments, seg, y),
            y,
            segments,
            &mut created,
        ));
        self.len += created as usize;
        created
    }

    /// Remove `seg`, locating it by its position at height `y`.
    ///
    /// Where several active segments share the exact same key at `y` (they
    /// all pass through one point), the one removed is the one whose
    /// endpoint coordinates match `seg`. Returns whether it was found.
    pub fn remove(&mut self, seg: SegIdx, y: f64, segments: &Segments) -> bool {
        let mut removed = false;
        self.root = remove_rec(
            self.root.take(),
            seg,
            key_at(segments, seg, y),
            y,
            segments,
            &mut removed,
        );
        if !removed {
            // Keys recomputed right at a crossing can come out a hair to
            // either side of the tied value, which can steer the keyed
            // descent past its target. Fall back to locating the segment
            // by its endpoints alone.
            self.root = remove_by_identity(self.root.take(), seg, segments, &mut removed);
        }
        self.len -= removed as usize;
        removed
    }

    /// The active segment immediately left of `seg`'s position at height `y`.
    ///
    /// "Immediately left" is the largest key strictly smaller than `seg`'s
    /// own key, so segments tied exactly with `seg` at `y` (crossing
    /// partners, when `y` is the crossing height itself) are skipped. The
    /// descent records the last segment passed on the left; `None` means
    /// `seg` is leftmost.
    pub fn left_neighbor(&self, seg: SegIdx, y: f64, segments: &Segments) -> Option<SegIdx> {
        let key = key_at(segments, seg, y);
        let mut best = None;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            if key_at(segments, node.seg, y) < key {
                best = Some(node.seg);
                cur = node.right.as_deref();
            } else {
                cur = node.left.as_deref();
            }
        }
        best
    }

    /// The active segment immediately right of `seg`'s position at height
    /// `y`, with the same tie handling as [`StatusTree::left_neighbor`].
    pub fn right_neighbor(&self, seg: SegIdx, y: f64, segments: &Segments) -> Option<SegIdx> {
        let key = key_at(segments, seg, y);
        let mut best = None;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            if key_at(segments, node.seg, y) > key {
                best = Some(node.seg);
                cur = node.left.as_deref();
            } else {
                cur = node.right.as_deref();
            }
        }
        best
    }

    /// The active segments straddling the abscissa `x` at height `y`: the
    /// rightmost one at or left of `x`, and the leftmost one strictly right
    /// of it.
    pub fn left_right_of(
        &self,
        x: f64,
        y: f64,
        segments: &Segments,
    ) -> (Option<SegIdx>, Option<SegIdx>) {
        let x = CheapOrderedFloat::from(x);
        let mut left = None;
        let mut right = None;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            if key_at(segments, node.seg, y) <= x {
                left = Some(node.seg);
                cur = node.right.as_deref();
            } else {
                right = Some(node.seg);
                cur = node.left.as_deref();
            }
        }
        (left, right)
    }

    /// Iterate over the active segments, leftmost first.
    pub fn iter(&self) -> impl Iterator<Item = SegIdx> + '_ {
        let mut stack = Vec::new();
        let mut cur = self.root.as_deref();
        std::iter::from_fn(move || {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }
            let node = stack.pop()?;
            cur = node.right.as_deref();
            Some(node.seg)
        })
    }

    #[cfg(any(test, feature = "slow-asserts"))]
    pub(crate) fn check_invariants(&self, y: f64, segments: &Segments) {
        fn check(node: &Node) -> i8 {
            let lh = node.left.as_deref().map_or(0, check);
            let rh = node.right.as_deref().map_or(0, check);
            assert_eq!(node.height, 1 + lh.max(rh));
            assert!((lh - rh).abs() <= 1);
            node.height
        }
        if let Some(root) = self.root.as_deref() {
            check(root);
        }
        let keys: Vec<_> = self.iter().map(|seg| key_at(segments, seg, y)).collect();
        assert!(
            keys.windows(2).all(|w| w[0] <= w[1]),
            "status out of order at y={y:?}: {keys:?}"
        );
        assert_eq!(keys.len(), self.len);
    }
}

impl std::fmt::Debug for StatusTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

fn insert_rec(
    node: Option<Box<Node>>,
    seg: SegIdx,
    key: CheapOrderedFloat,
    y: f64,
    segments: &Segments,
    created: &mut bool,
) -> Box<Node> {
    let mut node = match node {
        None => {
            *created = true;
            return Node::leaf(seg);
        }
        Some(node) => node,
    };

    match key.cmp(&key_at(segments, node.seg, y)) {
        Ordering::Less => {
            node.left = Some(insert_rec(node.left.take(), seg, key, y, segments, created));
        }
        Ordering::Equal if segments[node.seg] == segments[seg] => {
            // Coordinate-equal duplicate; keep the one copy.
            return node;
        }
        // A tied key that belongs to a different segment descends right, so
        // exact ties still get stored instead of being dropped.
        Ordering::Greater | Ordering::Equal => {
            node.right = Some(insert_rec(node.right.take(), seg, key, y, segments, created));
        }
    }

    node.update_height();
    rebalance_insert(node, key, y, segments)
}

// Rotation choice on the insert side mirrors the descent: the comparison
// against the heavy child's key tells which grandchild subtree grew.
fn rebalance_insert(
    mut node: Box<Node>,
    key: CheapOrderedFloat,
    y: f64,
    segments: &Segments,
) -> Box<Node> {
    let balance = node.balance();
    if balance > 1 {
        // unwrap: a left-heavy node has a left child.
        if key < key_at(segments, node.left.as_ref().unwrap().seg, y) {
            rotate_right(node)
        } else {
            node.left = Some(rotate_left(node.left.take().unwrap()));
            rotate_right(node)
        }
    } else if balance < -1 {
        if key < key_at(segments, node.right.as_ref().unwrap().seg, y) {
            node.right = Some(rotate_right(node.right.take().unwrap()));
            rotate_left(node)
        } else {
            rotate_left(node)
        }
    } else {
        node
    }
}

fn remove_rec(
    node: Option<Box<Node>>,
    seg: SegIdx,
    key: CheapOrderedFloat,
    y: f64,
    segments: &Segments,
    removed: &mut bool,
) -> Option<Box<Node>> {
    let mut node = node?;
    match key.cmp(&key_at(segments, node.seg, y)) {
        Ordering::Less => {
            node.left = remove_rec(node.left.take(), seg, key, y, segments, removed);
        }
        Ordering::Greater => {
            node.right = remove_rec(node.right.take(), seg, key, y, segments, removed);
        }
        Ordering::Equal => {
            if segments[node.seg] == segments[seg] {
                *removed = true;
                return splice(node);
            }
            // Tied keys: the segment we're after could sit on either side
            // of this node.
            node.left = remove_rec(node.left.take(), seg, key, y, segments, removed);
            if !*removed {
                node.right = remove_rec(node.right.take(), seg, key, y, segments, removed);
            }
        }
    }
    node.update_height();
    Some(rebalance_delete(node))
}

fn remove_by_identity(
    node: Option<Box<Node>>,
    seg: SegIdx,
    segments: &Segments,
    removed: &mut bool,
) -> Option<Box<Node>> {
    let mut node = node?;
    if segments[node.seg] == segments[seg] {
        *removed = true;
        return splice(node);
    }
    node.left = remove_by_identity(node.left.take(), seg, segments, removed);
    if !*removed {
        node.right = remove_by_identity(node.right.take(), seg, segments, removed);
    }
    node.update_height();
    Some(rebalance_delete(node))
}

// Detach `node` from the tree, promoting a child or the in-order successor
// into its place.
fn splice(mut node: Box<Node>) -> Option<Box<Node>> {
    match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            let (right, succ) = take_min(right);
            node.seg = succ;
            node.left = Some(left);
            node.right = right;
            node.update_height();
            Some(rebalance_delete(node))
        }
    }
}

fn take_min(mut node: Box<Node>) -> (Option<Box<Node>>, SegIdx) {
    match node.left.take() {
        None => (node.right.take(), node.seg),
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
