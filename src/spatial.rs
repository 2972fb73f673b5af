//! Spatial indexing of 3D positions.
//!
//! Uses an R-tree to answer the two queries the search needs:
//! - exact nearest position to a point
//! - positions strictly within a radius of a point
//!
//! Both queries are exact, so unlike the rounded bucket hash in
//! [`crate::tolerance`] they never miss a neighbour that sits across a
//! rounding boundary.

use nalgebra::Vector3;
use rstar::primitives::GeomWithData;
use rstar::RTree;

/// A position tagged with its index in the source collection.
pub type IndexedPosition = GeomWithData<[f32; 3], usize>;

#[inline]
fn to_point(p: &Vector3<f32>) -> [f32; 3] {
    [p.x, p.y, p.z]
}

#[inline]
fn distance_sq(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Read-only R-tree over a fixed set of positions.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    tree: RTree<IndexedPosition>,
}

impl SpatialIndex {
    pub fn new(positions: &[Vector3<f32>]) -> Self {
        let indexed: Vec<IndexedPosition> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedPosition::new(to_point(p), i))
            .collect();
        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest stored position as `(index, distance)`.
    ///
    /// When several positions are equally near, the lowest index wins so
    /// results do not depend on the tree layout.
    pub fn nearest(&self, p: &Vector3<f32>) -> Option<(usize, f32)> {
        let query = to_point(p);
        let mut iter = self.tree.nearest_neighbor_iter(&query);
        let first = iter.next()?;
        let best_sq = distance_sq(first.geom(), &query);
        let mut best_idx = first.data;
        for item in iter {
            if distance_sq(item.geom(), &query) > best_sq {
                break;
            }
            best_idx = best_idx.min(item.data);
        }
        Some((best_idx, best_sq.sqrt()))
    }

    /// Every stored position strictly closer than `radius`, sorted by index.
    pub fn within(&self, p: &Vector3<f32>, radius: f32) -> Vec<(usize, f32)> {
        let query = to_point(p);
        let radius_sq = radius * radius;
        let mut hits: Vec<(usize, f32)> = self
            .tree
            .locate_within_distance(query, radius_sq)
            .filter_map(|item| {
                let d2 = distance_sq(item.geom(), &query);
                (d2 < radius_sq).then(|| (item.data, d2.sqrt()))
            })
            .collect();
        hits.sort_unstable_by_key(|&(idx, _)| idx);
        hits
    }

    /// Whether any stored position is strictly closer than `radius`.
    pub fn any_within(&self, p: &Vector3<f32>, radius: f32) -> bool {
        let query = to_point(p);
        let radius_sq = radius * radius;
        self.tree
            .locate_within_distance(query, radius_sq)
            .any(|item| distance_sq(item.geom(), &query) < radius_sq)
    }
}

/// Insertion-ordered set of positions where two values are the same member
/// iff they are strictly closer than the set tolerance.
///
/// Deduplication is first-wins: a value within tolerance of an existing
/// member is dropped even if it would be closer to a later arrival.
#[derive(Clone, Debug)]
pub struct RadiusSet {
    tolerance: f32,
    tree: RTree<IndexedPosition>,
    items: Vec<Vector3<f32>>,
}

impl RadiusSet {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            tree: RTree::new(),
            items: Vec::new(),
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, p: &Vector3<f32>) -> bool {
        let query = to_point(p);
        let radius_sq = self.tolerance * self.tolerance;
        self.tree
            .locate_within_distance(query, radius_sq)
            .any(|item| distance_sq(item.geom(), &query) < radius_sq)
    }

    pub fn insert(&mut self, p: Vector3<f32>) -> bool {
        if self.contains(&p) {
            return false;
        }
        let idx = self.items.len();
        self.items.push(p);
        self.tree.insert(IndexedPosition::new(to_point(&p), idx));
        true
    }

    /// Keep only the members within tolerance of some member of `other`.
    pub fn intersect_with(&mut self, other: &RadiusSet) {
        let kept: Vec<Vector3<f32>> = self
            .items
            .iter()
            .filter(|p| other.contains(p))
            .copied()
            .collect();
        let indexed: Vec<IndexedPosition> = kept
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedPosition::new(to_point(p), i))
            .collect();
        self.tree = RTree::bulk_load(indexed);
        self.items = kept;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector3<f32>> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Vector3<f32>> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter(n: usize) -> Vec<Vector3<f32>> {
        // Deterministic pseudo-random cloud.
        let mut state = 0x2545_f491u32;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 10_000) as f32 / 100.0
        };
        (0..n).map(|_| Vector3::new(next(), next(), next())).collect()
    }

    fn nearest_by_scan(points: &[Vector3<f32>], p: &Vector3<f32>) -> (usize, f32) {
        let mut best = (0usize, f32::MAX);
        for (i, q) in points.iter().enumerate() {
            let d = (q - p).norm();
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    }

    #[test]
    fn nearest_agrees_with_linear_scan() {
        let points = scatter(200);
        let index = SpatialIndex::new(&points);
        for probe in scatter(50).iter().map(|p| p * 0.9) {
            let (idx, dist) = index.nearest(&probe).unwrap();
            let (scan_idx, scan_dist) = nearest_by_scan(&points, &probe);
            assert!((dist - scan_dist).abs() < 1e-4);
            assert_eq!(idx, scan_idx);
        }
    }

    #[test]
    fn nearest_on_empty_index_is_none() {
        let index = SpatialIndex::new(&[]);
        assert!(index.is_empty());
        assert!(index.nearest(&Vector3::zeros()).is_none());
    }

    #[test]
    fn nearest_tie_prefers_lowest_index() {
        let points = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ];
        let index = SpatialIndex::new(&points);
        assert_eq!(index.nearest(&Vector3::zeros()).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn within_radius_is_strict() {
        let points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.5, 0.0, 0.0),
            Vector3::new(0.25, 0.0, 0.0),
        ];
        let index = SpatialIndex::new(&points);
        let hits: Vec<usize> = index
            .within(&Vector3::zeros(), 0.5)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(hits, vec![0, 2]);
        assert!(!index.any_within(&Vector3::new(2.0, 0.0, 0.0), 0.5));
    }

    #[test]
    fn radius_set_has_no_bucket_boundary_misses() {
        let mut set = RadiusSet::new(0.1);
        assert!(set.insert(Vector3::new(0.0004, 0.0, 0.0)));
        assert!(set.contains(&Vector3::new(0.0006, 0.0, 0.0)));
        assert!(!set.insert(Vector3::new(0.0006, 0.0, 0.0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn radius_set_intersection() {
        let mut left = RadiusSet::new(0.1);
        left.insert(Vector3::new(1.0, 0.0, 0.0));
        left.insert(Vector3::new(5.0, 0.0, 0.0));
        let mut right = RadiusSet::new(0.1);
        right.insert(Vector3::new(5.05, 0.0, 0.0));
        left.intersect_with(&right);
        assert_eq!(left.into_vec(), vec![Vector3::new(5.0, 0.0, 0.0)]);
    }
}
