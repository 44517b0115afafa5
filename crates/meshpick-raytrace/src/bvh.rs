//! Bounding volume hierarchy over the faces of a triangle mesh.
//!
//! Built by recursive midpoint splits along the longest axis of each node's
//! box. Leaves refer to contiguous runs of a permuted face-id array, so the
//! tree never copies geometry.

use std::ops::Range;

use meshpick_math::Point3;
use meshpick_mesh::{Aabb3, GeometryStore};
use serde::{Deserialize, Serialize};

use crate::error::{RaytraceError, Result};
use crate::intersect::{intersect_box, intersect_triangle};
use crate::{Hit, Ray};

/// BVH construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BvhSettings {
    /// A node with at most this many faces becomes a leaf.
    pub max_leaf_faces: usize,
    /// Nodes at this depth become leaves regardless of their face count.
    /// The root is at depth 0.
    pub max_depth: usize,
}

impl Default for BvhSettings {
    fn default() -> Self {
        Self {
            max_leaf_faces: 10,
            max_depth: 100,
        }
    }
}

impl BvhSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_leaf_faces == 0 {
            return Err(RaytraceError::InvalidSettings(
                "max_leaf_faces must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A BVH node - either a leaf covering a run of faces or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node.
    Leaf {
        /// Bounding box of the covered faces.
        aabb: Aabb3,
        /// Range into [`Bvh::face_ids`].
        faces: Range<usize>,
    },
    /// Internal node with two children.
    Internal {
        /// Union of the children's boxes.
        aabb: Aabb3,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Bounding box of this node.
    pub fn aabb(&self) -> &Aabb3 {
        match self {
            BvhNode::Leaf { aabb, .. } | BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Shape of a built hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BvhStats {
    /// Total node count.
    pub nodes: usize,
    /// Leaf count.
    pub leaves: usize,
    /// Depth of the deepest leaf (root alone is depth 0).
    pub depth: usize,
    /// Face count of the fullest leaf.
    pub max_leaf_faces: usize,
}

/// Bounding volume hierarchy for closest-hit ray queries against a
/// [`GeometryStore`].
///
/// The hierarchy stores face ids only. Queries take the store it was built
/// from; after the store's positions or faces change it must be rebuilt.
#[derive(Debug, Clone)]
pub struct Bvh {
    root: Option<BvhNode>,
    face_ids: Vec<usize>,
    settings: BvhSettings,
}

impl Bvh {
    /// Build a hierarchy over every face of `store`.
    ///
    /// An empty store yields a hierarchy without a root.
    pub fn build(store: &GeometryStore, settings: &BvhSettings) -> Result<Self> {
        settings.validate()?;

        let num_faces = store.num_faces();
        let mut boxes = Vec::with_capacity(num_faces);
        let mut centroids = Vec::with_capacity(num_faces);
        for face_id in 0..num_faces {
            let tri = store.triangle(face_id);
            boxes.push(Aabb3::from_points(&tri));
            centroids.push(Point3::from(
                (tri[0].coords + tri[1].coords + tri[2].coords) / 3.0,
            ));
        }

        let mut face_ids: Vec<usize> = (0..num_faces).collect();
        let builder = Builder {
            boxes: &boxes,
            centroids: &centroids,
            settings,
        };
        let root = if face_ids.is_empty() {
            None
        } else {
            Some(builder.build_node(&mut face_ids, 0, 0))
        };

        let bvh = Self {
            root,
            face_ids,
            settings: *settings,
        };
        let stats = bvh.stats();
        log::debug!(
            "built BVH over {} faces: {} nodes, {} leaves, depth {}, largest leaf {}",
            num_faces,
            stats.nodes,
            stats.leaves,
            stats.depth,
            stats.max_leaf_faces
        );
        Ok(bvh)
    }

    /// Refine `hit` with the closest intersection of `ray` against the
    /// faces of `store`. Returns `true` if `hit` was updated.
    ///
    /// `store` must be the store the hierarchy was built from.
    pub fn intersect(&self, store: &GeometryStore, ray: &Ray, hit: &mut Hit) -> bool {
        match &self.root {
            Some(root) => self.intersect_node(store, root, ray, hit),
            None => false,
        }
    }

    fn intersect_node(&self, store: &GeometryStore, node: &BvhNode, ray: &Ray, hit: &mut Hit) -> bool {
        match intersect_box(ray, node.aabb()) {
            Some(bh) if bh.t_min < hit.t() => {}
            _ => return false,
        }

        match node {
            BvhNode::Leaf { faces, .. } => {
                let mut found = false;
                for &face_id in &self.face_ids[faces.clone()] {
                    found |= intersect_triangle(ray, &store.triangle(face_id), face_id, hit);
                }
                found
            }
            BvhNode::Internal { left, right, .. } => {
                // Nearest child first so the farther one is more likely pruned.
                let left_t = entry_t(ray, left);
                let right_t = entry_t(ray, right);
                let (first, second) = if right_t < left_t {
                    (right, left)
                } else {
                    (left, right)
                };
                let found_first = self.intersect_node(store, first, ray, hit);
                let found_second = self.intersect_node(store, second, ray, hit);
                found_first || found_second
            }
        }
    }

    /// Root node, if any faces were indexed.
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Face ids in leaf order. Each leaf's range indexes into this.
    pub fn face_ids(&self) -> &[usize] {
        &self.face_ids
    }

    /// Settings the hierarchy was built with.
    pub fn settings(&self) -> &BvhSettings {
        &self.settings
    }

    /// Face ids of every leaf, left to right.
    pub fn leaves(&self) -> Vec<&[usize]> {
        let mut leaves = Vec::new();
        let mut stack: Vec<&BvhNode> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                BvhNode::Leaf { faces, .. } => leaves.push(&self.face_ids[faces.clone()]),
                BvhNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        leaves
    }

    /// Node, leaf and depth counts.
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        let mut stack: Vec<(&BvhNode, usize)> = self.root.iter().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            stats.nodes += 1;
            match node {
                BvhNode::Leaf { faces, .. } => {
                    stats.leaves += 1;
                    stats.depth = stats.depth.max(depth);
                    stats.max_leaf_faces = stats.max_leaf_faces.max(faces.len());
                }
                BvhNode::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        stats
    }
}

fn entry_t(ray: &Ray, node: &BvhNode) -> f64 {
    intersect_box(ray, node.aabb()).map_or(f64::INFINITY, |bh| bh.t_min)
}

struct Builder<'a> {
    boxes: &'a [Aabb3],
    centroids: &'a [Point3],
    settings: &'a BvhSettings,
}

impl Builder<'_> {
    /// Build the subtree over `ids`, which starts at `offset` in the full
    /// face-id array.
    fn build_node(&self, ids: &mut [usize], offset: usize, depth: usize) -> BvhNode {
        let mut aabb = Aabb3::null();
        for &id in ids.iter() {
            aabb.merge(&self.boxes[id]);
        }

        if ids.len() <= self.settings.max_leaf_faces || depth >= self.settings.max_depth {
            return BvhNode::Leaf {
                aabb,
                faces: offset..offset + ids.len(),
            };
        }

        let axis = aabb.longest_axis();
        let mut mid = partition_faces(ids, self.centroids, axis, aabb.center()[axis]);

        // Fallback if partition fails
        if mid == 0 || mid == ids.len() {
            mid = ids.len() / 2;
            ids.select_nth_unstable_by(mid, |&a, &b| {
                self.centroids[a][axis].total_cmp(&self.centroids[b][axis])
            });
        }

        let (left_ids, right_ids) = ids.split_at_mut(mid);
        let left = self.build_node(left_ids, offset, depth + 1);
        let right = self.build_node(right_ids, offset + mid, depth + 1);

        BvhNode::Internal {
            aabb: left.aabb().union(right.aabb()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Partition face ids by centroid along an axis: ids with centroid below
/// `pos` first. Returns the size of the lower group.
fn partition_faces(ids: &mut [usize], centroids: &[Point3], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = ids.len();

    while left < right {
        if centroids[ids[left]][axis] < pos {
            left += 1;
        } else {
            right -= 1;
            ids.swap(left, right);
        }
    }

    left
}
