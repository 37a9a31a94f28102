//! Bounding Volume Hierarchy (BVH) over triangles.
//!
//! Nodes live in a flat arena and reference their children by index. Leaves
//! reference a contiguous run of a shared primitive-index list, so a triangle
//! that straddles a split plane can appear in both subtrees without copying
//! its geometry.

use crate::hittable::LocalHit;
use crate::triangle::Triangle;
use glint_math::{Aabb, Interval, Ray};

/// Nodes with this many triangles or fewer are never split.
pub const LEAF_MAX_SIZE: usize = 4;

/// Children of a node, or the primitive run of a leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNodeKind {
    Internal { left: u32, right: u32 },
    Leaf { start: u32, len: u32 },
}

/// A bounding volume plus its contents.
#[derive(Debug, Clone, Copy)]
pub struct BvhNode {
    pub bounds: Aabb,
    pub kind: BvhNodeKind,
}

/// Binary BVH over a triangle soup.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    prim_indices: Vec<u32>,
    triangles: Vec<Triangle>,
}

impl Bvh {
    /// Build a BVH, splitting at most `max_depth` times along any path.
    ///
    /// `max_depth == 0` yields a single leaf holding every triangle.
    pub fn build(triangles: Vec<Triangle>, max_depth: usize) -> Self {
        let mut bvh = Self {
            nodes: Vec::new(),
            prim_indices: Vec::new(),
            triangles,
        };

        let all: Vec<u32> = (0..bvh.triangles.len() as u32).collect();
        let bounds = bvh.bounds_of(&all);
        bvh.split(all, bounds, max_depth);

        log::debug!(
            "BVH: {} triangles, {} nodes, {} leaves, largest leaf {}",
            bvh.triangles.len(),
            bvh.node_count(),
            bvh.leaf_count(),
            bvh.max_leaf_size()
        );

        bvh
    }

    /// Bounds of the whole tree.
    pub fn bounds(&self) -> Aabb {
        self.nodes[0].bounds
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, BvhNodeKind::Leaf { .. }))
            .count()
    }

    pub fn max_leaf_size(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| match n.kind {
                BvhNodeKind::Leaf { len, .. } => Some(len as usize),
                BvhNodeKind::Internal { .. } => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Triangles referenced by a leaf.
    pub fn leaf_triangles(&self, node: &BvhNode) -> impl Iterator<Item = &Triangle> + '_ {
        let range = match node.kind {
            BvhNodeKind::Leaf { start, len } => start as usize..(start + len) as usize,
            BvhNodeKind::Internal { .. } => 0..0,
        };
        self.prim_indices[range]
            .iter()
            .map(move |&i| &self.triangles[i as usize])
    }

    /// Every leaf encloses its triangles and every internal node its children.
    pub fn check_invariants(&self) -> bool {
        self.nodes.iter().all(|node| match node.kind {
            BvhNodeKind::Leaf { .. } => self
                .leaf_triangles(node)
                .all(|tri| tri.vertices().iter().all(|&v| node.bounds.contains_point(v))),
            BvhNodeKind::Internal { left, right } => {
                node.bounds.contains(&self.nodes[left as usize].bounds)
                    && node.bounds.contains(&self.nodes[right as usize].bounds)
            }
        })
    }

    /// Nearest triangle hit along the ray, if any.
    pub fn traverse(&self, ray: &Ray) -> Option<LocalHit> {
        if self.triangles.is_empty() {
            return None;
        }

        self.bounds()
            .entry_distance(ray, Interval::forward(f32::INFINITY))?;

        let mut best = None;
        self.traverse_node(0, ray, &mut best);
        best
    }

    fn traverse_node(&self, index: u32, ray: &Ray, best: &mut Option<LocalHit>) {
        let node = &self.nodes[index as usize];

        match node.kind {
            BvhNodeKind::Leaf { .. } => {
                for tri in self.leaf_triangles(node) {
                    if let Some(hit) = tri.intersect(ray) {
                        if best.map_or(true, |b| hit.t < b.t) {
                            *best = Some(hit);
                        }
                    }
                }
            }
            BvhNodeKind::Internal { left, right } => {
                let limit = best.map_or(f32::INFINITY, |b| b.t);
                let window = Interval::forward(limit);
                let left_entry = self.nodes[left as usize].bounds.entry_distance(ray, window);
                let right_entry = self.nodes[right as usize].bounds.entry_distance(ray, window);

                match (left_entry, right_entry) {
                    (Some(lt), Some(rt)) => {
                        let (near, far, far_entry) = if lt <= rt {
                            (left, right, rt)
                        } else {
                            (right, left, lt)
                        };

                        self.traverse_node(near, ray, best);

                        // The far child can still hold a closer hit when volumes overlap
                        if best.map_or(true, |b| b.t >= far_entry) {
                            self.traverse_node(far, ray, best);
                        }
                    }
                    (Some(_), None) => self.traverse_node(left, ray, best),
                    (None, Some(_)) => self.traverse_node(right, ray, best),
                    (None, None) => {}
                }
            }
        }
    }

    /// Recursive longest-axis split. Returns the index of the created node.
    fn split(&mut self, indices: Vec<u32>, bounds: Aabb, depth: usize) -> u32 {
        let node_index = self.nodes.len() as u32;
        self.nodes.push(BvhNode {
            bounds,
            kind: BvhNodeKind::Leaf { start: 0, len: 0 },
        });

        if depth == 0 || indices.len() <= LEAF_MAX_SIZE {
            self.make_leaf(node_index, &indices);
            return node_index;
        }

        let axis = bounds.longest_axis();
        let plane = bounds.centroid()[axis];

        let mut left = Vec::new();
        let mut right = Vec::new();
        for &i in &indices {
            let tri = &self.triangles[i as usize];
            let offset = tri.centroid()[axis] - plane;

            if offset.abs() < tri.bounding_radius() {
                // Straddles the split plane: visible from both sides
                left.push(i);
                right.push(i);
            } else if offset < 0.0 {
                left.push(i);
            } else {
                right.push(i);
            }
        }

        // A side that kept every triangle would split the same way again
        let no_progress = left.len() == indices.len() || right.len() == indices.len();
        if left.is_empty() || right.is_empty() || no_progress {
            self.make_leaf(node_index, &indices);
            return node_index;
        }

        let left_bounds = self.bounds_of(&left);
        let right_bounds = self.bounds_of(&right);
        let left_index = self.split(left, left_bounds, depth - 1);
        let right_index = self.split(right, right_bounds, depth - 1);

        // Padding on a flat child may poke out of the parent
        let children = Aabb::surrounding(
            &self.nodes[left_index as usize].bounds,
            &self.nodes[right_index as usize].bounds,
        );
        let node = &mut self.nodes[node_index as usize];
        node.bounds = Aabb::surrounding(&bounds, &children);
        node.kind = BvhNodeKind::Internal {
            left: left_index,
            right: right_index,
        };

        node_index
    }

    fn make_leaf(&mut self, node_index: u32, indices: &[u32]) {
        let start = self.prim_indices.len() as u32;
        self.prim_indices.extend_from_slice(indices);
        self.nodes[node_index as usize].kind = BvhNodeKind::Leaf {
            start,
            len: indices.len() as u32,
        };
    }

    fn bounds_of(&self, indices: &[u32]) -> Aabb {
        indices.iter().fold(Aabb::EMPTY, |acc, &i| {
            Aabb::surrounding(&acc, &self.triangles[i as usize].bounds())
        })
    }
}
