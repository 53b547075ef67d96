//! Segment graph and covering cycles
//!
//! Vertices are segments, not points: there is an edge from segment A to
//! segment B when A ends where B starts. A filled region's outline is a
//! cycle in this graph, and the outlines of one fill style are a set of
//! disjoint cycles that use every segment once.
//!
//! Cycles are found with a spanning tree grown from a root segment that
//! stops as soon as the root is reached again. Cover state is tracked per
//! segment, so two outlines touching at one point stay separate:
//!
//! ```text
//!          +<-----+
//! shape 1  |      ^
//!          v      |
//!          +----->o<-----+
//!                 |      ^  shape 2
//!                 v      |
//!                 +----->+
//! ```

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::geometry::Point;
use crate::segment::Segment;

type Adjacency = SmallVec<[usize; 2]>;

/// Directed graph over the segments of one style
#[derive(Debug)]
pub struct SegmentGraph {
    segments: Vec<Segment>,
    successors: Vec<Adjacency>,
    starts_at: FxHashMap<Point, Adjacency>,
}

/// Result of a cycle cover: cycles as index lists into the graph's arena
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleCover {
    pub cycles: Vec<Vec<usize>>,
    /// Segments that no cycle could include
    pub uncovered: Vec<usize>,
}

impl CycleCover {
    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }
}

impl SegmentGraph {
    pub fn new(segments: Vec<Segment>) -> Self {
        let mut starts_at: FxHashMap<Point, Adjacency> = FxHashMap::default();
        for (index, segment) in segments.iter().enumerate() {
            starts_at.entry(segment.source()).or_default().push(index);
        }

        let mut graph = Self {
            segments,
            successors: Vec::new(),
            starts_at,
        };
        graph.successors = graph
            .segments
            .iter()
            .map(|segment| Adjacency::from_slice(graph.starting_at(segment.sink())))
            .collect();
        graph
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments that can follow `index`
    pub fn successors(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }

    /// Segments whose source is `point`
    pub fn starting_at(&self, point: Point) -> &[usize] {
        self.starts_at.get(&point).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Find a cycle through `root` using only segments not yet covered
    ///
    /// Grows a breadth-first spanning tree from the root's successors and
    /// stops when the root itself is discovered. The returned cycle starts
    /// with `root`.
    fn cycle_from(&self, root: usize, covered: &[bool]) -> Option<Vec<usize>> {
        let mut parent: FxHashMap<usize, usize> = FxHashMap::default();
        let mut frontier = VecDeque::new();
        frontier.push_back(root);

        'search: while let Some(current) = frontier.pop_front() {
            for &next in &self.successors[current] {
                if covered[next] || parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, current);
                if next == root {
                    break 'search;
                }
                frontier.push_back(next);
            }
        }

        let mut cycle = vec![root];
        let mut node = *parent.get(&root)?;
        while node != root {
            cycle.push(node);
            node = parent[&node];
        }
        // Walked backwards as [root, pred, ..., succ]; read it forwards
        cycle[1..].reverse();
        Some(cycle)
    }

    /// Partition the segments into closed cycles
    ///
    /// Roots are tried in index order. A root with no way back to itself is
    /// left uncovered and reported; it never blocks later roots.
    pub fn covering_cycles(&self) -> CycleCover {
        let mut covered = vec![false; self.segments.len()];
        let mut abandoned = vec![false; self.segments.len()];
        let mut cover = CycleCover::default();

        for root in 0..self.segments.len() {
            if covered[root] || abandoned[root] {
                continue;
            }
            match self.cycle_from(root, &covered) {
                Some(cycle) => {
                    for &index in &cycle {
                        covered[index] = true;
                    }
                    cover.cycles.push(cycle);
                }
                None => abandoned[root] = true,
            }
        }

        cover.uncovered = (0..self.segments.len()).filter(|&i| !covered[i]).collect();
        cover
    }
}
