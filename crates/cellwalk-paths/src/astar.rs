use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

use cellwalk_core::Point;

use crate::cancel::CancelToken;
use crate::metric::Metric;
use crate::neighbors::NeighborGenerator;
use crate::obstruction::ObstructionCache;
use crate::path::{Path, SearchOutcome};
use crate::stats::SearchStats;

/// Index of a node in the search arena.
pub(crate) type NodeId = usize;

/// A cell reached by the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SearchNode {
    pub(crate) pos: Point,
    /// Cost from the start, used for ordering.
    pub(crate) g: f64,
    /// Estimated remaining cost.
    pub(crate) h: f64,
    /// Game distance from the start, reported to the caller.
    pub(crate) distance_traveled: f64,
    pub(crate) parent: Option<NodeId>,
}

impl SearchNode {
    #[inline]
    pub(crate) fn cost(&self) -> f64 {
        self.g + self.h
    }
}

/// One A* search from a start to a goal cell.
///
/// Nodes live in an arena and refer to their parent by index. The open list
/// is kept sorted by `g + h`; a node inserted with the same cost as others
/// goes after them, so equal-cost nodes are expanded in insertion order and
/// the result does not depend on hashing.
pub(crate) struct Search<'a> {
    generator: NeighborGenerator<'a>,
    metric: Metric,
    nodes: Vec<SearchNode>,
    open: VecDeque<NodeId>,
    open_index: HashMap<Point, NodeId>,
    closed: HashSet<Point>,
}

impl<'a> Search<'a> {
    pub(crate) fn new(generator: NeighborGenerator<'a>, metric: Metric) -> Self {
        Self {
            generator,
            metric,
            nodes: Vec::new(),
            open: VecDeque::new(),
            open_index: HashMap::new(),
            closed: HashSet::new(),
        }
    }

    /// Run the search to completion.
    ///
    /// The deadline is checked before every expansion and the cancel token
    /// after it. Anything but reaching the goal yields an empty path.
    pub(crate) fn run(
        &mut self,
        start: Point,
        goal: Point,
        deadline: Instant,
        cancel: &CancelToken,
        stats: &mut SearchStats,
    ) -> Path {
        let root = self.push(SearchNode {
            pos: start,
            g: 0.0,
            h: self.metric.heuristic(start, goal),
            distance_traveled: 0.0,
            parent: None,
        });
        insert_open(&mut self.open, &self.nodes, root);
        self.open_index.insert(start, root);

        let outcome = loop {
            if Instant::now() >= deadline {
                break SearchOutcome::TimedOut;
            }
            let Some(current) = self.open.pop_front() else {
                break SearchOutcome::Exhausted;
            };
            let node = self.nodes[current];
            self.open_index.remove(&node.pos);
            stats.expanded += 1;

            if node.pos == goal {
                return Path::found(self.backtrace(current), node.distance_traveled);
            }

            let candidates = self
                .generator
                .neighbors(current, &node, &mut self.closed, stats);
            for c in candidates {
                let h = self.metric.heuristic(c.pos, goal);
                log::trace!(
                    "{} from {}: g={:.3} h={:.3} f={:.3}",
                    c.pos,
                    node.pos,
                    c.g,
                    h,
                    c.g + h
                );

                if let Some(&existing) = self.open_index.get(&c.pos) {
                    if c.g < self.nodes[existing].g {
                        let n = &mut self.nodes[existing];
                        n.g = c.g;
                        n.distance_traveled = c.distance_traveled;
                        n.parent = Some(c.parent);
                        if let Some(at) = self.open.iter().position(|&id| id == existing) {
                            self.open.remove(at);
                        }
                        insert_open(&mut self.open, &self.nodes, existing);
                        stats.relaxed += 1;
                    }
                    continue;
                }

                let id = self.nodes.len();
                self.nodes.push(SearchNode {
                    pos: c.pos,
                    g: c.g,
                    h,
                    distance_traveled: c.distance_traveled,
                    parent: Some(c.parent),
                });
                insert_open(&mut self.open, &self.nodes, id);
                self.open_index.insert(c.pos, id);
            }

            self.closed.insert(node.pos);

            if cancel.is_cancelled() {
                self.open.clear();
                self.open_index.clear();
                break SearchOutcome::Cancelled;
            }
        };

        Path::empty(outcome)
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Cells from the start to `goal`, following parent links.
    fn backtrace(&self, goal: NodeId) -> Vec<Point> {
        let mut cells = Vec::new();
        let mut next = Some(goal);
        while let Some(id) = next {
            let node = &self.nodes[id];
            cells.push(node.pos);
            next = node.parent;
        }
        cells.reverse();
        cells
    }

    /// Number of nodes created so far.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Obstruction results memoized during this search.
    pub(crate) fn cache(&self) -> &ObstructionCache {
        self.generator.oracle().cache()
    }

    pub(crate) fn into_cache(self) -> ObstructionCache {
        self.generator.into_oracle().into_cache()
    }
}

/// Insert `id` after every open node that costs no more than it.
fn insert_open(open: &mut VecDeque<NodeId>, nodes: &[SearchNode], id: NodeId) {
    let cost = nodes[id].cost();
    let at = open.partition_point(|&other| nodes[other].cost() <= cost);
    open.insert(at, id);
}
