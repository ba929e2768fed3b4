use std::collections::HashSet;

use cellwalk_core::{Footprint, Point, Range};

use crate::astar::{NodeId, SearchNode};
use crate::metric::Metric;
use crate::obstruction::ObstructionOracle;
use crate::stats::SearchStats;
use crate::terrain::TerrainMap;

/// A neighbour reached from the node being expanded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) pos: Point,
    pub(crate) g: f64,
    pub(crate) distance_traveled: f64,
    pub(crate) parent: NodeId,
}

/// Produces the admissible outgoing edges of a node.
///
/// With `restrict` unset this is pure distance pathing: no obstruction
/// tests and every cell costs one.
pub(crate) struct NeighborGenerator<'a> {
    metric: Metric,
    footprint: &'a Footprint,
    terrain: &'a TerrainMap,
    oracle: ObstructionOracle<'a>,
    bounds: Option<Range>,
    restrict: bool,
    buf: Vec<Candidate>,
}

impl<'a> NeighborGenerator<'a> {
    pub(crate) fn new(
        metric: Metric,
        footprint: &'a Footprint,
        terrain: &'a TerrainMap,
        oracle: ObstructionOracle<'a>,
        bounds: Option<Range>,
        restrict: bool,
    ) -> Self {
        Self {
            metric,
            footprint,
            terrain,
            oracle,
            bounds,
            restrict,
            buf: Vec::with_capacity(8),
        }
    }

    /// Neighbours of `node` (stored under `id`) that are not closed.
    ///
    /// A cell of the token that geometry blocks from a candidate is added
    /// to `closed` so the search never expands through it again.
    pub(crate) fn neighbors(
        &mut self,
        id: NodeId,
        node: &SearchNode,
        closed: &mut HashSet<Point>,
        stats: &mut SearchStats,
    ) -> &[Candidate] {
        self.buf.clear();
        let footprint = self.footprint;

        'steps: for &step in self.metric.step_directions() {
            let Some(pos) = node.pos.checked_add(step) else {
                continue;
            };
            if closed.contains(&pos) {
                continue;
            }
            if self.bounds.is_some_and(|b| !b.contains(pos)) {
                continue;
            }

            let mut multiplier = 1.0;
            if self.restrict {
                for cell in footprint.occupied_cells(node.pos) {
                    if self.oracle.blocks_movement(cell, pos, stats) {
                        closed.insert(cell);
                        stats.blocked += 1;
                        continue 'steps;
                    }
                }
                multiplier = self.terrain.multiplier(pos);
            }

            let edge = self.metric.edge_cost(step.is_diagonal()).scaled(multiplier);
            self.buf.push(Candidate {
                pos,
                g: node.g + edge.real,
                distance_traveled: node.distance_traveled + edge.game,
                parent: id,
            });
        }

        stats.generated += self.buf.len() as u64;
        &self.buf
    }

    pub(crate) fn oracle(&self) -> &ObstructionOracle<'a> {
        &self.oracle
    }

    pub(crate) fn into_oracle(self) -> ObstructionOracle<'a> {
        self.oracle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MovementMetric;
    use crate::terrain::TerrainModifier;
    use crate::topology::Topology;
    use cellwalk_core::SquareGrid;
    use geo::coord;

    fn origin() -> SearchNode {
        SearchNode {
            pos: Point::new(0, 0),
            g: 0.0,
            h: 0.0,
            distance_traveled: 0.0,
            parent: None,
        }
    }

    #[test]
    fn unrestricted_octile_costs() {
        let grid = SquareGrid::new(50);
        let footprint = Footprint::single();
        let terrain = TerrainMap::default();
        let mut generator = NeighborGenerator::new(
            Metric::new(MovementMetric::OneTwoOne),
            &footprint,
            &terrain,
            ObstructionOracle::new(&grid, None),
            None,
            false,
        );
        let mut closed = HashSet::new();
        let mut stats = SearchStats::default();
        let out = generator.neighbors(0, &origin(), &mut closed, &mut stats).to_vec();
        assert_eq!(out.len(), 8);
        assert_eq!(out[0].pos, Point::new(0, -1));
        assert_eq!(out[0].g, 1.0);
        assert_eq!(out[4].pos, Point::new(1, -1));
        assert_eq!(out[4].g, 1.414);
        assert_eq!(out[4].distance_traveled, 1.5);
        assert!(out.iter().all(|c| c.parent == 0));
    }

    #[test]
    fn steps_off_the_coordinate_space_are_skipped() {
        let grid = SquareGrid::new(50);
        let footprint = Footprint::single();
        let terrain = TerrainMap::default();
        let mut generator = NeighborGenerator::new(
            Metric::new(MovementMetric::OneOneOne),
            &footprint,
            &terrain,
            ObstructionOracle::new(&grid, None),
            None,
            true,
        );
        let corner = SearchNode {
            pos: Point::new(i32::MAX, i32::MIN),
            ..origin()
        };
        let mut closed = HashSet::new();
        let mut stats = SearchStats::default();
        let cells: Vec<Point> = generator
            .neighbors(0, &corner, &mut closed, &mut stats)
            .iter()
            .map(|c| c.pos)
            .collect();
        assert_eq!(
            cells,
            vec![
                Point::new(i32::MAX, i32::MIN + 1),
                Point::new(i32::MAX - 1, i32::MIN),
                Point::new(i32::MAX - 1, i32::MIN + 1),
            ]
        );
    }

    #[test]
    fn closed_and_out_of_bounds_cells_are_skipped() {
        let grid = SquareGrid::new(50);
        let footprint = Footprint::single();
        let terrain = TerrainMap::default();
        let mut generator = NeighborGenerator::new(
            Metric::new(MovementMetric::NoDiagonals),
            &footprint,
            &terrain,
            ObstructionOracle::new(&grid, None),
            Some(Range::new(0, 0, 5, 5)),
            true,
        );
        let mut closed = HashSet::from([Point::new(1, 0)]);
        let mut stats = SearchStats::default();
        let out = generator.neighbors(0, &origin(), &mut closed, &mut stats);
        let cells: Vec<Point> = out.iter().map(|c| c.pos).collect();
        assert_eq!(cells, vec![Point::new(0, 1)]);
    }

    #[test]
    fn terrain_applies_only_when_restricted() {
        let grid = SquareGrid::new(50);
        let footprint = Footprint::single();
        let swamp = TerrainModifier::new([Point::new(1, 0)], 3.0).unwrap();
        let terrain = TerrainMap::new([&swamp]);
        let metric = Metric::new(MovementMetric::NoDiagonals);
        let mut closed = HashSet::new();
        let mut stats = SearchStats::default();

        let mut restricted = NeighborGenerator::new(
            metric,
            &footprint,
            &terrain,
            ObstructionOracle::new(&grid, None),
            None,
            true,
        );
        let east = restricted.neighbors(0, &origin(), &mut closed, &mut stats)[1];
        assert_eq!(east.pos, Point::new(1, 0));
        assert_eq!(east.g, 3.0);
        assert_eq!(east.distance_traveled, 3.0);

        let mut free = NeighborGenerator::new(
            metric,
            &footprint,
            &terrain,
            ObstructionOracle::new(&grid, None),
            None,
            false,
        );
        let east = free.neighbors(0, &origin(), &mut closed, &mut stats)[1];
        assert_eq!(east.g, 1.0);
    }

    #[test]
    fn blocked_candidate_is_dropped_and_origin_closed() {
        let grid = SquareGrid::new(50);
        let mut topo = Topology::new();
        topo.add_wall(coord! { x: 50.0, y: -50.0 }, coord! { x: 50.0, y: 50.0 })
            .unwrap();
        let footprint = Footprint::single();
        let terrain = TerrainMap::default();
        let mut generator = NeighborGenerator::new(
            Metric::new(MovementMetric::NoDiagonals),
            &footprint,
            &terrain,
            ObstructionOracle::new(&grid, Some(&topo)),
            None,
            true,
        );
        let mut closed = HashSet::new();
        let mut stats = SearchStats::default();
        let out = generator.neighbors(0, &origin(), &mut closed, &mut stats);
        assert!(out.iter().all(|c| c.pos != Point::new(1, 0)));
        assert_eq!(out.len(), 3);
        assert!(closed.contains(&Point::new(0, 0)));
        assert_eq!(stats.blocked, 1);
        assert!(generator.oracle().cache().results() > 0);
    }

    #[test]
    fn every_token_cell_is_checked() {
        // A 2x2 token anchored at the origin. The wall sits inside its
        // south-east cell, so only that cell's steps are cut.
        let grid = SquareGrid::new(50);
        let mut topo = Topology::new();
        topo.add_wall(coord! { x: 60.0, y: 60.0 }, coord! { x: 100.0, y: 60.0 })
            .unwrap();
        let footprint = Footprint::square(2);
        let terrain = TerrainMap::default();
        let mut generator = NeighborGenerator::new(
            Metric::new(MovementMetric::NoDiagonals),
            &footprint,
            &terrain,
            ObstructionOracle::new(&grid, Some(&topo)),
            None,
            true,
        );
        let mut closed = HashSet::new();
        let mut stats = SearchStats::default();
        let cells: Vec<Point> = generator
            .neighbors(0, &origin(), &mut closed, &mut stats)
            .iter()
            .map(|c| c.pos)
            .collect();
        assert_eq!(cells, vec![Point::new(0, 1), Point::new(-1, 0)]);
        assert_eq!(stats.blocked, 2);
        assert!(closed.contains(&Point::new(1, 1)));
    }
}
