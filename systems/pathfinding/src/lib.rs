#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first pathfinding over the hex map.
//!
//! A [`Pathfinder`] holds the distance and predecessor field computed by the
//! most recent [`Pathfinder::pathfind_from`] call. Nothing survives between
//! runs except that last snapshot, so callers rerun the search whenever the
//! acting mob changes.

use std::collections::VecDeque;

use hexmage_core::{HexCoord, Matrix, MobId, UNREACHABLE};
use hexmage_world::{Map, MobManager};
use log::{debug, warn};

/// Iteration count past which a search is considered stuck.
pub const MAX_ITERATIONS: usize = 10_000;

/// Queue length past which a search is considered stuck.
pub const MAX_QUEUE_LEN: usize = 1_000;

/// Visitation marker used while a search runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VertexState {
    /// Queued for expansion.
    Open,
    /// Expanded; the distance is final.
    Closed,
    /// Not seen by the current search.
    #[default]
    Unvisited,
}

/// Search result for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathCell {
    distance: u32,
    source: Option<HexCoord>,
    reachable: bool,
    state: VertexState,
}

impl PathCell {
    /// Steps from the search origin, or [`UNREACHABLE`].
    #[must_use]
    pub const fn distance(&self) -> u32 {
        self.distance
    }

    /// Predecessor on a shortest path. Absent for the origin and for cells
    /// the search never reached.
    #[must_use]
    pub const fn source(&self) -> Option<HexCoord> {
        self.source
    }

    /// Reports whether the search reached the cell.
    #[must_use]
    pub const fn reachable(&self) -> bool {
        self.reachable
    }

    /// Visitation marker left behind by the search.
    #[must_use]
    pub const fn state(&self) -> VertexState {
        self.state
    }
}

impl Default for PathCell {
    fn default() -> Self {
        Self {
            distance: UNREACHABLE,
            source: None,
            reachable: false,
            state: VertexState::Unvisited,
        }
    }
}

/// Bookkeeping gathered during the most recent search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathfindStats {
    /// Number of cells popped from the queue.
    pub iterations: usize,
    /// Longest the queue grew.
    pub max_queue_len: usize,
    /// Set when the search crossed [`MAX_ITERATIONS`] or [`MAX_QUEUE_LEN`].
    pub guard_tripped: bool,
}

/// Distance and predecessor field for a square map.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    size: usize,
    paths: Matrix<PathCell>,
    queue: VecDeque<HexCoord>,
    origin: Option<HexCoord>,
    stats: PathfindStats,
}

impl Pathfinder {
    /// Creates a pathfinder for a `size` x `size` map with every cell
    /// unreached.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            paths: Matrix::new(size, size),
            queue: VecDeque::new(),
            origin: None,
            stats: PathfindStats::default(),
        }
    }

    /// Edge length of the field.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Origin of the most recent search.
    #[must_use]
    pub const fn origin(&self) -> Option<HexCoord> {
        self.origin
    }

    /// Bookkeeping from the most recent search.
    #[must_use]
    pub const fn stats(&self) -> PathfindStats {
        self.stats
    }

    /// The full field computed by the most recent search.
    #[must_use]
    pub fn paths(&self) -> &Matrix<PathCell> {
        &self.paths
    }

    /// Search result for `coord`, or `None` off the map.
    #[must_use]
    pub fn cell(&self, coord: HexCoord) -> Option<&PathCell> {
        self.paths.get(coord)
    }

    /// Recomputes the field from `start`.
    ///
    /// Walls are never entered. Mobs do not block the search, so every mob
    /// cell gets a distance for range checks; refusing to enter an occupied
    /// cell is left to [`Pathfinder::move_as_far_as_possible`].
    pub fn pathfind_from(&mut self, start: HexCoord, map: &Map, mob_manager: &MobManager) {
        if self.size != map.size() {
            self.size = map.size();
            self.paths = Matrix::new(self.size, self.size);
        }

        self.paths.fill(PathCell::default());
        self.queue.clear();
        self.origin = Some(start);
        self.stats = PathfindStats::default();

        let Some(origin) = self.paths.get_mut(start) else {
            debug!(
                "pathfinding origin ({}, {}) lies off the map",
                start.q(),
                start.r()
            );
            return;
        };
        origin.distance = 0;
        origin.reachable = true;
        origin.state = VertexState::Open;
        self.queue.push_back(start);

        while let Some(current) = self.queue.pop_front() {
            self.stats.iterations += 1;
            self.stats.max_queue_len = self.stats.max_queue_len.max(self.queue.len());
            if !self.stats.guard_tripped
                && (self.stats.iterations > MAX_ITERATIONS || self.queue.len() > MAX_QUEUE_LEN)
            {
                self.stats.guard_tripped = true;
                warn!(
                    "pathfinding from ({}, {}) stuck at {} iterations with queue size {}",
                    start.q(),
                    start.r(),
                    self.stats.iterations,
                    self.queue.len()
                );
            }

            let cell = &mut self.paths[current];
            if cell.state == VertexState::Closed {
                continue;
            }
            cell.state = VertexState::Closed;
            let next_distance = cell.distance.saturating_add(1);

            for neighbour in current.neighbors() {
                if !map.is_passable(neighbour) {
                    continue;
                }
                let Some(next) = self.paths.get_mut(neighbour) else {
                    continue;
                };
                if next.state == VertexState::Closed || next.distance <= next_distance {
                    continue;
                }

                next.distance = next_distance;
                next.source = Some(current);
                next.reachable = true;
                next.state = VertexState::Open;
                self.queue.push_back(neighbour);
            }
        }

        let mobs_in_reach = mob_manager
            .mobs()
            .iter()
            .filter(|mob| mob.is_alive() && self.reachable(mob.coord()))
            .count();
        debug!(
            "pathfinding from ({}, {}) finished after {} iterations with {} mobs in reach",
            start.q(),
            start.r(),
            self.stats.iterations,
            mobs_in_reach
        );
    }

    /// Distance from the last origin to `coord`, or [`UNREACHABLE`].
    #[must_use]
    pub fn distance(&self, coord: HexCoord) -> u32 {
        self.paths
            .get(coord)
            .map_or(UNREACHABLE, |cell| cell.distance)
    }

    /// Reports whether the last search reached `coord`.
    #[must_use]
    pub fn reachable(&self, coord: HexCoord) -> bool {
        self.paths.get(coord).is_some_and(|cell| cell.reachable)
    }

    /// Shortest path from the last origin to `target`, listed target first
    /// and origin last.
    ///
    /// Returns an empty path when `target` is unreachable or the predecessor
    /// chain is broken.
    #[must_use]
    pub fn path_to(&self, target: HexCoord) -> Vec<HexCoord> {
        let Some(mut cell) = self.paths.get(target) else {
            return Vec::new();
        };
        if !cell.reachable {
            return Vec::new();
        }

        let mut path = vec![target];
        while cell.distance > 0 {
            let Some(source) = cell.source else {
                return Vec::new();
            };
            path.push(source);
            cell = &self.paths[source];
        }
        path
    }

    /// Reachable cells no further than `budget` steps from the origin, in
    /// row-major order.
    #[must_use]
    pub fn reachable_within(&self, budget: u32) -> Vec<HexCoord> {
        self.paths
            .iter_coords()
            .filter(|(_, cell)| cell.reachable && cell.distance <= budget)
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Walks `mob` along `path` while it has action points.
    ///
    /// `path` is shaped like the result of [`Pathfinder::path_to`]: target
    /// first, the mob's current cell last. Each step costs one action point
    /// through [`MobManager::move_mob`]. Walking stops early when the next
    /// cell is not adjacent or is held by another living mob. Returns the
    /// cells entered, in order.
    pub fn move_as_far_as_possible(
        &self,
        mob_manager: &mut MobManager,
        mob: MobId,
        path: &[HexCoord],
    ) -> Vec<HexCoord> {
        let mut entered = Vec::new();
        let mut remaining = path.len();
        if path.last() == Some(&mob_manager.mob(mob).coord()) {
            remaining -= 1;
        }

        while remaining > 0 && mob_manager.mob(mob).ap() > 0 {
            let next = path[remaining - 1];
            let current = mob_manager.mob(mob).coord();
            if current.direction_to(next).is_none() {
                break;
            }
            let blocked = mob_manager
                .living_mob_at(next)
                .is_some_and(|other| other != mob);
            if blocked {
                break;
            }
            if !mob_manager.move_mob(mob, next) {
                break;
            }

            entered.push(next);
            remaining -= 1;
        }

        entered
    }
}
