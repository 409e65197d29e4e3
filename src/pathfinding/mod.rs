//! Breadth-first route search over grid edges plus gated obstacle edges

use crate::cell::Cell;
use crate::collision::CollisionStore;
use crate::config::WalkerConfig;
use crate::errors::{WalkerError, WalkerResult};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod obstacles;
pub mod route;
pub mod settings;
pub mod teleports;

pub use obstacles::*;
pub use route::*;
pub use settings::*;
pub use teleports::*;

/// Default wall-clock cap on one search
pub const DEFAULT_SEARCH_BUDGET: Duration = Duration::from_secs(10);

/// Everything the search and the walker read: collision data and the obstacle and
/// teleport registries. Built once, then only shared by reference.
#[derive(Debug, Clone)]
pub struct PlanningContext {
    collision: CollisionStore,
    obstacles: ObstacleRegistry,
    teleports: TeleportRegistry,
    search_budget: Duration,
}

/// Arena entry of the search tree; parents are arena indices
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    cell: Cell,
    parent: Option<usize>,
    /// Obstacle taken from the parent to reach this node
    via: Option<ObstacleId>,
}

impl PlanningContext {
    pub fn new(collision: CollisionStore, obstacles: ObstacleRegistry, teleports: TeleportRegistry) -> Self {
        Self {
            collision,
            obstacles,
            teleports,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }

    /// Grid-only context with no obstacles or teleports
    pub fn grid(collision: CollisionStore) -> Self {
        Self::new(collision, ObstacleRegistry::new(), TeleportRegistry::new())
    }

    /// Load collision data and merge the optional obstacle catalog over the builtin one
    pub fn from_config(config: &WalkerConfig) -> WalkerResult<Self> {
        let collision = CollisionStore::load(&config.collision_dir)?;

        let mut obstacles = ObstacleRegistry::builtin();
        if let Some(catalog) = &config.obstacle_catalog {
            obstacles.load_catalog(catalog)?;
        }

        info!(
            "Planning context ready: {} collision cells, {} obstacles",
            collision.len(),
            obstacles.len()
        );

        Ok(Self::new(collision, obstacles, TeleportRegistry::builtin())
            .with_search_budget(config.search.timeout.as_duration()))
    }

    pub fn with_search_budget(mut self, budget: Duration) -> Self {
        self.search_budget = budget;
        self
    }

    pub fn collision(&self) -> &CollisionStore {
        &self.collision
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    pub fn teleports(&self) -> &TeleportRegistry {
        &self.teleports
    }

    pub fn search_budget(&self) -> Duration {
        self.search_budget
    }

    /// Shortest-hop route using grid edges and every obstacle `settings` allows
    pub fn find_route(&self, start: Cell, destination: Cell, settings: &SettingsContext) -> WalkerResult<Route> {
        self.search(start, destination, Some(settings))
    }

    /// Plain 4-connected shortest path; obstacles are ignored entirely
    pub fn find_local_route(&self, start: Cell, destination: Cell) -> WalkerResult<Route> {
        self.search(start, destination, None)
    }

    fn search(&self, start: Cell, destination: Cell, settings: Option<&SettingsContext>) -> WalkerResult<Route> {
        if start == destination {
            return Ok(Route::single(start));
        }

        let started = Instant::now();
        let mut arena = vec![SearchNode {
            cell: start,
            parent: None,
            via: None,
        }];
        let mut visited = HashSet::from([start]);
        let mut frontier = VecDeque::from([0usize]);
        let mut edges: Vec<(Cell, Option<ObstacleId>)> = Vec::with_capacity(8);

        while let Some(index) = frontier.pop_front() {
            if started.elapsed() >= self.search_budget {
                return Err(WalkerError::SearchTimeout {
                    budget: self.search_budget,
                    explored: arena.len(),
                });
            }

            let cell = arena[index].cell;
            edges.clear();
            edges.extend(self.collision.neighbors(cell).map(|next| (next, None)));
            if let Some(settings) = settings {
                edges.extend(
                    self.obstacles
                        .obstacles_at(cell)
                        .filter(|(_, obstacle)| obstacle.can_traverse(settings))
                        .map(|(id, obstacle)| (obstacle.destination, Some(id))),
                );
            }

            for &(next, via) in &edges {
                if !visited.insert(next) {
                    continue;
                }
                arena.push(SearchNode {
                    cell: next,
                    parent: Some(index),
                    via,
                });

                if next == destination {
                    let route = reconstruct(&arena, arena.len() - 1)?;
                    debug!(
                        "Route {start} -> {destination}: {} steps, {} obstacles, {} cells explored in {:?}",
                        route.len(),
                        route.obstacle_count(),
                        arena.len(),
                        started.elapsed()
                    );
                    return Ok(route);
                }
                frontier.push_back(arena.len() - 1);
            }
        }

        debug!(
            "No route {start} -> {destination} after exploring {} cells",
            arena.len()
        );
        Err(WalkerError::NoRoute {
            start,
            destination,
            explored: arena.len(),
        })
    }
}

/// Walk parent indices back from `goal` and emit steps start-first.
/// A step becomes an obstacle step when the following node was reached through one.
fn reconstruct(arena: &[SearchNode], goal: usize) -> WalkerResult<Route> {
    let mut chain = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        chain.push(index);
        cursor = arena[index].parent;
    }
    chain.reverse();

    let steps = chain
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let cell = arena[index].cell;
            match chain.get(position + 1).and_then(|&next| arena[next].via) {
                Some(obstacle) => Step::Obstacle(cell, obstacle),
                None => Step::Cell(cell),
            }
        })
        .collect();
    Route::new(steps)
}
