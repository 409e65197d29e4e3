use crate::cell::Cell;
use crate::errors::{WalkerError, WalkerResult};
use crate::pathfinding::obstacles::ObstacleId;
use crate::pathfinding::teleports::TeleportId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Reached by plain grid movement
    Cell(Cell),
    /// The trigger cell of an obstacle; the next step is its destination
    Obstacle(Cell, ObstacleId),
    /// Cast or rub from this cell; the next step is the landing
    Teleport(Cell, TeleportId),
}

impl Step {
    pub fn cell(&self) -> Cell {
        match *self {
            Step::Cell(cell) | Step::Obstacle(cell, _) | Step::Teleport(cell, _) => cell,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, Step::Cell(_))
    }

    pub fn is_transition(&self) -> bool {
        !self.is_plain()
    }

    pub fn obstacle(&self) -> Option<ObstacleId> {
        match self {
            Step::Obstacle(_, id) => Some(*id),
            _ => None,
        }
    }

    pub fn teleport(&self) -> Option<TeleportId> {
        match self {
            Step::Teleport(_, id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Cell(cell) => write!(f, "{cell}"),
            Step::Obstacle(cell, id) => write!(f, "{cell} via obstacle {id}"),
            Step::Teleport(cell, id) => write!(f, "{cell} via {id}"),
        }
    }
}

/// Ordered, never empty sequence of steps from start to destination.
///
/// Read-only once built; the walker keeps its own cursors into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    steps: Vec<Step>,
}

impl Route {
    pub fn new(steps: Vec<Step>) -> WalkerResult<Self> {
        if steps.is_empty() {
            return Err(WalkerError::InvalidArgument {
                reason: "a route needs at least one step".to_string(),
            });
        }
        Ok(Self { steps })
    }

    /// Route made only of plain cells
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> WalkerResult<Self> {
        Self::new(cells.into_iter().map(Step::Cell).collect())
    }

    pub fn single(cell: Cell) -> Self {
        Self {
            steps: vec![Step::Cell(cell)],
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn start(&self) -> Cell {
        self.steps[0].cell()
    }

    pub fn destination(&self) -> Cell {
        self.steps[self.steps.len() - 1].cell()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.steps.iter().map(Step::cell)
    }

    pub fn obstacle_count(&self) -> usize {
        self.steps.iter().filter(|step| step.obstacle().is_some()).count()
    }

    /// Index of the step nearest to `cell` within `max_radius` (inclusive).
    /// Only steps on the same plane count; ties go to the earliest step.
    pub fn closest_to(&self, cell: Cell, max_radius: i32) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (index, step) in self.steps.iter().enumerate() {
            let Some(distance) = step.cell().planar_distance(cell) else {
                continue;
            };
            if distance > max_radius {
                continue;
            }
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Furthest plain step in `[from, to)` whose distance to `reference` is strictly below
    /// `max_radius`
    pub fn furthest_within(&self, from: usize, to: usize, reference: Cell, max_radius: i32) -> Option<usize> {
        self.furthest_within_where(from, to, reference, max_radius, |_| true)
    }

    /// Like [`Self::furthest_within`], also requiring `accept` to hold.
    ///
    /// Candidates are tried from the far end backwards and `accept` is only called on
    /// in-range steps, so an expensive probe runs as rarely as possible.
    pub fn furthest_within_where<F>(
        &self,
        from: usize,
        to: usize,
        reference: Cell,
        max_radius: i32,
        mut accept: F,
    ) -> Option<usize>
    where
        F: FnMut(Cell) -> bool,
    {
        let to = to.min(self.steps.len());
        if from >= to {
            return None;
        }

        (from..to).rev().find(|&index| {
            let step = &self.steps[index];
            step.is_plain()
                && step
                    .cell()
                    .planar_distance(reference)
                    .is_some_and(|distance| distance < max_radius)
                && accept(step.cell())
        })
    }

    /// First obstacle step at or after `from`
    pub fn next_obstacle(&self, from: usize) -> Option<usize> {
        self.next_matching(from, |step| step.obstacle().is_some())
    }

    /// First obstacle or teleport step at or after `from`
    pub fn next_transition(&self, from: usize) -> Option<usize> {
        self.next_matching(from, Step::is_transition)
    }

    fn next_matching(&self, from: usize, predicate: impl Fn(&Step) -> bool) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, step)| predicate(step))
            .map(|(index, _)| index)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "{index:>4}  {step}")?;
        }
        Ok(())
    }
}
