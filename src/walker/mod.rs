//! Route execution against an unreliable, short-range movement primitive

use crate::cell::Cell;
use crate::config::{Timing, WalkerTuning};
use crate::errors::{WalkerError, WalkerResult};
use crate::landmarks::Landmark;
use crate::pathfinding::{PlanningContext, Route, SettingsContext, Step};
use std::fmt;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

pub mod environment;
pub mod simulated;

pub use environment::*;

/// Poll `condition` until it holds or `timing.timeout` elapses.
///
/// The condition is checked once before any sleep, so an already-true condition returns
/// immediately.
pub fn wait_until<F: FnMut() -> bool>(timing: Timing, mut condition: F) -> bool {
    let deadline = Instant::now() + timing.timeout;
    loop {
        if condition() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(timing.poll.min(deadline - now));
    }
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Arrived,
    /// The cancellation predicate fired; counts as success
    Cancelled,
    Disconnected,
    /// The agent could not be matched to any step of the route
    Diverged { position: Cell },
    Exhausted { attempts: u32 },
}

impl WalkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WalkOutcome::Arrived | WalkOutcome::Cancelled)
    }

    pub fn into_result(self) -> WalkerResult<()> {
        match self {
            WalkOutcome::Arrived | WalkOutcome::Cancelled => Ok(()),
            WalkOutcome::Disconnected => Err(WalkerError::AgentDisconnected),
            WalkOutcome::Diverged { position } => Err(WalkerError::RouteDiverged { position }),
            WalkOutcome::Exhausted { attempts } => Err(WalkerError::ExecutionExhausted { attempts }),
        }
    }
}

impl fmt::Display for WalkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkOutcome::Arrived => write!(f, "arrived"),
            WalkOutcome::Cancelled => write!(f, "cancelled"),
            WalkOutcome::Disconnected => write!(f, "disconnected"),
            WalkOutcome::Diverged { position } => write!(f, "diverged at {position}"),
            WalkOutcome::Exhausted { attempts } => write!(f, "exhausted after {attempts} attempts"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Check,
    Locate(Cell),
    Transition {
        position: Cell,
        index: usize,
    },
    Hop {
        position: Cell,
        located: usize,
    },
    Move {
        position: Cell,
        target: Cell,
    },
    Miss(Miss),
}

/// Transient failures; each one spends an attempt
#[derive(Debug, Clone, Copy)]
enum Miss {
    NoPosition,
    NoHop,
    TransitionFailed(usize),
    MoveRejected(Cell),
    MoveStalled(Cell),
    ArrivalTimedOut(Cell),
}

/// Per-walk cursors into the route
#[derive(Debug, Default)]
struct Cursor {
    /// Furthest step index the agent has been matched to
    best: Option<usize>,
    /// Next obstacle or teleport step still to be handled
    pending: Option<usize>,
    attempts: u32,
}

pub struct Walker<'a> {
    context: &'a PlanningContext,
    tuning: WalkerTuning,
}

impl<'a> Walker<'a> {
    pub fn new(context: &'a PlanningContext, tuning: WalkerTuning) -> Self {
        Self { context, tuning }
    }

    pub fn tuning(&self) -> &WalkerTuning {
        &self.tuning
    }

    /// Drive the agent along `route` until it is within `distance` of the last step.
    ///
    /// `cancel` is checked once per iteration; returning `true` ends the walk successfully.
    pub fn walk<E, C>(&self, env: &mut E, route: &Route, distance: i32, mut cancel: C) -> WalkOutcome
    where
        E: Environment + ?Sized,
        C: FnMut() -> bool,
    {
        let destination = route.destination();
        let budget = self.tuning.attempt_budget.get();
        let mut cursor = Cursor {
            pending: route.next_transition(0),
            ..Cursor::default()
        };
        let mut phase = Phase::Check;

        loop {
            debug!("Walker phase {phase:?}");
            phase = match phase {
                Phase::Check => {
                    if !env.agent_logged_in() {
                        info!("Agent logged out, abandoning walk to {destination}");
                        return WalkOutcome::Disconnected;
                    }
                    if cancel() {
                        return WalkOutcome::Cancelled;
                    }
                    match env.agent_position() {
                        None => Phase::Miss(Miss::NoPosition),
                        Some(position) if position.is_within(destination, distance) => {
                            return WalkOutcome::Arrived;
                        }
                        Some(position) => Phase::Locate(position),
                    }
                }
                Phase::Locate(position) => {
                    let Some(located) = route.closest_to(position, self.tuning.locate_radius.get())
                    else {
                        warn!("Agent at {position} is off the route to {destination}");
                        return WalkOutcome::Diverged { position };
                    };

                    if cursor.best.is_none_or(|best| located > best) {
                        cursor.best = Some(located);
                        cursor.attempts = 0;
                    }

                    // Transitions the agent is already past were taken some other way
                    while let Some(index) = cursor.pending {
                        if located <= index {
                            break;
                        }
                        debug!("Step {index} already behind the agent");
                        cursor.pending = route.next_transition(index + 1);
                    }

                    match cursor.pending {
                        Some(index) if self.transition_due(route, index, position, located) => {
                            Phase::Transition { position, index }
                        }
                        _ => Phase::Hop { position, located },
                    }
                }
                Phase::Transition { position, index } => {
                    if self.take_transition(env, route, index) {
                        debug!("Handled step {index} from {position}");
                        cursor.pending = route.next_transition(index + 1);
                        cursor.attempts = 0;
                        Phase::Check
                    } else {
                        Phase::Miss(Miss::TransitionFailed(index))
                    }
                }
                Phase::Hop { position, located } => {
                    let end = cursor.pending.unwrap_or(route.len());
                    let hop = route.furthest_within_where(
                        located,
                        end,
                        position,
                        self.tuning.lookahead.get(),
                        |cell| env.local_path_exists(cell),
                    );
                    match hop.map(|index| route.steps()[index].cell()) {
                        Some(target) if target != position => Phase::Move { position, target },
                        _ => Phase::Miss(Miss::NoHop),
                    }
                }
                Phase::Move { position, target } => self.step_toward(env, position, target, distance),
                Phase::Miss(miss) => {
                    cursor.attempts += 1;
                    warn!("Walker miss {miss:?} ({}/{budget})", cursor.attempts);
                    if cursor.attempts > budget {
                        return WalkOutcome::Exhausted {
                            attempts: cursor.attempts,
                        };
                    }
                    thread::sleep(self.tuning.miss_backoff.as_duration());
                    Phase::Check
                }
            };
        }
    }

    /// Plan from the live position and walk, replanning after a diverged or exhausted walk
    pub fn travel<E, C>(
        &self,
        env: &mut E,
        destination: Cell,
        settings: &SettingsContext,
        distance: i32,
        mut cancel: C,
    ) -> WalkerResult<WalkOutcome>
    where
        E: Environment + ?Sized,
        C: FnMut() -> bool,
    {
        let max_replans = self.tuning.max_replans.get();
        let mut replans = 0;

        loop {
            if !env.agent_logged_in() {
                return Ok(WalkOutcome::Disconnected);
            }

            let mut start = None;
            let settle = Timing::new(
                self.tuning.poll_interval.as_duration(),
                self.tuning.move_start_timeout.as_duration(),
            );
            wait_until(settle, || {
                start = env.agent_position();
                start.is_some()
            });

            let outcome = match start {
                Some(start) if start.is_within(destination, distance) => return Ok(WalkOutcome::Arrived),
                Some(start) => {
                    let route = self.context.find_route(start, destination, settings)?;
                    info!(
                        "Walking {start} -> {destination}: {} steps, {} obstacles",
                        route.len(),
                        route.obstacle_count()
                    );
                    self.walk(env, &route, distance, &mut cancel)
                }
                // Nothing to plan from; spend a replan and look again
                None => WalkOutcome::Exhausted { attempts: 0 },
            };

            match outcome {
                WalkOutcome::Diverged { .. } | WalkOutcome::Exhausted { .. } if replans < max_replans => {
                    replans += 1;
                    info!("Walk {outcome}, replanning ({replans}/{max_replans})");
                }
                _ => return Ok(outcome),
            }
        }
    }

    /// Travel to a landmark unless the agent is already inside its area
    pub fn travel_to_landmark<E, C>(
        &self,
        env: &mut E,
        landmark: &Landmark,
        settings: &SettingsContext,
        distance: i32,
        cancel: C,
    ) -> WalkerResult<WalkOutcome>
    where
        E: Environment + ?Sized,
        C: FnMut() -> bool,
    {
        if env
            .agent_position()
            .is_some_and(|position| landmark.area.contains(position))
        {
            return Ok(WalkOutcome::Arrived);
        }
        self.travel(env, landmark.location, settings, distance, cancel)
    }

    fn transition_due(&self, route: &Route, index: usize, position: Cell, located: usize) -> bool {
        match route.get(index) {
            Some(Step::Obstacle(trigger, _)) => {
                position.is_within(*trigger, self.tuning.interaction_range.get())
            }
            Some(Step::Teleport(..)) => located + 1 >= index,
            _ => false,
        }
    }

    fn take_transition<E: Environment + ?Sized>(&self, env: &mut E, route: &Route, index: usize) -> bool {
        let timing = self.tuning.timing();
        match route.get(index) {
            Some(Step::Obstacle(_, id)) => match self.context.obstacles().get(*id) {
                Some(obstacle) => obstacle.handle(env, timing),
                None => {
                    warn!("Route refers to unknown obstacle {id}");
                    false
                }
            },
            Some(Step::Teleport(_, id)) => {
                let landing = route.get(index + 1).map(Step::cell);
                match (self.context.teleports().get(*id), landing) {
                    (Some(teleport), Some(landing)) => teleport.handle(env, landing, timing),
                    _ => {
                        warn!("Route refers to unusable {id}");
                        false
                    }
                }
            }
            _ => false,
        }
    }

    fn step_toward<E: Environment + ?Sized>(&self, env: &mut E, position: Cell, target: Cell, distance: i32) -> Phase {
        if !env.is_on_screen(target) && !env.orient_toward(target) {
            debug!("Could not orient toward {target}");
        }
        if !env.move_toward(target) {
            return Phase::Miss(Miss::MoveRejected(target));
        }

        let poll = self.tuning.poll_interval.as_duration();
        let started = wait_until(Timing::new(poll, self.tuning.move_start_timeout.as_duration()), || {
            env.is_moving() || env.agent_position().is_some_and(|now| now != position)
        });
        if !started {
            return Phase::Miss(Miss::MoveStalled(target));
        }

        let arrived = wait_until(Timing::new(poll, self.tuning.arrival_timeout.as_duration()), || {
            match env.movement_destination() {
                None => true,
                Some(heading) => env
                    .agent_position()
                    .is_some_and(|now| now.is_within(heading, distance)),
            }
        });
        if !arrived {
            return Phase::Miss(Miss::ArrivalTimedOut(target));
        }
        Phase::Check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Area;
    use crate::collision::{CollisionFlags, CollisionStore};
    use crate::config::range_types::{PollInterval, WaitTimeout};
    use crate::pathfinding::{Obstacle, ObstacleRegistry, Teleport, TeleportRegistry};
    use simulated::{Interaction, ObjectEffect, SimulatedWorld};
    use std::time::Duration;

    fn fast_tuning() -> WalkerTuning {
        WalkerTuning {
            poll_interval: PollInterval::new(1),
            move_start_timeout: WaitTimeout::new(10),
            arrival_timeout: WaitTimeout::new(10),
            interaction_timeout: WaitTimeout::new(10),
            miss_backoff: WaitTimeout::new(1),
            ..WalkerTuning::default()
        }
    }

    fn walled_room(width: i32, height: i32) -> CollisionStore {
        let mut store = CollisionStore::new();
        for x in -1..=width {
            store.set(Cell::new(x, -1, 0), CollisionFlags::BLOCKED);
            store.set(Cell::new(x, height, 0), CollisionFlags::BLOCKED);
        }
        for y in -1..=height {
            store.set(Cell::new(-1, y, 0), CollisionFlags::BLOCKED);
            store.set(Cell::new(width, y, 0), CollisionFlags::BLOCKED);
        }
        store
    }

    fn open_room_context() -> PlanningContext {
        PlanningContext::grid(walled_room(5, 5))
    }

    /// 5x5 room split by a wall at y = 2 whose only opening is a closed door
    fn door_setup() -> (PlanningContext, SimulatedWorld) {
        let door = Cell::new(2, 2, 0);
        let mut collision = walled_room(5, 5);
        for x in [0, 1, 3, 4] {
            collision.set(Cell::new(x, 2, 0), CollisionFlags::BLOCKED);
        }
        collision.set(door, CollisionFlags::WALLED);

        let mut obstacles = ObstacleRegistry::new();
        obstacles.insert(Obstacle::door(door, door, Cell::new(2, 3, 0)));

        let mut world = SimulatedWorld::new(collision.clone(), Cell::new(2, 0, 0));
        world.add_object(ObjectLayer::Wall, door, 1530, "Door");
        world.add_effect(ObjectLayer::Wall, door, "Open", ObjectEffect::OpenPassage);

        (
            PlanningContext::new(collision, obstacles, TeleportRegistry::new()),
            world,
        )
    }

    #[test]
    fn test_wait_until_checks_before_sleeping() {
        let timing = Timing::new(Duration::from_secs(5), Duration::from_secs(5));
        let started = Instant::now();
        assert!(wait_until(timing, || true));
        assert!(started.elapsed() < Duration::from_secs(1));

        let mut polls = 0;
        let timing = Timing::new(Duration::from_millis(1), Duration::from_millis(10));
        assert!(!wait_until(timing, || {
            polls += 1;
            false
        }));
        assert!(polls >= 2);
    }

    #[test]
    fn test_open_room_walk_arrives() {
        let context = open_room_context();
        let route = context
            .find_route(Cell::new(0, 0, 0), Cell::new(4, 4, 0), &SettingsContext::default())
            .unwrap();
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Arrived);
        assert_eq!(world.agent_position(), Some(Cell::new(4, 4, 0)));
        assert_eq!(world.move_count(), 1);
    }

    #[test]
    fn test_door_is_handled_exactly_once() {
        let (context, mut world) = door_setup();
        let route = context
            .find_route(Cell::new(2, 0, 0), Cell::new(2, 4, 0), &SettingsContext::default())
            .unwrap();
        assert_eq!(route.next_obstacle(0), Some(2));

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Arrived);
        assert_eq!(world.agent_position(), Some(Cell::new(2, 4, 0)));
        assert_eq!(
            world.interactions(),
            &[Interaction::Object {
                layer: ObjectLayer::Wall,
                cell: Cell::new(2, 2, 0),
                action: "Open".to_string(),
            }]
        );
    }

    #[test]
    fn test_door_is_retried_after_a_dead_click() {
        let (context, mut world) = door_setup();
        world.set_dead_clicks(1);
        let route = context
            .find_route(Cell::new(2, 0, 0), Cell::new(2, 4, 0), &SettingsContext::default())
            .unwrap();

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Arrived);
        assert_eq!(world.interaction_count(), 2);
        assert_eq!(world.agent_position(), Some(Cell::new(2, 4, 0)));
    }

    #[test]
    fn test_door_that_never_opens_exhausts_the_budget() {
        let (context, mut world) = door_setup();
        world.set_dead_clicks(u32::MAX);
        let route = context
            .find_route(Cell::new(2, 0, 0), Cell::new(2, 4, 0), &SettingsContext::default())
            .unwrap();

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Exhausted { attempts: 6 });
        assert_eq!(world.interaction_count(), 6);
        assert!(world.find_object(ObjectLayer::Wall, Cell::new(2, 2, 0)).is_some());
    }

    #[test]
    fn test_move_that_never_arrives_exhausts_the_budget() {
        let context = open_room_context();
        let route = context
            .find_route(Cell::new(0, 0, 0), Cell::new(4, 4, 0), &SettingsContext::default())
            .unwrap();
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));
        world.set_stalled(true);

        let started = Instant::now();
        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Exhausted { attempts: 6 });
        assert_eq!(world.move_count(), 6);
        assert_eq!(world.agent_position(), Some(Cell::new(0, 0, 0)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_flaky_movement_still_arrives() {
        let context = open_room_context();
        let destination = Cell::new(4, 4, 0);
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));
        world.set_flaky(0.3, 11);

        let outcome = Walker::new(&context, fast_tuning())
            .travel(&mut world, destination, &SettingsContext::default(), 0, || false)
            .unwrap();

        assert_eq!(outcome, WalkOutcome::Arrived);
        assert_eq!(world.agent_position(), Some(destination));
        assert!(world.move_count() >= 1);
    }

    #[test]
    fn test_logged_out_agent_fails_without_acting() {
        let context = open_room_context();
        let route = Route::from_cells([Cell::new(0, 0, 0), Cell::new(1, 0, 0)]).unwrap();
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));
        world.set_logged_in(false);

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Disconnected);
        assert!(!outcome.is_success());
        assert_eq!(world.primitive_calls(), 0);
    }

    #[test]
    fn test_unreachable_hops_exhaust_the_budget() {
        let context = open_room_context();
        let route = context
            .find_route(Cell::new(0, 0, 0), Cell::new(4, 4, 0), &SettingsContext::default())
            .unwrap();
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));
        world.set_probe(Some(false));

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Exhausted { attempts: 6 });
        assert_eq!(world.move_count(), 0);
        assert!(matches!(
            outcome.into_result(),
            Err(WalkerError::ExecutionExhausted { attempts: 6 })
        ));
    }

    #[test]
    fn test_cancel_ends_walk_successfully() {
        let context = open_room_context();
        let route = Route::from_cells([Cell::new(0, 0, 0), Cell::new(1, 0, 0)]).unwrap();
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || true);

        assert_eq!(outcome, WalkOutcome::Cancelled);
        assert!(outcome.into_result().is_ok());
        assert_eq!(world.move_count(), 0);
    }

    #[test]
    fn test_agent_far_from_route_diverges() {
        let context = open_room_context();
        let route = Route::from_cells([Cell::new(0, 0, 0), Cell::new(1, 0, 0)]).unwrap();
        let mut world = SimulatedWorld::open(Cell::new(40, 40, 0));

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(
            outcome,
            WalkOutcome::Diverged {
                position: Cell::new(40, 40, 0)
            }
        );
    }

    #[test]
    fn test_missing_position_is_transient() {
        let context = open_room_context();
        let route = context
            .find_route(Cell::new(0, 0, 0), Cell::new(3, 0, 0), &SettingsContext::default())
            .unwrap();
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));
        world.hide_position(3);

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);
        assert_eq!(outcome, WalkOutcome::Arrived);
    }

    #[test]
    fn test_long_route_is_walked_in_hops() {
        let collision = CollisionStore::new();
        let context = PlanningContext::grid(collision.clone());
        let route = context
            .find_route(Cell::new(0, 0, 0), Cell::new(40, 0, 0), &SettingsContext::default())
            .unwrap();
        let mut world = SimulatedWorld::new(collision, Cell::new(0, 0, 0));

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 2, || false);

        assert_eq!(outcome, WalkOutcome::Arrived);
        // Lookahead is 13, so each hop covers at most 12 tiles
        assert!(world.move_count() >= 4);
    }

    #[test]
    fn test_teleport_step_is_invoked() {
        let varrock = Cell::new(3212, 3424, 0);
        let mut teleports = TeleportRegistry::new();
        let id = teleports.insert(Teleport::spell("Varrock Teleport", 25, &[], varrock));
        let context = PlanningContext::new(CollisionStore::new(), ObstacleRegistry::new(), teleports);

        let route = Route::new(vec![
            Step::Teleport(Cell::new(0, 0, 0), id),
            Step::Cell(varrock),
            Step::Cell(Cell::new(3213, 3424, 0)),
            Step::Cell(Cell::new(3214, 3424, 0)),
        ])
        .unwrap();
        let mut world = SimulatedWorld::open(Cell::new(0, 0, 0));
        world.add_teleport("Varrock Teleport", "Cast", varrock);

        let outcome = Walker::new(&context, fast_tuning()).walk(&mut world, &route, 0, || false);

        assert_eq!(outcome, WalkOutcome::Arrived);
        assert_eq!(world.agent_position(), Some(Cell::new(3214, 3424, 0)));
    }

    #[test]
    fn test_travel_plans_and_walks() {
        let (context, mut world) = door_setup();
        let outcome = Walker::new(&context, fast_tuning())
            .travel(&mut world, Cell::new(2, 4, 0), &SettingsContext::default(), 0, || false)
            .unwrap();

        assert_eq!(outcome, WalkOutcome::Arrived);
        assert_eq!(world.interaction_count(), 1);
    }

    #[test]
    fn test_travel_replans_then_gives_up() {
        let context = open_room_context();
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(0, 0, 0));
        world.set_probe(Some(false));

        let mut checks = 0;
        let outcome = Walker::new(&context, fast_tuning())
            .travel(&mut world, Cell::new(4, 4, 0), &SettingsContext::default(), 0, || {
                checks += 1;
                false
            })
            .unwrap();

        assert_eq!(outcome, WalkOutcome::Exhausted { attempts: 6 });
        // Three walks (the first plus two replans) of six checks each
        assert_eq!(checks, 18);
    }

    #[test]
    fn test_travel_surfaces_planning_errors() {
        let mut collision = walled_room(5, 5);
        for cell in [(3, 4), (4, 3), (3, 2), (2, 3)] {
            collision.set(Cell::from((cell.0, cell.1, 0)), CollisionFlags::BLOCKED);
        }
        let context = PlanningContext::grid(collision.clone());
        let mut world = SimulatedWorld::new(collision, Cell::new(0, 0, 0));

        let err = Walker::new(&context, fast_tuning())
            .travel(&mut world, Cell::new(3, 3, 0), &SettingsContext::default(), 0, || false)
            .unwrap_err();
        assert!(matches!(err, WalkerError::NoRoute { .. }));
    }

    #[test]
    fn test_travel_to_landmark_inside_area_is_immediate() {
        let context = open_room_context();
        let landmark = Landmark::new(
            "Test bank",
            Cell::new(2, 2, 0),
            Area::new(Cell::new(0, 0, 0), Cell::new(4, 4, 0)),
        );
        let mut world = SimulatedWorld::new(walled_room(5, 5), Cell::new(1, 1, 0));

        let outcome = Walker::new(&context, fast_tuning())
            .travel_to_landmark(&mut world, &landmark, &SettingsContext::default(), 2, || false)
            .unwrap();

        assert_eq!(outcome, WalkOutcome::Arrived);
        assert_eq!(world.primitive_calls(), 0);
    }

    #[test]
    fn test_outcome_results() {
        assert!(WalkOutcome::Arrived.into_result().is_ok());
        assert!(matches!(
            WalkOutcome::Disconnected.into_result(),
            Err(WalkerError::AgentDisconnected)
        ));
        assert_eq!(
            WalkOutcome::Exhausted { attempts: 6 }.to_string(),
            "exhausted after 6 attempts"
        );
    }
}
