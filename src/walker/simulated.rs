//! In-memory world for exercising the walker without a live client

use super::environment::{Environment, ObjectLayer, SceneObject, WidgetId};
use crate::cell::Cell;
use crate::collision::{CollisionFlags, CollisionStore};
use ::pathfinding::prelude::bfs;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// How far the local reachability probe is willing to look
const PROBE_RANGE: i32 = 20;
/// Cells this close to the agent count as on screen
const VIEW_RADIUS: i32 = 7;

/// What an interaction does to the world
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEffect {
    RemoveObject,
    /// Remove the object and clear the collision flags of its cell
    OpenPassage,
    Relocate(Cell),
    ChangeId(u32),
    ShowWidget(WidgetId),
}

/// One recorded interaction, for assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Object {
        layer: ObjectLayer,
        cell: Cell,
        action: String,
    },
    Widget {
        widget: WidgetId,
        action: String,
    },
    Teleport {
        name: String,
        option: String,
    },
}

/// Deterministic world where moves land instantly when a local path exists.
///
/// Movement can be made unreliable with [`SimulatedWorld::set_flaky`]: a failed move is
/// accepted but leaves the agent where it was.
#[derive(Debug, Clone)]
pub struct SimulatedWorld {
    collision: CollisionStore,
    position: Option<Cell>,
    logged_in: bool,
    objects: HashMap<(ObjectLayer, Cell), SceneObject>,
    effects: HashMap<(ObjectLayer, Cell, String), ObjectEffect>,
    widget_effects: HashMap<WidgetId, ObjectEffect>,
    visible_widgets: HashSet<WidgetId>,
    teleports: HashMap<(String, String), Cell>,
    probe_override: Option<bool>,
    hidden_reads: std::cell::Cell<u32>,
    flaky: f64,
    rng: Pcg64,
    dead_clicks: u32,
    stalled: bool,
    heading: Option<Cell>,
    moves: usize,
    orientations: usize,
    interactions: Vec<Interaction>,
}

impl SimulatedWorld {
    pub fn new(collision: CollisionStore, start: Cell) -> Self {
        Self {
            collision,
            position: Some(start),
            logged_in: true,
            objects: HashMap::new(),
            effects: HashMap::new(),
            widget_effects: HashMap::new(),
            visible_widgets: HashSet::new(),
            teleports: HashMap::new(),
            probe_override: None,
            hidden_reads: std::cell::Cell::new(0),
            flaky: 0.0,
            rng: Pcg64::seed_from_u64(0),
            dead_clicks: 0,
            stalled: false,
            heading: None,
            moves: 0,
            orientations: 0,
            interactions: Vec::new(),
        }
    }

    /// World with no collision data at all
    pub fn open(start: Cell) -> Self {
        Self::new(CollisionStore::new(), start)
    }

    pub fn add_object(&mut self, layer: ObjectLayer, cell: Cell, id: u32, name: &str) {
        self.objects.insert(
            (layer, cell),
            SceneObject {
                id,
                name: name.to_string(),
                cell,
                layer,
                visibility: 1.0,
            },
        );
    }

    pub fn add_effect(&mut self, layer: ObjectLayer, cell: Cell, action: &str, effect: ObjectEffect) {
        self.effects.insert((layer, cell, action.to_string()), effect);
    }

    pub fn add_widget_effect(&mut self, widget: WidgetId, effect: ObjectEffect) {
        self.widget_effects.insert(widget, effect);
    }

    pub fn add_teleport(&mut self, name: &str, option: &str, landing: Cell) {
        self.teleports
            .insert((name.to_string(), option.to_string()), landing);
    }

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.logged_in = logged_in;
    }

    pub fn set_position(&mut self, position: Cell) {
        self.position = Some(position);
    }

    /// Force every reachability probe to answer `answer`, or `None` to compute it
    pub fn set_probe(&mut self, answer: Option<bool>) {
        self.probe_override = answer;
    }

    /// The next `reads` position queries report nothing
    pub fn hide_position(&mut self, reads: u32) {
        self.hidden_reads.set(reads);
    }

    /// Each move silently fails with `probability`, drawn from a seeded generator
    pub fn set_flaky(&mut self, probability: f64, seed: u64) {
        self.flaky = probability.clamp(0.0, 1.0);
        self.rng = Pcg64::seed_from_u64(seed);
    }

    /// The next `clicks` object interactions are accepted but change nothing
    pub fn set_dead_clicks(&mut self, clicks: u32) {
        self.dead_clicks = clicks;
    }

    /// Accepted moves leave the agent walking in place forever
    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
        if !stalled {
            self.heading = None;
        }
    }

    pub fn move_count(&self) -> usize {
        self.moves
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Every movement, camera, object and teleport action issued so far
    pub fn primitive_calls(&self) -> usize {
        self.moves + self.orientations + self.interactions.len()
    }

    fn reachable(&self, from: Cell, target: Cell) -> bool {
        if !from.is_within(target, PROBE_RANGE) {
            return false;
        }
        bfs(
            &from,
            |cell| {
                self.collision
                    .neighbors(*cell)
                    .filter(|next| next.is_within(from, PROBE_RANGE))
                    .collect::<Vec<_>>()
            },
            |cell| *cell == target,
        )
        .is_some()
    }

    fn apply(&mut self, target: Option<(ObjectLayer, Cell)>, effect: ObjectEffect) {
        trace!("Simulated effect {effect:?} on {target:?}");
        match effect {
            ObjectEffect::RemoveObject => {
                if let Some(key) = target {
                    self.objects.remove(&key);
                }
            }
            ObjectEffect::OpenPassage => {
                if let Some(key) = target {
                    self.objects.remove(&key);
                    self.collision.set(key.1, CollisionFlags::OPEN);
                }
            }
            ObjectEffect::Relocate(cell) => self.position = Some(cell),
            ObjectEffect::ChangeId(id) => {
                if let Some(object) = target.and_then(|key| self.objects.get_mut(&key)) {
                    object.id = id;
                }
            }
            ObjectEffect::ShowWidget(widget) => {
                self.visible_widgets.insert(widget);
            }
        }
    }
}

impl Environment for SimulatedWorld {
    fn agent_position(&self) -> Option<Cell> {
        let hidden = self.hidden_reads.get();
        if hidden > 0 {
            self.hidden_reads.set(hidden - 1);
            return None;
        }
        self.position
    }

    fn agent_logged_in(&self) -> bool {
        self.logged_in
    }

    fn local_path_exists(&self, target: Cell) -> bool {
        if let Some(answer) = self.probe_override {
            return answer;
        }
        self.position
            .is_some_and(|position| self.reachable(position, target))
    }

    fn move_toward(&mut self, target: Cell) -> bool {
        self.moves += 1;
        let Some(position) = self.position else {
            return false;
        };
        if !self.reachable(position, target) {
            return false;
        }
        if self.stalled {
            self.heading = Some(target);
            return true;
        }
        if self.flaky > 0.0 && self.rng.gen_bool(self.flaky) {
            trace!("Simulated move to {target} stalled");
            return true;
        }
        self.position = Some(target);
        true
    }

    fn is_moving(&self) -> bool {
        self.heading.is_some()
    }

    fn movement_destination(&self) -> Option<Cell> {
        self.heading
    }

    fn orient_toward(&mut self, _target: Cell) -> bool {
        self.orientations += 1;
        true
    }

    fn is_on_screen(&self, target: Cell) -> bool {
        self.position
            .is_some_and(|position| position.is_within(target, VIEW_RADIUS))
    }

    fn find_object(&self, layer: ObjectLayer, cell: Cell) -> Option<SceneObject> {
        self.objects.get(&(layer, cell)).cloned()
    }

    fn find_object_named(&self, name: &str) -> Option<SceneObject> {
        let position = self.position?;
        self.objects
            .values()
            .filter(|object| object.name == name)
            .min_by_key(|object| (object.cell.distance(position), object.cell))
            .cloned()
    }

    fn interact(&mut self, layer: ObjectLayer, cell: Cell, action: &str) -> bool {
        if !self.objects.contains_key(&(layer, cell)) {
            return false;
        }
        self.interactions.push(Interaction::Object {
            layer,
            cell,
            action: action.to_string(),
        });
        if self.dead_clicks > 0 {
            self.dead_clicks -= 1;
            return true;
        }
        if let Some(effect) = self.effects.get(&(layer, cell, action.to_string())).cloned() {
            self.apply(Some((layer, cell)), effect);
        }
        true
    }

    fn widget_visible(&self, widget: WidgetId) -> bool {
        self.visible_widgets.contains(&widget)
    }

    fn click_widget(&mut self, widget: WidgetId, action: &str) -> bool {
        let effect = self.widget_effects.get(&widget).cloned();
        if !self.visible_widgets.remove(&widget) && effect.is_none() {
            return false;
        }
        self.interactions.push(Interaction::Widget {
            widget,
            action: action.to_string(),
        });
        if let Some(effect) = effect {
            self.apply(None, effect);
        }
        true
    }

    fn activate_teleport(&mut self, teleport: &str, option: &str) -> bool {
        let Some(landing) = self
            .teleports
            .get(&(teleport.to_string(), option.to_string()))
            .copied()
        else {
            return false;
        };
        self.interactions.push(Interaction::Teleport {
            name: teleport.to_string(),
            option: option.to_string(),
        });
        self.position = Some(landing);
        true
    }
}
