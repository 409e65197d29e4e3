//! The world as seen by the walker: live queries and best-effort actions

use crate::cell::Cell;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Which kind of scene object a lookup or interaction targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectLayer {
    /// Doors, gates and other objects on a cell edge
    Wall,
    /// Ladders, stairs, trees and other solid objects
    Game,
    /// Trapdoors and other flat objects
    Ground,
}

/// Interface widget address: a group plus a child within the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{group}:{child}")]
pub struct WidgetId {
    pub group: u32,
    pub child: u32,
}

impl WidgetId {
    pub const fn new(group: u32, child: u32) -> Self {
        Self { group, child }
    }
}

/// An object currently present in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: u32,
    pub name: String,
    pub cell: Cell,
    pub layer: ObjectLayer,
    /// Fraction of the object that is on screen, 0.0 to 1.0
    pub visibility: f32,
}

/// Primitives the walker drives the agent through.
///
/// Every call is best-effort. Actions return `false` when the request could not be issued;
/// confirmation that something actually happened is done by polling the query methods.
pub trait Environment {
    /// Live agent position; `None` when it cannot be read right now
    fn agent_position(&self) -> Option<Cell>;

    fn agent_logged_in(&self) -> bool;

    /// Short-range reachability probe for a lookahead target
    fn local_path_exists(&self, target: Cell) -> bool;

    fn move_toward(&mut self, target: Cell) -> bool;

    fn is_moving(&self) -> bool;

    /// Where the agent is currently headed, if it is moving
    fn movement_destination(&self) -> Option<Cell>;

    fn orient_toward(&mut self, target: Cell) -> bool;

    fn is_on_screen(&self, target: Cell) -> bool;

    fn find_object(&self, layer: ObjectLayer, cell: Cell) -> Option<SceneObject>;

    /// Nearest object with the given name on any layer
    fn find_object_named(&self, name: &str) -> Option<SceneObject>;

    fn interact(&mut self, layer: ObjectLayer, cell: Cell, action: &str) -> bool;

    fn widget_visible(&self, widget: WidgetId) -> bool;

    fn click_widget(&mut self, widget: WidgetId, action: &str) -> bool;

    /// Cast a spell or rub an item; `option` selects among several destinations
    fn activate_teleport(&mut self, teleport: &str, option: &str) -> bool;
}
