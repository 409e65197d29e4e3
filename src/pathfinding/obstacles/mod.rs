//! Interactive graph edges: doors, ladders, shortcuts and the like

use crate::cell::Cell;
use crate::config::Timing;
use crate::pathfinding::settings::{SettingsContext, Skill};
use crate::walker::environment::{Environment, ObjectLayer, SceneObject, WidgetId};
use crate::walker::wait_until;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod registry;

pub use registry::*;

/// Dialog shown when crossing into the wilderness
pub const WILDERNESS_WARNING: WidgetId = WidgetId::new(475, 11);

const TRAPDOOR_VISIBILITY: f32 = 0.6;
const OBJECT_VISIBILITY: f32 = 0.5;

/// A conditional edge from `trigger` to `destination`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    /// The cell the edge leaves from; the registry is keyed by this
    pub trigger: Cell,
    pub destination: Cell,
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObstacleKind {
    Door {
        closed_position: Cell,
    },
    Gate {
        closed_position: Cell,
    },
    /// Gate followed by a warning dialog that has to be confirmed
    WildernessGate {
        closed_position: Cell,
    },
    Ladder {
        object: Cell,
        action: String,
    },
    /// Ground object that must be opened before it can be climbed down
    Trapdoor {
        object: Cell,
        closed_id: u32,
        open_id: u32,
    },
    GameObject {
        object: Cell,
        action: String,
    },
    GroundObject {
        object: Cell,
        action: String,
    },
    Shortcut {
        skill: Skill,
        level: u32,
        object: Cell,
        action: String,
        layer: ObjectLayer,
    },
    /// Menu-driven transport such as a mushtree
    Transport {
        object_name: String,
        menu: WidgetId,
        option: WidgetId,
    },
}

impl Obstacle {
    pub fn new(trigger: Cell, destination: Cell, kind: ObstacleKind) -> Self {
        Self {
            trigger,
            destination,
            kind,
        }
    }

    pub fn door(closed_position: Cell, trigger: Cell, destination: Cell) -> Self {
        Self::new(trigger, destination, ObstacleKind::Door { closed_position })
    }

    pub fn game_object(object: Cell, action: &str, destination: Cell) -> Self {
        Self::new(
            object,
            destination,
            ObstacleKind::GameObject {
                object,
                action: action.to_string(),
            },
        )
    }

    pub fn shortcut(skill: Skill, level: u32, object: Cell, action: &str, destination: Cell) -> Self {
        Self::new(
            object,
            destination,
            ObstacleKind::Shortcut {
                skill,
                level,
                object,
                action: action.to_string(),
                layer: ObjectLayer::Game,
            },
        )
    }

    /// Whether the search may use this edge for an agent with `settings`
    pub fn can_traverse(&self, settings: &SettingsContext) -> bool {
        match &self.kind {
            ObstacleKind::Shortcut { skill, level, .. } => {
                settings.use_shortcuts && settings.meets(*skill, *level)
            }
            ObstacleKind::Transport { .. } => settings.use_transportations,
            _ => true,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match &self.kind {
            ObstacleKind::Door { .. } => "door",
            ObstacleKind::Gate { .. } => "gate",
            ObstacleKind::WildernessGate { .. } => "wilderness gate",
            ObstacleKind::Ladder { .. } => "ladder",
            ObstacleKind::Trapdoor { .. } => "trapdoor",
            ObstacleKind::GameObject { .. } => "game object",
            ObstacleKind::GroundObject { .. } => "ground object",
            ObstacleKind::Shortcut { .. } => "shortcut",
            ObstacleKind::Transport { .. } => "transport",
        }
    }

    /// Perform the interaction and wait until it is confirmed.
    ///
    /// Returns `false` when the interaction could not be issued or its effect was not
    /// observed within the timeout. Never retries; the walker owns retry policy.
    pub fn handle<E: Environment + ?Sized>(&self, env: &mut E, timing: Timing) -> bool {
        debug!(
            "Handling {} at {} towards {}",
            self.label(),
            self.trigger,
            self.destination
        );

        match &self.kind {
            ObstacleKind::Door { closed_position } | ObstacleKind::Gate { closed_position } => {
                if env.find_object(ObjectLayer::Wall, *closed_position).is_none() {
                    return true;
                }
                if !env.interact(ObjectLayer::Wall, *closed_position, "Open") {
                    return false;
                }
                wait_until(timing.scaled(80), || {
                    env.find_object(ObjectLayer::Wall, *closed_position).is_none()
                })
            }
            ObstacleKind::WildernessGate { closed_position } => {
                if env.find_object(ObjectLayer::Wall, *closed_position).is_none() {
                    return true;
                }
                if !env.interact(ObjectLayer::Wall, *closed_position, "Open") {
                    return false;
                }
                let destination = self.destination;
                wait_until(timing.scaled(80), || {
                    env.agent_position() == Some(destination)
                        || (env.widget_visible(WILDERNESS_WARNING)
                            && env.click_widget(WILDERNESS_WARNING, "Enter Wilderness"))
                });
                self.wait_for_arrival(env, timing.scaled(120))
            }
            ObstacleKind::Ladder { object, action } => {
                let Some(ladder) = env.find_object(ObjectLayer::Game, *object) else {
                    return false;
                };
                if !env.interact(ladder.layer, ladder.cell, action) {
                    return false;
                }
                self.wait_for_arrival(env, timing)
            }
            ObstacleKind::Trapdoor {
                object,
                closed_id,
                open_id,
            } => {
                let Some(trapdoor) = env.find_object(ObjectLayer::Ground, *object) else {
                    return false;
                };

                if trapdoor.id == *closed_id {
                    bring_into_view(env, &trapdoor, TRAPDOOR_VISIBILITY);
                    if !env.interact(ObjectLayer::Ground, *object, "Open") {
                        return false;
                    }
                    let opened = wait_until(timing.scaled(80), || {
                        env.find_object(ObjectLayer::Ground, *object)
                            .is_some_and(|found| found.id == *open_id)
                    });
                    if !opened {
                        return false;
                    }
                }

                if let Some(trapdoor) = env.find_object(ObjectLayer::Ground, *object) {
                    bring_into_view(env, &trapdoor, TRAPDOOR_VISIBILITY);
                }
                if !env.interact(ObjectLayer::Ground, *object, "Climb-down") {
                    return false;
                }
                self.wait_for_arrival(env, timing)
            }
            ObstacleKind::GameObject { object, action } => {
                self.interact_and_approach(env, ObjectLayer::Game, *object, action, 1, timing)
            }
            ObstacleKind::GroundObject { object, action } => {
                self.interact_and_approach(env, ObjectLayer::Ground, *object, action, 1, timing)
            }
            ObstacleKind::Shortcut {
                object,
                action,
                layer,
                ..
            } => {
                // Agility animations take a while to play out
                self.interact_and_approach(env, *layer, *object, action, 2, timing.scaled(200))
            }
            ObstacleKind::Transport {
                object_name,
                menu,
                option,
            } => {
                let Some(transport) = env.find_object_named(object_name) else {
                    return false;
                };

                if !env.widget_visible(*menu) {
                    if !env.interact(transport.layer, transport.cell, "Use") {
                        return false;
                    }
                    if !wait_until(timing.scaled(90), || env.widget_visible(*menu)) {
                        return false;
                    }
                }

                if !env.click_widget(*option, "Continue") {
                    return false;
                }
                self.wait_for_arrival(env, timing.scaled(160))
            }
        }
    }

    fn wait_for_arrival<E: Environment + ?Sized>(&self, env: &mut E, timing: Timing) -> bool {
        let destination = self.destination;
        wait_until(timing, || env.agent_position() == Some(destination))
    }

    fn interact_and_approach<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        layer: ObjectLayer,
        object: Cell,
        action: &str,
        radius: i32,
        timing: Timing,
    ) -> bool {
        let Some(found) = env.find_object(layer, object) else {
            return false;
        };
        bring_into_view(env, &found, OBJECT_VISIBILITY);

        if !env.interact(layer, object, action) {
            return false;
        }

        let destination = self.destination;
        wait_until(timing, || {
            env.agent_position()
                .is_some_and(|position| position.is_within(destination, radius))
        })
    }
}

/// Turn the view toward an object that is mostly off screen. Failure is not fatal.
fn bring_into_view<E: Environment + ?Sized>(env: &mut E, object: &SceneObject, threshold: f32) {
    if object.visibility < threshold && !env.orient_toward(object.cell) {
        debug!("Could not orient toward {} at {}", object.name, object.cell);
    }
}
