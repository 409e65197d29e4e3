//! Capability-gated, many-destination transitions.
//!
//! Teleports are not expanded by the route search. Routes built elsewhere may still
//! carry teleport steps, and the walker knows how to invoke them.

use crate::cell::Cell;
use crate::config::Timing;
use crate::pathfinding::settings::{Item, SettingsContext};
use crate::walker::environment::Environment;
use crate::walker::wait_until;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Landing cells are randomized around the nominal destination
const LANDING_RADIUS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[display("teleport #{_0}")]
pub struct TeleportId(usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportOption {
    pub option: String,
    pub destination: Cell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TeleportKind {
    Spell {
        spell: String,
        magic_level: u32,
        runes: Vec<Item>,
        destination: Cell,
    },
    /// Jewellery and tablets; one menu option per destination
    Item {
        item: String,
        options: Vec<TeleportOption>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleport {
    pub name: String,
    pub kind: TeleportKind,
}

impl Teleport {
    pub fn spell(name: &str, magic_level: u32, runes: &[(&str, u32)], destination: Cell) -> Self {
        Self {
            name: name.to_string(),
            kind: TeleportKind::Spell {
                spell: name.to_string(),
                magic_level,
                runes: runes
                    .iter()
                    .map(|(rune, quantity)| Item::new(*rune, *quantity))
                    .collect(),
                destination,
            },
        }
    }

    pub fn item(item: &str, options: &[(&str, Cell)]) -> Self {
        Self {
            name: item.to_string(),
            kind: TeleportKind::Item {
                item: item.to_string(),
                options: options
                    .iter()
                    .map(|(option, destination)| TeleportOption {
                        option: option.to_string(),
                        destination: *destination,
                    })
                    .collect(),
            },
        }
    }

    /// Destinations reachable with `settings`; empty when teleports are disabled or unaffordable
    pub fn destinations(&self, settings: &SettingsContext) -> Vec<Cell> {
        if !settings.use_teleports {
            return Vec::new();
        }

        match &self.kind {
            TeleportKind::Spell {
                magic_level,
                runes,
                destination,
                ..
            } => {
                let affordable = runes
                    .iter()
                    .all(|rune| settings.has_item(&rune.name, rune.quantity));
                if settings.magic >= *magic_level && affordable {
                    vec![*destination]
                } else {
                    Vec::new()
                }
            }
            TeleportKind::Item { item, options } => {
                if settings.has_item(item, 1) {
                    options.iter().map(|option| option.destination).collect()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Trigger the teleport toward `destination` and wait for the landing
    pub fn handle<E: Environment + ?Sized>(&self, env: &mut E, destination: Cell, timing: Timing) -> bool {
        let activated = match &self.kind {
            TeleportKind::Spell {
                spell,
                destination: target,
                ..
            } => {
                if *target != destination {
                    warn!("{} cannot reach {destination}", self.name);
                    return false;
                }
                env.activate_teleport(spell, "Cast")
            }
            TeleportKind::Item { item, options } => {
                let Some(option) = options.iter().find(|option| option.destination == destination) else {
                    warn!("{} has no option for {destination}", self.name);
                    return false;
                };
                env.activate_teleport(item, &option.option)
            }
        };

        if !activated {
            debug!("Could not activate {}", self.name);
            return false;
        }

        // Teleport animations are slow
        wait_until(timing.scaled(200), || {
            env.agent_position()
                .is_some_and(|position| position.is_within(destination, LANDING_RADIUS))
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeleportRegistry {
    teleports: Vec<Teleport>,
}

impl TeleportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, teleport: Teleport) -> TeleportId {
        self.teleports.push(teleport);
        TeleportId::from(self.teleports.len() - 1)
    }

    pub fn get(&self, id: TeleportId) -> Option<&Teleport> {
        self.teleports.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.teleports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teleports.is_empty()
    }

    /// Every (teleport, destination) pair usable with `settings`
    pub fn available(&self, settings: &SettingsContext) -> Vec<(TeleportId, Cell)> {
        self.teleports
            .iter()
            .enumerate()
            .flat_map(|(index, teleport)| {
                teleport
                    .destinations(settings)
                    .into_iter()
                    .map(move |destination| (TeleportId(index), destination))
            })
            .collect()
    }

    /// Standard spellbook city teleports and the amulet of glory
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(Teleport::spell(
            "Varrock Teleport",
            25,
            &[("Law rune", 1), ("Air rune", 3), ("Fire rune", 1)],
            Cell::new(3212, 3424, 0),
        ));
        registry.insert(Teleport::spell(
            "Lumbridge Teleport",
            31,
            &[("Law rune", 1), ("Air rune", 3), ("Earth rune", 1)],
            Cell::new(3222, 3218, 0),
        ));
        registry.insert(Teleport::spell(
            "Falador Teleport",
            37,
            &[("Law rune", 1), ("Air rune", 3), ("Water rune", 1)],
            Cell::new(2964, 3378, 0),
        ));
        registry.insert(Teleport::item(
            "Amulet of glory",
            &[
                ("Edgeville", Cell::new(3087, 3496, 0)),
                ("Karamja", Cell::new(2918, 3176, 0)),
                ("Draynor Village", Cell::new(3105, 3251, 0)),
                ("Al Kharid", Cell::new(3293, 3163, 0)),
            ],
        ));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::settings::Skill;
    use crate::walker::simulated::SimulatedWorld;
    use std::time::Duration;

    fn varrock_runes(settings: SettingsContext) -> SettingsContext {
        settings
            .with_item("Law rune", 1)
            .with_item("Air rune", 3)
            .with_item("Fire rune", 1)
    }

    #[test]
    fn test_spell_needs_level_and_runes() {
        let registry = TeleportRegistry::builtin();
        let varrock = Cell::new(3212, 3424, 0);

        let novice = varrock_runes(SettingsContext::default());
        assert!(!registry.available(&novice).iter().any(|(_, c)| *c == varrock));

        let no_runes = SettingsContext::default().with_level(Skill::Magic, 40);
        assert!(!registry.available(&no_runes).iter().any(|(_, c)| *c == varrock));

        let able = varrock_runes(SettingsContext::default().with_level(Skill::Magic, 25));
        assert!(registry.available(&able).iter().any(|(_, c)| *c == varrock));
    }

    #[test]
    fn test_disabled_teleports_yield_nothing() {
        let settings = SettingsContext {
            use_teleports: false,
            ..SettingsContext::default().with_item("Amulet of glory", 1)
        };
        assert!(TeleportRegistry::builtin().available(&settings).is_empty());
    }

    #[test]
    fn test_item_teleport_lists_every_option() {
        let glory = Teleport::item(
            "Amulet of glory",
            &[
                ("Edgeville", Cell::new(3087, 3496, 0)),
                ("Karamja", Cell::new(2918, 3176, 0)),
            ],
        );
        let settings = SettingsContext::default().with_item("Amulet of glory", 1);
        assert_eq!(
            glory.destinations(&settings),
            vec![Cell::new(3087, 3496, 0), Cell::new(2918, 3176, 0)]
        );
        assert!(glory.destinations(&SettingsContext::default()).is_empty());
    }

    #[test]
    fn test_handle_waits_for_landing() {
        let edgeville = Cell::new(3087, 3496, 0);
        let glory = Teleport::item("Amulet of glory", &[("Edgeville", edgeville)]);

        let mut world = SimulatedWorld::open(Cell::new(3222, 3218, 0));
        world.add_teleport("Amulet of glory", "Edgeville", Cell::new(3088, 3497, 0));

        let timing = Timing::new(Duration::from_millis(1), Duration::from_millis(20));
        assert!(glory.handle(&mut world, edgeville, timing));
        assert!(!glory.handle(&mut world, Cell::new(0, 0, 0), timing));
    }
}
