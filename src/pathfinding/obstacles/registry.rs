use super::{Obstacle, ObstacleKind};
use crate::cell::Cell;
use crate::errors::{WalkerError, WalkerResult};
use crate::pathfinding::settings::Skill;
use crate::walker::environment::ObjectLayer;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Handle to an obstacle inside one [`ObstacleRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[display("#{_0}")]
pub struct ObstacleId(usize);

impl ObstacleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Multimap from trigger cell to the obstacles reachable from it
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    by_trigger: HashMap<Cell, Vec<ObstacleId>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Catalog {
    #[serde(default)]
    obstacle: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, obstacle: Obstacle) -> ObstacleId {
        let id = ObstacleId::from(self.obstacles.len());
        self.by_trigger.entry(obstacle.trigger).or_default().push(id);
        self.obstacles.push(obstacle);
        id
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id.0)
    }

    /// Every obstacle registered at `cell`, in insertion order
    pub fn obstacles_at(&self, cell: Cell) -> impl Iterator<Item = (ObstacleId, &Obstacle)> + '_ {
        self.by_trigger
            .get(&cell)
            .into_iter()
            .flatten()
            .map(|id| (*id, &self.obstacles[id.0]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> + '_ {
        self.obstacles
            .iter()
            .enumerate()
            .map(|(index, obstacle)| (ObstacleId(index), obstacle))
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Parse a TOML catalog made of `[[obstacle]]` tables and merge it in
    pub fn extend_from_str(&mut self, text: &str) -> WalkerResult<usize> {
        let catalog: Catalog =
            toml::from_str(text).map_err(|e| WalkerError::InvalidObstacleCatalog {
                reason: e.to_string(),
            })?;

        for obstacle in &catalog.obstacle {
            for cell in [obstacle.trigger, obstacle.destination] {
                if !(0..=3).contains(&cell.plane) {
                    return Err(WalkerError::InvalidObstacleCatalog {
                        reason: format!("{} obstacle has a cell on plane {}", obstacle.label(), cell.plane),
                    });
                }
            }
        }

        let count = catalog.obstacle.len();
        for obstacle in catalog.obstacle {
            self.insert(obstacle);
        }
        Ok(count)
    }

    pub fn load_catalog<P: AsRef<Path>>(&mut self, path: P) -> WalkerResult<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let count = self.extend_from_str(&text)?;
        info!("Loaded {count} obstacles from {}", path.display());
        Ok(count)
    }

    /// Serialize every obstacle as a catalog that [`Self::load_catalog`] accepts
    pub fn to_catalog_string(&self) -> WalkerResult<String> {
        let catalog = Catalog {
            obstacle: self.obstacles.clone(),
        };
        Ok(toml::to_string_pretty(&catalog)?)
    }

    /// The hand-curated catalog shipped with the walker
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        // Lumbridge general store door, entering then leaving
        let store_door = Cell::new(3215, 3245, 0);
        registry.insert(Obstacle::door(store_door, store_door, Cell::new(3214, 3245, 0)));
        registry.insert(Obstacle::door(store_door, Cell::new(3214, 3245, 0), store_door));

        // Lumbridge castle kitchen trapdoor and the basement ladder back up
        let hatch = Cell::new(3209, 3216, 0);
        registry.insert(Obstacle::new(
            hatch,
            Cell::new(3210, 9616, 0),
            ObstacleKind::Trapdoor {
                object: hatch,
                closed_id: 1579,
                open_id: 1581,
            },
        ));
        let basement_ladder = Cell::new(3209, 9616, 0);
        registry.insert(Obstacle::new(
            basement_ladder,
            Cell::new(3210, 3216, 0),
            ObstacleKind::Ladder {
                object: basement_ladder,
                action: "Climb-up".to_string(),
            },
        ));

        // Lumbridge castle south staircase
        registry.insert(Obstacle::game_object(
            Cell::new(3205, 3208, 0),
            "Climb-up",
            Cell::new(3205, 3209, 1),
        ));
        registry.insert(Obstacle::game_object(
            Cell::new(3205, 3208, 1),
            "Climb-up",
            Cell::new(3205, 3209, 2),
        ));
        registry.insert(Obstacle::new(
            Cell::new(3205, 3209, 1),
            Cell::new(3206, 3208, 0),
            ObstacleKind::GameObject {
                object: Cell::new(3205, 3208, 1),
                action: "Climb-down".to_string(),
            },
        ));
        registry.insert(Obstacle::game_object(
            Cell::new(3205, 3208, 2),
            "Climb-down",
            Cell::new(3206, 3208, 1),
        ));

        // Grand Exchange underwall tunnel to Edgeville and back
        registry.insert(Obstacle::shortcut(
            Skill::Agility,
            21,
            Cell::new(3141, 3513, 0),
            "Climb-into",
            Cell::new(3138, 3516, 0),
        ));
        registry.insert(Obstacle::new(
            Cell::new(3138, 3516, 0),
            Cell::new(3142, 3513, 0),
            ObstacleKind::Shortcut {
                skill: Skill::Agility,
                level: 21,
                object: Cell::new(3138, 3516, 0),
                action: "Climb-into".to_string(),
                layer: ObjectLayer::Game,
            },
        ));

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::settings::SettingsContext;

    #[test]
    fn test_multimap_keeps_every_obstacle_at_a_trigger() {
        let mut registry = ObstacleRegistry::new();
        let trigger = Cell::new(10, 10, 0);
        let a = registry.insert(Obstacle::game_object(trigger, "Climb-up", Cell::new(10, 11, 1)));
        let b = registry.insert(Obstacle::game_object(trigger, "Climb-down", Cell::new(10, 11, 0)));

        let ids: Vec<ObstacleId> = registry.obstacles_at(trigger).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(registry.obstacles_at(Cell::new(0, 0, 0)).count(), 0);
        assert_eq!(registry.get(b).map(|o| o.destination), Some(Cell::new(10, 11, 0)));
    }

    #[test]
    fn test_builtin_catalog_is_keyed_by_trigger() {
        let registry = ObstacleRegistry::builtin();
        assert_eq!(registry.len(), 10);

        let leaving: Vec<Cell> = registry
            .obstacles_at(Cell::new(3214, 3245, 0))
            .map(|(_, obstacle)| obstacle.destination)
            .collect();
        assert_eq!(leaving, vec![Cell::new(3215, 3245, 0)]);

        // Stairs down are triggered from the landing, not from the staircase object
        let down = registry
            .obstacles_at(Cell::new(3205, 3209, 1))
            .next()
            .map(|(_, obstacle)| obstacle.destination);
        assert_eq!(down, Some(Cell::new(3206, 3208, 0)));
    }

    #[test]
    fn test_builtin_tunnel_is_agility_gated() {
        let registry = ObstacleRegistry::builtin();
        let (_, tunnel) = registry
            .obstacles_at(Cell::new(3141, 3513, 0))
            .next()
            .unwrap();

        assert!(!tunnel.can_traverse(&SettingsContext::default()));
        assert!(tunnel.can_traverse(&SettingsContext::default().with_level(Skill::Agility, 99)));
    }

    #[test]
    fn test_catalog_round_trip() {
        let registry = ObstacleRegistry::builtin();
        let text = registry.to_catalog_string().unwrap();

        let mut loaded = ObstacleRegistry::new();
        assert_eq!(loaded.extend_from_str(&text).unwrap(), registry.len());
        for ((_, original), (_, copy)) in registry.iter().zip(loaded.iter()) {
            assert_eq!(original, copy);
        }
    }

    #[test]
    fn test_load_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obstacles.toml");
        std::fs::write(
            &path,
            r#"
            [[obstacle]]
            trigger = { x = 3268, y = 3227, plane = 0 }
            destination = { x = 3267, y = 3227, plane = 0 }
            kind = { type = "gate", closed_position = { x = 3268, y = 3227, plane = 0 } }
            "#,
        )
        .unwrap();

        let mut registry = ObstacleRegistry::builtin();
        assert_eq!(registry.load_catalog(&path).unwrap(), 1);
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.obstacles_at(Cell::new(3268, 3227, 0)).count(), 1);
    }

    #[test]
    fn test_bad_catalog_is_rejected() {
        let mut registry = ObstacleRegistry::new();
        let err = registry
            .extend_from_str("[[obstacle]]\ntrigger = 3")
            .unwrap_err();
        assert!(matches!(err, WalkerError::InvalidObstacleCatalog { .. }));

        let err = registry
            .extend_from_str(
                r#"
                [[obstacle]]
                trigger = { x = 1, y = 1, plane = 7 }
                destination = { x = 1, y = 2, plane = 0 }
                kind = { type = "door", closed_position = { x = 1, y = 1, plane = 0 } }
                "#,
            )
            .unwrap_err();
        assert!(matches!(err, WalkerError::InvalidObstacleCatalog { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_obstacle_id_display() {
        let mut registry = ObstacleRegistry::new();
        let id = registry.insert(Obstacle::game_object(Cell::new(0, 0, 0), "Climb-up", Cell::new(0, 1, 1)));
        assert_eq!(id.to_string(), "#0");
        assert_eq!(id.index(), 0);
        assert_eq!(id, ObstacleId::from(0));
        assert!(registry.get(ObstacleId::from(1)).is_none());
    }
}
