use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Skills that gate obstacles and teleports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Agility,
    Magic,
    Ranged,
    Strength,
}

/// An inventory entry the planner may rely on (runes, teleport jewellery)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Snapshot of the agent's traversal-relevant capabilities for one planning call.
///
/// Only ever read during search; build a new one when the agent's state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsContext {
    pub use_shortcuts: bool,
    pub use_teleports: bool,
    pub use_transportations: bool,
    pub agility: u32,
    pub magic: u32,
    pub ranged: u32,
    pub strength: u32,
    pub items: Vec<Item>,
}

impl Default for SettingsContext {
    fn default() -> Self {
        Self {
            use_shortcuts: true,
            use_teleports: true,
            use_transportations: true,
            agility: 1,
            magic: 1,
            ranged: 1,
            strength: 1,
            items: Vec::new(),
        }
    }
}

impl SettingsContext {
    pub fn level(&self, skill: Skill) -> u32 {
        match skill {
            Skill::Agility => self.agility,
            Skill::Magic => self.magic,
            Skill::Ranged => self.ranged,
            Skill::Strength => self.strength,
        }
    }

    pub fn meets(&self, skill: Skill, level: u32) -> bool {
        self.level(skill) >= level
    }

    /// Total quantity of `name` across all item entries
    pub fn quantity_of(&self, name: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.name.eq_ignore_ascii_case(name))
            .map(|item| item.quantity)
            .sum()
    }

    pub fn has_item(&self, name: &str, quantity: u32) -> bool {
        self.quantity_of(name) >= quantity
    }

    pub fn with_level(mut self, skill: Skill, level: u32) -> Self {
        match skill {
            Skill::Agility => self.agility = level,
            Skill::Magic => self.magic = level,
            Skill::Ranged => self.ranged = level,
            Skill::Strength => self.strength = level,
        }
        self
    }

    pub fn with_item(mut self, name: impl Into<String>, quantity: u32) -> Self {
        self.items.push(Item::new(name, quantity));
        self
    }

    /// No shortcuts, teleports or transports: plain walking only
    pub fn walking_only() -> Self {
        Self {
            use_shortcuts: false,
            use_teleports: false,
            use_transportations: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_and_requirements() {
        let settings = SettingsContext::default()
            .with_level(Skill::Agility, 21)
            .with_level(Skill::Magic, 25);

        assert_eq!(settings.level(Skill::Agility), 21);
        assert!(settings.meets(Skill::Agility, 21));
        assert!(!settings.meets(Skill::Agility, 22));
        assert!(settings.meets(Skill::Magic, 25));
        assert!(!settings.meets(Skill::Strength, 2));
    }

    #[test]
    fn test_item_quantities_accumulate() {
        let settings = SettingsContext::default()
            .with_item("Law rune", 1)
            .with_item("law rune", 2)
            .with_item("Air rune", 3);

        assert_eq!(settings.quantity_of("Law rune"), 3);
        assert!(settings.has_item("Air rune", 3));
        assert!(!settings.has_item("Fire rune", 1));
    }

    #[test]
    fn test_walking_only_disables_every_feature() {
        let settings = SettingsContext::walking_only();
        assert!(!settings.use_shortcuts);
        assert!(!settings.use_teleports);
        assert!(!settings.use_transportations);
    }

    #[test]
    fn test_partial_settings_deserialize_with_defaults() {
        let settings: SettingsContext = toml::from_str("agility = 40\nuse_teleports = false").unwrap();
        assert_eq!(settings.agility, 40);
        assert!(!settings.use_teleports);
        assert!(settings.use_shortcuts);
        assert_eq!(settings.magic, 1);
    }
}
