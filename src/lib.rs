pub mod cell;
pub mod collision;
pub mod config;
pub mod errors;
pub mod landmarks;
pub mod pathfinding;
pub mod walker;

// Selective re-exports for external consumers

pub use cell::{Area, Cell, Direction};
pub use collision::{CollisionFlags, CollisionRecord, CollisionStore};
pub use config::{WalkerConfig, WalkerTuning};
pub use errors::{WalkerError, WalkerResult};
pub use landmarks::{Landmark, LandmarkRegistry};

// Planning: context, routes and the capability snapshot that gates them
pub use pathfinding::{PlanningContext, Route, SettingsContext, Step};

// Execution
pub use walker::{Environment, WalkOutcome, Walker};
