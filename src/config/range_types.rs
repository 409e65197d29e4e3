use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Declares a numeric newtype whose constructor (and deserializer) clamps into `[MIN, MAX]`.
macro_rules! clamped_value {
    ($(#[$meta:meta])* $name:ident($inner:ty) in $min:literal ..= $max:literal, default $default:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
        pub struct $name($inner);

        impl $name {
            pub const MIN: $inner = $min;
            pub const MAX: $inner = $max;

            pub fn new(value: $inner) -> Self {
                Self(value.clamp(Self::MIN, Self::MAX))
            }

            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new($default)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self::new(value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <$inner>::deserialize(deserializer).map(Self::new)
            }
        }
    };
}

clamped_value!(
    /// A distance in tiles, constrained to [1, 64]
    TileRadius(i32) in 1..=64, default 10
);

clamped_value!(
    /// Consecutive transient failures tolerated before a walk gives up, [1, 50]
    AttemptBudget(u32) in 1..=50, default 5
);

clamped_value!(
    /// Number of fresh routes `travel` may plan after the first one fails, [0, 10]
    ReplanLimit(u32) in 0..=10, default 2
);

clamped_value!(
    /// Wall-clock budget for one route search in seconds, [1, 120]
    SearchBudget(u64) in 1..=120, default 10
);

clamped_value!(
    /// Sleep between two polls of a wait condition in milliseconds, [1, 1000]
    PollInterval(u64) in 1..=1000, default 50
);

clamped_value!(
    /// Upper bound of a polling wait in milliseconds, [1, 60000]
    WaitTimeout(u64) in 1..=60000, default 2000
);

impl SearchBudget {
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl PollInterval {
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl WaitTimeout {
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_clamped() {
        assert_eq!(TileRadius::new(0).get(), 1);
        assert_eq!(TileRadius::new(500).get(), 64);
        assert_eq!(AttemptBudget::new(0).get(), 1);
        assert_eq!(SearchBudget::new(10).as_duration(), Duration::from_secs(10));
        assert_eq!(PollInterval::new(0).as_duration(), Duration::from_millis(1));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TileRadius::default().get(), 10);
        assert_eq!(AttemptBudget::default().get(), 5);
        assert_eq!(ReplanLimit::default().get(), 2);
        assert_eq!(SearchBudget::default().get(), 10);
    }

    #[test]
    fn test_deserialize_clamps_out_of_range_values() {
        #[derive(Deserialize)]
        struct Holder {
            radius: TileRadius,
            budget: AttemptBudget,
        }

        let holder: Holder = toml::from_str("radius = 900\nbudget = 3").unwrap();
        assert_eq!(holder.radius.get(), 64);
        assert_eq!(holder.budget.get(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(TileRadius::new(13).to_string(), "13");
    }
}
