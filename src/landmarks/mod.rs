//! Named destinations with an arrival area, such as banks

use crate::cell::{Area, Cell};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    /// Where to walk to
    pub location: Cell,
    /// Being anywhere in here counts as being at the landmark
    pub area: Area,
    pub accessible: bool,
}

impl Landmark {
    pub fn new(name: &str, location: Cell, area: Area) -> Self {
        Self {
            name: name.to_string(),
            location,
            area,
            accessible: true,
        }
    }

    /// Chebyshev distance to the location; planes are not compared
    pub fn distance_from(&self, cell: Cell) -> i32 {
        self.location.distance(cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.area.contains(cell)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LandmarkRegistry {
    landmarks: Vec<Landmark>,
}

impl LandmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, landmark: Landmark) {
        self.landmarks.push(landmark);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Case-insensitive lookup by name
    pub fn get(&self, name: &str) -> Option<&Landmark> {
        self.landmarks
            .iter()
            .find(|landmark| landmark.name.eq_ignore_ascii_case(name))
    }

    /// Nearest accessible landmark; the earlier entry wins a tie
    pub fn closest(&self, cell: Cell) -> Option<&Landmark> {
        self.landmarks
            .iter()
            .filter(|landmark| landmark.accessible)
            .fold(None, |best: Option<&Landmark>, landmark| match best {
                Some(best) if best.distance_from(cell) <= landmark.distance_from(cell) => Some(best),
                _ => Some(landmark),
            })
    }

    pub fn containing(&self, cell: Cell) -> Option<&Landmark> {
        self.landmarks.iter().find(|landmark| landmark.contains(cell))
    }

    pub fn banks() -> Self {
        let bank = |name: &str, location: (i32, i32, i32), a: (i32, i32, i32), b: (i32, i32, i32)| {
            Landmark::new(name, Cell::from(location), Area::new(Cell::from(a), Cell::from(b)))
        };

        Self {
            landmarks: vec![
                bank("Lumbridge", (3208, 3219, 2), (3207, 3222, 2), (3210, 3215, 2)),
                bank("Varrock East", (3253, 3421, 0), (3250, 3423, 0), (3257, 3416, 0)),
                bank("Varrock West", (3183, 3440, 0), (3180, 3447, 0), (3185, 3433, 0)),
                bank("Grand Exchange", (3164, 3486, 0), (3157, 3496, 0), (3171, 3483, 0)),
                bank("Edgeville", (3094, 3495, 0), (3091, 3499, 0), (3098, 3488, 0)),
                bank("Lunar Isle", (2099, 3918, 0), (2097, 3921, 0), (2104, 3917, 0)),
            ],
        }
    }
}
