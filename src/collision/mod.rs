//! Per-cell directional blockage loaded from region files

use crate::cell::{Cell, Direction};
use crate::errors::{WalkerError, WalkerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

/// Bitmask of blockage state for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionFlags(u32);

impl CollisionFlags {
    pub const OPEN: CollisionFlags = CollisionFlags(0);
    pub const NORTH: CollisionFlags = CollisionFlags(0x1);
    pub const EAST: CollisionFlags = CollisionFlags(0x2);
    pub const SOUTH: CollisionFlags = CollisionFlags(0x4);
    pub const WEST: CollisionFlags = CollisionFlags(0x8);
    pub const OCCUPIED: CollisionFlags = CollisionFlags(0x100);
    pub const BLOCKED: CollisionFlags = CollisionFlags(0x20_0000);

    /// All four directional edges closed
    pub const WALLED: CollisionFlags = CollisionFlags(0xF);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn union(self, other: CollisionFlags) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, other: CollisionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::North => Self::NORTH,
            Direction::East => Self::EAST,
            Direction::South => Self::SOUTH,
            Direction::West => Self::WEST,
        }
    }

    /// Whether the edge leaving this cell in `direction` is closed
    pub fn blocks(self, direction: Direction) -> bool {
        self.contains(Self::for_direction(direction))
    }

    /// Cells that can never be stood on (solid or occupied)
    pub fn is_impassable(self) -> bool {
        self.0 & (Self::BLOCKED.0 | Self::OCCUPIED.0) != 0
    }
}

impl std::ops::BitOr for CollisionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for CollisionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// One entry of a region file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CollisionRecord {
    #[validate(range(min = 0, max = 16383))]
    pub x: i32,
    #[validate(range(min = 0, max = 16383))]
    pub y: i32,
    #[validate(range(min = 0, max = 3))]
    pub plane: i32,
    pub flags: u32,
}

impl CollisionRecord {
    pub fn new(cell: Cell, flags: CollisionFlags) -> Self {
        Self {
            x: cell.x,
            y: cell.y,
            plane: cell.plane,
            flags: flags.bits(),
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y, self.plane)
    }
}

/// Region file encodings recognized by [`CollisionStore::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegionFormat {
    Json,
    Bincode,
}

impl RegionFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(RegionFormat::Json),
            "bin" => Some(RegionFormat::Bincode),
            _ => None,
        }
    }
}

/// Immutable-after-load map of cell → flags. Unknown cells are fully open.
#[derive(Debug, Clone, Default)]
pub struct CollisionStore {
    flags: HashMap<Cell, CollisionFlags>,
    regions: usize,
}

impl CollisionStore {
    /// Empty store: every cell open
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every recognized region file in `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> WalkerResult<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(WalkerError::CollisionDirMissing {
                path: dir.to_path_buf(),
            });
        }
        if !dir.is_dir() {
            return Err(WalkerError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let files = region_files(dir)?;
        if files.is_empty() {
            return Err(WalkerError::NoRegionFiles {
                path: dir.to_path_buf(),
            });
        }

        let mut store = Self::new();
        for (path, format) in files {
            let region = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Loading collision region {region}");

            let records = read_region_file(&path, format)?;
            store.extend_records(&records).map_err(|err| match err {
                WalkerError::InvalidCollisionRecord { reason } => {
                    WalkerError::CorruptedRegionFile {
                        path: path.clone(),
                        reason,
                    }
                }
                other => other,
            })?;
            store.regions += 1;
        }

        info!(
            "Collision data ready: {cells} cells from {regions} regions",
            cells = store.len(),
            regions = store.regions
        );
        Ok(store)
    }

    /// Build a store from in-memory records, validating each one
    pub fn from_records(records: &[CollisionRecord]) -> WalkerResult<Self> {
        let mut store = Self::new();
        store.extend_records(records)?;
        Ok(store)
    }

    fn extend_records(&mut self, records: &[CollisionRecord]) -> WalkerResult<()> {
        for record in records {
            record
                .validate()
                .map_err(|errors| WalkerError::InvalidCollisionRecord {
                    reason: format!("{record:?}: {errors}"),
                })?;
            // Last writer wins on duplicates
            self.flags
                .insert(record.cell(), CollisionFlags::from_bits(record.flags));
        }
        Ok(())
    }

    /// Set flags for one cell while building a store
    pub fn set(&mut self, cell: Cell, flags: CollisionFlags) {
        self.flags.insert(cell, flags);
    }

    pub fn with(mut self, cell: Cell, flags: CollisionFlags) -> Self {
        self.set(cell, flags);
        self
    }

    pub fn lookup(&self, cell: Cell) -> CollisionFlags {
        self.flags.get(&cell).copied().unwrap_or(CollisionFlags::OPEN)
    }

    /// Whether a plain step from `from` in `direction` is allowed
    pub fn can_move(&self, from: Cell, direction: Direction) -> bool {
        let flags = self.lookup(from);
        if flags.is_impassable() || flags.blocks(direction) {
            return false;
        }
        !self.lookup(from.step(direction)).is_impassable()
    }

    /// Plain-grid successors of `cell` in north, east, south, west order
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.can_move(cell, *direction))
            .map(move |direction| cell.step(direction))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn regions_loaded(&self) -> usize {
        self.regions
    }

    /// Dump the store as records sorted by plane, y, x
    pub fn records(&self) -> Vec<CollisionRecord> {
        let mut records: Vec<CollisionRecord> = self
            .flags
            .iter()
            .map(|(cell, flags)| CollisionRecord::new(*cell, *flags))
            .collect();
        records.sort_by_key(|r| (r.plane, r.y, r.x));
        records
    }

    /// Write records as a bincode region file
    pub fn save_region<P: AsRef<Path>>(path: P, records: &[CollisionRecord]) -> WalkerResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = bincode::serde::encode_to_vec(records, bincode::config::standard()).map_err(
            |e| WalkerError::InvalidCollisionRecord {
                reason: format!("Failed to serialize region: {e}"),
            },
        )?;
        std::fs::write(path, data)?;
        debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

/// Recognized region files in `dir`, sorted by file name so loading order is stable
pub fn region_files(dir: &Path) -> WalkerResult<Vec<(PathBuf, RegionFormat)>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(format) = RegionFormat::from_path(&path) {
            files.push((path, format));
        }
    }
    files.sort();
    Ok(files)
}

/// Decode one region file. Any parse failure is fatal.
pub fn read_region_file(path: &Path, format: RegionFormat) -> WalkerResult<Vec<CollisionRecord>> {
    let data = std::fs::read(path)?;
    let corrupted = |reason: String| WalkerError::CorruptedRegionFile {
        path: path.to_path_buf(),
        reason,
    };

    match format {
        RegionFormat::Json => serde_json::from_slice(&data)
            .map_err(|e| corrupted(format!("Failed to parse JSON: {e}"))),
        RegionFormat::Bincode => {
            let (records, read): (Vec<CollisionRecord>, usize) =
                bincode::serde::decode_from_slice(&data, bincode::config::standard())
                    .map_err(|e| corrupted(format!("Failed to decode region data: {e}")))?;
            if read != data.len() {
                return Err(corrupted(format!(
                    "{} trailing bytes after region data",
                    data.len() - read
                )));
            }
            Ok(records)
        }
    }
}
