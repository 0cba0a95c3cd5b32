//! Uniform grid broad-phase over active bots. Positions outside the world
//! clamp to the nearest edge cell.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::arena::BotHandle;

/// Row-major cell index: `row * columns + column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpatialIndexError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("world extent must be positive and finite, got {width}x{height}")]
    InvalidWorldExtent { width: f32, height: f32 },
    #[error("grid of {columns}x{rows} cells exceeds the region limit")]
    TooManyRegions { columns: u64, rows: u64 },
}

const MAX_REGIONS: u64 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            world_width: 3200.0,
            world_height: 2048.0,
            cell_size: 256.0,
        }
    }
}

impl GridConfig {
    /// Column and row counts, or the reason this grid cannot be built.
    pub fn dimensions(&self) -> Result<(u32, u32), SpatialIndexError> {
        let Self {
            world_width,
            world_height,
            cell_size,
        } = *self;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(SpatialIndexError::InvalidCellSize(cell_size));
        }
        if !world_width.is_finite()
            || !world_height.is_finite()
            || world_width <= 0.0
            || world_height <= 0.0
        {
            return Err(SpatialIndexError::InvalidWorldExtent {
                width: world_width,
                height: world_height,
            });
        }
        let columns = cells_along(world_width, cell_size);
        let rows = cells_along(world_height, cell_size);
        match columns.checked_mul(rows) {
            Some(count) if count <= MAX_REGIONS => Ok((columns as u32, rows as u32)),
            _ => Err(SpatialIndexError::TooManyRegions { columns, rows }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: u32,
    rows: u32,
    cells: Vec<Vec<BotHandle>>,
    membership: HashMap<BotHandle, RegionId>,
}

impl SpatialGrid {
    pub fn new(config: GridConfig) -> Result<Self, SpatialIndexError> {
        let (columns, rows) = config.dimensions()?;
        Ok(Self {
            cell_size: config.cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns as usize * rows as usize],
            membership: HashMap::new(),
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn region_count(&self) -> usize {
        self.cells.len()
    }

    pub fn region_at(&self, x: f32, y: f32) -> RegionId {
        let column = cell_coordinate(x, self.cell_size, self.columns);
        let row = cell_coordinate(y, self.cell_size, self.rows);
        RegionId(row * self.columns + column)
    }

    /// Places `handle` in the region containing `(x, y)`, moving it if it was
    /// already indexed elsewhere.
    pub fn insert(&mut self, handle: BotHandle, x: f32, y: f32) -> RegionId {
        let region = self.region_at(x, y);
        match self.membership.get(&handle).copied() {
            Some(current) if current == region => return region,
            Some(current) => self.detach(handle, current),
            None => {}
        }
        self.cells[region.0 as usize].push(handle);
        self.membership.insert(handle, region);
        region
    }

    pub fn remove(&mut self, handle: BotHandle) -> Option<RegionId> {
        let region = self.membership.remove(&handle)?;
        self.detach(handle, region);
        Some(region)
    }

    pub fn region_of(&self, handle: BotHandle) -> Option<RegionId> {
        self.membership.get(&handle).copied()
    }

    /// Bots currently in `region`, in the order they entered it. Unknown
    /// regions are empty.
    pub fn bots_in_region(&self, region: RegionId) -> &[BotHandle] {
        self.cells
            .get(region.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = (BotHandle, f32, f32)>) {
        self.clear();
        for (handle, x, y) in entries {
            self.insert(handle, x, y);
        }
    }

    pub fn len(&self) -> usize {
        self.membership.len()
    }

    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.membership.clear();
    }

    fn detach(&mut self, handle: BotHandle, region: RegionId) {
        if let Some(cell) = self.cells.get_mut(region.0 as usize) {
            if let Some(position) = cell.iter().position(|entry| *entry == handle) {
                cell.remove(position);
            }
        }
    }
}

fn cells_along(extent: f32, cell_size: f32) -> u64 {
    (f64::from(extent) / f64::from(cell_size)).ceil().max(1.0) as u64
}

fn cell_coordinate(value: f32, cell_size: f32, count: u32) -> u32 {
    let cell = (value / cell_size).floor();
    let cell = if cell.is_finite() {
        cell.max(0.0) as u32
    } else {
        0
    };
    cell.min(count - 1)
}
