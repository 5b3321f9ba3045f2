//! Station and grid location models.

use serde::{Deserialize, Serialize};

use super::StationId;

/// A cell on the service-area lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl GridCell {
    /// Creates a grid cell.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl From<(i32, i32)> for GridCell {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// A base location owning zero or more vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station identifier.
    pub id: StationId,
    /// Station location.
    pub location: GridCell,
}

impl Station {
    /// Creates a station.
    pub fn new(id: StationId, location: impl Into<GridCell>) -> Self {
        Self {
            id,
            location: location.into(),
        }
    }
}
