use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Row-major position on the wall (`id = row * side + col`)
///
/// On the wire it is always a decimal string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub u32);

impl CellId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(itoa::Buffer::new().format(self.0))
    }
}

impl FromStr for CellId {
    type Err = ParseCellIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self).map_err(ParseCellIdError)
    }
}

impl Serialize for CellId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(itoa::Buffer::new().format(self.0))
    }
}

impl<'de> Deserialize<'de> for CellId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCellIdError(ParseIntError);

impl fmt::Display for ParseCellIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell id: {}", self.0)
    }
}

impl std::error::Error for ParseCellIdError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    side: u32,
    cell_count: u32,
}

impl GridShape {
    pub const DEFAULT_SIDE: u32 = 20;

    pub fn new(side: u32) -> Result<Self, InvalidSide> {
        match side.checked_mul(side) {
            Some(cell_count) if side > 0 => Ok(Self { side, cell_count }),
            _ => Err(InvalidSide(side)),
        }
    }

    #[must_use]
    pub fn side(&self) -> u32 {
        self.side
    }

    /// `N = side²`
    #[must_use]
    pub fn cell_count(&self) -> u32 {
        self.cell_count
    }

    #[must_use]
    pub fn contains(&self, id: CellId) -> bool {
        id.0 < self.cell_count
    }

    #[must_use]
    pub fn id_at(&self, row: u32, col: u32) -> Option<CellId> {
        (row < self.side && col < self.side).then(|| CellId(row * self.side + col))
    }

    #[must_use]
    pub fn position(&self, id: CellId) -> Option<(u32, u32)> {
        self.contains(id)
            .then(|| (id.0 / self.side, id.0 % self.side))
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> + use<> {
        (0..self.cell_count).map(CellId)
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self {
            side: Self::DEFAULT_SIDE,
            cell_count: Self::DEFAULT_SIDE * Self::DEFAULT_SIDE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidSide(pub u32);

impl fmt::Display for InvalidSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid side {} is out of range", self.0)
    }
}

impl std::error::Error for InvalidSide {}
