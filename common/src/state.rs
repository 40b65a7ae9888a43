use crate::{CellId, Color};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Mapping of cell to color, as served by `GET /pixels`
///
/// Sparse: cells the server never mentioned are simply missing. Only keys in
/// canonical decimal form (`"5"`, never `"05"`, `"+5"` or `" 5"`) are kept
/// while decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PixelState {
    colors: BTreeMap<CellId, Color>,
}

impl PixelState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: CellId) -> Option<&Color> {
        self.colors.get(&id)
    }

    pub fn insert(&mut self, id: CellId, color: Color) -> Option<Color> {
        self.colors.insert(id, color)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Color)> {
        self.colors.iter().map(|(id, color)| (*id, color))
    }
}

impl FromIterator<(CellId, Color)> for PixelState {
    fn from_iter<T: IntoIterator<Item = (CellId, Color)>>(iter: T) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for PixelState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Color>::deserialize(deserializer)?;

        Ok(raw
            .into_iter()
            .filter_map(|(key, color)| {
                let id: CellId = key.parse().ok()?;
                (id.to_string() == key).then_some((id, color))
            })
            .collect())
    }
}
