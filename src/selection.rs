use pixelwall_common::{CellId, Color};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    AwaitingColor {
        id: CellId,
        /// value the picker was opened with
        initial: Color,
    },
}

impl Selection {
    /// Start waiting on `id`. Replaces whatever was pending before.
    pub fn begin(&mut self, id: CellId, initial: Color) {
        *self = Self::AwaitingColor { id, initial };
    }

    pub fn take(&mut self) -> Option<CellId> {
        match std::mem::take(self) {
            Self::AwaitingColor { id, .. } => Some(id),
            Self::Idle => None,
        }
    }

    pub fn cancel(&mut self) -> Option<CellId> {
        self.take()
    }

    #[must_use]
    pub fn pending(&self) -> Option<CellId> {
        match self {
            Self::AwaitingColor { id, .. } => Some(*id),
            Self::Idle => None,
        }
    }
}
