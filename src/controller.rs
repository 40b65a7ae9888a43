use crate::{
    render::{CellView, render_grid},
    selection::Selection,
    view::View,
};
use pixelwall_common::{CellId, Color, GridShape, PixelState, UpdateRequest};

pub const LOAD_FAILED_TEXT: &str = "Could not load grid. Check the server.";
pub const LOADING_TEXT: &str = "Loading pixels...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// Per-session UI state: the pixel state, the pending selection and the view
/// they are projected onto.
pub struct Controller<V> {
    grid: GridShape,
    default_color: Color,
    state: PixelState,
    cells: Vec<CellView>,
    selection: Selection,
    phase: Phase,
    view: V,
}

impl<V: View> Controller<V> {
    pub fn new(grid: GridShape, default_color: Color, view: V) -> Self {
        Self {
            grid,
            default_color,
            state: PixelState::new(),
            cells: Vec::new(),
            selection: Selection::Idle,
            phase: Phase::Loading,
            view,
        }
    }

    pub fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
        self.view.set_loading_text(LOADING_TEXT);
        self.view.set_loading(true);
    }

    pub fn load(&mut self, state: PixelState) {
        self.render(state);
        self.phase = Phase::Ready;
        self.view.set_loading(false);
    }

    /// Initial load went wrong. The grid stays hidden for good.
    pub fn load_failed(&mut self) {
        self.phase = Phase::Failed;
        self.view.set_loading_text(LOAD_FAILED_TEXT);
    }

    pub fn render(&mut self, state: PixelState) {
        self.state = state;
        self.cells = render_grid(self.grid, &self.state, &self.default_color);
        self.view.replace_grid(self.grid, &self.cells);
    }

    pub fn refresh(&mut self) {
        if self.phase == Phase::Ready {
            self.view.replace_grid(self.grid, &self.cells);
        }
    }

    /// A cell was clicked. Returns whether the picker opened.
    pub fn click(&mut self, id: CellId) -> bool {
        if self.phase != Phase::Ready {
            warn!(%id, phase = ?self.phase, "grid is not interactive");
            return false;
        }

        let Some(cell) = self.cells.get(id.index()) else {
            warn!(%id, cells = self.cells.len(), "click outside of the grid");
            return false;
        };

        debug!(%id, color = %cell.color, "awaiting color");
        self.selection.begin(id, cell.color.clone());
        self.view.open_picker(cell);

        true
    }

    /// The picker emitted `color`.
    ///
    /// Applies it locally right away and hands back the request that persists
    /// it. Nothing happens when no cell is pending.
    pub fn choose(&mut self, color: Color) -> Option<UpdateRequest> {
        let id = self.selection.take()?;
        self.view.close_picker();
        self.apply(id, color.clone());

        Some(UpdateRequest { id, color })
    }

    pub fn dismiss(&mut self) {
        if let Some(id) = self.selection.cancel() {
            debug!(%id, "picker dismissed");
            self.view.close_picker();
        }
    }

    fn apply(&mut self, id: CellId, color: Color) {
        self.state.insert(id, color.clone());

        if let Some(cell) = self.cells.get_mut(id.index()) {
            *cell = CellView::new(id, color);
            self.view.update_cell(cell);
        }
    }

    pub fn grid(&self) -> GridShape {
        self.grid
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn state(&self) -> &PixelState {
        &self.state
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[CellView] {
        &self.cells
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }
}
