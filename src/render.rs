use pixelwall_common::{CellId, Color, GridShape, PixelState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub id: CellId,
    pub color: Color,
    /// accessibility label, mirrors what a screen reader would announce
    pub label: String,
}

impl CellView {
    pub fn new(id: CellId, color: Color) -> Self {
        let label = format!("Pixel {id}, color {color}");
        Self { id, color, label }
    }
}

/// Project the pixel state onto exactly `grid.cell_count()` cells.
///
/// Cells the state doesn't mention get `default_color`. State entries outside
/// the grid never show up.
pub fn render_grid(grid: GridShape, state: &PixelState, default_color: &Color) -> Vec<CellView> {
    grid.ids()
        .map(|id| {
            let color = state.get(id).unwrap_or(default_color).clone();
            CellView::new(id, color)
        })
        .collect()
}
