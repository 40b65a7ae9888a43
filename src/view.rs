use crate::render::CellView;
use pixelwall_common::GridShape;

pub trait View {
    /// Loading indicator visible and grid hidden, or the other way around
    fn set_loading(&mut self, loading: bool);

    fn set_loading_text(&mut self, text: &str);

    fn replace_grid(&mut self, grid: GridShape, cells: &[CellView]);

    fn update_cell(&mut self, cell: &CellView);

    fn open_picker(&mut self, cell: &CellView);

    fn close_picker(&mut self);
}
