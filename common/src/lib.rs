mod color;
mod grid;
mod state;
mod wire;

pub use self::{
    color::{Color, ParseColorError, Rgb},
    grid::{CellId, GridShape, InvalidSide, ParseCellIdError},
    state::PixelState,
    wire::{UpdateRequest, UpdateResponse},
};
