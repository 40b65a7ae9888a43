//! Doubles for the view and the server

use crate::{
    render::CellView,
    transport::{Transport, TransportError},
    view::View,
};
use pixelwall_common::{CellId, Color, GridShape, PixelState, UpdateRequest, UpdateResponse};
use std::{cell::RefCell, io, rc::Rc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    Loading(bool),
    LoadingText(String),
    Grid(usize),
    Cell(CellId, Color),
    Picker(CellId, Color),
    PickerClosed,
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
    pub loading: bool,
    pub loading_text: String,
    pub cells: Vec<CellView>,
}

impl View for RecordingView {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.events.push(ViewEvent::Loading(loading));
    }

    fn set_loading_text(&mut self, text: &str) {
        self.loading_text = text.to_owned();
        self.events.push(ViewEvent::LoadingText(text.to_owned()));
    }

    fn replace_grid(&mut self, _grid: GridShape, cells: &[CellView]) {
        self.cells = cells.to_vec();
        self.events.push(ViewEvent::Grid(cells.len()));
    }

    fn update_cell(&mut self, cell: &CellView) {
        self.cells[cell.id.index()] = cell.clone();
        self.events.push(ViewEvent::Cell(cell.id, cell.color.clone()));
    }

    fn open_picker(&mut self, cell: &CellView) {
        self.events.push(ViewEvent::Picker(cell.id, cell.color.clone()));
    }

    fn close_picker(&mut self) {
        self.events.push(ViewEvent::PickerClosed);
    }
}

#[derive(Clone, Debug)]
pub enum Reply<T> {
    Ok(T),
    Status(u16),
    Disconnect,
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, TransportError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Status(code) => Err(TransportError::Status {
                code: *code,
                reason: None,
            }),
            Self::Disconnect => Err(TransportError::Io(io::ErrorKind::ConnectionReset.into())),
        }
    }
}

#[derive(Clone)]
pub struct FakeTransport {
    pub pixels: Reply<PixelState>,
    pub update: Reply<UpdateResponse>,
    pub fetches: Rc<RefCell<usize>>,
    pub updates: Rc<RefCell<Vec<UpdateRequest>>>,
}

impl FakeTransport {
    pub fn new(pixels: Reply<PixelState>, update: Reply<UpdateResponse>) -> Self {
        Self {
            pixels,
            update,
            fetches: Rc::default(),
            updates: Rc::default(),
        }
    }

    pub fn accepting(pixels: PixelState) -> Self {
        Self::new(
            Reply::Ok(pixels),
            Reply::Ok(UpdateResponse {
                success: true,
                error: None,
            }),
        )
    }
}

impl Transport for FakeTransport {
    async fn fetch_pixels(&self) -> Result<PixelState, TransportError> {
        *self.fetches.borrow_mut() += 1;
        self.pixels.produce()
    }

    async fn send_update(&self, request: &UpdateRequest) -> Result<UpdateResponse, TransportError> {
        self.updates.borrow_mut().push(request.clone());
        self.update.produce()
    }
}
