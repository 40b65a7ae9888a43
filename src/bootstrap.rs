use crate::{
    controller::Controller,
    transport::{Transport, TransportError},
    view::View,
};
use std::fmt;

#[derive(Debug)]
pub struct LoadFailure(pub TransportError);

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not load pixels: {}", self.0)
    }
}

impl std::error::Error for LoadFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Show the loading indicator, fetch the wall and render it.
///
/// On failure the indicator stays up with an error message and the grid is
/// never shown. There is no retry.
pub async fn bootstrap<T, V>(transport: &T, controller: &mut Controller<V>) -> Result<(), LoadFailure>
where
    T: Transport,
    V: View,
{
    controller.begin_loading();

    match transport.fetch_pixels().await {
        Ok(state) => {
            info!(painted = state.len(), "loaded pixels");
            controller.load(state);
            Ok(())
        }
        Err(error) => {
            error!(?error, "loading pixels failed");
            controller.load_failed();
            Err(LoadFailure(error))
        }
    }
}
