use crate::transport::{Transport, TransportError};
use pixelwall_common::{UpdateRequest, UpdateResponse};
use std::fmt;

#[derive(Debug)]
pub enum UpdateFailure {
    /// The server answered `success: false`
    Rejected(String),
    Transport(TransportError),
}

impl fmt::Display for UpdateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "update rejected: {reason}"),
            Self::Transport(error) => write!(f, "update request failed: {error}"),
        }
    }
}

impl std::error::Error for UpdateFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(..) => None,
            Self::Transport(error) => Some(error),
        }
    }
}

/// Persist one color change. Failures are logged and handed back, never
/// retried, and the locally applied color is left alone.
pub async fn persist<T: Transport>(transport: &T, request: UpdateRequest) -> Result<(), UpdateFailure> {
    let result = match transport.send_update(&request).await {
        Ok(UpdateResponse { success: true, .. }) => Ok(()),
        Ok(UpdateResponse { error, .. }) => Err(UpdateFailure::Rejected(
            error.unwrap_or_else(|| "no reason given".to_owned()),
        )),
        Err(error) => Err(UpdateFailure::Transport(error)),
    };

    match &result {
        Ok(()) => debug!(id = %request.id, color = %request.color, "pixel saved"),
        Err(error) => error!(id = %request.id, %error, "pixel update failed"),
    }

    result
}

#[cfg(test)]
mod test {
    use super::{UpdateFailure, persist};
    use crate::{
        controller::Controller,
        testing::{FakeTransport, RecordingView, Reply},
    };
    use pixelwall_common::{CellId, Color, GridShape, PixelState, UpdateRequest, UpdateResponse};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn failures_logged(lines: &[&str]) -> usize {
        lines
            .iter()
            .filter(|line| line.contains("ERROR") && line.contains("pixel update failed"))
            .count()
    }

    fn pick(controller: &mut Controller<RecordingView>, id: CellId, color: &str) -> UpdateRequest {
        controller.click(id);
        controller.choose(Color::new(color)).unwrap()
    }

    fn ready_controller() -> Controller<RecordingView> {
        let mut controller = Controller::new(
            GridShape::new(2).unwrap(),
            Color::default(),
            RecordingView::default(),
        );
        controller.load(PixelState::new());
        controller
    }

    #[monoio::test]
    async fn sends_exactly_one_request() {
        let transport = FakeTransport::accepting(PixelState::new());
        let mut controller = ready_controller();
        let request = pick(&mut controller, CellId(1), "#ff0000");

        persist(&transport, request.clone()).await.unwrap();

        assert_eq!(*transport.updates.borrow(), [request]);
    }

    #[monoio::test]
    #[traced_test]
    async fn rejection_keeps_optimistic_color() {
        let transport = FakeTransport::new(
            Reply::Ok(PixelState::new()),
            Reply::Ok(UpdateResponse {
                success: false,
                error: Some("Invalid pixel id".to_owned()),
            }),
        );
        let mut controller = ready_controller();
        let request = pick(&mut controller, CellId(2), "#00ff00");

        let error = persist(&transport, request).await.unwrap_err();

        assert!(matches!(error, UpdateFailure::Rejected(ref reason) if reason == "Invalid pixel id"));
        assert_eq!(transport.updates.borrow().len(), 1);
        assert_eq!(controller.state().get(CellId(2)), Some(&Color::new("#00ff00")));
        assert_eq!(controller.cells()[2].color, Color::new("#00ff00"));

        logs_assert(|lines| match failures_logged(lines) {
            1 => Ok(()),
            n => Err(format!("{n} failures logged")),
        });
    }

    #[monoio::test]
    #[traced_test]
    async fn transport_errors_are_not_retried() {
        for (attempt, reply) in [Reply::Disconnect, Reply::Status(502)].into_iter().enumerate() {
            let transport = FakeTransport::new(Reply::Ok(PixelState::new()), reply);
            let mut controller = ready_controller();
            let request = pick(&mut controller, CellId(0), "#0000ff");

            let error = persist(&transport, request).await.unwrap_err();

            assert!(matches!(error, UpdateFailure::Transport(..)));
            assert_eq!(transport.updates.borrow().len(), 1);
            assert_eq!(controller.state().get(CellId(0)), Some(&Color::new("#0000ff")));

            // one new error line per failed request
            logs_assert(|lines| match failures_logged(lines) {
                n if n == attempt + 1 => Ok(()),
                n => Err(format!("{n} failures logged after {} requests", attempt + 1)),
            });
        }
    }

    #[monoio::test]
    #[traced_test]
    async fn success_logs_no_error() {
        let transport = FakeTransport::accepting(PixelState::new());
        let mut controller = ready_controller();
        let request = pick(&mut controller, CellId(1), "#ff0000");

        persist(&transport, request).await.unwrap();

        assert!(logs_contain("pixel saved"));
        assert!(!logs_contain("pixel update failed"));
    }

    #[monoio::test]
    async fn rejection_without_reason() {
        let transport = FakeTransport::new(
            Reply::Ok(PixelState::new()),
            Reply::Ok(UpdateResponse {
                success: false,
                error: None,
            }),
        );
        let mut controller = ready_controller();
        let request = pick(&mut controller, CellId(3), "#ffffff");

        let error = persist(&transport, request).await.unwrap_err();
        assert_eq!(error.to_string(), "update rejected: no reason given");
    }
}
