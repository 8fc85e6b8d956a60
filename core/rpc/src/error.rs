use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use distributor_types::{DistributorError, ErrorKind};
use tracing::error;

/// A distributor error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct RpcError(pub DistributorError);

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DistributorError> for RpcError {
    fn from(e: DistributorError) -> Self {
        Self(e)
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, self.0.to_string()).into_response()
    }
}
