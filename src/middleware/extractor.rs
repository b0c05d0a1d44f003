use axum::{
    body::Bytes,
    extract::{FromRef, FromRequest, OriginalUri, Request},
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    middleware::AckAlways,
    services::{PayloadDecoder, SignatureVerifier},
    AppState,
};

/// A Slack request whose signature has been verified.
///
/// The body is used exactly as received; Events API callbacks are JSON.
#[derive(Debug, Clone)]
pub struct SlackRequest {
    pub body: Bytes,
}

/// A verified form-encoded Slack request (interactions, slash commands).
///
/// When `base64_bodies` is set the body is base64-unwrapped first and the
/// signature is checked over the unwrapped bytes.
#[derive(Debug, Clone)]
pub struct SlackFormRequest {
    pub body: Bytes,
}

/// Extractor rejection type; still answered through [`AckAlways`]
#[derive(Debug)]
pub struct AckRejection {
    pub endpoint: String,
    pub error: AppError,
}

impl IntoResponse for AckRejection {
    fn into_response(self) -> Response {
        AckAlways::respond(&self.endpoint, Err(self.error))
    }
}

impl<S> FromRequest<S> for SlackRequest
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AckRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let body = verified_body(req, &state, false).await?;
        Ok(SlackRequest { body })
    }
}

impl<S> FromRequest<S> for SlackFormRequest
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AckRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let base64_wrapped = state.config.base64_bodies;
        let body = verified_body(req, &state, base64_wrapped).await?;
        Ok(SlackFormRequest { body })
    }
}

async fn verified_body(
    req: Request,
    state: &AppState,
    base64_wrapped: bool,
) -> Result<Bytes, AckRejection> {
    let endpoint = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let reject = |error: AppError| AckRejection {
        endpoint: endpoint.clone(),
        error,
    };

    let headers = req.headers().clone();
    let raw = Bytes::from_request(req, state)
        .await
        .map_err(|e| reject(AppError::Decode(format!("failed to read body: {e}"))))?;

    let body = PayloadDecoder::unwrap_transport(&raw, base64_wrapped).map_err(&reject)?;

    SignatureVerifier::from_config(&state.config)
        .verify(&body, &headers)
        .map_err(&reject)?;

    Ok(Bytes::from(body))
}
