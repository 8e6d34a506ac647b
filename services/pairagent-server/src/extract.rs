//! Custom Axum Extractors

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use pairagent_types::lenient;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON body that never rejects.
///
/// A missing, empty, or malformed body yields `T::default()`. Inside a
/// well-formed object, each ill-typed field falls back to its own default.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Unreadable request body, using defaults: {}", e);
                return Ok(Self(T::default()));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Malformed JSON body, using defaults: {}", e);
                return Ok(Self(T::default()));
            }
        };

        let decoded = lenient::from_value(&body);
        if !decoded.skipped.is_empty() {
            tracing::debug!(fields = ?decoded.skipped, "Ignoring ill-typed body fields");
        }
        Ok(Self(decoded.value))
    }
}
