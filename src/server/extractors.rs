//! Request extractors shared by the handlers

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Detects the `X-Requested-With: XMLHttpRequest` header fetch calls
/// send. Handlers use it to choose between a JSON reply and the
/// redirect a plain form submission expects.
#[derive(Debug, Clone, Copy)]
pub struct RequestedWith(bool);

impl RequestedWith {
    pub fn is_ajax(self) -> bool {
        self.0
    }
}

impl<S> FromRequestParts<S> for RequestedWith
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ajax = parts
            .headers
            .get("x-requested-with")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"));
        Ok(Self(ajax))
    }
}
