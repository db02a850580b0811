//! Request extractors.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, Uri},
};
use std::convert::Infallible;

use crate::response::ResponseFormat;

/// Returns the first value of a query parameter, percent-decoded.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[async_trait]
impl<S> FromRequestParts<S> for ResponseFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let callback = query_param(&parts.uri, "callback");
        Ok(ResponseFormat::from_callback(callback.as_deref()))
    }
}
