//! Custom Axum extractors.
//!
//! - [`CallerEmail`]: the caller's self-declared identity from the `email` header

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Header carrying the caller's identity.
pub const EMAIL_HEADER: &str = "email";

/// Caller identity taken from the `email` request header.
///
/// Extraction never fails; an absent or non-UTF-8 header yields `None` and
/// the manager decides whether the operation needs an identity.
///
/// # Example
///
/// ```ignore
/// async fn handler(caller: CallerEmail) -> String {
///     format!("Caller: {:?}", caller.as_deref())
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerEmail(pub Option<String>);

impl CallerEmail {
    /// Borrow the identity, if one was sent
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerEmail
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);

        Ok(Self(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_caller_email_from_header() {
        let req = Request::builder()
            .header(EMAIL_HEADER, "ada@x.com")
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let caller = CallerEmail::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(caller.as_deref(), Some("ada@x.com"));
    }

    #[tokio::test]
    async fn test_caller_email_absent() {
        let req = Request::builder().body(()).expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let caller = CallerEmail::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(caller, CallerEmail(None));
    }
}
