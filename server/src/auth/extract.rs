//! Bearer Token Extraction
//!
//! Tokens are accepted from the `Authorization: Bearer` header or the
//! `token` query parameter; the header wins when both are present.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Query parameter carrying a token when no header is sent.
const TOKEN_QUERY_PARAM: &str = "token";

/// Optional bearer token attached to a request.
///
/// Extraction never rejects: routes stay reachable anonymously and the
/// access dispatcher decides what an absent token means.
#[derive(Debug, Clone)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    /// The raw token string, if one was sent.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

fn token_from_header(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToString::to_string)
}

fn token_from_query(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == TOKEN_QUERY_PARAM && !value.is_empty()).then(|| value.to_string())
    })
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            token_from_header(parts).or_else(|| token_from_query(parts)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_token_from_header() {
        let parts = parts("/catalogs", Some("Bearer abc.def.ghi"));
        assert_eq!(token_from_header(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_header_without_bearer_prefix_ignored() {
        let parts = parts("/catalogs", Some("Basic dXNlcjpwYXNz"));
        assert_eq!(token_from_header(&parts), None);
    }

    #[test]
    fn test_token_from_query() {
        let parts = parts("/catalogs?token=abc.def.ghi&limit=5", None);
        assert_eq!(token_from_query(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_empty_query_token_ignored() {
        let parts = parts("/catalogs?token=", None);
        assert_eq!(token_from_query(&parts), None);
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        let parts = parts("/catalogs?token=from-query", Some("Bearer from-header"));
        let token = token_from_header(&parts).or_else(|| token_from_query(&parts));
        assert_eq!(token.as_deref(), Some("from-header"));
    }
}
