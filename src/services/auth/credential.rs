//! Bearer credential extraction.
//!
//! The gate only needs to read one header, so requests are abstracted as
//! [`HeaderSource`] instead of a concrete framework request type.

use axum::http::HeaderMap;

use crate::services::auth::gate::RejectReason;

pub const AUTHORIZATION: &str = "authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// Anything that can hand out the raw bytes of a named header.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<&[u8]>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.get(name).map(|v| v.as_bytes())
    }
}

/// Extract the raw token from `Authorization: Bearer <token>`.
///
/// Only the leading prefix is removed: `"Bearer xBearer y"` yields `"xBearer y"`.
pub fn bearer_token<R>(req: &R) -> Result<&str, RejectReason>
where
    R: HeaderSource + ?Sized,
{
    let raw = req
        .header(AUTHORIZATION)
        .ok_or(RejectReason::MissingCredential)?;

    let value = std::str::from_utf8(raw).map_err(|_| RejectReason::MalformedCredential)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(RejectReason::MalformedCredential)?;

    if token.is_empty() {
        return Err(RejectReason::MalformedCredential);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::collections::HashMap;

    struct FakeRequest(HashMap<String, Vec<u8>>);

    impl FakeRequest {
        fn with_auth(value: &str) -> Self {
            let mut headers = HashMap::new();
            headers.insert(AUTHORIZATION.to_string(), value.as_bytes().to_vec());
            Self(headers)
        }

        fn empty() -> Self {
            Self(HashMap::new())
        }
    }

    impl HeaderSource for FakeRequest {
        fn header(&self, name: &str) -> Option<&[u8]> {
            self.0.get(name).map(Vec::as_slice)
        }
    }

    #[test]
    fn missing_header_is_missing_credential() {
        let req = FakeRequest::empty();
        assert_eq!(bearer_token(&req), Err(RejectReason::MissingCredential));
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        for value in ["Token abc", "bearer abc", "Bearerabc", "BEARER abc", " Bearer abc"] {
            let req = FakeRequest::with_auth(value);
            assert_eq!(
                bearer_token(&req),
                Err(RejectReason::MalformedCredential),
                "value: {value:?}"
            );
        }
    }

    #[test]
    fn empty_token_is_malformed() {
        let req = FakeRequest::with_auth("Bearer ");
        assert_eq!(bearer_token(&req), Err(RejectReason::MalformedCredential));
    }

    #[test]
    fn strips_only_the_leading_prefix() {
        let req = FakeRequest::with_auth("Bearer xBearer y");
        assert_eq!(bearer_token(&req), Ok("xBearer y"));
    }

    #[test]
    fn keeps_token_whitespace_as_is() {
        let req = FakeRequest::with_auth("Bearer  abc");
        assert_eq!(bearer_token(&req), Ok(" abc"));
    }

    #[test]
    fn header_map_is_a_header_source() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        );
        assert_eq!(bearer_token(&headers), Ok("good-token"));
    }

    #[test]
    fn non_utf8_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").expect("opaque header bytes"),
        );
        assert_eq!(bearer_token(&headers), Err(RejectReason::MalformedCredential));
    }
}
