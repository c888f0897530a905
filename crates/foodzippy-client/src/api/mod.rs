//! Endpoint bindings, one module per admin area
//!
//! Each module extends [`ApiClient`](crate::ApiClient) with the calls of its
//! area and unwraps the server's response envelope.

pub mod attendance;
pub mod content;
pub mod edit_requests;
pub mod email;
pub mod forms;
pub mod notifications;
pub mod payments;
pub mod users;
pub mod vendor_types;
pub mod vendors;

use crate::error::{ClientError, ClientResult};

/// Unwrap an optional payload, reporting the missing resource
pub(crate) fn required<T>(payload: Option<T>, resource: &str) -> ClientResult<T> {
    payload.ok_or_else(|| {
        ClientError::Core(foodzippy_core::Error::NotFound {
            resource: resource.to_string(),
        })
    })
}

/// Percent-encode a path segment taken from user input
pub(crate) fn segment(id: &str) -> String {
    id.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("64f1a2b3c4"), "64f1a2b3c4");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_required_reports_resource() {
        let err = required::<u8>(None, "vendor v1").unwrap_err();
        assert_eq!(err.to_string(), "Resource not found: vendor v1");
    }
}
