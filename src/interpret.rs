//! Classification and decoding of raw HTTP responses.
//!
//! [`classify`] maps a [`RawResponse`] to exactly one [`Outcome`];
//! [`interpret`] then turns that outcome into a [`Response<T>`] or an
//! [`Error`]. Both are pure, so they can be tested without a server.

use crate::{metadata::BodyPolicy, transport::RawResponse, Error, Response, Result};
use http::StatusCode;
use serde::de::DeserializeOwned;

/// The class a response falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx with a non-empty body.
    Body,
    /// 2xx with an empty body, and the request allows that.
    Empty,
    /// 2xx with an empty body although one was required.
    MissingBody,
    /// 401 or 403.
    AuthRejected,
    /// Any other non-success status below 500.
    ClientError,
    /// 500 and above.
    ServerError,
}

/// Classifies `raw` under `policy`.
///
/// # Examples
///
/// ```
/// use wpclient::interpret::{classify, Outcome};
/// use wpclient::{metadata::BodyPolicy, RawResponse};
/// use http::StatusCode;
///
/// let raw = RawResponse::new(StatusCode::NO_CONTENT, "");
/// assert_eq!(classify(&raw, BodyPolicy::EmptyOk), Outcome::Empty);
/// assert_eq!(classify(&raw, BodyPolicy::Required), Outcome::MissingBody);
/// ```
pub fn classify(raw: &RawResponse, policy: BodyPolicy) -> Outcome {
    outcome_of(raw.status, &raw.body, policy)
}

fn outcome_of(status: StatusCode, body: &str, policy: BodyPolicy) -> Outcome {
    if status.is_success() {
        if !body.trim().is_empty() {
            Outcome::Body
        } else if policy == BodyPolicy::EmptyOk {
            Outcome::Empty
        } else {
            Outcome::MissingBody
        }
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Outcome::AuthRejected
    } else if status.is_server_error() {
        Outcome::ServerError
    } else {
        Outcome::ClientError
    }
}

/// Interprets `raw` as a `T`, allowing an empty body when `policy` says so.
///
/// An allowed empty body yields `T::default()`.
///
/// # Errors
///
/// Returns [`Error::Deserialization`] for undecodable or missing bodies,
/// [`Error::AuthRejected`] for 401/403, [`Error::ClientError`] for other
/// statuses below 500 and [`Error::ServerError`] for 5xx.
pub fn interpret<T>(raw: RawResponse, policy: BodyPolicy) -> Result<Response<T>>
where
    T: DeserializeOwned + Default,
{
    interpret_with(raw, policy, Some(T::default))
}

/// Interprets `raw` as a `T` that must be present in the body.
///
/// # Errors
///
/// Same as [`interpret`] with [`BodyPolicy::Required`].
pub fn interpret_required<T>(raw: RawResponse) -> Result<Response<T>>
where
    T: DeserializeOwned,
{
    interpret_with(raw, BodyPolicy::Required, None)
}

fn interpret_with<T>(
    raw: RawResponse,
    policy: BodyPolicy,
    empty: Option<fn() -> T>,
) -> Result<Response<T>>
where
    T: DeserializeOwned,
{
    let RawResponse {
        status,
        headers,
        body,
        latency,
    } = raw;

    match (outcome_of(status, &body, policy), empty) {
        (Outcome::Body, _) => match serde_json::from_str::<T>(&body) {
            Ok(data) => Ok(Response::new(data, body, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %body,
                    type_name = std::any::type_name::<T>(),
                    "Failed to deserialize response"
                );
                Err(Error::Deserialization {
                    raw_response: body,
                    serde_error: e.to_string(),
                    status,
                    type_name: std::any::type_name::<T>(),
                })
            }
        },
        (Outcome::Empty, Some(default)) => {
            Ok(Response::new(default(), body, status, headers, latency))
        }
        (Outcome::Empty | Outcome::MissingBody, _) => {
            tracing::error!(
                status = status.as_u16(),
                type_name = std::any::type_name::<T>(),
                "Expected a response body but received none"
            );
            Err(Error::Deserialization {
                raw_response: body,
                serde_error: "expected a JSON body, got an empty response".to_string(),
                status,
                type_name: std::any::type_name::<T>(),
            })
        }
        (Outcome::AuthRejected, _) => {
            tracing::warn!(
                status = status.as_u16(),
                response = %body,
                "Credentials rejected"
            );
            Err(Error::AuthRejected {
                status,
                raw_response: body,
            })
        }
        (Outcome::ClientError, _) => {
            tracing::warn!(
                status = status.as_u16(),
                response = %body,
                "Client error (4xx)"
            );
            Err(Error::ClientError {
                status,
                raw_response: body,
                headers,
            })
        }
        (Outcome::ServerError, _) => {
            tracing::error!(
                status = status.as_u16(),
                response = %body,
                "Server error (5xx)"
            );
            Err(Error::ServerError {
                status,
                raw_response: body,
                headers,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse::new(StatusCode::from_u16(status).unwrap(), body)
    }

    #[test]
    fn test_decodes_success_body() {
        let response = interpret_required::<Item>(raw(200, r#"{"id":1}"#)).unwrap();
        assert_eq!(response.data, Item { id: 1 });
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.raw_body, r#"{"id":1}"#);
    }

    #[test]
    fn test_malformed_body_is_deserialization_error() {
        let err = interpret_required::<Item>(raw(200, r#"{"id":"#)).unwrap_err();
        match err {
            Error::Deserialization {
                raw_response,
                status,
                type_name,
                ..
            } => {
                assert_eq!(raw_response, r#"{"id":"#);
                assert_eq!(status, StatusCode::OK);
                assert!(type_name.ends_with("Item"));
            }
            other => panic!("Expected Deserialization, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_with_empty_ok_yields_default() {
        let response = interpret::<Item>(raw(204, ""), BodyPolicy::EmptyOk).unwrap();
        assert_eq!(response.data, Item::default());
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_empty_body_when_required_is_an_error() {
        let err = interpret::<Item>(raw(200, ""), BodyPolicy::Required).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));

        let err = interpret_required::<Item>(raw(200, "  \n")).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn test_empty_ok_still_decodes_present_body() {
        let response = interpret::<Item>(raw(200, r#"{"id":7}"#), BodyPolicy::EmptyOk).unwrap();
        assert_eq!(response.data.id, 7);
    }

    #[test]
    fn test_auth_statuses() {
        for status in [401, 403] {
            let err = interpret_required::<Item>(raw(status, "denied")).unwrap_err();
            match err {
                Error::AuthRejected {
                    status: got,
                    raw_response,
                } => {
                    assert_eq!(got.as_u16(), status);
                    assert_eq!(raw_response, "denied");
                }
                other => panic!("Expected AuthRejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_not_found_is_client_error() {
        let err = interpret_required::<Item>(raw(404, r#"{"code":"rest_no_route"}"#)).unwrap_err();
        match err {
            Error::ClientError {
                status,
                raw_response,
                ..
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(raw_response, r#"{"code":"rest_no_route"}"#);
            }
            other => panic!("Expected ClientError, got {other:?}"),
        }
    }

    #[test]
    fn test_server_error() {
        let err = interpret::<Item>(raw(500, "boom"), BodyPolicy::EmptyOk).unwrap_err();
        assert!(matches!(err, Error::ServerError { status, .. } if status.as_u16() == 500));
    }

    #[test]
    fn test_failure_log_levels() {
        use std::sync::{Arc, Mutex};
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct Levels(Arc<Mutex<Vec<Level>>>);

        impl<S: Subscriber> Layer<S> for Levels {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                self.0.lock().unwrap().push(*event.metadata().level());
            }
        }

        let levels_for = |status: u16| {
            let levels = Arc::new(Mutex::new(Vec::new()));
            let subscriber = tracing_subscriber::registry().with(Levels(levels.clone()));
            tracing::subscriber::with_default(subscriber, || {
                let _ = interpret_required::<Item>(raw(status, "x"));
            });
            let levels = levels.lock().unwrap().clone();
            levels
        };

        assert_eq!(levels_for(404), vec![Level::WARN]);
        assert_eq!(levels_for(503), vec![Level::ERROR]);
    }

    #[test]
    fn test_every_status_has_one_outcome() {
        for code in 100..600u16 {
            let Ok(status) = StatusCode::from_u16(code) else {
                continue;
            };
            let outcome = classify(&RawResponse::new(status, "x"), BodyPolicy::Required);
            let expected = match code {
                200..=299 => Outcome::Body,
                401 | 403 => Outcome::AuthRejected,
                500..=599 => Outcome::ServerError,
                _ => Outcome::ClientError,
            };
            assert_eq!(outcome, expected, "status {code}");
        }
    }
}
