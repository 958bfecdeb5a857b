//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use uhome_common::auth::OAuthClientError;
use uhome_domain::UHomeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub UHomeError);

impl From<InfraError> for UHomeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<UHomeError> for InfraError {
    fn from(value: UHomeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoUHomeError {
    fn into_uhome(self) -> UHomeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → UHomeError */
/* -------------------------------------------------------------------------- */

impl IntoUHomeError for HttpError {
    fn into_uhome(self) -> UHomeError {
        if self.is_timeout() {
            return UHomeError::Network(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return UHomeError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return UHomeError::InvalidResponse(format!("response body is not valid JSON: {self}"));
        }

        if let Some(status) = self.status() {
            return UHomeError::Api { status: status.as_u16(), body: self.to_string() };
        }

        UHomeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_uhome())
    }
}

/* -------------------------------------------------------------------------- */
/* OAuthClientError → UHomeError */
/* -------------------------------------------------------------------------- */

impl IntoUHomeError for OAuthClientError {
    fn into_uhome(self) -> UHomeError {
        match self {
            OAuthClientError::RequestFailed(err) => InfraError::from(err).0,
            OAuthClientError::TokenEndpoint { status, body } => {
                UHomeError::Authentication(format!("token endpoint returned {status}: {body}"))
            }
            OAuthClientError::MissingExpiry => {
                UHomeError::Authentication("token response is missing expires_in".into())
            }
            OAuthClientError::NoRefreshToken => {
                UHomeError::Authentication("no refresh token available".into())
            }
            OAuthClientError::ParseError(msg) => {
                UHomeError::Authentication(format!("unreadable token response: {msg}"))
            }
            OAuthClientError::ConfigError(msg) => UHomeError::Config(msg),
        }
    }
}

impl From<OAuthClientError> for InfraError {
    fn from(value: OAuthClientError) -> Self {
        InfraError(value.into_uhome())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn token_endpoint_rejection_is_an_authentication_error() {
        let err = OAuthClientError::TokenEndpoint { status: 400, body: "invalid_grant".into() };
        let mapped: UHomeError = InfraError::from(err).into();
        match mapped {
            UHomeError::Authentication(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("invalid_grant"));
            }
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[test]
    fn missing_expiry_is_an_authentication_error() {
        let mapped: UHomeError = InfraError::from(OAuthClientError::MissingExpiry).into();
        assert!(mapped.is_authentication());
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: UHomeError = InfraError::from(error).into();
        assert!(matches!(mapped, UHomeError::Network(_)), "got {mapped:?}");
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client
            .get(server.uri())
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap_err();

        let mapped: UHomeError = InfraError::from(error).into();
        assert!(matches!(mapped, UHomeError::InvalidResponse(_)), "got {mapped:?}");
    }
}
