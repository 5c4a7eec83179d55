//! Errors defined in [rfc6749].
//!
//! [rfc6749]: https://tools.ietf.org/html/rfc6749#section-5.2

use std::error;
use std::fmt;

/// The closed set of error kinds a flow operation may return.
///
/// Every back-end failure inside a flow is mapped onto exactly one of
/// these, fixed per step; the flow documentation lists the mapping. No
/// other error shape crosses the engine boundary.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// The resource owner or authorization server denied the request.
    ///
    /// Also the verdict on any access token that fails verification, as
    /// the resource server is not owed a distinction.
    AccessDenied,

    /// Client authentication failed (e.g., unknown client, no client
    /// authentication included, or unsupported authentication method).
    InvalidClient,

    /// The provided authorization grant (e.g., authorization code,
    /// resource owner credentials) or refresh token is invalid, expired,
    /// revoked, does not match the redirection URI used in the
    /// authorization request, or was issued to another client.
    InvalidGrant,

    /// The request is missing a required parameter, includes an invalid
    /// parameter value, includes a parameter more than once, or is
    /// otherwise malformed.
    InvalidRequest,

    /// The authorization handed to an issuance operation lacks a subject
    /// binding the requested artifact needs: issuing a refresh token
    /// requires both a client and a resource owner.
    InvalidAuthorization,

    /// The requested scope is invalid, unknown, malformed, or exceeds the
    /// scope granted by the resource owner.
    InvalidScope,

    /// The client is not authorized to request an authorization code
    /// using this method.
    UnauthorizedClient,

    /// The authorization server does not support obtaining an
    /// authorization code using this method.
    UnsupportedResponseType,

    /// A collaborator the server depends on misbehaved: token generation
    /// failed, or the back-end refused to persist or revoke an artifact.
    ServerError,

    /// The authorization server is currently unable to handle the request
    /// due to a temporary overloading or maintenance of the server.
    TemporarilyUnavailable,
}

impl Error {
    /// The rfc6749 error code for this kind.
    pub fn description(self) -> &'static str {
        match self {
            Error::AccessDenied => "access_denied",
            Error::InvalidClient => "invalid_client",
            Error::InvalidGrant => "invalid_grant",
            Error::InvalidRequest => "invalid_request",
            Error::InvalidAuthorization => "invalid_authorization",
            Error::InvalidScope => "invalid_scope",
            Error::UnauthorizedClient => "unauthorized_client",
            Error::UnsupportedResponseType => "unsupported_response_type",
            Error::ServerError => "server_error",
            Error::TemporarilyUnavailable => "temporarily_unavailable",
        }
    }
}

impl AsRef<str> for Error {
    fn as_ref(&self) -> &str {
        self.description()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl error::Error for Error {}
