//! The client-visible outcome of a successful issuance.
//!
//! A [`Response`] is what an `issue_*` operation hands back next to the
//! advanced application context. Front-ends either read the typed fields
//! directly or serialize the whole value; absent artifacts disappear from
//! the serialized form, and the resource owner, being server-side
//! bookkeeping rather than client data, is never serialized at all.
//!
//! [`Response`]: struct.Response.html

use chrono::Duration;
use serde::Serialize;

/// A successful issuance result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response<O, S> {
    /// The access token, absent when only a code was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Fixed to `bearer` whenever an access token is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Validity of the issued artifact in seconds, relative to issuance.
    pub expires_in: i64,

    /// The effective scope of the artifact.
    pub scope: S,

    /// The refresh token, present only when one was issued alongside the
    /// access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// The authorization code, present only for code issuance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,

    /// The resource owner the artifact was issued for. Never serialized.
    #[serde(skip)]
    pub resource_owner: Option<O>,
}

impl<O, S> Response<O, S> {
    /// Shape the response for a bare access token.
    pub fn token(access_token: String, ttl: Duration, resource_owner: Option<O>, scope: S) -> Self {
        Response {
            access_token: Some(access_token),
            token_type: Some("bearer".to_owned()),
            expires_in: ttl.num_seconds(),
            scope,
            refresh_token: None,
            access_code: None,
            resource_owner,
        }
    }

    /// Shape the response for an access token with an accompanying
    /// refresh token.
    pub fn token_and_refresh(
        access_token: String,
        ttl: Duration,
        resource_owner: Option<O>,
        scope: S,
        refresh_token: String,
    ) -> Self {
        Response {
            access_token: Some(access_token),
            token_type: Some("bearer".to_owned()),
            expires_in: ttl.num_seconds(),
            scope,
            refresh_token: Some(refresh_token),
            access_code: None,
            resource_owner,
        }
    }

    /// Shape the response for a fresh authorization code.
    pub fn code(ttl: Duration, resource_owner: Option<O>, scope: S, access_code: String) -> Self {
        Response {
            access_token: None,
            token_type: None,
            expires_in: ttl.num_seconds(),
            scope,
            refresh_token: None,
            access_code: Some(access_code),
            resource_owner,
        }
    }

    /// Convert the response into a json string, viable for being sent
    /// over a network with `application/json` encoding.
    pub fn to_json(&self) -> String
    where
        S: Serialize,
    {
        serde_json::to_string(self).unwrap()
    }
}
