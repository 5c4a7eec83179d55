//! The records a grant passes through on its way to an issued artifact.
//!
//! An [`Authorization`] is the engine's intermediate value between
//! credential validation and artifact issuance. It is produced by an
//! `authorize_*` flow, handed back to the caller, and consumed exactly once
//! by an `issue_*` operation; the engine neither persists nor caches it.
//! A [`GrantContext`] is what an issuance step derives from it: the owning
//! record a back-end stores next to each code or token, carrying an
//! absolute expiry instead of the authorization's relative lifetime.
//!
//! Client, resource owner and scope are deliberately opaque type
//! parameters. The engine compares clients by equality and otherwise only
//! moves these values around; their interpretation belongs to the back-end.
//!
//! [`Authorization`]: struct.Authorization.html
//! [`GrantContext`]: struct.GrantContext.html

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::Time;

/// A validated grant awaiting issuance.
///
/// At least one of `client` and `resource_owner` is present: flows for a
/// resource owner leave `client` unset until a confidential wrapper fills
/// it in, while the client credentials flow never carries an owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization<C, O, S> {
    /// The client the grant is issued to, if one was authenticated.
    pub client: Option<C>,

    /// The resource owner the grant acts on behalf of, absent for
    /// client-only grants.
    pub resource_owner: Option<O>,

    /// The effective scope, as returned by the back-end's scope verifier.
    /// This may be narrower than what was requested.
    pub scope: S,

    /// Relative lifetime of the artifact to be issued. Anchored to the
    /// wall clock only when issuance actually happens.
    pub ttl: Duration,
}

/// The owning record persisted alongside each issued artifact.
///
/// This can be stored in a database without worrying about lifetimes or
/// shared across thread boundaries. The serialized field names (`client`,
/// `resource_owner`, `expiry_time`, `scope`) and the second-resolution
/// integer timestamp are stable, so back-ends may persist the serde form
/// directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantContext<C, O, S> {
    /// The client the artifact is bound to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<C>,

    /// The resource owner the artifact acts for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_owner: Option<O>,

    /// Absolute instant at which the artifact stops being valid.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiry_time: Time,

    /// The effective scope granted.
    pub scope: S,
}

impl<C, O, S> Authorization<C, O, S> {
    /// An authorization for a resource owner without an identified client.
    pub fn resource_owner(resource_owner: O, scope: S, ttl: Duration) -> Self {
        Authorization {
            client: None,
            resource_owner: Some(resource_owner),
            scope,
            ttl,
        }
    }

    /// An authorization for a client acting on its own behalf.
    pub fn client_only(client: C, scope: S, ttl: Duration) -> Self {
        Authorization {
            client: Some(client),
            resource_owner: None,
            scope,
            ttl,
        }
    }

    /// Bind an authenticated client to this authorization.
    ///
    /// Used by the confidential and implicit password variants to enrich
    /// the result of the public flow. The only mutation an authorization
    /// sees after construction.
    pub fn with_client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    /// Consume the authorization into the context persisted with an
    /// artifact, anchoring its relative lifetime at `expiry_time`.
    pub fn into_context(self, expiry_time: Time) -> GrantContext<C, O, S> {
        GrantContext {
            client: self.client,
            resource_owner: self.resource_owner,
            expiry_time,
            scope: self.scope,
        }
    }
}
