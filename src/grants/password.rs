//! Resource owner password credentials authorization.
//!
//! Three variants of the same flow, distinguished by how much the client
//! has to prove: nothing (public clients), its identity
//! ([`authorize_password_confidential`]), or its identity plus a
//! registered redirection endpoint ([`authorize_password_implicit`], the
//! shape used when the credentials arrive through an implicit-grant style
//! authorization request).
//!
//! [`authorize_password_confidential`]: fn.authorize_password_confidential.html
//! [`authorize_password_implicit`]: fn.authorize_password_implicit.html

use url::Url;

use crate::endpoint::{AppCtxOf, AuthorizationOf, Endpoint, GrantType, OwnerOf, ScopeOf};
use crate::primitives::backend::Backend;
use crate::primitives::grant::Authorization;

use super::error::Error;
use super::Outcome;

/// Authorize a resource owner by credentials, for a public client.
///
/// Phases:
/// 1. Authenticate the resource owner (failure: `access_denied`).
/// 2. Verify the requested scope (failure: `invalid_scope`); the stored
///    scope is the verifier's possibly narrowed return value.
///
/// The authorization carries no client and the password-credentials
/// lifetime.
pub fn authorize_password<E: Endpoint>(
    handler: &mut E,
    username: &str,
    password: &str,
    scope: ScopeOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, AuthorizationOf<E>> {
    let (ctx, owner) = handler
        .backend()
        .authenticate_username_password(username, password, ctx)
        .map_err(|_| Error::AccessDenied)?;

    let (ctx, scope) = handler
        .backend()
        .verify_resowner_scope(&owner, scope, ctx)
        .map_err(|_| Error::InvalidScope)?;

    let ttl = handler.expiry_time(GrantType::Password);
    Ok((ctx, Authorization::resource_owner(owner, scope, ttl)))
}

/// Authorize a resource owner through a confidential client.
///
/// Authenticates the client first (failure: `invalid_client`), then runs
/// [`authorize_password`] and binds the client to its result. Errors of
/// the inner flow surface unchanged.
///
/// [`authorize_password`]: fn.authorize_password.html
pub fn authorize_password_confidential<E: Endpoint>(
    handler: &mut E,
    client_id: &str,
    client_secret: &str,
    username: &str,
    password: &str,
    scope: ScopeOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, AuthorizationOf<E>> {
    let (ctx, client) = handler
        .backend()
        .authenticate_client(client_id, client_secret, ctx)
        .map_err(|_| Error::InvalidClient)?;

    let (ctx, authorization) = authorize_password(handler, username, password, scope, ctx)?;
    Ok((ctx, authorization.with_client(client)))
}

/// Authorize a resource owner through a client presenting a redirection
/// endpoint.
///
/// Phases:
/// 1. Authenticate the client (failure: `invalid_client`).
/// 2. Check the redirection uri against the registration (failure:
///    `invalid_grant`).
/// 3. Run [`authorize_password`]; its errors surface unchanged.
///
/// [`authorize_password`]: fn.authorize_password.html
pub fn authorize_password_implicit<E: Endpoint>(
    handler: &mut E,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &Url,
    username: &str,
    password: &str,
    scope: ScopeOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, AuthorizationOf<E>> {
    let (ctx, client) = handler
        .backend()
        .authenticate_client(client_id, client_secret, ctx)
        .map_err(|_| Error::InvalidClient)?;

    let ctx = handler
        .backend()
        .verify_redirection_uri(&client, redirect_uri, ctx)
        .map_err(|_| Error::InvalidGrant)?;

    let (ctx, authorization) = authorize_password(handler, username, password, scope, ctx)?;
    Ok((ctx, authorization.with_client(client)))
}

/// Authorize a resource owner the caller has already authenticated.
///
/// Only the scope is verified (failure: `invalid_scope`); useful when a
/// session layer in front of the engine owns credential handling.
pub fn authorize_resource_owner<E: Endpoint>(
    handler: &mut E,
    resource_owner: OwnerOf<E>,
    scope: ScopeOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, AuthorizationOf<E>> {
    let (ctx, scope) = handler
        .backend()
        .verify_resowner_scope(&resource_owner, scope, ctx)
        .map_err(|_| Error::InvalidScope)?;

    let ttl = handler.expiry_time(GrantType::Password);
    Ok((ctx, Authorization::resource_owner(resource_owner, scope, ttl)))
}
