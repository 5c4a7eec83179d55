//! Issuance of codes and tokens from a validated authorization.
//!
//! Issuance is where relative lifetimes become absolute: each operation
//! anchors the authorization's ttl at the current wall clock, builds the
//! grant context, obtains token material from the generator and persists
//! the association before shaping the response. Collaborator failures,
//! whether in token generation or persistence, map to `server_error`.

use crate::endpoint::{AppCtxOf, AuthorizationOf, Endpoint, ResponseOf};
use crate::primitives::backend::Backend;
use crate::primitives::clock;
use crate::primitives::generator::TokenGenerator;
use crate::response::Response;

use super::error::Error;
use super::Outcome;

/// Issue an authorization code for a validated code request.
///
/// The response carries no token material: only the code itself, the
/// relative lifetime, the resource owner and the effective scope.
pub fn issue_code<E: Endpoint>(
    handler: &mut E,
    authorization: AuthorizationOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, ResponseOf<E>> {
    let ttl = authorization.ttl;
    let grant = authorization.into_context(clock::now_plus(ttl));

    let code = handler
        .generator()
        .generate(&grant)
        .map_err(|_| Error::ServerError)?;

    let resource_owner = grant.resource_owner.clone();
    let scope = grant.scope.clone();

    let ctx = handler
        .backend()
        .associate_access_code(&code, grant, ctx)
        .map_err(|_| Error::ServerError)?;

    Ok((ctx, Response::code(ttl, resource_owner, scope, code)))
}

/// Issue an access token for any authorization.
pub fn issue_token<E: Endpoint>(
    handler: &mut E,
    authorization: AuthorizationOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, ResponseOf<E>> {
    let ttl = authorization.ttl;
    let grant = authorization.into_context(clock::now_plus(ttl));

    let token = handler
        .generator()
        .generate(&grant)
        .map_err(|_| Error::ServerError)?;

    let resource_owner = grant.resource_owner.clone();
    let scope = grant.scope.clone();

    let ctx = handler
        .backend()
        .associate_access_token(&token, grant, ctx)
        .map_err(|_| Error::ServerError)?;

    Ok((ctx, Response::token(token, ttl, resource_owner, scope)))
}

/// Issue an access token together with a refresh token.
///
/// Only authorizations binding BOTH a client and a resource owner qualify;
/// anything else is rejected with `invalid_authorization` before any
/// collaborator is consulted. Both tokens are generated over the identical
/// grant context, and the access token is associated before the refresh
/// token.
pub fn issue_token_and_refresh<E: Endpoint>(
    handler: &mut E,
    authorization: AuthorizationOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, ResponseOf<E>> {
    if authorization.client.is_none() || authorization.resource_owner.is_none() {
        return Err(Error::InvalidAuthorization);
    }

    let ttl = authorization.ttl;
    let grant = authorization.into_context(clock::now_plus(ttl));

    let access_token = handler
        .generator()
        .generate(&grant)
        .map_err(|_| Error::ServerError)?;
    let refresh_token = handler
        .generator()
        .generate(&grant)
        .map_err(|_| Error::ServerError)?;

    let resource_owner = grant.resource_owner.clone();
    let scope = grant.scope.clone();

    let ctx = handler
        .backend()
        .associate_access_token(&access_token, grant.clone(), ctx)
        .map_err(|_| Error::ServerError)?;
    let ctx = handler
        .backend()
        .associate_refresh_token(&refresh_token, grant, ctx)
        .map_err(|_| Error::ServerError)?;

    let response = Response::token_and_refresh(access_token, ttl, resource_owner, scope, refresh_token);
    Ok((ctx, response))
}
