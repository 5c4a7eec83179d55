//! Retrieve a fresh access token from a refresh token.

use log::warn;

use crate::endpoint::{AppCtxOf, Endpoint, GrantType, ResponseOf, ScopeOf};
use crate::primitives::backend::Backend;
use crate::primitives::clock;
use crate::primitives::grant::{Authorization, GrantContext};

use super::error::Error;
use super::issue::issue_token;
use super::Outcome;

/// Trade a refresh token for a new access token.
///
/// Phases:
/// 1. Authenticate the requesting client (failure: `invalid_client`).
/// 2. Resolve the refresh token (failure: `invalid_grant`) and check it is
///    alive; an expired token is revoked on sight, then `invalid_grant`.
/// 3. Ensure the token was issued to the authenticated client; a grant
///    bound to another client, or to none, is `invalid_grant`.
/// 4. Verify the requested scope against the originally granted one
///    (failure: `invalid_scope`).
/// 5. Issue an access token with the password-credentials lifetime.
///
/// No new refresh token accompanies the response; the presented one stays
/// valid until it expires or is revoked.
pub fn refresh_access_token<E: Endpoint>(
    handler: &mut E,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
    scope: ScopeOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, ResponseOf<E>> {
    let (ctx, client) = handler
        .backend()
        .authenticate_client(client_id, client_secret, ctx)
        .map_err(|_| Error::InvalidClient)?;

    let (ctx, grant) = handler
        .backend()
        .resolve_refresh_token(refresh_token, ctx)
        .map_err(|_| Error::InvalidGrant)?;

    if grant.expiry_time <= clock::now() {
        if handler.backend().revoke_refresh_token(refresh_token, ctx).is_err() {
            warn!("back-end failed to revoke an expired refresh token");
        }
        return Err(Error::InvalidGrant);
    }

    let GrantContext {
        client: bound,
        resource_owner,
        scope: registered,
        ..
    } = grant;

    if bound.as_ref() != Some(&client) {
        return Err(Error::InvalidGrant);
    }

    let (ctx, scope) = handler
        .backend()
        .verify_scope(registered, scope, ctx)
        .map_err(|_| Error::InvalidScope)?;

    let authorization = Authorization {
        client: Some(client),
        resource_owner,
        scope,
        // Freshly minted tokens live as long as a password grant would,
        // not as long as the original grant had left.
        ttl: handler.expiry_time(GrantType::Password),
    };

    issue_token(handler, authorization, ctx)
}
