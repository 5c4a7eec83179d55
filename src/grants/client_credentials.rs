//! Client credentials authorization.

use crate::endpoint::{AppCtxOf, AuthorizationOf, Endpoint, GrantType, ScopeOf};
use crate::primitives::backend::Backend;
use crate::primitives::grant::Authorization;

use super::error::Error;
use super::Outcome;

/// Authorize a client acting on its own behalf.
///
/// Phases:
/// 1. Authenticate the client (failure: `invalid_client`).
/// 2. Verify the requested scope against the client's registration
///    (failure: `invalid_scope`).
///
/// The authorization carries no resource owner and the client-credentials
/// lifetime. Since it lacks an owner it can never be issued a refresh
/// token, as [RFC 6749 section 4.4.3] recommends.
///
/// [RFC 6749 section 4.4.3]: https://tools.ietf.org/html/rfc6749#section-4.4.3
pub fn authorize_client_credentials<E: Endpoint>(
    handler: &mut E,
    client_id: &str,
    client_secret: &str,
    scope: ScopeOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, AuthorizationOf<E>> {
    let (ctx, client) = handler
        .backend()
        .authenticate_client(client_id, client_secret, ctx)
        .map_err(|_| Error::InvalidClient)?;

    let (ctx, scope) = handler
        .backend()
        .verify_client_scope(&client, scope, ctx)
        .map_err(|_| Error::InvalidScope)?;

    let ttl = handler.expiry_time(GrantType::ClientCredentials);
    Ok((ctx, Authorization::client_only(client, scope, ttl)))
}
