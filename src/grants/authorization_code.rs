//! Authorization code requests and their exchange for tokens.
//!
//! Two sides of the same grant. [`authorize_code_request`] runs at the
//! authorization endpoint and validates everything needed to mint a code;
//! [`authorize_code_grant`] runs at the token endpoint when the client
//! presents that code. The error vocabulary differs between the two on
//! purpose: a bad redirection uri rejects the *client* during the
//! authorization request (`unauthorized_client`) but invalidates the
//! *grant* during the exchange (`invalid_grant`).
//!
//! [`authorize_code_request`]: fn.authorize_code_request.html
//! [`authorize_code_grant`]: fn.authorize_code_grant.html

use log::warn;
use url::Url;

use crate::endpoint::{AppCtxOf, AuthorizationOf, Endpoint, GrantType, ScopeOf};
use crate::primitives::backend::Backend;
use crate::primitives::grant::Authorization;

use super::error::Error;
use super::verify::verify_access_code_for_client;
use super::Outcome;

/// Validate an authorization request for a code.
///
/// Phases:
/// 1. Look up the client identity (failure: `unauthorized_client`).
/// 2. Check the redirection uri (failure: `unauthorized_client`).
/// 3. Authenticate the resource owner (failure: `access_denied`).
/// 4. Verify the requested scope (failure: `invalid_scope`).
///
/// The authorization binds both the client and the owner and carries the
/// authorization-code lifetime; hand it to
/// [`issue_code`](../issue/fn.issue_code.html).
pub fn authorize_code_request<E: Endpoint>(
    handler: &mut E,
    client_id: &str,
    redirect_uri: &Url,
    username: &str,
    password: &str,
    scope: ScopeOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, AuthorizationOf<E>> {
    let (ctx, client) = handler
        .backend()
        .get_client_identity(client_id, ctx)
        .map_err(|_| Error::UnauthorizedClient)?;

    let ctx = handler
        .backend()
        .verify_redirection_uri(&client, redirect_uri, ctx)
        .map_err(|_| Error::UnauthorizedClient)?;

    let (ctx, owner) = handler
        .backend()
        .authenticate_username_password(username, password, ctx)
        .map_err(|_| Error::AccessDenied)?;

    let (ctx, scope) = handler
        .backend()
        .verify_resowner_scope(&owner, scope, ctx)
        .map_err(|_| Error::InvalidScope)?;

    let authorization = Authorization {
        client: Some(client),
        resource_owner: Some(owner),
        scope,
        ttl: handler.expiry_time(GrantType::AuthorizationCode),
    };

    Ok((ctx, authorization))
}

/// Exchange an authorization code for a token-issuing authorization.
///
/// Phases:
/// 1. Authenticate the client (failure: `invalid_client`).
/// 2. Check the redirection uri (failure: `invalid_grant`).
/// 3. Resolve the code, check it is alive and was issued to this client
///    (failure: `invalid_grant`, propagated from
///    [`verify_access_code_for_client`]).
/// 4. Revoke the code. Codes are single use; the code is gone before the
///    caller ever sees the authorization.
///
/// The subject bindings and scope are taken from the resolved grant
/// context; the lifetime is the password-credentials one, not whatever
/// remained on the code.
///
/// [`verify_access_code_for_client`]: ../verify/fn.verify_access_code_for_client.html
pub fn authorize_code_grant<E: Endpoint>(
    handler: &mut E,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &Url,
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

    let (ctx, grant) = verify_access_code_for_client(handler, code, &client, ctx)?;

    // A back-end that cannot forget a code it just resolved is broken;
    // the exchange must not hand out an authorization for a code that
    // might be replayed.
    let ctx = match handler.backend().revoke_access_code(code, ctx) {
        Ok(ctx) => ctx,
        Err(_) => {
            warn!("back-end failed to revoke access code during exchange");
            return Err(Error::ServerError);
        }
    };

    let authorization = Authorization {
        client: Some(client),
        resource_owner: grant.resource_owner,
        scope: grant.scope,
        ttl: handler.expiry_time(GrantType::Password),
    };

    Ok((ctx, authorization))
}
