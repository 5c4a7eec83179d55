//! Verification of issued artifacts.
//!
//! Both verifiers resolve an artifact to its grant context and check the
//! absolute expiry recorded at issuance. An expired artifact is revoked
//! on sight, best effort: the revocation result never changes the
//! returned error.
//!
//! The error vocabulary is asymmetric by design: code verification is an
//! authorization-server concern and speaks `invalid_grant`, while token
//! verification answers a resource server and only ever says
//! `access_denied`.

use log::warn;

use crate::endpoint::{AppCtxOf, ClientOf, Endpoint, GrantContextOf};
use crate::primitives::backend::Backend;
use crate::primitives::clock;

use super::error::Error;
use super::Outcome;

/// Resolve an authorization code and check that it is still alive.
///
/// Resolution failure and expiry both yield `invalid_grant`; an expired
/// code is additionally revoked.
pub fn verify_access_code<E: Endpoint>(
    handler: &mut E,
    code: &str,
    ctx: AppCtxOf<E>,
) -> Outcome<E, GrantContextOf<E>> {
    let (ctx, grant) = handler
        .backend()
        .resolve_access_code(code, ctx)
        .map_err(|_| Error::InvalidGrant)?;

    if grant.expiry_time > clock::now() {
        return Ok((ctx, grant));
    }

    if handler.backend().revoke_access_code(code, ctx).is_err() {
        warn!("back-end failed to revoke an expired access code");
    }
    Err(Error::InvalidGrant)
}

/// Resolve an authorization code and check that it belongs to `client`.
///
/// Runs [`verify_access_code`], then compares the grant context's bound
/// client with the presented one. A mismatch, or a context without any
/// client at all, yields `invalid_grant`.
///
/// [`verify_access_code`]: fn.verify_access_code.html
pub fn verify_access_code_for_client<E: Endpoint>(
    handler: &mut E,
    code: &str,
    client: &ClientOf<E>,
    ctx: AppCtxOf<E>,
) -> Outcome<E, GrantContextOf<E>> {
    let (ctx, grant) = verify_access_code(handler, code, ctx)?;
    if grant.client.as_ref() != Some(client) {
        return Err(Error::InvalidGrant);
    }
    Ok((ctx, grant))
}

/// Resolve an access token and check that it is still alive.
///
/// Resolution failure and expiry both yield `access_denied`; an expired
/// token is additionally revoked.
pub fn verify_access_token<E: Endpoint>(
    handler: &mut E,
    token: &str,
    ctx: AppCtxOf<E>,
) -> Outcome<E, GrantContextOf<E>> {
    let (ctx, grant) = handler
        .backend()
        .resolve_access_token(token, ctx)
        .map_err(|_| Error::AccessDenied)?;

    if grant.expiry_time > clock::now() {
        return Ok((ctx, grant));
    }

    if handler.backend().revoke_access_token(token, ctx).is_err() {
        warn!("back-end failed to revoke an expired access token");
    }
    Err(Error::AccessDenied)
}
