//! End-to-end runs of the grant flows over the in-memory back-end.

use chrono::Duration;
use url::Url;

use oauth2_engine::endpoint::{Generic, Lifetimes};
use oauth2_engine::grants::authorization_code::{authorize_code_grant, authorize_code_request};
use oauth2_engine::grants::client_credentials::authorize_client_credentials;
use oauth2_engine::grants::error::Error;
use oauth2_engine::grants::issue::{issue_code, issue_token, issue_token_and_refresh};
use oauth2_engine::grants::password::{authorize_password, authorize_password_confidential};
use oauth2_engine::grants::refresh::refresh_access_token;
use oauth2_engine::grants::verify::verify_access_token;
use oauth2_engine::primitives::generator::RandomGenerator;
use oauth2_engine::primitives::memory::{Client, MemoryBackend};
use oauth2_engine::primitives::scope::Scope;

const CLIENT_ID: &str = "ClientId";
const CLIENT_SECRET: &str = "VGhpcyBpcyBhIHZlcnkgc2VjdXJlIHBhc3NwaHJhc2UK";
const OWNER: &str = "Owner";
const OWNER_PASSWORD: &str = "owner-secret";
const REDIRECT_URI: &str = "https://client.example/endpoint";

fn scope(string: &str) -> Scope {
    string.parse().unwrap()
}

fn redirect_uri() -> Url {
    REDIRECT_URI.parse().unwrap()
}

fn setup() -> Generic<MemoryBackend, RandomGenerator> {
    let mut backend = MemoryBackend::new();
    backend.register_client(Client::confidential(
        CLIENT_ID,
        redirect_uri(),
        scope("account:read account:write"),
        CLIENT_SECRET.as_bytes(),
    ));
    backend.register_owner(OWNER, OWNER_PASSWORD.as_bytes(), scope("account:read account:write"));

    Generic {
        backend,
        generator: RandomGenerator::new(16),
        lifetimes: Lifetimes::default(),
    }
}

#[test]
fn password_grant_with_refresh_cycle() {
    let mut endpoint = setup();

    let (ctx, authorization) = authorize_password_confidential(
        &mut endpoint,
        CLIENT_ID,
        CLIENT_SECRET,
        OWNER,
        OWNER_PASSWORD,
        scope("account:read"),
        (),
    )
    .expect("registered credentials should authorize");

    assert_eq!(authorization.scope, scope("account:read"));

    let (ctx, response) = issue_token_and_refresh(&mut endpoint, authorization, ctx)
        .expect("a full authorization should issue both tokens");

    let access_token = response.access_token.clone().unwrap();
    let refresh_token = response.refresh_token.clone().unwrap();
    assert_ne!(access_token, refresh_token);
    assert_eq!(response.expires_in, 3600);

    let (ctx, grant) = verify_access_token(&mut endpoint, &access_token, ctx)
        .expect("a freshly issued token should verify");
    assert_eq!(grant.resource_owner, Some(OWNER.to_string()));
    assert_eq!(grant.client, Some(CLIENT_ID.to_string()));

    // Trade the refresh token for a new access token with a narrower scope.
    let (ctx, refreshed) = refresh_access_token(
        &mut endpoint,
        CLIENT_ID,
        CLIENT_SECRET,
        &refresh_token,
        scope("account:read"),
        ctx,
    )
    .expect("a live refresh token should refresh");

    assert_eq!(refreshed.refresh_token, None);
    assert_eq!(refreshed.scope, scope("account:read"));

    let new_access = refreshed.access_token.unwrap();
    assert_ne!(new_access, access_token);
    verify_access_token(&mut endpoint, &new_access, ctx)
        .expect("the refreshed token should verify");
}

#[test]
fn refresh_with_wrong_secret_fails() {
    let mut endpoint = setup();

    let (ctx, authorization) = authorize_password_confidential(
        &mut endpoint,
        CLIENT_ID,
        CLIENT_SECRET,
        OWNER,
        OWNER_PASSWORD,
        scope("account:read"),
        (),
    )
    .unwrap();
    let (ctx, response) = issue_token_and_refresh(&mut endpoint, authorization, ctx).unwrap();

    let result = refresh_access_token(
        &mut endpoint,
        CLIENT_ID,
        "not-the-secret",
        response.refresh_token.as_ref().unwrap(),
        scope(""),
        ctx,
    );
    assert_eq!(result.unwrap_err(), Error::InvalidClient);
}

#[test]
fn authorization_code_roundtrip() {
    let mut endpoint = setup();

    let (ctx, authorization) = authorize_code_request(
        &mut endpoint,
        CLIENT_ID,
        &redirect_uri(),
        OWNER,
        OWNER_PASSWORD,
        scope("account:read"),
        (),
    )
    .expect("the code request should pass");

    assert_eq!(authorization.ttl, Duration::seconds(600));

    let (ctx, code_response) = issue_code(&mut endpoint, authorization, ctx).unwrap();
    assert_eq!(code_response.access_token, None);
    let code = code_response.access_code.unwrap();

    let (ctx, exchanged) = authorize_code_grant(
        &mut endpoint,
        CLIENT_ID,
        CLIENT_SECRET,
        &code,
        &redirect_uri(),
        ctx,
    )
    .expect("the freshly issued code should exchange");

    assert_eq!(exchanged.resource_owner, Some(OWNER.to_string()));
    assert_eq!(exchanged.scope, scope("account:read"));

    let (ctx, token_response) = issue_token(&mut endpoint, exchanged, ctx).unwrap();
    verify_access_token(&mut endpoint, token_response.access_token.as_ref().unwrap(), ctx)
        .expect("the exchanged token should verify");

    // The code was consumed by the first exchange.
    let replay = authorize_code_grant(
        &mut endpoint,
        CLIENT_ID,
        CLIENT_SECRET,
        &code,
        &redirect_uri(),
        (),
    );
    assert_eq!(replay.unwrap_err(), Error::InvalidGrant);
}

#[test]
fn code_request_with_foreign_redirect_is_unauthorized() {
    let mut endpoint = setup();
    let foreign: Url = "https://attacker.example/endpoint".parse().unwrap();

    let result = authorize_code_request(
        &mut endpoint,
        CLIENT_ID,
        &foreign,
        OWNER,
        OWNER_PASSWORD,
        scope("account:read"),
        (),
    );

    assert_eq!(result.unwrap_err(), Error::UnauthorizedClient);
}

#[test]
fn client_credentials_cannot_refresh() {
    let mut endpoint = setup();

    let (ctx, authorization) = authorize_client_credentials(
        &mut endpoint,
        CLIENT_ID,
        CLIENT_SECRET,
        scope("account:read"),
        (),
    )
    .expect("registered client should authorize");

    assert_eq!(authorization.resource_owner, None);

    // No resource owner, no refresh token.
    let result = issue_token_and_refresh(&mut endpoint, authorization.clone(), ctx);
    assert_eq!(result.unwrap_err(), Error::InvalidAuthorization);

    // A plain access token is fine.
    let (_, response) = issue_token(&mut endpoint, authorization, ctx).unwrap();
    assert!(response.access_token.is_some());
    assert_eq!(response.refresh_token, None);
}

#[test]
fn public_password_grant() {
    let mut endpoint = setup();

    let (ctx, authorization) =
        authorize_password(&mut endpoint, OWNER, OWNER_PASSWORD, scope("account:read"), ())
            .unwrap();

    assert_eq!(authorization.client, None);

    let (ctx, response) = issue_token(&mut endpoint, authorization, ctx).unwrap();
    verify_access_token(&mut endpoint, response.access_token.as_ref().unwrap(), ctx)
        .expect("the issued token should verify");
}

#[test]
fn excessive_scope_is_rejected() {
    let mut endpoint = setup();

    let result = authorize_password(
        &mut endpoint,
        OWNER,
        OWNER_PASSWORD,
        scope("account:read payments"),
        (),
    );

    assert_eq!(result.unwrap_err(), Error::InvalidScope);
}

#[test]
fn zero_lifetime_tokens_are_rejected_on_sight() {
    let mut endpoint = setup();
    endpoint.lifetimes = Lifetimes {
        password: Duration::zero(),
        ..Lifetimes::default()
    };

    let (ctx, authorization) =
        authorize_password(&mut endpoint, OWNER, OWNER_PASSWORD, scope("account:read"), ())
            .unwrap();
    let (ctx, response) = issue_token(&mut endpoint, authorization, ctx).unwrap();

    let result = verify_access_token(&mut endpoint, response.access_token.as_ref().unwrap(), ctx);
    assert_eq!(result.unwrap_err(), Error::AccessDenied);
}
