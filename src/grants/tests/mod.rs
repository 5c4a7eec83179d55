use std::collections::{HashMap, HashSet};

use chrono::{Duration, Utc};
use url::Url;

use crate::endpoint::{Generic, Lifetimes};
use crate::primitives::backend::Backend;
use crate::primitives::generator::TokenGenerator;
use crate::primitives::grant::GrantContext;


pub mod defaults {
    pub const EXAMPLE_CLIENT_ID: &str = "ClientId";
    pub const EXAMPLE_CLIENT_SECRET: &str = "ClientSecret";
    pub const EXAMPLE_USERNAME: &str = "alice";
    pub const EXAMPLE_PASSWORD: &str = "wordpass";
    pub const EXAMPLE_REDIRECT_URI: &str = "https://client.example/endpoint";
}

/// Scope representation of the mock: an ordered list of opaque tokens.
///
/// Deliberately not the crate's `Scope` type, so the tests double as a
/// check that the flows stay polymorphic over scope.
type TestScope = Vec<&'static str>;

type TestGrant = GrantContext<String, String, TestScope>;

/// A back-end serving canned identities.
///
/// Every call advances the application context counter by one and records
/// its own name; the context handed in must always equal the number of
/// calls already served, which pins down the linear threading of every
/// flow. Individual steps can be switched to fail by name.
#[derive(Default)]
struct MockBackend {
    failing: HashSet<&'static str>,
    calls: Vec<&'static str>,
    /// Scope the verifiers hand back; the requested scope is echoed when
    /// unset.
    narrowed: Option<TestScope>,
    codes: HashMap<String, TestGrant>,
    tokens: HashMap<String, TestGrant>,
    refresh_tokens: HashMap<String, TestGrant>,
}

impl MockBackend {
    fn new() -> Self {
        MockBackend::default()
    }

    fn failing(mut self, step: &'static str) -> Self {
        self.failing.insert(step);
        self
    }

    fn narrowing(mut self, scope: TestScope) -> Self {
        self.narrowed = Some(scope);
        self
    }

    fn with_code(mut self, code: &str, grant: TestGrant) -> Self {
        self.codes.insert(code.to_string(), grant);
        self
    }

    fn with_token(mut self, token: &str, grant: TestGrant) -> Self {
        self.tokens.insert(token.to_string(), grant);
        self
    }

    fn with_refresh_token(mut self, token: &str, grant: TestGrant) -> Self {
        self.refresh_tokens.insert(token.to_string(), grant);
        self
    }

    fn step(&mut self, name: &'static str, ctx: u32) -> Result<u32, ()> {
        assert_eq!(
            ctx as usize,
            self.calls.len(),
            "application context did not advance linearly at {}",
            name
        );
        self.calls.push(name);
        if self.failing.contains(name) {
            Err(())
        } else {
            Ok(ctx + 1)
        }
    }

    fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| **call == name).count()
    }
}

impl Backend for MockBackend {
    type AppCtx = u32;
    type Client = String;
    type Owner = String;
    type Scope = TestScope;
    type Error = ();

    fn authenticate_username_password(
        &mut self,
        username: &str,
        _: &str,
        ctx: u32,
    ) -> Result<(u32, String), ()> {
        let ctx = self.step("authenticate_username_password", ctx)?;
        Ok((ctx, username.to_string()))
    }

    fn authenticate_client(
        &mut self,
        client_id: &str,
        _: &str,
        ctx: u32,
    ) -> Result<(u32, String), ()> {
        let ctx = self.step("authenticate_client", ctx)?;
        Ok((ctx, client_id.to_string()))
    }

    fn get_client_identity(&mut self, client_id: &str, ctx: u32) -> Result<(u32, String), ()> {
        let ctx = self.step("get_client_identity", ctx)?;
        Ok((ctx, client_id.to_string()))
    }

    fn verify_redirection_uri(&mut self, _: &String, _: &Url, ctx: u32) -> Result<u32, ()> {
        self.step("verify_redirection_uri", ctx)
    }

    fn verify_resowner_scope(
        &mut self,
        _: &String,
        scope: TestScope,
        ctx: u32,
    ) -> Result<(u32, TestScope), ()> {
        let ctx = self.step("verify_resowner_scope", ctx)?;
        Ok((ctx, self.narrowed.clone().unwrap_or(scope)))
    }

    fn verify_client_scope(
        &mut self,
        _: &String,
        scope: TestScope,
        ctx: u32,
    ) -> Result<(u32, TestScope), ()> {
        let ctx = self.step("verify_client_scope", ctx)?;
        Ok((ctx, self.narrowed.clone().unwrap_or(scope)))
    }

    fn verify_scope(
        &mut self,
        _: TestScope,
        requested: TestScope,
        ctx: u32,
    ) -> Result<(u32, TestScope), ()> {
        let ctx = self.step("verify_scope", ctx)?;
        Ok((ctx, self.narrowed.clone().unwrap_or(requested)))
    }

    fn associate_access_code(&mut self, code: &str, grant: TestGrant, ctx: u32) -> Result<u32, ()> {
        let ctx = self.step("associate_access_code", ctx)?;
        self.codes.insert(code.to_string(), grant);
        Ok(ctx)
    }

    fn associate_access_token(
        &mut self,
        token: &str,
        grant: TestGrant,
        ctx: u32,
    ) -> Result<u32, ()> {
        let ctx = self.step("associate_access_token", ctx)?;
        self.tokens.insert(token.to_string(), grant);
        Ok(ctx)
    }

    fn associate_refresh_token(
        &mut self,
        token: &str,
        grant: TestGrant,
        ctx: u32,
    ) -> Result<u32, ()> {
        let ctx = self.step("associate_refresh_token", ctx)?;
        self.refresh_tokens.insert(token.to_string(), grant);
        Ok(ctx)
    }

    fn resolve_access_code(&mut self, code: &str, ctx: u32) -> Result<(u32, TestGrant), ()> {
        let ctx = self.step("resolve_access_code", ctx)?;
        let grant = self.codes.get(code).cloned().ok_or(())?;
        Ok((ctx, grant))
    }

    fn resolve_access_token(&mut self, token: &str, ctx: u32) -> Result<(u32, TestGrant), ()> {
        let ctx = self.step("resolve_access_token", ctx)?;
        let grant = self.tokens.get(token).cloned().ok_or(())?;
        Ok((ctx, grant))
    }

    fn resolve_refresh_token(&mut self, token: &str, ctx: u32) -> Result<(u32, TestGrant), ()> {
        let ctx = self.step("resolve_refresh_token", ctx)?;
        let grant = self.refresh_tokens.get(token).cloned().ok_or(())?;
        Ok((ctx, grant))
    }

    fn revoke_access_code(&mut self, code: &str, ctx: u32) -> Result<u32, ()> {
        let ctx = self.step("revoke_access_code", ctx)?;
        self.codes.remove(code);
        Ok(ctx)
    }

    fn revoke_access_token(&mut self, token: &str, ctx: u32) -> Result<u32, ()> {
        let ctx = self.step("revoke_access_token", ctx)?;
        self.tokens.remove(token);
        Ok(ctx)
    }

    fn revoke_refresh_token(&mut self, token: &str, ctx: u32) -> Result<u32, ()> {
        let ctx = self.step("revoke_refresh_token", ctx)?;
        self.refresh_tokens.remove(token);
        Ok(ctx)
    }
}

/// Deterministic generator yielding `prefix-0`, `prefix-1`, ...
struct SequenceGenerator {
    prefix: &'static str,
    count: usize,
}

impl SequenceGenerator {
    fn new(prefix: &'static str) -> Self {
        SequenceGenerator { prefix, count: 0 }
    }
}

impl TokenGenerator<MockBackend> for SequenceGenerator {
    fn generate(&mut self, _: &TestGrant) -> Result<String, ()> {
        let token = format!("{}-{}", self.prefix, self.count);
        self.count += 1;
        Ok(token)
    }
}

/// A generator that always fails.
struct FailingGenerator;

impl TokenGenerator<MockBackend> for FailingGenerator {
    fn generate(&mut self, _: &TestGrant) -> Result<String, ()> {
        Err(())
    }
}

type TestEndpoint = Generic<MockBackend, SequenceGenerator>;

fn endpoint(backend: MockBackend) -> TestEndpoint {
    Generic {
        backend,
        generator: SequenceGenerator::new("token"),
        lifetimes: Lifetimes::default(),
    }
}

fn redirect_uri() -> Url {
    defaults::EXAMPLE_REDIRECT_URI.parse().unwrap()
}

/// A grant bound as given, expiring `ttl_seconds` from now.
fn grant(
    client: Option<&str>,
    resource_owner: Option<&str>,
    scope: TestScope,
    ttl_seconds: i64,
) -> TestGrant {
    GrantContext {
        client: client.map(str::to_string),
        resource_owner: resource_owner.map(str::to_string),
        expiry_time: Utc::now() + Duration::seconds(ttl_seconds),
        scope,
    }
}
