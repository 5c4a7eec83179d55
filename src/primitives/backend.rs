//! The persistence and identity contract behind the engine.
//!
//! A back-end is the sole owner of everything durable: registered clients
//! and resource owners, scope policy, and the stores that map issued codes
//! and tokens to their grant contexts. The engine never caches any of it;
//! each flow is a fresh sequence of calls against this trait.
//!
//! ## Application context threading
//!
//! Every operation takes the caller-owned application context by value and
//! returns the context to use for the next call. Within one flow these
//! calls form a linear chain (step N's returned context is step N+1's
//! input), which lets an implementation hand a database transaction, a
//! request span or any other per-request state through the whole flow.
//! A failed call consumes the context; flows abort at the first failure,
//! so no call ever observes a context from a failed sibling. Atomicity of
//! the `associate_*`/`resolve_*`/`revoke_*` families under concurrent use
//! is the implementation's obligation.
//!
//! The engine treats the `Error` type as opaque: it only ever observes
//! that a call failed and maps that onto the RFC error code fixed for the
//! failing step.

use url::Url;

use super::grant::GrantContext;

/// The grant context type persisted by a back-end.
pub type ContextOf<B> =
    GrantContext<<B as Backend>::Client, <B as Backend>::Owner, <B as Backend>::Scope>;

/// A back-end owns identity verification, scope policy and artifact
/// persistence.
///
/// Client, owner and scope representations are chosen by the
/// implementation; the engine moves them around and compares clients by
/// equality, nothing more. Scope values pass through a verifier before
/// they are stored: the verifier returns the *effective* scope, which may
/// be narrower than the requested one, and only the returned value is ever
/// persisted.
pub trait Backend {
    /// Caller-owned state threaded linearly through every call of a flow.
    type AppCtx;

    /// Opaque client identity, compared by value.
    type Client: Clone + PartialEq;

    /// Opaque resource owner identity.
    type Owner: Clone;

    /// Opaque scope representation.
    type Scope: Clone;

    /// Failure detail. Never inspected by the engine.
    type Error;

    /// Authenticate a resource owner by credentials.
    fn authenticate_username_password(
        &mut self,
        username: &str,
        password: &str,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, Self::Owner), Self::Error>;

    /// Authenticate a client by its id and secret.
    fn authenticate_client(
        &mut self,
        client_id: &str,
        client_secret: &str,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, Self::Client), Self::Error>;

    /// Look up a client identity without authenticating it.
    ///
    /// Used at the authorization endpoint, where the client is identified
    /// but proves nothing.
    fn get_client_identity(
        &mut self,
        client_id: &str,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, Self::Client), Self::Error>;

    /// Check that `uri` is a redirection endpoint registered for `client`.
    fn verify_redirection_uri(
        &mut self,
        client: &Self::Client,
        uri: &Url,
        ctx: Self::AppCtx,
    ) -> Result<Self::AppCtx, Self::Error>;

    /// Verify a scope requested on behalf of a resource owner.
    ///
    /// Returns the effective scope, possibly narrower than the request.
    fn verify_resowner_scope(
        &mut self,
        resource_owner: &Self::Owner,
        scope: Self::Scope,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, Self::Scope), Self::Error>;

    /// Verify a scope requested by a client for itself.
    ///
    /// Returns the effective scope, possibly narrower than the request.
    fn verify_client_scope(
        &mut self,
        client: &Self::Client,
        scope: Self::Scope,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, Self::Scope), Self::Error>;

    /// Verify a requested scope against the scope originally granted.
    ///
    /// Used by the refresh flow. Returns the effective scope.
    fn verify_scope(
        &mut self,
        registered: Self::Scope,
        requested: Self::Scope,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, Self::Scope), Self::Error>;

    /// Persist the grant context under a fresh authorization code.
    fn associate_access_code(
        &mut self,
        code: &str,
        grant: GrantContext<Self::Client, Self::Owner, Self::Scope>,
        ctx: Self::AppCtx,
    ) -> Result<Self::AppCtx, Self::Error>;

    /// Persist the grant context under a fresh access token.
    fn associate_access_token(
        &mut self,
        token: &str,
        grant: GrantContext<Self::Client, Self::Owner, Self::Scope>,
        ctx: Self::AppCtx,
    ) -> Result<Self::AppCtx, Self::Error>;

    /// Persist the grant context under a fresh refresh token.
    fn associate_refresh_token(
        &mut self,
        token: &str,
        grant: GrantContext<Self::Client, Self::Owner, Self::Scope>,
        ctx: Self::AppCtx,
    ) -> Result<Self::AppCtx, Self::Error>;

    /// Recover the grant context an authorization code was issued with.
    fn resolve_access_code(
        &mut self,
        code: &str,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, GrantContext<Self::Client, Self::Owner, Self::Scope>), Self::Error>;

    /// Recover the grant context an access token was issued with.
    fn resolve_access_token(
        &mut self,
        token: &str,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, GrantContext<Self::Client, Self::Owner, Self::Scope>), Self::Error>;

    /// Recover the grant context a refresh token was issued with.
    fn resolve_refresh_token(
        &mut self,
        token: &str,
        ctx: Self::AppCtx,
    ) -> Result<(Self::AppCtx, GrantContext<Self::Client, Self::Owner, Self::Scope>), Self::Error>;

    /// Forget an authorization code. Codes are single use; the engine
    /// revokes one the moment it is successfully exchanged.
    fn revoke_access_code(
        &mut self,
        code: &str,
        ctx: Self::AppCtx,
    ) -> Result<Self::AppCtx, Self::Error>;

    /// Forget an access token.
    fn revoke_access_token(
        &mut self,
        token: &str,
        ctx: Self::AppCtx,
    ) -> Result<Self::AppCtx, Self::Error>;

    /// Forget a refresh token.
    fn revoke_refresh_token(
        &mut self,
        token: &str,
        ctx: Self::AppCtx,
    ) -> Result<Self::AppCtx, Self::Error>;
}

impl<'a, B: Backend + ?Sized> Backend for &'a mut B {
    type AppCtx = B::AppCtx;
    type Client = B::Client;
    type Owner = B::Owner;
    type Scope = B::Scope;
    type Error = B::Error;

    fn authenticate_username_password(
        &mut self,
        username: &str,
        password: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Owner), B::Error> {
        (**self).authenticate_username_password(username, password, ctx)
    }

    fn authenticate_client(
        &mut self,
        client_id: &str,
        client_secret: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Client), B::Error> {
        (**self).authenticate_client(client_id, client_secret, ctx)
    }

    fn get_client_identity(
        &mut self,
        client_id: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Client), B::Error> {
        (**self).get_client_identity(client_id, ctx)
    }

    fn verify_redirection_uri(
        &mut self,
        client: &B::Client,
        uri: &Url,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).verify_redirection_uri(client, uri, ctx)
    }

    fn verify_resowner_scope(
        &mut self,
        resource_owner: &B::Owner,
        scope: B::Scope,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Scope), B::Error> {
        (**self).verify_resowner_scope(resource_owner, scope, ctx)
    }

    fn verify_client_scope(
        &mut self,
        client: &B::Client,
        scope: B::Scope,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Scope), B::Error> {
        (**self).verify_client_scope(client, scope, ctx)
    }

    fn verify_scope(
        &mut self,
        registered: B::Scope,
        requested: B::Scope,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Scope), B::Error> {
        (**self).verify_scope(registered, requested, ctx)
    }

    fn associate_access_code(
        &mut self,
        code: &str,
        grant: ContextOf<B>,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).associate_access_code(code, grant, ctx)
    }

    fn associate_access_token(
        &mut self,
        token: &str,
        grant: ContextOf<B>,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).associate_access_token(token, grant, ctx)
    }

    fn associate_refresh_token(
        &mut self,
        token: &str,
        grant: ContextOf<B>,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).associate_refresh_token(token, grant, ctx)
    }

    fn resolve_access_code(
        &mut self,
        code: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, ContextOf<B>), B::Error> {
        (**self).resolve_access_code(code, ctx)
    }

    fn resolve_access_token(
        &mut self,
        token: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, ContextOf<B>), B::Error> {
        (**self).resolve_access_token(token, ctx)
    }

    fn resolve_refresh_token(
        &mut self,
        token: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, ContextOf<B>), B::Error> {
        (**self).resolve_refresh_token(token, ctx)
    }

    fn revoke_access_code(&mut self, code: &str, ctx: B::AppCtx) -> Result<B::AppCtx, B::Error> {
        (**self).revoke_access_code(code, ctx)
    }

    fn revoke_access_token(&mut self, token: &str, ctx: B::AppCtx) -> Result<B::AppCtx, B::Error> {
        (**self).revoke_access_token(token, ctx)
    }

    fn revoke_refresh_token(&mut self, token: &str, ctx: B::AppCtx) -> Result<B::AppCtx, B::Error> {
        (**self).revoke_refresh_token(token, ctx)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    type AppCtx = B::AppCtx;
    type Client = B::Client;
    type Owner = B::Owner;
    type Scope = B::Scope;
    type Error = B::Error;

    fn authenticate_username_password(
        &mut self,
        username: &str,
        password: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Owner), B::Error> {
        (**self).authenticate_username_password(username, password, ctx)
    }

    fn authenticate_client(
        &mut self,
        client_id: &str,
        client_secret: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Client), B::Error> {
        (**self).authenticate_client(client_id, client_secret, ctx)
    }

    fn get_client_identity(
        &mut self,
        client_id: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Client), B::Error> {
        (**self).get_client_identity(client_id, ctx)
    }

    fn verify_redirection_uri(
        &mut self,
        client: &B::Client,
        uri: &Url,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).verify_redirection_uri(client, uri, ctx)
    }

    fn verify_resowner_scope(
        &mut self,
        resource_owner: &B::Owner,
        scope: B::Scope,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Scope), B::Error> {
        (**self).verify_resowner_scope(resource_owner, scope, ctx)
    }

    fn verify_client_scope(
        &mut self,
        client: &B::Client,
        scope: B::Scope,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Scope), B::Error> {
        (**self).verify_client_scope(client, scope, ctx)
    }

    fn verify_scope(
        &mut self,
        registered: B::Scope,
        requested: B::Scope,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, B::Scope), B::Error> {
        (**self).verify_scope(registered, requested, ctx)
    }

    fn associate_access_code(
        &mut self,
        code: &str,
        grant: ContextOf<B>,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).associate_access_code(code, grant, ctx)
    }

    fn associate_access_token(
        &mut self,
        token: &str,
        grant: ContextOf<B>,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).associate_access_token(token, grant, ctx)
    }

    fn associate_refresh_token(
        &mut self,
        token: &str,
        grant: ContextOf<B>,
        ctx: B::AppCtx,
    ) -> Result<B::AppCtx, B::Error> {
        (**self).associate_refresh_token(token, grant, ctx)
    }

    fn resolve_access_code(
        &mut self,
        code: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, ContextOf<B>), B::Error> {
        (**self).resolve_access_code(code, ctx)
    }

    fn resolve_access_token(
        &mut self,
        token: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, ContextOf<B>), B::Error> {
        (**self).resolve_access_token(token, ctx)
    }

    fn resolve_refresh_token(
        &mut self,
        token: &str,
        ctx: B::AppCtx,
    ) -> Result<(B::AppCtx, ContextOf<B>), B::Error> {
        (**self).resolve_refresh_token(token, ctx)
    }

    fn revoke_access_code(&mut self, code: &str, ctx: B::AppCtx) -> Result<B::AppCtx, B::Error> {
        (**self).revoke_access_code(code, ctx)
    }

    fn revoke_access_token(&mut self, token: &str, ctx: B::AppCtx) -> Result<B::AppCtx, B::Error> {
        (**self).revoke_access_token(token, ctx)
    }

    fn revoke_refresh_token(&mut self, token: &str, ctx: B::AppCtx) -> Result<B::AppCtx, B::Error> {
        (**self).revoke_refresh_token(token, ctx)
    }
}
