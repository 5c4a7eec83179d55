//! Binds a back-end, a token generator and per-grant lifetimes together.
//!
//! The flow functions in [`grants`] are generic over an [`Endpoint`]: an
//! accessor trait handing out the back-end, the generator and the
//! configured lifetime for each artifact class. Both bindings are stable
//! for the lifetime of the endpoint: an implementation may resolve them
//! lazily but must always hand back the same instances.
//!
//! For the common case of owning all parts directly, [`Generic`] is a
//! ready-made implementation.
//!
//! [`grants`]: ../grants/index.html
//! [`Endpoint`]: trait.Endpoint.html
//! [`Generic`]: struct.Generic.html

use chrono::Duration;

use crate::primitives::backend::Backend;
use crate::primitives::generator::TokenGenerator;
use crate::primitives::grant::{Authorization, GrantContext};
use crate::response::Response;

/// The artifact classes with separately configured lifetimes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GrantType {
    /// Grants validated against resource owner credentials. Also the
    /// lifetime class of tokens minted for an exchanged authorization code
    /// and of refreshed access tokens.
    Password,

    /// Grants a client obtains on its own behalf.
    ClientCredentials,

    /// Authorization codes awaiting exchange at the token endpoint.
    AuthorizationCode,
}

/// Relative validity configured for each artifact class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Lifetimes {
    /// Lifetime of password-credential grants.
    pub password: Duration,

    /// Lifetime of client-credential grants.
    pub client_credentials: Duration,

    /// Lifetime of authorization codes.
    pub authorization_code: Duration,
}

impl Lifetimes {
    /// Look up the lifetime configured for an artifact class.
    pub fn expiry_time(&self, grant: GrantType) -> Duration {
        match grant {
            GrantType::Password => self.password,
            GrantType::ClientCredentials => self.client_credentials,
            GrantType::AuthorizationCode => self.authorization_code,
        }
    }
}

impl Default for Lifetimes {
    /// One hour for tokens, ten minutes for authorization codes.
    fn default() -> Self {
        Lifetimes {
            password: Duration::seconds(3600),
            client_credentials: Duration::seconds(3600),
            authorization_code: Duration::seconds(600),
        }
    }
}

/// Required functionality for executing grant flows.
///
/// Each accessor may be called several times while processing a single
/// flow; implementations should hand out the same instance every time.
pub trait Endpoint {
    /// The back-end owning identity, scope policy and persistence.
    type Backend: Backend;

    /// The generator producing code and token strings.
    type Generator: TokenGenerator<Self::Backend>;

    /// Get the back-end.
    fn backend(&mut self) -> &mut Self::Backend;

    /// Get the token generator.
    fn generator(&mut self) -> &mut Self::Generator;

    /// The configured relative lifetime for artifacts of class `grant`.
    fn expiry_time(&self, grant: GrantType) -> Duration;
}

/// An endpoint assembled from owned parts.
///
/// ```
/// use oauth2_engine::endpoint::{Generic, Lifetimes};
/// use oauth2_engine::primitives::generator::RandomGenerator;
/// use oauth2_engine::primitives::memory::MemoryBackend;
///
/// let endpoint = Generic {
///     backend: MemoryBackend::new(),
///     generator: RandomGenerator::new(16),
///     lifetimes: Lifetimes::default(),
/// };
/// # let _ = endpoint;
/// ```
pub struct Generic<B, G> {
    /// The back-end owning identity and persistence.
    pub backend: B,

    /// The token generator.
    pub generator: G,

    /// Per-class artifact lifetimes.
    pub lifetimes: Lifetimes,
}

impl<B, G> Endpoint for Generic<B, G>
where
    B: Backend,
    G: TokenGenerator<B>,
{
    type Backend = B;
    type Generator = G;

    fn backend(&mut self) -> &mut B {
        &mut self.backend
    }

    fn generator(&mut self) -> &mut G {
        &mut self.generator
    }

    fn expiry_time(&self, grant: GrantType) -> Duration {
        self.lifetimes.expiry_time(grant)
    }
}

/// The back-end chosen by an endpoint.
pub type BackendOf<E> = <E as Endpoint>::Backend;

/// The application context threaded through an endpoint's back-end.
pub type AppCtxOf<E> = <BackendOf<E> as Backend>::AppCtx;

/// The client identity type of an endpoint's back-end.
pub type ClientOf<E> = <BackendOf<E> as Backend>::Client;

/// The resource owner identity type of an endpoint's back-end.
pub type OwnerOf<E> = <BackendOf<E> as Backend>::Owner;

/// The scope representation of an endpoint's back-end.
pub type ScopeOf<E> = <BackendOf<E> as Backend>::Scope;

/// The grant context persisted by an endpoint's back-end.
pub type GrantContextOf<E> = GrantContext<ClientOf<E>, OwnerOf<E>, ScopeOf<E>>;

/// The authorization produced by an endpoint's flows.
pub type AuthorizationOf<E> = Authorization<ClientOf<E>, OwnerOf<E>, ScopeOf<E>>;

/// The response produced by an endpoint's issuance operations.
pub type ResponseOf<E> = Response<OwnerOf<E>, ScopeOf<E>>;
