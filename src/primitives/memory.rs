//! An in-memory implementation of the back-end contract.
//!
//! [`MemoryBackend`] keeps registered clients, resource owners and the
//! three artifact stores in hash maps. It is useful for tests, examples
//! and rapid prototyping; production deployments will want an
//! implementation over durable storage.
//!
//! Secrets are never stored in the clear: registration passes them through
//! a [`PasswordPolicy`], by default [`Argon2`].
//!
//! [`MemoryBackend`]: struct.MemoryBackend.html
//! [`PasswordPolicy`]: trait.PasswordPolicy.html
//! [`Argon2`]: struct.Argon2.html

use std::collections::HashMap;
use std::fmt;

use argon2::{self, Config};
use once_cell::sync::Lazy;
use rand::{thread_rng, RngCore};
use url::Url;

use super::backend::Backend;
use super::grant::GrantContext;
use super::scope::Scope;

/// Failure detail reported by the in-memory back-end.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemoryError {
    /// One of several indistinguishable causes:
    ///
    /// * an entirely unknown client, owner or artifact,
    /// * failed authentication,
    /// * a redirection uri or scope outside what was registered.
    ///
    /// These are indistinguishable on purpose to avoid oracle problems.
    Unspecified,

    /// The stored secret data could not be interpreted.
    Primitive,
}

/// Policy for keeping client and owner secrets at rest.
///
/// [`Argon2`] is the stock implementation and the default.
///
/// [`Argon2`]: struct.Argon2.html
pub trait PasswordPolicy: Send + Sync {
    /// Derive the value kept in storage for this identity's passphrase.
    fn store(&self, identity: &str, passphrase: &[u8]) -> Vec<u8>;

    /// Decide whether a presented passphrase matches the stored value.
    fn check(&self, identity: &str, passphrase: &[u8], stored: &[u8]) -> Result<(), MemoryError>;
}

/// Random salt bytes mixed into every stored secret.
const SALT_LENGTH: usize = 16;

/// Encodes secrets with `Argon2`, salted per entry and keyed to the
/// identity they belong to, so a hash lifted from one record cannot be
/// replayed against another.
#[derive(Clone, Copy, Debug, Default)]
pub struct Argon2;

impl Argon2 {
    fn config(identity: &str) -> Config {
        Config {
            ad: identity.as_bytes(),
            ..Config::default()
        }
    }
}

impl PasswordPolicy for Argon2 {
    fn store(&self, identity: &str, passphrase: &[u8]) -> Vec<u8> {
        let mut salt = [0u8; SALT_LENGTH];
        thread_rng().fill_bytes(&mut salt);

        // Only fails on inconsistent parameters, which ours are not.
        argon2::hash_encoded(passphrase, &salt, &Self::config(identity))
            .expect("argon2 parameters are consistent")
            .into_bytes()
    }

    fn check(&self, identity: &str, passphrase: &[u8], stored: &[u8]) -> Result<(), MemoryError> {
        let encoded = std::str::from_utf8(stored).map_err(|_| MemoryError::Primitive)?;
        match argon2::verify_encoded_ext(encoded, passphrase, &[], identity.as_bytes()) {
            Ok(true) => Ok(()),
            Ok(false) => Err(MemoryError::Unspecified),
            Err(_) => Err(MemoryError::Primitive),
        }
    }
}

static DEFAULT_PASSWORD_POLICY: Lazy<Argon2> = Lazy::new(Argon2::default);

/// A client registration handed to [`MemoryBackend::register_client`].
///
/// Public clients operate without proof of identity; confidential clients
/// must present their passphrase when authenticating.
///
/// [`MemoryBackend::register_client`]: struct.MemoryBackend.html#method.register_client
#[derive(Clone, Debug)]
pub struct Client {
    client_id: String,
    redirect_uri: Url,
    scope: Scope,
    client_type: ClientType,
}

#[derive(Clone)]
enum ClientType {
    Public,
    Confidential { passphrase: Vec<u8> },
}

struct EncodedClient {
    redirect_uri: Url,
    scope: Scope,
    /// Encoded authentication data, `None` for public clients.
    passdata: Option<Vec<u8>>,
}

struct EncodedOwner {
    passdata: Vec<u8>,
    scope: Scope,
}

type StoredGrant = GrantContext<String, String, Scope>;

/// A back-end holding all state in process memory.
///
/// Clients and owners are keyed by their string identities, which double
/// as this back-end's `Client` and `Owner` types. The scope policy is
/// subset based: a requested scope must be contained in the registered
/// one, and an empty request defaults to everything registered.
#[derive(Default)]
pub struct MemoryBackend {
    clients: HashMap<String, EncodedClient>,
    owners: HashMap<String, EncodedOwner>,
    codes: HashMap<String, StoredGrant>,
    tokens: HashMap<String, StoredGrant>,
    refresh_tokens: HashMap<String, StoredGrant>,
    password_policy: Option<Box<dyn PasswordPolicy>>,
}

impl Client {
    fn with_type(client_id: &str, redirect_uri: Url, scope: Scope, client_type: ClientType) -> Client {
        Client {
            client_id: client_id.to_string(),
            redirect_uri,
            scope,
            client_type,
        }
    }

    /// Register a client that never proves its identity.
    pub fn public(client_id: &str, redirect_uri: Url, scope: Scope) -> Client {
        Client::with_type(client_id, redirect_uri, scope, ClientType::Public)
    }

    /// Register a client that authenticates with `passphrase`.
    pub fn confidential(
        client_id: &str,
        redirect_uri: Url,
        scope: Scope,
        passphrase: &[u8],
    ) -> Client {
        let secret = ClientType::Confidential {
            passphrase: passphrase.to_owned(),
        };
        Client::with_type(client_id, redirect_uri, scope, secret)
    }

    fn encode(self, policy: &dyn PasswordPolicy) -> (String, EncodedClient) {
        let passdata = match self.client_type {
            ClientType::Public => None,
            ClientType::Confidential { passphrase } => {
                Some(policy.store(&self.client_id, &passphrase))
            }
        };

        let encoded = EncodedClient {
            redirect_uri: self.redirect_uri,
            scope: self.scope,
            passdata,
        };

        (self.client_id, encoded)
    }
}

impl MemoryBackend {
    /// Create an empty back-end without any registrations in it.
    pub fn new() -> MemoryBackend {
        MemoryBackend::default()
    }

    /// Change how passphrases are encoded while stored.
    ///
    /// Only affects future registrations.
    pub fn set_password_policy<P: PasswordPolicy + 'static>(&mut self, policy: P) {
        self.password_policy = Some(Box::new(policy));
    }

    fn current_policy<'a>(policy: &'a Option<Box<dyn PasswordPolicy>>) -> &'a dyn PasswordPolicy {
        match policy {
            Some(custom) => custom.as_ref(),
            None => &*DEFAULT_PASSWORD_POLICY,
        }
    }

    /// Insert or update a client registration.
    pub fn register_client(&mut self, client: Client) {
        let policy = Self::current_policy(&self.password_policy);
        let (client_id, encoded) = client.encode(policy);
        self.clients.insert(client_id, encoded);
    }

    /// Insert or update a resource owner with credentials and allowed scope.
    pub fn register_owner(&mut self, username: &str, password: &[u8], scope: Scope) {
        let policy = Self::current_policy(&self.password_policy);
        let encoded = EncodedOwner {
            passdata: policy.store(username, password),
            scope,
        };
        self.owners.insert(username.to_string(), encoded);
    }
}

/// Narrow `requested` against a registered scope.
///
/// An empty request stands for the full registered scope.
fn narrow(registered: &Scope, requested: Scope) -> Result<Scope, MemoryError> {
    if requested.is_empty() {
        Ok(registered.clone())
    } else if requested <= *registered {
        Ok(requested)
    } else {
        Err(MemoryError::Unspecified)
    }
}

impl Backend for MemoryBackend {
    type AppCtx = ();
    type Client = String;
    type Owner = String;
    type Scope = Scope;
    type Error = MemoryError;

    fn authenticate_username_password(
        &mut self,
        username: &str,
        password: &str,
        ctx: (),
    ) -> Result<((), String), MemoryError> {
        let owner = self.owners.get(username).ok_or(MemoryError::Unspecified)?;
        Self::current_policy(&self.password_policy).check(
            username,
            password.as_bytes(),
            &owner.passdata,
        )?;
        Ok((ctx, username.to_string()))
    }

    fn authenticate_client(
        &mut self,
        client_id: &str,
        client_secret: &str,
        ctx: (),
    ) -> Result<((), String), MemoryError> {
        let client = self.clients.get(client_id).ok_or(MemoryError::Unspecified)?;
        match &client.passdata {
            Some(stored) => Self::current_policy(&self.password_policy).check(
                client_id,
                client_secret.as_bytes(),
                stored,
            )?,
            // Public clients carry no secret; presenting one is an error.
            None if client_secret.is_empty() => (),
            None => return Err(MemoryError::Unspecified),
        }
        Ok((ctx, client_id.to_string()))
    }

    fn get_client_identity(&mut self, client_id: &str, ctx: ()) -> Result<((), String), MemoryError> {
        if !self.clients.contains_key(client_id) {
            return Err(MemoryError::Unspecified);
        }
        Ok((ctx, client_id.to_string()))
    }

    fn verify_redirection_uri(
        &mut self,
        client: &String,
        uri: &Url,
        ctx: (),
    ) -> Result<(), MemoryError> {
        let registered = self.clients.get(client).ok_or(MemoryError::Unspecified)?;
        if registered.redirect_uri == *uri {
            Ok(ctx)
        } else {
            Err(MemoryError::Unspecified)
        }
    }

    fn verify_resowner_scope(
        &mut self,
        resource_owner: &String,
        scope: Scope,
        ctx: (),
    ) -> Result<((), Scope), MemoryError> {
        let owner = self
            .owners
            .get(resource_owner.as_str())
            .ok_or(MemoryError::Unspecified)?;
        let effective = narrow(&owner.scope, scope)?;
        Ok((ctx, effective))
    }

    fn verify_client_scope(
        &mut self,
        client: &String,
        scope: Scope,
        ctx: (),
    ) -> Result<((), Scope), MemoryError> {
        let registered = self
            .clients
            .get(client.as_str())
            .ok_or(MemoryError::Unspecified)?;
        let effective = narrow(&registered.scope, scope)?;
        Ok((ctx, effective))
    }

    fn verify_scope(
        &mut self,
        registered: Scope,
        requested: Scope,
        ctx: (),
    ) -> Result<((), Scope), MemoryError> {
        let effective = narrow(&registered, requested)?;
        Ok((ctx, effective))
    }

    fn associate_access_code(
        &mut self,
        code: &str,
        grant: StoredGrant,
        ctx: (),
    ) -> Result<(), MemoryError> {
        self.codes.insert(code.to_string(), grant);
        Ok(ctx)
    }

    fn associate_access_token(
        &mut self,
        token: &str,
        grant: StoredGrant,
        ctx: (),
    ) -> Result<(), MemoryError> {
        self.tokens.insert(token.to_string(), grant);
        Ok(ctx)
    }

    fn associate_refresh_token(
        &mut self,
        token: &str,
        grant: StoredGrant,
        ctx: (),
    ) -> Result<(), MemoryError> {
        self.refresh_tokens.insert(token.to_string(), grant);
        Ok(ctx)
    }

    fn resolve_access_code(&mut self, code: &str, ctx: ()) -> Result<((), StoredGrant), MemoryError> {
        let grant = self.codes.get(code).cloned().ok_or(MemoryError::Unspecified)?;
        Ok((ctx, grant))
    }

    fn resolve_access_token(
        &mut self,
        token: &str,
        ctx: (),
    ) -> Result<((), StoredGrant), MemoryError> {
        let grant = self
            .tokens
            .get(token)
            .cloned()
            .ok_or(MemoryError::Unspecified)?;
        Ok((ctx, grant))
    }

    fn resolve_refresh_token(
        &mut self,
        token: &str,
        ctx: (),
    ) -> Result<((), StoredGrant), MemoryError> {
        let grant = self
            .refresh_tokens
            .get(token)
            .cloned()
            .ok_or(MemoryError::Unspecified)?;
        Ok((ctx, grant))
    }

    fn revoke_access_code(&mut self, code: &str, ctx: ()) -> Result<(), MemoryError> {
        self.codes.remove(code);
        Ok(ctx)
    }

    fn revoke_access_token(&mut self, token: &str, ctx: ()) -> Result<(), MemoryError> {
        self.tokens.remove(token);
        Ok(ctx)
    }

    fn revoke_refresh_token(&mut self, token: &str, ctx: ()) -> Result<(), MemoryError> {
        self.refresh_tokens.remove(token);
        Ok(ctx)
    }
}

// Keeps passphrases out of debug output.
impl fmt::Debug for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientType::Public => f.write_str("Public"),
            ClientType::Confidential { .. } => f.write_str("Confidential { .. }"),
        }
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryError::Unspecified => write!(f, "unknown identity or failed check"),
            MemoryError::Primitive => write!(f, "stored secret data was malformed"),
        }
    }
}

impl std::error::Error for MemoryError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn scope(string: &str) -> Scope {
        string.parse().unwrap()
    }

    fn redirect() -> Url {
        "https://client.example/endpoint".parse().unwrap()
    }

    fn populated() -> MemoryBackend {
        let mut backend = MemoryBackend::new();
        backend.register_client(Client::confidential(
            "ClientId",
            redirect(),
            scope("default example"),
            b"passphrase",
        ));
        backend.register_client(Client::public("PublicId", redirect(), scope("default")));
        backend.register_owner("Owner", b"owner-secret", scope("default example"));
        backend
    }

    #[test]
    fn owner_authentication() {
        let mut backend = populated();
        let (_, owner) = backend
            .authenticate_username_password("Owner", "owner-secret", ())
            .expect("registered owner should authenticate");
        assert_eq!(owner, "Owner");

        assert!(backend
            .authenticate_username_password("Owner", "wrong", ())
            .is_err());
        assert!(backend
            .authenticate_username_password("Nobody", "owner-secret", ())
            .is_err());
    }

    #[test]
    fn client_authentication() {
        let mut backend = populated();
        assert!(backend
            .authenticate_client("ClientId", "passphrase", ())
            .is_ok());
        assert!(backend
            .authenticate_client("ClientId", "other", ())
            .is_err());

        // Public clients authenticate without a secret, and only without.
        assert!(backend.authenticate_client("PublicId", "", ()).is_ok());
        assert!(backend
            .authenticate_client("PublicId", "passphrase", ())
            .is_err());
    }

    #[test]
    fn redirection_uri_must_match() {
        let mut backend = populated();
        let client = "ClientId".to_string();
        assert!(backend
            .verify_redirection_uri(&client, &redirect(), ())
            .is_ok());

        let other: Url = "https://attacker.example/endpoint".parse().unwrap();
        assert!(backend.verify_redirection_uri(&client, &other, ()).is_err());
    }

    #[test]
    fn scope_narrowing() {
        let mut backend = populated();
        let owner = "Owner".to_string();

        let (_, effective) = backend
            .verify_resowner_scope(&owner, scope("example"), ())
            .unwrap();
        assert_eq!(effective, scope("example"));

        // An empty request means everything the registration allows.
        let (_, effective) = backend.verify_resowner_scope(&owner, scope(""), ()).unwrap();
        assert_eq!(effective, scope("default example"));

        assert!(backend
            .verify_resowner_scope(&owner, scope("example extra"), ())
            .is_err());
    }

    #[test]
    fn replaceable_password_policy() {
        struct Plain;

        impl PasswordPolicy for Plain {
            fn store(&self, _: &str, passphrase: &[u8]) -> Vec<u8> {
                passphrase.to_vec()
            }

            fn check(
                &self,
                _: &str,
                passphrase: &[u8],
                stored: &[u8],
            ) -> Result<(), MemoryError> {
                if passphrase == stored {
                    Ok(())
                } else {
                    Err(MemoryError::Unspecified)
                }
            }
        }

        let mut backend = MemoryBackend::new();
        backend.set_password_policy(Plain);
        backend.register_owner("Owner", b"stored-as-is", scope("default"));

        assert!(backend
            .authenticate_username_password("Owner", "stored-as-is", ())
            .is_ok());
        assert!(backend
            .authenticate_username_password("Owner", "anything-else", ())
            .is_err());
    }

    #[test]
    fn artifact_store_roundtrip() {
        let mut backend = populated();
        let grant = GrantContext {
            client: Some("ClientId".to_string()),
            resource_owner: Some("Owner".to_string()),
            expiry_time: Utc::now() + Duration::seconds(60),
            scope: scope("default"),
        };

        backend
            .associate_access_code("code", grant.clone(), ())
            .unwrap();
        let (_, resolved) = backend.resolve_access_code("code", ()).unwrap();
        assert_eq!(resolved, grant);

        backend.revoke_access_code("code", ()).unwrap();
        assert!(backend.resolve_access_code("code", ()).is_err());

        // Revoking twice is not an error.
        backend.revoke_access_code("code", ()).unwrap();
    }
}
