//! Generators produce the opaque strings handed out as codes and tokens.
//!
//! A generator sees the full grant context it generates for, so
//! implementations are free to derive token material from it. The stock
//! implementation never looks at it and instead makes tokens unguessable
//! by construction, from operating system entropy.
//!
//! ## Requirements on implementations
//!
//! Generated strings MUST be collision resistant and unpredictable to
//! adversaries. The second requirement may be dropped in tests, where a
//! deterministic sequence makes assertions straightforward.

use base64::encode;
use rand::{rngs::OsRng, RngCore};

use super::backend::Backend;
use super::grant::GrantContext;

/// Produces the token string for a grant context.
///
/// The same generator is used for authorization codes, access tokens and
/// refresh tokens; when one issuance needs several artifacts it calls the
/// generator once per artifact, over the identical context.
pub trait TokenGenerator<B: Backend + ?Sized> {
    /// Produce a fresh token for the given grant context.
    fn generate(
        &mut self,
        grant: &GrantContext<B::Client, B::Owner, B::Scope>,
    ) -> Result<String, ()>;
}

/// Derives each token from fresh operating system entropy.
///
/// The grant context plays no part in the token material; unpredictability
/// rests entirely on the configured number of random bytes, which come out
/// base64 encoded.
pub struct RandomGenerator {
    len: usize,
}

impl RandomGenerator {
    /// A generator drawing `length` entropy bytes per token.
    pub fn new(length: usize) -> RandomGenerator {
        RandomGenerator { len: length }
    }

    /// An entropy failure surfaces as the trait's opaque error instead of
    /// aborting; issuance maps it to `server_error`.
    fn random_token(&self) -> Result<String, ()> {
        let mut material = vec![0u8; self.len];
        OsRng.try_fill_bytes(&mut material).map_err(|_| ())?;
        Ok(encode(&material))
    }
}

impl<B: Backend + ?Sized> TokenGenerator<B> for RandomGenerator {
    fn generate(
        &mut self,
        _: &GrantContext<B::Client, B::Owner, B::Scope>,
    ) -> Result<String, ()> {
        self.random_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_length() {
        let generator = RandomGenerator::new(12);
        // Twelve bytes of entropy encode to sixteen base64 characters.
        let token = generator.random_token().unwrap();
        assert_eq!(token.len(), 16);
    }

    #[test]
    fn no_immediate_repetition() {
        let generator = RandomGenerator::new(12);
        assert_ne!(
            generator.random_token().unwrap(),
            generator.random_token().unwrap()
        );
    }
}
