//! The grant flows of [RFC 6749] as chains of back-end calls.
//!
//! Every public operation here is a short sequential chain. Each step
//! calls the back-end (or a sibling operation), receives the advanced
//! application context plus a typed value, and either aborts with the RFC
//! error code fixed for that step or continues. The first error wins; the
//! remaining chain is never executed.
//!
//! The `authorize_*` family validates credentials and produces an
//! [`Authorization`], an intermediate value the caller hands to one of
//! the `issue_*` operations, which anchor its relative lifetime at the
//! wall clock, persist a grant context and shape the client-visible
//! [`Response`]. The `verify_*` operations resolve issued artifacts and
//! revoke them on sight when expired.
//!
//! [RFC 6749]: https://tools.ietf.org/html/rfc6749
//! [`Authorization`]: ../primitives/grant/struct.Authorization.html
//! [`Response`]: ../response/struct.Response.html

pub mod authorization_code;
pub mod client_credentials;
pub mod error;
pub mod issue;
pub mod password;
pub mod refresh;
pub mod verify;

#[cfg(test)]
mod tests;

use crate::endpoint::AppCtxOf;

use self::error::Error;

/// Outcome of a flow operation: the advanced application context paired
/// with the produced value, or the error code the failing step maps to.
pub type Outcome<E, T> = Result<(AppCtxOf<E>, T), Error>;
