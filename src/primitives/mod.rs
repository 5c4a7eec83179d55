//! A collection of primitives shared by every grant flow.
//!
//! A primitive is the smallest independent unit of policy used by the
//! engine. The [`Backend`] owns identity verification, scope policy and
//! artifact persistence; the [`TokenGenerator`] produces the opaque strings
//! handed out as codes and tokens; [`grant`] defines the records passed
//! between them. A complete in-memory implementation of the back-end
//! contract lives in [`memory`], suitable for tests and prototyping.
//!
//! These are combined into an [`Endpoint`] on which the flow functions in
//! [`grants`] operate.
//!
//! [`Backend`]: backend/trait.Backend.html
//! [`TokenGenerator`]: generator/trait.TokenGenerator.html
//! [`grant`]: grant/index.html
//! [`memory`]: memory/index.html
//! [`Endpoint`]: ../endpoint/trait.Endpoint.html
//! [`grants`]: ../grants/index.html

use chrono::DateTime;
use chrono::Utc;

pub mod backend;
pub mod clock;
pub mod generator;
pub mod grant;
pub mod memory;
pub mod scope;

/// Absolute point in time (Utc).
pub type Time = DateTime<Utc>;

/// Commonly used primitives for back-ends and callers.
pub mod prelude {
    pub use super::backend::Backend;
    pub use super::generator::{RandomGenerator, TokenGenerator};
    pub use super::grant::{Authorization, GrantContext};
    pub use super::memory::{Client, MemoryBackend};
    pub use super::scope::Scope;
}
