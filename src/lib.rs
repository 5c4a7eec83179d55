//! # oauth2-engine
//!
//! The authorization core of an OAuth2 server, for use behind any front-end,
//! featuring a pluggable persistence and identity back-end.
//!
//! ## About
//!
//! `oauth2-engine` implements the grant flows of [RFC 6749] (resource owner
//! password credentials (public and confidential clients), client
//! credentials, authorization code and implicit authorization requests, and
//! the refresh token flow) as short chains of back-end calls. The engine
//! validates credentials, mints time-bounded artifacts (authorization codes,
//! access tokens, refresh tokens) and maps every failure onto the RFC error
//! code the failing step demands. Everything the engine does not own is
//! behind a trait: identity checks, scope policy and artifact persistence
//! live in a [`Backend`], token material comes from a [`TokenGenerator`],
//! and per-grant lifetimes are read from an [`Endpoint`].
//!
//! The engine itself is stateless. Each flow threads a caller-owned
//! application context value through its back-end calls in a strictly
//! linear fashion: every call consumes the current context and hands back
//! the next one, so the back-end can carry transactions, tracing spans or
//! connection state through a flow without the engine ever inspecting it.
//!
//! ## Usage
//!
//! Pick or implement a [`Backend`] (an in-memory one is provided in
//! [`primitives::memory`]), choose a [`TokenGenerator`] such as
//! [`RandomGenerator`], and bind them together with an [`Endpoint`], in
//! the simplest case the [`Generic`] struct of owned parts. The functions
//! in [`grants`] then run the flows: an `authorize_*` call produces an
//! [`Authorization`], an `issue_*` call consumes it into a persisted
//! artifact and a client-visible [`Response`].
//!
//! HTTP transport, request parsing and response delivery are deliberately
//! out of scope; the flow functions take already-parsed, typed inputs.
//!
//! [RFC 6749]: https://tools.ietf.org/html/rfc6749
//! [`Backend`]: primitives/backend/trait.Backend.html
//! [`TokenGenerator`]: primitives/generator/trait.TokenGenerator.html
//! [`RandomGenerator`]: primitives/generator/struct.RandomGenerator.html
//! [`Endpoint`]: endpoint/trait.Endpoint.html
//! [`Generic`]: endpoint/struct.Generic.html
//! [`Authorization`]: primitives/grant/struct.Authorization.html
//! [`Response`]: response/struct.Response.html
//! [`grants`]: grants/index.html
//! [`primitives::memory`]: primitives/memory/index.html
#![warn(missing_docs)]

pub mod endpoint;
pub mod grants;
pub mod primitives;
pub mod response;
