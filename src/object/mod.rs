//! Runtime values and the scopes that bind them.
//!
//! Values are reference counted handles. Environments form a chain of
//! shared scopes, and function values keep the scope they were defined in
//! alive for as long as they are reachable.

pub mod environment;
pub mod object;
