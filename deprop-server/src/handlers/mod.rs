//! Route handlers.

pub mod deprecate;
pub mod health;
