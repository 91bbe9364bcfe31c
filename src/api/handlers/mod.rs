//! Route handlers for the portal service.
//!
//! `login` holds the gateway itself; `health` and `root` are service plumbing.

pub mod health;
pub mod login;
pub mod root;
