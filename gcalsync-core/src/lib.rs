//! One-way calendar import engine.
//!
//! Pulls calendars and events from a remote calendar service into a
//! local calendar store, keeping a durable remote→local identity map
//! so that repeated runs are idempotent. Already-imported entities are
//! never mutated: the engine only creates new local entities or
//! reports inconsistencies (drifted titles, dangling mappings).
//!
//! The remote service and the local store are collaborators supplied
//! by the caller through the traits in [`remote`] and [`local`].

pub mod account;
pub mod context;
pub mod error;
pub mod local;
pub mod reconcile;
pub mod remote;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;
