//! User-visible workflows.
//!
//! Each workflow collects its input through a [`Console`](crate::console::Console),
//! resolves catalog labels and drives the `db` operations. Workflows that write
//! more than one row run inside a single transaction; returning early or
//! propagating an error drops the transaction, which rolls it back.

pub mod appointment;
pub mod doctors;
pub mod patients;
pub mod payment;
pub mod pharmacy;
pub mod rooms;
pub mod staff;
