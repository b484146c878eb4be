//! Tabshare
//!
//! Tabshare is a deterministic bill-splitting and settlement engine. Given a
//! captured bill, a group roster, an item-assignment map, and an allocation
//! configuration, it computes each member's share of items, discounts, tax,
//! and tips, reconciles those obligations against whoever actually paid, and
//! suggests a short list of peer-to-peer transfers that settles the group.
//!
//! The engine is a pure, synchronous computation: no I/O, no retained state
//! between calls, and no panics on degenerate input — fallbacks are reported
//! as structured warnings on the result. Capture, storage, and rendering are
//! external collaborators.

pub mod bill;
pub mod config;
pub mod diagnostics;
pub mod members;
pub mod payment;
pub mod prelude;
pub mod scenario;
pub mod settlement;
pub mod split;
pub mod summary;
pub mod validate;

mod allocate;
