//! Flutter-facing bindings for `goalpath_core`.
//!
//! Generated FRB glue lives outside this crate; `api` holds the exported
//! use-case functions.

pub mod api;
