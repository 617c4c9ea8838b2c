//! Gesture decision logic for task list items.
//!
//! # Responsibility
//! - Decide whether a horizontal drag commits a task outcome.
//!
//! # Invariants
//! - Only the decision lives here; animation and gesture recognition are
//!   platform concerns that feed offsets/velocities in.

pub mod swipe;

pub use swipe::{SwipeConfig, SwipeOutcome, SwipeState, SwipeTracker};
