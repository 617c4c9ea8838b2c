//! Swipe-to-complete / swipe-to-fail state machine.
//!
//! `Idle -> Dragging -> Committed(Complete | Fail) | Cancelled`
//!
//! # Invariants
//! - `Committed` and `Cancelled` are terminal until `reset`.
//! - A positive (rightward) offset commits `Complete`, a negative one `Fail`.

use crate::model::task::TaskStatus;
use serde::{Deserialize, Serialize};

/// Thresholds for turning a drag into a commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// Minimum damped offset (points) before a swipe can commit.
    pub min_swipe_distance: f64,
    /// Fraction of container width the damped offset must exceed...
    pub swipe_threshold: f64,
    /// ...unless release velocity (points/s) exceeds this.
    pub velocity_threshold: f64,
    /// Damping factor applied to raw finger translation.
    pub resistance: f64,
    /// Raw translation needed before the drag activates.
    pub activation_offset: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_swipe_distance: 60.0,
            swipe_threshold: 0.4,
            velocity_threshold: 800.0,
            resistance: 0.3,
            activation_offset: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeOutcome {
    Complete,
    Fail,
}

impl SwipeOutcome {
    /// Task status recorded for this outcome.
    pub fn task_status(self) -> TaskStatus {
        match self {
            Self::Complete => TaskStatus::Completed,
            Self::Fail => TaskStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeState {
    Idle,
    /// `offset` is the damped horizontal translation.
    Dragging { offset: f64 },
    Committed(SwipeOutcome),
    /// Released below thresholds; the item springs back.
    Cancelled,
}

impl SwipeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed(_) | Self::Cancelled)
    }
}

/// Tracks one drag on one list item.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    config: SwipeConfig,
    container_width: f64,
    state: SwipeState,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig, container_width: f64) -> Self {
        Self {
            config,
            container_width,
            state: SwipeState::Idle,
        }
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    /// Records a layout pass of the item.
    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    /// Feeds the raw horizontal translation since touch-down.
    pub fn update(&mut self, translation_x: f64) -> SwipeState {
        match self.state {
            SwipeState::Idle if translation_x.abs() < self.config.activation_offset => {}
            SwipeState::Idle | SwipeState::Dragging { .. } => {
                self.state = SwipeState::Dragging {
                    offset: translation_x * self.config.resistance,
                };
            }
            SwipeState::Committed(_) | SwipeState::Cancelled => {}
        }
        self.state
    }

    /// Finger lifted with horizontal `velocity_x` (points/s).
    ///
    /// Releasing an item that never started dragging leaves it `Idle`
    /// (a tap, handled elsewhere).
    pub fn release(&mut self, velocity_x: f64) -> SwipeState {
        if let SwipeState::Dragging { offset } = self.state {
            self.state = match self.commit_direction(offset, velocity_x) {
                Some(outcome) => SwipeState::Committed(outcome),
                None => SwipeState::Cancelled,
            };
        }
        self.state
    }

    /// Returns to `Idle` after the item settled.
    pub fn reset(&mut self) {
        self.state = SwipeState::Idle;
    }

    fn commit_direction(&self, offset: f64, velocity_x: f64) -> Option<SwipeOutcome> {
        // An unmeasured item has no width to compare against, so any
        // drag past the minimum distance counts as far enough.
        let fraction = if self.container_width > 0.0 {
            (offset / self.container_width).abs()
        } else {
            f64::INFINITY
        };
        let significant = offset.abs() > self.config.min_swipe_distance
            && (fraction > self.config.swipe_threshold
                || velocity_x.abs() > self.config.velocity_threshold);

        if !significant {
            return None;
        }
        if offset > 0.0 {
            Some(SwipeOutcome::Complete)
        } else {
            Some(SwipeOutcome::Fail)
        }
    }
}
