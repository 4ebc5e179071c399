//! Workflow status state machine.
//!
//! A workflow moves between statuses along a fixed adjacency table.
//! Transitions never mutate a status in place; they yield a new value.
//!
//! ```text
//! Draft → Active ⇄ Inactive
//!           ⇅    ↘    ⇅
//!        Maintenance ──→ Archived (terminal)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{normalize_key, DomainError, DomainResult};

/// Lifecycle status of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Being authored, never activated
    #[default]
    Draft,
    /// Eligible for execution
    Active,
    /// Paused by a user
    Inactive,
    /// Retired; no further transitions
    Archived,
    /// Temporarily withdrawn for upkeep
    Maintenance,
}

impl WorkflowStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Active,
        Self::Inactive,
        Self::Archived,
        Self::Maintenance,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
            Self::Maintenance => "maintenance",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Archived => "Archived",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Valid transitions from this status.
    pub fn valid_transitions(&self) -> &'static [WorkflowStatus] {
        match self {
            Self::Draft => &[Self::Active, Self::Archived],
            Self::Active => &[Self::Inactive, Self::Maintenance, Self::Archived],
            Self::Inactive => &[Self::Active, Self::Maintenance, Self::Archived],
            Self::Maintenance => &[Self::Active, Self::Inactive, Self::Archived],
            Self::Archived => &[],
        }
    }

    /// Whether the table has an edge to `target`.
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.valid_transitions().contains(&target)
    }

    /// Produce the target status if the table allows it.
    ///
    /// Same-status requests are rejected like any other missing edge.
    pub fn transition_to(&self, target: Self) -> DomainResult<Self> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Only active workflows run.
    pub fn can_be_executed(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn can_be_edited(&self) -> bool {
        matches!(self, Self::Draft | Self::Inactive | Self::Maintenance)
    }
}

/// Whether `current` may move to `target`.
pub fn can_transition(current: WorkflowStatus, target: WorkflowStatus) -> bool {
    current.can_transition_to(target)
}

/// Execute a transition from `current` to `target`.
pub fn transition(current: WorkflowStatus, target: WorkflowStatus) -> DomainResult<WorkflowStatus> {
    current.transition_to(target)
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}
