//! Workflow priority and its scheduling profile.
//!
//! Two orderings live side by side here and must not be confused:
//! `weight` grows with importance, `execution_order` is the scheduling
//! sort key and shrinks with importance (1 runs first).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{normalize_key, DomainError, DomainResult};

/// Priority level for workflows.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPriority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

/// Severity attached to notifications emitted for a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Digest only
    Low,
    /// Regular channel
    Normal,
    /// Prompt delivery
    High,
    /// Page someone
    Critical,
}

impl NotificationLevel {
    /// Every level, quietest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Normal, Self::High, Self::Critical];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification levels belong to the priority profile, so unknown names
/// are reported as `InvalidPriority`.
impl FromStr for NotificationLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == key)
            .ok_or_else(|| DomainError::InvalidPriority(format!("unknown notification level: {s}")))
    }
}

/// Scheduling and operational parameters owned by a priority level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityCharacteristics {
    /// Scheduling rank, lower runs sooner
    pub execution_order: u32,
    /// Upper bound on simultaneous runs
    pub max_concurrent_executions: u32,
    /// Factor applied to a base timeout
    pub timeout_multiplier: f64,
    /// Retries granted before giving up
    pub retry_attempts: u32,
    /// Severity for notifications
    pub notification_level: NotificationLevel,
}

/// Indexed by `weight() - 1`.
static PRIORITY_TABLE: [PriorityCharacteristics; 4] = [
    PriorityCharacteristics {
        execution_order: 4,
        max_concurrent_executions: 2,
        timeout_multiplier: 0.5,
        retry_attempts: 1,
        notification_level: NotificationLevel::Low,
    },
    PriorityCharacteristics {
        execution_order: 3,
        max_concurrent_executions: 5,
        timeout_multiplier: 1.0,
        retry_attempts: 3,
        notification_level: NotificationLevel::Normal,
    },
    PriorityCharacteristics {
        execution_order: 2,
        max_concurrent_executions: 10,
        timeout_multiplier: 1.5,
        retry_attempts: 5,
        notification_level: NotificationLevel::High,
    },
    PriorityCharacteristics {
        execution_order: 1,
        max_concurrent_executions: 20,
        timeout_multiplier: 2.0,
        retry_attempts: 10,
        notification_level: NotificationLevel::Critical,
    },
];

impl WorkflowPriority {
    /// Every level, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Magnitude used for comparisons (Low=1 .. Urgent=4).
    pub fn weight(&self) -> u8 {
        *self as u8
    }

    /// Row of the priority table for this level.
    pub fn characteristics(&self) -> &'static PriorityCharacteristics {
        &PRIORITY_TABLE[usize::from(self.weight() - 1)]
    }

    /// Scheduling sort key (Urgent=1 is first to execute).
    pub fn execution_order(&self) -> u32 {
        self.characteristics().execution_order
    }

    /// Upper bound on simultaneous runs.
    pub fn max_concurrent_executions(&self) -> u32 {
        self.characteristics().max_concurrent_executions
    }

    /// Factor applied to a base timeout.
    pub fn timeout_multiplier(&self) -> f64 {
        self.characteristics().timeout_multiplier
    }

    /// Retries before giving up.
    pub fn retry_attempts(&self) -> u32 {
        self.characteristics().retry_attempts
    }

    /// Severity for notifications.
    pub fn notification_level(&self) -> NotificationLevel {
        self.characteristics().notification_level
    }

    /// Base timeout scaled by this level's multiplier.
    pub fn scaled_timeout(&self, base_seconds: u64) -> f64 {
        base_seconds as f64 * self.timeout_multiplier()
    }

    /// Strictly more important than `other`.
    pub fn greater_than(&self, other: Self) -> bool {
        self.weight() > other.weight()
    }

    /// Strictly less important than `other`.
    pub fn less_than(&self, other: Self) -> bool {
        self.weight() < other.weight()
    }

    /// Same weight as `other`.
    pub fn equal(&self, other: Self) -> bool {
        self.weight() == other.weight()
    }

    /// Parse a level name, failing with `InvalidPriority`.
    pub fn parse(s: &str) -> DomainResult<Self> {
        s.parse()
    }
}

impl fmt::Display for WorkflowPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == key)
            .ok_or_else(|| DomainError::InvalidPriority(s.to_string()))
    }
}
