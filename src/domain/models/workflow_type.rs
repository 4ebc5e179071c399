//! Workflow type and its structural capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{normalize_key, DomainError, DomainResult};

/// Kind of workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    #[default]
    Automation,
    Integration,
    Notification,
    DataProcessing,
    Approval,
    Scheduled,
    Trigger,
}

/// Capability flags and execution ceiling for a workflow type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCharacteristics {
    /// Can be started by an external trigger
    pub supports_triggers: bool,
    /// Can branch on conditions
    pub supports_conditions: bool,
    /// Can run actions
    pub supports_actions: bool,
    /// Can run on a schedule
    pub supports_scheduling: bool,
    /// Needs sign-off before running
    pub requires_approval: bool,
    /// Ceiling in seconds
    pub max_execution_time: u64,
    /// Steps may run concurrently
    pub supports_parallel_execution: bool,
}

const fn profile(
    supports_triggers: bool,
    supports_scheduling: bool,
    requires_approval: bool,
    max_execution_time: u64,
    supports_parallel_execution: bool,
) -> TypeCharacteristics {
    TypeCharacteristics {
        supports_triggers,
        supports_conditions: true,
        supports_actions: true,
        supports_scheduling,
        requires_approval,
        max_execution_time,
        supports_parallel_execution,
    }
}

/// Indexed by declaration order of `WorkflowType`.
static TYPE_TABLE: [TypeCharacteristics; 7] = [
    profile(true, true, false, 3600, true),
    profile(true, true, false, 1800, true),
    profile(true, true, false, 300, true),
    profile(true, true, false, 7200, true),
    profile(true, false, true, 86_400, false),
    profile(false, true, false, 3600, true),
    profile(true, false, false, 600, true),
];

impl WorkflowType {
    /// Every type, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Automation,
        Self::Integration,
        Self::Notification,
        Self::DataProcessing,
        Self::Approval,
        Self::Scheduled,
        Self::Trigger,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automation => "automation",
            Self::Integration => "integration",
            Self::Notification => "notification",
            Self::DataProcessing => "data_processing",
            Self::Approval => "approval",
            Self::Scheduled => "scheduled",
            Self::Trigger => "trigger",
        }
    }

    /// Capability row for this type.
    pub fn characteristics(&self) -> &'static TypeCharacteristics {
        &TYPE_TABLE[*self as usize]
    }

    pub fn supports_triggers(&self) -> bool {
        self.characteristics().supports_triggers
    }

    pub fn supports_conditions(&self) -> bool {
        self.characteristics().supports_conditions
    }

    pub fn supports_actions(&self) -> bool {
        self.characteristics().supports_actions
    }

    pub fn supports_scheduling(&self) -> bool {
        self.characteristics().supports_scheduling
    }

    pub fn requires_approval(&self) -> bool {
        self.characteristics().requires_approval
    }

    pub fn supports_parallel_execution(&self) -> bool {
        self.characteristics().supports_parallel_execution
    }

    /// Execution ceiling in seconds.
    pub fn max_execution_time(&self) -> u64 {
        self.characteristics().max_execution_time
    }

    /// Parse a type name, failing with `InvalidType`.
    pub fn parse(s: &str) -> DomainResult<Self> {
        s.parse()
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| DomainError::InvalidType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_profile() {
        let approval = WorkflowType::Approval;
        assert!(approval.requires_approval());
        assert!(!approval.supports_scheduling());
        assert!(!approval.supports_parallel_execution());
        assert_eq!(approval.max_execution_time(), 86_400);
    }

    #[test]
    fn test_only_approval_requires_approval() {
        let requiring: Vec<_> = WorkflowType::ALL
            .into_iter()
            .filter(WorkflowType::requires_approval)
            .collect();
        assert_eq!(requiring, vec![WorkflowType::Approval]);
    }

    #[test]
    fn test_scheduled_has_no_triggers() {
        assert!(!WorkflowType::Scheduled.supports_triggers());
        assert!(WorkflowType::Scheduled.supports_scheduling());
        assert!(!WorkflowType::Trigger.supports_scheduling());
    }

    #[test]
    fn test_every_type_supports_conditions_and_actions() {
        for kind in WorkflowType::ALL {
            assert!(kind.supports_conditions(), "{kind}");
            assert!(kind.supports_actions(), "{kind}");
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(WorkflowType::parse("data-processing").unwrap(), WorkflowType::DataProcessing);
        assert_eq!(WorkflowType::parse("Trigger").unwrap(), WorkflowType::Trigger);
        assert_eq!(
            WorkflowType::parse("webhook"),
            Err(DomainError::InvalidType("webhook".to_string()))
        );
    }

    #[test]
    fn test_serde_roundtrip_name() {
        let json = serde_json::to_string(&WorkflowType::DataProcessing).unwrap();
        assert_eq!(json, "\"data_processing\"");
    }
}
