//! Enumerated task vocabularies: status, priority, and progress state.
//!
//! Storage and wire tokens are the Spanish words the board has always used.
//! Parsing accepts only the exact lowercase tokens.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task is open for work.
    #[default]
    #[serde(rename = "activo")]
    Active,
    /// Task is parked.
    #[serde(rename = "inactivo")]
    Inactive,
    /// Task is done.
    #[serde(rename = "finalizado")]
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "activo",
            Self::Inactive => "inactivo",
            Self::Completed => "finalizado",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "activo" => Ok(Self::Active),
            "inactivo" => Ok(Self::Inactive),
            "finalizado" => Ok(Self::Completed),
            _ => Err(TaskDomainError::InvalidStatus(value.to_owned())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Low priority.
    #[serde(rename = "baja")]
    Low,
    /// Medium priority, the default.
    #[default]
    #[serde(rename = "media")]
    Medium,
    /// High priority.
    #[serde(rename = "alta")]
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "baja" => Ok(Self::Low),
            "media" => Ok(Self::Medium),
            "alta" => Ok(Self::High),
            _ => Err(TaskDomainError::InvalidPriority(value.to_owned())),
        }
    }
}

/// Work progress reported on a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressState {
    /// Work has not started.
    #[default]
    #[serde(rename = "inicializado")]
    NotStarted,
    /// Work is under way.
    #[serde(rename = "en proceso")]
    InProgress,
    /// Work is finished.
    #[serde(rename = "finalizado")]
    Completed,
}

impl ProgressState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "inicializado",
            Self::InProgress => "en proceso",
            Self::Completed => "finalizado",
        }
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProgressState {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "inicializado" => Ok(Self::NotStarted),
            "en proceso" => Ok(Self::InProgress),
            "finalizado" => Ok(Self::Completed),
            _ => Err(TaskDomainError::InvalidProgressState(value.to_owned())),
        }
    }
}
