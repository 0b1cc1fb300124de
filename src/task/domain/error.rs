//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is missing or empty after trimming.
    #[error("title is required")]
    EmptyTitle,

    /// The status is not one of `activo`, `inactivo`, `finalizado`.
    #[error("status must be activo, inactivo, or finalizado, got '{0}'")]
    InvalidStatus(String),

    /// The priority is not one of `baja`, `media`, `alta`.
    #[error("priority must be baja, media, or alta, got '{0}'")]
    InvalidPriority(String),

    /// The progress state is not one of `inicializado`, `en proceso`,
    /// `finalizado`.
    #[error("progress state must be inicializado, en proceso, or finalizado, got '{0}'")]
    InvalidProgressState(String),

    /// A progress update carried neither a comment nor a progress state.
    #[error("comment or progress state is required")]
    EmptyProgressUpdate,

    /// A patch did not name any field to change.
    #[error("no fields to update")]
    EmptyPatch,
}
