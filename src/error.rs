//! Error types for topic-jail
//!
//! This module defines the main error type used throughout the crate and the
//! `Result` alias. Denied access is *not* an error: it is a normal decision
//! outcome, see [`crate::jail::AccessDecision`].

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type alias for topic-jail operations
pub type Result<T> = std::result::Result<T, JailError>;

/// Main error type for topic-jail
#[derive(Error, Debug)]
pub enum JailError {
    /// A fresh topic or comparison string could not be allocated. This aborts
    /// the single operation in progress; the original topic stays untouched
    /// and owned by the caller.
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// A hook with the same name is already registered. Registration is
    /// propagate-and-abort: the host must treat this as fatal to startup.
    #[error("hook already registered: {0}")]
    HookAlreadyRegistered(String),
}
