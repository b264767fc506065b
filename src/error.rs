//! Structured errors that unwind `Vm::run` instead of panicking the process.
//!
//! The teacher lets stack corruption panic the interpreter outright. This
//! spec calls for every abnormal condition to propagate as a `Result`
//! instead, with EOF and Halt folded back into a clean exit by the caller.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstError {
    /// Input exhausted while scanning for a token.
    Eof,
    /// The `exit` opcode popped the return stack down below `retBase`.
    Halt,
    StackUnderflow,
    ReturnUnderflow,
    ReturnOverflow,
    MemoryLimit,
    /// A program counter or compiled cell pointed outside any valid page.
    ProgSmash,
    InvalidLiteral(String),
    IoFailure(String),
    /// A step panicked (e.g. integer overflow in the host arithmetic); caught
    /// at the run() boundary and reported instead of aborting the process.
    Internal(String),
}

impl fmt::Display for FirstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirstError::Eof => write!(f, "end of input"),
            FirstError::Halt => write!(f, "halt"),
            FirstError::StackUnderflow => write!(f, "stack underflow"),
            FirstError::ReturnUnderflow => write!(f, "return stack underflow"),
            FirstError::ReturnOverflow => write!(f, "return stack overflow"),
            FirstError::MemoryLimit => write!(f, "memory limit exceeded"),
            FirstError::ProgSmash => write!(f, "program counter smashed"),
            FirstError::InvalidLiteral(s) => write!(f, "invalid literal: {}", s),
            FirstError::IoFailure(s) => write!(f, "i/o failure: {}", s),
            FirstError::Internal(s) => write!(f, "internal error: {}", s),
        }
    }
}

impl std::error::Error for FirstError {}

/// How a run terminated when it didn't fail. Both are "successful" from the
/// CLI's point of view, per spec.md §7's propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Eof,
    Halt,
    /// The wall-clock deadline passed between steps (§5 cancellation).
    Cancelled,
}

pub type FirstResult<T> = Result<T, FirstError>;
