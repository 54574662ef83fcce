//! Delegate error types
//!
//! Only dispatch to a bound method can fail. Removing something that was
//! never registered is not an error.

use crate::identity::{FunctionId, ReceiverId};

/// Error type for delegate invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateError {
    /// The receiver was dropped after the method was registered
    StaleReceiver {
        receiver: ReceiverId,
        function: FunctionId,
    },
    /// The receiver is already borrowed (e.g. a callback re-entering its own receiver)
    ReceiverBusy {
        receiver: ReceiverId,
        function: FunctionId,
    },
}

impl DelegateError {
    /// Receiver the failed call was bound to
    pub fn receiver(&self) -> ReceiverId {
        match self {
            DelegateError::StaleReceiver { receiver, .. }
            | DelegateError::ReceiverBusy { receiver, .. } => *receiver,
        }
    }

    /// Method the failed call was bound to
    pub fn function(&self) -> FunctionId {
        match self {
            DelegateError::StaleReceiver { function, .. }
            | DelegateError::ReceiverBusy { function, .. } => *function,
        }
    }
}

impl std::fmt::Display for DelegateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelegateError::StaleReceiver { receiver, function } => {
                write!(f, "Receiver dropped: {} (method {})", receiver, function)
            }
            DelegateError::ReceiverBusy { receiver, function } => {
                write!(f, "Receiver already borrowed: {} (method {})", receiver, function)
            }
        }
    }
}

impl std::error::Error for DelegateError {}
