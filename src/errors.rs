//! Errors that can abort building an upgrade batch.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

#[derive(Debug)]
pub(crate) enum BatchError {
    /// The address registry is missing or malformed.
    RegistryRead(String),
    /// The chain id or the Safe address could not be determined.
    UnresolvedNetwork(String),
    /// A method kind outside of `schedule` / `upgrade` was requested.
    UnknownMethodKind(String),
    /// The `when` argument does not fit into `uint48`.
    InvalidWhen(u64),
    /// No access manager is known for a pair that needs one.
    UnresolvedAccessManager(String),
    /// The transactions or the batch could not be serialized.
    Serialize(String),
    /// The batch could not be persisted.
    WriteBatch(String),
}

impl Display for BatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::RegistryRead(s) => write!(f, "error reading address registry: {}", s),
            BatchError::UnresolvedNetwork(s) => write!(f, "unresolved network: {}", s),
            BatchError::UnknownMethodKind(s) => write!(f, "unknown method kind: {}", s),
            BatchError::InvalidWhen(when) => {
                write!(f, "`when` value {} does not fit into uint48", when)
            }
            BatchError::UnresolvedAccessManager(s) => {
                write!(f, "no access manager for category {}", s)
            }
            BatchError::Serialize(s) => write!(f, "error serializing batch: {}", s),
            BatchError::WriteBatch(s) => write!(f, "error writing batch: {}", s),
        }
    }
}

impl Error for BatchError {}
