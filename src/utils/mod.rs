use alloy::primitives::keccak256;

use crate::{elements::proposed_transaction::ProposedTransaction, errors::BatchError};

pub(crate) mod batch_writer;
pub(crate) mod display_batch;
pub(crate) mod network_resolver;

/// Integrity tag over the compact JSON encoding of the transactions.
///
/// Only meant to catch accidental corruption, anyone editing the file can recompute it.
pub(crate) fn compute_checksum(transactions: &[ProposedTransaction]) -> Result<String, BatchError> {
    let serialized = serde_json::to_string(transactions)
        .map_err(|e| BatchError::Serialize(format!("transactions: {}", e)))?;

    Ok(keccak256(serialized.as_bytes()).to_string())
}
