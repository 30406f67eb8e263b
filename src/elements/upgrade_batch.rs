use alloy::primitives::{aliases::U48, Address};
use serde::{Deserialize, Serialize};

use super::{
    address_registry::{AddressRegistry, UpgradePair, ACCESS_MANAGER_ENTRY},
    method_kind::MethodKind,
    proposed_transaction::ProposedTransaction,
};
use crate::{errors::BatchError, utils::compute_checksum};

pub(crate) const SCHEMA_VERSION: &str = "1.0";
pub(crate) const TX_BUILDER_VERSION: &str = "1.16.5";

/// Everything the builder needs to know about the target network and the batch.
#[derive(Debug, Clone)]
pub(crate) struct BatchConfig {
    pub(crate) chain_id: u64,
    pub(crate) safe_address: Address,
    pub(crate) owner_address: Option<Address>,
    /// Falls back to the `AccessManager` registry entry of each category.
    pub(crate) access_manager: Option<Address>,
    pub(crate) kind: MethodKind,
    pub(crate) when: U48,
    pub(crate) name: String,
    pub(crate) description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchMeta {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) tx_builder_version: String,
    pub(crate) created_from_safe_address: String,
    pub(crate) created_from_owner_address: String,
    pub(crate) checksum: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpgradeBatch {
    pub(crate) version: String,
    pub(crate) chain_id: String,
    pub(crate) created_at: i64,
    pub(crate) meta: BatchMeta,
    pub(crate) transactions: Vec<ProposedTransaction>,
}

impl UpgradeBatch {
    /// Checks that the stored checksum still matches the transaction list.
    pub(crate) fn checksum_matches(&self) -> bool {
        compute_checksum(&self.transactions)
            .map(|checksum| checksum == self.meta.checksum)
            .unwrap_or(false)
    }
}

pub(crate) struct UpgradeBatchBuilder {
    config: BatchConfig,
}

impl UpgradeBatchBuilder {
    pub(crate) fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Builds the entry for one pair. The access manager is only resolved for `upgrade`.
    pub(crate) fn build_transaction(
        &self,
        registry: &AddressRegistry,
        pair: &UpgradePair,
    ) -> Result<ProposedTransaction, BatchError> {
        let tx = match self.config.kind {
            MethodKind::Schedule => ProposedTransaction::schedule(
                pair.proxy,
                pair.new_implementation,
                self.config.when,
            ),
            MethodKind::Upgrade => ProposedTransaction::upgrade(
                self.access_manager_for(registry, &pair.category)?,
                pair.proxy,
                pair.new_implementation,
                self.config.when,
            ),
        };
        log::debug!(
            "{} on {}-Proxy ({}) -> {}",
            self.config.kind.signature(),
            pair.base_name,
            pair.proxy,
            pair.new_implementation
        );
        Ok(tx)
    }

    /// Turns every proxy / new implementation pair into one proposed transaction.
    pub(crate) fn process_registry(
        &self,
        registry: &AddressRegistry,
    ) -> Result<Vec<ProposedTransaction>, BatchError> {
        for skipped in registry.unpaired_proxies() {
            log::warn!(
                "Skipping {} in {}: no new implementation",
                skipped.proxy_name,
                skipped.category
            );
        }

        registry
            .upgrade_pairs()
            .iter()
            .map(|pair| self.build_transaction(registry, pair))
            .collect()
    }

    /// Builds the whole batch. The checksum is taken once the transaction list is final.
    pub(crate) fn build(
        &self,
        registry: &AddressRegistry,
        created_at: i64,
    ) -> Result<UpgradeBatch, BatchError> {
        let transactions = self.process_registry(registry)?;
        let checksum = compute_checksum(&transactions)?;

        Ok(UpgradeBatch {
            version: SCHEMA_VERSION.to_string(),
            chain_id: self.config.chain_id.to_string(),
            created_at,
            meta: BatchMeta {
                name: self.config.name.clone(),
                description: self.config.description.clone(),
                tx_builder_version: TX_BUILDER_VERSION.to_string(),
                created_from_safe_address: self.config.safe_address.to_checksum(None),
                created_from_owner_address: self
                    .config
                    .owner_address
                    .map(|owner| owner.to_checksum(None))
                    .unwrap_or_default(),
                checksum,
            },
            transactions,
        })
    }

    fn access_manager_for(
        &self,
        registry: &AddressRegistry,
        category: &str,
    ) -> Result<Address, BatchError> {
        self.config
            .access_manager
            .or_else(|| registry.lookup(category, ACCESS_MANAGER_ENTRY))
            .ok_or_else(|| BatchError::UnresolvedAccessManager(category.to_string()))
    }
}
