use alloy::primitives::{aliases::U48, Address};
use serde::{Deserialize, Serialize, Serializer};

use super::method_kind::{ContractInputsValues, ContractMethod, MethodKind};

/// One entry of a transaction builder batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProposedTransaction {
    #[serde(serialize_with = "serialize_checksummed")]
    pub(crate) to: Address,
    pub(crate) value: String,
    /// Raw calldata. Stays empty while `contract_method` is set, the UI encodes from it.
    pub(crate) data: Option<String>,
    pub(crate) contract_method: ContractMethod,
    pub(crate) contract_inputs_values: ContractInputsValues,
}

impl ProposedTransaction {
    /// `schedule` is exposed by the proxy itself, so the entry is addressed to it.
    pub(crate) fn schedule(proxy: Address, new_implementation: Address, when: U48) -> Self {
        Self::from_call(proxy, MethodKind::Schedule, proxy, new_implementation, when)
    }

    /// Direct `upgradeTo` entries are addressed to the access manager.
    pub(crate) fn upgrade(
        access_manager: Address,
        proxy: Address,
        new_implementation: Address,
        when: U48,
    ) -> Self {
        Self::from_call(
            access_manager,
            MethodKind::Upgrade,
            proxy,
            new_implementation,
            when,
        )
    }

    fn from_call(
        to: Address,
        kind: MethodKind,
        proxy: Address,
        new_implementation: Address,
        when: U48,
    ) -> Self {
        let (contract_method, contract_inputs_values) =
            kind.derive_call(proxy, new_implementation, when);

        Self {
            to,
            value: "0".to_string(),
            data: None,
            contract_method,
            contract_inputs_values,
        }
    }
}

fn serialize_checksummed<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}
