use std::{collections::BTreeMap, fmt, str::FromStr};

use alloy::{
    hex,
    primitives::{aliases::U48, Address, Bytes},
    sol,
    sol_types::SolCall,
};
use serde::{Deserialize, Serialize};

use crate::errors::BatchError;

sol! {
    /// AccessManager entry point used to delay the upgrade.
    function schedule(address target, bytes data, uint48 when) external returns (bytes32 operationId, uint32 nonce);

    function upgradeTo(address newImplementation) external;
}

/// Largest value accepted for the `uint48 when` argument.
pub(crate) const MAX_WHEN: u64 = (1 << 48) - 1;

/// Argument values keyed by parameter name, as the transaction builder expects them.
pub(crate) type ContractInputsValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MethodInput {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) ty: String,
    #[serde(rename = "internalType")]
    pub(crate) internal_type: String,
}

impl MethodInput {
    fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            internal_type: ty.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ContractMethod {
    pub(crate) inputs: Vec<MethodInput>,
    pub(crate) name: String,
    pub(crate) payable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MethodKind {
    /// Queue a call through the access manager.
    #[default]
    Schedule,
    /// Point the proxy at its new implementation.
    Upgrade,
}

impl MethodKind {
    pub(crate) fn contract_method(&self) -> ContractMethod {
        match self {
            MethodKind::Schedule => ContractMethod {
                inputs: vec![
                    MethodInput::new("target", "address"),
                    MethodInput::new("data", "bytes"),
                    MethodInput::new("when", "uint48"),
                ],
                name: "schedule".to_string(),
                payable: false,
            },
            MethodKind::Upgrade => ContractMethod {
                inputs: vec![MethodInput::new("newImplementation", "address")],
                name: "upgradeTo".to_string(),
                payable: false,
            },
        }
    }

    pub(crate) fn signature(&self) -> &'static str {
        match self {
            MethodKind::Schedule => scheduleCall::SIGNATURE,
            MethodKind::Upgrade => upgradeToCall::SIGNATURE,
        }
    }

    /// Returns the method descriptor and the argument values for one proxy upgrade.
    ///
    /// For `schedule` the `data` argument carries the full `upgradeTo` calldata.
    pub(crate) fn derive_call(
        &self,
        proxy: Address,
        new_implementation: Address,
        when: U48,
    ) -> (ContractMethod, ContractInputsValues) {
        let values = match self {
            MethodKind::Schedule => BTreeMap::from([
                ("target".to_string(), proxy.to_checksum(None)),
                (
                    "data".to_string(),
                    hex::encode_prefixed(encode_upgrade_call(new_implementation)),
                ),
                ("when".to_string(), when.to_string()),
            ]),
            MethodKind::Upgrade => BTreeMap::from([(
                "newImplementation".to_string(),
                new_implementation.to_checksum(None),
            )]),
        };

        (self.contract_method(), values)
    }
}

pub(crate) fn encode_upgrade_call(new_implementation: Address) -> Bytes {
    upgradeToCall {
        newImplementation: new_implementation,
    }
    .abi_encode()
    .into()
}

pub(crate) fn parse_when(when: u64) -> Result<U48, BatchError> {
    if when > MAX_WHEN {
        return Err(BatchError::InvalidWhen(when));
    }
    Ok(U48::from(when))
}

impl FromStr for MethodKind {
    type Err = BatchError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind.to_ascii_lowercase().as_str() {
            "schedule" => Ok(MethodKind::Schedule),
            "upgrade" => Ok(MethodKind::Upgrade),
            _ => Err(BatchError::UnknownMethodKind(kind.to_string())),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::Schedule => write!(f, "schedule"),
            MethodKind::Upgrade => write!(f, "upgrade"),
        }
    }
}
