use std::{collections::BTreeMap, fs, path::Path};

use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
};
use reqwest::Url;
use serde::Deserialize;

use crate::errors::BatchError;

const LOCALHOST_URL: &str = "http://127.0.0.1:8545/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct NetworkConfig {
    #[serde(default)]
    pub(crate) chain_id: Option<u64>,
    #[serde(default)]
    pub(crate) url: Option<String>,
}

/// Layout of the optional `--networks-file`.
#[derive(Debug, Deserialize)]
struct NetworksFile {
    #[serde(default)]
    networks: BTreeMap<String, NetworkConfig>,
}

pub(crate) struct NetworkResolver {
    networks: BTreeMap<String, NetworkConfig>,
}

impl Default for NetworkResolver {
    fn default() -> Self {
        Self::with_known_networks()
    }
}

impl NetworkResolver {
    pub(crate) fn with_known_networks() -> Self {
        let known = [
            ("hardhat", 31337, None),
            ("localhost", 31337, Some(LOCALHOST_URL)),
            ("mainnet", 1, None),
            ("sepolia", 11155111, None),
            ("iliad", 1513, None),
        ];

        Self {
            networks: known
                .into_iter()
                .map(|(name, chain_id, url)| {
                    (
                        name.to_string(),
                        NetworkConfig {
                            chain_id: Some(chain_id),
                            url: url.map(str::to_string),
                        },
                    )
                })
                .collect(),
        }
    }

    pub(crate) fn extend_from_file(&mut self, path: &Path) -> Result<(), BatchError> {
        let yaml = fs::read_to_string(path).map_err(|e| {
            BatchError::UnresolvedNetwork(format!("reading {}: {}", path.display(), e))
        })?;
        self.extend_from_yaml(&yaml)
    }

    /// Entries from `yaml` replace known networks of the same name.
    pub(crate) fn extend_from_yaml(&mut self, yaml: &str) -> Result<(), BatchError> {
        let file: NetworksFile = serde_yaml::from_str(yaml)
            .map_err(|e| BatchError::UnresolvedNetwork(format!("parsing networks file: {}", e)))?;
        for (name, config) in file.networks {
            self.networks.insert(name.to_lowercase(), config);
        }
        Ok(())
    }

    /// Merges the table entry for `name` with the RPC override or `<NETWORK>_URL`.
    pub(crate) fn network_config(
        &self,
        name: &str,
        rpc_url: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<NetworkConfig, BatchError> {
        let mut config = self
            .networks
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_default();

        if let Some(url) = rpc_url.or_else(|| env(&format!("{}_URL", env_prefix(name)))) {
            config.url = Some(url);
        }

        if config.url.is_none() && config.chain_id.is_none() {
            return Err(BatchError::UnresolvedNetwork(format!(
                "unknown network {} and no RPC url given",
                name
            )));
        }

        Ok(config)
    }
}

/// Asks the RPC for the chain id, falling back to the configured one when no RPC is known.
pub(crate) async fn resolve_chain_id(name: &str, config: &NetworkConfig) -> Result<u64, BatchError> {
    let Some(url) = &config.url else {
        return config.chain_id.ok_or_else(|| {
            BatchError::UnresolvedNetwork(format!("no chain id or RPC url for {}", name))
        });
    };

    let provider_chain_id = fetch_chain_id(url).await?;
    check_chain_id(name, config.chain_id, provider_chain_id)
}

/// The RPC must report the chain id the network table expects, if it expects one.
pub(crate) fn check_chain_id(
    name: &str,
    expected: Option<u64>,
    actual: u64,
) -> Result<u64, BatchError> {
    match expected {
        Some(expected) if expected != actual => Err(BatchError::UnresolvedNetwork(format!(
            "chain id mismatch for {}: {} vs {}",
            name, expected, actual
        ))),
        _ => Ok(actual),
    }
}

async fn fetch_chain_id(url: &str) -> Result<u64, BatchError> {
    let parsed: Url = url
        .parse()
        .map_err(|e| BatchError::UnresolvedNetwork(format!("invalid RPC url {}: {}", url, e)))?;
    let provider = ProviderBuilder::new().on_http(parsed);

    provider.get_chain_id().await.map_err(|e| {
        BatchError::UnresolvedNetwork(format!("querying chain id from {}: {}", url, e))
    })
}

/// The explicit address if given, otherwise `<NETWORK>_SAFE_ADDRESS`.
pub(crate) fn resolve_safe_address(
    name: &str,
    safe_address: Option<Address>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Address, BatchError> {
    if let Some(address) = safe_address {
        return Ok(address);
    }

    let key = format!("{}_SAFE_ADDRESS", env_prefix(name));
    let value = env(&key)
        .ok_or_else(|| BatchError::UnresolvedNetwork(format!("{} is not set", key)))?;
    value
        .trim()
        .parse()
        .map_err(|e| BatchError::UnresolvedNetwork(format!("{} is not an address: {}", key, e)))
}

fn env_prefix(name: &str) -> String {
    name.to_uppercase().replace('-', "_")
}
