use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::Address;
use serde::Deserialize;

use crate::errors::BatchError;

pub(crate) const PROXY_SUFFIX: &str = "-Proxy";
pub(crate) const NEW_IMPL_SUFFIX: &str = "-NewImpl";
/// Registry entry used as access manager when none is configured explicitly.
pub(crate) const ACCESS_MANAGER_ENTRY: &str = "AccessManager";

/// Deployed addresses, grouped by category (usually the network) and keyed by
/// the logical contract name.
///
/// Both levels are ordered maps, so iteration does not depend on the key order
/// of the source document.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub(crate) struct AddressRegistry {
    categories: BTreeMap<String, BTreeMap<String, Address>>,
}

/// A `<Base>-Proxy` entry together with its `<Base>-NewImpl` sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UpgradePair {
    pub(crate) category: String,
    pub(crate) base_name: String,
    pub(crate) proxy: Address,
    pub(crate) new_implementation: Address,
}

/// A `<Base>-Proxy` entry without an implementation sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnpairedProxy {
    pub(crate) category: String,
    pub(crate) proxy_name: String,
}

impl AddressRegistry {
    pub(crate) fn load(path: &Path) -> Result<Self, BatchError> {
        let content = fs::read_to_string(path)
            .map_err(|e| BatchError::RegistryRead(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| BatchError::RegistryRead(format!("{}: {}", path.display(), e)))
    }

    pub(crate) fn parse(json: &str) -> Result<Self, BatchError> {
        serde_json::from_str(json).map_err(|e| BatchError::RegistryRead(e.to_string()))
    }

    pub(crate) fn lookup(&self, category: &str, name: &str) -> Option<Address> {
        self.categories.get(category)?.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collects every proxy that has a matching new implementation.
    pub(crate) fn upgrade_pairs(&self) -> Vec<UpgradePair> {
        let mut pairs = vec![];
        for (category, contracts) in &self.categories {
            for (name, proxy) in contracts {
                let Some(base_name) = name.strip_suffix(PROXY_SUFFIX) else {
                    continue;
                };
                if let Some(new_implementation) = contracts.get(&new_impl_name(base_name)) {
                    pairs.push(UpgradePair {
                        category: category.clone(),
                        base_name: base_name.to_string(),
                        proxy: *proxy,
                        new_implementation: *new_implementation,
                    });
                }
            }
        }
        pairs
    }

    /// Proxies that are not mid-upgrade. These are skipped, not treated as errors.
    pub(crate) fn unpaired_proxies(&self) -> Vec<UnpairedProxy> {
        self.categories
            .iter()
            .flat_map(|(category, contracts)| {
                contracts
                    .keys()
                    .filter_map(|name| {
                        let base_name = name.strip_suffix(PROXY_SUFFIX)?;
                        if contracts.contains_key(&new_impl_name(base_name)) {
                            return None;
                        }
                        Some(UnpairedProxy {
                            category: category.clone(),
                            proxy_name: name.clone(),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

fn new_impl_name(base_name: &str) -> String {
    format!("{}{}", base_name, NEW_IMPL_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const REGISTRY: &str = r#"{
        "iliad": {
            "Vault-Proxy": "0x00000000000000000000000000000000000000a1",
            "Vault-NewImpl": "0x00000000000000000000000000000000000000b1",
            "Oracle-Proxy": "0x00000000000000000000000000000000000000a2",
            "AccessManager": "0x00000000000000000000000000000000000000c1"
        },
        "mainnet": {
            "Token-NewImpl": "0x00000000000000000000000000000000000000b3",
            "Token-Proxy": "0x00000000000000000000000000000000000000a3"
        }
    }"#;

    #[test]
    fn pairs_only_proxies_with_siblings() {
        let registry = AddressRegistry::parse(REGISTRY).unwrap();
        let pairs = registry.upgrade_pairs();

        assert_eq!(
            pairs,
            vec![
                UpgradePair {
                    category: "iliad".to_string(),
                    base_name: "Vault".to_string(),
                    proxy: address!("00000000000000000000000000000000000000a1"),
                    new_implementation: address!("00000000000000000000000000000000000000b1"),
                },
                UpgradePair {
                    category: "mainnet".to_string(),
                    base_name: "Token".to_string(),
                    proxy: address!("00000000000000000000000000000000000000a3"),
                    new_implementation: address!("00000000000000000000000000000000000000b3"),
                },
            ]
        );
    }

    #[test]
    fn reports_unpaired_proxies() {
        let registry = AddressRegistry::parse(REGISTRY).unwrap();
        assert_eq!(
            registry.unpaired_proxies(),
            vec![UnpairedProxy {
                category: "iliad".to_string(),
                proxy_name: "Oracle-Proxy".to_string(),
            }]
        );
    }

    #[test]
    fn new_impl_without_proxy_is_ignored() {
        let registry =
            AddressRegistry::parse(r#"{"net":{"Foo-NewImpl":"0x00000000000000000000000000000000000000b1"}}"#)
                .unwrap();
        assert!(registry.upgrade_pairs().is_empty());
        assert!(registry.unpaired_proxies().is_empty());
    }

    #[test]
    fn lookup_by_category() {
        let registry = AddressRegistry::parse(REGISTRY).unwrap();
        assert_eq!(
            registry.lookup("iliad", ACCESS_MANAGER_ENTRY),
            Some(address!("00000000000000000000000000000000000000c1"))
        );
        assert_eq!(registry.lookup("mainnet", ACCESS_MANAGER_ENTRY), None);
        assert_eq!(registry.lookup("unknown", "Vault-Proxy"), None);
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn malformed_registry_is_rejected() {
        assert!(matches!(
            AddressRegistry::parse(r#"{"net":{"Foo-Proxy":"not an address"}}"#),
            Err(BatchError::RegistryRead(_))
        ));
        assert!(matches!(
            AddressRegistry::parse("[1, 2, 3]"),
            Err(BatchError::RegistryRead(_))
        ));
    }

    #[test]
    fn missing_file_is_a_registry_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AddressRegistry::load(&dir.path().join("upgrade-1.1.0-1.json"));
        assert!(matches!(result, Err(BatchError::RegistryRead(_))));
    }
}
