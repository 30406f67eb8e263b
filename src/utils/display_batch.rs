use std::fmt;

use colored::Colorize;

use crate::elements::{
    address_registry::{UnpairedProxy, UpgradePair},
    upgrade_batch::UpgradeBatch,
};

/// What the operator should cross-check before loading the batch into the Safe UI.
pub(crate) struct BatchSummary<'a> {
    pub(crate) network: &'a str,
    pub(crate) batch: &'a UpgradeBatch,
    pub(crate) pairs: &'a [UpgradePair],
    pub(crate) skipped: &'a [UnpairedProxy],
}

impl fmt::Display for BatchSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "== Upgrade batch ==".bold())?;
        writeln!(f, "Network:  {} (chain id {})", self.network, self.batch.chain_id)?;
        writeln!(f, "Safe:     {}", self.batch.meta.created_from_safe_address)?;

        for (pair, tx) in self.pairs.iter().zip(&self.batch.transactions) {
            writeln!(
                f,
                "{} {} {}/{} to {}, new implementation {}",
                "+".green(),
                tx.contract_method.name,
                pair.category,
                pair.base_name,
                tx.to,
                pair.new_implementation
            )?;
        }
        for skipped in self.skipped {
            writeln!(
                f,
                "{} {}/{} has no new implementation",
                "-".yellow(),
                skipped.category,
                skipped.proxy_name
            )?;
        }

        writeln!(
            f,
            "Transactions: {}",
            self.batch.transactions.len().to_string().bold()
        )?;
        write!(f, "Checksum: {}", self.batch.meta.checksum.cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::upgrade_batch::BatchMeta;

    #[test]
    fn lists_scheduled_and_skipped() {
        colored::control::set_override(false);

        let batch = UpgradeBatch {
            version: "1.0".to_string(),
            chain_id: "1513".to_string(),
            created_at: 0,
            meta: BatchMeta {
                name: String::new(),
                description: String::new(),
                tx_builder_version: "1.16.5".to_string(),
                created_from_safe_address: "0xSafe".to_string(),
                created_from_owner_address: String::new(),
                checksum: "0xabc".to_string(),
            },
            transactions: vec![],
        };
        let skipped = [UnpairedProxy {
            category: "iliad".to_string(),
            proxy_name: "Oracle-Proxy".to_string(),
        }];

        let output = BatchSummary {
            network: "iliad",
            batch: &batch,
            pairs: &[],
            skipped: &skipped,
        }
        .to_string();

        assert!(output.contains("Network:  iliad (chain id 1513)"));
        assert!(output.contains("- iliad/Oracle-Proxy has no new implementation"));
        assert!(output.contains("Transactions: 0"));
        assert!(output.ends_with("Checksum: 0xabc"));
    }
}
