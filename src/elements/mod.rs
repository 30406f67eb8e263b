pub(crate) mod address_registry;
pub(crate) mod method_kind;
pub(crate) mod proposed_transaction;
pub(crate) mod upgrade_batch;
