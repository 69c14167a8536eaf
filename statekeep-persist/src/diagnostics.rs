//! Diagnostic warnings and debug traces.
//!
//! Warning bodies are load-bearing: external tooling scrapes them, so the
//! text must not change.

use tracing::{debug, warn};

pub(crate) fn invalid_storage_adaptor_warning(name: &str) -> String {
    format!(
        "{name} does not have a valid storage adaptor.\n\n* Make sure the storage controller has 'getItem', 'setItem' and 'removeItem' methods."
    )
}

pub(crate) fn computed_persist_warning(key: &str) -> String {
    format!("The property '{key}' is computed and will not be persisted.")
}

pub(crate) fn action_persist_warning(key: &str) -> String {
    format!("The property '{key}' is an action and will not be persisted.")
}

pub(crate) fn warn_invalid_storage_adaptor_if(invalid: bool, name: &str) {
    if invalid {
        warn!("{}", invalid_storage_adaptor_warning(name));
    }
}

pub(crate) fn warn_computed_persist_if(is_computed: bool, key: &str) {
    if is_computed {
        warn!("{}", computed_persist_warning(key));
    }
}

pub(crate) fn warn_action_persist_if(is_action: bool, key: &str) {
    if is_action {
        warn!("{}", action_persist_warning(key));
    }
}

pub(crate) fn debug_if(enabled: bool, message: &str) {
    if enabled {
        debug!("{message}");
    }
}
