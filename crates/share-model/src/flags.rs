//! Namespaced flag paths
//!
//! Flags are persisted inside the actor source under
//! `flags.<module>.<tool>.<key>`.

use serde_json::Value;

use crate::patch;

/// Namespace of every flag written by this module
pub const MODULE_ID: &str = "toolbelt";

/// Tool scope inside the module namespace
pub const TOOL: &str = "share";

/// Full document path of a tool flag (`flags.toolbelt.share.<key>`)
pub fn flag_path(key: &str) -> String {
    format!("flags.{MODULE_ID}.{TOOL}.{key}")
}

/// Path of a flag relative to the `flags` object
fn relative_path(key: &str) -> String {
    format!("{MODULE_ID}.{TOOL}.{key}")
}

/// Read a tool flag from a `flags` object
pub fn get_flag<'a>(flags: &'a Value, key: &str) -> Option<&'a Value> {
    patch::get_property(flags, &relative_path(key)).filter(|value| !value.is_null())
}

/// Change that sets a tool flag
pub fn set_flag_change(key: &str, value: Value) -> Value {
    patch::nested(&flag_path(key), value)
}

/// Change that removes a tool flag
pub fn unset_flag_change(key: &str) -> Value {
    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (flag_path(parent), leaf),
        None => (format!("flags.{MODULE_ID}.{TOOL}"), key),
    };
    patch::nested(&format!("{parent}.{}", patch::deletion_key(leaf)), Value::Null)
}
