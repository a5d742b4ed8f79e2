//! Encoder configuration
//!
//! [`EncodeOptions`] is plain serde data, so it can sit inside a larger
//! application config file. Every field has a default.

use crate::constants::vmess_default;
use serde::{Deserialize, Serialize};

/// How Trojan display labels become URI fragments.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FragmentMode {
    /// Append `#remarks` and then `#name`, each when non-empty.
    ///
    /// A record carrying both yields two fragments, which some clients reject.
    #[default]
    Legacy,
    /// Emit at most one fragment; `name` wins over `remarks`.
    Single,
}

/// Options shared by every encoder of one [`LinkEncoder`](crate::LinkEncoder).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EncodeOptions {
    /// Prepended to VMess and Trojan display names
    pub name_prefix: String,
    /// Trojan fragment policy
    pub trojan_fragment: FragmentMode,
    /// Indentation width of the VMess JSON payload
    pub vmess_indent: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            name_prefix: String::new(),
            trojan_fragment: FragmentMode::default(),
            vmess_indent: vmess_default::INDENT,
        }
    }
}

impl EncodeOptions {
    /// Default options with the given display-name prefix
    pub fn with_prefix(name_prefix: impl Into<String>) -> Self {
        EncodeOptions {
            name_prefix: name_prefix.into(),
            ..Self::default()
        }
    }
}
