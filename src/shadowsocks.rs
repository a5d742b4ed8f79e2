//! Shadowsocks link encoder (SIP002)
//!
//! Link format: `ss://base64(cipher:password)@host:port[#name]`
//!
//! **Record keys**: `server`, `port`, `cipher`, `password` (required); `name`, `udp`,
//! `plugin`, `plugin-opts` (optional). Plugin settings and `udp` are validated
//! but not carried in the link.
//!
//! The userinfo is standard padded Base64 of `cipher:password`, so neither
//! part needs escaping. The name is query-escaped into the fragment; the
//! encoder's name prefix is not applied to Shadowsocks links.

use crate::ToLink;
use crate::config::EncodeOptions;
use crate::constants::{key, scheme};
use crate::error::Result;
use crate::record::{Fields, Record};
use crate::uri;
use serde_json::Value;
use std::collections::BTreeMap;

const PLUGIN: &str = "plugin";
const PLUGIN_OPTS: &str = "plugin-opts";

/// Shadowsocks options decoded from a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowsocksOption {
    /// Display name
    pub name: String,
    /// Server address
    pub server: String,
    /// Server port
    pub port: u16,
    /// Password
    pub password: String,
    /// Encryption method (aes-256-gcm, chacha20-ietf-poly1305, etc.)
    pub cipher: String,
    /// UDP relay enabled
    pub udp: bool,
    /// Plugin name (obfs, v2ray-plugin, ...)
    pub plugin: String,
    /// Plugin settings, values as given in the record
    pub plugin_opts: BTreeMap<String, Value>,
}

impl ToLink for ShadowsocksOption {
    fn from_record(record: &Record) -> Result<Self> {
        let fields = Fields::new(record);
        Ok(ShadowsocksOption {
            name: fields.string_or_default(key::NAME)?,
            server: fields.required_string(key::SERVER)?,
            port: fields.required_port(key::PORT)?,
            password: fields.required_string(key::PASSWORD)?,
            cipher: fields.required_string(key::CIPHER)?,
            udp: fields.bool(key::UDP)?,
            plugin: fields.string_or_default(PLUGIN)?,
            plugin_opts: fields.value_map(PLUGIN_OPTS)?,
        })
    }

    fn to_link(&self, _options: &EncodeOptions) -> Result<String> {
        let user_info = uri::b64(&format!("{}:{}", self.cipher, self.password));
        let mut link = format!(
            "{}{}@{}",
            scheme::SHADOWSOCKS,
            user_info,
            uri::authority(&self.server, self.port)
        );

        if !self.name.is_empty() {
            link.push('#');
            link.push_str(&uri::query_escape(&self.name));
        }

        Ok(link)
    }
}
