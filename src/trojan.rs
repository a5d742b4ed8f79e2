//! Trojan link encoder
//!
//! Link format: `trojan://password@host:port[?allowInsecure=1][&sni=<sni>][#<prefix+label>]`
//!
//! **Record keys**: `server`, `port`, `password` (required); `sni`, `skip-cert-verify`,
//! `alpn` (string list), `name`, `remarks` (optional). `alpn` is validated but not
//! carried in the link. `remarks` is the legacy spelling of the display name.
//!
//! The password is percent-encoded so `@` and `:` cannot corrupt the
//! authority. Query values and the fragment (prefix plus label) are escaped.
//! Fragments follow [`FragmentMode`].

use crate::ToLink;
use crate::config::{EncodeOptions, FragmentMode};
use crate::constants::{key, scheme};
use crate::error::Result;
use crate::record::{Fields, Record};
use crate::uri::{self, QueryBuilder};

const SNI: &str = "sni";
const REMARKS: &str = "remarks";
const ALPN: &str = "alpn";

/// Trojan options decoded from a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrojanOption {
    /// Display name
    pub name: String,
    /// Legacy display name
    pub remarks: String,
    /// Server address
    pub server: String,
    /// Server port
    pub port: u16,
    /// Password
    pub password: String,
    /// SNI (Server Name Indication)
    pub sni: String,
    /// Accept any server certificate
    pub skip_cert_verify: bool,
    /// TLS ALPN protocols
    pub alpn: Vec<String>,
}

impl TrojanOption {
    /// Display labels to emit as fragments, in order.
    fn labels(&self, mode: FragmentMode) -> Vec<&str> {
        let present = |label: &&String| !label.is_empty();
        match mode {
            FragmentMode::Legacy => [&self.remarks, &self.name]
                .into_iter()
                .filter(present)
                .map(String::as_str)
                .collect(),
            FragmentMode::Single => [&self.name, &self.remarks]
                .into_iter()
                .find(present)
                .map(String::as_str)
                .into_iter()
                .collect(),
        }
    }
}

impl ToLink for TrojanOption {
    fn from_record(record: &Record) -> Result<Self> {
        let fields = Fields::new(record);
        Ok(TrojanOption {
            name: fields.string_or_default(key::NAME)?,
            remarks: fields.string_or_default(REMARKS)?,
            server: fields.required_string(key::SERVER)?,
            port: fields.required_port(key::PORT)?,
            password: fields.required_string(key::PASSWORD)?,
            sni: fields.string_or_default(SNI)?,
            skip_cert_verify: fields.bool(key::SKIP_CERT_VERIFY)?,
            alpn: fields.string_list(ALPN)?.unwrap_or_default(),
        })
    }

    fn to_link(&self, options: &EncodeOptions) -> Result<String> {
        let mut link = format!(
            "{}{}@{}",
            scheme::TROJAN,
            uri::userinfo_escape(&self.password),
            uri::authority(&self.server, self.port)
        );

        let mut query = QueryBuilder::new();
        if self.skip_cert_verify {
            query.push("allowInsecure", "1");
        }
        if !self.sni.is_empty() {
            query.push(SNI, self.sni.as_str());
        }
        if !query.is_empty() {
            link.push('?');
            link.push_str(&query.finish());
        }

        for label in self.labels(options.trojan_fragment) {
            link.push('#');
            link.push_str(&uri::query_escape(&format!(
                "{}{}",
                options.name_prefix, label
            )));
        }

        Ok(link)
    }
}
