//! ShadowsocksR link encoder
//!
//! Link format: `ssr://base64(body)` where body is
//!
//! ```text
//! host:port:protocol:cipher:obfs:base64(password)/?obfsparam=base64(obfs-param)&remarks=base64(name)&protoparam=base64(protocol-param)
//! ```
//!
//! **Record keys**: `server`, `port`, `protocol`, `cipher`, `obfs`, `password` (required);
//! `name`, `obfs-param`, `protocol-param` (optional).
//!
//! Both Base64 layers are required by clients: the password and each query
//! value are encoded individually (query values are then form-escaped), and
//! the whole body is encoded again. All three query parameters are always
//! present, empty values included.

use crate::ToLink;
use crate::config::EncodeOptions;
use crate::constants::{key, scheme};
use crate::error::Result;
use crate::record::{Fields, Record};
use crate::uri::{self, QueryBuilder};

const PROTOCOL: &str = "protocol";
const PROTOCOL_PARAM: &str = "protocol-param";
const OBFS: &str = "obfs";
const OBFS_PARAM: &str = "obfs-param";

/// ShadowsocksR options decoded from a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowsocksROption {
    /// Display name, emitted as `remarks`
    pub name: String,
    /// Server address
    pub server: String,
    /// Server port
    pub port: u16,
    /// Password
    pub password: String,
    /// Encryption method
    pub cipher: String,
    /// Obfuscation method (plain, http_simple, tls1.2_ticket_auth, ...)
    pub obfs: String,
    /// Obfuscation parameter
    pub obfs_param: String,
    /// Protocol (origin, auth_aes128_md5, auth_chain_a, ...)
    pub protocol: String,
    /// Protocol parameter
    pub protocol_param: String,
}

impl ToLink for ShadowsocksROption {
    fn from_record(record: &Record) -> Result<Self> {
        let fields = Fields::new(record);
        Ok(ShadowsocksROption {
            name: fields.string_or_default(key::NAME)?,
            server: fields.required_string(key::SERVER)?,
            port: fields.required_port(key::PORT)?,
            password: fields.required_string(key::PASSWORD)?,
            cipher: fields.required_string(key::CIPHER)?,
            obfs: fields.required_string(OBFS)?,
            obfs_param: fields.string_or_default(OBFS_PARAM)?,
            protocol: fields.required_string(PROTOCOL)?,
            protocol_param: fields.string_or_default(PROTOCOL_PARAM)?,
        })
    }

    fn to_link(&self, _options: &EncodeOptions) -> Result<String> {
        let mut query = QueryBuilder::new();
        query
            .push("obfsparam", uri::b64(&self.obfs_param))
            .push("remarks", uri::b64(&self.name))
            .push("protoparam", uri::b64(&self.protocol_param));

        let body = format!(
            "{}:{}:{}:{}:{}:{}/?{}",
            self.server,
            self.port,
            self.protocol,
            self.cipher,
            self.obfs,
            uri::b64(&self.password),
            query.finish()
        );

        Ok(format!("{}{}", scheme::SHADOWSOCKSR, uri::b64(&body)))
    }
}
