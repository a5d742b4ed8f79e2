//! VMess link encoder
//!
//! Link format: `vmess://base64(JSON)`, the V2 share format.
//!
//! ## Record keys
//!
//! **Required**: `server`, `port`, `uuid`.
//!
//! **Optional**: `name`, `alterId`, `cipher`, `tls`, `network` (tcp/ws/http/h2/grpc),
//! `ws-path`, `ws-headers` (string map), `http-opts` (`method`, `path` list, `headers`
//! map of lists), `skip-cert-verify`, `servername`.
//!
//! ## Payload
//!
//! | Key | Source |
//! |-----|--------|
//! | `ps` | name prefix + `name` |
//! | `add`, `port`, `aid`, `id` | `server`, `port`, `alterId`, `uuid` |
//! | `type` | `cipher` |
//! | `tls` | `"tls"` when `tls` is true, else `""` |
//! | `net` | `network`, `"tcp"` when empty |
//! | `path`, `host` | `ws-path`, `ws-headers.Host` |
//! | `skip-cert-verify` | forced `true` when `servername` is empty |
//! | `sni` | `servername` |
//!
//! Keys are written in the order above, indented (four spaces by default),
//! then standard Base64 encoded.

use crate::ToLink;
use crate::config::EncodeOptions;
use crate::constants::{key, scheme, vmess_default};
use crate::error::Result;
use crate::record::{Fields, Record};
use crate::uri;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const UUID: &str = "uuid";
const ALTER_ID: &str = "alterId";
const TLS: &str = "tls";
const NETWORK: &str = "network";
const HTTP_OPTS: &str = "http-opts";
const WS_PATH: &str = "ws-path";
const WS_HEADERS: &str = "ws-headers";
const SERVER_NAME: &str = "servername";

/// HTTP transport settings (`http-opts`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    /// Request method
    pub method: String,
    /// Candidate request paths
    pub path: Vec<String>,
    /// Request headers
    pub headers: BTreeMap<String, Vec<String>>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        HttpOptions {
            method: vmess_default::HTTP_METHOD.to_string(),
            path: vec![vmess_default::HTTP_PATH.to_string()],
            headers: BTreeMap::new(),
        }
    }
}

impl HttpOptions {
    /// Starts from the defaults and overrides whatever the nested object sets.
    fn decode(fields: &Fields<'_>) -> Result<Self> {
        let mut opts = HttpOptions::default();
        let Some(nested) = fields.object(HTTP_OPTS)? else {
            return Ok(opts);
        };
        if let Some(method) = nested.string("method")? {
            opts.method = method;
        }
        if let Some(path) = nested.string_list("path")? {
            opts.path = path;
        }
        if let Some(headers) = nested.string_list_map("headers")? {
            opts.headers = headers;
        }
        Ok(opts)
    }
}

/// VMess options decoded from a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMessOption {
    /// Display name
    pub name: String,
    /// Server address
    pub server: String,
    /// Server port
    pub port: u16,
    /// User ID (UUID)
    pub uuid: String,
    /// Alter ID
    pub alter_id: u16,
    /// Security type (auto, aes-128-gcm, chacha20-poly1305, none)
    pub cipher: String,
    /// TLS enabled
    pub tls: bool,
    /// Network transport, `tcp` when the record leaves it empty
    pub network: String,
    /// HTTP transport settings
    pub http_opts: HttpOptions,
    /// Websocket path
    pub ws_path: String,
    /// Websocket request headers
    pub ws_headers: BTreeMap<String, String>,
    /// Accept any server certificate
    pub skip_cert_verify: bool,
    /// TLS server name
    pub server_name: String,
}

/// JSON body of a `vmess://` link
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VMessShare {
    /// Remarks (prefixed display name)
    pub ps: String,
    /// Server address
    pub add: String,
    /// Server port
    pub port: u16,
    /// Alter ID
    pub aid: u16,
    /// User ID
    pub id: String,
    /// Security type
    #[serde(rename = "type")]
    pub r#type: String,
    /// `"tls"` or empty
    pub tls: String,
    /// Network transport
    pub net: String,
    /// Websocket path
    pub path: String,
    /// Host header
    pub host: String,
    /// Skip certificate verification
    #[serde(rename = "skip-cert-verify")]
    pub skip_cert_verify: bool,
    /// SNI
    pub sni: String,
}

impl VMessOption {
    /// Builds the share payload, applying the TLS, host and verification rules.
    pub fn share(&self, name_prefix: &str) -> VMessShare {
        let tls = if self.tls {
            vmess_default::TLS_MARKER.to_string()
        } else {
            String::new()
        };
        let host = self
            .ws_headers
            .get(vmess_default::HOST_HEADER)
            .cloned()
            .unwrap_or_default();

        VMessShare {
            ps: format!("{}{}", name_prefix, self.name),
            add: self.server.clone(),
            port: self.port,
            aid: self.alter_id,
            id: self.uuid.clone(),
            r#type: self.cipher.clone(),
            tls,
            net: self.network.clone(),
            path: self.ws_path.clone(),
            host,
            // no SNI, nothing to verify against
            skip_cert_verify: self.skip_cert_verify || self.server_name.is_empty(),
            sni: self.server_name.clone(),
        }
    }
}

impl VMessShare {
    /// Indented JSON with the given indent width.
    pub fn to_json(&self, indent: usize) -> Result<Vec<u8>> {
        let indent = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }
}

impl ToLink for VMessOption {
    fn from_record(record: &Record) -> Result<Self> {
        let fields = Fields::new(record);
        let network = fields.string_or_default(NETWORK)?;
        Ok(VMessOption {
            name: fields.string_or_default(key::NAME)?,
            server: fields.required_string(key::SERVER)?,
            port: fields.required_port(key::PORT)?,
            uuid: fields.required_string(UUID)?,
            alter_id: fields.u16(ALTER_ID)?.unwrap_or_default(),
            cipher: fields.string_or_default(key::CIPHER)?,
            tls: fields.bool(TLS)?,
            network: if network.is_empty() {
                vmess_default::NETWORK.to_string()
            } else {
                network
            },
            http_opts: HttpOptions::decode(&fields)?,
            ws_path: fields.string_or_default(WS_PATH)?,
            ws_headers: fields.string_map(WS_HEADERS)?,
            skip_cert_verify: fields.bool(key::SKIP_CERT_VERIFY)?,
            server_name: fields.string_or_default(SERVER_NAME)?,
        })
    }

    fn to_link(&self, options: &EncodeOptions) -> Result<String> {
        let json = self.share(&options.name_prefix).to_json(options.vmess_indent)?;
        Ok(format!("{}{}", scheme::VMESS, uri::b64_bytes(&json)))
    }
}
