//! # Proxy Link Encode
//!
//! Turns loosely-typed proxy configuration records (Clash-style `proxies`
//! entries, already loaded into a [`Record`]) into shareable links.
//!
//! ## Supported Protocols
//!
//! | `type` | Link | Options |
//! |--------|------|---------|
//! | `ss` | `ss://base64(cipher:password)@host:port[#name]` | [`ShadowsocksOption`] |
//! | `ssr` | `ssr://base64(host:port:protocol:cipher:obfs:base64(password)/?obfsparam=..&remarks=..&protoparam=..)` | [`ShadowsocksROption`] |
//! | `vmess` | `vmess://base64(json)` | [`VMessOption`] |
//! | `trojan` | `trojan://password@host:port[?allowInsecure=1][&sni=..][#name]` | [`TrojanOption`] |
//!
//! ## Encoding rules (unified)
//!
//! - **Dispatch**: the record's `type` key selects the protocol; absent → `MissingType`,
//!   unknown → `UnsupportedType`.
//! - **Decoding**: fields are coerced weakly (numeric strings for ports, `"true"`/`1`
//!   for flags). A missing required key or an unconvertible value → `Decode`, naming the key.
//! - **Output**: deterministic; the same record always yields the same link.
//!   Encoding is one-directional, there is no link parser here.
//!
//! ## Example
//!
//! ```rust
//! use proxy_link_encode::{Record, produce};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record: Record = serde_json::from_str(
//!     r#"{"type":"trojan","server":"h","port":443,"password":"p","sni":"example.com"}"#,
//! )?;
//! let link = produce(&record, "")?;
//! assert_eq!(link, "trojan://p@h:443?sni=example.com");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod constants;
mod error;
mod record;
mod shadowsocks;
mod shadowsocksr;
mod trojan;
mod uri;
mod vmess;

#[cfg(test)]
mod links_comprehensive;

pub use config::{EncodeOptions, FragmentMode};
pub use error::{LinkError, Result};
pub use record::Record;
pub use shadowsocks::ShadowsocksOption;
pub use shadowsocksr::ShadowsocksROption;
pub use trojan::TrojanOption;
pub use vmess::{HttpOptions, VMessOption, VMessShare};

use crate::constants::{key, proxy_type, scheme};
use log::{debug, trace};
use std::fmt;
use std::str::FromStr;

/// Trait for typed proxy options that can be decoded from a record and written as a link
pub trait ToLink: Sized {
    /// Decode the protocol's fields from a generic record
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Decode`] if a required key is missing or a value
    /// cannot be coerced to its field type.
    fn from_record(record: &Record) -> Result<Self>;

    /// Format the canonical link string
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Serialization`] if a structured payload cannot be written.
    ///
    /// # Example
    ///
    /// ```rust
    /// use proxy_link_encode::{EncodeOptions, Record, ShadowsocksOption, ToLink};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let record: Record = serde_json::from_str(
    ///     r#"{"server":"1.2.3.4","port":"8388","cipher":"aes-256-gcm","password":"pw"}"#,
    /// )?;
    /// let link = ShadowsocksOption::from_record(&record)?.to_link(&EncodeOptions::default())?;
    /// assert!(link.starts_with("ss://"));
    /// # Ok(())
    /// # }
    /// ```
    fn to_link(&self, options: &EncodeOptions) -> Result<String>;
}

/// Proxy protocols selected by the record's `type` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    /// `ss`
    Shadowsocks,
    /// `ssr`
    ShadowsocksR,
    /// `vmess`
    VMess,
    /// `trojan`
    Trojan,
}

impl ProxyType {
    /// Reads the `type` key of a record
    ///
    /// # Errors
    ///
    /// [`LinkError::MissingType`] if the key is absent or not a string,
    /// [`LinkError::UnsupportedType`] if it names an unknown protocol.
    pub fn from_record(record: &Record) -> Result<Self> {
        record
            .get(key::TYPE)
            .and_then(|v| v.as_str())
            .ok_or(LinkError::MissingType)?
            .parse()
    }

    /// The `type` value for this protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => proxy_type::SHADOWSOCKS,
            ProxyType::ShadowsocksR => proxy_type::SHADOWSOCKSR,
            ProxyType::VMess => proxy_type::VMESS,
            ProxyType::Trojan => proxy_type::TROJAN,
        }
    }

    /// Link prefix, e.g. `vmess://`
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => scheme::SHADOWSOCKS,
            ProxyType::ShadowsocksR => scheme::SHADOWSOCKSR,
            ProxyType::VMess => scheme::VMESS,
            ProxyType::Trojan => scheme::TROJAN,
        }
    }
}

impl FromStr for ProxyType {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            proxy_type::SHADOWSOCKS => Ok(ProxyType::Shadowsocks),
            proxy_type::SHADOWSOCKSR => Ok(ProxyType::ShadowsocksR),
            proxy_type::VMESS => Ok(ProxyType::VMess),
            proxy_type::TROJAN => Ok(ProxyType::Trojan),
            other => Err(LinkError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed options for any supported protocol
///
/// Use `ProxyOption::from_record()` to select the protocol from the record's
/// `type` key and decode its fields in one step.
///
/// # Example
///
/// ```rust
/// use proxy_link_encode::{EncodeOptions, ProxyOption, Record};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let record: Record = serde_json::from_str(
///     r#"{"type":"vmess","server":"v.example.com","port":443,"uuid":"uuid-1"}"#,
/// )?;
/// let option = ProxyOption::from_record(&record)?;
///
/// match &option {
///     ProxyOption::Shadowsocks(s) => println!("Shadowsocks: {}", s.server),
///     ProxyOption::ShadowsocksR(s) => println!("ShadowsocksR: {}", s.server),
///     ProxyOption::VMess(v) => println!("VMess: {}", v.server),
///     ProxyOption::Trojan(t) => println!("Trojan: {}", t.server),
/// }
///
/// let link = option.to_link(&EncodeOptions::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyOption {
    /// Shadowsocks options
    Shadowsocks(ShadowsocksOption),
    /// ShadowsocksR options
    ShadowsocksR(ShadowsocksROption),
    /// VMess options
    VMess(VMessOption),
    /// Trojan options
    Trojan(TrojanOption),
}

impl ProxyOption {
    /// Selects the protocol from `type` and decodes the record into its options
    ///
    /// # Errors
    ///
    /// `MissingType`, `UnsupportedType`, or the encoder's `Decode` error, unwrapped.
    pub fn from_record(record: &Record) -> Result<Self> {
        let option = match ProxyType::from_record(record)? {
            ProxyType::Shadowsocks => {
                ProxyOption::Shadowsocks(ShadowsocksOption::from_record(record)?)
            }
            ProxyType::ShadowsocksR => {
                ProxyOption::ShadowsocksR(ShadowsocksROption::from_record(record)?)
            }
            ProxyType::VMess => ProxyOption::VMess(VMessOption::from_record(record)?),
            ProxyType::Trojan => ProxyOption::Trojan(TrojanOption::from_record(record)?),
        };
        Ok(option)
    }

    /// Protocol of these options
    pub fn proxy_type(&self) -> ProxyType {
        match self {
            ProxyOption::Shadowsocks(_) => ProxyType::Shadowsocks,
            ProxyOption::ShadowsocksR(_) => ProxyType::ShadowsocksR,
            ProxyOption::VMess(_) => ProxyType::VMess,
            ProxyOption::Trojan(_) => ProxyType::Trojan,
        }
    }

    /// Formats the link for whichever protocol is held
    pub fn to_link(&self, options: &EncodeOptions) -> Result<String> {
        match self {
            ProxyOption::Shadowsocks(s) => s.to_link(options),
            ProxyOption::ShadowsocksR(s) => s.to_link(options),
            ProxyOption::VMess(v) => v.to_link(options),
            ProxyOption::Trojan(t) => t.to_link(options),
        }
    }
}

/// Record-to-link dispatcher carrying its [`EncodeOptions`]
///
/// Stateless apart from the options; one encoder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct LinkEncoder {
    options: EncodeOptions,
}

impl LinkEncoder {
    /// Creates an encoder with the given options
    pub fn new(options: EncodeOptions) -> Self {
        LinkEncoder { options }
    }

    /// Options in use
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes one record into a link
    ///
    /// # Errors
    ///
    /// Any [`LinkError`]; no partial link is ever returned.
    pub fn encode(&self, record: &Record) -> Result<String> {
        let option = ProxyOption::from_record(record)?;
        debug!(
            "encoding {} proxy for {}",
            option.proxy_type(),
            server_of(&option)
        );
        let link = option.to_link(&self.options)?;
        trace!("produced {} link, {} bytes", option.proxy_type().scheme(), link.len());
        Ok(link)
    }
}

fn server_of(option: &ProxyOption) -> &str {
    match option {
        ProxyOption::Shadowsocks(s) => &s.server,
        ProxyOption::ShadowsocksR(s) => &s.server,
        ProxyOption::VMess(v) => &v.server,
        ProxyOption::Trojan(t) => &t.server,
    }
}

/// Encodes `record` into a link, prepending `name_prefix` to display names
///
/// Shorthand for [`LinkEncoder`] with [`EncodeOptions::with_prefix`].
///
/// # Errors
///
/// - [`LinkError::MissingType`]: no string `type` key
/// - [`LinkError::UnsupportedType`]: `type` is not `ss`, `ssr`, `vmess` or `trojan`
/// - [`LinkError::Decode`]: a field is missing or has an unconvertible value
/// - [`LinkError::Serialization`]: the VMess payload could not be written
pub fn produce(record: &Record, name_prefix: &str) -> Result<String> {
    LinkEncoder::new(EncodeOptions::with_prefix(name_prefix)).encode(record)
}
