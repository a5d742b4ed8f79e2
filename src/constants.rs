//! Shared constants: link schemes, `type` discriminators, record keys and defaults.

/// Link URI scheme prefixes (lowercase, with `://`).
pub mod scheme {
    /// Shadowsocks: `ss://`
    pub const SHADOWSOCKS: &str = "ss://";
    /// ShadowsocksR: `ssr://`
    pub const SHADOWSOCKSR: &str = "ssr://";
    /// VMess: `vmess://`
    pub const VMESS: &str = "vmess://";
    /// Trojan: `trojan://`
    pub const TROJAN: &str = "trojan://";
}

/// Values of the record's `type` key.
pub mod proxy_type {
    /// Shadowsocks
    pub const SHADOWSOCKS: &str = "ss";
    /// ShadowsocksR
    pub const SHADOWSOCKSR: &str = "ssr";
    /// VMess
    pub const VMESS: &str = "vmess";
    /// Trojan
    pub const TROJAN: &str = "trojan";
}

/// Record keys shared by several protocols.
pub mod key {
    pub const TYPE: &str = "type";
    pub const NAME: &str = "name";
    pub const SERVER: &str = "server";
    pub const PORT: &str = "port";
    pub const PASSWORD: &str = "password";
    pub const CIPHER: &str = "cipher";
    pub const UDP: &str = "udp";
    pub const SKIP_CERT_VERIFY: &str = "skip-cert-verify";
}

/// VMess defaults applied before decoding.
pub mod vmess_default {
    /// Network used when the record leaves `network` empty
    pub const NETWORK: &str = "tcp";
    /// HTTP transport method
    pub const HTTP_METHOD: &str = "GET";
    /// HTTP transport path
    pub const HTTP_PATH: &str = "/";
    /// `tls` marker written when TLS is enabled
    pub const TLS_MARKER: &str = "tls";
    /// Header carrying the websocket host
    pub const HOST_HEADER: &str = "Host";
    /// Indentation width of the JSON payload
    pub const INDENT: usize = 4;
}
