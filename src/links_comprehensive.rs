//! End-to-end encoding tests through the `type` dispatcher
//!
//! Covers, per protocol:
//! - exact link output for representative records
//! - decoding the produced link back (Base64 / JSON) to check essential fields
//! - dispatcher errors (MissingType, UnsupportedType, Decode)
//! - determinism and name prefixes

#![cfg(test)]

use crate::error::LinkError;
use crate::{
    EncodeOptions, FragmentMode, LinkEncoder, ProxyOption, ProxyType, Record, VMessShare, produce,
};
use base64::Engine;
use serde_json::{Value, json};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("test record must be an object"),
    }
}

fn b64_decode(s: &str) -> String {
    let raw = base64::engine::general_purpose::STANDARD.decode(s).unwrap();
    String::from_utf8(raw).unwrap()
}

// =============================================================================
// Dispatcher
// =============================================================================

#[test]
fn missing_type_is_rejected() {
    let r = record(json!({"server": "h", "port": 443, "password": "p"}));
    assert_eq!(produce(&r, "").unwrap_err(), LinkError::MissingType);
}

#[test]
fn non_string_type_is_missing_type() {
    for t in [json!(1), json!(null), json!(["ss"]), json!(true)] {
        let r = record(json!({"type": t, "server": "h", "port": 443}));
        assert_eq!(produce(&r, "").unwrap_err(), LinkError::MissingType);
    }
}

#[test]
fn unknown_type_names_the_value() {
    for t in ["vless", "hysteria2", "SS", "", "socks5"] {
        let r = record(json!({"type": t, "server": "h", "port": 443}));
        let err = produce(&r, "").unwrap_err();
        assert_eq!(err, LinkError::UnsupportedType(t.to_string()));
        assert!(err.to_string().contains("Unsupported proxy type"));
    }
}

#[test]
fn decode_errors_pass_through_unwrapped() {
    let r = record(json!({"type": "ss", "server": "h", "port": "not-a-port",
        "cipher": "c", "password": "p"}));
    match produce(&r, "").unwrap_err() {
        LinkError::Decode { field, reason } => {
            assert_eq!(field, "port");
            assert!(reason.contains("'int'"));
        }
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[test]
fn serde_errors_map_to_serialization() {
    let err: LinkError = serde_json::from_str::<Value>("{").unwrap_err().into();
    assert!(matches!(err, LinkError::Serialization(_)));
    assert!(err.to_string().starts_with("Serialization error"));
}

#[test]
fn proxy_type_round_trips_through_str() {
    for t in [
        ProxyType::Shadowsocks,
        ProxyType::ShadowsocksR,
        ProxyType::VMess,
        ProxyType::Trojan,
    ] {
        assert_eq!(t.as_str().parse::<ProxyType>().unwrap(), t);
        assert!(t.scheme().starts_with(t.as_str()));
        assert_eq!(t.to_string(), t.as_str());
    }
}

#[test]
fn proxy_option_reports_its_type() {
    let r = record(json!({"type": "trojan", "server": "h", "port": 443, "password": "p"}));
    let option = ProxyOption::from_record(&r).unwrap();
    assert_eq!(option.proxy_type(), ProxyType::Trojan);
    assert_eq!(
        option.to_link(&EncodeOptions::default()).unwrap(),
        "trojan://p@h:443"
    );
}

// =============================================================================
// Shadowsocks
// =============================================================================

#[test]
fn shadowsocks_reference_link() {
    let r = record(json!({
        "type": "ss", "cipher": "aes-256-gcm", "password": "pw",
        "server": "1.2.3.4", "port": 8388, "name": "n1"
    }));
    let expected = format!(
        "ss://{}@1.2.3.4:8388#n1",
        base64::engine::general_purpose::STANDARD.encode("aes-256-gcm:pw")
    );
    assert_eq!(produce(&r, "").unwrap(), expected);
}

#[test]
fn shadowsocks_ipv6_server() {
    let r = record(json!({
        "type": "ss", "cipher": "c", "password": "p", "server": "2001:db8::1", "port": 8388
    }));
    assert!(produce(&r, "").unwrap().ends_with("@[2001:db8::1]:8388"));
}

// =============================================================================
// ShadowsocksR
// =============================================================================

#[test]
fn shadowsocksr_password_survives_both_layers() {
    let password = "p@ss:w/rd+=";
    let r = record(json!({
        "type": "ssr", "server": "5.6.7.8", "port": 9000, "password": password,
        "cipher": "chacha20", "obfs": "plain", "protocol": "origin", "name": "node"
    }));
    let link = produce(&r, "").unwrap();
    let body = b64_decode(link.strip_prefix("ssr://").unwrap());
    let (core, _) = body.split_once("/?").unwrap();
    let inner = core.rsplit(':').next().unwrap();
    assert_eq!(b64_decode(inner), password);
    assert!(core.starts_with("5.6.7.8:9000:origin:chacha20:plain:"));
}

#[test]
fn shadowsocksr_remarks_carry_name() {
    let r = record(json!({
        "type": "ssr", "server": "h", "port": 1, "password": "p",
        "cipher": "c", "obfs": "o", "protocol": "pr", "name": "香港 01"
    }));
    let body = b64_decode(produce(&r, "").unwrap().strip_prefix("ssr://").unwrap());
    let (_, query) = body.split_once("/?").unwrap();
    let remarks = url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "remarks")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(b64_decode(&remarks), "香港 01");
}

// =============================================================================
// VMess
// =============================================================================

fn vmess_record() -> Record {
    record(json!({
        "type": "vmess", "name": "v1", "server": "v.example.com", "port": "443",
        "uuid": "b831381d-6324-4d53-ad4f-8cda48b30811", "alterId": 0, "cipher": "auto",
        "tls": true, "network": "ws", "ws-path": "/path",
        "ws-headers": {"Host": "cdn.example.com"}, "servername": "v.example.com"
    }))
}

fn vmess_payload(link: &str) -> VMessShare {
    let json = b64_decode(link.strip_prefix("vmess://").unwrap());
    serde_json::from_str(&json).unwrap()
}

#[test]
fn vmess_payload_round_trip() {
    let share = vmess_payload(&produce(&vmess_record(), "").unwrap());
    assert_eq!(share.add, "v.example.com");
    assert_eq!(share.port, 443);
    assert_eq!(share.id, "b831381d-6324-4d53-ad4f-8cda48b30811");
    assert_eq!(share.net, "ws");
    assert_eq!(share.host, "cdn.example.com");
    assert_eq!(share.tls, "tls");
    assert!(!share.skip_cert_verify);
}

#[test]
fn vmess_payload_key_order() {
    let json = b64_decode(
        produce(&vmess_record(), "")
            .unwrap()
            .strip_prefix("vmess://")
            .unwrap(),
    );
    let keys = [
        "ps", "add", "port", "aid", "id", "type", "tls", "net", "path", "host",
        "skip-cert-verify", "sni",
    ];
    let positions: Vec<usize> = keys
        .iter()
        .map(|k| json.find(&format!("\"{}\":", k)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn vmess_empty_server_name_forces_skip_verify() {
    let mut r = vmess_record();
    r.remove("servername");
    r.insert("skip-cert-verify".to_string(), json!(false));
    let share = vmess_payload(&produce(&r, "").unwrap());
    assert!(share.skip_cert_verify);
    assert_eq!(share.sni, "");
}

#[test]
fn vmess_prefix_and_default_network() {
    let r = record(json!({"type": "vmess", "name": "n", "server": "h", "port": 1, "uuid": "u"}));
    let share = vmess_payload(&produce(&r, "[sub] ").unwrap());
    assert_eq!(share.ps, "[sub] n");
    assert_eq!(share.net, "tcp");
    assert_eq!(share.tls, "");
}

#[test]
fn vmess_indent_is_configurable() {
    let encoder = LinkEncoder::new(EncodeOptions {
        vmess_indent: 2,
        ..EncodeOptions::default()
    });
    let link = encoder.encode(&vmess_record()).unwrap();
    let json = b64_decode(link.strip_prefix("vmess://").unwrap());
    assert!(json.starts_with("{\n  \"ps\""));
}

// =============================================================================
// Trojan
// =============================================================================

#[test]
fn trojan_reference_link() {
    let r = record(json!({
        "type": "trojan", "password": "p", "server": "h", "port": 443,
        "skip-cert-verify": true, "sni": "example.com"
    }));
    assert_eq!(
        produce(&r, "").unwrap(),
        "trojan://p@h:443?allowInsecure=1&sni=example.com"
    );
}

#[test]
fn trojan_fragment_modes() {
    let r = record(json!({
        "type": "trojan", "password": "p", "server": "h", "port": 443,
        "remarks": "r", "name": "n"
    }));
    assert_eq!(produce(&r, "").unwrap(), "trojan://p@h:443#r#n");

    let single = LinkEncoder::new(EncodeOptions {
        name_prefix: "x".to_string(),
        trojan_fragment: FragmentMode::Single,
        ..EncodeOptions::default()
    });
    assert_eq!(single.encode(&r).unwrap(), "trojan://p@h:443#xn");
}

// =============================================================================
// Determinism and sharing
// =============================================================================

#[test]
fn encoding_is_deterministic() {
    let records = [
        vmess_record(),
        record(json!({"type": "ss", "cipher": "c", "password": "p", "server": "h", "port": 1})),
        record(json!({"type": "ssr", "server": "h", "port": 1, "password": "p",
            "cipher": "c", "obfs": "o", "protocol": "pr"})),
        record(json!({"type": "trojan", "password": "p", "server": "h", "port": 1,
            "sni": "s", "skip-cert-verify": 1})),
    ];
    for r in &records {
        assert_eq!(produce(r, "p-").unwrap(), produce(r, "p-").unwrap());
    }
}

#[test]
fn encoder_is_shareable_across_threads() {
    let encoder = LinkEncoder::default();
    let r = vmess_record();
    let expected = encoder.encode(&r).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| encoder.encode(&r).unwrap())).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
