use crate::{
    persist,
    resolver::{ensure_single_line, narrow, resolve, FieldKind, FieldMapping, FieldValue},
    section::{split_sections, Section, SectionKind},
    upsert::{self, Keyed},
    ProtoError, ProtoResult,
};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, error, info};
use wgstar_lib::constant::{WG_DIR_MODE, WIREGUARD_CONF_EXTENSION};

const PRIVATE_KEY: &str = "PrivateKey";
const ADDRESS: &str = "Address";
const LISTEN_PORT: &str = "ListenPort";
const FW_MARK: &str = "FwMark";

const PUBLIC_KEY: &str = "PublicKey";
const ALLOWED_IPS: &str = "AllowedIPs";
const PRESHARED_KEY: &str = "PresharedKey";
const ENDPOINT: &str = "Endpoint";
const PERSISTENT_KEEPALIVE: &str = "PersistentKeepalive";
const NAME: &str = "# Name";

const LIST_JOINER: &str = ",";

#[derive(Debug, Clone, Copy)]
enum InterfaceField {
    PrivateKey,
    Address,
    ListenPort,
    FwMark,
}

const INTERFACE_FIELDS: &[FieldMapping<InterfaceField>] = &[
    FieldMapping::new(PRIVATE_KEY, InterfaceField::PrivateKey, FieldKind::String),
    FieldMapping::new(ADDRESS, InterfaceField::Address, FieldKind::StringList),
    FieldMapping::new(LISTEN_PORT, InterfaceField::ListenPort, FieldKind::Integer),
    FieldMapping::new(FW_MARK, InterfaceField::FwMark, FieldKind::Integer),
];

#[derive(Debug, Clone, Copy)]
enum PeerField {
    PublicKey,
    AllowedIps,
    PresharedKey,
    Endpoint,
    PersistentKeepalive,
    Name,
}

const PEER_FIELDS: &[FieldMapping<PeerField>] = &[
    FieldMapping::new(PUBLIC_KEY, PeerField::PublicKey, FieldKind::String),
    FieldMapping::new(ALLOWED_IPS, PeerField::AllowedIps, FieldKind::StringList),
    FieldMapping::new(PRESHARED_KEY, PeerField::PresharedKey, FieldKind::String),
    FieldMapping::new(ENDPOINT, PeerField::Endpoint, FieldKind::String),
    FieldMapping::new(
        PERSISTENT_KEEPALIVE,
        PeerField::PersistentKeepalive,
        FieldKind::Integer,
    ),
    FieldMapping::new(NAME, PeerField::Name, FieldKind::String),
];

fn missing(section: SectionKind, field: &'static str) -> ProtoError {
    ProtoError::MissingField {
        section: section.name(),
        field,
    }
}

/// The local endpoint. Keys are kept verbatim; nothing here checks that they
/// are valid base64 or that addresses are valid CIDRs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireGuardInterface {
    pub private_key: String,
    pub address: Vec<String>,
    pub listen_port: Option<u16>,
    pub fw_mark: Option<u32>,
}

impl WireGuardInterface {
    pub fn new(private_key: impl Into<String>, address: Vec<String>) -> Self {
        Self {
            private_key: private_key.into(),
            address,
            listen_port: None,
            fw_mark: None,
        }
    }

    pub fn with_listen_port(mut self, port: u16) -> Self {
        self.listen_port = Some(port);
        self
    }

    pub fn with_fw_mark(mut self, mark: u32) -> Self {
        self.fw_mark = Some(mark);
        self
    }

    /// Rejects values that would not survive being written and read back.
    pub fn validate(&self) -> ProtoResult<()> {
        ensure_single_line(PRIVATE_KEY, &self.private_key)?;
        for address in &self.address {
            ensure_single_line(ADDRESS, address)?;
        }
        Ok(())
    }

    pub fn parse(section: &Section) -> ProtoResult<Self> {
        let mut private_key = None;
        let mut address = None;
        let mut listen_port = None;
        let mut fw_mark = None;

        for (setting, value) in section.settings() {
            if let Some((field, value)) = resolve(INTERFACE_FIELDS, setting, value)? {
                match (field, value) {
                    (InterfaceField::PrivateKey, FieldValue::String(v)) => {
                        private_key = Some(v);
                    }
                    (InterfaceField::Address, FieldValue::StringList(v)) => {
                        address = Some(v);
                    }
                    (InterfaceField::ListenPort, FieldValue::Integer(v)) => {
                        listen_port = Some(narrow(LISTEN_PORT, v)?);
                    }
                    (InterfaceField::FwMark, FieldValue::Integer(v)) => {
                        fw_mark = Some(narrow(FW_MARK, v)?);
                    }
                    _ => {}
                }
            }
        }

        Ok(Self {
            private_key: private_key
                .ok_or_else(|| missing(SectionKind::Interface, PRIVATE_KEY))?,
            address: address.ok_or_else(|| missing(SectionKind::Interface, ADDRESS))?,
            listen_port,
            fw_mark,
        })
    }
}

impl fmt::Display for WireGuardInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SectionKind::Interface)?;
        write!(f, "\n{PRIVATE_KEY} = {}", self.private_key)?;
        write!(f, "\n{ADDRESS} = {}", self.address.join(LIST_JOINER))?;
        if let Some(port) = self.listen_port {
            write!(f, "\n{LISTEN_PORT} = {port}")?;
        }
        if let Some(mark) = self.fw_mark {
            write!(f, "\n{FW_MARK} = {mark}")?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for WireGuardInterface {
    type Error = ProtoError;
    fn try_from(s: &str) -> ProtoResult<Self> {
        Self::parse(&Section::from(s))
    }
}

/// A remote endpoint, identified by its public key.
#[derive(Debug, Clone)]
pub struct WireGuardPeer {
    pub public_key: String,
    pub allowed_ips: Vec<String>,
    pub preshared_key: Option<String>,
    pub endpoint: Option<String>,
    pub persistent_keepalive: Option<u16>,
    /// Human label, written as a `# Name = ...` comment line.
    pub name: Option<String>,
}

impl WireGuardPeer {
    pub fn new(public_key: impl Into<String>, allowed_ips: Vec<String>) -> Self {
        Self {
            public_key: public_key.into(),
            allowed_ips,
            preshared_key: None,
            endpoint: None,
            persistent_keepalive: None,
            name: None,
        }
    }

    pub fn builder() -> WireGuardPeerBuilder {
        WireGuardPeerBuilder::default()
    }

    pub fn validate(&self) -> ProtoResult<()> {
        ensure_single_line(PUBLIC_KEY, &self.public_key)?;
        for ip in &self.allowed_ips {
            ensure_single_line(ALLOWED_IPS, ip)?;
        }
        let optional = [
            (PRESHARED_KEY, &self.preshared_key),
            (ENDPOINT, &self.endpoint),
            (NAME, &self.name),
        ];
        for (setting, value) in optional {
            if let Some(value) = value {
                ensure_single_line(setting, value)?;
            }
        }
        Ok(())
    }

    pub fn parse(section: &Section) -> ProtoResult<Self> {
        let mut public_key = None;
        let mut allowed_ips = None;
        let mut peer = WireGuardPeer::new(String::new(), Vec::new());

        for (setting, value) in section.settings() {
            if let Some((field, value)) = resolve(PEER_FIELDS, setting, value)? {
                match (field, value) {
                    (PeerField::PublicKey, FieldValue::String(v)) => public_key = Some(v),
                    (PeerField::AllowedIps, FieldValue::StringList(v)) => {
                        allowed_ips = Some(v);
                    }
                    (PeerField::PresharedKey, FieldValue::String(v)) => {
                        peer.preshared_key = Some(v);
                    }
                    (PeerField::Endpoint, FieldValue::String(v)) => peer.endpoint = Some(v),
                    (PeerField::PersistentKeepalive, FieldValue::Integer(v)) => {
                        peer.persistent_keepalive = Some(narrow(PERSISTENT_KEEPALIVE, v)?);
                    }
                    (PeerField::Name, FieldValue::String(v)) => peer.name = Some(v),
                    _ => {}
                }
            }
        }

        peer.public_key = public_key.ok_or_else(|| missing(SectionKind::Peer, PUBLIC_KEY))?;
        peer.allowed_ips = allowed_ips.ok_or_else(|| missing(SectionKind::Peer, ALLOWED_IPS))?;

        Ok(peer)
    }
}

// List fields compare by their joined form, so `["a,b"]` equals `["a", "b"]`.
impl PartialEq for WireGuardPeer {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
            && self.allowed_ips.join(LIST_JOINER) == other.allowed_ips.join(LIST_JOINER)
            && self.preshared_key == other.preshared_key
            && self.endpoint == other.endpoint
            && self.persistent_keepalive == other.persistent_keepalive
            && self.name == other.name
    }
}

impl Eq for WireGuardPeer {}

impl Keyed for WireGuardPeer {
    fn key(&self) -> &str {
        &self.public_key
    }
}

impl fmt::Display for WireGuardPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SectionKind::Peer)?;
        if let Some(name) = &self.name {
            write!(f, "\n{NAME} = {name}")?;
        }
        write!(f, "\n{PUBLIC_KEY} = {}", self.public_key)?;
        write!(f, "\n{ALLOWED_IPS} = {}", self.allowed_ips.join(LIST_JOINER))?;
        if let Some(psk) = &self.preshared_key {
            write!(f, "\n{PRESHARED_KEY} = {psk}")?;
        }
        if let Some(endpoint) = &self.endpoint {
            write!(f, "\n{ENDPOINT} = {endpoint}")?;
        }
        if let Some(keepalive) = self.persistent_keepalive {
            write!(f, "\n{PERSISTENT_KEEPALIVE} = {keepalive}")?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for WireGuardPeer {
    type Error = ProtoError;
    fn try_from(s: &str) -> ProtoResult<Self> {
        Self::parse(&Section::from(s))
    }
}

#[derive(Debug, Default)]
pub struct WireGuardPeerBuilder {
    public_key: Option<String>,
    allowed_ips: Vec<String>,
    preshared_key: Option<String>,
    endpoint: Option<String>,
    persistent_keepalive: Option<u16>,
    name: Option<String>,
}

impl WireGuardPeerBuilder {
    pub fn public_key(mut self, k: impl Into<String>) -> Self {
        self.public_key = Some(k.into());
        self
    }

    pub fn allowed_ip(mut self, ip: impl Into<String>) -> Self {
        self.allowed_ips.push(ip.into());
        self
    }

    pub fn allowed_ips(mut self, ips: Vec<String>) -> Self {
        self.allowed_ips = ips;
        self
    }

    pub fn preshared_key(mut self, k: Option<String>) -> Self {
        self.preshared_key = k;
        self
    }

    pub fn endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn persistent_keepalive(mut self, secs: Option<u16>) -> Self {
        self.persistent_keepalive = secs;
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn build(self) -> ProtoResult<WireGuardPeer> {
        if self.allowed_ips.is_empty() {
            return Err(missing(SectionKind::Peer, ALLOWED_IPS));
        }

        let peer = WireGuardPeer {
            public_key: self
                .public_key
                .ok_or_else(|| missing(SectionKind::Peer, PUBLIC_KEY))?,
            allowed_ips: self.allowed_ips,
            preshared_key: self.preshared_key,
            endpoint: self.endpoint,
            persistent_keepalive: self.persistent_keepalive,
            name: self.name,
        };
        peer.validate()?;

        Ok(peer)
    }
}

/// One `[Interface]` plus an ordered list of `[Peer]`s, backed by
/// `{dir}/{name}.conf`.
///
/// Peers are unique by public key only as far as [`append_peer`] enforces it;
/// duplicates read from a hand-edited file are kept as they are.
///
/// [`append_peer`]: WireGuardConfig::append_peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireGuardConfig {
    pub interface: WireGuardInterface,
    pub peers: Vec<WireGuardPeer>,
}

impl WireGuardConfig {
    pub fn new(interface: WireGuardInterface) -> Self {
        Self {
            interface,
            peers: Vec::new(),
        }
    }

    pub fn path<P: AsRef<Path>>(name: &str, dir: P) -> PathBuf {
        dir.as_ref()
            .join(format!("{name}.{WIREGUARD_CONF_EXTENSION}"))
    }

    /// Loads `{dir}/{name}.conf`. A missing file is `Ok(None)`.
    pub fn parse<P: AsRef<Path>>(name: &str, dir: P) -> ProtoResult<Option<Self>> {
        let path = Self::path(name, dir);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Configuration not found ({})", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        content.parse().map(Some)
    }

    pub fn validate(&self) -> ProtoResult<()> {
        self.interface.validate()?;
        self.peers.iter().try_for_each(WireGuardPeer::validate)
    }

    /// Overwrites `{dir}/{name}.conf`, creating `dir` with mode `0700` if needed.
    /// Nothing is written if a value would break the file layout.
    pub fn save<P: AsRef<Path>>(&self, name: &str, dir: P) -> ProtoResult<()> {
        self.validate()?;
        let path = Self::path(name, dir);
        persist::write_private(&path, &self.to_string(), WG_DIR_MODE)?;
        info!(
            "Saved configuration with {} peer(s) to {}",
            self.peers.len(),
            path.display()
        );
        Ok(())
    }

    /// Upserts by public key. An updated peer moves to the end of the list.
    pub fn append_peer(&mut self, peer: WireGuardPeer) {
        upsert::upsert(&mut self.peers, peer);
    }

    pub fn find_peer_by_name(&self, name: &str) -> Option<&WireGuardPeer> {
        self.peers
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }

    pub fn find_peer_by_public_key(&self, public_key: &str) -> Option<&WireGuardPeer> {
        upsert::find_by_key(&self.peers, public_key)
    }
}

impl fmt::Display for WireGuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.interface)?;
        for peer in &self.peers {
            write!(f, "\n\n{peer}")?;
        }
        writeln!(f)
    }
}

impl FromStr for WireGuardConfig {
    type Err = ProtoError;
    fn from_str(s: &str) -> ProtoResult<Self> {
        let mut interface = None;
        let mut peers = Vec::new();

        for section in split_sections(s)? {
            match section.kind() {
                Some(SectionKind::Interface) if interface.is_none() => {
                    interface = Some(WireGuardInterface::parse(&section)?);
                }
                Some(SectionKind::Peer) => peers.push(WireGuardPeer::parse(&section)?),
                _ => {}
            }
        }

        match interface {
            Some(interface) => Ok(Self { interface, peers }),
            None => {
                error!("Invalid configuration found (no Interface section)");
                Err(ProtoError::MissingInterface)
            }
        }
    }
}

impl TryFrom<&str> for WireGuardConfig {
    type Error = ProtoError;
    fn try_from(s: &str) -> ProtoResult<Self> {
        s.parse()
    }
}

impl TryFrom<&Path> for WireGuardConfig {
    type Error = ProtoError;
    fn try_from(p: &Path) -> ProtoResult<Self> {
        let content = fs::read_to_string(p)?;
        content.parse()
    }
}

impl TryFrom<&PathBuf> for WireGuardConfig {
    type Error = ProtoError;
    fn try_from(p: &PathBuf) -> ProtoResult<Self> {
        WireGuardConfig::try_from(p.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn laptop() -> WireGuardPeer {
        WireGuardPeer::builder()
            .public_key("LAPTOP=")
            .allowed_ip("10.0.0.2/32")
            .name(Some("laptop".to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_interface_serializes_address_list() {
        let interface =
            WireGuardInterface::new("PKEY", strings(&["10.0.0.1/24", "fd00::1/64"]));
        assert_eq!(
            interface.to_string(),
            "[Interface]\nPrivateKey = PKEY\nAddress = 10.0.0.1/24,fd00::1/64"
        );

        let parsed = WireGuardInterface::try_from(interface.to_string().as_str()).unwrap();
        assert_eq!(parsed.address, strings(&["10.0.0.1/24", "fd00::1/64"]));
        assert_eq!(parsed, interface);
    }

    #[test]
    fn test_interface_optional_fields_round_trip() {
        let interface = WireGuardInterface::new("PKEY", strings(&["10.0.0.1/24"]))
            .with_listen_port(51820)
            .with_fw_mark(0);
        let text = interface.to_string();
        assert!(text.ends_with("ListenPort = 51820\nFwMark = 0"));
        assert_eq!(WireGuardInterface::try_from(text.as_str()).unwrap(), interface);
    }

    #[test]
    fn test_interface_requires_private_key_and_address() {
        let err = WireGuardInterface::try_from("[Interface]\nAddress = 10.0.0.1/24").unwrap_err();
        assert!(matches!(
            err,
            ProtoError::MissingField {
                field: PRIVATE_KEY,
                ..
            }
        ));

        let err = WireGuardInterface::try_from("[Interface]\nPrivateKey = k").unwrap_err();
        assert!(matches!(err, ProtoError::MissingField { field: ADDRESS, .. }));
    }

    #[test]
    fn test_peer_requires_public_key_and_allowed_ips() {
        let err = WireGuardPeer::try_from("[Peer]\nAllowedIPs = 10.0.0.2/32").unwrap_err();
        assert!(matches!(
            err,
            ProtoError::MissingField {
                section: "Peer",
                field: PUBLIC_KEY,
            }
        ));

        let err =
            WireGuardPeer::try_from("[Peer]\n# Name = laptop\nPublicKey = P=").unwrap_err();
        assert!(matches!(
            err,
            ProtoError::MissingField {
                section: "Peer",
                field: ALLOWED_IPS,
            }
        ));
    }

    #[test]
    fn test_peer_builder_rejects_line_breaks() {
        let err = WireGuardPeer::builder()
            .public_key("P=")
            .allowed_ip("10.0.0.2/32")
            .name(Some("x\nEndpoint = evil:1".to_string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ProtoError::MalformedValue { setting, .. } if setting == NAME));

        let err = WireGuardPeer::builder()
            .public_key("P=")
            .allowed_ip("10.0.0.2/32")
            .endpoint(Some("host:1\r\nPresharedKey = x".to_string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ProtoError::MalformedValue { .. }));
    }

    #[test]
    fn test_save_rejects_injected_settings() {
        let dir = TempDir::new().unwrap();
        let mut config = WireGuardConfig::new(WireGuardInterface::new(
            "PKEY",
            strings(&["10.0.0.1/24"]),
        ));
        let mut peer = laptop();
        peer.name = Some("x\nEndpoint = evil:1".to_string());
        config.append_peer(peer);

        let err = config.save("wg0", dir.path()).unwrap_err();
        assert!(matches!(err, ProtoError::MalformedValue { .. }));
        assert!(!dir.path().join("wg0.conf").exists());

        let mut config = WireGuardConfig::new(WireGuardInterface::new(
            "PKEY\nListenPort = 1",
            strings(&["10.0.0.1/24"]),
        ));
        config.append_peer(laptop());
        assert!(config.save("wg0", dir.path()).is_err());
        assert!(!dir.path().join("wg0.conf").exists());
    }

    #[test]
    fn test_interface_malformed_port_fails() {
        let err = WireGuardInterface::try_from(
            "[Interface]\nPrivateKey = k\nAddress = 10.0.0.1/24\nListenPort = abc",
        )
        .unwrap_err();
        assert!(matches!(err, ProtoError::MalformedValue { .. }));

        let err = WireGuardInterface::try_from(
            "[Interface]\nPrivateKey = k\nAddress = 10.0.0.1/24\nListenPort = 99999",
        )
        .unwrap_err();
        assert!(matches!(err, ProtoError::MalformedValue { .. }));
    }

    #[test]
    fn test_peer_name_is_a_comment_line() {
        let peer = laptop();
        assert_eq!(
            peer.to_string(),
            "[Peer]\n# Name = laptop\nPublicKey = LAPTOP=\nAllowedIPs = 10.0.0.2/32"
        );

        let parsed = WireGuardPeer::try_from(peer.to_string().as_str()).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("laptop"));
        assert_eq!(parsed.public_key, "LAPTOP=");
        assert_eq!(parsed.allowed_ips, strings(&["10.0.0.2/32"]));
    }

    #[test]
    fn test_peer_full_round_trip() {
        let peer = WireGuardPeer::builder()
            .public_key("PUB=")
            .allowed_ips(strings(&["10.0.0.3/32", "fd00::3/128"]))
            .preshared_key(Some("PSK=".to_string()))
            .endpoint(Some("vpn.example.com:51820".to_string()))
            .persistent_keepalive(Some(25))
            .build()
            .unwrap();

        let parsed = WireGuardPeer::try_from(peer.to_string().as_str()).unwrap();
        assert_eq!(parsed, peer);
    }

    #[test]
    fn test_peer_ignores_unknown_and_separatorless_lines() {
        let peer = WireGuardPeer::try_from(
            "[Peer]\n# just a comment\nPublicKey = P=\nDNS = 1.1.1.1\nAllowedIPs = 0.0.0.0/0",
        )
        .unwrap();
        assert_eq!(peer, WireGuardPeer::new("P=", strings(&["0.0.0.0/0"])));
    }

    #[test]
    fn test_peer_equality_uses_joined_lists() {
        let split = WireGuardPeer::new("P=", strings(&["10.0.0.1/32", "10.0.0.2/32"]));
        let joined = WireGuardPeer::new("P=", strings(&["10.0.0.1/32,10.0.0.2/32"]));
        assert_eq!(split, joined);

        let mut named = split.clone();
        named.name = Some("phone".to_string());
        assert_ne!(split, named);
    }

    #[test]
    fn test_peer_builder_requires_fields() {
        assert!(WireGuardPeer::builder().allowed_ip("10.0.0.2/32").build().is_err());
        assert!(WireGuardPeer::builder().public_key("P=").build().is_err());
    }

    #[test]
    fn test_append_peer_replaces_and_moves_to_end() {
        let mut config = WireGuardConfig::new(WireGuardInterface::new(
            "PKEY",
            strings(&["10.0.0.1/24"]),
        ));
        config.append_peer(laptop());
        config.append_peer(WireGuardPeer::new("PHONE=", strings(&["10.0.0.3/32"])));

        let mut updated = laptop();
        updated.allowed_ips = strings(&["10.0.0.9/32"]);
        config.append_peer(updated.clone());

        assert_eq!(config.peers.len(), 2);
        assert_eq!(config.peers[0].public_key, "PHONE=");
        assert_eq!(config.peers[1], updated);
    }

    #[test]
    fn test_find_peer_by_name() {
        let mut config = WireGuardConfig::new(WireGuardInterface::new(
            "PKEY",
            strings(&["10.0.0.1/24"]),
        ));
        config.append_peer(WireGuardPeer::new("ANON=", strings(&["10.0.0.4/32"])));
        assert!(config.find_peer_by_name("laptop").is_none());

        config.append_peer(laptop());
        assert_eq!(config.find_peer_by_name("laptop"), Some(&laptop()));
        assert_eq!(
            config.find_peer_by_public_key("ANON=").map(|p| p.allowed_ips.clone()),
            Some(strings(&["10.0.0.4/32"]))
        );
    }

    #[test]
    fn test_document_without_interface_is_invalid() {
        let err = WireGuardConfig::try_from("[Peer]\nPublicKey = P=\nAllowedIPs = 10.0.0.2/32\n")
            .unwrap_err();
        assert!(matches!(err, ProtoError::MissingInterface));
    }

    #[test]
    fn test_document_keeps_duplicate_peers_and_first_interface() {
        let doc = "\
[Interface]
PrivateKey = FIRST
Address = 10.0.0.1/24

[Interface]
PrivateKey = SECOND
Address = 10.0.1.1/24

[Peer]
PublicKey = DUP=
AllowedIPs = 10.0.0.2/32

[Peer]
PublicKey = DUP=
AllowedIPs = 10.0.0.3/32
";
        let config = WireGuardConfig::try_from(doc).unwrap();
        assert_eq!(config.interface.private_key, "FIRST");
        assert_eq!(config.peers.len(), 2);

        let mut config = config;
        config.append_peer(WireGuardPeer::new("DUP=", strings(&["10.0.0.4/32"])));
        assert_eq!(config.peers.len(), 1);
    }

    #[test]
    fn test_display_matches_file_layout() {
        let mut config = WireGuardConfig::new(
            WireGuardInterface::new("PKEY", strings(&["10.0.0.1/24"])).with_listen_port(51820),
        );
        config.append_peer(laptop());

        assert_eq!(
            config.to_string(),
            "\
[Interface]
PrivateKey = PKEY
Address = 10.0.0.1/24
ListenPort = 51820

[Peer]
# Name = laptop
PublicKey = LAPTOP=
AllowedIPs = 10.0.0.2/32
"
        );
    }

    #[test]
    fn test_parse_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(WireGuardConfig::parse("wg0", dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_save_then_parse() {
        let dir = TempDir::new().unwrap();
        let mut config = WireGuardConfig::new(WireGuardInterface::new(
            "PKEY",
            strings(&["10.0.0.1/24"]),
        ));
        config.append_peer(laptop());

        config.save("wg0", dir.path()).unwrap();
        assert!(dir.path().join("wg0.conf").exists());

        let loaded = WireGuardConfig::parse("wg0", dir.path()).unwrap().unwrap();
        assert_eq!(loaded, config);
    }
}
