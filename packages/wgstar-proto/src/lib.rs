pub mod command;
pub(crate) mod error;
pub mod persist;
pub mod psk;
pub mod resolver;
pub mod section;
pub mod upsert;
pub mod wireguard;

pub type ProtoResult<T> = core::result::Result<T, error::ProtoError>;

pub use error::ProtoError;
pub use psk::{PresharedKeyEntry, PresharedKeyStore};
pub use wireguard::{WireGuardConfig, WireGuardInterface, WireGuardPeer, WireGuardPeerBuilder};
