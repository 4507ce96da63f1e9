pub const WIREGUARD_INTERFACE: &str = "wg0";

pub const DEFAULT_WIREGUARD_ETC_DIR: &str = "/etc/wireguard";

pub const DEFAULT_WGSTAR_CONF_PATH: &str = "/etc/wgstarman/wgstarman.conf";

pub const WIREGUARD_CONF_EXTENSION: &str = "conf";

/// Mode for the WireGuard configuration directory when we create it.
pub const WG_DIR_MODE: u32 = 0o700;

/// Mode for the preshared key store directory when we create it.
pub const ETC_DIR_MODE: u32 = 0o755;

/// Mode applied to every file we write.
pub const WG_CONF_FILE_MODE: u32 = 0o600;
