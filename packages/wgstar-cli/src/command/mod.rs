pub(crate) mod peer;
pub(crate) mod psk;
pub(crate) mod server;
