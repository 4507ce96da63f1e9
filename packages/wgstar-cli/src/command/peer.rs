use clap::{Parser, Subcommand};
use wgstar_lib::Settings;
use wgstar_proto::{
    command::generate_preshared_key, PresharedKeyStore, ProtoResult, WireGuardConfig,
    WireGuardPeer,
};

#[derive(Debug, Parser)]
pub struct Args {
    #[clap(subcommand)]
    pub action: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    #[clap(name = "add", about = "Add a peer, replacing any peer with the same public key.")]
    Add(AddArgs),
    #[clap(name = "show", about = "Print a peer by its label.")]
    Show(ShowArgs),
}

#[derive(Debug, Parser)]
pub struct AddArgs {
    #[clap(short, long, help = "Interface name.")]
    pub interface: Option<String>,

    #[clap(long, help = "Peer public key.")]
    pub public_key: String,

    #[clap(long, value_delimiter = ',', required = true, help = "Allowed IP range(s).")]
    pub allowed_ips: Vec<String>,

    #[clap(long, help = "Peer endpoint as host:port.")]
    pub endpoint: Option<String>,

    #[clap(long, help = "Persistent keepalive interval in seconds.")]
    pub keepalive: Option<u16>,

    /// Written to the config as a `# Name` comment.
    #[clap(long, help = "Human readable label for the peer.")]
    pub label: Option<String>,

    #[clap(long, help = "Preshared key. Recorded in the preshared key store.")]
    pub preshared_key: Option<String>,

    #[clap(
        long,
        conflicts_with = "preshared_key",
        help = "Generate a preshared key if none is stored for this peer."
    )]
    pub generate_psk: bool,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    #[clap(short, long, help = "Interface name.")]
    pub interface: Option<String>,

    #[clap(long, help = "Peer label.")]
    pub label: String,
}

pub fn exec(args: Args, settings: &Settings) -> anyhow::Result<()> {
    match args.action {
        Action::Add(args) => add(args, settings),
        Action::Show(args) => show(args, settings),
    }
}

/// Picks the preshared key for `public_key`: the explicit one (recorded in the
/// store), else the stored one, else a freshly generated one when `generate`
/// is set.
fn preshared_key_for<F>(
    store: &mut PresharedKeyStore,
    public_key: &str,
    explicit: Option<String>,
    generate: bool,
    generator: F,
) -> ProtoResult<Option<String>>
where
    F: FnOnce() -> ProtoResult<String>,
{
    if let Some(psk) = explicit {
        store.set_preshared_key(public_key, psk.as_str())?;
        return Ok(Some(psk));
    }

    if let Some(psk) = store.get_preshared_key(public_key) {
        return Ok(Some(psk.to_string()));
    }

    if generate {
        let psk = generator()?;
        store.set_preshared_key(public_key, psk.as_str())?;
        return Ok(Some(psk));
    }

    Ok(None)
}

fn add(args: AddArgs, settings: &Settings) -> anyhow::Result<()> {
    let name = args.interface.as_deref().unwrap_or(settings.interface());
    let dir = settings.wireguard_dir();

    let mut config = WireGuardConfig::parse(name, &dir)?.ok_or_else(|| {
        anyhow::anyhow!(
            "No configuration for {name} in {}. Run `wgstar server init` first.",
            dir.display()
        )
    })?;

    let mut store = PresharedKeyStore::load(settings.preshared_key_path())?;
    let preshared_key = preshared_key_for(
        &mut store,
        &args.public_key,
        args.preshared_key,
        args.generate_psk,
        generate_preshared_key,
    )?;

    let peer = WireGuardPeer::builder()
        .public_key(args.public_key)
        .allowed_ips(args.allowed_ips)
        .preshared_key(preshared_key)
        .endpoint(args.endpoint)
        .persistent_keepalive(args.keepalive)
        .name(args.label)
        .build()?;

    tracing::info!("Adding peer {} to {name}", peer.public_key);
    config.append_peer(peer);
    config.save(name, &dir)?;

    Ok(())
}

fn show(args: ShowArgs, settings: &Settings) -> anyhow::Result<()> {
    let name = args.interface.as_deref().unwrap_or(settings.interface());
    let dir = settings.wireguard_dir();

    let peer = WireGuardConfig::parse(name, &dir)?
        .and_then(|config| config.find_peer_by_name(&args.label).cloned());

    match peer {
        Some(peer) => println!("{peer}"),
        None => tracing::warn!("No peer labelled {} in {name}", args.label),
    }

    Ok(())
}
