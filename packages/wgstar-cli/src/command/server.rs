use clap::{Parser, Subcommand};
use wgstar_lib::Settings;
use wgstar_proto::{WireGuardConfig, WireGuardInterface};

#[derive(Debug, Parser)]
pub struct Args {
    #[clap(subcommand)]
    pub action: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    #[clap(name = "init", about = "Create or replace the [Interface], keeping existing peers.")]
    Init(InitArgs),
    #[clap(name = "show", about = "Print the configuration.")]
    Show(ShowArgs),
}

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Interface name, e.g. `wg0`.
    #[clap(short, long, help = "Interface name.")]
    pub interface: Option<String>,

    #[clap(long, help = "Private key of the local endpoint.")]
    pub private_key: String,

    #[clap(long, value_delimiter = ',', required = true, help = "Address(es) in CIDR notation.")]
    pub address: Vec<String>,

    #[clap(long, help = "UDP listen port.")]
    pub listen_port: Option<u16>,

    #[clap(long, help = "Firewall mark for outgoing packets.")]
    pub fw_mark: Option<u32>,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    #[clap(short, long, help = "Interface name.")]
    pub interface: Option<String>,
}

pub fn exec(args: Args, settings: &Settings) -> anyhow::Result<()> {
    match args.action {
        Action::Init(args) => init(args, settings),
        Action::Show(args) => show(args, settings),
    }
}

fn init(args: InitArgs, settings: &Settings) -> anyhow::Result<()> {
    let name = args.interface.as_deref().unwrap_or(settings.interface());
    let dir = settings.wireguard_dir();

    let interface = WireGuardInterface {
        private_key: args.private_key,
        address: args.address,
        listen_port: args.listen_port,
        fw_mark: args.fw_mark,
    };

    let config = match WireGuardConfig::parse(name, &dir)? {
        Some(mut existing) => {
            tracing::info!(
                "Replacing [Interface] of {name}, keeping {} peer(s)",
                existing.peers.len()
            );
            existing.interface = interface;
            existing
        }
        None => WireGuardConfig::new(interface),
    };

    config.save(name, &dir)?;

    Ok(())
}

fn show(args: ShowArgs, settings: &Settings) -> anyhow::Result<()> {
    let name = args.interface.as_deref().unwrap_or(settings.interface());
    let dir = settings.wireguard_dir();

    match WireGuardConfig::parse(name, &dir)? {
        Some(config) => print!("{config}"),
        None => tracing::warn!("No configuration for {name} in {}", dir.display()),
    }

    Ok(())
}
