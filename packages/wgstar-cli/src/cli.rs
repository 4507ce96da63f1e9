pub(crate) use crate::command::{peer, psk, server};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wgstar_lib::{util::init_logging, Settings};
use wgstar_proto::command::ensure_installation;

#[derive(Debug, Parser)]
#[clap(name = "wgstar", about = "WireGuard star-topology configuration manager", version)]
pub struct Opt {
    /// Settings file.
    #[clap(short, long, global = true, env = "WGSTAR_CONFIG", help = "Settings file.")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[clap(subcommand)]
    pub command: WgStarCli,
}

#[derive(Subcommand, Debug)]
pub enum WgStarCli {
    #[clap(name = "server", about = "Manage the local [Interface].")]
    Server(server::Args),
    #[clap(name = "peer", about = "Manage [Peer] entries.")]
    Peer(peer::Args),
    #[clap(name = "psk", about = "Manage the preshared key store.")]
    Psk(psk::Args),
}

pub fn run_cli() -> Result<(), anyhow::Error> {
    let opt = Opt::parse();

    init_logging()?;

    let settings = match &opt.config {
        Some(path) => Settings::try_from(path)?,
        None => Settings::default(),
    };
    tracing::debug!("Settings: {settings:?}");

    if !ensure_installation() {
        anyhow::bail!("WireGuard tools are not installed");
    }

    match opt.command {
        WgStarCli::Server(command) => server::exec(command, &settings),
        WgStarCli::Peer(command) => peer::exec(command, &settings),
        WgStarCli::Psk(command) => psk::exec(command, &settings),
    }
}

/// Logs `err`, or prints it to stderr when no subscriber could be installed.
pub fn report_error(err: &anyhow::Error) {
    if tracing::dispatcher::has_been_set() {
        tracing::error!("Error: {err:?}");
    } else {
        eprintln!("Error: {err:?}");
    }
}
