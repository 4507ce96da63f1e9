use clap::{Parser, Subcommand};
use wgstar_lib::Settings;
use wgstar_proto::PresharedKeyStore;

#[derive(Debug, Parser)]
pub struct Args {
    #[clap(subcommand)]
    pub action: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    #[clap(name = "get", about = "Print the preshared key stored for a public key.")]
    Get(GetArgs),
    #[clap(name = "set", about = "Store a preshared key for a public key.")]
    Set(SetArgs),
}

#[derive(Debug, Parser)]
pub struct GetArgs {
    #[clap(long, help = "Peer public key.")]
    pub public_key: String,
}

#[derive(Debug, Parser)]
pub struct SetArgs {
    #[clap(long, help = "Peer public key.")]
    pub public_key: String,

    #[clap(long, help = "Preshared key to store.")]
    pub preshared_key: String,
}

pub fn exec(args: Args, settings: &Settings) -> anyhow::Result<()> {
    let mut store = PresharedKeyStore::load(settings.preshared_key_path())?;

    match args.action {
        Action::Get(GetArgs { public_key }) => match store.get_preshared_key(&public_key) {
            Some(psk) => println!("{psk}"),
            None => tracing::warn!("No preshared key stored for {public_key}"),
        },
        Action::Set(SetArgs {
            public_key,
            preshared_key,
        }) => store.set_preshared_key(public_key, preshared_key)?,
    }

    Ok(())
}
