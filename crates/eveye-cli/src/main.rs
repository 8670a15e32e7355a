use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use eveye_lib::{EsiClient, KillmailCache, UniverseResolver, DEFAULT_ESI_BASE};

#[derive(Parser, Debug)]
#[command(author, version, about = "EVE Online name/id resolution utilities")]
struct Cli {
    /// Override the ESI API base URL.
    #[arg(long, default_value = DEFAULT_ESI_BASE)]
    esi_base: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve character names to character ids.
    Character {
        /// Character names to resolve.
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Resolve universe ids to display names.
    Names {
        /// Universe ids to resolve.
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Resolve inventory-type names (ships, modules) to type ids.
    Items {
        /// Inventory-type names to resolve.
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Fetch a killmail and list the victim's fitted items by name.
    Killmail {
        /// Killmail id.
        id: i64,
        /// Killmail hash.
        hash: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let client = EsiClient::with_base_url(&cli.esi_base).context("failed to build ESI client")?;

    match cli.command {
        Command::Character { names } => handle_character(client, &names),
        Command::Names { ids } => handle_names(client, &ids),
        Command::Items { names } => handle_items(client, &names),
        Command::Killmail { id, hash } => handle_killmail(client, id, &hash),
    }
}

fn handle_character(client: EsiClient, names: &[String]) -> Result<()> {
    let resolver = UniverseResolver::new(client);
    let ids = resolver
        .resolve_names_to_character_ids(names)
        .context("failed to resolve character names")?;

    for (name, id) in names.iter().zip(ids) {
        println!("{} {}", id, name);
    }

    Ok(())
}

fn handle_names(client: EsiClient, ids: &[i64]) -> Result<()> {
    let resolver = UniverseResolver::new(client);
    let names = resolver
        .resolve_ids_to_names(ids)
        .context("failed to resolve ids")?;

    for (id, name) in ids.iter().zip(names) {
        println!("{} {}", id, name);
    }

    Ok(())
}

fn handle_items(client: EsiClient, names: &[String]) -> Result<()> {
    let resolver = UniverseResolver::new(client);
    let ids = resolver
        .resolve_item_names_to_ids(names)
        .context("failed to resolve item names")?;

    for (name, id) in names.iter().zip(ids) {
        println!("{} {}", id, name);
    }

    Ok(())
}

fn handle_killmail(client: EsiClient, id: i64, hash: &str) -> Result<()> {
    let killmails = KillmailCache::new(client.clone());
    let resolver = UniverseResolver::new(client);

    let killmail = killmails
        .items_for(id, hash)
        .context("failed to fetch killmail")?;
    let names = resolver
        .resolve_ids_to_names(&killmail.victim_item_types)
        .context("failed to resolve victim item types")?;

    println!(
        "Killmail {} ({})",
        id,
        killmail.time.format("%Y-%m-%d %H:%M:%S")
    );
    for name in names {
        println!("- {}", name);
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
