use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use udir::config::Config;
use udir::directory::{DirectoryClient, NewUser};
use udir::store::{RecordKey, UserStore};
use udir::view::{self, ListOptions, SortColumn};

/// Admin front end for a remote user directory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Endpoint override for this invocation
    #[arg(long, global = true)]
    url: Option<String>,

    /// Activate debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List user records
    List {
        /// Column to sort by
        #[arg(long, value_enum, default_value_t = SortColumn::Id)]
        sort: SortColumn,

        /// Sort in descending order
        #[arg(long)]
        desc: bool,

        /// Keep only records whose name, username, or email contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Records per page
        #[arg(long, default_value_t = 10)]
        page_size: usize,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a user record
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Amount to attach (random if omitted)
        #[arg(long)]
        amount: Option<u64>,
    },

    /// Delete user records by server id
    Delete {
        /// Server-assigned record ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show or update the stored configuration
    Config {
        /// Persist a new endpoint URL
        #[arg(long)]
        set_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    let endpoint = cli
        .url
        .clone()
        .unwrap_or_else(|| config.endpoint().to_string());

    if cli.debug {
        eprintln!("using endpoint {endpoint}");
    }

    match cli.command {
        Commands::List {
            sort,
            desc,
            filter,
            page,
            page_size,
            json,
        } => {
            let opts = ListOptions {
                sort,
                descending: desc,
                filter,
                page,
                page_size,
            };
            list(&make_store(&endpoint)?, &opts, json).await
        }
        Commands::Add {
            name,
            username,
            email,
            amount,
        } => {
            let input = NewUser {
                name,
                username,
                email,
                amount,
            };
            add(&make_store(&endpoint)?, input).await
        }
        Commands::Delete { ids } => delete(&make_store(&endpoint)?, &ids).await,
        Commands::Config { set_url } => match set_url {
            Some(url) => {
                config.set_endpoint(url);
                config.save()?;
                println!("config written to {}", config.path().display());
                Ok(())
            }
            None => {
                println!("endpoint: {}", config.endpoint());
                Ok(())
            }
        },
    }
}

fn make_store(endpoint: &str) -> Result<UserStore> {
    let client = DirectoryClient::new(endpoint).context("creating directory client")?;
    Ok(UserStore::new(client))
}

async fn list(store: &UserStore, opts: &ListOptions, json: bool) -> Result<()> {
    let total = store
        .refresh()
        .await
        .context("loading users from directory")?;
    let snapshot = store.snapshot();
    let rows = view::shape(&snapshot.entries, opts);

    if json {
        let records: Vec<_> = rows.iter().map(|entry| &entry.record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", view::render_table(&rows));
        println!("{} of {} records", rows.len(), total);
    }
    Ok(())
}

async fn add(store: &UserStore, input: NewUser) -> Result<()> {
    let record = store.add(input).await.context("adding user to directory")?;
    match record.id {
        Some(id) => println!(
            "{} added {} (id {})",
            "ok:".green().bold(),
            record.username,
            id
        ),
        None => println!(
            "{} added {} (no id assigned by server)",
            "warning:".yellow().bold(),
            record.username
        ),
    }
    Ok(())
}

async fn delete(store: &UserStore, ids: &[i64]) -> Result<()> {
    store
        .refresh()
        .await
        .context("loading users from directory")?;
    let snapshot = store.snapshot();

    let mut keys = Vec::new();
    let mut unknown = Vec::new();
    for id in ids {
        let key = RecordKey::Server(*id);
        if snapshot.entries.iter().any(|entry| entry.key == key) {
            keys.push(key);
        } else {
            unknown.push(*id);
        }
    }

    let outcome = store.remove(&keys).await;
    for key in &outcome.removed {
        if let RecordKey::Server(id) = key {
            println!("{} deleted {}", "ok:".green().bold(), id);
        }
    }
    for (key, err) in &outcome.failed {
        if let RecordKey::Server(id) = key {
            eprintln!("{} delete {} failed: {}", "error:".red().bold(), id, err);
        }
    }
    for id in &unknown {
        eprintln!("{} no record with id {}", "error:".red().bold(), id);
    }

    let missed = outcome.failed.len() + unknown.len();
    if missed > 0 {
        bail!("{} of {} deletions not applied", missed, ids.len());
    }
    Ok(())
}
