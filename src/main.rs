//! Command line front end for the brick service clients.

use anyhow::{Context, Result};
use brick_apis::brickset::{BricksetClient, SetQuery};
use brick_apis::config::ClientConfig;
use brick_apis::credentials::Credentials;
use brick_apis::lego::LegoClient;
use brick_apis::logging::{init_logging, LogFormat};
use brick_apis::report::report_owned_wanted_parts;
use brick_apis::store::catalog::ItemType;
use brick_apis::store::order::OrderStatus;
use brick_apis::store::{Direction, StoreClient};
use brick_apis::user::UserClient;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Debug;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Credentials JSON file
    #[arg(long, env = "BRICK_APIS_CREDENTIALS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Save every raw response body in this directory
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the credentials file
    CheckCredentials,
    /// List catalog colors
    Colors,
    Color {
        id: i64,
    },
    /// Look up a catalog item, e.g. `item part 3001`
    Item {
        item_type: ItemType,
        no: String,
    },
    /// Items that contain the given item
    Supersets {
        item_type: ItemType,
        no: String,
        #[arg(long)]
        color: Option<i64>,
    },
    /// Store orders received (`in`) or placed (`out`)
    Orders {
        #[arg(default_value = "out")]
        direction: Direction,
        /// Only these statuses
        #[arg(long, value_delimiter = ',')]
        include: Vec<OrderStatus>,
        /// Leave out these statuses
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<OrderStatus>,
        #[arg(long)]
        filed: bool,
    },
    Order {
        id: i64,
        /// Also fetch the order's items
        #[arg(long)]
        items: bool,
    },
    /// Fetch a wanted list, every page
    Wanted {
        #[arg(default_value_t = 0)]
        id: i64,
    },
    /// Match wanted parts against [LOOSE] wanted lists
    Report,
    /// Show the global shopping cart
    Cart,
    /// Log in to Brickset and print the user hash
    BricksetLogin,
    /// Search Brickset sets
    BricksetSets {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "")]
        set_number: String,
        #[arg(long, default_value = "")]
        theme: String,
        #[arg(long, default_value = "")]
        year: String,
    },
    /// Bricks & Pieces lookup by element or design number
    LegoPart {
        id: String,
    },
    /// Bricks & Pieces lookup of every brick in a set
    LegoSet {
        id: String,
    },
}

fn print<T: Serialize + Debug>(value: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{:#?}", value);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let credentials = Credentials::load(&cli.credentials)
        .with_context(|| format!("loading {}", cli.credentials.display()))?;
    credentials.validate()?;

    let config = ClientConfig {
        archive_dir: cli.archive_dir.clone(),
        ..ClientConfig::default()
    };
    let json = cli.json;

    match cli.command {
        Command::CheckCredentials => {
            println!("Credentials in {} are valid", cli.credentials.display());
        }
        Command::Colors => {
            let client = StoreClient::new(config, credentials.store()?)?;
            print(&client.get_colors().await?, json)?;
        }
        Command::Color { id } => {
            let client = StoreClient::new(config, credentials.store()?)?;
            print(&client.get_color(id).await?, json)?;
        }
        Command::Item { item_type, no } => {
            let client = StoreClient::new(config, credentials.store()?)?;
            print(&client.get_item(item_type, &no).await?, json)?;
        }
        Command::Supersets {
            item_type,
            no,
            color,
        } => {
            let client = StoreClient::new(config, credentials.store()?)?;
            let supersets = match color {
                Some(color) => client.get_supersets_by_color(item_type, &no, color).await?,
                None => client.get_supersets(item_type, &no).await?,
            };
            print(&supersets, json)?;
        }
        Command::Orders {
            direction,
            include,
            exclude,
            filed,
        } => {
            let client = StoreClient::new(config, credentials.store()?)?;
            let orders = if include.is_empty() && exclude.is_empty() && !filed {
                client.get_orders(direction).await?
            } else {
                client
                    .get_orders_by_status(direction, &include, &exclude, filed)
                    .await?
            };
            info!(count = orders.len(), "fetched orders");
            print(&orders, json)?;
        }
        Command::Order { id, items } => {
            let client = StoreClient::new(config, credentials.store()?)?;
            print(&client.get_order(id).await?, json)?;
            if items {
                print(&client.get_order_items(id).await?, json)?;
            }
        }
        Command::Wanted { id } => {
            let client = UserClient::new(config, credentials.user()?)?;
            client.login().await?;
            print(&client.get_wanted_list_all(id).await?, json)?;
        }
        Command::Report => {
            let client = UserClient::new(config, credentials.user()?)?;
            client.login().await?;
            let report = report_owned_wanted_parts(&client).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
            info!(stats = ?client.stats(), "done");
        }
        Command::Cart => {
            let client = UserClient::new(config, credentials.user()?)?;
            client.login().await?;
            print(&client.get_global_cart().await?, json)?;
        }
        Command::BricksetLogin => {
            let client = BricksetClient::new(config, credentials.brickset()?)?;
            println!("{}", client.login().await?);
        }
        Command::BricksetSets {
            query,
            set_number,
            theme,
            year,
        } => {
            let client = BricksetClient::new(config, credentials.brickset()?)?;
            let query = SetQuery {
                query,
                set_number,
                theme,
                year,
                ..SetQuery::default()
            };
            print(&client.get_sets(&query).await?, json)?;
        }
        Command::LegoPart { id } => {
            let client = LegoClient::new(config, credentials.lego()?)?;
            print(&client.get_part(&id).await?, json)?;
        }
        Command::LegoSet { id } => {
            let client = LegoClient::new(config, credentials.lego()?)?;
            print(&client.get_set(&id).await?, json)?;
        }
    }

    Ok(())
}
