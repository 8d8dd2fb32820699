//! SquirrelStore CLI Client
//!
//! Command-line interface for interacting with a SquirrelStore server.

use clap::{Parser, Subcommand};
use squirrelstore::client::Client;
use squirrelstore::{Result, SquirrelRecord};

/// SquirrelStore CLI
#[derive(Parser, Debug)]
#[command(name = "squirrelstore-cli")]
#[command(about = "CLI for the SquirrelStore HTTP service")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all squirrels
    List,

    /// Show one squirrel
    Get {
        /// Squirrel id
        id: u64,
    },

    /// Create a squirrel
    Create {
        /// Name of the squirrel
        name: String,

        /// Size of the squirrel
        size: String,
    },

    /// Replace a squirrel's name and size
    Update {
        /// Squirrel id
        id: u64,

        /// New name
        name: String,

        /// New size
        size: String,
    },

    /// Delete a squirrel
    Delete {
        /// Squirrel id
        id: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(&args.server).await?;

    match args.command {
        Commands::List => {
            for record in client.list().await? {
                print_record(&record);
            }
        }
        Commands::Get { id } => print_record(&client.get(id).await?),
        Commands::Create { name, size } => {
            let record = client.create(&name, &size).await?;
            println!("created {}", record.id);
        }
        Commands::Update { id, name, size } => {
            client.replace(id, &name, &size).await?;
            println!("updated {}", id);
        }
        Commands::Delete { id } => {
            client.delete(id).await?;
            println!("deleted {}", id);
        }
    }

    Ok(())
}

fn print_record(record: &SquirrelRecord) {
    println!("{}\t{}\t{}", record.id, record.name, record.size);
}
