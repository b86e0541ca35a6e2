use clap::{Parser, Subcommand};
use naac_portal::cli::{self, StoreOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "naac")]
#[command(about = "NAAC Portal - research output and department activity records in a spreadsheet")]
#[command(long_about = "NAAC Portal - spreadsheet-backed record store

Each collection (awards, journals, conferences, patents, research grants,
research support) lives in its own worksheet. The first rows of every sheet
are a header block (criterion title, column captions) that is never touched;
new records are always inserted directly below it.

COMMANDS:
  collections - Show configured collections and their columns
  list        - Print the records of a collection
  add         - Add a record at the top of a collection
  init        - Create a workbook with every collection's header block
  export      - Write a collection's records to JSON
  serve       - Start the HTTP API

EXAMPLES:
  naac init naac.xlsx
  naac add awards --data '{\"year\":\"2021\",\"title\":\"New Award\",\"awardeeName\":\"A. Smith\"}'
  naac list awards
  naac serve --port 3000")]
#[command(version)]
struct Cli {
    /// Portal configuration file (YAML)
    #[arg(short, long, global = true, env = "NAAC_CONFIG")]
    config: Option<PathBuf>,

    /// Workbook path (overrides the configuration file)
    #[arg(short, long, global = true, env = "NAAC_WORKBOOK")]
    workbook: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configured collections
    Collections,

    /// Print the records of a collection, newest first
    List {
        /// Collection id (e.g. awards, journals)
        collection: String,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Add a record at the top of a collection.

The record is a JSON object keyed by field name. Fields not listed for the
collection are ignored, missing fields are stored as empty cells. Required
fields must be present and non-blank.

EXAMPLE:
  naac add journals --data '{\"title\":\"...\",\"authorName\":\"...\",\"journalName\":\"...\",\"isListed\":true}'")]
    /// Add a record at the top of a collection
    Add {
        /// Collection id
        collection: String,

        /// Record as a JSON object
        #[arg(short, long)]
        data: String,
    },

    /// Create a workbook seeded with every collection's header block
    Init {
        /// Output workbook (.xlsx)
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Write a collection's records to a JSON file
    Export {
        /// Collection id
        collection: String,

        /// Output JSON file
        output: PathBuf,
    },

    /// Start the HTTP API
    Serve {
        /// Host address to bind to
        #[arg(short = 'H', long, env = "NAAC_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "NAAC_PORT")]
        port: Option<u16>,

        /// Keep records in memory instead of the workbook
        #[arg(long)]
        in_memory: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = StoreOptions {
        config: cli.config,
        workbook: cli.workbook,
    };

    match cli.command {
        Commands::Collections => cli::collections(options)?,

        Commands::List { collection, json } => cli::list(options, collection, json)?,

        Commands::Add { collection, data } => cli::add(options, collection, data)?,

        Commands::Init { output, force } => cli::init(options, output, force)?,

        Commands::Export { collection, output } => cli::export(options, collection, output)?,

        Commands::Serve {
            host,
            port,
            in_memory,
        } => cli::serve(options, host, port, in_memory)?,
    }

    Ok(())
}
