//! # todoust
//!
//! A minimal todo-list manager with an HTTP API and a terminal client.
//!
//! ## Usage
//!
//! ### Server
//!
//! ```bash
//! todoust serve --port 4000
//! ```
//!
//! The API listens on `/api/todos` (`GET`, `POST`) and `/api/todos/:id`
//! (`PUT`, `DELETE`). Tasks are kept in a single JSON file.
//!
//! ### Interactive Mode (TUI)
//!
//! Run the command without arguments to open the interactive client against
//! the configured server:
//!
//! ```bash
//! todoust
//! # or explicitly
//! todoust ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `j`/`k`: Move selection
//! *   `Space`: Toggle completed
//! *   `e`: Edit selected task
//! *   `d`: Delete selected task
//! *   `a`: Focus the form (`Tab` next field, `Left`/`Right` priority,
//!     `Enter` submit, `Esc` cancel)
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! todoust add "Write report" --due 2025-12-01T09:00 --priority high
//! todoust list
//! todoust complete <ID>
//! todoust edit <ID> --title "Write final report"
//! todoust remove <ID>
//! ```
//!
//! ## Configuration
//!
//! *   `TODOS_DB`: data file (default `~/.local/share/todoust/todos.json` on Linux).
//! *   `TODOS_PORT`, `TODOS_BIND`: server port (default `4000`) and address.
//! *   `TODOS_API_URL`: server the client talks to (default `http://localhost:4000`).
//! *   `RUST_LOG`: log filter.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use todoust::client::HttpClient;
use todoust::commands::*;
use todoust::config::{self, API_URL_ENV, BIND_ENV, DB_ENV, DEFAULT_API_URL, DEFAULT_BIND, DEFAULT_PORT, PORT_ENV};
use todoust::models::Priority;
use todoust::storage::Store;
use todoust::tui::run_tui;
use todoust::{logging, server};

#[derive(Parser)]
#[command(name = "todoust")]
#[command(about = "Minimal todo list: HTTP API and terminal client", long_about = None)]
struct Cli {
    /// Base URL of the todo server
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Address to bind
        #[arg(short, long, env = BIND_ENV, default_value = DEFAULT_BIND)]
        bind: IpAddr,
        /// Data file (defaults to the user data directory)
        #[arg(long, env = DB_ENV)]
        db: Option<PathBuf>,
    },
    /// List upcoming and completed tasks
    List,
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Due date, YYYY-MM-DD or YYYY-MM-DDTHH:MM
        #[arg(short, long)]
        due: Option<String>,
        /// High, Medium or Low
        #[arg(short, long)]
        priority: Option<Priority>,
    },
    /// Edit a task
    Edit {
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New due date; an empty string clears it
        #[arg(short, long)]
        due: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<Priority>,
    },
    /// Toggle a task between pending and completed
    Complete {
        id: String,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    let cli = Cli::parse();
    let api_url = cli.api_url;
    let client = || HttpClient::new(&api_url);
    let result = match cli.command {
        Some(Commands::Serve { port, bind, db }) => {
            logging::init("info");
            cmd_serve(SocketAddr::new(bind, port), db.unwrap_or_else(config::db_path))
        }
        Some(Commands::List) => {
            logging::init("warn");
            cmd_list(client())
        }
        Some(Commands::Add { title, due, priority }) => {
            logging::init("warn");
            cmd_add(client(), title, due, priority, false).map(|_| ())
        }
        Some(Commands::Edit { id, title, due, priority }) => {
            logging::init("warn");
            cmd_edit(client(), &id, title, due, priority, false).map(|_| ())
        }
        Some(Commands::Complete { id }) => {
            logging::init("warn");
            cmd_complete(client(), &id, false).map(|_| ())
        }
        Some(Commands::Remove { id }) => {
            logging::init("warn");
            cmd_remove(client(), &id, false)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "todoust", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => {
            // Log lines would tear the alternate screen
            logging::init("off");
            if let Err(e) = run_tui(client()) {
                eprintln!("Error running TUI: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_serve(addr: SocketAddr, db: PathBuf) -> todoust::Result<()> {
    let store = Arc::new(Store::open(db));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(addr, store))
}
