//! Finance Agent terminal dashboard
//!
//! Pulls extracted financial rows from the hosted platform (or a local export),
//! aggregates them into the dashboard views, and wraps the platform's document
//! and assistant functions.

mod actions;
mod chat;
mod config;
mod constants;
mod documents;
mod platform;
mod reports;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use finance_core::{aggregate_with, load};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{Config, FileConfig};
use platform::PlatformClient;

#[derive(Parser, Debug)]
#[command(name = "finance-agent")]
#[command(about = "Terminal dashboard for Finance Agent")]
struct Cli {
    /// Config file (optional when SUPABASE_URL and SUPABASE_ANON_KEY are set)
    #[arg(short, long, default_value = constants::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Verbose diagnostics (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show totals, category breakdown and daily income/expense (default)
    Summary(SummaryArgs),

    /// Fetch financial data and save it as JSON
    Fetch {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Manage uploaded documents
    Documents {
        #[command(subcommand)]
        action: DocumentsCommand,
    },

    /// Ask the AI assistant about your data
    Ask {
        /// Question or instruction
        message: String,

        /// Chat session to continue (default: most recent)
        #[arg(long)]
        session: Option<String>,
    },

    /// Show a chat transcript
    History {
        /// Chat session (default: most recent)
        #[arg(long)]
        session: Option<String>,
    },

    /// List quick actions
    Actions {
        /// Show a single action
        id: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct SummaryArgs {
    /// Read records from a JSON or CSV export instead of the platform
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Order days by date rather than fetch order
    #[arg(long)]
    chronological: bool,

    /// Print the aggregate as JSON
    #[arg(long)]
    json: bool,

    /// Also write CSV exports to this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum DocumentsCommand {
    /// List uploaded documents
    List {
        #[arg(long, default_value_t = constants::DEFAULT_DOCUMENT_LIMIT)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Upload PDF, CSV or XLSX files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete a document by ID (asks for confirmation)
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_file(FileConfig::load_or_default(&cli.config)?);
    for warning in config.warnings() {
        eprintln!("⚠️  {}", warning);
    }

    match cli.command.unwrap_or(Command::Summary(SummaryArgs::default())) {
        Command::Summary(args) => run_summary(&config, args).await,
        Command::Fetch { output } => run_fetch(&config, &output).await,
        Command::Documents { action } => handle_documents_command(&config, action).await,
        Command::Ask { message, session } => run_ask(&config, &message, session).await,
        Command::History { session } => run_history(&config, session).await,
        Command::Actions { id } => run_actions(id.as_deref()),
    }
}

/// Build a client and make sure it holds a session
async fn connect(config: &Config) -> Result<PlatformClient> {
    let (url, anon_key) = config.platform_credentials()?;
    let mut client = PlatformClient::new(url, anon_key);

    if let Some(token) = &config.access_token {
        client = client.with_access_token(token.as_str());
    } else if let (Some(email), Some(password)) = (&config.email, &config.password) {
        eprintln!("Signing in as {}...", email);
        let session = client
            .sign_in(email, password)
            .await
            .context("Sign-in failed")?;
        tracing::debug!(
            user = session.user.as_ref().map(|u| u.id.as_str()),
            expires_in = session.expires_in,
            "signed in"
        );
    }

    if !client.has_session() {
        anyhow::bail!(platform::PlatformError::NoSession);
    }
    Ok(client)
}

async fn run_summary(config: &Config, args: SummaryArgs) -> Result<()> {
    let records = match &args.input {
        Some(path) => load::from_path(path)?,
        None => {
            let client = connect(config).await?;
            client
                .fetch_financial_data(config.dashboard.fetch_limit)
                .await
                .context("Failed to fetch financial data")?
        }
    };

    let options = config.aggregate_options(args.chronological);
    let result = aggregate_with(&records, &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        reports::print_dashboard(result.as_ref());
    }

    if let (Some(dir), Some(result)) = (&args.export_dir, &result) {
        for path in reports::export_csv(dir, result)? {
            eprintln!("  Generated: {}", path.display());
        }
    }

    Ok(())
}

async fn run_fetch(config: &Config, output: &Path) -> Result<()> {
    let client = connect(config).await?;
    let records = client
        .fetch_financial_data(config.dashboard.fetch_limit)
        .await
        .context("Failed to fetch financial data")?;

    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Saved {} record(s) to {}", records.len(), output.display());
    Ok(())
}

/// Handle document subcommands
async fn handle_documents_command(config: &Config, action: DocumentsCommand) -> Result<()> {
    let client = connect(config).await?;

    match action {
        DocumentsCommand::List { limit, offset } => {
            let docs = client
                .list_documents(limit, offset)
                .await
                .context("Failed to list documents")?;
            documents::print_documents(&docs);
            Ok(())
        }

        DocumentsCommand::Upload { files } => {
            let mut failed = 0usize;

            for path in &files {
                let name = path.display();
                match client.upload_document(path).await {
                    Ok(doc) => println!("  ✓ {} uploaded successfully (id {})", name, doc.id),
                    Err(e) => {
                        failed += 1;
                        eprintln!("  ✗ {}: {}", name, e);
                    }
                }
            }

            println!(
                "\n{} of {} file(s) uploaded",
                files.len() - failed,
                files.len()
            );
            if failed > 0 {
                anyhow::bail!("{} upload(s) failed", failed);
            }
            Ok(())
        }

        DocumentsCommand::Delete { id, yes } => {
            let stdin = std::io::stdin();
            let confirmed =
                documents::confirm_delete(&id, yes, &mut stdin.lock(), &mut std::io::stderr())
                    .context("Failed to read confirmation")?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }

            client
                .delete_document(&id)
                .await
                .with_context(|| format!("Failed to delete document {}", id))?;
            println!("Deleted document {}", id);
            Ok(())
        }
    }
}

async fn run_ask(config: &Config, message: &str, session: Option<String>) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("Message is empty");
    }

    let client = connect(config).await?;
    let session = match session {
        Some(id) => Some(id),
        None => client.latest_chat_session().await?.map(|s| s.id),
    };

    let response = client
        .ask(message, session.as_deref())
        .await
        .context("Failed to send message")?;

    println!("{}", response.reply_text());
    if let Some(id) = response.session_id.as_deref().or(session.as_deref()) {
        eprintln!("\n(session {})", id);
    }
    Ok(())
}

async fn run_history(config: &Config, session: Option<String>) -> Result<()> {
    let client = connect(config).await?;

    let session = match session {
        Some(id) => Some(chat::ChatSession { id, title: None }),
        None => client.latest_chat_session().await?,
    };

    let messages = match &session {
        Some(s) => {
            println!("Session {}\n", s.title.as_deref().unwrap_or(&s.id));
            client.chat_messages(&s.id).await?
        }
        None => Vec::new(),
    };

    println!("{}", chat::render_transcript(&messages));
    Ok(())
}

fn run_actions(id: Option<&str>) -> Result<()> {
    match id {
        None => actions::print_actions(),
        Some(id) => {
            let action = actions::find(id).with_context(|| {
                let known: Vec<_> = actions::QUICK_ACTIONS.iter().map(|a| a.id).collect();
                format!("Unknown action '{}'. Available: {}", id, known.join(", "))
            })?;
            actions::print_action(action);
        }
    }
    Ok(())
}
