//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{commands, server, Folio};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author = "Nick Howes")]
#[command(version)]
#[command(about = "A small static blog generator with an RSS feed", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,

        /// Mark the post as a draft
        #[arg(long)]
        draft: bool,
    },

    /// Build the static site
    #[command(alias = "b")]
    Build {
        /// Also write pages for draft posts
        #[arg(long)]
        drafts: bool,

        /// Rebuild on file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Build, then serve the site locally
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Rebuild on file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List blog posts, newest first
    List {
        /// Include drafts
        #[arg(short, long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "folio=debug,info" } else { "folio=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New { title, draft } => {
            let folio = Folio::new(&base_dir)?;
            let path = commands::new::create_post(&folio, &title, draft)?;
            println!("Created {}", path.display());
        }

        Commands::Build { drafts, watch } => {
            let folio = Folio::new(&base_dir)?;
            let report = commands::build::run(&folio, drafts)?;
            println!(
                "Built {} posts{} into {:?}",
                report.pages,
                if report.feed { " and rss.xml" } else { "" },
                folio.public_dir
            );

            if watch {
                tokio::task::spawn_blocking(move || {
                    commands::build::watch(&folio, drafts, |report| {
                        println!("Rebuilt {} posts", report.pages);
                    })
                })
                .await??;
            }
        }

        Commands::Serve { port, ip, watch } => {
            let folio = Folio::new(&base_dir)?;
            folio.build()?;
            server::start(&folio, &ip, port, watch).await?;
        }

        Commands::List { all, json } => {
            let folio = Folio::new(&base_dir)?;
            commands::list::run(&folio, all, json)?;
        }

        Commands::Clean => {
            let folio = Folio::new(&base_dir)?;
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
