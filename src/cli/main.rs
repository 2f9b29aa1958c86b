use core::time::Duration;
use std::{path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use color_eyre::{Section, config::HookBuilder, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use quill::{slug::ArticleSlug, store::WorkspaceStore};
use tracing::{error, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod session;

#[derive(Parser)]
#[command(about = "Draft and publish your articles", long_about = None)]
#[command(version, author)]
struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a blank article and edit it interactively.
    New {
        /// Initial title
        title: Option<String>,
    },

    /// Load a saved article and edit it.
    Edit {
        slug: String,
    },

    /// Print the listing preview of a saved article.
    Preview {
        slug: String,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    HookBuilder::default()
        .display_env_section(true)
        .panic_section("It looks like Quill encountered a bug")
        .install()
        .expect("Failed to install color-eyre hook");

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false);
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    if let Err(err) = entry(cli).await {
        error!("{:#}", err);
        exit(1);
    }
}

async fn entry(cli: Cli) -> eyre::Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let store = WorkspaceStore::new(root);

    match cli.command {
        Commands::New { title } => session::run(store, None, title, cli.json).await,
        Commands::Edit { slug } => {
            let slug: ArticleSlug = slug.parse()?;
            let article = store.load(&slug).await.note("Can't open article")?;
            session::run(store, Some(article), None, cli.json).await
        }
        Commands::Preview { slug } => {
            let slug: ArticleSlug = slug.parse()?;
            let article = store.load(&slug).await.note("Can't open article")?;
            let preview = article.preview();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
                return Ok(());
            }

            println!("{}", preview.title);
            if !preview.description.is_empty() {
                println!("  {}", preview.description);
            }
            if !preview.tags.is_empty() {
                println!("  tags: {}", preview.tags.join(", "));
            }
            if let Some(url) = preview.url {
                println!("  {url}");
            }
            Ok(())
        }
    }
}

pub async fn long_task<T>(
    loading_msg: &'static str,
    f: impl Future<Output = T>,
    complete_msg: &'static str,
) -> T {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(loading_msg);

    let result = f.await;

    pb.finish_with_message(complete_msg);
    result
}
