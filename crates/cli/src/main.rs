mod echo;
mod logging;

use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, anyhow};
use batcave_core::{BatCave, FavoriteFolder, SortOption, SourceConfig, link_to_id};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use url::Url;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, text", s)),
        }
    }
}

/// Browse the batcave.biz comic catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "batcave")]
#[command(version)]
#[command(about = "Browse the batcave.biz comic catalog", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Site root to query
    #[arg(long, global = true, default_value = "https://batcave.biz", value_name = "URL")]
    base_url: Url,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, global = true, value_name = "UA")]
    user_agent: Option<String>,

    /// Output format (json, text)
    #[arg(short, long, global = true, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Homepage sections
    Home {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Category facets and their tokens
    Categories,
    /// Sort options accepted by `category`
    Sorts,
    /// One page of a category listing
    Category {
        /// Category token, e.g. g_14
        token: String,
        /// Sort option key, e.g. rating_desc
        #[arg(short, long)]
        sort: Option<SortOption>,
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Keyword search
    Search {
        keyword: String,
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Comic details, chapters and related comics
    Detail {
        /// Slug-id, e.g. 6975-invincible-2003
        id: String,
    },
    /// Image URLs of one chapter
    Chapter { comic_id: String, chapter_id: String },
    /// Check account credentials
    Login {
        #[arg(long)]
        account: String,
        #[arg(long)]
        password: String,
    },
    /// Comics in a favorites folder (logs in first)
    Favorites {
        /// Folder key or number, e.g. reading or 1
        #[arg(long, default_value = "reading")]
        folder: FavoriteFolder,
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Only list the available folders
        #[arg(long)]
        list_folders: bool,
    },
    /// Resolve a comic page link to its slug-id
    Resolve { link: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.verbose) {
        echo::print_warning(&format!("{:#}", e));
    }

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            echo::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let format = args.format;
    let verbose = args.verbose;

    let mut builder = SourceConfig::builder().base_url(args.base_url).timeout(args.timeout);
    if let Some(user_agent) = args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let source = BatCave::with_config(builder.build()).context("Failed to create HTTP client")?;
    let started = Instant::now();

    match args.command {
        Command::Home { page } => {
            let sections = source.catalog().homepage(page).await.context("Failed to load homepage")?;
            report_timing(verbose, "homepage", started);
            emit(format, &sections, || echo::print_sections(&sections))?;
        }
        Command::Categories => {
            let set = source.catalog().init_categories().await;
            report_timing(verbose, "categories", started);
            if let Some(failure) = &set.failure {
                echo::print_warning(&format!("Categories unavailable: {}", failure));
            }
            emit(format, &set.facets, || echo::print_facets(&set.facets))?;
        }
        Command::Sorts => {
            let keys: Vec<_> = SortOption::ALL
                .iter()
                .map(|o| serde_json::json!({ "key": o.key(), "label": o.label() }))
                .collect();
            emit(format, &keys, echo::print_sort_options)?;
        }
        Command::Category { token, sort, page } => {
            let result = source
                .catalog()
                .category(&token, sort, page)
                .await
                .with_context(|| format!("Failed to load category {}", token))?;
            report_timing(verbose, "category", started);
            emit(format, &result, || echo::print_page(&result, page))?;
        }
        Command::Search { keyword, page } => {
            let result = source
                .catalog()
                .search(&keyword, page)
                .await
                .with_context(|| format!("Failed to search for {:?}", keyword))?;
            report_timing(verbose, "search", started);
            emit(format, &result, || echo::print_page(&result, page))?;
        }
        Command::Detail { id } => {
            let detail = source
                .catalog()
                .comic_detail(&id)
                .await
                .with_context(|| format!("Failed to load comic {}", id))?;
            report_timing(verbose, "detail", started);
            emit(format, &detail, || echo::print_detail(&detail))?;
        }
        Command::Chapter { comic_id, chapter_id } => {
            let chapter = source
                .catalog()
                .chapter_images(&comic_id, &chapter_id)
                .await
                .with_context(|| format!("Failed to load chapter {} of {}", chapter_id, comic_id))?;
            report_timing(verbose, "chapter", started);
            emit(format, &chapter, || echo::print_chapter(&chapter))?;
        }
        Command::Login { account, password } => {
            let outcome = source.session().login(&account, &password).await.context("Login failed")?;
            report_timing(verbose, "login", started);
            let record = serde_json::json!({ "outcome": outcome, "message": outcome.message() });
            emit(format, &record, || echo::print_success(outcome.message()))?;
        }
        Command::Favorites { folder, page, account, password, list_folders } => {
            let favorites = source.favorites();
            if list_folders {
                let list = favorites.list_folders(None);
                return emit(format, &list, || echo::print_folders(&list));
            }

            let (Some(account), Some(password)) = (account, password) else {
                return Err(anyhow!("--account and --password are required to list favorites"));
            };

            if verbose {
                echo::print_step(1, 2, &format!("Logging in as {}", account.bright_white()));
            }
            source.session().login(&account, &password).await.context("Login failed")?;

            if verbose {
                echo::print_step(2, 2, &format!("Listing folder {}", folder.title().bright_white()));
            }
            let result = favorites
                .list(folder, page)
                .await
                .with_context(|| format!("Failed to list favorites folder {}", folder))?;
            report_timing(verbose, "favorites", started);
            emit(format, &result, || echo::print_page(&result, page))?;
        }
        Command::Resolve { link } => {
            let id = link_to_id(&link).ok_or_else(|| anyhow!("{} is not a comic link", link))?;
            let record = serde_json::json!({ "link": link, "id": id });
            emit(format, &record, || println!("{}", id))?;
        }
    }

    Ok(())
}

/// Writes `value` as pretty JSON, or runs the text renderer.
fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
            println!("{}", json);
        }
        OutputFormat::Text => text(),
    }
    Ok(())
}

fn report_timing(verbose: bool, label: &str, started: Instant) {
    if verbose {
        echo::print_timing(label, started.elapsed());
    }
}
