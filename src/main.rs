mod crawler;
mod db;
mod error;
mod fetcher;
mod parser;
mod segment;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crawler::CrawlOptions;
use fetcher::HttpSource;

#[derive(Parser)]
#[command(name = "wired_scraper", about = "Wired.com article crawler and sentence store")]
struct Cli {
    /// SQLite database path
    #[arg(long, default_value = "data/wired.sqlite")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Discover article links from the seed page and process them
    Run {
        /// Max links to process (default: all discovered)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Seed page to discover links from
        #[arg(long, default_value = fetcher::SEED_URL)]
        seed: String,
        /// Minimum interval between requests, in milliseconds
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
        /// Per-request timeout, in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Extra attempts for failed fetches
        #[arg(long, default_value_t = 0)]
        retries: u32,
        /// Extract and segment but skip the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Process a single URL and print the extracted record
    Parse {
        url: String,
        /// Also persist the record
        #[arg(long)]
        save: bool,
        /// Per-request timeout, in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Show storage statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            println!("Schema ready at {}", cli.db.display());
            Ok(())
        }
        Commands::Run {
            limit,
            seed,
            delay_ms,
            timeout_secs,
            retries,
            dry_run,
        } => {
            let source = HttpSource::new(Duration::from_secs(timeout_secs))?;
            let mut links = fetcher::discover_links(&source, &seed).await?;
            if let Some(n) = limit {
                links.truncate(n);
            }
            if links.is_empty() {
                println!("No candidate links found on {}", seed);
                return Ok(());
            }
            println!("Will be processing {} links", links.len());

            let conn = if dry_run {
                None
            } else {
                let conn = db::connect(&cli.db)?;
                db::init_schema(&conn)?;
                Some(conn)
            };
            let opts = CrawlOptions {
                delay: Duration::from_millis(delay_ms),
                retries,
            };
            let summary = crawler::crawl(&source, conn.as_ref(), &links, &opts).await?;
            summary.print();
            Ok(())
        }
        Commands::Parse {
            url,
            save,
            timeout_secs,
        } => {
            let source = HttpSource::new(Duration::from_secs(timeout_secs))?;
            let record = crawler::process_url(&source, &url, 0).await?;
            print_record(&record);

            if save {
                let conn = db::connect(&cli.db)?;
                db::init_schema(&conn)?;
                let docid = db::insert_article(&conn, &record)?;
                println!("\nStored as docid {}", docid);
            }
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let stats = db::get_stats(&conn)?;
            println!("Articles:     {}", stats.articles);
            println!("Sentences:    {}", stats.sentences);
            println!("With tags:    {}", stats.tagged);
            println!("With pubdate: {}", stats.dated);
            Ok(())
        }
    }
}

fn print_record(record: &db::ArticleRecord) {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    println!("Source:     {}", record.source);
    println!("URL:        {}", record.url);
    println!("Title:      {}", record.title);
    println!("Author:     {}", opt(&record.author));
    println!(
        "Published:  {}",
        record
            .pub_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Category:   {}", opt(&record.category));
    println!("Tags:       {}", opt(&record.tags));
    println!("Parsed:     {}", record.parse_date);
    println!("\nSentences ({}):", record.sentences.len());
    for (i, sent) in record.sentences.iter().enumerate() {
        println!("{:>4}. {}", i + 1, sent);
    }
}
