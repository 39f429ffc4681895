mod output;

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use mzalendo_scraper::{
    Category, FetchConfig, Fetcher, ScrapeConfig, ScrapeReport, Scraper, Store,
};

#[derive(Parser)]
#[command(name = "mzalendo")]
#[command(about = "Scrape Kenyan elected-official profiles from mzalendo.com")]
struct Cli {
    /// Scrape every category
    #[arg(long)]
    all: bool,

    /// Scrape the National Assembly
    #[arg(long)]
    national_assembly: bool,

    /// Scrape the Senate
    #[arg(long)]
    senate: bool,

    /// Scrape the County Assemblies
    #[arg(long)]
    county_assemblies: bool,

    /// Comma-separated county names to restrict county-assembly scraping
    #[arg(long)]
    counties: Option<String>,

    /// Width of the detail-stage worker pool
    #[arg(long, default_value_t = 5)]
    workers: usize,

    /// Process detail pages one at a time, for debugging
    #[arg(long)]
    no_concurrency: bool,

    /// Output directory
    #[arg(long, default_value = "kenyan_leaders_data")]
    output_dir: String,

    /// Output format; flat additionally writes the flattened projection
    #[arg(long, value_enum, default_value_t = OutputFormat::Standard)]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Standard,
    Flat,
}

fn print_banner() {
    println!(
        r#"
┌─────────────────────────────────────────────────────┐
│                                                     │
│    MZALENDO KENYA POLITICIANS DATA SCRAPER          │
│                                                     │
└─────────────────────────────────────────────────────┘
"#
    );
}

fn print_summary(report: &ScrapeReport) {
    println!("\n{}", "=".repeat(60));
    println!("SCRAPING SUMMARY");
    println!("{}", "=".repeat(60));
    println!("National Assembly Members: {}", report.national_assembly);
    println!("Senate Members: {}", report.senate);
    println!("County Assembly Members: {}", report.county_assemblies);
    println!("Total Leaders Scraped: {}", report.total);
    println!("Total Time: {} seconds", report.duration_seconds);
    println!("{}", "=".repeat(60));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mzalendo_scraper=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    print_banner();
    let cli = Cli::parse();

    let scrape_counties = cli.county_assemblies || cli.counties.is_some();
    if !(cli.all || cli.national_assembly || cli.senate || scrape_counties) {
        bail!("nothing selected to scrape; pass --all or a category flag (see --help)");
    }

    let counties = cli
        .counties
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let config = ScrapeConfig {
        max_workers: cli.workers,
        concurrent: !cli.no_concurrency,
        counties,
    };
    let fetcher = Fetcher::new(FetchConfig::default())?;
    let store = Store::new(&cli.output_dir)?;
    let scraper = Scraper::new(fetcher, store, config)?;

    let report = if cli.all {
        println!(
            "\nScraping all political leaders using {} workers...",
            cli.workers
        );
        scraper.scrape_all().await?
    } else {
        let started = Instant::now();
        let mut report = ScrapeReport::default();

        if cli.national_assembly {
            println!("\nScraping National Assembly...");
            let seed = scraper.seed_url(Category::NationalAssembly)?;
            let leaders = scraper
                .scrape_category(&seed, Category::NationalAssembly, None)
                .await?;
            report.national_assembly = leaders.len();
        }
        if cli.senate {
            println!("\nScraping Senate...");
            let seed = scraper.seed_url(Category::Senate)?;
            let leaders = scraper
                .scrape_category(&seed, Category::Senate, None)
                .await?;
            report.senate = leaders.len();
        }
        if scrape_counties {
            println!("\nScraping County Assemblies...");
            let leaders = scraper.scrape_county_assemblies().await?;
            report.county_assemblies = leaders.len();
        }

        report.total = report.national_assembly + report.senate + report.county_assemblies;
        report.duration_seconds = started.elapsed().as_secs();
        report
    };

    print_summary(&report);

    if cli.format == OutputFormat::Flat {
        println!("\nFormatting output to the flattened schema...");
        output::write_flat_leaders(Path::new(&cli.output_dir))?;
    }

    let resolved = std::fs::canonicalize(&cli.output_dir)
        .unwrap_or_else(|_| Path::new(&cli.output_dir).to_path_buf());
    println!("\nAll data has been saved to: {}", resolved.display());
    Ok(())
}
