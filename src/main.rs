use clap::Parser;
use persona_scrape::{Harvest, HarvestError, Harvester};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let harvester = match build_harvester(&args) {
        Ok(harvester) => harvester,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let result = match &args.replay_dir {
        Some(dir) => harvester.replay(&args.username, dir).await,
        None => {
            ::log::info!(
                "Using WebDriver at {} (set WEBDRIVER_URL or --webdriver-url to change)",
                harvester.config().webdriver_url
            );
            harvester.collect(&args.username).await
        }
    };

    let harvest = match result {
        Ok(harvest) => harvest,
        Err(e) => {
            ::log::error!("An error occurred: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Scraping completed in {:.2} seconds: {} posts, {} comments",
        start_time.elapsed().as_secs_f64(),
        harvest.posts.len(),
        harvest.comments.len()
    );

    match write_output(&args, &harvest) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("Failed to write output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_harvester(args: &Args) -> Result<Harvester, HarvestError> {
    let mut harvester = Harvester::new();
    if let Some(path) = &args.config {
        harvester = harvester.with_config_file(path)?;
    }

    // Override the WebDriver URL with an environment variable if provided
    if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
        if !webdriver_url.is_empty() {
            harvester = harvester.with_webdriver_url(webdriver_url);
        }
    }
    if let Some(url) = &args.webdriver_url {
        harvester = harvester.with_webdriver_url(url.clone());
    }

    if let Some(max_posts) = args.max_posts {
        harvester = harvester.with_max_posts(max_posts);
    }
    if let Some(max_comments) = args.max_comments {
        harvester = harvester.with_max_comments(max_comments);
    }
    if args.headed {
        harvester = harvester.headless(false);
    }
    Ok(harvester)
}

fn write_output(args: &Args, harvest: &Harvest) -> Result<(), Box<dyn std::error::Error>> {
    let json = harvest.to_json()?;
    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")?,
        None => println!("{}", json),
    }
    Ok(())
}
