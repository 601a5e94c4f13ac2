use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "persona-scrape")]
#[command(about = "Collects a Reddit user's public posts and comments as JSON")]
#[command(version)]
pub struct Args {
    /// Profile to collect (name, u/name or /u/name)
    pub username: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of posts to collect
    #[arg(long)]
    pub max_posts: Option<usize>,

    /// Maximum number of comments to collect
    #[arg(long)]
    pub max_comments: Option<usize>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// WebDriver server URL (defaults to $WEBDRIVER_URL, then the config)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Read captured HTML from this directory instead of launching a browser
    #[arg(long)]
    pub replay_dir: Option<PathBuf>,

    /// Write the JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
