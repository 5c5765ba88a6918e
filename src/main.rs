//! Media-dw - Universal Media Downloader
//!
//! Console front end that routes media URLs to yt-dlp or instaloader, with an
//! interactive menu and two headless modes.

use anyhow::{Context, Result};
use clap::Parser;
use media_dw::batch::{expand_home, read_url_file};
use media_dw::classifier::{detect_platform, Platform};
use media_dw::menu::{render, MenuController, Prompter};
use media_dw::utils::{resolve_download_root, AppSettings, Quality};
use media_dw::Session;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(name = "media-dw", version, about = "Download media from popular platforms")]
struct Args {
    /// Download folder (defaults to ~/Downloads or ./downloads)
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Initial quality: best, 1080p, 720p, 480p, 360p or worst
    #[arg(long, default_value = "best")]
    quality: Quality,

    /// Seconds to wait between batch downloads
    #[arg(long, value_name = "SECS", default_value_t = 1.0)]
    request_delay: f64,

    /// Give up on a single fetch after this many seconds
    #[arg(long, value_name = "SECS")]
    fetch_timeout: Option<u64>,

    /// Cookie file for Instagram
    #[arg(long, value_name = "FILE")]
    cookies: Option<PathBuf>,

    /// Path to the yt-dlp binary
    #[arg(long, value_name = "PATH")]
    ytdlp: Option<PathBuf>,

    /// Path to the instaloader binary
    #[arg(long, value_name = "PATH")]
    instaloader: Option<PathBuf>,

    /// Download a single URL and exit
    #[arg(long, conflicts_with = "batch")]
    url: Option<String>,

    /// Download every URL listed in a text file and exit
    #[arg(long, value_name = "FILE")]
    batch: Option<String>,

    /// Platform for --url or --batch instead of auto-detection
    #[arg(long)]
    platform: Option<Platform>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn settings(&self, download_root: PathBuf) -> Result<AppSettings> {
        let mut settings = AppSettings::new(download_root);
        settings.quality = self.quality;
        settings.request_delay = Duration::try_from_secs_f64(self.request_delay)
            .context("--request-delay must be a non-negative number of seconds")?;
        settings.fetch_timeout = self.fetch_timeout.map(Duration::from_secs);
        if let Some(cookies) = &self.cookies {
            settings.cookie_file = cookies.clone();
        }
        settings.ytdlp_path = self.ytdlp.clone();
        settings.instaloader_path = self.instaloader.clone();
        Ok(settings)
    }
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        error!("Fatal error: {:#}", e);
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let download_root = resolve_download_root(args.download_dir.as_deref())
        .context("Failed to prepare download folder")?;
    let settings = args.settings(download_root)?;
    info!("Download folder: {}", settings.download_root.display());

    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    rt.block_on(async move {
        let session = Session::start(settings).await;

        if let Some(url) = &args.url {
            download_url_cli(session, url, args.platform).await
        } else if let Some(file) = &args.batch {
            download_batch_cli(session, file, args.platform).await
        } else {
            let mut menu = MenuController::new(session, Prompter::stdin(), std::io::stdout());
            menu.run().await.context("Console output failed")
        }
    })
}

async fn download_url_cli(mut session: Session, url: &str, platform: Option<Platform>) -> Result<()> {
    let platform = platform
        .or_else(|| detect_platform(url))
        .unwrap_or(Platform::Other);
    println!("Platform: {}", platform);
    println!("Quality: {}", session.quality());

    let outcome = session.download_one(url, platform).await;
    let mut out = std::io::stdout();
    render::outcome(&mut out, &outcome)?;
    out.flush()?;
    Ok(())
}

async fn download_batch_cli(mut session: Session, file: &str, platform: Option<Platform>) -> Result<()> {
    let path = expand_home(file);
    let urls = read_url_file(&path).await?;
    if urls.is_empty() {
        println!("No URLs found in file");
        return Ok(());
    }
    println!("Found {} URLs in file", urls.len());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        let mut out = std::io::stdout();
        while let Some(event) = rx.recv().await {
            if let Err(e) = render::batch_event(&mut out, &event).and_then(|_| out.flush()) {
                error!("Failed to print batch progress: {}", e);
            }
        }
    });

    session.download_batch(&urls, platform, Some(tx)).await;
    printer.await.context("Batch progress printer failed")?;
    Ok(())
}
