//! Menu text and result formatting

use crate::batch::BatchEvent;
use crate::classifier::Platform;
use crate::extractor::DownloadOutcome;
use crate::history::DownloadRecord;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::path::Path;

pub const APP_NAME: &str = "Media-dw";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const RULE: &str = "============================================================";

pub fn banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "╔══════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                                                          ║")?;
    writeln!(out, "║      UNIVERSAL MEDIA DOWNLOADER v{:<24}║", VERSION)?;
    writeln!(out, "║                                                          ║")?;
    writeln!(out, "║      Download videos from multiple platforms             ║")?;
    writeln!(out, "╚══════════════════════════════════════════════════════════╝")?;
    writeln!(out)
}

pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}

pub fn header(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", RULE)?;
    writeln!(out, " {}", title)?;
    writeln!(out, "{}", RULE)
}

pub fn supported_platforms() -> String {
    Platform::SUPPORTED
        .iter()
        .map(Platform::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn main_menu(out: &mut impl Write, download_root: &Path) -> io::Result<()> {
    header(out, &format!("{} v{}", APP_NAME, VERSION))?;
    writeln!(out, "\nMain Menu:\n")?;
    writeln!(out, "1. Single URL Download")?;
    writeln!(out, "2. Batch Download from File")?;
    writeln!(out, "3. Set Download Quality")?;
    writeln!(out, "4. View Download History")?;
    writeln!(out, "5. Open Downloads Folder")?;
    writeln!(out, "6. Clear Console")?;
    writeln!(out, "7. About")?;
    writeln!(out, "8. Exit")?;
    writeln!(out, "\nSupported Platforms: {}", supported_platforms())?;
    writeln!(out, "Download Folder: {}\n", download_root.display())
}

pub fn platform_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nSelect Platform:\n")?;
    writeln!(out, "1. Auto-detect")?;
    writeln!(out, "2. YouTube")?;
    writeln!(out, "3. Instagram")?;
    writeln!(out, "4. TikTok")?;
    writeln!(out, "5. Twitter/X")?;
    writeln!(out, "6. Other (yt-dlp)")?;
    writeln!(out, "7. Back to Main Menu\n")
}

pub fn quality_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nSelect Quality:\n")?;
    writeln!(out, "1. Best (default)")?;
    writeln!(out, "2. 1080p")?;
    writeln!(out, "3. 720p")?;
    writeln!(out, "4. 480p")?;
    writeln!(out, "5. 360p")?;
    writeln!(out, "6. Worst (smallest size)")?;
    writeln!(out, "7. Back\n")
}

pub fn about(out: &mut impl Write, download_root: &Path) -> io::Result<()> {
    header(out, "About")?;
    writeln!(out, "{} v{}", APP_NAME, VERSION)?;
    writeln!(out, "\nFeatures:")?;
    writeln!(out, "• Download from multiple platforms")?;
    writeln!(out, "• Automatic platform detection")?;
    writeln!(out, "• Quality selection")?;
    writeln!(out, "• Batch downloads")?;
    writeln!(out, "• Download history")?;
    writeln!(out, "\nSupported Platforms:")?;
    for platform in Platform::SUPPORTED {
        writeln!(out, "  • {}", platform.folder_name())?;
    }
    writeln!(out, "\nDownload Folder:")?;
    writeln!(out, "  {}\n", download_root.display())
}

/// One history line: status, time, platform and a shortened URL
pub fn history_line(record: &DownloadRecord) -> String {
    let status = if record.success { "Success" } else { "Failed" };
    let url: String = record.url.chars().take(50).collect();
    let ellipsis = if record.url.chars().count() > 50 { "..." } else { "" };
    format!(
        "{} {} - {}: {}{}",
        status,
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.platform,
        url,
        ellipsis
    )
}

pub fn history(out: &mut impl Write, records: &[&DownloadRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No download history found");
    }
    header(out, "Download History")?;
    for record in records {
        writeln!(out, "{}", history_line(record))?;
    }
    writeln!(out)
}

fn format_size(bytes: u64) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    if bytes as f64 >= MB {
        format!("{:.1} MB ({} bytes)", bytes as f64 / MB, bytes)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn outcome(out: &mut impl Write, outcome: &DownloadOutcome) -> io::Result<()> {
    match outcome {
        DownloadOutcome::Success(media) => {
            writeln!(out, "Download completed successfully!")?;
            writeln!(out, "Title: {}", media.title)?;
            if let Some(duration) = media.duration {
                writeln!(out, "Duration: {} seconds", duration)?;
            }
            match media.size {
                Some(size) => writeln!(out, "File size: {}", format_size(size))?,
                None => writeln!(out, "File size: Unknown")?,
            }
            if let Some(file) = &media.filename {
                writeln!(out, "Saved to: {}", file.display())?;
            }
            Ok(())
        }
        DownloadOutcome::Failure(failure) => {
            writeln!(out, "Download failed: {}", failure.message)
        }
    }
}

pub fn batch_event(out: &mut impl Write, event: &BatchEvent) -> io::Result<()> {
    match event {
        BatchEvent::ItemStarted { index, total, url } => {
            header(out, &format!("Processing URL {}/{}", index, total))?;
            writeln!(out, "URL: {}", url)
        }
        BatchEvent::ItemSkipped { failure, .. } => writeln!(out, "{}", failure.message),
        BatchEvent::ItemFinished {
            platform, outcome: result, ..
        } => {
            writeln!(out, "Platform: {}", platform)?;
            outcome(out, result)
        }
        BatchEvent::Waiting { delay } => writeln!(
            out,
            "Waiting {} seconds before next download...",
            delay.as_secs_f64()
        ),
        BatchEvent::Finished { succeeded, total } => writeln!(
            out,
            "Batch download completed: {}/{} successful",
            succeeded, total
        ),
    }
}
