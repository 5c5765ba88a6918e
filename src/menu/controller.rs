use crate::app::Session;
use crate::batch::{expand_home, has_list_extension, read_url_file, BatchEvent};
use crate::classifier::{detect_platform, validate, Platform};
use crate::menu::input::{Input, Prompter};
use crate::menu::render;
use crate::utils::config::Quality;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::error;

/// Why the current menu action stopped early
#[derive(Debug)]
pub enum Halt {
    Interrupted,
    Closed,
    Io(io::Error),
}

impl From<io::Error> for Halt {
    fn from(e: io::Error) -> Self {
        Halt::Io(e)
    }
}

/// Parsed answer to a numbered prompt
enum Choice {
    Pick(u32),
    Quit,
}

/// Platform sub-menu selection
enum PlatformChoice {
    AutoDetect,
    Fixed(Platform),
    Back,
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    SingleDownload,
    BatchDownload,
    SetQuality,
    ViewHistory,
    OpenFolder,
    ClearConsole,
    About,
    Exit,
}

impl MenuAction {
    fn from_choice(choice: u32) -> Self {
        match choice {
            1 => MenuAction::SingleDownload,
            2 => MenuAction::BatchDownload,
            3 => MenuAction::SetQuality,
            4 => MenuAction::ViewHistory,
            5 => MenuAction::OpenFolder,
            6 => MenuAction::ClearConsole,
            7 => MenuAction::About,
            _ => MenuAction::Exit,
        }
    }
}

/// Interactive text menu over a [`Session`]
pub struct MenuController<W: Write> {
    session: Session,
    prompter: Prompter,
    out: W,
    running: bool,
}

impl<W: Write> MenuController<W> {
    pub fn new(session: Session, prompter: Prompter, out: W) -> Self {
        Self {
            session,
            prompter,
            out,
            running: true,
        }
    }

    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.out)
    }

    /// Main application loop; returns on Exit, confirmed interrupt or EOF
    pub async fn run(&mut self) -> io::Result<()> {
        render::clear_screen(&mut self.out)?;
        render::banner(&mut self.out)?;
        writeln!(
            self.out,
            "Download folder: {}",
            self.session.settings().download_root.display()
        )?;
        writeln!(self.out, "Supported platforms: {}", render::supported_platforms())?;

        while self.running {
            match self.step().await {
                Ok(()) => {}
                Err(Halt::Interrupted) => self.confirm_exit().await?,
                Err(Halt::Closed) => {
                    writeln!(self.out, "\nGoodbye!")?;
                    self.running = false;
                }
                Err(Halt::Io(e)) => return Err(e),
            }
        }
        self.out.flush()
    }

    async fn step(&mut self) -> Result<(), Halt> {
        render::main_menu(&mut self.out, &self.session.settings().download_root)?;
        let action = match self.choice("Enter your choice: ", 1, 8).await? {
            Choice::Pick(n) => MenuAction::from_choice(n),
            Choice::Quit => MenuAction::Exit,
        };

        match action {
            MenuAction::SingleDownload => self.handle_single_download().await?,
            MenuAction::BatchDownload => self.handle_batch_download().await?,
            MenuAction::SetQuality => self.handle_set_quality().await?,
            MenuAction::ViewHistory => {
                let recent = self.session.history().recent(10);
                render::history(&mut self.out, &recent)?;
            }
            MenuAction::OpenFolder => self.handle_open_folder()?,
            MenuAction::ClearConsole => {
                render::clear_screen(&mut self.out)?;
                render::banner(&mut self.out)?;
            }
            MenuAction::About => {
                render::about(&mut self.out, &self.session.settings().download_root)?
            }
            MenuAction::Exit => {
                writeln!(self.out, "Thank you for using Media Downloader!")?;
                self.running = false;
            }
        }

        if self.running && action != MenuAction::ClearConsole {
            self.prompt("\nPress Enter to continue...").await?;
            render::clear_screen(&mut self.out)?;
            render::banner(&mut self.out)?;
        }
        Ok(())
    }

    async fn confirm_exit(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nInterrupted by user")?;
        match self.prompt("Do you want to exit? (y/n): ").await {
            Ok(answer) if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") => {
                writeln!(self.out, "Goodbye!")?;
                self.running = false;
            }
            Ok(_) => {}
            // a second interrupt or EOF at the confirmation exits
            Err(Halt::Interrupted) | Err(Halt::Closed) => {
                writeln!(self.out, "\nGoodbye!")?;
                self.running = false;
            }
            Err(Halt::Io(e)) => return Err(e),
        }
        Ok(())
    }

    async fn prompt(&mut self, text: &str) -> Result<String, Halt> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        match self.prompter.next().await {
            Input::Line(line) => Ok(line),
            Input::Interrupted => Err(Halt::Interrupted),
            Input::Closed => Err(Halt::Closed),
        }
    }

    /// Numbered choice in `min..=max`; `exit`, `quit` or `q` quits
    async fn choice(&mut self, text: &str, min: u32, max: u32) -> Result<Choice, Halt> {
        loop {
            let answer = self.prompt(text).await?;
            let answer = answer.trim();
            if matches!(answer.to_lowercase().as_str(), "exit" | "quit" | "q") {
                return Ok(Choice::Quit);
            }
            match answer.parse::<u32>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(Choice::Pick(n)),
                Ok(_) => writeln!(self.out, "Please enter a number between {} and {}", min, max)?,
                Err(_) => writeln!(self.out, "Please enter a valid number")?,
            }
        }
    }

    async fn platform_choice(&mut self, text: &str) -> Result<PlatformChoice, Halt> {
        render::platform_menu(&mut self.out)?;
        Ok(match self.choice(text, 1, 7).await? {
            Choice::Pick(1) => PlatformChoice::AutoDetect,
            Choice::Pick(2) => PlatformChoice::Fixed(Platform::YouTube),
            Choice::Pick(3) => PlatformChoice::Fixed(Platform::Instagram),
            Choice::Pick(4) => PlatformChoice::Fixed(Platform::TikTok),
            Choice::Pick(5) => PlatformChoice::Fixed(Platform::Twitter),
            Choice::Pick(6) => PlatformChoice::Fixed(Platform::Other),
            Choice::Pick(_) | Choice::Quit => PlatformChoice::Back,
        })
    }

    /// URL from the user; `None` when they back out
    async fn url_input(&mut self) -> Result<Option<String>, Halt> {
        loop {
            let url = self.prompt("Enter video URL (or 'back' to return): ").await?;
            let url = url.trim();
            if matches!(url.to_lowercase().as_str(), "back" | "exit" | "quit") {
                return Ok(None);
            }
            if url.is_empty() {
                writeln!(self.out, "No URL entered")?;
                return Ok(None);
            }
            if validate(url) {
                return Ok(Some(url.to_string()));
            }
            writeln!(
                self.out,
                "Invalid URL format. Please include http:// or https://"
            )?;
        }
    }

    async fn handle_single_download(&mut self) -> Result<(), Halt> {
        let choice = self.platform_choice("Select platform: ").await?;
        if matches!(choice, PlatformChoice::Back) {
            return Ok(());
        }
        let Some(url) = self.url_input().await? else {
            return Ok(());
        };

        let platform = match choice {
            PlatformChoice::Fixed(platform) => platform,
            _ => match detect_platform(&url) {
                Some(platform) => platform,
                None => {
                    writeln!(self.out, "Could not detect platform. Using yt-dlp...")?;
                    Platform::Other
                }
            },
        };

        let settings = self.session.settings();
        writeln!(self.out, "Platform: {}", platform)?;
        writeln!(self.out, "Quality: {}", self.session.quality())?;
        writeln!(
            self.out,
            "Save location: {}",
            settings.download_root.join(platform.folder_name()).display()
        )?;
        self.out.flush()?;

        let started = Instant::now();
        let outcome = tokio::select! {
            outcome = self.session.download_one(&url, platform) => outcome,
            _ = self.prompter.interrupted() => return Err(Halt::Interrupted),
        };
        render::outcome(&mut self.out, &outcome)?;
        writeln!(
            self.out,
            "Download time: {:.2} seconds",
            started.elapsed().as_secs_f64()
        )?;
        Ok(())
    }

    async fn handle_batch_download(&mut self) -> Result<(), Halt> {
        let raw = self.prompt("Enter path to text file with URLs: ").await?;
        if raw.trim().is_empty() {
            writeln!(self.out, "No file path entered")?;
            return Ok(());
        }
        let path: PathBuf = expand_home(&raw);
        if !path.exists() {
            writeln!(self.out, "File not found: {}", path.display())?;
            return Ok(());
        }
        if !has_list_extension(&path) {
            writeln!(self.out, "File should be a text file (.txt) or CSV file")?;
        }

        let platform_override = match self
            .platform_choice("Select platform (or 1 for auto-detect): ")
            .await?
        {
            PlatformChoice::Back => return Ok(()),
            PlatformChoice::AutoDetect => None,
            PlatformChoice::Fixed(platform) => Some(platform),
        };

        let urls = match read_url_file(&path).await {
            Ok(urls) => urls,
            Err(e) => {
                error!("Batch download failed: {}", e);
                writeln!(self.out, "{}", e)?;
                return Ok(());
            }
        };
        if urls.is_empty() {
            writeln!(self.out, "No URLs found in file")?;
            return Ok(());
        }
        writeln!(self.out, "Found {} URLs in file", urls.len())?;

        let (tx, mut rx) = mpsc::unbounded_channel::<BatchEvent>();
        let out = &mut self.out;
        let printer = async move {
            let mut result = Ok(());
            while let Some(event) = rx.recv().await {
                if result.is_ok() {
                    result = render::batch_event(out, &event).and_then(|_| out.flush());
                }
            }
            result
        };
        let session = &mut self.session;
        let batch = async move {
            tokio::join!(
                session.download_batch(&urls, platform_override, Some(tx)),
                printer
            )
        };
        // an interrupt abandons the remaining entries; finished ones stay recorded
        let (_, printed) = tokio::select! {
            done = batch => done,
            _ = self.prompter.interrupted() => return Err(Halt::Interrupted),
        };
        printed?;
        Ok(())
    }

    async fn handle_set_quality(&mut self) -> Result<(), Halt> {
        render::quality_menu(&mut self.out)?;
        let quality = match self.choice("Select quality: ", 1, 7).await? {
            Choice::Pick(1) => Quality::Best,
            Choice::Pick(2) => Quality::P1080,
            Choice::Pick(3) => Quality::P720,
            Choice::Pick(4) => Quality::P480,
            Choice::Pick(5) => Quality::P360,
            Choice::Pick(6) => Quality::Worst,
            Choice::Pick(_) | Choice::Quit => return Ok(()),
        };
        self.session.set_quality(quality);
        writeln!(self.out, "Quality set to: {}", quality)?;
        Ok(())
    }

    fn handle_open_folder(&mut self) -> Result<(), Halt> {
        let root = self.session.settings().download_root.clone();
        match open::that(&root) {
            Ok(()) => writeln!(self.out, "Opened downloads folder: {}", root.display())?,
            Err(e) => writeln!(self.out, "Could not open folder: {}", e)?,
        }
        Ok(())
    }
}
