//! Line input that can be interrupted by Ctrl-C
//!
//! Stdin is read on a dedicated thread and forwarded over a channel, so a
//! pending prompt can race the interrupt signal. Long-running menu actions
//! race the same signal through [`Prompter::interrupted`].

use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::debug;

/// What a prompt read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Interrupted,
    /// Input ended (EOF)
    Closed,
}

/// Where interrupts come from
enum Interrupts {
    /// Process Ctrl-C
    Signal,
    /// Injected interrupts, used by scripted sessions
    Channel(mpsc::UnboundedReceiver<()>),
    Never,
}

impl Interrupts {
    async fn wait(&mut self) {
        match self {
            Interrupts::Signal => {
                if tokio::signal::ctrl_c().await.is_err() {
                    // no signal support: never resolve
                    std::future::pending::<()>().await;
                }
            }
            Interrupts::Channel(rx) => {
                if rx.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            Interrupts::Never => std::future::pending::<()>().await,
        }
    }
}

pub struct Prompter {
    lines: mpsc::UnboundedReceiver<String>,
    interrupts: Interrupts,
}

impl Prompter {
    /// Prompter fed by the process stdin, reacting to Ctrl-C
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("stdin read failed: {}", e);
                        break;
                    }
                }
            }
        });

        Self {
            lines: rx,
            interrupts: Interrupts::Signal,
        }
    }

    /// Prompter replaying fixed lines, then reporting [`Input::Closed`]
    pub fn scripted<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in lines {
            // receiver is alive in `rx`
            let _ = tx.send(line.into());
        }

        Self {
            lines: rx,
            interrupts: Interrupts::Never,
        }
    }

    /// Take interrupts from `interrupts` instead of the process signal
    pub fn with_interrupts(mut self, interrupts: mpsc::UnboundedReceiver<()>) -> Self {
        self.interrupts = Interrupts::Channel(interrupts);
        self
    }

    /// Next line with its line ending removed
    ///
    /// A line that is already available wins over a pending interrupt.
    pub async fn next(&mut self) -> Input {
        tokio::select! {
            biased;
            line = self.lines.recv() => match line {
                Some(line) => Input::Line(line.trim_end_matches(['\r', '\n']).to_string()),
                None => Input::Closed,
            },
            _ = self.interrupts.wait() => Input::Interrupted,
        }
    }

    /// Resolves on the next interrupt
    pub async fn interrupted(&mut self) {
        self.interrupts.wait().await
    }
}
