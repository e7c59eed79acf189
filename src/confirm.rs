use std::{
    io::{self, BufRead, BufReader, Write},
    thread};

use async_trait::async_trait;
use colored::Colorize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::types::Vault;

/// Asks whether a vault may be destroyed. Only an explicit yes allows the purge.
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, vault: &Vault) -> bool;
}

/// a case-insensitive "y" is the only affirmative answer
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Interactive y/N prompt on the terminal.
///
/// Lines are read on a plain thread and handed over through a channel, so an unanswered prompt
/// never holds up runtime shutdown.
pub struct StdinConfirm {
    answers: mpsc::Receiver<io::Result<String>>,
}

impl StdinConfirm {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    /// Take the answers from `input`, one line per vault.
    pub fn from_reader<R: BufRead + Send + 'static>(input: R) -> Self {
        let (sender, answers) = mpsc::channel(1);
        let spawned = thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || forward_lines(input, sender));
        // without a reader the sender is gone and every vault is kept
        if let Err(err) = spawned {
            warn!("Could not start the stdin reader: {err}");
        }
        Self { answers }
    }
}

impl Default for StdinConfirm {
    fn default() -> Self {
        Self::new()
    }
}

fn forward_lines<R: BufRead>(input: R, sender: mpsc::Sender<io::Result<String>>) {
    for line in input.lines() {
        let failed = line.is_err();
        // stop when nobody listens anymore or the input broke
        if sender.blocking_send(line).is_err() || failed {
            break;
        }
    }
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&mut self, vault: &Vault) -> bool {
        print!(
            "{} ",
            format!("[{}] {}: Would you like to destroy this vault? (y/N)", vault.region, vault.name)
                .red()
                .bold()
        );
        if let Err(err) = io::stdout().flush() {
            warn!("Could not flush prompt: {err}");
        }

        match self.answers.recv().await {
            Some(Ok(answer)) => is_affirmative(&answer),
            Some(Err(err)) => {
                warn!("Failed to read answer for vault {vault}: {err}");
                false
            }
            // end of input counts as "no"
            None => false,
        }
    }
}
