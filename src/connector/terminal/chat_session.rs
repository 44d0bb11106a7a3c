use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::application::{ConversationController, RevealHandle, SubmitOutcome};

use super::formatter::{format_history, format_response, format_sections};

const HELP: &str = "\
Type a question and press enter. Commands:
  /history        list the questions asked this session
  /select <id>    show an earlier answer again
  /clear          forget the session history
  /quit           leave";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Ask(&'a str),
    History,
    Select(&'a str),
    Clear,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Command::Ask(line);
    };

    let (name, argument) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name {
        "history" => Command::History,
        "select" => Command::Select(argument),
        "clear" => Command::Clear,
        "quit" | "exit" => Command::Quit,
        _ => Command::Help,
    }
}

/// Drives a [`ConversationController`] from the terminal: shows a spinner
/// while the relay works, then types the answer out as it is revealed.
pub struct ChatSession {
    controller: Arc<ConversationController>,
}

impl ChatSession {
    pub fn new(controller: Arc<ConversationController>) -> Self {
        Self { controller }
    }

    /// Read questions and commands from stdin until `/quit` or end of input.
    pub async fn run(&self) -> Result<()> {
        println!("Ask a question about the Bible. Type /help for commands.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("? ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_command(&line) {
                Command::Ask(question) => self.ask(question).await?,
                Command::History => {
                    println!("{}", format_history(&self.controller.state().history))
                }
                Command::Select(id) => self.show_history_item(id),
                Command::Clear => {
                    self.controller.clear_history();
                    println!("History cleared.");
                }
                Command::Help => println!("{HELP}"),
                Command::Quit => break,
            }
        }

        self.controller.shutdown();
        Ok(())
    }

    /// Submit one question and render the answer.
    pub async fn ask(&self, question: &str) -> Result<()> {
        self.controller.set_query(question);

        let spinner = spinner();
        let outcome = self.controller.submit_query().await;
        spinner.finish_and_clear();

        match outcome {
            SubmitOutcome::Ignored => debug!("Nothing to submit"),
            SubmitOutcome::Revealing(handle) => self.render_reveal(handle).await?,
            SubmitOutcome::Failed(_) | SubmitOutcome::Superseded => {
                if let Some(response) = self.controller.state().response {
                    println!("\n{}", format_response(&response));
                }
            }
        }

        Ok(())
    }

    fn show_history_item(&self, id: &str) {
        if !self.controller.select_history_item(id) {
            println!("No history entry with id {id}");
            return;
        }

        if let Some((entry, answer)) = self.controller.selected_entry() {
            println!("\n» {}\n", entry.question());
            println!("{}", format_response(&answer));
        }
    }

    async fn render_reveal(&self, handle: RevealHandle) -> Result<()> {
        let mut updates = self.controller.subscribe();
        let mut stdout = std::io::stdout();
        let mut printed = 0;

        println!();
        let finished = handle.finished();
        tokio::pin!(finished);

        loop {
            tokio::select! {
                _ = &mut finished => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let content = updates
                        .borrow_and_update()
                        .response
                        .as_ref()
                        .map(|response| response.content().to_string())
                        .unwrap_or_default();
                    printed = print_new_chars(&mut stdout, &content, printed)?;
                }
            }
        }

        if let Some(response) = self.controller.state().response {
            print_new_chars(&mut stdout, response.content(), printed)?;
            println!();
            print!("{}", format_sections(&response));
        }
        println!();

        Ok(())
    }
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Searching the Scriptures...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Write the characters of `content` past the first `printed` and return the
/// new count of characters on screen.
fn print_new_chars(out: &mut impl Write, content: &str, printed: usize) -> std::io::Result<usize> {
    let total = content.chars().count();
    if total > printed {
        let delta: String = content.chars().skip(printed).collect();
        out.write_all(delta.as_bytes())?;
        out.flush()?;
    }
    Ok(total.max(printed))
}
