//! Interactive chat over one document.

use super::{build_pipeline, confidence_label, report_warnings};
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_engine::{AnswerMode, DocumentSession};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Ask several questions about a document interactively
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Document to read (text, markdown or HTML)
    pub file: PathBuf,

    /// Initial answer mode (standard, enhanced, recursive)
    #[arg(long, default_value = "standard")]
    pub mode: AnswerMode,

    /// Hide the confidence line after each answer
    #[arg(long)]
    pub no_confidence: bool,
}

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq)]
enum ChatInput<'a> {
    Question(&'a str),
    History,
    Clear,
    Mode(&'a str),
    Quit,
    Unknown(&'a str),
    Blank,
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Blank;
    }
    let Some(command) = line.strip_prefix(':') else {
        return ChatInput::Question(line);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "history" => ChatInput::History,
        "clear" => ChatInput::Clear,
        "mode" => ChatInput::Mode(arg),
        "quit" | "exit" | "q" => ChatInput::Quit,
        _ => ChatInput::Unknown(name),
    }
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let pipeline = build_pipeline(config).await?;
        let mut session = DocumentSession::new(Arc::new(pipeline));
        let document = session.load_file(&self.file)?;
        let mut mode = self.mode;

        println!(
            "Loaded {} ({} chunks). Commands: :history, :clear, :mode <m>, :quit",
            document.source,
            document.chunks.len()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("[{}] > ", mode);
            std::io::stdout().flush().ok();

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_input(&line) {
                ChatInput::Blank => continue,
                ChatInput::Quit => break,
                ChatInput::History => {
                    if session.history().is_empty() {
                        println!("No questions asked yet.");
                    }
                    for (i, entry) in session.history().iter().enumerate() {
                        println!(
                            "{}. [{} {}] {}\n   {}\n   {}",
                            i + 1,
                            entry.asked_at.format("%H:%M:%S"),
                            entry.mode,
                            entry.question,
                            entry.answer,
                            confidence_label(entry.score, entry.confidence)
                        );
                    }
                }
                ChatInput::Clear => {
                    session.clear_history();
                    println!("History cleared.");
                }
                ChatInput::Mode(name) => match name.parse::<AnswerMode>() {
                    Ok(new_mode) => {
                        mode = new_mode;
                        println!("Mode set to {}.", mode);
                    }
                    Err(e) => eprintln!("{}", e),
                },
                ChatInput::Unknown(name) => eprintln!("Unknown command: :{}", name),
                ChatInput::Question(question) => match session.resolve(question, mode).await {
                    Ok(answer) => {
                        println!("{}", answer.text);
                        if !self.no_confidence {
                            println!(
                                "{}",
                                confidence_label(answer.top_score(), answer.confidence())
                            );
                        }
                        report_warnings(&answer);
                    }
                    Err(e) if e.is_input_error() => eprintln!("{}", e),
                    Err(e) => return Err(e),
                },
            }
        }

        tracing::info!("Chat ended after {} question(s)", session.history().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("  "), ChatInput::Blank);
        assert_eq!(
            parse_input(" What is this? "),
            ChatInput::Question("What is this?")
        );
        assert_eq!(parse_input(":history"), ChatInput::History);
        assert_eq!(parse_input(":clear"), ChatInput::Clear);
        assert_eq!(parse_input(":mode  recursive"), ChatInput::Mode("recursive"));
        assert_eq!(parse_input(":mode"), ChatInput::Mode(""));
        assert_eq!(parse_input(":exit"), ChatInput::Quit);
        assert_eq!(parse_input(":nope"), ChatInput::Unknown("nope"));
    }
}
