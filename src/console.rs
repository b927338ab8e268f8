//! Operator Console
//!
//! A line-oriented prompt on stdin for inspecting and overriding flight
//! state fields while clients are connected. Writes go through the same
//! range checks the protocol applies.

use crate::protocol::{Field, FieldError};
use crate::server::CommandServer;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

pub const PROMPT: &str = "tello> ";

/// What the console loop should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleResponse {
    /// Print this and keep going
    Output(String),
    /// Nothing to print
    Silent,
    /// Leave the console and shut down
    Quit,
}

pub struct Console {
    server: Arc<CommandServer>,
}

impl Console {
    pub fn new(server: Arc<CommandServer>) -> Self {
        Self { server }
    }

    /// Handle one operator line
    pub async fn execute(&self, line: &str) -> ConsoleResponse {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = words.first() else {
            return ConsoleResponse::Silent;
        };

        match first.to_ascii_lowercase().as_str() {
            "exit" | "quit" => ConsoleResponse::Quit,
            "reset" => {
                self.server.reboot().await;
                ConsoleResponse::Output("Drone state reset.".into())
            }
            "sessions" => ConsoleResponse::Output(self.describe_sessions().await),
            word => match word.parse::<Field>() {
                Ok(field) => ConsoleResponse::Output(self.field_command(field, &words[1..]).await),
                Err(_) => ConsoleResponse::Output("Unsupported command.".into()),
            },
        }
    }

    async fn field_command(&self, field: Field, args: &[&str]) -> String {
        let mut state = self.server.state().lock().await;

        if args.is_empty() {
            return format!(
                "Field '{}' value is {}{}.",
                field,
                state.field(field),
                field.unit()
            );
        }

        let value = match args {
            [value] => value.parse::<i32>().ok(),
            _ => None,
        };

        match value.map(|value| state.set_field(field, value).map(|_| value)) {
            Some(Ok(value)) => format!("Field '{}' set to {}{}", field, value, field.unit()),
            Some(Err(FieldError::OutOfRange { min, max, .. })) => usage(field, min, max),
            Some(Err(e)) => e.to_string(),
            None => {
                let (min, max) = field.range(&state);
                usage(field, min, max)
            }
        }
    }

    async fn describe_sessions(&self) -> String {
        let sessions = self.server.registry().snapshot().await;
        if sessions.is_empty() {
            return "No active command channels.".into();
        }

        let now = Instant::now();
        sessions
            .iter()
            .map(|entry| {
                format!(
                    "{} (last command {}s ago)",
                    entry.endpoint,
                    now.saturating_duration_since(entry.last_seen).as_secs()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Run the prompt until `quit`, `exit` or end of input
    pub async fn run(&self, mut lines: mpsc::Receiver<String>) {
        prompt();
        while let Some(line) = lines.recv().await {
            match self.execute(&line).await {
                ConsoleResponse::Quit => return,
                ConsoleResponse::Output(text) => println!("{}", text),
                ConsoleResponse::Silent => {}
            }
            prompt();
        }
        debug!("[CONSOLE] End of input");
    }
}

fn usage(field: Field, min: i32, max: i32) -> String {
    format!(
        "Usage: {} [value]\n       where 'value' must be an integer between {} and {}.",
        field, min, max
    )
}

fn prompt() {
    print!("{}", PROMPT);
    let _ = std::io::stdout().flush();
}

/// Read stdin on a dedicated thread so a pending read never holds up
/// runtime shutdown.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
