/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`: Interactive chat session
- `ask`: Send one message and print the reply
- `show_config`: Print the effective configuration

The handlers are thin: they build a transport and a controller from the
configuration and drive them.
*/

use crate::config::Config;
use crate::conversation::{ChatController, SendOutcome};
use crate::error::{BenderError, Result};
use crate::render::{self, TerminalRenderer};
use crate::transport::HttpTransport;
use std::sync::Arc;

// Special commands parser for interactive chat
pub mod special_commands;

/// Build a controller talking to the configured endpoint
fn build_controller(config: &Config) -> Result<(ChatController, String)> {
    let transport = HttpTransport::from_config(&config.server)?;
    let endpoint = transport.endpoint().to_string();
    tracing::debug!("Using assistant endpoint {}", endpoint);
    let controller = ChatController::new(Arc::new(transport), config.chat.clone());
    Ok((controller, endpoint))
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Line editing runs on a dedicated thread so the session keeps reading
    //! input while a reply is pending. The thread only prompts when the
    //! session asks for a line, so the terminal is never left in raw mode
    //! when the session ends.

    use super::*;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::{DefaultEditor, ExternalPrinter};
    use std::sync::mpsc as std_mpsc;
    use tokio::sync::mpsc;

    const PROMPT: &str = "Tú> ";

    /// Input delivered by the line reader thread
    #[derive(Debug)]
    enum InputEvent {
        Line(String),
        Closed(&'static str),
    }

    /// Run rustyline on its own thread
    ///
    /// Each prompt sent on the returned sender produces exactly one event.
    fn spawn_line_reader(
        mut rl: DefaultEditor,
    ) -> (std_mpsc::Sender<String>, mpsc::UnboundedReceiver<InputEvent>) {
        let (prompt_tx, prompt_rx) = std_mpsc::channel::<String>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            for prompt in prompt_rx {
                let event = match rl.readline(&prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            if let Err(e) = rl.add_history_entry(line.as_str()) {
                                tracing::debug!("Failed to record history: {}", e);
                            }
                        }
                        InputEvent::Line(line)
                    }
                    Err(ReadlineError::Interrupted) => InputEvent::Closed("CTRL-C"),
                    Err(ReadlineError::Eof) => InputEvent::Closed("CTRL-D"),
                    Err(err) => {
                        tracing::error!("Readline error: {:?}", err);
                        InputEvent::Closed("input error")
                    }
                };
                let closed = matches!(event, InputEvent::Closed(_));
                if event_tx.send(event).is_err() || closed {
                    break;
                }
            }
        });

        (prompt_tx, event_rx)
    }

    /// Print `text` above the prompt if one is active, or directly otherwise
    fn emit<P: ExternalPrinter>(printer: &mut Option<P>, prompting: bool, text: String) {
        if text.is_empty() {
            return;
        }
        match printer {
            Some(printer) if prompting => {
                if let Err(e) = printer.print(text.clone()) {
                    tracing::debug!("External printer failed: {}", e);
                    print!("{}", text);
                }
            }
            _ => print!("{}", text),
        }
    }

    fn status_report(controller: &ChatController, endpoint: &str) -> String {
        let messages = controller.messages();
        let sent = messages.iter().filter(|m| m.is_user()).count();
        format!(
            "\nEndpoint: {}\nMessages: {} ({} sent)\nAssistant: {}\n\n",
            endpoint,
            messages.len(),
            sent,
            if controller.is_typing() { "typing" } else { "idle" }
        )
    }

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is invalid or the terminal cannot be
    /// set up. Failed requests are shown in the conversation instead.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let (controller, endpoint) = build_controller(&config)?;
        let mut renderer = TerminalRenderer::new(&config.chat);

        let mut rl = DefaultEditor::new().map_err(|e| BenderError::Terminal(e.to_string()))?;
        let mut printer = match rl.create_external_printer() {
            Ok(printer) => Some(printer),
            Err(e) => {
                tracing::debug!("No external printer available: {}", e);
                None
            }
        };

        print!("{}", render::banner(&config.chat, &endpoint));
        print!("{}", renderer.render(&controller.view_model()));

        let (prompt_tx, mut events) = spawn_line_reader(rl);
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<SendOutcome>();

        let mut prompting = prompt_tx.send(PROMPT.to_string()).is_ok();

        while prompting {
            tokio::select! {
                Some(outcome) = done_rx.recv() => {
                    tracing::debug!(?outcome, "Reply finished");
                    emit(&mut printer, prompting, renderer.render(&controller.view_model()));
                }
                event = events.recv() => {
                    prompting = false;
                    let line = match event {
                        Some(InputEvent::Line(line)) => line,
                        Some(InputEvent::Closed(reason)) => {
                            println!("{}", reason);
                            break;
                        }
                        None => break,
                    };

                    match parse_special_command(&line) {
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::Clear) => {
                            controller.clear();
                            print!("{}", renderer.render(&controller.view_model()));
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print!("{}", status_report(&controller, &endpoint))
                        }
                        Ok(SpecialCommand::Help) => print_help(),
                        Ok(SpecialCommand::None) if line.trim().is_empty() => {}
                        Ok(SpecialCommand::None) => {
                            if let Some(pending) = controller.submit(&line) {
                                print!("{}", renderer.render(&controller.view_model()));
                                let controller = controller.clone();
                                let done_tx = done_tx.clone();
                                tokio::spawn(async move {
                                    let outcome = controller.resolve(pending).await;
                                    // The session may already be gone.
                                    let _ = done_tx.send(outcome);
                                });
                            } else {
                                println!(
                                    "{}",
                                    "Bender is still answering; wait for the reply or use /clear."
                                        .yellow()
                                );
                            }
                        }
                        Err(e) => println!("{}", e.to_string().red()),
                    }

                    prompting = prompt_tx.send(PROMPT.to_string()).is_ok();
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

}

// One-shot command handler
pub mod ask {
    //! Send a single message and print the outcome.

    use super::*;

    /// Send `message` and print the assistant's reply
    ///
    /// With `json`, prints the whole conversation view instead. A failed
    /// request still prints the error notice, like the interactive session.
    ///
    /// # Errors
    ///
    /// Returns error if the message is blank or the endpoint is invalid
    pub async fn run_ask(config: Config, message: &str, json: bool) -> Result<()> {
        let (controller, _) = build_controller(&config)?;

        let outcome = controller.send(message).await;
        if outcome == SendOutcome::Rejected {
            return Err(BenderError::InvalidInput("message cannot be empty".to_string()).into());
        }
        tracing::debug!(?outcome, "One-shot send finished");

        let view = controller.view_model();
        if json {
            let json = serde_json::to_string_pretty(&view).map_err(BenderError::from)?;
            println!("{}", json);
        } else if let Some(row) = view.last() {
            println!("{}", row.content);
        }

        Ok(())
    }
}

/// Print the effective configuration as YAML
///
/// # Errors
///
/// Returns error if serialization fails
pub fn show_config(config: &Config) -> Result<()> {
    print!("{}", render_config(config)?);
    Ok(())
}

/// Effective configuration as a YAML document
pub fn render_config(config: &Config) -> Result<String> {
    Ok(serde_yaml::to_string(config).map_err(BenderError::from)?)
}
