//! Terminal renderer for conversation snapshots
//!
//! The renderer is incremental: it remembers how many rows it already
//! printed and only emits what is new. A changed welcome message id means
//! the conversation was cleared, so the transcript starts over.

use colored::Colorize;

use crate::config::ChatConfig;
use crate::conversation::Role;
use crate::view::{MessageRow, ViewModel};

const USER_LABEL: &str = "Tú";

/// Turns successive [`ViewModel`]s into terminal output
#[derive(Debug)]
pub struct TerminalRenderer {
    assistant_name: String,
    placeholder: String,
    welcome_id: Option<String>,
    printed: usize,
    typing_shown: bool,
}

impl TerminalRenderer {
    /// Create a renderer using the configured labels
    pub fn new(chat: &ChatConfig) -> Self {
        Self {
            assistant_name: chat.assistant_name.clone(),
            placeholder: chat.placeholder.clone(),
            welcome_id: None,
            printed: 0,
            typing_shown: false,
        }
    }

    /// Render everything that changed since the previous call
    ///
    /// Returns the text to print; empty when nothing changed.
    pub fn render(&mut self, view: &ViewModel) -> String {
        let mut out = String::new();

        let welcome_id = view.rows.first().map(|row| row.id.clone());
        if welcome_id != self.welcome_id {
            self.welcome_id = welcome_id;
            self.printed = 0;
            self.typing_shown = false;
            out.push_str(&self.header(view));
        }

        for row in view.rows.iter().skip(self.printed) {
            out.push_str(&self.row(row));
        }
        self.printed = view.rows.len();

        if view.typing && !self.typing_shown {
            out.push_str(&format!(
                "{}\n",
                format!("{} escribiendo...", self.assistant_name).dimmed()
            ));
        }
        self.typing_shown = view.typing;

        out
    }

    fn header(&mut self, view: &ViewModel) -> String {
        let mut out = String::new();
        if let Some(welcome) = view.rows.first() {
            out.push_str(&self.row(welcome));
            self.printed = 1;
        }
        if view.is_empty {
            out.push_str(&format!(
                "\n{}\n{}\n\n",
                "¿En qué puedo ayudarte?".bold(),
                self.placeholder.dimmed()
            ));
        }
        out
    }

    fn row(&self, row: &MessageRow) -> String {
        let label = match row.role {
            Role::User => USER_LABEL.green().bold(),
            Role::Assistant => self.assistant_name.cyan().bold(),
        };
        let mut lines = row.content.lines();
        let first = lines.next().unwrap_or_default();
        let mut out = format!(
            "{} {}: {}\n",
            format!("[{}]", row.timestamp_display).dimmed(),
            label,
            first
        );
        for line in lines {
            out.push_str(&format!("        {}\n", line));
        }
        out
    }
}

/// Welcome banner for interactive sessions
pub fn banner(chat: &ChatConfig, endpoint: &str) -> String {
    format!(
        "\n{}\n{}\n\nType '/help' for available commands, 'exit' to quit\n\n",
        format!("Bender - {}", chat.assistant_name).bold(),
        format!("Endpoint: {}", endpoint).dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::MessageFactory;
    use crate::view::project;

    fn renderer() -> TerminalRenderer {
        colored::control::set_override(false);
        TerminalRenderer::new(&ChatConfig::default())
    }

    #[test]
    fn test_first_render_shows_welcome_and_placeholder() {
        let mut renderer = renderer();
        let mut factory = MessageFactory::new();
        let messages = vec![factory.assistant("Bienvenido")];

        let out = renderer.render(&project(&messages, false));

        assert!(out.contains("Asistente IA: Bienvenido"));
        assert!(out.contains("¿En qué puedo ayudarte?"));
    }

    #[test]
    fn test_only_new_rows_are_rendered() {
        let mut renderer = renderer();
        let mut factory = MessageFactory::new();
        let mut messages = vec![factory.assistant("Bienvenido")];
        renderer.render(&project(&messages, false));

        messages.push(factory.user("Hola"));
        let out = renderer.render(&project(&messages, true));
        assert!(out.contains("Tú: Hola"));
        assert!(out.contains("Asistente IA escribiendo..."));
        assert!(!out.contains("Bienvenido"));

        assert_eq!(renderer.render(&project(&messages, true)), "");

        messages.push(factory.assistant("Respuesta"));
        let out = renderer.render(&project(&messages, false));
        assert!(out.contains("Asistente IA: Respuesta"));
        assert!(!out.contains("escribiendo"));
    }

    #[test]
    fn test_new_welcome_id_restarts_transcript() {
        let mut renderer = renderer();
        let mut factory = MessageFactory::new();
        let messages = vec![factory.assistant("Bienvenido"), factory.user("Hola")];
        renderer.render(&project(&messages, false));

        let cleared = vec![factory.assistant("Bienvenido")];
        let out = renderer.render(&project(&cleared, false));
        assert!(out.contains("Bienvenido"));
        assert!(out.contains("¿En qué puedo ayudarte?"));
    }

    #[test]
    fn test_multiline_content_is_indented() {
        let mut renderer = renderer();
        let mut factory = MessageFactory::new();
        let messages = vec![factory.assistant("uno\ndos")];
        let out = renderer.render(&project(&messages, false));
        assert!(out.contains(": uno\n        dos\n"));
    }
}
