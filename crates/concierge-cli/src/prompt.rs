use anyhow::Result;
use concierge::session::AssistantReply;

pub mod cliclack;

pub trait Prompt {
    fn render_reply(&mut self, reply: &AssistantReply);
    /// A short status line, e.g. after an interrupted or failed turn
    fn render_notice(&mut self, notice: Notice);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    /// Called as the answer streams in
    fn update_busy(&mut self, streamed_chars: usize);
    fn hide_busy(&mut self);
    fn close(&self);
    fn concierge_ready(&self) {
        println!("\n");
        println!("Ask about our services. Type /reset to start over or exit to leave.");
        println!("\n");
    }
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Only set for messages
}

#[derive(Debug, PartialEq, Eq)]
pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a message
    Reset,    // Start a new conversation
    Help,
    Exit, // User wants to exit the session
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Interrupted,
    Reset,
    /// Failed or timed out; the visitor may simply try again
    RetryLater,
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Notice::Interrupted => "Interrupted.",
            Notice::Reset => "Started a new conversation.",
            Notice::RetryLater => {
                "Sorry, I couldn't get an answer just now. Please try sending your message again."
            }
        }
    }
}

pub enum Theme {
    Light,
    Dark,
}

/// Classify one line of user input
pub fn parse_input(line: &str) -> Input {
    let text = line.trim();
    let input_type = if text.is_empty() {
        InputType::AskAgain
    } else if ["exit", "/exit", "quit", "/quit"]
        .iter()
        .any(|c| text.eq_ignore_ascii_case(c))
    {
        InputType::Exit
    } else if text.eq_ignore_ascii_case("/reset") {
        InputType::Reset
    } else if text == "/?" {
        InputType::Help
    } else {
        InputType::Message
    };

    let content = (input_type == InputType::Message).then(|| text.to_string());
    Input {
        input_type,
        content,
    }
}
