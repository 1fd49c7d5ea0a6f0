use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use concierge::models::service::ExtractedService;
use concierge::session::AssistantReply;
use console::style;

use super::{parse_input, Input, InputType, Notice, Prompt, Theme};

pub struct CliclackPrompt {
    spinner: Option<cliclack::ProgressBar>,
    theme: Theme,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt {
            spinner: None,
            theme: Theme::Dark,
        }
    }

    fn bat_theme(&self) -> &'static str {
        match self.theme {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        }
    }
}

impl Default for CliclackPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn print(content: &str, theme: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();

    if let Err(e) = printed {
        tracing::debug!("Falling back to plain output: {}", e);
        println!("{}", content);
    }
}

fn print_service_card(service: &ExtractedService) {
    println!("  {}", style("┌─").dim());
    println!("  {} {}", style("│").dim(), style(&service.title).cyan().bold());
    println!("  {} {}", style("│").dim(), service.description);
    println!("  {}", style("└─").dim());
}

impl Prompt for CliclackPrompt {
    fn render_reply(&mut self, reply: &AssistantReply) {
        let text = reply.display_text();
        if !text.trim().is_empty() {
            print(text, self.bat_theme());
        }

        if !reply.services.is_empty() {
            println!();
            for service in &reply.services {
                print_service_card(service);
            }
        }

        if !reply.complete {
            println!("{}", style("(the answer may have been cut short)").dim());
        }

        println!();
        let _ = io::stdout().flush();
    }

    fn render_notice(&mut self, notice: Notice) {
        match notice {
            Notice::RetryLater => println!("{}", style(notice.text()).yellow()),
            _ => println!("{}", style(notice.text()).dim()),
        }
        println!();
    }

    fn show_busy(&mut self) {
        let spin = spinner();
        spin.start("awaiting reply");
        self.spinner = Some(spin);
    }

    fn update_busy(&mut self, streamed_chars: usize) {
        if let Some(spin) = &self.spinner {
            spin.set_message(format!("receiving reply ({} chars)", streamed_chars));
        }
    }

    fn hide_busy(&mut self) {
        if let Some(spin) = self.spinner.take() {
            spin.stop("");
        }
    }

    fn get_input(&mut self) -> Result<Input> {
        let message_text: String = match input("Message:").placeholder("").interact() {
            Ok(text) => text,
            // Ctrl-C or Ctrl-D at the prompt
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                return Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let parsed = parse_input(&message_text);
        match parsed.input_type {
            InputType::Help => {
                println!("Commands:");
                println!("exit - Leave the chat");
                println!("/reset - Start a new conversation");
                println!("/t - Toggle Light/Dark theme");
                println!("/? - Display this help message");
                println!("Ctrl+C - Interrupt the answer being streamed");
                self.get_input()
            }
            InputType::Message if message_text.trim() == "/t" => {
                self.theme = match self.theme {
                    Theme::Light => {
                        println!("Switching to Dark theme");
                        Theme::Dark
                    }
                    Theme::Dark => {
                        println!("Switching to Light theme");
                        Theme::Light
                    }
                };
                self.get_input()
            }
            _ => Ok(parsed),
        }
    }

    fn close(&self) {
        // No cleanup required
    }
}
