use anyhow::Result;
use concierge::session::{ChatSession, TurnOutcome};
use concierge::stream::StreamObserver;

use crate::prompt::{InputType, Notice, Prompt};

/// Feeds streaming progress to the spinner
struct BusyObserver<'p> {
    prompt: &'p mut dyn Prompt,
}

impl StreamObserver for BusyObserver<'_> {
    fn on_update(&mut self, buffer: &str) {
        self.prompt.update_busy(buffer.chars().count());
    }

    fn on_finalize(&mut self, _buffer: &str) {}
}

pub struct Session<'a> {
    chat: ChatSession,
    prompt: Box<dyn Prompt + 'a>,
}

impl<'a> Session<'a> {
    pub fn new(chat: ChatSession, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session { chat, prompt }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.prompt.concierge_ready();

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Exit => break,
                InputType::Reset => {
                    self.chat.reset();
                    self.prompt.render_notice(Notice::Reset);
                }
                InputType::Message => {
                    if let Some(content) = input.content {
                        self.turn(&content).await;
                    }
                }
                InputType::AskAgain | InputType::Help => continue,
            }
        }

        self.prompt.close();
        Ok(())
    }

    async fn turn(&mut self, text: &str) {
        let interrupter = self.chat.interrupter();
        self.prompt.show_busy();

        let outcome = {
            let mut observer = BusyObserver {
                prompt: self.prompt.as_mut(),
            };
            let send = self.chat.send(text, &mut observer);
            tokio::pin!(send);

            tokio::select! {
                outcome = &mut send => outcome,
                _ = tokio::signal::ctrl_c() => {
                    interrupter.interrupt();
                    send.await
                }
            }
        };

        self.prompt.hide_busy();
        match outcome {
            TurnOutcome::Reply(reply) => self.prompt.render_reply(&reply),
            TurnOutcome::Cancelled => self.prompt.render_notice(Notice::Interrupted),
            TurnOutcome::TimedOut | TurnOutcome::Failed => {
                self.prompt.render_notice(Notice::RetryLater)
            }
        }
    }
}
