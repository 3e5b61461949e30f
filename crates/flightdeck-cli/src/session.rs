use anyhow::Result;
use cliclack::{input, spinner};
use console::style;
use tracing::error;

use flightdeck::agent::Agent;
use flightdeck::models::message::Message;

/// Shown in place of an answer when a turn fails fatally; the session
/// itself stays alive.
const FAILURE_MESSAGE: &str =
    "Sorry, an error occurred while processing your request. Please try again.";

/// Owns the conversation transcript and drives the agent one user
/// turn at a time.
pub struct Session {
    agent: Agent,
    messages: Vec<Message>,
}

impl Session {
    pub fn new(agent: Agent) -> Self {
        Session {
            agent,
            messages: Vec::new(),
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        println!(
            "{} {}",
            style("Flight assistant").bold(),
            style("- type \"exit\" to end the session").dim()
        );
        println!(
            "{}",
            style("Try: \"Flights from JFK to LAX today\", \"Status of flight AA100\", \"Delta flights from Atlanta to Chicago\"")
                .dim()
        );
        println!();

        loop {
            let text: String = input("Message:")
                .placeholder("Ask about flights")
                .interact()?;

            if text.trim().eq_ignore_ascii_case("exit") {
                break;
            }

            self.messages.push(Message::user().with_text(&text));

            let spin = spinner();
            spin.start("Searching flights...");
            let reply = match self.agent.reply(&self.messages).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, "turn failed");
                    FAILURE_MESSAGE.to_string()
                }
            };
            spin.stop("");

            // The transcript keeps only user text and final answers;
            // tool traffic lives and dies inside the turn
            self.messages.push(Message::assistant().with_text(&reply));
            println!("{}\n", reply);
        }

        Ok(())
    }
}
