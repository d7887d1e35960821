use rand::Rng;
use serenity::all::CommandOptionType;
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};

use super::{ask, pick, Invocation, Reply, SlashCommand};
use crate::backend::Backend;

pub const TONES: [&str; 5] = [
    "like a hype drill sergeant",
    "like a wise and calm mentor",
    "with a touch of sarcastic humor",
    "in a very enthusiastic way",
    "like a philosopher offering deep wisdom",
];

pub fn prompt<R: Rng>(topic: Option<&str>, rng: &mut R) -> String {
    let tone = pick(rng, &TONES);
    match topic {
        Some(topic) => format!(
            "Give me a short, powerful, and hype motivational message for someone who needs to \
             start '{topic}'. Phrase it {tone}."
        ),
        None => format!(
            "Give me a short, powerful, and general motivational message. Phrase it {tone}."
        ),
    }
}

pub struct Motivate;

#[async_trait]
impl SlashCommand for Motivate {
    fn name(&self) -> &'static str {
        "motivate"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("motivate")
            .description("Gives you a fresh motivational push on a specific topic (or in general).")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "topic",
                    "What you need motivation for (optional, e.g., 'studying').",
                )
                .required(false),
            )
    }

    async fn execute(&self, invocation: &Invocation, backend: &dyn Backend) -> Reply {
        let prompt = prompt(invocation.string("topic"), &mut rand::rng());
        let motivation = ask(backend, &prompt).await;
        Reply::text(format!("Hey {}! {}", invocation.invoker.mention(), motivation))
    }
}
