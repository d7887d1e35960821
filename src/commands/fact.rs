use rand::Rng;
use serenity::all::CommandOptionType;
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};

use super::{ask, capitalize, pick, Card, Invocation, Reply, SlashCommand};
use crate::backend::Backend;

const BLUE: u32 = 0x3498DB;

pub const ANGLES: [&str; 6] = [
    "from a historical perspective",
    "related to science",
    "that is a common misconception",
    "that is bizarre",
    "focusing on a statistic",
    "related to its origin",
];

pub const BOOSTERS: [&str; 4] = [
    "Avoid common knowledge.",
    "Find a detail that would surprise an expert.",
    "Give me a fact that sounds fake but is true.",
    "Tell me the most unexpected fact you can find.",
];

pub fn draft<R: Rng>(topic: Option<&str>, rng: &mut R) -> (String, String) {
    let angle = pick(rng, &ANGLES);
    let booster = pick(rng, &BOOSTERS);
    match topic {
        Some(topic) => (
            format!(
                "Tell me one single, surprising fun fact about '{topic}' {angle}. {booster} \
                 Keep it concise and start directly with the fact."
            ),
            format!("Fact About: {}", capitalize(topic)),
        ),
        None => (
            format!(
                "Tell me one single, surprising, and obscure fun fact about a completely random \
                 topic. {booster} Start the response with 'Did you know...' and then the fact."
            ),
            "A Random Fact".to_string(),
        ),
    }
}

pub struct Fact;

#[async_trait]
impl SlashCommand for Fact {
    fn name(&self) -> &'static str {
        "fact"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("fact")
            .description("Get a surprising fact about a specific or random topic.")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "topic",
                    "The topic you want a fact about (optional).",
                )
                .required(false),
            )
    }

    async fn execute(&self, invocation: &Invocation, backend: &dyn Backend) -> Reply {
        let (prompt, title) = draft(invocation.string("topic"), &mut rand::rng());
        let fact = ask(backend, &prompt).await;
        Reply::Card(Card::new(title, BLUE).description(fact))
    }
}
