use rand::Rng;
use serenity::async_trait;
use serenity::builder::CreateCommand;

use super::{ask, pick, Invocation, Reply, SlashCommand};
use crate::backend::Backend;

pub const CATEGORIES: [&str; 6] = [
    "absurd",
    "philosophical",
    "funny",
    "impossible",
    "food-related",
    "superpower-related",
];

pub const BOOSTERS: [&str; 3] = [
    "Make it completely original.",
    "Think of a scenario no one has thought of before.",
    "Create a genuinely difficult dilemma.",
];

pub fn prompt<R: Rng>(rng: &mut R) -> String {
    let category = pick(rng, &CATEGORIES);
    let booster = pick(rng, &BOOSTERS);
    format!(
        "Generate one single, interesting, and difficult 'Would you rather...?' question. \
         The category is '{category}'. {booster} Just the question itself, no extra text."
    )
}

pub struct WouldYouRather;

#[async_trait]
impl SlashCommand for WouldYouRather {
    fn name(&self) -> &'static str {
        "wouldyourather"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("wouldyourather").description("Presents you with a difficult choice.")
    }

    async fn execute(&self, _invocation: &Invocation, backend: &dyn Backend) -> Reply {
        let prompt = prompt(&mut rand::rng());
        Reply::text(ask(backend, &prompt).await)
    }
}
