use rand::Rng;
use serenity::all::CommandOptionType;
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};

use super::{ask, capitalize, pick, Card, Invocation, Reply, SlashCommand};
use crate::backend::Backend;

const PURPLE: u32 = 0x9B59B6;

pub const STYLES: [&str; 5] = [
    "in a mysterious tone",
    "in a joyful style",
    "from a thoughtful point of view",
    "with a humorous twist",
    "in a dramatic narrative style",
];

#[derive(Debug)]
pub struct PoemDraft {
    pub prompt: String,
    pub title: String,
    pub style: &'static str,
}

impl PoemDraft {
    pub fn new<R: Rng>(topic: Option<&str>, rng: &mut R) -> Self {
        let style = pick(rng, &STYLES);
        match topic {
            Some(topic) => Self {
                prompt: format!(
                    "Write a completely new and creative four-line poem about '{topic}' {style}. \
                     Take a unique perspective on it."
                ),
                title: format!("A Poem About: {}", capitalize(topic)),
                style,
            },
            None => Self {
                prompt: format!(
                    "Write a completely new and creative four-line poem about a random, \
                     interesting topic. The poem should be {style}."
                ),
                title: "A Random Poem".to_string(),
                style,
            },
        }
    }

    /// "in a joyful style" reads as "Joyful" in the footer.
    pub fn style_label(&self) -> String {
        capitalize(&self.style.replace("in a ", "").replace(" style", ""))
    }
}

pub struct Poem;

#[async_trait]
impl SlashCommand for Poem {
    fn name(&self) -> &'static str {
        "poem"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("poem")
            .description("Creates a unique, short poem about a given topic (or a random one).")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "topic",
                    "The topic for the poem (optional).",
                )
                .required(false),
            )
    }

    async fn execute(&self, invocation: &Invocation, backend: &dyn Backend) -> Reply {
        let draft = PoemDraft::new(invocation.string("topic"), &mut rand::rng());
        let poem = ask(backend, &draft.prompt).await;

        Reply::Card(
            Card::new(&draft.title, PURPLE)
                .description(poem)
                .footer(format!("Style: {}", draft.style_label())),
        )
    }
}
