use serenity::all::CommandOptionType;
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};
use tracing::info;

use super::{Card, Invocation, Reply, SlashCommand, IMAGE_FILENAME};
use crate::ai::Service;
use crate::backend::Backend;

const ORANGE: u32 = 0xE67E22;
const MIN_WORDS: usize = 2;

pub struct Imagine;

#[async_trait]
impl SlashCommand for Imagine {
    fn name(&self) -> &'static str {
        "imagine"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("imagine")
            .description("Generates an image from a prompt using AI.")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "prompt",
                    "A description of the image you want to create (at least 2 words).",
                )
                .required(true),
            )
    }

    fn precheck(&self, invocation: &Invocation) -> Option<Reply> {
        let words = invocation.string("prompt").map_or(0, |p| p.split_whitespace().count());
        (words < MIN_WORDS).then(|| {
            Reply::Private("Your prompt needs to be at least two words long.".to_string())
        })
    }

    async fn execute(&self, invocation: &Invocation, backend: &dyn Backend) -> Reply {
        if let Some(rejection) = self.precheck(invocation) {
            return rejection;
        }
        let prompt = invocation.string("prompt").unwrap_or_default();
        info!("Generating image for {}", invocation.invoker.id);

        match backend.generate_image(prompt).await {
            Ok(bytes) => Reply::Image {
                card: Card::new("Image Generated!", ORANGE)
                    .image(format!("attachment://{IMAGE_FILENAME}"))
                    .footer(format!("Prompt: {prompt}")),
                bytes,
            },
            Err(e) => Reply::text(e.user_message(Service::Image)),
        }
    }
}
