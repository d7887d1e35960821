use serenity::async_trait;
use serenity::builder::CreateCommand;

use super::{Card, Invocation, Reply, SlashCommand};
use crate::ai::Service;
use crate::backend::Backend;

const TEAL: u32 = 0x1ABC9C;

pub struct Inspire;

#[async_trait]
impl SlashCommand for Inspire {
    fn name(&self) -> &'static str {
        "inspire"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("inspire").description("Fetches an AI-generated inspirational quote.")
    }

    async fn execute(&self, _invocation: &Invocation, backend: &dyn Backend) -> Reply {
        match backend.inspiration().await {
            Ok(image_url) => Reply::Card(
                Card::new("A Spark of Inspiration", TEAL)
                    .image(image_url)
                    .footer("Generated by inspirobot.me"),
            ),
            Err(e) => Reply::text(e.user_message(Service::Inspiration)),
        }
    }
}
