use serenity::all::CommandOptionType;
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};
use tracing::info;

use super::{ask, Invocation, Reply, SlashCommand, UserRef};
use crate::backend::Backend;

pub struct Roast;

pub fn prompt(target: Option<&UserRef>) -> String {
    match target {
        Some(user) => format!(
            "Tell me a new, creative, and funny roast about a Discord user named {}. \
             It should be sarcastic and witty, but not genuinely mean or offensive. Keep it short.",
            user.display_name
        ),
        None => "Tell me a short, witty, and savage roast that is general purpose and could apply \
                 to anyone. Make it funny."
            .to_string(),
    }
}

#[async_trait]
impl SlashCommand for Roast {
    fn name(&self) -> &'static str {
        "roast"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("roast")
            .description("Roasts a specific member or just tells a general roast.")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    "member",
                    "The member you want to roast (optional).",
                )
                .required(false),
            )
    }

    async fn execute(&self, invocation: &Invocation, backend: &dyn Backend) -> Reply {
        let target = invocation.user.as_ref();
        if let Some(user) = target {
            info!("Roasting {} for {}", user.id, invocation.invoker.id);
        }

        let roast = ask(backend, &prompt(target)).await;
        match target {
            Some(user) => Reply::text(format!("{} {}", user.mention(), roast)),
            None => Reply::text(roast),
        }
    }
}
