use serenity::async_trait;
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
};
use serenity::client::{Context, EventHandler};
use serenity::model::application::{Command, CommandInteraction, Interaction};
use serenity::model::gateway::Ready;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::backend::{Backend, HttpBackend};
use crate::commands::{Invocation, Registry, SlashCommand};
use crate::config::Config;

pub struct Handler {
    pub config: Config,
    pub registry: Registry,
    pub backend: Arc<dyn Backend>,
}

impl Handler {
    pub fn new(config: Config) -> Self {
        info!("Creating new Handler instance");
        let backend = Arc::new(HttpBackend::new(&config));
        Self {
            config,
            registry: Registry::new(),
            backend,
        }
    }

    /// Runs one command through the acknowledge/answer protocol.
    async fn dispatch(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        handler: &dyn SlashCommand,
    ) -> Result<(), serenity::Error> {
        let invocation = Invocation::from_interaction(command);

        if let Some(rejection) = handler.precheck(&invocation) {
            debug!("/{} rejected input from {}", handler.name(), command.user.id);
            let response = CreateInteractionResponse::Message(rejection.into_message());
            return command.create_response(&ctx.http, response).await;
        }

        if !handler.defers() {
            let reply = handler.execute(&invocation, self.backend.as_ref()).await;
            let response = CreateInteractionResponse::Message(reply.into_message());
            return command.create_response(&ctx.http, response).await;
        }

        // the platform drops interactions not acknowledged within a few seconds
        command.defer(&ctx.http).await?;
        let reply = handler.execute(&invocation, self.backend.as_ref()).await;
        command.create_followup(&ctx.http, reply.into_followup()).await?;

        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        info!("Bot ID: {}", ready.user.id);
        info!("Owner ID: {}", self.config.owner_id);
        info!("Connected to {} guilds", ready.guilds.len());

        let names: Vec<_> = self.registry.names().collect();
        info!("Registering commands: {}", names.join(", "));
        match Command::set_global_commands(&ctx.http, self.registry.definitions()).await {
            Ok(commands) => info!("Synced {} command(s)", commands.len()),
            Err(e) => error!("Failed to sync commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        info!("Received command /{} from {}", command.data.name, command.user.id);

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("Unknown command: {}", command.data.name);
            return;
        };

        if let Err(e) = self.dispatch(&ctx, &command, handler).await {
            error!("Error handling command {}: {}", command.data.name, e);
            let notice = "An error occurred while processing the command.";
            let response = CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(notice)
                    .ephemeral(true),
            );
            if command.create_response(&ctx.http, response).await.is_err() {
                let followup = CreateInteractionResponseFollowup::new()
                    .content(notice)
                    .ephemeral(true);
                if let Err(e) = command.create_followup(&ctx.http, followup).await {
                    error!("Failed to send error notice for {}: {}", command.data.name, e);
                }
            }
        }
    }
}
