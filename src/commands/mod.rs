mod cointoss;
mod fact;
mod imagine;
mod inspire;
mod motivate;
mod poem;
mod roast;
mod search;
mod wouldyourather;

use rand::Rng;
use serenity::all::{ResolvedValue, UserId};
use serenity::async_trait;
use serenity::builder::{
    CreateAttachment, CreateCommand, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
};
use serenity::model::application::CommandInteraction;
use std::collections::HashMap;
use tracing::debug;

use crate::ai::Service;
use crate::backend::Backend;

pub use cointoss::CoinToss;
pub use fact::Fact;
pub use imagine::Imagine;
pub use inspire::Inspire;
pub use motivate::Motivate;
pub use poem::Poem;
pub use roast::Roast;
pub use search::Search;
pub use wouldyourather::WouldYouRather;

pub const MESSAGE_LIMIT: usize = 2000;
pub const DESCRIPTION_LIMIT: usize = 4096;
pub const TITLE_LIMIT: usize = 256;
pub const FOOTER_LIMIT: usize = 2048;

pub const IMAGE_FILENAME: &str = "image.png";

/// A slash command the bot registers and answers.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    fn name(&self) -> &'static str;

    fn register(&self) -> CreateCommand;

    /// Commands that go to the network must defer before their call starts.
    fn defers(&self) -> bool {
        true
    }

    /// Local validation; a `Some` reply is sent immediately and nothing else runs.
    fn precheck(&self, _invocation: &Invocation) -> Option<Reply> {
        None
    }

    async fn execute(&self, invocation: &Invocation, backend: &dyn Backend) -> Reply;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub display_name: String,
}

impl UserRef {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// The parts of an interaction a command needs.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub invoker: UserRef,
    pub user: Option<UserRef>,
    strings: HashMap<String, String>,
}

impl Invocation {
    pub fn new(invoker: UserRef) -> Self {
        Self {
            invoker,
            user: None,
            strings: HashMap::new(),
        }
    }

    pub fn with_string(mut self, name: &str, value: &str) -> Self {
        self.strings.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_user(mut self, user: UserRef) -> Self {
        self.user = Some(user);
        self
    }

    /// A string option, with blank values treated as absent.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.strings
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn from_interaction(command: &CommandInteraction) -> Self {
        let display_name = command
            .member
            .as_ref()
            .map(|member| member.display_name().to_string())
            .unwrap_or_else(|| command.user.display_name().to_string());
        let mut invocation = Invocation::new(UserRef {
            id: command.user.id,
            display_name,
        });

        for option in command.data.options() {
            match option.value {
                ResolvedValue::String(value) => {
                    invocation = invocation.with_string(option.name, value);
                }
                ResolvedValue::User(user, member) => {
                    let display_name = member
                        .and_then(|m| m.nick.clone())
                        .unwrap_or_else(|| user.display_name().to_string());
                    invocation = invocation.with_user(UserRef {
                        id: user.id,
                        display_name,
                    });
                }
                _ => debug!("Ignoring option {} on /{}", option.name, command.data.name),
            }
        }

        invocation
    }
}

/// Rich card contents, turned into a serenity embed at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub color: u32,
    pub image_url: Option<String>,
    pub footer: Option<String>,
}

impl Card {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: clip(&title.into(), TITLE_LIMIT),
            description: None,
            color,
            image_url: None,
            footer: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(clip(&description.into(), DESCRIPTION_LIMIT));
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(clip(&footer.into(), FOOTER_LIMIT));
        self
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new().title(&self.title).color(self.color);
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        if let Some(url) = &self.image_url {
            embed = embed.image(url);
        }
        if let Some(footer) = &self.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer));
        }
        embed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Card(Card),
    /// Card shown with `bytes` attached as `image.png`.
    Image { card: Card, bytes: Vec<u8> },
    /// Only visible to the invoking user.
    Private(String),
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text(clip(&content.into(), MESSAGE_LIMIT))
    }

    pub fn into_message(self) -> CreateInteractionResponseMessage {
        let message = CreateInteractionResponseMessage::new();
        match self {
            Reply::Text(content) => message.content(content),
            Reply::Card(card) => message.embed(card.to_embed()),
            Reply::Image { card, bytes } => message
                .embed(card.to_embed())
                .add_file(CreateAttachment::bytes(bytes, IMAGE_FILENAME)),
            Reply::Private(content) => message.content(content).ephemeral(true),
        }
    }

    pub fn into_followup(self) -> CreateInteractionResponseFollowup {
        let followup = CreateInteractionResponseFollowup::new();
        match self {
            Reply::Text(content) => followup.content(content),
            Reply::Card(card) => followup.embed(card.to_embed()),
            Reply::Image { card, bytes } => followup
                .embed(card.to_embed())
                .add_file(CreateAttachment::bytes(bytes, IMAGE_FILENAME)),
            Reply::Private(content) => followup.content(content).ephemeral(true),
        }
    }
}

/// Static list of every command the bot serves.
pub struct Registry {
    commands: Vec<Box<dyn SlashCommand>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            commands: vec![
                Box::new(Roast),
                Box::new(Poem),
                Box::new(Motivate),
                Box::new(Inspire),
                Box::new(CoinToss),
                Box::new(WouldYouRather),
                Box::new(Fact),
                Box::new(Imagine),
                Box::new(Search),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn SlashCommand> {
        self.commands
            .iter()
            .find(|command| command.name() == name)
            .map(|command| command.as_ref())
    }

    pub fn definitions(&self) -> Vec<CreateCommand> {
        self.commands.iter().map(|command| command.register()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|command| command.name())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends a text prompt, turning failures into the apology users see.
pub async fn ask(backend: &dyn Backend, prompt: &str) -> String {
    match backend.generate_text(prompt).await {
        Ok(text) => text,
        Err(e) => e.user_message(Service::Text),
    }
}

pub fn pick<R: Rng>(rng: &mut R, choices: &[&'static str]) -> &'static str {
    choices[rng.random_range(0..choices.len())]
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Cuts `text` to at most `limit` chars, ending in `...` when shortened.
pub fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{kept}...")
}
