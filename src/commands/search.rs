use serenity::all::CommandOptionType;
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};

use super::{ask, Card, Invocation, Reply, SlashCommand};
use crate::backend::Backend;

const GREEN: u32 = 0x2ECC71;

/// The one source the summary must never lean on.
pub const EXCLUDED_SOURCE: &str = "Wikipedia";

pub fn prompt(query: &str) -> String {
    format!(
        "Please perform an up-to-date web search for the query: '{query}'.\n\
         Synthesize the information from multiple reliable sources into a concise summary.\n\
         **Important Rules:**\n\
         1.  **Do not use {EXCLUDED_SOURCE} as a source.** Prioritize official websites, respected \
         news outlets, academic journals, and expert documentation.\n\
         2.  At the end of your summary, you **MUST** list the primary source URLs you used. \
         Format them clearly under a \"Sources:\" heading. The sources are mandatory.\n\
         Present the information clearly and objectively."
    )
}

pub struct Search;

#[async_trait]
impl SlashCommand for Search {
    fn name(&self) -> &'static str {
        "search"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("search")
            .description("Searches the web for up-to-date info on a topic, with sources.")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "query",
                    "What you want to search for.",
                )
                .required(true),
            )
    }

    async fn execute(&self, invocation: &Invocation, backend: &dyn Backend) -> Reply {
        let query = invocation.string("query").unwrap_or_default();
        let result = ask(backend, &prompt(query)).await;
        Reply::Card(Card::new(format!("Web Search Results for: {query}"), GREEN).description(result))
    }
}
