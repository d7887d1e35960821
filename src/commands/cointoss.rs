use rand::Rng;
use serenity::async_trait;
use serenity::builder::CreateCommand;

use super::{pick, Invocation, Reply, SlashCommand};
use crate::backend::Backend;

pub const SIDES: [&str; 2] = ["Heads", "Tails"];

pub fn toss<R: Rng>(rng: &mut R) -> Reply {
    Reply::text(format!("The coin landed on... **{}**!", pick(rng, &SIDES)))
}

pub struct CoinToss;

#[async_trait]
impl SlashCommand for CoinToss {
    fn name(&self) -> &'static str {
        "cointoss"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("cointoss").description("Flips a coin for you.")
    }

    fn defers(&self) -> bool {
        false
    }

    async fn execute(&self, _invocation: &Invocation, _backend: &dyn Backend) -> Reply {
        toss(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::commands::test_support::invocation;

    #[tokio::test]
    async fn thousand_tosses_see_both_sides_offline() {
        let backend = FakeBackend::new();
        let mut heads = 0;
        let mut tails = 0;

        for _ in 0..1000 {
            match CoinToss.execute(&invocation(), &backend).await {
                Reply::Text(text) if text.contains("**Heads**") => heads += 1,
                Reply::Text(text) if text.contains("**Tails**") => tails += 1,
                other => panic!("unexpected reply {other:?}"),
            }
        }

        assert!(heads > 0 && tails > 0);
        assert!(backend.calls().is_empty());
    }
}
