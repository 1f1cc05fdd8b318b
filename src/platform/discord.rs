use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::model::channel::{Channel, Message};
use serenity::model::gateway::Ready;
use serenity::prelude::{Client, Context, EventHandler, GatewayIntents};
use tracing::{debug, info, warn};

use crate::platform::{IncomingMessage, ReplySink};
use crate::relay::Relay;

/// Discord's maximum message length in characters.
const MAX_MESSAGE_LEN: usize = 2000;

/// Split text into chunks of at most `max_chars` characters, preferring
/// to break after a newline, then after a space.
fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = text[start..]
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| start + i)
            .unwrap_or(text.len());

        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}

/// Replies to one Discord message; overflow goes to the same channel.
struct DiscordReply<'a> {
    ctx: &'a Context,
    msg: &'a Message,
}

#[async_trait]
impl ReplySink for DiscordReply<'_> {
    async fn reply(&self, text: &str) -> Result<()> {
        let mut chunks = split_message(text, MAX_MESSAGE_LEN).into_iter();

        if let Some(first) = chunks.next() {
            self.msg
                .reply(self.ctx, first)
                .await
                .context("Failed to reply on Discord")?;
        }
        for chunk in chunks {
            self.msg
                .channel_id
                .say(self.ctx, chunk)
                .await
                .context("Failed to send follow-up on Discord")?;
        }

        Ok(())
    }
}

struct Handler {
    relay: Arc<Relay>,
}

/// Name of the guild channel (or thread) a message was posted in.
/// DMs have no name and are out of scope.
async fn resolve_channel_name(ctx: &Context, msg: &Message) -> Option<String> {
    match msg.channel(ctx).await {
        Ok(Channel::Guild(channel)) => Some(channel.name),
        Ok(_) => None,
        Err(e) => {
            warn!("Failed to resolve channel {}: {}", msg.channel_id, e);
            None
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Logged in as {} ({})", ready.user.name, ready.user.id);
        info!("Bot is ready");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let bot_user_id = ctx.cache.current_user().id.get();

        // Only polled by the relay for messages that are not the bot's own.
        let resolve = async {
            let channel_name = resolve_channel_name(&ctx, &msg).await?;
            Some(IncomingMessage {
                author_id: msg.author.id.get(),
                author_name: msg.author.name.clone(),
                channel_name,
                text: msg.content.clone(),
            })
        };

        let sink = DiscordReply {
            ctx: &ctx,
            msg: &msg,
        };
        let outcome = self
            .relay
            .handle_event(msg.author.id.get(), bot_user_id, resolve, &sink)
            .await;

        debug!("Message {} handled: {:?}", msg.id, outcome);
    }
}

/// Run the Discord client until the gateway connection ends.
pub async fn run(relay: Arc<Relay>, bot_token: &str) -> Result<()> {
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(bot_token, intents)
        .event_handler(Handler { relay })
        .await
        .context("Failed to create Discord client")?;

    info!("Starting Discord client...");
    client.start().await.context("Discord client error")?;

    Ok(())
}
