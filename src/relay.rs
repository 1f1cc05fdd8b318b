use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::config::ChannelsConfig;
use crate::llm::TextGenerator;
use crate::platform::{IncomingMessage, ReplySink};
use crate::prompts::CorrectionChannel;

/// Prefix of every successful correction reply.
pub const REPLY_LABEL: &str = "**添削結果:**";

/// Sent instead of a correction when generation fails.
pub const FAILURE_REPLY: &str = "添削中にエラーが発生しました。もう一度お試しください。";

/// What happened to a message, mostly for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    OwnMessage,
    OutOfScope,
    Corrected,
    Failed,
}

/// The correction pipeline: channel dispatch, prompt, generation, reply.
pub struct Relay {
    generator: Arc<dyn TextGenerator>,
    channels: ChannelsConfig,
    // Held from before the channel lookup until the reply is sent.
    in_flight: Mutex<()>,
}

pub fn format_reply(correction: &str) -> String {
    format!("{}\n{}", REPLY_LABEL, correction)
}

impl Relay {
    pub fn new(generator: Arc<dyn TextGenerator>, channels: ChannelsConfig) -> Self {
        Self {
            generator,
            channels,
            in_flight: Mutex::new(()),
        }
    }

    /// Handle one inbound message. Never fails: generation errors are
    /// reported to the user and reply delivery errors are logged.
    pub async fn handle_message(
        &self,
        msg: &IncomingMessage,
        bot_user_id: u64,
        sink: &dyn ReplySink,
    ) -> Outcome {
        self.handle_event(msg.author_id, bot_user_id, async { Some(msg.clone()) }, sink)
            .await
    }

    /// Like `handle_message`, for platforms where building the message needs
    /// an await (e.g. a channel lookup). Own messages are dropped before
    /// `resolve` is polled, and the gate is taken before it, so events keep
    /// their arrival order. `None` from `resolve` means out of scope.
    pub async fn handle_event<R>(
        &self,
        author_id: u64,
        bot_user_id: u64,
        resolve: R,
        sink: &dyn ReplySink,
    ) -> Outcome
    where
        R: Future<Output = Option<IncomingMessage>> + Send,
    {
        if author_id == bot_user_id {
            return Outcome::OwnMessage;
        }

        // tokio's Mutex is FIFO, so the lock order is the arrival order.
        let _guard = self.in_flight.lock().await;

        let Some(msg) = resolve.await else {
            return Outcome::OutOfScope;
        };

        let Some(channel) = CorrectionChannel::from_name(&msg.channel_name, &self.channels)
        else {
            return Outcome::OutOfScope;
        };

        info!(
            "Message from {} ({}) in channel \"{}\" [{}]",
            msg.author_name, msg.author_id, msg.channel_name, channel
        );

        let prompt = channel.build_prompt(&msg.text);

        let (reply, outcome) = match self.generator.generate(&prompt).await {
            Ok(correction) => (format_reply(&correction), Outcome::Corrected),
            Err(e) => {
                error!("Gemini API call failed: {:#}", e);
                (FAILURE_REPLY.to_string(), Outcome::Failed)
            }
        };

        match sink.reply(&reply).await {
            Ok(()) => info!("Reply sent to channel \"{}\"", msg.channel_name),
            Err(e) => error!("Failed to send reply: {:#}", e),
        }

        outcome
    }
}
