//! Streaming chat with the learning assistant.

use std::pin::Pin;

use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use tracing::{debug, instrument};

use learnverse_core::error::InvalidInputError;
use learnverse_core::{AccessToken, Error, Result};

use crate::client::ApiClient;
use crate::endpoints::{ASSISTANT_CHAT, ChatRequest};
use crate::sse::{SseDecoder, SseEvent};

/// Text chunks of an assistant reply, in arrival order.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone)]
pub struct AssistantRepository {
    client: ApiClient,
}

impl AssistantRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST api/assistant/chat`, streamed as server-sent events.
    ///
    /// The caller supplies the token; the request is marked so the automatic
    /// authorizer and refresh leave it alone.
    #[instrument(skip(self, message, token))]
    pub async fn chat(&self, message: &str, token: &AccessToken) -> Result<ChatStream> {
        if message.trim().is_empty() {
            return Err(InvalidInputError::Required { field: "message" }.into());
        }

        let request = self
            .client
            .post(ASSISTANT_CHAT)
            .with_manual_bearer(token)?
            .header("accept", "text/event-stream")?
            .json(&ChatRequest { message })?;

        let response = self.client.execute(request).await?;
        let mut bytes = response.bytes_stream();

        let stream = try_stream! {
            let mut decoder = SseDecoder::new();
            'outer: while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(Error::from)?;
                for event in decoder.push(&chunk) {
                    match event {
                        SseEvent::Data(text) => yield text,
                        SseEvent::Done => break 'outer,
                    }
                }
            }
            if let Some(SseEvent::Data(text)) = decoder.finish() {
                yield text;
            }
            debug!("Assistant stream finished");
        };

        Ok(Box::pin(stream))
    }
}
