//! Simple (non-streaming) API calls
//!
//! Generation only needs whole responses: tool arguments carry full pages and
//! are useless until complete.

use tracing::debug;

use super::{AiClient, ApiError};
use crate::ai::types::{AiTool, MessageRequest, MessageResponse, ModelMessage};

impl AiClient {
    /// One messages call with the full conversation and tool set.
    pub async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ModelMessage],
        tools: &[AiTool],
    ) -> Result<MessageResponse, ApiError> {
        let body = MessageRequest {
            model: &self.config().model,
            max_tokens: self.config().max_tokens,
            system: system_prompt,
            messages,
            tools,
        };

        debug!(
            model = %self.config().model,
            messages = messages.len(),
            "Messages API call"
        );

        let request = self.build_request(&self.config().api_url());
        let response = request.json(&body).send().await?;
        let response = self.handle_error_response(response).await?;

        Ok(response.json::<MessageResponse>().await?)
    }
}
