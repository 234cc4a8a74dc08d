use log::debug;
use std::sync::Arc;

use crate::error::ImportError;
use crate::model::{RecipeInstruction, RecipeInstructionList};
use crate::prompt;
use crate::providers::{CompletionRequest, LlmProvider, Message};

/// Splits a blob of method text into numbered steps using the language model.
pub struct InstructionSegmenter {
    provider: Arc<dyn LlmProvider>,
}

impl InstructionSegmenter {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Steps come back numbered 1..=N in order. Output that does not match
    /// the instruction-list schema is an error; there is no fallback.
    pub async fn segment(&self, raw_instructions: &str) -> Result<Vec<RecipeInstruction>, ImportError> {
        if raw_instructions.trim().is_empty() {
            return Ok(Vec::new());
        }

        let request = CompletionRequest::new(vec![
            Message::system(prompt::SEGMENTATION_SYSTEM),
            Message::user(prompt::segmentation_user(raw_instructions)),
        ])
        .with_schema(RecipeInstructionList::response_schema());

        let output = self.provider.complete(&request).await?;
        let list = RecipeInstructionList::from_model_output(&output)?;
        debug!("Segmented instructions into {} steps", list.instructions.len());
        Ok(list.instructions)
    }
}
