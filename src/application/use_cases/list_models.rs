use std::sync::Arc;

use crate::application::TextGenerator;
use crate::domain::{GenerationError, ModelInfo};

pub struct ListModelsUseCase {
    generator: Arc<dyn TextGenerator>,
}

impl ListModelsUseCase {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn execute(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        self.generator.list_models().await
    }

    /// Only models that accept `generateContent` calls.
    pub async fn generative_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        let models = self.execute().await?;
        Ok(models
            .into_iter()
            .filter(ModelInfo::supports_generate_content)
            .collect())
    }
}
