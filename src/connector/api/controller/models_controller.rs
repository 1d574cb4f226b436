use anyhow::Result;

use crate::ModelInfo;

use super::super::Container;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self, all: bool) -> Result<String> {
        let use_case = self.container.list_models_use_case();
        let models = if all {
            use_case.execute().await?
        } else {
            use_case.generative_models().await?
        };
        Ok(self.format_model_list(&models))
    }

    fn format_model_list(&self, models: &[ModelInfo]) -> String {
        if models.is_empty() {
            return "No models available.".to_string();
        }

        let mut output = "Available models:\n\n".to_string();
        for model in models {
            match &model.display_name {
                Some(display) => output.push_str(&format!("  {} ({})\n", model.id(), display)),
                None => output.push_str(&format!("  {}\n", model.id())),
            }
            if let Some(description) = &model.description {
                output.push_str(&format!("    {}\n", description));
            }
            if let (Some(input), Some(output_limit)) =
                (model.input_token_limit, model.output_token_limit)
            {
                output.push_str(&format!(
                    "    Tokens: {} in / {} out\n",
                    input, output_limit
                ));
            }
            if !model.supported_generation_methods.is_empty() {
                output.push_str(&format!(
                    "    Methods: {}\n",
                    model.supported_generation_methods.join(", ")
                ));
            }
            output.push('\n');
        }

        output
    }
}
