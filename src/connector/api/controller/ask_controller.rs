use anyhow::Result;

use crate::application::TextGenerator;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// One prompt, one reply. Generation failures surface as errors so the
    /// process exits non-zero.
    pub async fn ask(&self, prompt: String) -> Result<String> {
        let reply = self
            .container
            .generator()
            .generate(&prompt, self.container.max_output_tokens())
            .await?;
        Ok(self.container.renderer().format_reply(&reply))
    }
}
