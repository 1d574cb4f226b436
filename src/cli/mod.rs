use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Send a single prompt and print the reply
    Ask { prompt: String },

    /// Start an interactive chat session
    Chat,

    /// List models available to the configured API key
    Models {
        /// Include models that cannot generate text
        #[arg(long)]
        all: bool,
    },
}
