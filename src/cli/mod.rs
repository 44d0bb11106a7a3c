use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the prompt relay HTTP server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Ask a single question and print the answer
    Ask {
        question: String,

        /// Start a relay inside this process instead of calling --relay-url
        #[arg(long)]
        local: bool,
    },

    /// Interactive session with history
    Chat {
        /// Start a relay inside this process instead of calling --relay-url
        #[arg(long)]
        local: bool,
    },
}
