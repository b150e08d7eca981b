use clap::Parser;
use std::process::ExitCode;

use chat_relay::config::provider_from_env;
use chat_relay::llm::{create_client, GenerationConfig};
use chat_relay::relay::cli::{chatbot_agent, chatbot_agent_line, AgentOptions, USAGE, USAGE_EXAMPLE};
use chat_relay::relay::message_from_args;
use chat_relay::telemetry;

/// Ask the model a question and stream the answer to stdout
#[derive(Debug, Parser)]
#[command(name = "chatbot", version)]
struct Cli {
    /// Custom system prompt
    #[arg(long)]
    system: Option<String>,

    /// Model id, e.g. models/gemini-2.5-pro
    #[arg(long)]
    model: Option<String>,

    /// Upper bound on generated tokens
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Print only the streamed text: no trailing newline, errors are not formatted
    #[arg(long)]
    minimal: bool,

    /// The message; all words are joined with spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    message: Vec<String>,
}

impl Cli {
    fn options(&self) -> AgentOptions {
        AgentOptions {
            system: self.system.clone(),
            model: self.model.clone(),
            config: GenerationConfig {
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init_cli_logging();

    let cli = Cli::parse();

    let message = match message_from_args(&cli.message) {
        Ok(message) => message,
        Err(_) => {
            eprintln!("{}", USAGE);
            eprintln!("{}", USAGE_EXAMPLE);
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.minimal {
        let client = create_client(&provider_from_env()?).await?;
        chatbot_agent(&*client, &message, &cli.options(), tokio::io::stdout()).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = async {
        let client = create_client(&provider_from_env()?).await?;
        chatbot_agent_line(&*client, &message, &cli.options(), tokio::io::stdout()).await?;
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .await;

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("\nError: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
