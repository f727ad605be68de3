//! Ask a mentor one question and print the reply.
//!
//! Reads the API key from the `GEMINI_API_KEY` environment variable (a `.env`
//! file in the working directory is honored). Logs go to stderr; stdout
//! carries only the reply.
//!
//! # Examples
//!
//! ```sh
//! # Ask Musashi
//! mentor --question "How do I stop fearing failure?" --mentor 0
//!
//! # Say goodbye to Rumi, with a different model
//! mentor --question "Goodbye, thank you for your wisdom" --mentor 1 --model gemini-2.0-flash
//!
//! # Pipe the question from stdin
//! echo "What is discipline?" | mentor --stdin --mentor 2
//!
//! # List the mentors
//! mentor --list
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mentor_rs::prelude::*;
use tracing_subscriber::EnvFilter;

/// Ask a mentor one question and print the reply.
#[derive(Parser)]
#[command(name = "mentor")]
struct Cli {
    // ── Request ────────────────────────────────────────────────
    /// The student's message
    #[arg(long, short)]
    question: Option<String>,

    /// Read the message from stdin
    #[arg(long)]
    stdin: bool,

    /// Mentor option: 0 = Musashi, 1 = Rumi, 2 = Chanakya
    #[arg(long, short, default_value_t = 0, allow_negative_numbers = true)]
    mentor: i64,

    // ── Provider ───────────────────────────────────────────────
    /// Model to use (overrides GEMINI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Content-filter threshold: none, only-high, medium, low
    #[arg(long, default_value = "only-high")]
    safety_threshold: HarmBlockThreshold,

    /// Read configuration from this dotenv file instead of the environment
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Give up on the model after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    // ── Output ─────────────────────────────────────────────────
    /// Print the mentors and exit
    #[arg(long)]
    list: bool,

    /// Print the reply as JSON with its conversation type and source
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list {
        for (option, persona) in all_personas().iter().enumerate() {
            println!("{option}: {} (age {})", persona.name, persona.age);
        }
        return Ok(());
    }

    let question = read_question(&cli)?;
    let persona = get_persona(cli.mentor)?;

    // Fail on configuration before anything reaches the provider.
    let mut config = match &cli.env_file {
        Some(path) => MentorConfig::from_dotenv_file(path)?,
        None => MentorConfig::from_env()?,
    };
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    config = config.with_safety_threshold(cli.safety_threshold);

    let client = GeminiClient::new(&config)?;
    let pipeline = ResponsePipeline::with_model(client);

    let reply = tokio::time::timeout(
        Duration::from_secs(cli.timeout_secs),
        pipeline.respond_detailed(persona, &question),
    )
    .await
    .map_err(|_| {
        format!(
            "Request timed out after {}s. The mentor is taking too long to respond.",
            cli.timeout_secs
        )
    })?;

    if cli.json {
        let json = serde_json::to_string_pretty(&reply)
            .map_err(|e| format!("failed to serialize reply: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}

fn read_question(cli: &Cli) -> Result<String, String> {
    let question = if cli.stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        buf
    } else {
        cli.question.clone().unwrap_or_default()
    };

    let question = question.trim();
    if question.is_empty() {
        return Err("Missing or empty question: pass --question or --stdin".to_string());
    }
    Ok(question.to_string())
}
