use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use edutrack_core::api::v1::{
    self, AiAskInput, AiAssistInput, AiResearchInput, AiResearchOutput, ApiState,
};
use edutrack_core::assistant::{ContentTier, GatewayConfig, InteractionMode, SourceChunk};
use edutrack_core::chat::{ChatOutcome, ChatSession};
use edutrack_core::AiGateway;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "edutrack", about = "Edu Tracker AI assistant")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat with the assistant
    Chat {
        /// Fast, Standard or "Deep Thought"
        #[arg(short, long, default_value = "Standard")]
        mode: String,
    },

    /// One-off question without history
    Ask {
        #[arg(short, long, value_enum, default_value_t = TierArg::Fast)]
        tier: TierArg,

        #[arg(required = true)]
        prompt: Vec<String>,
    },

    /// Rewrite lesson content from a file
    Assist {
        /// Instruction, e.g. "Make this suitable for beginners"
        #[arg(short, long)]
        instruction: String,

        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = TierArg::Fast)]
        tier: TierArg,
    },

    /// Research with web search, optionally with maps
    Research {
        #[arg(required = true)]
        query: Vec<String>,

        /// Include local results from maps
        #[arg(long)]
        maps: bool,

        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TierArg {
    Fast,
    Pro,
}

impl From<TierArg> for ContentTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Fast => ContentTier::Fast,
            TierArg::Pro => ContentTier::HighCapability,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let gateway = AiGateway::new(GatewayConfig::from_env());
    let state = ApiState { gateway };

    match cli.command {
        Command::Chat { mode } => run_chat(&state.gateway, InteractionMode::from_label(&mode)).await,
        Command::Ask { tier, prompt } => {
            let output = v1::ai_ask(
                &state,
                AiAskInput {
                    prompt: prompt.join(" "),
                    tier: tier.into(),
                },
            )
            .await?;
            print_text(cli.json, &output.text)
        }
        Command::Assist {
            instruction,
            file,
            tier,
        } => {
            let current_content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let output = v1::ai_assist_content(
                &state,
                AiAssistInput {
                    instruction,
                    current_content,
                    tier: tier.into(),
                },
            )
            .await?;
            print_text(cli.json, &output.content)
        }
        Command::Research {
            query,
            maps,
            lat,
            lng,
        } => {
            let output = v1::ai_research(
                &state,
                AiResearchInput {
                    query: query.join(" "),
                    use_maps: maps,
                    latitude: lat,
                    longitude: lng,
                },
            )
            .await?;
            print_research(cli.json, &output)
        }
    }
}

async fn run_chat(gateway: &Arc<AiGateway>, mode: InteractionMode) -> Result<()> {
    let mut session = ChatSession::new(mode);
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("Edu Tracker Assistant ({mode}). Ctrl-D to exit.\n> ").as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        match session.send(gateway, &line).await {
            ChatOutcome::Ignored => {}
            ChatOutcome::Replied(text) => stdout.write_all(format!("{text}\n").as_bytes()).await?,
            ChatOutcome::Failed(err) => {
                let apology = session.messages().last().map(|m| m.text.as_str()).unwrap_or_default();
                stdout.write_all(format!("{apology}\n").as_bytes()).await?;
                if err.is_configuration() {
                    return Err(err).context("assistant is not configured");
                }
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }
    Ok(())
}

fn print_text(json: bool, text: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "text": text }));
    } else {
        println!("{text}");
    }
    Ok(())
}

fn print_research(json: bool, output: &AiResearchOutput) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }
    println!("{}", output.text);
    if output.sources.is_empty() {
        return Ok(());
    }
    println!("\nSources:");
    for (idx, source) in output.sources.iter().enumerate() {
        let marker = match source {
            SourceChunk::Web { .. } => "web",
            SourceChunk::Maps { .. } => "map",
        };
        println!("  {}. [{marker}] {} <{}>", idx + 1, source.title(), source.uri());
        if let SourceChunk::Maps {
            review_snippets, ..
        } = source
        {
            for snippet in review_snippets {
                println!("       \"{}\" <{}>", snippet.text, snippet.uri);
            }
        }
    }
    Ok(())
}
