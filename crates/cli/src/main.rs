mod ask;
mod heatmap_cmd;
mod news_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newsdesk", about = "newsdesk CLI - headlines, sector heatmaps, and the research copilot")]
struct Cli {
    /// Base URL of the news analysis API
    #[arg(long, env = "NEWSDESK_API_URL", default_value = "http://localhost:8001", global = true)]
    api_url: String,

    /// WebSocket URL of the research agent runtime
    #[arg(long, env = "NEWSDESK_AGENT_URL", default_value = "ws://localhost:2024", global = true)]
    agent_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest financial headlines
    News {
        /// Maximum number of articles
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Print the sector activity heatmap
    Heatmap {
        /// Comma-separated sector filter (e.g. "Technology,Energy")
        #[arg(long)]
        sectors: Option<String>,

        /// Maximum number of articles to analyze
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Ask the research copilot a question
    Ask {
        /// The question to research
        question: String,

        /// Research effort: low, medium, or high
        #[arg(long, default_value = "medium")]
        effort: String,

        /// Reasoning model to request from the runtime
        #[arg(long, default_value = "gemini-2.5-pro")]
        model: String,

        /// Forward the current sector heatmap as background context
        #[arg(long)]
        market_context: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::News { limit } => news_cmd::run_news(&cli.api_url, limit).await,
        Commands::Heatmap { sectors, limit } => {
            heatmap_cmd::run_heatmap(&cli.api_url, sectors.as_deref(), limit).await
        }
        Commands::Ask {
            question,
            effort,
            model,
            market_context,
        } => {
            ask::run_ask(
                &cli.api_url,
                &cli.agent_url,
                &question,
                &effort,
                &model,
                market_context,
            )
            .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
