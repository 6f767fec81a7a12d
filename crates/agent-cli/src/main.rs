//! Trading assistant CLI
//!
//! Ask one question with `--query`, or start an interactive session.
//!
//! # Usage
//!
//! ```bash
//! export MARKET_API_URL="https://api.example.com"
//! export LLM_PROVIDER=gemini GEMINI_API_KEY=...
//!
//! cargo run --bin trading-cli -- --jwt-token "$JWT" --query "What's trending on SUI?"
//! cargo run --bin trading-cli -- --jwt-token "$JWT" --verbose
//! ```

mod events;

use agent_core::{Context, Error};
use agent_llm::LlmSettings;
use agent_market::{MarketConfig, TradingAssistant};
use agent_runtime::{Session, ToolFailurePolicy};
use agent_utils::{Config, LogFormat};
use clap::Parser;
use events::VerboseEventHandler;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const APP_NAME: &str = "trading-cli";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version)]
#[command(about = "ReAct crypto trading assistant", long_about = None)]
struct Args {
    /// Ask a single question and exit
    #[arg(short, long)]
    query: Option<String>,

    /// User authorization token forwarded to the market tools
    #[arg(long, env = "MARKET_JWT_TOKEN", hide_env_values = true)]
    jwt_token: Option<String>,

    /// Maximum reasoning iterations per query
    #[arg(long, default_value_t = 10)]
    max_iterations: usize,

    /// LLM provider: openai, gemini or anthropic (overrides LLM_PROVIDER)
    #[arg(long)]
    provider: Option<String>,

    /// Model identifier (overrides LLM_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Free-text context added to the system prompt
    #[arg(long)]
    context: Option<String>,

    /// End the query on the first tool failure instead of showing it to the LLM
    #[arg(long)]
    abort_on_tool_error: bool,

    /// Print reasoning steps to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let app = Config::from_env(APP_NAME);
    let log_format = if args.json_logs {
        LogFormat::Json
    } else {
        app.log_format()
    };
    agent_utils::init_tracing_with(DEFAULT_LOG_FILTER, log_format)?;

    let assistant = build_assistant(&args)?;

    let token = args.jwt_token.clone().unwrap_or_default();
    if token.is_empty() {
        warn!("no --jwt-token given; wallet and position tools will fail");
    }
    let mut context = Context::new().with_auth_token(token);
    if let Some(extra) = &args.context {
        context = context.with_domain_context(extra.clone());
    }
    let mut session = assistant.session(context)?;

    info!(environment = %app.environment, "Starting {APP_NAME}");

    match &args.query {
        Some(query) => ask(&assistant, &mut session, query).await,
        None => repl(&assistant, &mut session).await,
    }
}

fn build_assistant(args: &Args) -> anyhow::Result<TradingAssistant> {
    let settings = LlmSettings::from_lookup(|key| match key {
        "LLM_PROVIDER" if args.provider.is_some() => args.provider.clone(),
        "LLM_MODEL" if args.model.is_some() => args.model.clone(),
        _ => std::env::var(key).ok(),
    })?;
    let provider = settings.build_provider()?;

    let policy = if args.abort_on_tool_error {
        ToolFailurePolicy::Abort
    } else {
        ToolFailurePolicy::Observe
    };

    let mut builder = TradingAssistant::builder()
        .market_config(MarketConfig::from_env()?)
        .provider(provider)
        .model(settings.model.clone())
        .max_iterations(args.max_iterations)
        .tool_failure_policy(policy)
        .with_context_section(args.context.is_some());
    if args.verbose {
        builder = builder.event_handler(Arc::new(VerboseEventHandler));
    }

    Ok(builder.build()?)
}

/// Run one query; Ctrl-C cancels it
async fn ask(assistant: &TradingAssistant, session: &mut Session, query: &str) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = assistant.chat_with_cancel(session, query, &cancel).await;
    watcher.abort();

    match result {
        Ok(response) => {
            println!("{}\n", response.response);
            Ok(())
        }
        Err(Error::Cancelled) => {
            eprintln!("(cancelled)\n");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_help() {
    println!("Ask anything about tokens, trending pairs, wallets or positions.");
    println!("Commands:");
    println!("  /reset  - forget the conversation so far");
    println!("  /help   - show this help");
    println!("  /exit   - quit (Ctrl-D also works)");
    println!();
}

async fn repl(assistant: &TradingAssistant, session: &mut Session) -> anyhow::Result<()> {
    println!("Trading assistant ready. Type /help for commands.\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!("\nGoodbye!");
            break;
        };

        match line.trim() {
            "" => {}
            "/exit" | "/quit" => {
                println!("Goodbye!");
                break;
            }
            "/help" => print_help(),
            "/reset" => {
                session.clear_history();
                println!("Conversation cleared.\n");
            }
            query => {
                if let Err(e) = ask(assistant, session, query).await {
                    eprintln!("Error: {e}\n");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["trading-cli"]).unwrap();
        assert_eq!(args.max_iterations, 10);
        assert!(args.query.is_none());
        assert!(!args.verbose);
        assert!(!args.abort_on_tool_error);
    }

    #[test]
    fn test_args_one_shot() {
        let args = Args::try_parse_from([
            "trading-cli",
            "--query",
            "What's trending?",
            "--jwt-token",
            "tok",
            "--provider",
            "anthropic",
            "--max-iterations",
            "3",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.query.as_deref(), Some("What's trending?"));
        assert_eq!(args.jwt_token.as_deref(), Some("tok"));
        assert_eq!(args.provider.as_deref(), Some("anthropic"));
        assert_eq!(args.max_iterations, 3);
        assert!(args.verbose);
    }
}
