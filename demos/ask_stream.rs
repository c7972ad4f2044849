//! Stream an answer from the query agent to stdout.
//!
//! ```text
//! WEAVIATE_URL=https://my-cluster.weaviate.cloud WEAVIATE_API_KEY=... \
//!     cargo run --example ask_stream -- Products "Which shoes are waterproof?"
//! ```

use std::io::Write;

use color_eyre::eyre::{eyre, Result};
use futures_util::StreamExt;
use query_agent::adapters::StaticConnection;
use query_agent::logging::init_tracing;
use query_agent::{AgentConfig, AskStreamOptions, QueryAgent, StreamOutput};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing("query_agent=info");

    let mut args = std::env::args().skip(1);
    let collection = args
        .next()
        .ok_or_else(|| eyre!("usage: ask_stream <collection> <question>"))?;
    let question = args.collect::<Vec<_>>().join(" ");
    if question.is_empty() {
        return Err(eyre!("usage: ask_stream <collection> <question>"));
    }

    let agent = QueryAgent::new(
        StaticConnection::from_env()?,
        AgentConfig::from_env().with_collections([collection]),
    );

    let mut stream = agent
        .ask_stream(question, AskStreamOptions::default())
        .await?;
    let mut stdout = std::io::stdout();

    while let Some(output) = stream.next().await {
        match output? {
            StreamOutput::ProgressMessage(progress) => {
                eprintln!("[{}] {}", progress.stage, progress.message);
            }
            StreamOutput::StreamedTokens(tokens) => {
                write!(stdout, "{}", tokens.delta)?;
                stdout.flush()?;
            }
            StreamOutput::FinalState(state) => {
                writeln!(stdout)?;
                eprintln!(
                    "{} source(s), {:.2}s",
                    state.sources.len(),
                    state.total_time
                );
            }
        }
    }

    Ok(())
}
