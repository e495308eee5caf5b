//! Chat with the recommendation flow from a terminal, without the HTTP layer.

use clap::Parser;
use music_recommendation_service::{
    Dependencies, LogFormat, ServiceConfig, create_flow_runner, logging::init_tracing,
    steps::RecommendationState,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use turn_flow::{Activity, ExecutionStatus, InMemorySessionStorage, Prompt, SessionStorage};

#[derive(Parser, Debug)]
#[command(about = "Talk to the music recommendation bot")]
struct Args {
    /// Seed for song picks
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter, e.g. `turn_flow=debug`
    #[arg(long, default_value = "warn")]
    log: String,
}

fn print_activity(activity: &Activity) {
    match activity {
        Activity::Text { text } => println!("bot> {text}"),
        Activity::Attachment { attachment } => {
            let columns = &attachment.content["body"][0]["columns"];
            for line in columns[0]["items"].as_array().into_iter().flatten() {
                if let Some(text) = line["text"].as_str() {
                    println!("     | {text}");
                }
            }
            if let Some(url) = columns[0]["items"][3]["items"][0]["actions"][0]["url"].as_str() {
                println!("     | {url}");
            }
        }
        Activity::Prompt { prompt } => match prompt {
            Prompt::Choice { text, choices } => {
                println!("bot> {text}");
                for (i, choice) in choices.iter().enumerate() {
                    println!("     {}. {choice}", i + 1);
                }
            }
            Prompt::Confirm { text } => println!("bot> {text} (yes/no)"),
            Prompt::FreeText { text } => println!("bot> {text}"),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = ServiceConfig::from_env()?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    init_tracing(LogFormat::Pretty, &args.log);

    let deps = Dependencies::from_config(&config)?;
    let storage: Arc<dyn SessionStorage<RecommendationState>> =
        Arc::new(InMemorySessionStorage::new());
    let runner = create_flow_runner(&deps, storage);
    let session_id = "console";

    println!("Say hello to start. Type 'restart' to start over, 'quit' to leave.");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let result = runner.run(session_id, line.trim()).await?;
        result.activities.iter().for_each(print_activity);
        if result.status == ExecutionStatus::Cancelled {
            break;
        }
    }
    Ok(())
}
