use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the order relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:51839")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay liveness and configuration
    Health,
    /// Send a legacy paper request (echoed back, never reaches the broker)
    Legacy {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        segment: String,
        #[arg(long)]
        instrument: String,
        #[arg(long)]
        side: String,
        #[arg(long)]
        qty: i64,
    },
    /// Forward a broker order read from a JSON file
    Live {
        /// File containing the `dhBody` object
        #[arg(long)]
        order: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Legacy {
            symbol,
            segment,
            instrument,
            side,
            qty,
        } => {
            let body = json!({
                "symbol": symbol,
                "segment": segment,
                "instrument": instrument,
                "side": side,
                "qty": qty,
            });
            client
                .post(format!("{}/relay", base))
                .json(&body)
                .send()
                .await?
        }
        Commands::Live { order } => {
            let order: Value = serde_json::from_str(&std::fs::read_to_string(&order)?)?;
            client
                .post(format!("{}/relay", base))
                .json(&json!({ "dhBody": order }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    println!("HTTP {}", status.as_u16());
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
