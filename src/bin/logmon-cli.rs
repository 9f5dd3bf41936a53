use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "logmon-cli")]
#[command(about = "Command-line client for the log monitor service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token from `logmon-cli login`
    #[arg(short, long, env = "LOGMON_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange credentials for a bearer token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// List stored log records
    List,
    /// Add a log record
    Add {
        message: String,
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        service: Option<String>,
    },
    /// Replace a record's message
    Update { id: i64, message: String },
    /// Patch a record's message
    Patch { id: i64, message: String },
    /// Delete a record
    Delete { id: i64 },
    /// Check service liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
    }

    let res = match cli.command {
        Commands::Login { username, password } => {
            client
                .post(format!("{}/login", cli.url))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?
        }
        Commands::List => {
            client
                .get(format!("{}/logs", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Add { message, level, service } => {
            client
                .post(format!("{}/logs", cli.url))
                .headers(headers)
                .json(&json!({ "message": message, "level": level, "service": service }))
                .send()
                .await?
        }
        Commands::Update { id, message } => {
            client
                .put(format!("{}/logs/{}", cli.url, id))
                .headers(headers)
                .json(&json!({ "message": message }))
                .send()
                .await?
        }
        Commands::Patch { id, message } => {
            client
                .patch(format!("{}/logs/{}", cli.url, id))
                .headers(headers)
                .json(&json!({ "message": message }))
                .send()
                .await?
        }
        Commands::Delete { id } => {
            client
                .delete(format!("{}/logs/{}", cli.url, id))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Health => {
            client.get(format!("{}/health", cli.url)).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
