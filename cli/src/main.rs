mod messages;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "heartglow")]
#[command(about = "HeartGlow CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up
    Health {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Create an account and print its session token
    Signup {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print a fresh session token
    Login {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Generate a message draft through the wizard fields
    Generate(messages::GenerateArgs),
    /// List saved messages, newest first
    History {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Session token from signup or login
        #[arg(long)]
        token: String,
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Health { server } => {
            health(&server).await?;
        }
        Commands::Signup {
            server,
            email,
            password,
        } => {
            signup(&server, &email, &password).await?;
        }
        Commands::Login {
            server,
            email,
            password,
        } => {
            login(&server, &email, &password).await?;
        }
        Commands::Generate(args) => {
            messages::generate(args).await?;
        }
        Commands::History {
            server,
            token,
            limit,
        } => {
            messages::history(&server, &token, limit).await?;
        }
    }

    Ok(())
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Turn a non-success response into an error carrying the server's message.
pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => "no error body".to_string(),
    };
    bail!("server returned {}: {}", status, message)
}

async fn health(server: &str) -> Result<()> {
    let response = reqwest::get(format!("{}/api/health", server)).await?;
    let body: HealthResponse = check(response).await?.json().await?;

    println!("{}", body.status);

    Ok(())
}

async fn signup(server: &str, email: &str, password: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/auth/signup", server))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await?;
    let body: TokenResponse = check(response).await?.json().await?;

    println!("{}", body.token);

    Ok(())
}

async fn login(server: &str, email: &str, password: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/auth/login", server))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await?;
    let body: TokenResponse = check(response).await?.json().await?;

    println!("{}", body.token);

    Ok(())
}
