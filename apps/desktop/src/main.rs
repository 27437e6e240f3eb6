use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{AccountClient, ProfileSource, SessionError, SessionManager};
use shared::domain::{Credentials, RegistrationData};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "ACCOUNT_API_URL", default_value = "http://127.0.0.1:8000/api/")]
    api_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print a short confirmation.
    Login(LoginArgs),
    /// Sign in, print the profile as JSON, then sign out.
    Profile(LoginArgs),
    /// Create a new account.
    Register(RegisterArgs),
}

#[derive(ClapArgs, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "ACCOUNT_PASSWORD")]
    password: String,
}

#[derive(ClapArgs, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    paternal_lastname: String,
    #[arg(long)]
    maternal_lastname: String,
    #[arg(long)]
    document_number: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    user_name: String,
    #[arg(long)]
    phone: String,
    #[arg(long, env = "ACCOUNT_PASSWORD")]
    password: String,
}

impl From<RegisterArgs> for RegistrationData {
    fn from(args: RegisterArgs) -> Self {
        let mut data = RegistrationData::with_session_date(chrono::Local::now().date_naive());
        data.name = args.name;
        data.paternal_lastname = args.paternal_lastname;
        data.maternal_lastname = args.maternal_lastname;
        data.document_number = args.document_number;
        data.email = args.email;
        data.user_name = args.user_name;
        data.phone = args.phone;
        data.password = args.password;
        data
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();
    let client = AccountClient::new(&args.api_url).context("invalid --api-url")?;

    match args.command {
        Command::Login(login) => {
            sign_in(&client, login).await?;
            println!("Signed in to {}", client.base_url());
        }
        Command::Profile(login) => {
            sign_in(&client, login).await?;
            let profile = client.refresh().await.map_err(describe)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            if let Err(err) = client.logout().await {
                tracing::warn!("logout failed: {err}");
            }
        }
        Command::Register(register) => {
            let data = RegistrationData::from(register);
            client.register(&data).await.map_err(describe)?;
            println!("Account created for {}", data.email);
        }
    }

    Ok(())
}

async fn sign_in(client: &AccountClient, login: LoginArgs) -> Result<()> {
    let credentials = Credentials::new(login.email, login.password);
    client.login(&credentials).await.map_err(describe)
}

/// Prefers what the service said, field errors included, over transport detail.
fn describe(err: SessionError) -> anyhow::Error {
    let fields = err
        .body()
        .map(|body| body.field_messages())
        .unwrap_or_default();
    if !fields.is_empty() {
        return anyhow::anyhow!("{}", fields.join("\n"));
    }
    match err.service_message() {
        Some(message) => anyhow::anyhow!("{message}"),
        None => anyhow::Error::new(err),
    }
}
