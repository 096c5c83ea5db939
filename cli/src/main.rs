use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tpmail_admin::api::types::{CreateDomainRequest, ImapTestRequest, Message, UpdateDomainRequest};
use tpmail_admin::config::{DEFAULT_API_URL, DEFAULT_COOKIE_FILE};
use tpmail_admin::dashboard::DashboardSummary;
use tpmail_admin::guard::{self, DASHBOARD_PATH, GuardAction};
use tpmail_admin::poll::{MESSAGES_REFRESH, spawn_view_refresh};
use tpmail_admin::{ApiConfig, ApiError, FileCredentialStore, LoggingNavigator, SessionStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{page} requires a session; sign in with `tpmail-cli login`")]
    NotSignedIn { page: &'static str },
    #[error("session ended; sign in again with `tpmail-cli login`")]
    SessionEnded,
    #[error("nothing to update; pass at least one field")]
    EmptyUpdate,
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("signal handler failed: {0}")]
    Signal(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tpmail-cli", about = "TPMail admin CLI")]
struct Cli {
    #[arg(long, env = "TPMAIL_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "COOKIE_FILE", default_value = DEFAULT_COOKIE_FILE)]
    cookie_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TPMAIL_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Status,
    Stats,
    Dashboard,
    Domains(DomainsCommand),
    Emails(EmailsCommand),
    ImapTest(ImapTestArgs),
    ApiKeys(ApiKeysCommand),
}

impl Command {
    /// The dashboard page a command stands in for, if it needs a session.
    fn page(&self) -> Option<&'static str> {
        match self {
            Command::Login { .. } | Command::Logout | Command::Status => None,
            Command::Stats | Command::Dashboard => Some(DASHBOARD_PATH),
            Command::Domains(_) => Some("/domains"),
            Command::Emails(_) => Some("/emails"),
            Command::ImapTest(_) => Some("/settings"),
            Command::ApiKeys(_) => Some("/api-keys"),
        }
    }
}

#[derive(Args, Debug)]
struct DomainsCommand {
    #[command(subcommand)]
    command: DomainsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DomainsSubcommand {
    List,
    Create {
        domain: String,
        #[arg(long)]
        imap_host: String,
        #[arg(long, default_value_t = 993)]
        imap_port: u16,
        #[arg(long)]
        imap_user: String,
        #[arg(long, env = "TPMAIL_IMAP_PASSWORD", hide_env_values = true)]
        imap_password: String,
    },
    Update {
        id: String,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        imap_host: Option<String>,
        #[arg(long)]
        imap_port: Option<u16>,
        #[arg(long)]
        imap_user: Option<String>,
        #[arg(long)]
        imap_password: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct EmailsCommand {
    #[command(subcommand)]
    command: EmailsSubcommand,
}

#[derive(Subcommand, Debug)]
enum EmailsSubcommand {
    List,
    Delete {
        id: String,
    },
    Messages {
        email: String,
        #[arg(long, default_value_t = false, help = "Keep refreshing until interrupted")]
        watch: bool,
    },
}

#[derive(Args, Debug)]
struct ImapTestArgs {
    #[arg(long)]
    host: String,
    #[arg(long, default_value_t = 993)]
    port: u16,
    #[arg(long)]
    user: String,
    #[arg(long, env = "TPMAIL_IMAP_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct ApiKeysCommand {
    #[command(subcommand)]
    command: ApiKeysSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiKeysSubcommand {
    List,
    Create { name: String },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let session = SessionStore::new(
        &ApiConfig::new(cli.api_url),
        Arc::new(FileCredentialStore::new(cli.cookie_file)),
        Arc::new(LoggingNavigator),
    )?;
    session.initialize();

    if let Some(page) = cli.command.page() {
        if let GuardAction::Redirect(_) = guard::evaluate(page, session.credentials().is_present()) {
            return Err(CliError::NotSignedIn { page });
        }
    }

    match cli.command {
        Command::Login { email, password } => {
            session.login(&email, &password).await?;
            print_status(&session)
        }
        Command::Logout => {
            session.logout();
            print_status(&session)
        }
        Command::Status => print_status(&session),
        Command::Stats => print_json(&session.client().stats().await?),
        Command::Dashboard => run_dashboard(&session).await,
        Command::Domains(domains) => run_domains(&session, domains).await,
        Command::Emails(emails) => run_emails(&session, emails).await,
        Command::ImapTest(args) => {
            let request = ImapTestRequest { host: args.host, port: args.port, user: args.user, password: args.password };
            print_json(&session.client().test_imap(&request).await?)
        }
        Command::ApiKeys(keys) => run_api_keys(&session, keys).await,
    }
}

fn print_status(session: &SessionStore) -> Result<(), CliError> {
    let state = session.state();
    let expires_at = session.credentials().current().map(|c| c.expires_at().to_string());
    print_json(&json!({
        "is_authenticated": state.is_authenticated,
        "is_loading": state.is_loading,
        "expires_at": expires_at,
    }))
}

async fn run_dashboard(session: &SessionStore) -> Result<(), CliError> {
    let client = session.client();
    let (stats, emails) = tokio::join!(client.stats(), client.emails());
    let summary = DashboardSummary::build(&stats?, &emails?);
    print_json(&summary)
}

async fn run_domains(session: &SessionStore, domains: DomainsCommand) -> Result<(), CliError> {
    let client = session.client();
    match domains.command {
        DomainsSubcommand::List => print_json(&client.domains().await?),
        DomainsSubcommand::Create { domain, imap_host, imap_port, imap_user, imap_password } => {
            let request = CreateDomainRequest { domain, imap_host, imap_port, imap_user, imap_password };
            print_json(&client.create_domain(&request).await?)
        }
        DomainsSubcommand::Update { id, domain, imap_host, imap_port, imap_user, imap_password, active } => {
            let request = UpdateDomainRequest { domain, imap_host, imap_port, imap_user, imap_password, active };
            if request.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&client.update_domain(&id, &request).await?)
        }
        DomainsSubcommand::Delete { id } => {
            client.delete_domain(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

async fn run_emails(session: &SessionStore, emails: EmailsCommand) -> Result<(), CliError> {
    let client = session.client();
    match emails.command {
        EmailsSubcommand::List => print_json(&client.emails().await?),
        EmailsSubcommand::Delete { id } => {
            client.delete_email(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
        EmailsSubcommand::Messages { email, watch: false } => print_json(&client.messages(&email).await?),
        EmailsSubcommand::Messages { email, watch: true } => {
            let client = client.clone();
            let poller = spawn_view_refresh(
                MESSAGES_REFRESH,
                move || {
                    let client = client.clone();
                    let email = email.clone();
                    async move { client.messages(&email).await }
                },
                |messages: Vec<Message>| {
                    if let Err(e) = print_json(&messages) {
                        tracing::warn!(error = %e, "failed to render messages");
                    }
                },
            );
            tokio::select! {
                signal = tokio::signal::ctrl_c() => signal?,
                () = poller.join() => return Err(CliError::SessionEnded),
            }
            Ok(())
        }
    }
}

async fn run_api_keys(session: &SessionStore, keys: ApiKeysCommand) -> Result<(), CliError> {
    let client = session.client();
    match keys.command {
        ApiKeysSubcommand::List => print_json(&client.api_keys().await?),
        ApiKeysSubcommand::Create { name } => print_json(&client.create_api_key(&name).await?),
        ApiKeysSubcommand::Delete { id } => {
            client.revoke_api_key(&id).await?;
            print_json(&json!({ "revoked": id }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
