// File: mojito-cli/src/main.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

use mojito_common::models::User;
use mojito_core::api::HttpSocialApi;
use mojito_core::config::{AppConfig, ConfigOverrides};
use mojito_core::persistence::FileStorage;
use mojito_core::request::RequestOutcome;
use mojito_core::routes::{Route, NOT_FOUND_MESSAGE};
use mojito_core::{AppSession, DefaultHttpClient};

#[derive(Parser, Debug, Clone)]
#[command(name = "mojito")]
#[command(author, version, about = "Mojito - headless client for the mojito social feed")]
struct Args {
    /// Backend base URL (overrides MOJITO_BACKEND_URL / BACKENDURL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Where the session triple is stored
    #[arg(long)]
    storage_path: Option<PathBuf>,

    /// Timeout for each backend call, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Forget the user record on logout instead of keeping it in memory
    #[arg(long, default_value = "false")]
    clear_user_on_logout: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Show the stored session and the resulting startup state
    Status,
    /// Store a session (as returned by the backend's login endpoint)
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        avatar: String,
    },
    /// Forget the stored session
    Logout,
    /// Validate the stored token and print the home feed
    Feed,
    /// Resolve a path to the view it would mount
    Open { path: String },
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("mojito=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let overrides = ConfigOverrides {
        backend_url: args.backend_url.clone(),
        storage_path: args.storage_path.clone(),
        request_timeout_secs: args.timeout_secs,
        clear_user_on_logout: args.clear_user_on_logout.then_some(true),
    };
    let config = AppConfig::load(overrides).context("loading configuration")?;
    info!(
        "Mojito starting. backend={}, storage={}",
        config.backend_url,
        config.storage_path.display()
    );

    let storage = Arc::new(FileStorage::new(config.storage_path.clone()));
    let client = Arc::new(DefaultHttpClient::new(config.request_timeout)?);
    let api = Arc::new(HttpSocialApi::new(config.backend_url.clone(), client));
    let mut session = AppSession::from_config(&config, storage, api);

    match args.command {
        Command::Status => print_status(&session),
        Command::Login { token, username, avatar } => {
            session.login(User { token, username, avatar });
            print_status(&session);
        }
        Command::Logout => {
            session.logout();
            print_status(&session);
        }
        Command::Feed => run_feed(&mut session).await,
        Command::Open { path } => {
            let route = Route::resolve(&path);
            let logged_in = session.state().logged_in;
            println!("{} -> {:?} ({})", path, route, route.title());
            match route {
                Route::Home if !logged_in => println!("(guest landing page; log in to see your feed)"),
                Route::NotFound => println!("{}", NOT_FOUND_MESSAGE),
                _ => {}
            }
        }
    }

    session.shutdown();
    info!("Main finished. Goodbye!");
    Ok(())
}

fn print_status(session: &AppSession) {
    let state = session.state();
    match (state.logged_in, state.user.as_ref()) {
        (true, Some(user)) => println!("logged in as {} (avatar: {})", user.username, user.avatar),
        _ => println!("not logged in"),
    }
    match serde_json::to_string_pretty(&state) {
        Ok(json) => debug!("state: {}", json),
        Err(e) => error!("could not render state: {}", e),
    }
}

async fn run_feed(session: &mut AppSession) {
    if !session.state().logged_in {
        println!("not logged in; nothing to load");
        return;
    }

    session.start();
    session.navigate("/");

    if let Some(outcome) = session.token_check_settled().await {
        info!("token check finished: {:?}", outcome);
    }
    for message in session.state().flash_messages {
        println!("! {}", message);
    }
    // An expired token unmounts the feed along with the logout.
    match session.feed_settled().await {
        Some(RequestOutcome::Completed) => {}
        None => return,
        Some(other) => {
            println!("could not load the feed ({:?})", other);
            return;
        }
    }
    if let Some(view) = session.feed_view() {
        for line in view.to_lines() {
            println!("{}", line);
        }
    }
}
