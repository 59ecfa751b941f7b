//! CLI entry and dispatch.

use std::sync::Arc;

use academy_core::api::Gateway;
use academy_core::auth::TokenStore;
use academy_core::config;
use academy_core::session::SessionController;
use anyhow::{Context, Result};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "academy")]
#[command(version = "1.0")]
#[command(about = "Sandpaper Academy admin client")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with phone + OTP
    Login,

    /// Log out and clear the stored session
    Logout,

    /// Show the logged-in user
    Me,

    /// Show the admin dashboard
    Dashboard,

    /// Manage the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage student records
    Students {
        #[command(subcommand)]
        command: StudentCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Complete the profile required after first login
    Complete {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Male, Female or Others
        #[arg(long)]
        gender: String,
        #[arg(long)]
        address: String,
        /// 6-digit postal code
        #[arg(long)]
        pincode: String,
        #[arg(long)]
        qualification: String,
        /// Date of birth (DD/MM/YYYY)
        #[arg(long)]
        dob: String,
    },
}

#[derive(clap::Subcommand)]
enum UserCommands {
    /// List all users
    List,
    /// Show a specific user
    Show {
        #[arg(value_name = "USER_ID")]
        id: String,
    },
    /// Toggle a user's active status
    Toggle {
        #[arg(value_name = "USER_ID")]
        id: String,
    },
    /// Register a new user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum StudentCommands {
    /// Save student details for a user
    Save {
        #[arg(long)]
        user_id: u64,
        /// Male, Female or Others
        #[arg(long)]
        gender: String,
        /// Alternate contact email
        #[arg(long)]
        email: String,
        /// Alternate contact mobile (10 digits)
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        address: String,
        /// 6-digit postal code
        #[arg(long)]
        pincode: String,
        #[arg(long)]
        qualification: String,
        /// Date of birth (DD/MM/YYYY)
        #[arg(long)]
        dob: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config commands need no session or network.
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let config = config::Config::load().context("load config")?;
    tracing::debug!(base_url = %config.effective_base_url(), "using backend");

    let session = Arc::new(SessionController::new(TokenStore::open_default()));
    session.initialize().context("read persisted session")?;

    let gateway = Gateway::from_config(&config, session.token_cell());
    session.bind(&gateway);

    match cli.command {
        Commands::Login => commands::auth::login(&gateway, &session).await,
        Commands::Logout => commands::auth::logout(&gateway, &session).await,
        Commands::Me => commands::auth::me(&gateway, &session).await,

        Commands::Dashboard => commands::dashboard::show(&gateway, &session).await,

        Commands::Profile { command } => match command {
            ProfileCommands::Complete {
                name,
                email,
                gender,
                address,
                pincode,
                qualification,
                dob,
            } => {
                let form = academy_core::profile::ProfileForm {
                    name,
                    email,
                    gender,
                    address,
                    pincode,
                    qualification,
                    dob,
                };
                commands::profile::complete(&gateway, &session, form).await
            }
        },

        Commands::Users { command } => match command {
            UserCommands::List => commands::users::list(&gateway).await,
            UserCommands::Show { id } => commands::users::show(&gateway, &id).await,
            UserCommands::Toggle { id } => commands::users::toggle(&gateway, &id).await,
            UserCommands::Add {
                name,
                phone,
                email,
                role,
            } => commands::users::add(&gateway, name, phone, email, role).await,
        },

        Commands::Students { command } => match command {
            StudentCommands::Save {
                user_id,
                gender,
                email,
                mobile,
                address,
                pincode,
                qualification,
                dob,
            } => {
                let details = academy_core::students::StudentDetails {
                    user_id,
                    gender,
                    alt_mobile: mobile,
                    alt_email: email,
                    address,
                    pincode,
                    qualification,
                    dob,
                };
                commands::students::save(&gateway, &session, details).await
            }
        },

        Commands::Config { .. } => unreachable!("handled above"),
    }
}
