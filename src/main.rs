use anyhow::Result;
use app_launcher::commands::{self, ConfigOverrides};
use app_launcher::runtime::RealRuntime;
use clap::Parser;
use std::path::PathBuf;

/// app-launcher - open a native iOS app from a visit, or send the user to the store.
///
/// The user agent decides whether anything happens at all: only iPhone, iPod
/// and iPad identifiers enable the launcher. The user's choice is remembered
/// for 90 days in the preference store.
///
/// Examples:
///   app-launcher --user-agent "iPhone" --url-scheme fb:// \
///     --app-store-url itms://itunes.apple.com/app/id284882215 --cookie-name fb_app run
#[derive(Parser, Debug)]
#[command(author, version = env!("APP_LAUNCHER_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Device identifier of the visitor (also via APP_LAUNCHER_USER_AGENT)
    #[arg(
        long = "user-agent",
        env = "APP_LAUNCHER_USER_AGENT",
        value_name = "UA",
        default_value = "",
        global = true
    )]
    user_agent: String,

    /// JSON launcher config; flags override its values
    #[arg(long = "config", short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Custom URL scheme of the app, e.g. fb://
    #[arg(long = "url-scheme", value_name = "URL", global = true)]
    url_scheme: Option<String>,

    /// Store page to fall back to when the app does not open
    #[arg(long = "app-store-url", value_name = "URL", global = true)]
    app_store_url: Option<String>,

    /// Name of the persisted preference entry
    #[arg(long = "cookie-name", value_name = "NAME", global = true)]
    cookie_name: Option<String>,

    /// Question asked on the first visit
    #[arg(long = "prompt-message", value_name = "TEXT", global = true)]
    prompt_message: Option<String>,

    /// Message shown before opening the app automatically
    #[arg(long = "auto-launch-message", value_name = "TEXT", global = true)]
    auto_launch_message: Option<String>,

    /// Delay after page load before any message, in milliseconds
    #[arg(long = "message-delay", value_name = "MS", global = true)]
    message_delay: Option<u64>,

    /// Preference file (overrides the default; also via APP_LAUNCHER_STORE)
    #[arg(long = "store", env = "APP_LAUNCHER_STORE", value_name = "FILE", global = true)]
    store: Option<PathBuf>,

    /// Print link activations and navigations instead of opening them
    #[arg(long = "print-only", global = true)]
    print_only: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the startup flow as a page visit would
    Run,

    /// Open the app now, ignoring the stored preference
    Launch,

    /// Ask again, ignoring the stored preference
    Prompt,

    /// Show the stored preference
    Status,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            url_scheme: self.url_scheme.clone(),
            app_store_url: self.app_store_url.clone(),
            cookie_name: self.cookie_name.clone(),
            prompt_message: self.prompt_message.clone(),
            auto_launch_message: self.auto_launch_message.clone(),
            message_delay_ms: self.message_delay,
            store_path: self.store.clone(),
        }
    }

    fn runtime(&self) -> RealRuntime {
        let runtime = RealRuntime::new(self.user_agent.clone());
        if self.print_only {
            runtime.print_only()
        } else {
            runtime
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = cli.runtime();
    let overrides = cli.overrides();

    match cli.command {
        Commands::Run => {
            commands::run(runtime, overrides).await?;
        }
        Commands::Launch => {
            commands::launch(runtime, overrides).await?;
        }
        Commands::Prompt => {
            commands::prompt(runtime, overrides).await?;
        }
        Commands::Status => {
            if let Some(preference) = commands::status(runtime, overrides)? {
                println!("{}", preference);
            }
        }
    }
    Ok(())
}
