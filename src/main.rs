use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sekoia_setup::config::{read_config, CONFIG_FILE};
use sekoia_setup::settings::{parse_form, parse_form_json, to_form_fields, FormField};
use sekoia_setup::{DirectoryConfigService, Reconciler, SetupSettings};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_STORE: &str = "./sekoia-setup-store";

/// SEKOIA.IO setup - configure the feed input and the scheduled IOC lookups
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the configuration store
    #[arg(short, long, env = "SEKOIA_SETUP_STORE", default_value = DEFAULT_STORE)]
    store: PathBuf,

    /// Tool configuration file (defaults to sekoia-setup.json in the store)
    #[arg(short, long, env = "SEKOIA_SETUP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the jobs a setup run would install, without changing anything
    Plan(SettingsArgs),
    /// Apply the settings
    Apply(SettingsArgs),
    /// Print the settings currently applied, as form fields
    Show,
}

#[derive(clap::Args, Debug)]
struct SettingsArgs {
    /// Serialized setup form (JSON array of {name, value} pairs)
    #[arg(long)]
    form: Option<PathBuf>,

    /// SEKOIA.IO API key
    #[arg(long, env = "SEKOIA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Feed ID (empty for the default feed)
    #[arg(long, default_value = "")]
    feed_id: String,

    /// Root URL of the SEKOIA.IO API
    #[arg(long)]
    api_root_url: Option<String>,

    /// Proxy used by the modular input
    #[arg(long)]
    proxy_url: Option<String>,

    /// Lookup definition as <type>:<field>:<query>, repeatable
    /// Example: --lookup 'md5:file_hash:index=edr sourcetype=process'
    #[arg(long = "lookup")]
    lookups: Vec<String>,
}

impl SettingsArgs {
    async fn load(&self) -> anyhow::Result<SetupSettings> {
        let mut settings = match &self.form {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read form {}", path.display()))?;
                parse_form_json(&json)?
            }
            None => {
                let Some(api_key) = &self.api_key else {
                    bail!("Either --form or --api-key is required");
                };
                parse_form(&self.form_fields(api_key)?)?
            }
        };

        settings.feed.api_root_url = non_empty(&self.api_root_url);
        settings.feed.proxy_url = non_empty(&self.proxy_url);
        Ok(settings)
    }

    /// Lay the flags out as the setup form would serialize them, so both
    /// inputs go through the same validation
    fn form_fields(&self, api_key: &str) -> anyhow::Result<Vec<FormField>> {
        let mut fields = vec![
            FormField::new("api_key", api_key),
            FormField::new("feed_id", self.feed_id.clone()),
        ];

        for lookup in &self.lookups {
            let mut parts = lookup.splitn(3, ':');
            let (Some(ioc_type), Some(field), Some(query)) = (parts.next(), parts.next(), parts.next())
            else {
                bail!("Invalid lookup '{}': expected <type>:<field>:<query>", lookup);
            };

            fields.push(FormField::new("type", ioc_type));
            fields.push(FormField::new("search", query));
            fields.push(FormField::new("field", field));
        }

        Ok(fields)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse CLI arguments
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.store.join(CONFIG_FILE));
    let config = read_config(&config_path)
        .await
        .with_context(|| format!("Failed to read config {}", config_path.display()))?
        .unwrap_or_default();

    let service = Arc::new(DirectoryConfigService::new(&args.store));
    info!(store = %service.root().display(), "Using configuration store");

    let reconciler = Reconciler::new(service, config);
    info!(
        app = %reconciler.config().namespace.app,
        naming = ?reconciler.config().lookup_naming,
        "Loaded setup configuration"
    );

    match args.command {
        Command::Plan(settings_args) => {
            let settings = settings_args.load().await?;
            let plan = reconciler.plan(&settings)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Apply(settings_args) => {
            let settings = settings_args.load().await?;
            match reconciler.reconcile(&settings).await {
                Ok(result) => {
                    println!(
                        "Setup complete: {} lookup job(s), {} cleanup job(s), {} saved search(es) removed",
                        result.created_lookups.len(),
                        result.created_cleanups.len(),
                        result.deleted.len()
                    );
                }
                Err(e) => {
                    for message in e.display_messages() {
                        eprintln!("{}", message);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Show => {
            let settings = reconciler
                .current_settings()
                .await
                .map_err(|e| anyhow::anyhow!(e.display_messages().join("\n")))?;
            println!("{}", serde_json::to_string_pretty(&to_form_fields(&settings))?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
