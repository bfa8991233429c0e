mod api;
mod cli_messages;
mod config;
mod consts;
mod dashboard;
mod environment;
mod events;
mod export;
mod form;
mod logging;
mod terminal;
mod ui;

use crate::api::{ApiClient, PredictionApi};
use crate::config::{Config, get_config_path};
use crate::dashboard::Dashboard;
use crate::environment::{base_url_from_env, resolve_base_url};
use crate::export::{ExportError, ExportFormat};
use crate::form::{
    BMI, DIABETIC, FormController, GEN_HEALTH, HEART_DISEASE, Intent, MODEL_CHOICE, ModelChoice,
    PHYSICAL_ACTIVITY, PredictionForm, SEX, SMOKING, SubmissionOutcome,
};
use crate::terminal::TerminalSink;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{error::Error, io};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Prediction service URL. Overrides the config file and RISK_BASE_URL.
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Config file to use instead of ~/.risk-client/config.json
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the form locally and request a prediction
    Predict {
        /// Body mass index, in (0, 200]
        #[arg(long)]
        bmi: Option<String>,
        /// Age bracket such as "50-54" or "80 or older"
        #[arg(long)]
        age_category: Option<String>,
        #[arg(long)]
        sex: Option<String>,
        #[arg(long)]
        smoking: Option<String>,
        #[arg(long)]
        heart_disease: Option<String>,
        #[arg(long)]
        physical_activity: Option<String>,
        #[arg(long)]
        gen_health: Option<String>,
        /// Only asked from age 50 on
        #[arg(long)]
        diabetic: Option<String>,
        #[arg(long, value_enum)]
        model: Option<ModelChoice>,
    },
    /// Fetch the dashboard statistics
    Stats {
        /// Print the full dashboard snapshot, metrics table included
        #[arg(long)]
        print: bool,
    },
    /// Export the dashboard metrics table to a file
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,
        /// Directory the file is written to
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Open the interactive dashboard
    Dashboard {
        /// Disable background colors
        #[arg(long)]
        no_background: bool,
        /// Directory exports are written to
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Update the saved configuration and print it
    Config {
        /// Prediction service URL to save
        #[arg(long, value_name = "URL")]
        service_url: Option<String>,
        /// Model used when `predict` is run without `--model`
        #[arg(long, value_enum)]
        model: Option<ModelChoice>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}

/// Field values collected from the `predict` flags, in form order.
struct PredictArgs {
    values: Vec<(&'static str, Option<String>)>,
    age_category: Option<String>,
    model: Option<ModelChoice>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logging();

    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => Some(path),
        None => get_config_path().ok(),
    };
    let config = load_config(config_path.as_deref())?;

    if let Command::Config {
        service_url,
        model,
        timeout,
    } = args.command
    {
        let path = config_path.ok_or("Home directory not found")?;
        return save_config(config, &path, service_url, model, timeout);
    }

    let base_url = resolve_base_url(
        args.base_url.as_deref(),
        config.base_url.as_deref(),
        base_url_from_env().as_deref(),
    );
    log::debug!("Prediction service at {}", base_url);

    let client = ApiClient::new(base_url, config.request_timeout())?;
    let api: Arc<dyn PredictionApi> = Arc::new(client);

    match args.command {
        Command::Predict {
            bmi,
            age_category,
            sex,
            smoking,
            heart_disease,
            physical_activity,
            gen_health,
            diabetic,
            model,
        } => {
            let predict_args = PredictArgs {
                values: vec![
                    (HEART_DISEASE, heart_disease),
                    (BMI, bmi),
                    (SMOKING, smoking),
                    (SEX, sex),
                    (DIABETIC, diabetic),
                    (PHYSICAL_ACTIVITY, physical_activity),
                    (GEN_HEALTH, gen_health),
                ],
                age_category,
                model,
            };
            predict(api.as_ref(), predict_args, &config).await
        }
        Command::Stats { print } => stats(api, print).await,
        Command::Export { format, out_dir } => export(api, format, &out_dir).await,
        Command::Dashboard {
            no_background,
            out_dir,
        } => start_dashboard(api, out_dir, !no_background).await,
        Command::Config { .. } => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    Config::load_or_default(path)
        .map_err(|e| format!("Failed to load config {}: {}", path.display(), e).into())
}

/// Applies the given settings, saves them and prints the resulting file.
fn save_config(
    mut config: Config,
    path: &Path,
    service_url: Option<String>,
    model: Option<ModelChoice>,
    timeout: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let changed = service_url.is_some() || model.is_some() || timeout.is_some();
    if let Some(url) = service_url {
        config.base_url = Some(url);
    }
    if let Some(model) = model {
        config.model = Some(model.to_string());
    }
    if let Some(secs) = timeout {
        config.request_timeout_secs = Some(secs);
    }

    if changed {
        config
            .save(path)
            .map_err(|e| format!("Failed to save config {}: {}", path.display(), e))?;
        print_cmd_success!("Config saved", "{}", path.display());
    }
    println!("{}", config.to_json()?);
    Ok(())
}

/// Model from the flag, then the config file, then the default.
fn pick_model(flag: Option<ModelChoice>, config: &Config) -> ModelChoice {
    if let Some(model) = flag {
        return model;
    }
    match config.model.as_deref().map(str::parse::<ModelChoice>) {
        Some(Ok(model)) => model,
        Some(Err(_)) => {
            print_cmd_warn!("Ignoring configured model", "{:?}", config.model);
            ModelChoice::default()
        }
        None => ModelChoice::default(),
    }
}

/// Fills the form the way a user would, then submits it once.
async fn predict(
    api: &dyn PredictionApi,
    args: PredictArgs,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut sink = TerminalSink::new();
    let mut controller = FormController::new(PredictionForm::new(), &mut sink);

    // Each flag is typed into its field and then left, as a user tabbing through the form.
    let mut intents: Vec<Intent> = Vec::new();
    for (field, value) in args.values {
        if let Some(value) = value {
            intents.push(Intent::FieldChanged {
                field: field.to_string(),
                value,
            });
            intents.push(Intent::FieldBlurred {
                field: field.to_string(),
            });
        }
    }
    intents.push(Intent::FieldChanged {
        field: MODEL_CHOICE.to_string(),
        value: pick_model(args.model, config).to_string(),
    });
    // Age last so the age gate decides whether Diabetic is kept.
    if let Some(value) = args.age_category {
        intents.push(Intent::AgeChanged { value });
    }
    intents.push(Intent::FormSubmitted);

    let mut outcome = None;
    for intent in intents {
        outcome = controller.dispatch(intent, api, &mut sink).await;
    }

    match outcome {
        Some(outcome) if outcome.is_success() => Ok(()),
        Some(SubmissionOutcome::Invalid) => Err(Box::from("Form validation failed")),
        Some(other) => Err(Box::from(format!("Prediction failed: {}", other))),
        None => Err(Box::from("Form was not submitted")),
    }
}

async fn stats(api: Arc<dyn PredictionApi>, print: bool) -> Result<(), Box<dyn Error>> {
    let mut dashboard = Dashboard::new(api);
    dashboard
        .refresh()
        .await
        .map_err(|e| format!("Could not load stats: {}", e.user_message()))?;

    if print {
        print!("{}", dashboard.snapshot_text());
        return Ok(());
    }
    if let Some(cards) = dashboard.cards() {
        for card in cards.cards() {
            print_cmd_info!(card.label, "{}", card.value);
        }
    }
    Ok(())
}

async fn export(
    api: Arc<dyn PredictionApi>,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut dashboard = Dashboard::without_cards(api);
    // Without stats there is no table, which export reports below.
    if let Err(e) = dashboard.refresh().await {
        log::debug!("Exporting without stats: {}", e.user_message());
    }

    match dashboard
        .export(format)
        .and_then(|file| file.write_to(out_dir))
    {
        Ok(path) => {
            print_cmd_success!("Export complete", "{}", path.display());
            Ok(())
        }
        Err(ExportError::NothingToExport) => {
            print_cmd_warn!("Nothing to export", "");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Starts the interactive dashboard.
///
/// # Arguments
/// * `api` - Client for the prediction service.
/// * `out_dir` - Directory exports are written to.
/// * `with_background_color` - Whether to paint the dark background.
async fn start_dashboard(
    api: Arc<dyn PredictionApi>,
    out_dir: PathBuf,
    with_background_color: bool,
) -> Result<(), Box<dyn Error>> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Initialize the terminal with Crossterm backend.
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = ui::App::new(
        Dashboard::new(api),
        out_dir,
        ui::UIConfig::new(with_background_color),
    );
    let res = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}
