//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use contentforge_core::{
    GenerateConfig, GenerateOutcome, OpenAiGeneration, ProgressReporter, generate_article,
};
use contentforge_shared::{AppConfig, DraftStage, init_config, load_config, read_api_key};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ContentForge — competitor-aware SEO article generation.
#[derive(Parser)]
#[command(
    name = "contentforge",
    version,
    about = "Generate publication-ready Markdown articles from competitor research.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate an article for a topic.
    Generate {
        /// Article topic (also the search query).
        topic: String,

        /// Tone of voice for the article.
        #[arg(long, default_value = "Clear, direct, neutral, factual.")]
        tone: String,

        /// Audience context threaded into the outline prompt.
        #[arg(
            long,
            default_value = "Written for experienced professionals. Assume baseline domain knowledge."
        )]
        context: String,

        /// Content theme.
        #[arg(long, default_value = "Clarity, accuracy, practical understanding.")]
        theme: String,

        /// Audience persona for the article prompt.
        #[arg(
            long,
            default_value = "Senior practitioners, decision-makers, technical leaders"
        )]
        persona: String,

        /// Generation model (overrides config).
        #[arg(long)]
        model: Option<String>,

        /// Number of competitor pages to analyze (overrides config).
        #[arg(long)]
        competitors: Option<usize>,

        /// Write the final article to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Export the final article to Google Docs.
        #[arg(long)]
        export: bool,
    },

    /// Google Docs authentication management.
    Auth {
        /// Auth subcommand.
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Auth subcommands.
#[derive(Subcommand)]
pub(crate) enum AuthAction {
    /// Show whether Google Docs credentials are cached.
    Status,
    /// Remove cached Google Docs credentials.
    Logout,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "contentforge=info",
        1 => "contentforge=debug",
        _ => "contentforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            topic,
            tone,
            context,
            theme,
            persona,
            model,
            competitors,
            out,
            export,
        } => {
            cmd_generate(
                &topic,
                &tone,
                &context,
                &theme,
                &persona,
                model.as_deref(),
                competitors,
                out.as_deref(),
                export,
            )
            .await
        }
        Command::Auth { action } => match action {
            AuthAction::Status => cmd_auth_status().await,
            AuthAction::Logout => cmd_auth_logout().await,
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn cmd_generate(
    topic: &str,
    tone: &str,
    context: &str,
    theme: &str,
    persona: &str,
    model: Option<&str>,
    competitors: Option<usize>,
    out: Option<&std::path::Path>,
    export: bool,
) -> Result<()> {
    let config = load_config()?;

    // Validate API keys before doing anything
    let openai_key = read_api_key(&config.openai.api_key_env, "OpenAI")?;
    let serp_key = read_api_key(&config.serp.api_key_env, "SerpAPI")?;
    let entities_key = read_api_key(&config.entities.api_key_env, "TextRazor")?;

    let style = contentforge_style::StyleInputs {
        tonality: tone.to_string(),
        context: context.to_string(),
        theme: theme.to_string(),
        audience_persona: persona.to_string(),
        banned_words: config.style.banned_words.clone(),
    };

    let mut run_config = GenerateConfig::from_app_config(&config, topic, style);
    if let Some(model) = model {
        run_config.model = model.to_string();
    }
    if let Some(competitors) = competitors {
        run_config.competitor_count = competitors;
    }

    let serp = contentforge_search::SerpClient::new(serp_key)?;
    let embedder =
        contentforge_search::OpenAiEmbedder::new(&openai_key, &config.openai.embedding_model)?;
    let entity_client = contentforge_entities::TextRazorClient::new(entities_key)?;
    let generation = OpenAiGeneration::new(openai_key)?;

    info!(topic, model = %run_config.model, "generating article");

    let reporter = CliProgress::new();
    let outcome = generate_article(
        &run_config,
        &serp,
        &embedder,
        &entity_client,
        &generation,
        &reporter,
    )
    .await?;

    // Print summary
    println!();
    println!("  Article generated!");
    println!("  Run:         {}", outcome.run_id);
    println!("  Competitors: {}", outcome.selected.len());
    println!("  Entities:    {}", outcome.entities.len());
    println!("  Refactored:  {}", if outcome.refactored { "yes" } else { "no" });
    println!("  Words:       {}", outcome.article.word_count());
    println!("  Time:        {:.1}s", outcome.elapsed.as_secs_f64());
    println!();

    match out {
        Some(path) => {
            std::fs::write(path, &outcome.article.markdown)
                .map_err(|e| eyre!("failed to write '{}': {e}", path.display()))?;
            println!("  Saved to: {}", path.display());
        }
        None => {
            println!("{}", outcome.article.markdown);
        }
    }

    if export {
        export_to_docs(topic, &outcome).await?;
    }

    Ok(())
}

async fn export_to_docs(topic: &str, outcome: &GenerateOutcome) -> Result<()> {
    let http = reqwest::Client::new();
    let credentials = contentforge_export::load_credentials(&http).await?;
    let docs = contentforge_export::GoogleDocsClient::new()?;

    let exported = docs
        .create_document(&credentials, topic, &outcome.article.markdown)
        .await?;

    println!("  Exported to Google Docs: {}", exported.document_url);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_fetched(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching [{current}/{total}] {url}"));
    }

    fn stage_complete(&self, stage: DraftStage, _markdown: &str) {
        self.spinner.set_message(format!("Completed {stage:?} stage"));
    }

    fn done(&self, _outcome: &GenerateOutcome) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn cmd_auth_status() -> Result<()> {
    let path = contentforge_export::token_file_path()?;
    if contentforge_export::is_authenticated() {
        println!("Authenticated: token cached at {}", path.display());
    } else {
        println!(
            "Not authenticated: place a Google OAuth token file at {}",
            path.display()
        );
    }
    Ok(())
}

async fn cmd_auth_logout() -> Result<()> {
    contentforge_export::logout()?;
    println!("Cached Google credentials removed.");
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
