//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use deepresearch_core::sources::{fetch_url_text, read_query_file};
use deepresearch_core::{PipelineProgress, pipeline_from_config, render_markup, validate_query};
use deepresearch_shared::{AppConfig, init_config, load_config, load_config_from, validate_api_keys};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// DeepResearch — answer questions from live web context.
#[derive(Parser)]
#[command(
    name = "deepresearch",
    version,
    about = "Research a question on the web and draft an answer with an LLM.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.deepresearch/deepresearch.toml.
    #[arg(long, global = true, env = "DEEPRESEARCH_CONFIG")]
    pub config: Option<PathBuf>,

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
    /// Research a query and print the drafted answer.
    Ask {
        /// The question to research.
        query: Option<String>,

        /// Read the query from a text file.
        #[arg(short, long, conflicts_with_all = ["query", "url"])]
        file: Option<PathBuf>,

        /// Use the body of a web page as the query.
        #[arg(short, long, conflicts_with = "query")]
        url: Option<String>,

        /// Print the answer as returned by the model, without plain-text rendering.
        #[arg(long)]
        raw: bool,

        /// Print the final pipeline state as JSON.
        #[arg(long, conflicts_with = "raw")]
        json: bool,
    },

    /// Render a Markdown file (or stdin) as plain text.
    Render {
        /// Markdown file to render. Reads stdin when omitted.
        path: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
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

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout only
/// carries the answer.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "deepresearch=warn",
        1 => "deepresearch=info",
        2 => "deepresearch=debug",
        _ => "deepresearch=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Ask {
            query,
            file,
            url,
            raw,
            json,
        } => {
            let source = QuerySource::from_args(query, file, url)?;
            let output = if json {
                OutputMode::Json
            } else if raw {
                OutputMode::Raw
            } else {
                OutputMode::Plain
            };
            cmd_ask(config_path, source, output).await
        }
        Command::Render { path } => cmd_render(path.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load config from an explicit path or the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// ask
// ---------------------------------------------------------------------------

/// Where the query text comes from.
#[derive(Debug, PartialEq, Eq)]
enum QuerySource {
    Text(String),
    File(PathBuf),
    Url(Url),
}

impl QuerySource {
    fn from_args(query: Option<String>, file: Option<PathBuf>, url: Option<String>) -> Result<Self> {
        match (query, file, url) {
            (Some(q), None, None) => Ok(Self::Text(q)),
            (None, Some(f), None) => Ok(Self::File(f)),
            (None, None, Some(u)) => {
                let parsed = Url::parse(&u).map_err(|e| eyre!("invalid URL '{u}': {e}"))?;
                Ok(Self::Url(parsed))
            }
            (None, None, None) => Err(eyre!("please enter a query (or pass --file / --url)")),
            _ => Err(eyre!("pass only one of QUERY, --file, or --url")),
        }
    }

    async fn load(self, config: &AppConfig) -> Result<String> {
        let text = match self {
            Self::Text(q) => q,
            Self::File(path) => read_query_file(&path)?,
            Self::Url(url) => fetch_url_text(&url, config.http.timeout_secs).await?,
        };
        Ok(text)
    }
}

/// How the result of `ask` is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Plain,
    Raw,
    Json,
}

async fn cmd_ask(config_path: Option<&Path>, source: QuerySource, output: OutputMode) -> Result<()> {
    let config = resolve_config(config_path)?;
    validate_api_keys(&config)?;

    let query = source.load(&config).await?;
    // Reject before building any clients.
    validate_query(&query)?;

    let pipeline = pipeline_from_config(&config)?;
    info!(query_len = query.len(), "researching query");

    let reporter = CliProgress::new();
    let result = pipeline.run_state(&query, &reporter).await;
    reporter.finish();
    let state = result?;

    match output {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&state)?),
        OutputMode::Raw | OutputMode::Plain => {
            let answer = state
                .answer
                .ok_or_else(|| eyre!("pipeline finished without an answer"))?;
            if output == OutputMode::Raw {
                println!("{answer}");
            } else {
                println!("{}", render_markup(&answer));
            }
        }
    }

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
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl PipelineProgress for CliProgress {
    fn stage_started(&self, name: &str) {
        let msg = match name {
            "research" => "Researching the web".to_string(),
            "draft" => "Drafting answer".to_string(),
            other => format!("Running {other}"),
        };
        self.spinner.set_message(msg);
    }

    fn stage_finished(&self, name: &str) {
        self.spinner.println(format!("  done: {name}"));
    }
}

// ---------------------------------------------------------------------------
// render / config
// ---------------------------------------------------------------------------

fn cmd_render(path: Option<&Path>) -> Result<()> {
    let markdown = match path {
        Some(p) => read_query_file(p)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    println!("{}", render_markup(&markdown));
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_parses_positional_query() {
        let cli = Cli::try_parse_from(["deepresearch", "ask", "what is rust"]).unwrap();
        match cli.command {
            Command::Ask { query, raw, json, .. } => {
                assert_eq!(query.as_deref(), Some("what is rust"));
                assert!(!raw && !json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn ask_rejects_query_and_file_together() {
        let result = Cli::try_parse_from(["deepresearch", "ask", "q", "--file", "x.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn query_source_requires_something() {
        assert!(QuerySource::from_args(None, None, None).is_err());
    }

    #[test]
    fn query_source_parses_url() {
        let source =
            QuerySource::from_args(None, None, Some("https://example.com/a".into())).unwrap();
        assert_eq!(
            source,
            QuerySource::Url(Url::parse("https://example.com/a").unwrap())
        );
        assert!(QuerySource::from_args(None, None, Some("not a url".into())).is_err());
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["deepresearch", "render", "-vv", "--log-format", "json"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
    }
}
