// crates/restrict-gate-cli/src/main.rs
// ============================================================================
// Module: Restrict Gate CLI Entry Point
// Description: Command dispatcher for offline access evaluation and config checks.
// Purpose: Provide a safe, localized CLI over the three access call sites.
// Dependencies: clap, restrict-gate-config, restrict-gate-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The Restrict Gate CLI evaluates rendering, search, and API decisions
//! against a JSON host fixture so operators can check how tagged content is
//! treated without a running site. Results are written to stdout as JSON;
//! all other user-facing strings are routed through the i18n catalog.
//! Fixture and config inputs are untrusted and read under hard size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use restrict_gate_config::ConfigSettingsStore;
use restrict_gate_config::RestrictGateConfig;
use restrict_gate_core::AccessAuditSink;
use restrict_gate_core::AccessDecision;
use restrict_gate_core::Action;
use restrict_gate_core::Collaborators;
use restrict_gate_core::ContentId;
use restrict_gate_core::FilterOutcome;
use restrict_gate_core::InMemoryHost;
use restrict_gate_core::Locale;
use restrict_gate_core::NoopAuditSink;
use restrict_gate_core::PermissionCatalog;
use restrict_gate_core::PermissionTag;
use restrict_gate_core::QueryContext;
use restrict_gate_core::QueryModifier;
use restrict_gate_core::RequestContext;
use restrict_gate_core::RestErrorBody;
use restrict_gate_core::RestOutcome;
use restrict_gate_core::RestrictEngine;
use restrict_gate_core::RestrictEngineConfig;
use restrict_gate_core::SettingsStore;
use restrict_gate_core::UserId;
use restrict_gate_core::i18n::set_locale;
use restrict_gate_core::t;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a host fixture file.
const MAX_FIXTURE_BYTES: usize = 4 * 1024 * 1024;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "RESTRICT_GATE_LANG";
/// Status reported for API responses that pass through unchanged.
const REST_ALLOWED_STATUS: u16 = 200;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "restrict-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `RESTRICT_GATE_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the permission tag catalog.
    Tags(TagsCommand),
    /// Decide how a content item renders for the fixture user.
    Render(RenderCommand),
    /// Compute the ids a search listing must exclude.
    Search(SearchCommand),
    /// Decide whether an API response for a content item is served.
    Rest(RestCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Inputs shared by every evaluation command.
#[derive(Args, Debug)]
struct SourceArgs {
    /// Path to the JSON host fixture.
    #[arg(long, value_name = "PATH")]
    fixture: PathBuf,
    /// Optional config file supplying settings, search scope, and audit sink.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Evaluate as this user id instead of the fixture's current user.
    #[arg(long, value_name = "ID")]
    user: Option<u64>,
}

/// Arguments for `tags`.
#[derive(Args, Debug)]
struct TagsCommand {
    /// Shared evaluation inputs.
    #[command(flatten)]
    source: SourceArgs,
}

/// Arguments for `render`.
#[derive(Args, Debug)]
struct RenderCommand {
    /// Shared evaluation inputs.
    #[command(flatten)]
    source: SourceArgs,
    /// Content item to render.
    #[arg(long, value_name = "ID")]
    content: u64,
    /// Request URI used as the login return path.
    #[arg(long, value_name = "URI", default_value = "/")]
    request_uri: String,
}

/// Arguments for `search`.
#[derive(Args, Debug)]
struct SearchCommand {
    /// Shared evaluation inputs.
    #[command(flatten)]
    source: SourceArgs,
    /// Search term; omit to evaluate a non-search listing.
    #[arg(long, value_name = "TERM")]
    term: Option<String>,
    /// Content types targeted by the query (repeatable; empty means any).
    #[arg(long = "content-type", value_name = "TYPE")]
    content_types: Vec<String>,
    /// Treat the query as an administrative request.
    #[arg(long, action = ArgAction::SetTrue)]
    admin: bool,
    /// Treat the query as an API request.
    #[arg(long, action = ArgAction::SetTrue)]
    rest: bool,
}

/// Arguments for `rest`.
#[derive(Args, Debug)]
struct RestCommand {
    /// Shared evaluation inputs.
    #[command(flatten)]
    source: SourceArgs,
    /// Content item requested through the API.
    #[arg(long, value_name = "ID")]
    content: u64,
    /// Treat the request as an administrative request.
    #[arg(long, action = ArgAction::SetTrue)]
    admin: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Restrict Gate configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to `restrict-gate.toml` or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Output of `tags`.
#[derive(Debug, Serialize)]
struct TagsReport {
    /// Catalog tags in sorted order.
    tags: Vec<PermissionTag>,
}

/// Output of `render`.
#[derive(Debug, Serialize)]
struct RenderReport {
    /// Evaluated content item.
    content_id: ContentId,
    /// Allow or deny.
    decision: AccessDecision,
    /// Rendering action to take.
    action: Action,
}

/// Output of `search`.
#[derive(Debug, Serialize)]
struct SearchReport {
    /// Filter outcome label.
    outcome: &'static str,
    /// Ids excluded from the listing.
    excluded: Vec<ContentId>,
}

/// Output of `rest`.
#[derive(Debug, Serialize)]
struct RestReport {
    /// Evaluated content item.
    content_id: ContentId,
    /// HTTP status the response is served with.
    status: u16,
    /// Replacement error body when denied.
    body: Option<RestErrorBody>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// I/O failure while reading.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Tags(command) => command_tags(&command),
        Commands::Render(command) => command_render(&command),
        Commands::Search(command) => command_search(&command),
        Commands::Rest(command) => command_rest(&command),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
    }
}

// ============================================================================
// SECTION: Evaluation Context
// ============================================================================

/// Loaded fixture plus optional configuration overrides.
struct EvalContext {
    /// Host fixture providing content, users, tags, and default settings.
    host: InMemoryHost,
    /// Settings from config; falls back to fixture settings when absent.
    settings: Option<ConfigSettingsStore>,
    /// Engine configuration.
    engine_config: RestrictEngineConfig,
    /// Audit sink for decisions.
    audit: Box<dyn AccessAuditSink>,
}

impl EvalContext {
    /// Loads the fixture and optional config named by `source`.
    fn load(source: &SourceArgs) -> CliResult<Self> {
        let mut host = read_fixture(&source.fixture)?;
        if let Some(user) = source.user {
            host.current_user = Some(UserId::new(user));
        }
        let Some(path) = source.config.as_deref() else {
            return Ok(Self {
                host,
                settings: None,
                engine_config: RestrictEngineConfig::default(),
                audit: Box::new(NoopAuditSink),
            });
        };
        let config = RestrictGateConfig::load(Some(path))
            .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
        let audit = config.audit.build_sink().map_err(|err| {
            CliError::new(t!(
                "audit.open_failed",
                path = config.audit.path.as_deref().unwrap_or_default(),
                error = err
            ))
        })?;
        Ok(Self {
            host,
            settings: Some(ConfigSettingsStore::new(&config)),
            engine_config: config.engine_config(),
            audit,
        })
    }

    /// Returns the settings store in effect.
    fn settings_store(&self) -> &dyn SettingsStore {
        match &self.settings {
            Some(store) => store,
            None => &self.host,
        }
    }

    /// Builds a request-scoped engine over the loaded stores.
    fn engine(
        &self,
    ) -> RestrictEngine<
        '_,
        InMemoryHost,
        InMemoryHost,
        InMemoryHost,
        dyn SettingsStore + '_,
        &dyn AccessAuditSink,
    > {
        RestrictEngine::new(
            Collaborators {
                content: &self.host,
                users: &self.host,
                tags: &self.host,
                settings: self.settings_store(),
            },
            &self.engine_config,
            self.audit.as_ref(),
        )
    }
}

/// Query modifier that records excluded ids.
#[derive(Default)]
struct ExcludedIds {
    /// Ids excluded by the filter.
    ids: BTreeSet<ContentId>,
}

impl QueryModifier for ExcludedIds {
    fn exclude_ids(&mut self, ids: &BTreeSet<ContentId>) {
        self.ids.extend(ids.iter().copied());
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `tags`.
fn command_tags(command: &TagsCommand) -> CliResult<ExitCode> {
    let context = EvalContext::load(&command.source)?;
    let catalog = PermissionCatalog::load(&context.host)
        .map_err(|err| CliError::new(t!("engine.failed", error = err)))?;
    write_json(&TagsReport {
        tags: catalog.tags().to_vec(),
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `render`.
fn command_render(command: &RenderCommand) -> CliResult<ExitCode> {
    let context = EvalContext::load(&command.source)?;
    let report = render_report(&context, command.content, &command.request_uri)?;
    write_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `search`.
fn command_search(command: &SearchCommand) -> CliResult<ExitCode> {
    let context = EvalContext::load(&command.source)?;
    let query = QueryContext {
        is_search: command.term.is_some(),
        content_types: command.content_types.clone(),
        is_admin: command.admin,
        is_rest_request: command.rest,
        search_term: command.term.clone(),
    };
    write_json(&search_report(&context, &query)?)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `rest`.
fn command_rest(command: &RestCommand) -> CliResult<ExitCode> {
    let context = EvalContext::load(&command.source)?;
    write_json(&rest_report(&context, command.content, command.admin)?)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = RestrictGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Evaluates the rendering call site.
fn render_report(context: &EvalContext, content: u64, request_uri: &str) -> CliResult<RenderReport> {
    let content_id = ContentId::new(content);
    let action = context
        .engine()
        .render(content_id, &RequestContext::front_end(request_uri))
        .map_err(|err| CliError::new(t!("engine.failed", error = err)))?;
    let decision =
        if action == Action::ServeContent { AccessDecision::Allow } else { AccessDecision::Deny };
    Ok(RenderReport {
        content_id,
        decision,
        action,
    })
}

/// Evaluates the search call site.
fn search_report(context: &EvalContext, query: &QueryContext) -> CliResult<SearchReport> {
    let mut modifier = ExcludedIds::default();
    let outcome = context
        .engine()
        .filter_query(query, &mut modifier)
        .map_err(|err| CliError::new(t!("engine.failed", error = err)))?;
    let label = match outcome {
        FilterOutcome::NotApplicable => "not_applicable",
        FilterOutcome::Suppressed => "suppressed",
        FilterOutcome::Applied(_) => "applied",
    };
    Ok(SearchReport {
        outcome: label,
        excluded: modifier.ids.into_iter().collect(),
    })
}

/// Evaluates the API call site.
fn rest_report(context: &EvalContext, content: u64, is_admin: bool) -> CliResult<RestReport> {
    let content_id = ContentId::new(content);
    let request = if is_admin { RequestContext::admin("") } else { RequestContext::front_end("") };
    let outcome = context
        .engine()
        .enforce_rest(content_id, &request)
        .map_err(|err| CliError::new(t!("engine.failed", error = err)))?;
    Ok(match outcome {
        RestOutcome::Allow => RestReport {
            content_id,
            status: REST_ALLOWED_STATUS,
            body: None,
        },
        RestOutcome::Deny(denial) => RestReport {
            content_id,
            status: denial.status,
            body: Some(denial.body),
        },
    })
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses a host fixture.
fn read_fixture(path: &Path) -> CliResult<InMemoryHost> {
    let bytes = read_bytes_with_limit(path, MAX_FIXTURE_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("fixture.read_failed", path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "fixture.too_large",
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("fixture.parse_failed", path = path.display(), error = err))
    })
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes the top-level help text to stdout.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help();
    write_stdout_line(&help.to_string()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a serializable report to stdout as one JSON line.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        _ => t!("output.stream.stderr"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
