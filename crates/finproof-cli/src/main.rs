//! CLI entry point for finproof.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `finproof-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use finproof_app::{
    EXIT_USAGE, ExplainOutput, Validator, describe_error, error_exit_code, error_kind,
    keyring_from_env, load_config, parse_bundle, parse_certificate, parse_filing,
    replay_exit_code, run_explain, run_pack, run_replay, run_rulebook, run_verify_certificate,
    signer_from_env, status_exit_code,
};
use finproof_settings::{Overrides, ResolvedConfig, ToleranceSetting};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "finproof.toml";
const LOG_ENV: &str = "FINPROOF_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "finproof",
    version,
    about = "Deterministic rule evaluation and evidence certification for financial filings"
)]
struct Cli {
    /// Path to finproof config TOML (default: ./finproof.toml when present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Override the profile to run.
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override the run time budget, in milliseconds.
    #[arg(long, global = true)]
    time_budget_ms: Option<u64>,

    /// Override the arithmetic tolerance policy.
    #[arg(long, value_enum, global = true)]
    tolerance: Option<ToleranceArg>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ToleranceArg {
    CoarsestHalfUnit,
    AccumulatedHalfUnit,
}

impl From<ToleranceArg> for ToleranceSetting {
    fn from(arg: ToleranceArg) -> Self {
        match arg {
            ToleranceArg::CoarsestHalfUnit => ToleranceSetting::CoarsestHalfUnit,
            ToleranceArg::AccumulatedHalfUnit => ToleranceSetting::AccumulatedHalfUnit,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a filing and emit its report.
    Validate {
        /// Canonical filing JSON.
        filing: Utf8PathBuf,

        /// Where to write the JSON report (prints to stdout if not specified).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,

        /// Also write the trace as JSON Lines.
        #[arg(long)]
        trace_out: Option<Utf8PathBuf>,

        /// Also write the Markdown summary.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,
    },

    /// Validate several filings in parallel and print one JSON line per filing.
    Batch {
        #[arg(required = true)]
        filings: Vec<Utf8PathBuf>,
    },

    /// Validate a filing and write its evidence pack.
    Pack {
        filing: Utf8PathBuf,

        /// Directory receiving the pack.
        #[arg(long, default_value = "artifacts/finproof")]
        out_dir: Utf8PathBuf,
    },

    /// Replay a proof bundle against a filing.
    Replay {
        filing: Utf8PathBuf,

        /// Proof bundle JSON produced by `pack`.
        #[arg(long)]
        bundle: Utf8PathBuf,
    },

    /// Verify a certificate's signature with the configured key.
    VerifyCertificate { certificate: Utf8PathBuf },

    /// Explain a rule code or finding kind with remediation guidance.
    Explain {
        /// The rule code (e.g. "acct.balance_sheet_equation") or finding kind
        /// (e.g. "equation_imbalance") to explain.
        identifier: String,
    },

    /// Print the machine-readable rule catalog of the effective profile.
    Rulebook {
        /// List every registered rule instead.
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("finproof error [{}]: {}", error_kind(&err), describe_error(&err));
            error_exit_code(&err)
        }
    };
    std::process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Commands::Explain { ref identifier } => Ok(cmd_explain(identifier)),
        Commands::Validate {
            ref filing,
            ref out,
            ref trace_out,
            ref markdown_out,
        } => {
            let validator = validator(&cli)?;
            cmd_validate(
                &validator,
                filing,
                out.as_deref(),
                trace_out.as_deref(),
                markdown_out.as_deref(),
            )
        }
        Commands::Batch { ref filings } => cmd_batch(&validator(&cli)?, filings),
        Commands::Pack {
            ref filing,
            ref out_dir,
        } => cmd_pack(&validator(&cli)?, filing, out_dir),
        Commands::Replay {
            ref filing,
            ref bundle,
        } => cmd_replay(&validator(&cli)?, filing, bundle),
        Commands::VerifyCertificate { ref certificate } => {
            cmd_verify(&resolved_config(&cli)?, certificate)
        }
        Commands::Rulebook { all } => {
            let validator = validator(&cli)?;
            let profile = (!all).then(|| validator.config().profile.clone());
            let book = run_rulebook(&validator, profile.as_deref())?;
            print_json(&book)?;
            Ok(0)
        }
    }
}

fn resolved_config(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    let config_text = match &cli.config {
        Some(path) => read_text(path).context("read config")?,
        None if Utf8Path::new(DEFAULT_CONFIG).exists() => {
            read_text(Utf8Path::new(DEFAULT_CONFIG)).context("read config")?
        }
        None => String::new(),
    };
    let overrides = Overrides {
        profile: cli.profile.clone(),
        time_budget_ms: cli.time_budget_ms,
        tolerance: cli.tolerance.map(Into::into),
    };
    let config = load_config(&config_text, overrides)?;
    debug!(
        profile = %config.profile,
        rule_set_version = %config.rule_set_version,
        "resolved config"
    );
    Ok(config)
}

fn validator(cli: &Cli) -> anyhow::Result<Validator> {
    Validator::new(resolved_config(cli)?)
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn read_text(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {path}"))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut text = serde_json::to_string_pretty(value).context("serialize output")?;
    text.push('\n');
    Ok(text)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    print!("{}", to_json(value)?);
    Ok(())
}

fn cmd_validate(
    validator: &Validator,
    filing_path: &Utf8Path,
    out: Option<&Utf8Path>,
    trace_out: Option<&Utf8Path>,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let filing = parse_filing(&read_text(filing_path)?)?;
    let run = validator.validate(&filing)?;

    let report = to_json(&run.report)?;
    match out {
        Some(path) => write_text_file(path, &report)?,
        None => print!("{report}"),
    }
    if let Some(path) = trace_out {
        let trace = finproof_render::render_trace_jsonl(&run.trace).context("serialize trace")?;
        write_text_file(path, &trace)?;
    }
    if let Some(path) = markdown_out {
        write_text_file(path, &finproof_render::render_markdown(&run.report, &run.trace))?;
    }

    Ok(status_exit_code(run.report.status))
}

#[derive(Serialize)]
struct BatchLine<'a> {
    filing: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filing_hash: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Exits with the highest code of any filing, so one fatal error outranks every verdict.
fn cmd_batch(validator: &Validator, paths: &[Utf8PathBuf]) -> anyhow::Result<i32> {
    let documents = paths
        .iter()
        .map(|path| read_text(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let results = validator.validate_documents(&documents);

    let mut code = 0;
    for (path, result) in paths.iter().zip(&results) {
        let line = match result {
            Ok(run) => {
                code = code.max(status_exit_code(run.report.status));
                BatchLine {
                    filing: path.as_str(),
                    status: Some(run.report.status.as_str()),
                    filing_hash: Some(run.report.filing_hash.as_str()),
                    error: None,
                    message: None,
                }
            }
            Err(err) => {
                code = code.max(err.exit_code());
                BatchLine {
                    filing: path.as_str(),
                    status: None,
                    filing_hash: None,
                    error: Some(err.kind()),
                    message: Some(err.to_string()),
                }
            }
        };
        println!("{}", serde_json::to_string(&line).context("serialize batch line")?);
    }
    Ok(code)
}

fn cmd_pack(validator: &Validator, filing_path: &Utf8Path, out_dir: &Utf8Path) -> anyhow::Result<i32> {
    let filing = parse_filing(&read_text(filing_path)?)?;
    let signer = signer_from_env(&validator.config().signing, env_lookup)?;
    let output = run_pack(
        validator,
        &filing,
        out_dir,
        signer.as_ref(),
        OffsetDateTime::now_utc(),
    )?;

    print_json(&output.pack.manifest)?;
    if output.run.report.status == finproof_types::Status::Clean && !output.certified() {
        eprintln!(
            "finproof: no signing secret in ${}; pack written without a certificate",
            validator.config().signing.secret_env
        );
    }
    Ok(status_exit_code(output.run.report.status))
}

fn cmd_replay(validator: &Validator, filing_path: &Utf8Path, bundle_path: &Utf8Path) -> anyhow::Result<i32> {
    let bundle = parse_bundle(&read_text(bundle_path)?)?;
    let filing = parse_filing(&read_text(filing_path)?)?;
    let report = run_replay(validator, &bundle, &filing)?;
    print_json(&report)?;
    Ok(replay_exit_code(&report))
}

fn cmd_verify(config: &ResolvedConfig, cert_path: &Utf8Path) -> anyhow::Result<i32> {
    let cert = parse_certificate(&read_text(cert_path)?)?;
    let keyring = keyring_from_env(&config.signing, env_lookup)?;
    let report = run_verify_certificate(&cert, &keyring);
    print_json(&report)?;
    Ok(report.exit_code())
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", finproof_app::format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_codes,
            available_kinds,
        } => {
            eprint!(
                "{}",
                finproof_app::format_not_found(&identifier, available_rule_codes, available_kinds)
            );
            EXIT_USAGE
        }
    }
}
