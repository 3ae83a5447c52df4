use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod format;

/// manifest-tool - Container Manifest Inspector
///
/// Fetches an image reference from an OCI registry and shows its index,
/// manifests and platforms, or the raw documents as JSON.
#[derive(Parser, Debug)]
#[command(name = "manifest-tool")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Control colored output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Talk to the registry over plain HTTP
    #[arg(long, global = true)]
    plain_http: bool,

    /// Registry username
    #[arg(long, global = true)]
    username: Option<String>,

    /// Registry password (ignored without --username)
    #[arg(long, global = true)]
    password: Option<String>,

    /// Docker config directory or file holding registry credentials
    #[arg(long, global = true)]
    docker_cfg: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "MANIFEST_TOOL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect an image reference
    Inspect {
        /// Image reference including a tag, e.g. alpine:3.19
        reference: String,
        /// Print the raw manifest documents as JSON
        #[arg(long)]
        raw: bool,
        /// Inline each image config in raw output (requires --raw)
        #[arg(long)]
        expand_config: bool,
    },
    /// Display version information
    Version,
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing(level: context::VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directives()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_inspect(
    overrides: context::CliOverrides,
    verbosity: context::VerbosityLevel,
    reference: &str,
    raw: bool,
    expand_config: bool,
) -> libmanifest::Result<()> {
    // Reject bad flags and untagged references before prompting or fetching
    let request = libmanifest::InspectRequest::new(reference, raw, expand_config)?;
    let ctx = context::AppContext::build(overrides, verbosity)?;
    commands::inspect::handle_inspect(&ctx, &request).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbosity = context::VerbosityLevel::from_flags(cli.verbose, cli.debug);
    init_tracing(verbosity);

    let result = match cli.command {
        Commands::Version => {
            commands::version::print_version();
            Ok(())
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Inspect {
            reference,
            raw,
            expand_config,
        } => {
            // Build context with precedence: defaults > config file > env vars > CLI flags
            let overrides = context::CliOverrides {
                color: cli.color,
                config: cli.config,
                insecure: cli.insecure,
                plain_http: cli.plain_http,
                username: cli.username,
                password: cli.password,
                docker_cfg: cli.docker_cfg,
            };
            run_inspect(overrides, verbosity, &reference, raw, expand_config).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            format::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
