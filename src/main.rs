use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use git_owl::cli::{Cli, Commands, ls_filter};
use git_owl::commands::check::CheckMode;
use git_owl::commands::pull::PullOptions;
use git_owl::errors::exit_code_for;
use git_owl::fs::LocalFs;
use git_owl::manifest::PathFilter;
use git_owl::output::{self, Verbosity};
use git_owl::vcs::git::GitCli;
use git_owl::{EXIT_OK, OwlContext, commands};
use std::io;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "GIT_OWL_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    output::set_verbosity(if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    });

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            output::error(&format!("{e:#}"));
            process::exit(exit_code_for(&e));
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    // a second init only happens in tests; ignore it
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn run(cli: Cli) -> Result<i32> {
    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(EXIT_OK);
    }

    let git = GitCli::new()?;
    let ctx = OwlContext::resolve(&git)?;
    let fs = LocalFs;

    match cli.command {
        Commands::Add { paths } => commands::add::execute(&ctx, &git, &fs, &paths)?,
        Commands::Check { missing, pattern } => {
            let mode = if missing {
                CheckMode::ExistenceOnly
            } else {
                CheckMode::Full {
                    filter: pattern.as_deref().map(PathFilter::new).transpose()?,
                }
            };
            let outcome = commands::check::execute(&ctx, &git, &fs, &mode)?;
            return Ok(outcome.exit_code());
        }
        Commands::Ls { all, missing } => {
            commands::ls::execute(&ctx, &git, ls_filter(all, missing))?;
        }
        Commands::Prepull => {
            commands::prepull::execute(&ctx, &fs)?;
        }
        Commands::Pull { source, dry_run } => {
            let options = PullOptions { source, dry_run };
            commands::pull::execute(&ctx, &git, &fs, &options)?;
        }
        Commands::Completion { .. } => {}
    }

    Ok(EXIT_OK)
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
