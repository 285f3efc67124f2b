//! helmpush CLI - Helm plugin to push chart packages to Nexus

use clap::{ArgAction, Parser};
use helmpush_repo::{CredentialEnv, REPOSITORY_CONFIG_ENV};
use std::path::PathBuf;

mod commands;
mod error;
mod exit_codes;
mod logging;

const EXAMPLES: &str = "\
Examples:

  $ helm push mychart-0.1.0.tgz nexus-helm-host       # push .tgz from \"helm package\"
  $ helm push . nexus-helm-host                       # package and push chart directory
  $ helm push . --version=\"7c4d121\" nexus-helm-host   # override version in Chart.yaml
  $ helm push . https://my.chart.repo.com/repository/helm-host/   # push directly to a repository URL
";

#[derive(Parser)]
#[command(name = "helm push")]
#[command(bin_name = "helm push")]
#[command(author = "helmpush Contributors")]
#[command(about = "Helm plugin to push chart package to Nexus", long_about = None)]
#[command(after_help = EXAMPLES)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Chart directory or packaged chart (.tgz)
    chart: PathBuf,

    /// Name of a configured chart repository, or a repository URL
    repository: String,

    /// Override chart version pre-push
    #[arg(short = 'v', long)]
    version: Option<String>,

    /// Override HTTP basic auth username [$HELM_REPO_USERNAME]
    #[arg(short, long)]
    username: Option<String>,

    /// Override HTTP basic auth password [$HELM_REPO_PASSWORD]
    #[arg(short, long)]
    password: Option<String>,

    /// Replace a chart version that already exists in the repository
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    force: bool,

    /// Path to the Helm repository list
    #[arg(long, value_name = "PATH", env = REPOSITORY_CONFIG_ENV)]
    repository_config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.debug);

    let args = commands::push::PushArgs {
        chart: cli.chart,
        repository: cli.repository,
        version: cli.version,
        username: cli.username,
        password: cli.password,
        force: cli.force,
        repository_config: cli.repository_config,
    };

    let code = match commands::push::run(&args, CredentialEnv::from_process()) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    std::process::exit(code);
}
