//! Push command - package a chart and upload it to Nexus

use console::style;
use std::path::PathBuf;

use crate::error::Result;
use helmpush_core::{LoadedChart, PackagedChart};
use helmpush_repo::{
    ConfigFileLookup, CredentialEnv, CredentialOverrides, Destination, NexusClient, Resolver,
    Target, effective_version,
};

/// Everything the push needs from the command line
pub struct PushArgs {
    pub chart: PathBuf,
    pub repository: String,
    pub version: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub force: bool,
    pub repository_config: Option<PathBuf>,
}

/// Resolve, package, upload, classify
pub fn run(args: &PushArgs, env: CredentialEnv) -> Result<()> {
    let resolver = Resolver::new(ConfigFileLookup::new(args.repository_config.clone()), env);
    let overrides = CredentialOverrides {
        username: args.username.clone(),
        password: args.password.clone(),
    };
    let repo = resolver.resolve(&Target::parse(&args.repository), &overrides)?;
    let destination = Destination::parse(&repo.url)?;

    let mut chart = LoadedChart::load(&args.chart)?;
    let version = effective_version(args.version.as_deref(), chart.version()).to_string();
    if version != chart.version() {
        chart.set_version(version);
    }

    // Dropping `package` removes the scratch directory on every path out
    let package = PackagedChart::create(&chart)?;

    println!(
        "Pushing {} to {}...",
        style(package.file_name()).bold(),
        repo.name
    );

    let client = NexusClient::new(repo.credentials)?;
    let outcome = client.upload(&destination, package.path(), args.force)?;
    let status = outcome.into_result()?;

    tracing::debug!(status, "chart accepted");
    println!("{}", style("Done.").green());

    Ok(())
}

