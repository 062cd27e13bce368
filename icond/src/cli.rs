///
/// This module implements the CLI interface for icond: command parsing, summaries
/// for the user, and exit status.
///
/// All pipeline logic (normalization, naming, generation, bundling, publishing)
/// lives in the [`icond-core`] crate. This module only loads the config, builds
/// the default collaborators and reports what happened.
///
/// ## How To Use
/// - For command-line users: run the installed `icond` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`icond-core`]: ../../icond-core/
use crate::load_config::{load_config, write_config_template, DEFAULT_CONFIG_FILE};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use icond_core::bundle::EsbuildBundler;
use icond_core::changelog::update_changelog;
use icond_core::contract::PublishOptions;
use icond_core::convert::TypeScriptConverter;
use icond_core::fetch::FigmaExporter;
use icond_core::pipeline::{self, BuildReport};
use icond_core::publish::NpmPublisher;
use std::path::PathBuf;

/// CLI for icond: turn Figma icon components into a published TypeScript icon library.
#[derive(Parser)]
#[clap(
    name = "icond",
    version,
    about = "Fetch icons from Figma and publish them as a tree-shakable TypeScript icon library"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a starter config file
    Init {
        /// Where to write the config file
        #[clap(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Overwrite an existing config file
        #[clap(long, short)]
        force: bool,
    },
    /// Export icon components from Figma as SVG files
    Fetch {
        /// Path to the YAML config file
        #[clap(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Empty the SVG directory before exporting
        #[clap(long)]
        clean: bool,
    },
    /// Normalize the SVGs and build the icon library
    Build {
        /// Path to the YAML config file
        #[clap(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Empty the generated source directory before building
        #[clap(long)]
        clean: bool,
    },
    /// Publish the built icon library to the npm registry
    Publish {
        /// Path to the YAML config file
        #[clap(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Run npm without actually publishing
        #[clap(long)]
        dry_run: bool,
        /// Publish under this dist-tag
        #[clap(long)]
        tag: Option<String>,
    },
    /// Record icons added or removed since the last git tag in CHANGELOG.md
    Changelog {
        /// Path to the YAML config file
        #[clap(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

fn print_build_summary(report: &BuildReport) {
    let process = &report.process;
    println!(
        "Processed {} icon(s): {} recolored, {} renamed",
        process.assets.len(),
        process.files_recolored(),
        process.files_renamed()
    );
    println!(
        "Rewrote {} file(s), {} identifier(s) prefixed",
        report.rewrite.files_rewritten,
        report.rewrite.identifiers_renamed()
    );
    println!("Bundled {} artifact(s)", report.bundle.artifacts.len());
    for collision in &process.collisions {
        println!("  collision: {collision}");
    }
    for failure in process.failures.iter().chain(&report.rewrite.failures) {
        println!("  failed: {}: {}", failure.path.display(), failure.reason);
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Init { config, force } => {
            write_config_template(&config, force)?;
            tracing::info!(command = "init", path = %config.display(), "Config created");
            println!("Created {}", config.display());
            println!("Next: set FIGMA_TOKEN and figma.file_id, then run `icond fetch`");
            Ok(())
        }
        Commands::Fetch { config, clean } => {
            let config = load_config(config)?;
            tracing::info!(command = "fetch", "Starting export");
            let exporter = FigmaExporter::new(config.figma.clone(), config.svg_dir());
            let manifest = pipeline::fetch(&config, &exporter, clean)
                .await
                .context("Failed to fetch icons")?;
            println!(
                "Exported {} icon(s) to {}",
                manifest.files.len(),
                config.svg_dir().display()
            );
            Ok(())
        }
        Commands::Build { config, clean } => {
            let config = load_config(config)?;
            tracing::info!(command = "build", "Starting build");
            let converter = TypeScriptConverter::new(config.icon_generation.clone());
            let bundler = EsbuildBundler::new(config.build.clone());
            let report = pipeline::build(&config, &converter, &bundler, clean)
                .await
                .context("Failed to build library")?;
            print_build_summary(&report);
            if !report.is_clean() {
                tracing::error!(
                    command = "build",
                    collisions = report.process.collisions.len(),
                    failures = report.process.failures.len() + report.rewrite.failures.len(),
                    "Build finished with skipped files"
                );
                bail!("build finished, but some files were skipped (see above)");
            }
            println!("Built library to {}", config.dist_dir().display());
            Ok(())
        }
        Commands::Publish {
            config,
            dry_run,
            tag,
        } => {
            let config = load_config(config)?;
            tracing::info!(command = "publish", dry_run, "Starting publish");
            let publisher = NpmPublisher::new(config.publish.npm_bin.clone());
            let options = PublishOptions::from_config(&config.publish, tag, dry_run);
            let outcome = pipeline::publish(&config, &publisher, &options)
                .await
                .context("Failed to publish library")?;
            if outcome.dry_run {
                println!("Dry run complete for {}", config.library.name);
            } else {
                println!(
                    "Published {}@{}",
                    config.library.name, config.library.version
                );
            }
            Ok(())
        }
        Commands::Changelog { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "changelog", "Updating changelog");
            let diff = update_changelog(
                &config.root,
                &config.svg_dir(),
                &config.root.join("CHANGELOG.md"),
            )
            .await
            .context("Failed to update changelog")?;
            if diff.is_empty() {
                println!("No icon changes detected");
            } else {
                println!(
                    "Updated CHANGELOG.md: +{} added, -{} removed",
                    diff.added.len(),
                    diff.removed.len()
                );
            }
            Ok(())
        }
    }
}
