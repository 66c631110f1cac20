// SPDX-License-Identifier: PMPL-1.0-or-later

//! i18n-lint: static checks for translation catalogs and HTML templates
//!
//! Catalogs are checked line by line, then against each other within their
//! directory, then against the templates that reference their keys.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use i18n_lint::report::{self, ReportOutputFormat, RunReport};
use i18n_lint::sink::{ErrorSink, NullSink, StdoutSink};
use i18n_lint::{pipeline, ValidationOptions, Validator};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "i18n-lint")]
#[command(version)]
#[command(about = "Static validation of i18n catalogs and HTML templates")]
#[command(long_about = None)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every catalog, their coherence, and the templates
    Check {
        #[command(flatten)]
        rules: RuleArgs,

        /// Catalog directory pattern (e.g. ./src/i18n/)
        #[arg(long)]
        catalog_dir: Option<String>,

        /// Template directory pattern (e.g. ./src/**/)
        #[arg(long)]
        template_dir: Option<String>,

        /// Skip the untranslated-text check in templates
        #[arg(long)]
        no_text_check: bool,

        /// Text that is allowed to stay untranslated (repeatable)
        #[arg(long = "exclude", value_name = "TEXT")]
        exclusions: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Validate a single catalog file
    File {
        /// Catalog file to validate
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct RuleArgs {
    /// Configuration file (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Warnings make the run invalid
    #[arg(long)]
    fail_on_warning: bool,

    /// Do not check that keys are sorted
    #[arg(long)]
    ignore_order: bool,

    /// Accept empty values
    #[arg(long)]
    ignore_empty_values: bool,

    /// Require keys to start with one of the configured prefixes
    #[arg(long)]
    enforce_key_prefixes: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (default: from the --output extension, else text)
    #[arg(short, long, value_enum)]
    format: Option<ReportOutputFormat>,

    /// Write the report to this file, or into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl OutputArgs {
    fn format(&self) -> ReportOutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(ReportOutputFormat::from_path))
            .unwrap_or(ReportOutputFormat::Text)
    }
}

impl RuleArgs {
    fn options(&self) -> Result<ValidationOptions> {
        let mut options = match &self.config {
            Some(path) => ValidationOptions::load(path)?,
            None => ValidationOptions::default(),
        };
        options.fail_on_warning |= self.fail_on_warning;
        options.ignore_order |= self.ignore_order;
        options.ignore_empty_values |= self.ignore_empty_values;
        options.enforce_key_prefixes |= self.enforce_key_prefixes;
        Ok(options)
    }
}

/// Run summaries are `info` records of this crate; everything else is quiet
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn,i18n_lint=info"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (outcome, output) = match cli.command {
        Commands::Check {
            rules,
            catalog_dir,
            template_dir,
            no_text_check,
            exclusions,
            output,
        } => {
            let mut options = rules.options()?;
            if let Some(dir) = catalog_dir {
                options.catalog_dir = dir;
            }
            if let Some(dir) = template_dir {
                options.template_dir = dir;
            }
            if no_text_check {
                options.check_templates = false;
            }
            options.exclusions.extend(exclusions);

            let mut stdout = StdoutSink;
            let mut null = NullSink;
            let sink = pick_sink(output.format(), &mut stdout, &mut null);
            let outcome = Validator::new(options).with_sink(sink).run()?;
            (outcome, output)
        }

        Commands::File {
            path,
            rules,
            output,
        } => {
            let options = rules.options()?.normalized();
            let mut stdout = StdoutSink;
            let mut null = NullSink;
            let sink = pick_sink(output.format(), &mut stdout, &mut null);
            let outcome = pipeline::validate_file(&options, &path, sink)?;
            (outcome, output)
        }
    };

    let run_report = RunReport::from_outcome(&outcome);
    let format = output.format();
    match &output.output {
        Some(target) => {
            if format == ReportOutputFormat::Text {
                report::print_summary(&run_report);
            }
            let path = format.destination(target);
            report::save_report(&run_report, format, &path)?;
            eprintln!("Report saved to: {}", path.display());
        }
        None if format == ReportOutputFormat::Text => report::print_summary(&run_report),
        None => println!("{}", format.serialize(&run_report)?),
    }

    Ok(if outcome.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Findings stream to stdout only in text mode; other formats own stdout
fn pick_sink<'a>(
    format: ReportOutputFormat,
    stdout: &'a mut StdoutSink,
    null: &'a mut NullSink,
) -> &'a mut dyn ErrorSink {
    match format {
        ReportOutputFormat::Text => stdout,
        _ => null,
    }
}
