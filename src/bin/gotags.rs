//! gotags CLI - print a sorted tags list for the Go sources under a directory.

use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use gotags::builder::GoTags;
use gotags::errors::{exit_code, GoTagsError};
use gotags::output::{write_tags, OutputFormat};
use gotags::walker::WalkOptions;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gotags")]
#[command(about = "Generate a sorted tags list for Go source trees")]
#[command(version)]
struct Cli {
    /// Root directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Skip files excluded by .gitignore and other ignore files
    #[arg(long)]
    respect_ignore: bool,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Log each indexed and skipped file
    #[arg(short, long)]
    verbose: bool,

    /// Print a completion script for the given shell and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "gotags", &mut std::io::stdout());
        return;
    }

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        if cli.json {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn run(cli: &Cli) -> Result<(), GoTagsError> {
    let options = WalkOptions {
        respect_ignore_files: cli.respect_ignore,
        include_hidden: !cli.skip_hidden,
        ..Default::default()
    };

    let result = GoTags::new(&cli.path).walk_options(options).run()?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Tags
    };

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    write_tags(&mut out, &result.tags, format)?;
    out.flush()?;

    Ok(())
}
