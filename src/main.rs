use anyhow::Context;
use clap::Parser;
use content_columns::{compile, generate, manifest, Cli, Commands};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => {
            let result = generate(&args).context("failed to generate utility CSS")?;
            match &args.output {
                Some(path) => eprintln!(
                    "Wrote {} ({} candidates from {} files, {} utilities available)",
                    path.display(),
                    result.total_candidates,
                    result.total_files,
                    result.total_utilities
                ),
                None => print_stdout(&result.css)?,
            }
        }
        Commands::Compile(args) => {
            let result = compile(&args)
                .with_context(|| format!("failed to compile {}", args.stylesheet.display()))?;
            match &args.output {
                Some(path) => eprintln!("Wrote {}", path.display()),
                None => print_stdout(&result.css)?,
            }
        }
        Commands::Manifest(args) => {
            let json = manifest(&args).context("failed to build manifest")?;
            match &args.output {
                Some(path) => eprintln!("Wrote {}", path.display()),
                None => print_stdout(&format!("{}\n", json))?,
            }
        }
    }

    Ok(())
}

fn print_stdout(content: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|_| stdout.flush())
        .context("failed to write to stdout")
}
