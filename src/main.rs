//! Newsletter - A terminal MJML editor with live HTML preview.
//!
//! # Usage
//!
//! ```bash
//! newsletter
//! newsletter --watch weekly.mjml
//! newsletter --convert weekly.mjml -o newsletter.html
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use newsletter_creator::app::{App, DEFAULT_DEBOUNCE_MS};
use newsletter_creator::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use newsletter_creator::convert::{ConversionResult, Converter, ValidationLevel};
use newsletter_creator::highlight::{HighlightBackground, set_background_mode};

/// A terminal MJML editor with live HTML preview
#[derive(Parser, Debug)]
#[command(name = "newsletter", version, about, long_about = None)]
struct Cli {
    /// MJML file to edit (or convert; `-` reads stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Reload the source when the file changes on disk
    #[arg(short, long)]
    watch: bool,

    /// Directory that receives newsletter.html
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Quiet period after the last edit before converting
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// How strictly the MJML schema is checked
    #[arg(long, value_enum)]
    validation: Option<ValidationLevel>,

    /// Force the color theme (light or dark)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write debug logs to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Convert once without the editor and exit
    #[arg(long)]
    convert: bool,

    /// Where `--convert` writes the HTML (default: stdout)
    #[arg(short, long, value_name = "PATH", requires = "convert")]
    output: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if headless {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    // Without a subscriber, events from the interactive UI are dropped.
    Ok(())
}

fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read MJML from stdin")?;
            Ok(source)
        }
    }
}

fn run_headless(cli: &Cli, converter: &Converter) -> Result<ExitCode> {
    let source = read_source(cli.file.as_deref())?;
    match converter.convert(&source) {
        ConversionResult::Success { html, warnings } => {
            for warning in &warnings {
                eprintln!("warning: {warning}");
            }
            match &cli.output {
                Some(path) => std::fs::write(path, &html)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(html.as_bytes())?;
                    if !html.ends_with('\n') {
                        stdout.write_all(b"\n")?;
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        ConversionResult::Failure { message } => {
            eprintln!("error: {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> Result<ExitCode> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref(), cli.convert)?;
    tracing::debug!(?effective, "effective flags");

    let validation = effective.validation.unwrap_or_default();
    let converter = Converter::default().with_validation(validation);

    if cli.convert {
        return run_headless(&cli, &converter);
    }

    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_background_mode(None),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let mut app = App::new()
        .with_watch(effective.watch)
        .with_output_dir(effective.output_dir.unwrap_or_else(|| PathBuf::from(".")))
        .with_debounce_ms(effective.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
        .with_converter(converter)
        .with_config_paths(
            Some(global_path),
            if local_path.exists() {
                Some(local_path)
            } else {
                None
            },
        );

    if let Some(path) = cli.file {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let source = read_source(Some(&path))?;
        app = app.with_source(path, source);
    }

    app.run().context("Application error")?;
    Ok(ExitCode::SUCCESS)
}
