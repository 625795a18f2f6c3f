use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chatmark::{Config, Error};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "chatmark.toml";

#[derive(Parser)]
#[command(name = "chatmark")]
#[command(about = "Render chat-assistant markdown replies as PDF, Typst or JSON")]
struct Cli {
    /// Input file holding one reply, or `-` for stdin
    input: PathBuf,

    /// Output file (PDF defaults to the input name with .pdf, text formats to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
    format: Format,

    /// TOML config file (defaults to ./chatmark.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Pdf,
    Typst,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => Config::try_load(path)?,
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE)),
    };

    let text = read_input(&cli.input)?;

    let bytes = match cli.format {
        Format::Pdf => chatmark::markdown_to_pdf_with_config(&text, &config)?,
        Format::Typst => chatmark::markdown_to_typst_with_config(&text, &config).into_bytes(),
        Format::Json => chatmark::markdown_to_json(&text)?.into_bytes(),
    };

    match output_path(&cli) {
        Some(output) => {
            fs::write(&output, bytes).map_err(|source| Error::Io {
                path: output.clone(),
                source,
            })?;
            info!(path = %output.display(), "wrote output");
            println!("Created {}", output.display());
        }
        None => {
            print!("{}", String::from_utf8_lossy(&bytes));
        }
    }

    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String, Error> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    if is_stdin(path) {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(io_error)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(io_error)
    }
}

/// Where to write the result. `None` means stdout.
fn output_path(cli: &Cli) -> Option<PathBuf> {
    if let Some(output) = &cli.output {
        return Some(output.clone());
    }
    match cli.format {
        Format::Pdf if is_stdin(&cli.input) => Some(PathBuf::from("out.pdf")),
        Format::Pdf => Some(cli.input.with_extension("pdf")),
        Format::Typst | Format::Json => None,
    }
}
