//! Print or write the OpenAPI document as JSON.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use logistics_api::doc::ApiDoc;
use utoipa::OpenApi;

/// Export the logistics API OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Cli {
    /// Write to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialise OpenAPI document")?;

    match cli.output {
        Some(path) => std::fs::write(&path, document)
            .wrap_err_with(|| format!("write OpenAPI document to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{document}").wrap_err("write OpenAPI document to stdout")?;
        }
    }
    Ok(())
}
