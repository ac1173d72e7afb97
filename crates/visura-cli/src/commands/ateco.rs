//! ATECO command - look up sector details for an activity code.

use clap::Args;
use console::style;

use visura_core::extraction::rules::validate_ateco;
use visura_core::models::FieldOutcome;
use visura_core::{AtecoEnricher, SectorEnricher};

use super::config::load_config;

/// Arguments for the ateco command.
#[derive(Args)]
pub struct AtecoArgs {
    /// Activity code (e.g. "62.01" or "62,01,00")
    #[arg(required = true)]
    code: String,

    /// Print JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

pub async fn run(args: AtecoArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let code = match validate_ateco(&args.code) {
        FieldOutcome::Valid(code) => code,
        FieldOutcome::Invalid(reason) => anyhow::bail!("Invalid codice ATECO: {}", reason),
        FieldOutcome::NotFound => anyhow::bail!("Invalid codice ATECO: {}", args.code),
    };

    let enricher = match &config.enrichment.mapping_file {
        Some(path) => SectorEnricher::from_file(path)?,
        None => SectorEnricher::new(),
    };

    let details = enricher
        .enrich(&code)
        .ok_or_else(|| anyhow::anyhow!("No details for codice ATECO {}", code))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{} {}", style("Codice ATECO:").bold(), details.codice);
    if let Some(description) = &details.descrizione {
        println!("{} {}", style("Descrizione:").bold(), description);
    }
    println!("{} {}", style("Settore:").bold(), details.settore);

    if !details.normative.is_empty() {
        println!();
        println!("{}", style("Normative:").bold());
        for item in &details.normative {
            println!("  - {}", item);
        }
    }

    if !details.certificazioni.is_empty() {
        println!();
        println!("{}", style("Certificazioni:").bold());
        for item in &details.certificazioni {
            println!("  - {}", item);
        }
    }

    Ok(())
}
