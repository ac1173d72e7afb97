//! Process command - extract registry fields from a single visura file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use visura_core::{ExtractionInput, ExtractionResponse, VisuraExtractor};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input visura PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Declared content type (default: guessed from the file extension)
    #[arg(long)]
    content_type: Option<String>,

    /// Show confidence details
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON envelope
    Json,
    /// CSV row
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Content type declared for a file, guessed from its extension.
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read a file into an extraction input.
pub fn read_input(path: &Path, content_type: Option<&str>) -> anyhow::Result<ExtractionInput> {
    let data = fs::read(path)?;
    let content_type = content_type
        .map(str::to_string)
        .unwrap_or_else(|| guess_content_type(path));
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("visura.pdf");

    Ok(ExtractionInput::new(data, filename, content_type))
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    pb.set_message("Loading configuration...");
    let extractor = VisuraExtractor::from_config(&config)?;

    pb.set_message("Reading file...");
    let input = read_input(&args.input, args.content_type.as_deref())?;

    pb.set_message("Extracting fields...");
    let response = tokio::task::spawn_blocking(move || extractor.extract(&input)).await?;

    pb.finish_and_clear();

    let output = format_response(&response, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        if let Some(data) = &response.data {
            println!();
            println!(
                "{} Confidence: {}% ({})",
                style("ℹ").blue(),
                data.confidence.score,
                data.confidence.assessment
            );
            for (field, status) in &data.confidence.details {
                println!("   {}: {:?}", field, status);
            }
            println!(
                "{} Processing time: {}ms",
                style("ℹ").blue(),
                data.processing_time_ms
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    match &response.error {
        Some(error) => anyhow::bail!("{}: {}", error.code, error.message),
        None => Ok(()),
    }
}

/// Render a response in the requested format.
pub fn format_response(
    response: &ExtractionResponse,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Csv => format_csv(response),
        OutputFormat::Text => Ok(format_text(response)),
    }
}

/// CSV header shared by single-file output.
const CSV_HEADER: [&str; 8] = [
    "success",
    "partita_iva",
    "codice_ateco",
    "oggetto_sociale",
    "confidence",
    "method",
    "processing_time_ms",
    "error_code",
];

fn format_csv(response: &ExtractionResponse) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(response))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// One CSV row in [`CSV_HEADER`] order.
pub fn csv_row(response: &ExtractionResponse) -> [String; 8] {
    let data = response.data.as_ref();
    let field = |value: Option<&Option<String>>| value.and_then(|v| v.clone()).unwrap_or_default();

    [
        response.success.to_string(),
        field(data.map(|d| &d.partita_iva)),
        field(data.map(|d| &d.codice_ateco)),
        field(data.map(|d| &d.oggetto_sociale)),
        data.map(|d| d.confidence.score.to_string()).unwrap_or_default(),
        response.method.clone().unwrap_or_default(),
        data.map(|d| d.processing_time_ms.to_string()).unwrap_or_default(),
        response.error_code().map(|c| c.to_string()).unwrap_or_default(),
    ]
}

fn format_text(response: &ExtractionResponse) -> String {
    let mut output = String::new();

    let Some(data) = &response.data else {
        if let Some(error) = &response.error {
            output.push_str(&format!("Error: {} - {}\n", error.code, error.message));
            output.push_str(&format!("  {}\n", error.details));
        }
        return output;
    };

    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    output.push_str(&format!("Partita IVA:     {}\n", show(&data.partita_iva)));
    output.push_str(&format!("Codice ATECO:    {}\n", show(&data.codice_ateco)));
    output.push_str(&format!("Oggetto sociale: {}\n", show(&data.oggetto_sociale)));

    if let Some(registry) = &data.registry {
        output.push('\n');
        if let Some(name) = &registry.denominazione {
            output.push_str(&format!("Denominazione:   {}\n", name));
        }
        if let Some(form) = &registry.forma_giuridica {
            output.push_str(&format!("Forma giuridica: {}\n", form));
        }
        if let Some(sede) = &registry.sede_legale {
            output.push_str(&format!("Sede legale:     {} ({})\n", sede.comune, sede.provincia));
        }
        if let Some(pec) = &registry.pec {
            output.push_str(&format!("PEC:             {}\n", pec));
        }
        if let Some(rea) = &registry.numero_rea {
            output.push_str(&format!("Numero REA:      {}\n", rea));
        }
    }

    if let Some(details) = &data.ateco_details {
        output.push('\n');
        output.push_str(&format!("Settore:         {}\n", details.settore));
        if let Some(description) = &details.descrizione {
            output.push_str(&format!("Attività:        {}\n", description));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Confidence: {}% ({})\n",
        data.confidence.score, data.confidence.assessment
    ));
    if let Some(method) = &response.method {
        output.push_str(&format!("Method: {}\n", method));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use visura_core::error::{ErrorCode, InputError, VisuraError};

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("visura.pdf")), "application/pdf");
        assert_eq!(guess_content_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_content_type(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_failure_formats() {
        let response = ExtractionResponse::from_error(&VisuraError::from(InputError::EmptyFile));

        let text = format_response(&response, OutputFormat::Text).unwrap();
        assert!(text.starts_with("Error: EMPTY_FILE"));

        let row = csv_row(&response);
        assert_eq!(row[0], "false");
        assert_eq!(row[7], ErrorCode::EmptyFile.as_str());
    }
}
