//! Data model for a single visura extraction call.
//!
//! Everything here is created and dropped inside one call. The wire
//! envelope ([`ExtractionResponse`]) is the only shape callers serialize.

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::enrichment::AtecoDetails;
use crate::error::{ErrorCode, VisuraError};
use crate::pdf::BackendKind;

/// Raw upload handed to the pipeline.
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    /// PDF bytes.
    pub data: Vec<u8>,
    /// Size declared by the caller (e.g. the upload's content length).
    pub declared_size: u64,
    /// Original file name, used for logging only.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
}

impl ExtractionInput {
    /// Create an input whose declared size is the buffer length.
    pub fn new(
        data: Vec<u8>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            declared_size: data.len() as u64,
            data,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    /// Shorthand for an `application/pdf` input.
    pub fn pdf(data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self::new(data, filename, "application/pdf")
    }

    /// Override the declared size.
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = size;
        self
    }
}

/// Text recovered from a PDF and the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText {
    text: String,
    backend: Option<BackendKind>,
}

impl RawText {
    pub fn new(text: impl Into<String>, backend: BackendKind) -> Self {
        Self {
            text: text.into(),
            backend: Some(backend),
        }
    }

    /// Result of a selector run where every backend failed.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            backend: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn backend(&self) -> Option<BackendKind> {
        self.backend
    }

    /// Backend tag, `"none"` when no backend succeeded.
    pub fn backend_used(&self) -> &'static str {
        self.backend.map(|b| b.as_str()).unwrap_or("none")
    }
}

/// The three canonical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PartitaIva,
    CodiceAteco,
    OggettoSociale,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::PartitaIva, Field::CodiceAteco, Field::OggettoSociale];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PartitaIva => "partita_iva",
            Field::CodiceAteco => "codice_ateco",
            Field::OggettoSociale => "oggetto_sociale",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw capture for one field, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidate {
    pub field: Field,
    pub raw: Option<String>,
}

impl FieldCandidate {
    pub fn found(field: Field, raw: impl Into<String>) -> Self {
        Self {
            field,
            raw: Some(raw.into()),
        }
    }

    pub fn absent(field: Field) -> Self {
        Self { field, raw: None }
    }
}

/// Outcome of applying a field's acceptance rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Candidate satisfied the rule; holds the normalized value.
    Valid(String),
    /// Candidate was found but rejected; holds the reason.
    Invalid(String),
    /// No pattern matched.
    NotFound,
}

/// Status reported for a validated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Valid,
    InvalidFormat,
    NotFound,
}

/// A field after validation. The value is reachable only when valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedField {
    field: Field,
    outcome: FieldOutcome,
}

impl ValidatedField {
    pub fn new(field: Field, outcome: FieldOutcome) -> Self {
        Self { field, outcome }
    }

    pub fn not_found(field: Field) -> Self {
        Self::new(field, FieldOutcome::NotFound)
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn outcome(&self) -> &FieldOutcome {
        &self.outcome
    }

    pub fn value(&self) -> Option<&str> {
        match &self.outcome {
            FieldOutcome::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn status(&self) -> FieldStatus {
        match self.outcome {
            FieldOutcome::Valid(_) => FieldStatus::Valid,
            FieldOutcome::Invalid(_) => FieldStatus::InvalidFormat,
            FieldOutcome::NotFound => FieldStatus::NotFound,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, FieldOutcome::Valid(_))
    }
}

impl Serialize for ValidatedField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidatedField", 3)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("value", &self.value())?;
        state.serialize_field("status", &self.status())?;
        state.end()
    }
}

/// Per-field entry in the confidence details map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailStatus {
    Valid,
    InvalidOrMissing,
}

/// Discrete confidence over the three canonical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    /// One of 0, 33, 66, 100.
    pub score: u8,
    pub details: BTreeMap<Field, DetailStatus>,
    pub assessment: String,
}

/// Registered office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SedeLegale {
    pub comune: String,
    /// Two-letter province code.
    pub provincia: String,
}

/// Auxiliary registry fields resolved by the richer tier. Never scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denominazione: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forma_giuridica: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sede_legale: Option<SedeLegale>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pec: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_rea: Option<String>,
}

impl RegistryDetails {
    pub fn is_empty(&self) -> bool {
        self == &RegistryDetails::default()
    }
}

/// How a result was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMetadata {
    pub backend_used: String,
    pub tier_used: String,
    pub processing_time_ms: u64,
}

/// Full result of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub partita_iva: ValidatedField,
    pub codice_ateco: ValidatedField,
    pub oggetto_sociale: ValidatedField,
    pub confidence: ConfidenceScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistryDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ateco_details: Option<AtecoDetails>,
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// `"<tier>+<backend>"`.
    pub fn method(&self) -> String {
        format!("{}+{}", self.metadata.tier_used, self.metadata.backend_used)
    }

    pub fn fields(&self) -> [&ValidatedField; 3] {
        [&self.partita_iva, &self.codice_ateco, &self.oggetto_sociale]
    }
}

/// Successful payload of the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisuraData {
    pub partita_iva: Option<String>,
    pub codice_ateco: Option<String>,
    pub oggetto_sociale: Option<String>,
    pub confidence: ConfidenceScore,

    #[serde(flatten)]
    pub registry: Option<RegistryDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ateco_details: Option<AtecoDetails>,

    pub processing_time_ms: u64,
}

/// Failure payload of the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub details: String,
}

/// Wire envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<VisuraData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ExtractionResponse {
    pub fn success(result: &ExtractionResult) -> Self {
        let data = VisuraData {
            partita_iva: result.partita_iva.value().map(str::to_string),
            codice_ateco: result.codice_ateco.value().map(str::to_string),
            oggetto_sociale: result.oggetto_sociale.value().map(str::to_string),
            confidence: result.confidence.clone(),
            registry: result.registry.clone().filter(|r| !r.is_empty()),
            ateco_details: result.ateco_details.clone(),
            processing_time_ms: result.metadata.processing_time_ms,
        };

        Self {
            success: true,
            data: Some(data),
            method: Some(result.method()),
            error: None,
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            method: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
                details: details.into(),
            }),
        }
    }

    pub fn from_error(err: &VisuraError) -> Self {
        let code = err.code();
        let message = match code {
            ErrorCode::InvalidFileType => "Only PDF files are accepted",
            ErrorCode::FileTooLarge => "File exceeds the maximum accepted size",
            ErrorCode::EmptyFile => "File is empty",
            ErrorCode::ModuleNotAvailable => "No extraction module available",
            ErrorCode::ExtractionError => "Extraction failed",
        };
        Self::failure(code, message, err.to_string())
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }
}
