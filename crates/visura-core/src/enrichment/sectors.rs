//! Prefix-based sector mapping.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AtecoDetails, AtecoEnricher, UNMAPPED_SECTOR};
use crate::extraction::rules::ateco::ateco_division;

/// One sector and the code divisions that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorRule {
    pub settore: String,
    /// Two-digit ATECO divisions.
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub normative: Vec<String>,
    #[serde(default)]
    pub certificazioni: Vec<String>,
}

/// Sector rules plus descriptions keyed by `DD.DD` class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorMapping {
    pub sectors: Vec<SectorRule>,
    pub descriptions: BTreeMap<String, String>,
}

fn rule(settore: &str, prefixes: &[&str], normative: &[&str], certificazioni: &[&str]) -> SectorRule {
    let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
    SectorRule {
        settore: settore.to_string(),
        prefixes: owned(prefixes),
        normative: owned(normative),
        certificazioni: owned(certificazioni),
    }
}

impl Default for SectorMapping {
    fn default() -> Self {
        let sectors = vec![
            rule(
                "chimico",
                &["20"],
                &["Regolamento REACH (CE) 1907/2006", "Regolamento CLP (CE) 1272/2008", "D.Lgs. 105/2015 (Seveso III)"],
                &["ISO 14001", "ISO 45001"],
            ),
            rule(
                "alimentare",
                &["10", "11"],
                &["Regolamento (CE) 852/2004 (HACCP)", "Regolamento (CE) 178/2002", "Regolamento (UE) 1169/2011"],
                &["ISO 22000", "BRCGS Food", "IFS Food"],
            ),
            rule(
                "sanitario",
                &["21", "86"],
                &["Regolamento (UE) 2017/745 (MDR)", "D.Lgs. 219/2006", "Legge 24/2017 (Gelli-Bianco)"],
                &["ISO 13485", "ISO 9001"],
            ),
            rule(
                "automotive",
                &["29", "45"],
                &["Regolamento (UE) 2018/858", "Direttiva 2000/53/CE (veicoli fuori uso)"],
                &["IATF 16949", "ISO 9001"],
            ),
            rule(
                "industriale",
                &["25", "28"],
                &["Direttiva Macchine 2006/42/CE", "D.Lgs. 81/2008"],
                &["ISO 9001", "ISO 45001", "ISO 3834"],
            ),
            rule(
                "ict",
                &["62"],
                &["Regolamento (UE) 2016/679 (GDPR)", "Direttiva (UE) 2022/2555 (NIS2)"],
                &["ISO/IEC 27001", "ISO 9001"],
            ),
            rule(
                "finance",
                &["64", "66"],
                &["D.Lgs. 385/1993 (TUB)", "D.Lgs. 58/1998 (TUF)", "D.Lgs. 231/2007 (antiriciclaggio)"],
                &["ISO/IEC 27001", "ISO 22301"],
            ),
        ];

        let descriptions = [
            ("62.01", "Produzione di software"),
            ("62.02", "Consulenza informatica"),
            ("62.03", "Gestione di strutture informatizzate"),
            ("62.09", "Altre attività dei servizi connessi alle tecnologie dell'informatica"),
            ("47.91", "Commercio al dettaglio per corrispondenza o Internet"),
            ("46.51", "Commercio all'ingrosso di computer e software"),
            ("68.31", "Attività di mediazione immobiliare"),
            ("70.22", "Consulenza imprenditoriale e gestionale"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            sectors,
            descriptions,
        }
    }
}

/// Enricher backed by a [`SectorMapping`].
#[derive(Debug, Clone, Default)]
pub struct SectorEnricher {
    mapping: SectorMapping,
}

impl SectorEnricher {
    /// Use the built-in mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mapping: SectorMapping) -> Self {
        Self { mapping }
    }

    /// Load a JSON mapping file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let mapping = serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        Ok(Self::with_mapping(mapping))
    }

    fn sector_for(&self, division: &str) -> Option<&SectorRule> {
        self.mapping
            .sectors
            .iter()
            .find(|rule| rule.prefixes.iter().any(|p| p == division))
    }
}

impl AtecoEnricher for SectorEnricher {
    fn enrich(&self, code: &str) -> Option<AtecoDetails> {
        let division = ateco_division(code)?;
        let class = code.get(..5).unwrap_or(code);
        let descrizione = self.mapping.descriptions.get(class).cloned();

        let details = match self.sector_for(division) {
            Some(rule) => AtecoDetails {
                codice: code.to_string(),
                descrizione,
                settore: rule.settore.clone(),
                normative: rule.normative.clone(),
                certificazioni: rule.certificazioni.clone(),
            },
            None => AtecoDetails {
                codice: code.to_string(),
                descrizione,
                settore: UNMAPPED_SECTOR.to_string(),
                normative: Vec::new(),
                certificazioni: Vec::new(),
            },
        };

        debug!("Enriched {} as sector {}", code, details.settore);
        Some(details)
    }
}
