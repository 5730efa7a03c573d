use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire representation exchanged with the persistence collaborator: criterion key to option label.
pub type SelectionMap = BTreeMap<String, String>;

/// Identifier wrapper for registered companies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of export-readiness criteria, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CriterionId {
    ExperienciaExportadora,
    CapacidadProductiva,
    Certificaciones,
    SitioWebMultilingue,
    MercadosDestino,
    PersonalComercioExterior,
    ParticipacionFerias,
    RegistroExportador,
    EstudioMercado,
}

impl CriterionId {
    pub const ALL: [CriterionId; 9] = [
        CriterionId::ExperienciaExportadora,
        CriterionId::CapacidadProductiva,
        CriterionId::Certificaciones,
        CriterionId::SitioWebMultilingue,
        CriterionId::MercadosDestino,
        CriterionId::PersonalComercioExterior,
        CriterionId::ParticipacionFerias,
        CriterionId::RegistroExportador,
        CriterionId::EstudioMercado,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            CriterionId::ExperienciaExportadora => "experiencia-exportadora",
            CriterionId::CapacidadProductiva => "capacidad-productiva",
            CriterionId::Certificaciones => "certificaciones",
            CriterionId::SitioWebMultilingue => "sitio-web-multilingue",
            CriterionId::MercadosDestino => "mercados-destino",
            CriterionId::PersonalComercioExterior => "personal-comercio-exterior",
            CriterionId::ParticipacionFerias => "participacion-ferias",
            CriterionId::RegistroExportador => "registro-exportador",
            CriterionId::EstudioMercado => "estudio-mercado",
        }
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raised when a string key does not name any rubric criterion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown criterion '{0}'")]
pub struct UnknownCriterionKey(pub String);

impl FromStr for CriterionId {
    type Err = UnknownCriterionKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CriterionId::ALL
            .into_iter()
            .find(|id| id.key() == value)
            .ok_or_else(|| UnknownCriterionKey(value.to_string()))
    }
}

/// One selectable answer for a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOption {
    pub label: String,
    pub score: u8,
}

impl ScoreOption {
    pub fn new(label: impl Into<String>, score: u8) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// One weighted dimension of the rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub maximum_score: u8,
    /// Explicit seed option, required when several options score zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_option: Option<String>,
    pub options: Vec<ScoreOption>,
}

impl Criterion {
    pub fn option(&self, label: &str) -> Option<&ScoreOption> {
        self.options.iter().find(|option| option.label == label)
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.option(label).is_some()
    }
}

/// The chosen option for one criterion. Only built after the label has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub criterion: CriterionId,
    pub option: String,
    pub score: u8,
}
