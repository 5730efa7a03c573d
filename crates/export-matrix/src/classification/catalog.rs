use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{Criterion, CriterionId, ScoreOption};

pub const STANDARD_RUBRIC_VERSION: &str = "matriz-2024.1";

/// Catalog integrity and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("criterion '{0}' not found in catalog")]
    NotFound(String),
    #[error("unknown criterion '{0}'")]
    UnknownCriterion(String),
    #[error("option '{option}' is not valid for criterion '{criterion}'")]
    UnknownOption {
        criterion: CriterionId,
        option: String,
    },
    #[error("criterion '{0}' has more than one zero-scoring option and no default_option")]
    AmbiguousBaseline(CriterionId),
    #[error("invalid rubric: {0}")]
    Invalid(String),
    #[error("failed to read rubric file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed rubric document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable rubric definition shared by every evaluation in the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionCatalog {
    version: String,
    criteria: Vec<Criterion>,
}

#[derive(Debug, Deserialize)]
struct RubricDocument {
    version: String,
    criteria: Vec<Criterion>,
}

impl CriterionCatalog {
    pub fn new(version: impl Into<String>, criteria: Vec<Criterion>) -> Result<Self, CatalogError> {
        validate(&criteria)?;
        Ok(Self {
            version: version.into(),
            criteria,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: RubricDocument = serde_json::from_str(raw)?;
        Self::new(document.version, document.criteria)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            version = %catalog.version,
            "loaded rubric from file"
        );
        Ok(catalog)
    }

    /// Loads the rubric named by configuration, falling back to the built-in one.
    pub fn load(config: &crate::config::RubricConfig) -> Result<Self, CatalogError> {
        match &config.path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::standard()),
        }
    }

    /// The nine-criterion rubric used by the trade office.
    pub fn standard() -> Self {
        let criteria = vec![
            criterion(
                CriterionId::ExperienciaExportadora,
                "Experiencia exportadora",
                "Frecuencia con la que la empresa ha exportado en los últimos años.",
                &[("No", 0), ("Esporádica", 1), ("Ocasional", 2), ("Regular", 3)],
            ),
            criterion(
                CriterionId::CapacidadProductiva,
                "Capacidad productiva",
                "Capacidad para atender volúmenes adicionales de demanda externa.",
                &[("Insuficiente", 0), ("Baja", 1), ("Media", 2), ("Alta", 3)],
            ),
            criterion(
                CriterionId::Certificaciones,
                "Certificaciones de calidad",
                "Normas o certificaciones de calidad vigentes.",
                &[("Ninguna", 0), ("En trámite", 1), ("Sí", 2)],
            ),
            criterion(
                CriterionId::SitioWebMultilingue,
                "Sitio web en otros idiomas",
                "Presencia digital orientada a compradores del exterior.",
                &[("No", 0), ("Sí", 1)],
            ),
            criterion(
                CriterionId::MercadosDestino,
                "Mercados de destino identificados",
                "Cantidad de mercados externos identificados como objetivo.",
                &[("Ninguno", 0), ("1", 1), ("≥2", 2)],
            ),
            criterion(
                CriterionId::PersonalComercioExterior,
                "Personal de comercio exterior",
                "Personal capacitado para operaciones de comercio exterior.",
                &[("No", 0), ("Parcial", 1), ("Dedicado", 2)],
            ),
            criterion(
                CriterionId::ParticipacionFerias,
                "Participación en ferias internacionales",
                "Participación en ferias, rondas de negocios o misiones comerciales.",
                &[("No", 0), ("Sí", 1)],
            ),
            criterion(
                CriterionId::RegistroExportador,
                "Inscripción como exportador",
                "Alta en el registro de importadores y exportadores.",
                &[("No", 0), ("En trámite", 1), ("Sí", 2)],
            ),
            criterion(
                CriterionId::EstudioMercado,
                "Conocimiento del mercado objetivo",
                "Grado de conocimiento de la demanda y la competencia en destino.",
                &[("Desconocida", 0), ("Parcial", 1), ("Completa", 2)],
            ),
        ];

        Self {
            version: STANDARD_RUBRIC_VERSION.to_string(),
            criteria,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Criteria in display order. The order never changes for a loaded catalog.
    pub fn list_criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn get_criterion(&self, id: CriterionId) -> Result<&Criterion, CatalogError> {
        self.criteria
            .iter()
            .find(|criterion| criterion.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.key().to_string()))
    }

    pub fn contains(&self, id: CriterionId) -> bool {
        self.criteria.iter().any(|criterion| criterion.id == id)
    }

    pub fn maximum_possible_score(&self) -> u16 {
        self.criteria
            .iter()
            .map(|criterion| u16::from(criterion.maximum_score))
            .sum()
    }

    /// Option used to seed a criterion that has no prior selection.
    pub fn baseline_for(&self, id: CriterionId) -> Result<&ScoreOption, CatalogError> {
        let criterion = self.get_criterion(id)?;

        if let Some(label) = &criterion.default_option {
            return criterion
                .option(label)
                .ok_or_else(|| CatalogError::UnknownOption {
                    criterion: id,
                    option: label.clone(),
                });
        }

        let mut zero_scoring = criterion.options.iter().filter(|option| option.score == 0);
        match (zero_scoring.next(), zero_scoring.next()) {
            (Some(option), None) => Ok(option),
            (Some(_), Some(_)) => Err(CatalogError::AmbiguousBaseline(id)),
            (None, _) => criterion
                .options
                .first()
                .ok_or_else(|| CatalogError::Invalid(format!("criterion '{id}' has no options"))),
        }
    }
}

fn criterion(id: CriterionId, name: &str, description: &str, options: &[(&str, u8)]) -> Criterion {
    let options: Vec<ScoreOption> = options
        .iter()
        .map(|(label, score)| ScoreOption::new(*label, *score))
        .collect();
    let maximum_score = options.iter().map(|option| option.score).max().unwrap_or(0);

    Criterion {
        id,
        name: name.to_string(),
        description: description.to_string(),
        maximum_score,
        default_option: None,
        options,
    }
}

fn validate(criteria: &[Criterion]) -> Result<(), CatalogError> {
    if criteria.is_empty() {
        return Err(CatalogError::Invalid("rubric defines no criteria".to_string()));
    }

    let mut seen = BTreeSet::new();
    for criterion in criteria {
        let id = criterion.id;
        if !seen.insert(id) {
            return Err(CatalogError::Invalid(format!("criterion '{id}' is defined twice")));
        }
        if criterion.options.is_empty() {
            return Err(CatalogError::Invalid(format!("criterion '{id}' has no options")));
        }

        let mut labels = BTreeSet::new();
        for option in &criterion.options {
            if !labels.insert(option.label.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "criterion '{id}' repeats option '{}'",
                    option.label
                )));
            }
            if option.score > criterion.maximum_score {
                return Err(CatalogError::Invalid(format!(
                    "option '{}' of criterion '{id}' scores {} above the maximum {}",
                    option.label, option.score, criterion.maximum_score
                )));
            }
        }

        let highest = criterion
            .options
            .iter()
            .map(|option| option.score)
            .max()
            .unwrap_or(0);
        if highest != criterion.maximum_score {
            return Err(CatalogError::Invalid(format!(
                "criterion '{id}' declares maximum {} but its best option scores {highest}",
                criterion.maximum_score
            )));
        }

        if let Some(default) = &criterion.default_option {
            if !criterion.has_option(default) {
                return Err(CatalogError::Invalid(format!(
                    "default option '{default}' is not an option of criterion '{id}'"
                )));
            }
        }
    }

    let missing: Vec<&str> = CriterionId::ALL
        .into_iter()
        .filter(|id| !seen.contains(id))
        .map(CriterionId::key)
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::Invalid(format!(
            "rubric is missing criteria: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}
