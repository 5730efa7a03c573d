use std::fmt;

use serde::{Deserialize, Serialize};

use super::EvaluationError;

/// Minimum total for a company to be classified as an established exporter.
pub const EXPORTADORA_THRESHOLD: u16 = 12;
/// Minimum total for a company with export potential.
pub const POTENCIAL_EXPORTADORA_THRESHOLD: u16 = 6;

/// Export maturity tier. Variants are ordered from least to most mature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Etapa Inicial")]
    EtapaInicial,
    #[serde(rename = "Potencial Exportadora")]
    PotencialExportadora,
    #[serde(rename = "Exportadora")]
    Exportadora,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::EtapaInicial,
        Category::PotencialExportadora,
        Category::Exportadora,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::classification::presentation::label_for(*self))
    }
}

/// Threshold lookup for a total already known to be within range.
pub(crate) fn tier(total_score: u16) -> Category {
    if total_score >= EXPORTADORA_THRESHOLD {
        Category::Exportadora
    } else if total_score >= POTENCIAL_EXPORTADORA_THRESHOLD {
        Category::PotencialExportadora
    } else {
        Category::EtapaInicial
    }
}

pub(crate) fn category_for(total_score: i32, maximum: u16) -> Result<Category, EvaluationError> {
    if total_score < 0 || total_score > i32::from(maximum) {
        return Err(EvaluationError::InvalidScore {
            score: total_score,
            maximum,
        });
    }

    let total = u16::try_from(total_score).map_err(|_| EvaluationError::InvalidScore {
        score: total_score,
        maximum,
    })?;
    Ok(tier(total))
}
