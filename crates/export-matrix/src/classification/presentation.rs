//! Display tokens for category badges in the dashboard and classification matrix.

use serde::Serialize;

use super::domain::{CompanyId, CriterionId};
use super::evaluation::{Category, ScoreComponent};

pub const fn color_for(category: Category) -> &'static str {
    match category {
        Category::Exportadora => "#2E7D32",
        Category::PotencialExportadora => "#F9A825",
        Category::EtapaInicial => "#C62828",
    }
}

pub const fn text_color_for(category: Category) -> &'static str {
    match category {
        Category::Exportadora => "#FFFFFF",
        Category::PotencialExportadora => "#1F2937",
        Category::EtapaInicial => "#FFFFFF",
    }
}

pub const fn label_for(category: Category) -> &'static str {
    match category {
        Category::Exportadora => "Exportadora",
        Category::PotencialExportadora => "Potencial Exportadora",
        Category::EtapaInicial => "Etapa Inicial",
    }
}

/// Everything a view needs to render a category chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryBadge {
    pub label: &'static str,
    pub color: &'static str,
    pub text_color: &'static str,
}

impl From<Category> for CategoryBadge {
    fn from(category: Category) -> Self {
        Self {
            label: label_for(category),
            color: color_for(category),
            text_color: text_color_for(category),
        }
    }
}

/// Sanitized representation of a company's classification for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationView {
    pub company_id: CompanyId,
    pub rubric_version: String,
    pub state: &'static str,
    pub total_score: u16,
    pub maximum_score: u16,
    pub category: Category,
    pub badge: CategoryBadge,
    pub components: Vec<ScoreComponent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seeded: Vec<CriterionId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_distinct_tokens() {
        let colors: Vec<_> = Category::ALL.iter().map(|c| color_for(*c)).collect();
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn badge_bundles_label_and_colors() {
        let badge = CategoryBadge::from(Category::PotencialExportadora);
        assert_eq!(badge.label, "Potencial Exportadora");
        assert_eq!(badge.color, "#F9A825");
        assert_eq!(badge.text_color, "#1F2937");
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(Category::EtapaInicial.to_string(), "Etapa Inicial");
        assert_eq!(Category::Exportadora.to_string(), label_for(Category::Exportadora));
    }
}
