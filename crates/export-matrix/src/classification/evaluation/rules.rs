use std::collections::BTreeSet;

use super::super::catalog::CriterionCatalog;
use super::super::domain::{CriterionId, SelectionMap};
use super::{resolver, EvaluationError, ScoreComponent};

/// Resolves a wire mapping into per-criterion components, in catalog order.
///
/// Keys outside the catalog are reported before missing ones so that stale rubric data is
/// never hidden behind a completeness failure.
pub(crate) fn score_selections(
    catalog: &CriterionCatalog,
    selections: &SelectionMap,
) -> Result<Vec<ScoreComponent>, EvaluationError> {
    let unexpected: Vec<String> = selections
        .keys()
        .filter(|key| {
            key.parse::<CriterionId>()
                .map(|id| !catalog.contains(id))
                .unwrap_or(true)
        })
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        return Err(EvaluationError::UnexpectedCriterion { unexpected });
    }

    let present: BTreeSet<CriterionId> = selections
        .keys()
        .filter_map(|key| key.parse::<CriterionId>().ok())
        .collect();
    let missing: Vec<CriterionId> = catalog
        .list_criteria()
        .iter()
        .map(|criterion| criterion.id)
        .filter(|id| !present.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(EvaluationError::Incomplete { missing });
    }

    let mut components = Vec::with_capacity(catalog.list_criteria().len());
    for criterion in catalog.list_criteria() {
        let label = selections.get(criterion.id.key()).ok_or_else(|| {
            EvaluationError::Incomplete {
                missing: vec![criterion.id],
            }
        })?;
        let score = resolver::score_for(catalog, criterion.id, label)?;
        components.push(ScoreComponent {
            criterion: criterion.id,
            option: label.clone(),
            score,
            maximum: criterion.maximum_score,
        });
    }

    Ok(components)
}

pub(crate) fn total_of(components: &[ScoreComponent]) -> u16 {
    components
        .iter()
        .map(|component| u16::from(component.score))
        .sum()
}
