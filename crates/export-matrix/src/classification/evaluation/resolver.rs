use super::super::catalog::{CatalogError, CriterionCatalog};
use super::super::domain::CriterionId;

/// Score of `label` for `criterion`, looked up in the immutable catalog.
pub(crate) fn score_for(
    catalog: &CriterionCatalog,
    criterion: CriterionId,
    label: &str,
) -> Result<u8, CatalogError> {
    if !catalog.contains(criterion) {
        return Err(CatalogError::UnknownCriterion(criterion.key().to_string()));
    }

    catalog
        .get_criterion(criterion)?
        .option(label)
        .map(|option| option.score)
        .ok_or_else(|| CatalogError::UnknownOption {
            criterion,
            option: label.to_string(),
        })
}

pub(crate) fn score_for_key(
    catalog: &CriterionCatalog,
    criterion: &str,
    label: &str,
) -> Result<u8, CatalogError> {
    let id: CriterionId = criterion
        .parse()
        .map_err(|_| CatalogError::UnknownCriterion(criterion.to_string()))?;
    score_for(catalog, id, label)
}
