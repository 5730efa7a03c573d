//! Bulk classification of a CSV export: one company per row, one criterion per column.

use std::io::Read;
use std::path::Path;

use super::domain::{CompanyId, SelectionMap};
use super::evaluation::{EvaluationEngine, EvaluationError, EvaluationOutcome};

const COMPANY_COLUMNS: [&str; 2] = ["empresa", "company_id"];

#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("failed to read classification export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid classification CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("first column must be 'empresa' or 'company_id'")]
    MissingCompanyColumn,
}

/// Evaluation of one CSV row. `line` is the 1-based line number in the file.
#[derive(Debug)]
pub struct BatchEntry {
    pub line: u64,
    pub company_id: CompanyId,
    pub result: Result<EvaluationOutcome, EvaluationError>,
}

pub struct BatchClassifier;

impl BatchClassifier {
    pub fn from_path<P: AsRef<Path>>(
        engine: &EvaluationEngine,
        path: P,
    ) -> Result<Vec<BatchEntry>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(engine, file)
    }

    pub fn from_reader<R: Read>(
        engine: &EvaluationEngine,
        reader: R,
    ) -> Result<Vec<BatchEntry>, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let company_column = headers
            .get(0)
            .map(|name| name.to_ascii_lowercase())
            .filter(|name| COMPANY_COLUMNS.contains(&name.as_str()));
        if company_column.is_none() {
            return Err(BatchImportError::MissingCompanyColumn);
        }

        let mut entries = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let company_id = CompanyId(record.get(0).unwrap_or_default().to_string());

            // Blank cells are left out so the engine reports them as missing criteria.
            let selections: SelectionMap = headers
                .iter()
                .zip(record.iter())
                .skip(1)
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();

            entries.push(BatchEntry {
                line,
                company_id,
                result: engine.evaluate(&selections),
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::evaluation::Category;
    use std::io::Cursor;

    const HEADER: &str = "empresa,experiencia-exportadora,capacidad-productiva,certificaciones,sitio-web-multilingue,mercados-destino,personal-comercio-exterior,participacion-ferias,registro-exportador,estudio-mercado";

    #[test]
    fn classifies_each_row() {
        let csv = format!(
            "{HEADER}\nyerbatera-norte,Regular,Baja,Sí,Sí,Ninguno,Parcial,Sí,Sí,Completa\naserradero-sur,No,Baja,Ninguna,No,1,No,No,En trámite,Parcial\n"
        );
        let engine = EvaluationEngine::standard();

        let entries =
            BatchClassifier::from_reader(&engine, Cursor::new(csv)).expect("csv parses");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].company_id, CompanyId("yerbatera-norte".to_string()));
        assert_eq!(entries[0].line, 2);
        let first = entries[0].result.as_ref().expect("row evaluates");
        assert_eq!(first.total_score, 13);
        assert_eq!(first.category, Category::Exportadora);

        let second = entries[1].result.as_ref().expect("row evaluates");
        assert_eq!(second.total_score, 4);
        assert_eq!(second.category, Category::EtapaInicial);
    }

    #[test]
    fn blank_cells_surface_as_incomplete_rows() {
        let csv = format!("{HEADER}\nyerbatera-norte,Regular,,Sí,Sí,Ninguno,Parcial,Sí,Sí,Completa\n");
        let engine = EvaluationEngine::standard();

        let entries =
            BatchClassifier::from_reader(&engine, Cursor::new(csv)).expect("csv parses");

        match &entries[0].result {
            Err(EvaluationError::Incomplete { missing }) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].key(), "capacidad-productiva");
            }
            other => panic!("expected incomplete evaluation, got {other:?}"),
        }
    }

    #[test]
    fn requires_company_column_first() {
        let csv = "experiencia-exportadora,empresa\nNo,acme\n";
        let engine = EvaluationEngine::standard();

        let result = BatchClassifier::from_reader(&engine, Cursor::new(csv));

        assert!(matches!(result, Err(BatchImportError::MissingCompanyColumn)));
    }
}
