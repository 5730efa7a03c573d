use crate::infra::{parse_selection, InMemorySelectionStore};
use chrono::Local;
use clap::Args;
use export_matrix::classification::{
    BatchClassifier, ClassificationService, CompanyId, CriterionCatalog, CriterionId,
    EvaluationEngine, EvaluationOutcome, EvaluationSession, SelectionMap,
};
use export_matrix::config::AppConfig;
use export_matrix::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ClassifyArgs {
    /// Selection as criterion=option; repeat once per criterion
    #[arg(long = "select", value_parser = parse_selection)]
    pub(crate) selections: Vec<(String, String)>,
    /// CSV export with an `empresa` column followed by one column per criterion
    #[arg(long, conflicts_with = "selections")]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Company identifier used for the walkthrough
    #[arg(long, default_value = "demo-empresa")]
    pub(crate) company: String,
}

fn load_catalog() -> Result<Arc<CriterionCatalog>, AppError> {
    let config = AppConfig::load()?;
    Ok(Arc::new(CriterionCatalog::load(&config.rubric)?))
}

pub(crate) fn run_criteria() -> Result<(), AppError> {
    let catalog = load_catalog()?;
    render_catalog(&catalog);
    Ok(())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let engine = EvaluationEngine::new(load_catalog()?);

    if let Some(path) = args.csv {
        let entries = BatchClassifier::from_path(&engine, &path)?;
        println!("Classification of {} ({} companies)", path.display(), entries.len());
        for entry in entries {
            match entry.result {
                Ok(outcome) => println!(
                    "- {}: {}/{} {}",
                    entry.company_id, outcome.total_score, outcome.maximum_score, outcome.category
                ),
                Err(err) => println!("- {} (line {}): {}", entry.company_id, entry.line, err),
            }
        }
        return Ok(());
    }

    let selections: SelectionMap = args.selections.into_iter().collect();
    match engine.evaluate(&selections) {
        Ok(outcome) => render_outcome(&outcome),
        Err(err) => println!("Evaluation rejected: {err}"),
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = load_catalog()?;
    let store = Arc::new(InMemorySelectionStore::default());
    let service = ClassificationService::new(store.clone(), catalog);
    let company = CompanyId(args.company);

    println!("Export readiness matrix demo for {company}");
    let (mut session, report) = match service.open_session(&company).await {
        Ok(opened) => opened,
        Err(err) => {
            println!("  Unable to open evaluation: {err}");
            return Ok(());
        }
    };
    println!(
        "- Opened new evaluation, {} criteria seeded from baseline",
        report.seeded.len()
    );
    render_session(&session);

    let edits = [
        (CriterionId::ExperienciaExportadora, "Ocasional"),
        (CriterionId::CapacidadProductiva, "Alta"),
        (CriterionId::Certificaciones, "En trámite"),
        (CriterionId::MercadosDestino, "≥2"),
        (CriterionId::RegistroExportador, "Sí"),
        (CriterionId::EstudioMercado, "Parcial"),
    ];
    println!("\nApplying selections");
    for (criterion, label) in edits {
        if let Err(err) = session.set_selection(criterion, label) {
            println!("  {criterion}: rejected ({err})");
            continue;
        }
        println!(
            "  {criterion} -> {label} | total {}",
            session.current_total_score().unwrap_or_default()
        );
    }

    if let Err(err) = session.set_selection_key("experiencia-exportadora", "Tal vez") {
        println!("  experiencia-exportadora -> Tal vez rejected: {err}");
    }
    render_session(&session);

    match session.commit(store.as_ref()).await {
        Ok(()) => {
            let saved_at = session
                .last_saved_at()
                .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!("\nSaved evaluation ({}) at {saved_at}", session.state().label());
        }
        Err(err) => {
            println!("\nSave failed, evaluation left {}: {err}", session.state().label());
            return Ok(());
        }
    }

    let mut reopened = EvaluationSession::new(Arc::new(service.engine().clone()));
    let persisted = store.stored(&company);
    match reopened.load(company.clone(), persisted.as_ref()) {
        Ok(_) => println!(
            "Reloaded from store: total {} ({})",
            reopened.current_total_score().unwrap_or_default(),
            reopened
                .current_category()
                .map(|category| category.to_string())
                .unwrap_or_default()
        ),
        Err(err) => println!("Reload failed: {err}"),
    }

    Ok(())
}

fn render_catalog(catalog: &CriterionCatalog) {
    println!(
        "Rubric {} (maximum score {})",
        catalog.version(),
        catalog.maximum_possible_score()
    );
    for criterion in catalog.list_criteria() {
        println!(
            "\n{} [{}] max {}",
            criterion.name, criterion.id, criterion.maximum_score
        );
        if !criterion.description.is_empty() {
            println!("  {}", criterion.description);
        }
        for option in &criterion.options {
            println!("  - {} = {}", option.label, option.score);
        }
    }
}

fn render_session(session: &EvaluationSession) {
    match session.outcome() {
        Ok(outcome) => render_outcome(&outcome),
        Err(err) => println!("  Evaluation unavailable: {err}"),
    }
}

fn render_outcome(outcome: &EvaluationOutcome) {
    println!(
        "Score {}/{} -> {} (rubric {})",
        outcome.total_score, outcome.maximum_score, outcome.category, outcome.rubric_version
    );
    for component in &outcome.components {
        println!(
            "  - {}: {} ({}/{})",
            component.criterion, component.option, component.score, component.maximum
        );
    }
}
