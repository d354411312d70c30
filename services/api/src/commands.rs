use crate::cli::ArtifactArgs;
use crate::infra::{load_context, resolve_artifacts};
use chrono::{DateTime, Local};
use clap::Args;
use loansphere::config::AppConfig;
use loansphere::error::AppError;
use loansphere::prediction::application::DEFAULT_CREDIT_SCORE;
use loansphere::prediction::router::EXPORT_FILE_NAME;
use loansphere::prediction::{
    BulkPredictions, BulkTable, HomeOwnership, LoanApplication, PredictionContext, Purpose, Term,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    #[arg(long)]
    pub(crate) current_loan_amount: f64,
    /// Short or Long
    #[arg(long)]
    pub(crate) term: Term,
    #[arg(long, default_value_t = DEFAULT_CREDIT_SCORE)]
    pub(crate) credit_score: u16,
    #[arg(long)]
    pub(crate) annual_income: f64,
    /// Own, Rent, Home Mortgage, or Have Mortgage
    #[arg(long)]
    pub(crate) home_ownership: HomeOwnership,
    /// Loan purpose label, e.g. "Debt Consolidation"
    #[arg(long)]
    pub(crate) purpose: Purpose,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) monthly_debt: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) years_of_credit_history: f64,
    #[arg(long, default_value_t = 0)]
    pub(crate) months_since_last_delinquent: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) number_of_open_accounts: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) number_of_credit_problems: u32,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) current_credit_balance: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) maximum_open_credit: f64,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

impl PredictArgs {
    fn application(&self) -> LoanApplication {
        LoanApplication {
            current_loan_amount: self.current_loan_amount,
            term: self.term,
            credit_score: self.credit_score,
            annual_income: self.annual_income,
            home_ownership: self.home_ownership,
            purpose: self.purpose,
            monthly_debt: self.monthly_debt,
            years_of_credit_history: self.years_of_credit_history,
            months_since_last_delinquent: self.months_since_last_delinquent,
            number_of_open_accounts: self.number_of_open_accounts,
            number_of_credit_problems: self.number_of_credit_problems,
            current_credit_balance: self.current_credit_balance,
            maximum_open_credit: self.maximum_open_credit,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BulkArgs {
    /// CSV file whose columns cover the model's feature schema
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination for the annotated export
    #[arg(long, default_value = EXPORT_FILE_NAME)]
    pub(crate) output: PathBuf,
    /// Number of annotated rows to print after the run
    #[arg(long, default_value_t = 5)]
    pub(crate) preview: usize,
    /// Print the run summary as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SummaryArgs {
    /// Print the overview as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

#[derive(Debug, Serialize)]
struct BulkRunReport {
    input: PathBuf,
    output: PathBuf,
    rows: usize,
    approved: usize,
    rejected: usize,
    generated_at: DateTime<Local>,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let context = context_for(&args.artifacts)?;
    let application = args.application();
    let decision = context.service().predict_one(&application)?;

    println!("{}", decision.summary());
    println!(
        "  term={} home_ownership={} purpose={} credit_score={}",
        application.term, application.home_ownership, application.purpose, application.credit_score
    );
    Ok(())
}

pub(crate) fn run_bulk(args: BulkArgs) -> Result<(), AppError> {
    let BulkArgs {
        input,
        output,
        preview,
        json,
        artifacts,
    } = args;

    let context = context_for(&artifacts)?;
    let table = BulkTable::from_path(&input)?;
    let predictions = context.service().predict_batch(table)?;

    let file = File::create(&output)?;
    predictions.write_csv(BufWriter::new(file))?;

    let report = BulkRunReport {
        input,
        output,
        rows: predictions.len(),
        approved: predictions.approved(),
        rejected: predictions.rejected(),
        generated_at: Local::now(),
    };

    if json {
        print_json(&report);
    } else {
        render_bulk_report(&report, &predictions, preview);
    }
    Ok(())
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let context = context_for(&args.artifacts)?;
    let overview = context.overview();
    let dataset = context.dataset();

    if args.json {
        print_json(&overview);
        return Ok(());
    }

    println!("Reference dataset");
    println!("  Total records  : {}", overview.total_records);
    println!("  Approved loans : {}", overview.approved_loans);
    println!("  Rejected loans : {}", dataset.rejected);
    if dataset.unrecognized > 0 {
        println!("  Unrecognized   : {}", dataset.unrecognized);
    }
    println!("\nModel: {} (classes {:?})", overview.model_type, overview.classes);
    for (index, name) in overview.feature_names.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, name);
    }
    Ok(())
}

fn context_for(overrides: &ArtifactArgs) -> Result<Arc<PredictionContext>, AppError> {
    let config = AppConfig::load()?;
    let artifacts = resolve_artifacts(
        config.artifacts,
        overrides.model.clone(),
        overrides.data.clone(),
    );
    load_context(&artifacts)
}

fn render_bulk_report(report: &BulkRunReport, predictions: &BulkPredictions, preview: usize) {
    println!(
        "Scored {} rows from {} ({} approved, {} not approved)",
        report.rows,
        report.input.display(),
        report.approved,
        report.rejected
    );
    println!("Export written to {}", report.output.display());

    let rows = predictions.preview(preview);
    if rows.is_empty() {
        return;
    }

    println!("\n{}", predictions.headers().join(" | "));
    for row in rows {
        println!("{}", row.join(" | "));
    }
    if predictions.len() > rows.len() {
        println!("... {} more rows", predictions.len() - rows.len());
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render JSON output: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_args_map_onto_application() {
        let args = PredictArgs {
            current_loan_amount: 12_000.0,
            term: Term::Short,
            credit_score: 710,
            annual_income: 58_000.0,
            home_ownership: HomeOwnership::Rent,
            purpose: Purpose::Other,
            monthly_debt: 640.0,
            years_of_credit_history: 11.0,
            months_since_last_delinquent: 0,
            number_of_open_accounts: 7,
            number_of_credit_problems: 0,
            current_credit_balance: 9_800.0,
            maximum_open_credit: 21_000.0,
            artifacts: ArtifactArgs::default(),
        };

        let application = args.application();
        assert_eq!(application.credit_score, 710);
        assert_eq!(application.term, Term::Short);
        assert!(application.validate().is_ok());
    }

    #[test]
    fn bulk_report_serializes_counts() {
        let report = BulkRunReport {
            input: PathBuf::from("uploads.csv"),
            output: PathBuf::from(EXPORT_FILE_NAME),
            rows: 4,
            approved: 2,
            rejected: 2,
            generated_at: Local::now(),
        };
        let value = serde_json::to_value(&report).expect("serializes");
        assert_eq!(value["rows"], 4);
        assert_eq!(value["output"], EXPORT_FILE_NAME);
    }
}
