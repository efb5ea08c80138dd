use crate::infra::{InMemoryCustomerRepository, InMemoryLoanRepository};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use creditline::error::AppError;
use creditline::lending::{
    CustomerIngest, CustomerRegistration, HistoricalLoan, LedgerImporter, LendingService, LoanId,
    LoanIngest, LoanProposal, LoanRepository, LoanStatus, PolicyConfig,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// Customer ledger CSV export
    #[arg(long)]
    pub(crate) customers_csv: PathBuf,
    /// Loan ledger CSV export (requires the customer export for owner lookups)
    #[arg(long)]
    pub(crate) loans_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Customer ledger CSV to seed the demo instead of the built-in sample
    #[arg(long)]
    pub(crate) customers_csv: Option<PathBuf>,
    /// Loan ledger CSV to seed the demo alongside the customer export
    #[arg(long, requires = "customers_csv")]
    pub(crate) loans_csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct IngestReport {
    customers: CustomerIngest,
    #[serde(skip_serializing_if = "Option::is_none")]
    loans: Option<LoanIngest>,
}

/// Dry-run validation of ledger exports: imports into throwaway in-memory
/// repositories and prints the counters.
pub(crate) fn run_ingest_check(args: IngestArgs) -> Result<(), AppError> {
    let IngestArgs {
        customers_csv,
        loans_csv,
    } = args;

    let customers = InMemoryCustomerRepository::default();
    let loans = InMemoryLoanRepository::default();

    let customer_report = LedgerImporter::customers_from_path(&customers_csv, &customers)?;
    let loan_report = match loans_csv {
        Some(path) => Some(LedgerImporter::loans_from_path(&path, &customers, &loans)?),
        None => None,
    };

    let report = IngestReport {
        customers: customer_report,
        loans: loan_report,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("ingest report unavailable: {err}"),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        customers_csv,
        loans_csv,
    } = args;

    println!("Loan eligibility demo");

    let customers = Arc::new(InMemoryCustomerRepository::default());
    let loans = Arc::new(InMemoryLoanRepository::default());
    let service = LendingService::new(customers.clone(), loans.clone(), PolicyConfig::default());

    if let Some(path) = customers_csv {
        let report = LedgerImporter::customers_from_path(&path, &*customers)?;
        println!(
            "Seeded {} customers ({} updated, {} rejected) from {}",
            report.created,
            report.updated,
            report.rejected,
            path.display()
        );
        service.advance_sequences(report.highest_id, 0);

        if let Some(path) = loans_csv {
            let report = LedgerImporter::loans_from_path(&path, &*customers, &*loans)?;
            println!(
                "Seeded {} loans ({} skipped, {} rejected) from {}",
                report.created,
                report.skipped_unknown_customer,
                report.rejected,
                path.display()
            );
            service.advance_sequences(0, report.highest_id);
        }
    }

    println!("\nRegistration");
    let customer = match service.register_customer(sample_registration()) {
        Ok(view) => view,
        Err(err) => {
            println!("  Registration rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Registered {} (customer {}) with approved limit {:.0}",
        customer.name, customer.customer_id.0, customer.approved_limit
    );

    println!("\nSeeding repayment history");
    for loan in sample_history(customer.customer_id.0) {
        let label = loan.status.label();
        let loan_id = loan.loan_id.0;
        match loans.insert(loan) {
            Ok(stored) => println!(
                "- Loan {} for {:.0} over {} months ({label})",
                stored.loan_id.0, stored.amount, stored.tenure
            ),
            Err(err) => println!("- Loan {loan_id} not seeded: {err}"),
        }
    }
    service.advance_sequences(0, 9_001);

    println!("\nEligibility check");
    let proposal = LoanProposal {
        amount: 500_000.0,
        annual_rate: 9.0,
        tenure_months: 24,
    };
    let summary = match service.check_eligibility(customer.customer_id, proposal) {
        Ok(summary) => summary,
        Err(err) => {
            println!("  Eligibility unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "- Score {} | approval {} | rate {:.2}% -> {:.2}% | EMI {:.2}",
        summary.credit_score,
        summary.approval,
        summary.interest_rate,
        summary.corrected_interest_rate,
        summary.monthly_installment
    );
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("  Decision payload:\n{json}"),
        Err(err) => println!("  Decision payload unavailable: {err}"),
    }

    println!("\nLoan creation");
    let created = match service.create_loan(customer.customer_id, proposal) {
        Ok(created) => created,
        Err(err) => {
            println!("  Creation unavailable: {err}");
            return Ok(());
        }
    };
    match created.loan_id {
        Some(loan_id) => println!(
            "- Approved loan {} with EMI {:.2}",
            loan_id.0, created.monthly_installment
        ),
        None => {
            println!("- Rejected: {}", created.message);
            return Ok(());
        }
    }

    println!("\nLedger view");
    match service.customer_loans(customer.customer_id) {
        Ok(views) => {
            for view in views {
                println!(
                    "- Loan {} | amount {:.0} | rate {:.2}% | EMI {:.2} | {} repayments left",
                    view.loan_id.0,
                    view.loan_amount,
                    view.interest_rate,
                    view.monthly_installment,
                    view.repayments_left
                );
            }
        }
        Err(err) => println!("  Ledger unavailable: {err}"),
    }

    Ok(())
}

fn sample_registration() -> CustomerRegistration {
    CustomerRegistration {
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        age: 32,
        phone_number: 9_811_047_623,
        monthly_income: 100_000.0,
    }
}

/// Two settled on-time loans from prior years, enough history to clear the
/// prime score cutoff.
fn sample_history(customer_id: u64) -> Vec<HistoricalLoan> {
    let this_year = Local::now().date_naive().year();

    [(400_000.0, this_year - 4), (350_000.0, this_year - 3)]
        .iter()
        .enumerate()
        .map(|(index, (amount, year))| HistoricalLoan {
            loan_id: LoanId(9_000 + index as u64),
            customer_id: creditline::lending::CustomerId(customer_id),
            amount: *amount,
            tenure: 24,
            interest_rate: 11.0,
            monthly_repayment: 18_642.65,
            emis_paid_on_time: 24,
            start_date: NaiveDate::from_ymd_opt(*year, 2, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(*year + 2, 2, 1),
            status: LoanStatus::Completed,
        })
        .collect()
}
