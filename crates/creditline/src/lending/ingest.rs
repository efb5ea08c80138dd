//! Bulk ingestion of customer and loan ledger CSV exports.
//!
//! The engine requires already-validated records, so malformed rows are
//! rejected here and counted instead of being passed on. Rows are upserted by
//! id; loan rows referencing unknown customers are skipped, matching the
//! original ledger-import behavior.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Customer, CustomerId, HistoricalLoan, LoanId, LoanStatus};
use super::repository::{CustomerRepository, LoanRepository, RepositoryError};

#[derive(Debug)]
pub enum LedgerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Repository(RepositoryError),
}

impl std::fmt::Display for LedgerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerImportError::Io(err) => write!(f, "failed to read ledger export: {}", err),
            LedgerImportError::Csv(err) => write!(f, "invalid ledger CSV data: {}", err),
            LedgerImportError::Repository(err) => {
                write!(f, "could not store ledger records: {}", err)
            }
        }
    }
}

impl std::error::Error for LedgerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerImportError::Io(err) => Some(err),
            LedgerImportError::Csv(err) => Some(err),
            LedgerImportError::Repository(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LedgerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LedgerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RepositoryError> for LedgerImportError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

/// Counters from a customer export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CustomerIngest {
    pub created: usize,
    pub updated: usize,
    pub rejected: usize,
    /// Highest customer id seen, so id sequences can be advanced past it.
    pub highest_id: u64,
}

/// Counters from a loan export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoanIngest {
    pub created: usize,
    pub updated: usize,
    pub skipped_unknown_customer: usize,
    pub rejected: usize,
    pub highest_id: u64,
}

pub struct LedgerImporter;

impl LedgerImporter {
    pub fn customers_from_path<P: AsRef<Path>, C: CustomerRepository>(
        path: P,
        repository: &C,
    ) -> Result<CustomerIngest, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::customers_from_reader(file, repository)
    }

    pub fn customers_from_reader<R: Read, C: CustomerRepository>(
        reader: R,
        repository: &C,
    ) -> Result<CustomerIngest, LedgerImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut report = CustomerIngest::default();

        for record in csv_reader.deserialize::<CustomerRow>() {
            let row = record?;
            let Some(customer) = row.into_customer() else {
                report.rejected += 1;
                continue;
            };

            report.highest_id = report.highest_id.max(customer.customer_id.0);
            if repository.upsert(customer)? {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }

        Ok(report)
    }

    pub fn loans_from_path<P: AsRef<Path>, C: CustomerRepository, L: LoanRepository>(
        path: P,
        customers: &C,
        loans: &L,
    ) -> Result<LoanIngest, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::loans_from_reader(file, customers, loans)
    }

    pub fn loans_from_reader<R: Read, C: CustomerRepository, L: LoanRepository>(
        reader: R,
        customers: &C,
        loans: &L,
    ) -> Result<LoanIngest, LedgerImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut report = LoanIngest::default();

        for record in csv_reader.deserialize::<LoanRow>() {
            let row = record?;
            let Some(loan) = row.into_loan() else {
                report.rejected += 1;
                continue;
            };

            if customers.fetch(&loan.customer_id)?.is_none() {
                report.skipped_unknown_customer += 1;
                continue;
            }

            report.highest_id = report.highest_id.max(loan.loan_id.0);
            if loans.upsert(loan)? {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }

        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    customer_id: u64,
    first_name: String,
    last_name: String,
    #[serde(default)]
    age: Option<u8>,
    phone_number: u64,
    monthly_salary: f64,
    approved_limit: f64,
    #[serde(default)]
    current_debt: Option<f64>,
}

// Historical exports predate the age field; fall back the way the original
// ingestion job did.
const DEFAULT_INGESTED_AGE: u8 = 25;

impl CustomerRow {
    fn into_customer(self) -> Option<Customer> {
        if self.monthly_salary <= 0.0 || self.approved_limit < 0.0 {
            return None;
        }
        let current_debt = self.current_debt.unwrap_or(0.0);
        if current_debt < 0.0 {
            return None;
        }

        let now = chrono::Utc::now();
        Some(Customer {
            customer_id: CustomerId(self.customer_id),
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age.unwrap_or(DEFAULT_INGESTED_AGE),
            phone_number: self.phone_number,
            monthly_salary: self.monthly_salary,
            approved_limit: self.approved_limit,
            current_debt,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LoanRow {
    customer_id: u64,
    loan_id: u64,
    loan_amount: f64,
    tenure: u32,
    interest_rate: f64,
    monthly_repayment: f64,
    #[serde(rename = "EMIs_paid_on_time")]
    emis_paid_on_time: u32,
    start_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    end_date: Option<String>,
}

impl LoanRow {
    fn into_loan(self) -> Option<HistoricalLoan> {
        if self.loan_amount <= 0.0 || self.tenure == 0 || self.interest_rate < 0.0 {
            return None;
        }

        let start_date = parse_date(&self.start_date)?;
        let end_date = match self.end_date.as_deref() {
            Some(raw) => Some(parse_date(raw)?),
            None => None,
        };
        let status = if end_date.is_some() {
            LoanStatus::Completed
        } else {
            LoanStatus::Active
        };

        Some(HistoricalLoan {
            loan_id: LoanId(self.loan_id),
            customer_id: CustomerId(self.customer_id),
            amount: self.loan_amount,
            tenure: self.tenure,
            interest_rate: self.interest_rate,
            monthly_repayment: self.monthly_repayment,
            emis_paid_on_time: self.emis_paid_on_time,
            start_date,
            end_date,
            status,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
