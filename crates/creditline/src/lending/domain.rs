use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

/// Identifier wrapper for loan records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(pub u64);

/// A registered customer as the persistence collaborator hands it to the engine.
///
/// `approved_limit` is fixed at registration time (36x monthly salary rounded
/// to the nearest lakh) and `current_debt` is the already-locked outstanding
/// total the debt-limit check reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub phone_number: u64,
    pub monthly_salary: f64,
    pub approved_limit: f64,
    pub current_debt: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Lifecycle state of a loan record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Completed,
    Defaulted,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
            LoanStatus::Defaulted => "defaulted",
        }
    }
}

/// A closed or ongoing loan from the customer's ledger.
///
/// Immutable once ingested; scoring only ever reads these. Records reaching
/// the engine are assumed validated by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalLoan {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_repayment: f64,
    pub emis_paid_on_time: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl HistoricalLoan {
    /// EMIs still owed; zero once the loan has an end date.
    pub fn repayments_left(&self) -> u32 {
        if self.end_date.is_some() {
            return 0;
        }
        self.tenure.saturating_sub(self.emis_paid_on_time)
    }

    pub fn paid_in_full_on_time(&self) -> bool {
        self.emis_paid_on_time >= self.tenure
    }
}

/// The terms a customer is asking for. Exists only for the duration of a
/// single eligibility check or loan-creation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanProposal {
    pub amount: f64,
    pub annual_rate: f64,
    pub tenure_months: u32,
}

/// Intake payload for registering a new customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRegistration {
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub phone_number: u64,
    pub monthly_income: f64,
}

/// Reasons a registration is turned away before a customer record is created.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    #[error("age must be between 18 and 100, got {0}")]
    AgeOutOfRange(u8),
    #[error("phone number must be at least 10 digits")]
    PhoneTooShort(u64),
    #[error("monthly income must be greater than 0")]
    NonPositiveIncome(f64),
    #[error("phone number {0} is already registered")]
    PhoneInUse(u64),
}

impl CustomerRegistration {
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.age < 18 || self.age > 100 {
            return Err(RegistrationError::AgeOutOfRange(self.age));
        }
        if self.phone_number < 1_000_000_000 {
            return Err(RegistrationError::PhoneTooShort(self.phone_number));
        }
        if self.monthly_income <= 0.0 {
            return Err(RegistrationError::NonPositiveIncome(self.monthly_income));
        }
        Ok(())
    }
}
