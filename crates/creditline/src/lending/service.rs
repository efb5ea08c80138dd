use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{
    Customer, CustomerId, CustomerRegistration, HistoricalLoan, LoanId, LoanProposal, LoanStatus,
    RegistrationError,
};
use super::evaluation::{DecisionEngine, LoanDecision, PolicyConfig};
use super::finance::{self, InvalidInput};
use super::repository::{CustomerRepository, LoanRepository, RepositoryError};

/// Service facade composing the repositories and the decision engine.
///
/// The engine never touches storage; this facade owns the collaborator
/// responsibilities the engine deliberately excludes: resolving identifiers,
/// persisting approved loans, and the debt increment that must stay
/// transactionally consistent with the debt-limit check.
pub struct LendingService<C, L> {
    customers: Arc<C>,
    loans: Arc<L>,
    engine: DecisionEngine,
    customer_sequence: AtomicU64,
    loan_sequence: AtomicU64,
}

impl<C, L> LendingService<C, L>
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    pub fn new(customers: Arc<C>, loans: Arc<L>, config: PolicyConfig) -> Self {
        Self {
            customers,
            loans,
            engine: DecisionEngine::new(config),
            customer_sequence: AtomicU64::new(1),
            loan_sequence: AtomicU64::new(1),
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Move the id sequences past externally ingested records so freshly
    /// assigned ids cannot collide with them.
    pub fn advance_sequences(&self, customer_floor: u64, loan_floor: u64) {
        self.customer_sequence
            .fetch_max(customer_floor.saturating_add(1), Ordering::Relaxed);
        self.loan_sequence
            .fetch_max(loan_floor.saturating_add(1), Ordering::Relaxed);
    }

    fn next_customer_id(&self) -> CustomerId {
        CustomerId(self.customer_sequence.fetch_add(1, Ordering::Relaxed))
    }

    fn next_loan_id(&self) -> LoanId {
        LoanId(self.loan_sequence.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a customer, deriving the approved limit from monthly income.
    pub fn register_customer(
        &self,
        registration: CustomerRegistration,
    ) -> Result<CustomerView, ServiceError> {
        registration.validate()?;
        if self
            .customers
            .find_by_phone(registration.phone_number)?
            .is_some()
        {
            return Err(RegistrationError::PhoneInUse(registration.phone_number).into());
        }

        let now = Utc::now();
        let customer = Customer {
            customer_id: self.next_customer_id(),
            first_name: registration.first_name,
            last_name: registration.last_name,
            age: registration.age,
            phone_number: registration.phone_number,
            monthly_salary: registration.monthly_income,
            approved_limit: finance::approved_limit(registration.monthly_income),
            current_debt: 0.0,
            created_at: now,
            updated_at: now,
        };

        let stored = self.customers.insert(customer)?;
        Ok(CustomerView::from_customer(&stored))
    }

    /// Evaluate a proposal without any persistence side effect.
    pub fn check_eligibility(
        &self,
        customer_id: CustomerId,
        proposal: LoanProposal,
    ) -> Result<EligibilitySummary, ServiceError> {
        let (customer, history) = self.load_snapshot(&customer_id)?;
        let decision = self
            .engine
            .decide(&customer, &history, &proposal, today())?;

        Ok(EligibilitySummary::new(customer_id, decision))
    }

    /// Evaluate a proposal and, on approval, persist the loan and increment
    /// the customer's outstanding debt by the principal.
    pub fn create_loan(
        &self,
        customer_id: CustomerId,
        proposal: LoanProposal,
    ) -> Result<LoanCreated, ServiceError> {
        let (mut customer, history) = self.load_snapshot(&customer_id)?;
        let start_date = today();
        let decision = self
            .engine
            .decide(&customer, &history, &proposal, start_date)?;

        if !decision.approved {
            return Ok(LoanCreated {
                loan_id: None,
                customer_id,
                loan_approved: false,
                message: decision.summary(),
                monthly_installment: decision.monthly_installment,
                decision,
            });
        }

        let loan = HistoricalLoan {
            loan_id: self.next_loan_id(),
            customer_id,
            amount: proposal.amount,
            tenure: proposal.tenure_months,
            interest_rate: decision.corrected_rate,
            monthly_repayment: decision.monthly_installment,
            emis_paid_on_time: 0,
            start_date,
            end_date: None,
            status: LoanStatus::Active,
        };
        let stored = self.loans.insert(loan)?;

        customer.current_debt += proposal.amount;
        customer.updated_at = Utc::now();
        self.customers.update(customer)?;

        Ok(LoanCreated {
            loan_id: Some(stored.loan_id),
            customer_id,
            loan_approved: true,
            message: "loan approved".to_string(),
            monthly_installment: decision.monthly_installment,
            decision,
        })
    }

    /// Loan detail with the owning customer, for API responses.
    pub fn loan_details(&self, loan_id: LoanId) -> Result<LoanDetailView, ServiceError> {
        let loan = self
            .loans
            .fetch(&loan_id)?
            .ok_or(ServiceError::LoanNotFound(loan_id))?;
        let customer = self
            .customers
            .fetch(&loan.customer_id)?
            .ok_or(ServiceError::CustomerNotFound(loan.customer_id))?;

        Ok(LoanDetailView::new(&loan, &customer))
    }

    /// All loans on a customer's ledger.
    pub fn customer_loans(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerLoanView>, ServiceError> {
        let (_, history) = self.load_snapshot(&customer_id)?;
        Ok(history.iter().map(CustomerLoanView::from_loan).collect())
    }

    fn load_snapshot(
        &self,
        customer_id: &CustomerId,
    ) -> Result<(Customer, Vec<HistoricalLoan>), ServiceError> {
        let customer = self
            .customers
            .fetch(customer_id)?
            .ok_or(ServiceError::CustomerNotFound(*customer_id))?;
        let history = self.loans.for_customer(customer_id)?;
        Ok((customer, history))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Error raised by the lending service. Policy rejections are never errors;
/// they travel inside the decision payloads.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("customer {0:?} not found")]
    CustomerNotFound(CustomerId),
    #[error("loan {0:?} not found")]
    LoanNotFound(LoanId),
    #[error(transparent)]
    Invalid(#[from] InvalidInput),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Registration response exposing the derived approved limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerView {
    pub customer_id: CustomerId,
    pub name: String,
    pub age: u8,
    pub monthly_income: f64,
    pub approved_limit: f64,
    pub phone_number: u64,
}

impl CustomerView {
    pub(crate) fn from_customer(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            name: customer.name(),
            age: customer.age,
            monthly_income: customer.monthly_salary,
            approved_limit: customer.approved_limit,
            phone_number: customer.phone_number,
        }
    }
}

/// Decision summary returned by the eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilitySummary {
    pub customer_id: CustomerId,
    pub approval: bool,
    pub credit_score: u8,
    pub interest_rate: f64,
    pub corrected_interest_rate: f64,
    pub tenure: u32,
    pub monthly_installment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EligibilitySummary {
    fn new(customer_id: CustomerId, decision: LoanDecision) -> Self {
        let message = decision.rejection.as_ref().map(|reason| reason.summary());
        Self {
            customer_id,
            approval: decision.approved,
            credit_score: decision.credit_score,
            interest_rate: decision.requested_rate,
            corrected_interest_rate: decision.corrected_rate,
            tenure: decision.tenure_months,
            monthly_installment: decision.monthly_installment,
            message,
        }
    }
}

/// Outcome of a loan-creation request; `loan_id` is present only on approval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanCreated {
    pub loan_id: Option<LoanId>,
    pub customer_id: CustomerId,
    pub loan_approved: bool,
    pub message: String,
    pub monthly_installment: f64,
    #[serde(skip)]
    pub decision: LoanDecision,
}

/// Full loan record with its owner, for the view-loan endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanDetailView {
    pub loan_id: LoanId,
    pub customer: CustomerView,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub tenure: u32,
    pub repayments_left: u32,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub status: &'static str,
}

impl LoanDetailView {
    fn new(loan: &HistoricalLoan, customer: &Customer) -> Self {
        Self {
            loan_id: loan.loan_id,
            customer: CustomerView::from_customer(customer),
            loan_amount: loan.amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_repayment,
            tenure: loan.tenure,
            repayments_left: loan.repayments_left(),
            start_date: loan.start_date,
            end_date: loan.end_date,
            status: loan.status.label(),
        }
    }
}

/// Compact per-loan entry for the customer ledger listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLoanView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub repayments_left: u32,
}

impl CustomerLoanView {
    fn from_loan(loan: &HistoricalLoan) -> Self {
        Self {
            loan_id: loan.loan_id,
            loan_amount: loan.amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_repayment,
            repayments_left: loan.repayments_left(),
        }
    }
}
