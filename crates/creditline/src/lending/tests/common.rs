use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::lending::domain::{
    Customer, CustomerId, CustomerRegistration, HistoricalLoan, LoanId, LoanStatus,
};
use crate::lending::evaluation::{DecisionEngine, PolicyConfig};
use crate::lending::repository::{
    CustomerRepository, LoanRepository, RepositoryError,
};
use crate::lending::service::LendingService;

/// Fixed evaluation date so current-year-activity buckets are deterministic.
pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn policy_config() -> PolicyConfig {
    PolicyConfig::default()
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::new(policy_config())
}

pub(super) fn customer(id: u64, monthly_salary: f64, current_debt: f64) -> Customer {
    let registered = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    Customer {
        customer_id: CustomerId(id),
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        age: 32,
        phone_number: 9_876_543_210,
        monthly_salary,
        approved_limit: crate::lending::finance::approved_limit(monthly_salary),
        current_debt,
        created_at: registered,
        updated_at: registered,
    }
}

pub(super) fn registration(phone_number: u64) -> CustomerRegistration {
    CustomerRegistration {
        first_name: "Ravi".to_string(),
        last_name: "Iyer".to_string(),
        age: 29,
        phone_number,
        monthly_income: 50_000.0,
    }
}

/// A closed loan, fully repaid on schedule, started in `year`.
pub(super) fn settled_loan(id: u64, customer_id: u64, amount: f64, year: i32) -> HistoricalLoan {
    HistoricalLoan {
        loan_id: LoanId(id),
        customer_id: CustomerId(customer_id),
        amount,
        tenure: 24,
        interest_rate: 11.0,
        monthly_repayment: 4_660.78,
        emis_paid_on_time: 24,
        start_date: NaiveDate::from_ymd_opt(year, 2, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(year + 2, 2, 1),
        status: LoanStatus::Completed,
    }
}

/// An ongoing loan with a configurable on-time payment record.
pub(super) fn running_loan(
    id: u64,
    customer_id: u64,
    amount: f64,
    tenure: u32,
    emis_paid_on_time: u32,
    start_date: NaiveDate,
) -> HistoricalLoan {
    HistoricalLoan {
        loan_id: LoanId(id),
        customer_id: CustomerId(customer_id),
        amount,
        tenure,
        interest_rate: 13.5,
        monthly_repayment: 0.0,
        emis_paid_on_time,
        start_date,
        end_date: None,
        status: LoanStatus::Active,
    }
}

/// History that lands the total score above the prime cutoff: full on-time
/// record (40), two loans (20), none this evaluation year (10), volume under
/// ten lakhs (15) = 85.
pub(super) fn prime_history(customer_id: u64) -> Vec<HistoricalLoan> {
    vec![
        settled_loan(101, customer_id, 400_000.0, 2021),
        settled_loan(102, customer_id, 350_000.0, 2022),
    ]
}

pub(super) fn build_service() -> (
    Arc<LendingService<MemoryCustomerRepository, MemoryLoanRepository>>,
    Arc<MemoryCustomerRepository>,
    Arc<MemoryLoanRepository>,
) {
    let customers = Arc::new(MemoryCustomerRepository::default());
    let loans = Arc::new(MemoryLoanRepository::default());
    let service = Arc::new(LendingService::new(
        customers.clone(),
        loans.clone(),
        policy_config(),
    ));
    (service, customers, loans)
}

#[derive(Default, Clone)]
pub(super) struct MemoryCustomerRepository {
    pub(super) records: Arc<Mutex<HashMap<CustomerId, Customer>>>,
}

impl CustomerRepository for MemoryCustomerRepository {
    fn insert(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&customer.customer_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(customer.customer_id, customer.clone());
        Ok(customer)
    }

    fn upsert(&self, customer: Customer) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.insert(customer.customer_id, customer).is_none())
    }

    fn fetch(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_phone(&self, phone_number: u64) -> Result<Option<Customer>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|customer| customer.phone_number == phone_number)
            .cloned())
    }

    fn update(&self, customer: Customer) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&customer.customer_id) {
            guard.insert(customer.customer_id, customer);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLoanRepository {
    pub(super) records: Arc<Mutex<HashMap<LoanId, HistoricalLoan>>>,
}

impl LoanRepository for MemoryLoanRepository {
    fn insert(&self, loan: HistoricalLoan) -> Result<HistoricalLoan, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&loan.loan_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(loan.loan_id, loan.clone());
        Ok(loan)
    }

    fn upsert(&self, loan: HistoricalLoan) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.insert(loan.loan_id, loan).is_none())
    }

    fn fetch(&self, id: &LoanId) -> Result<Option<HistoricalLoan>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_customer(&self, id: &CustomerId) -> Result<Vec<HistoricalLoan>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut loans: Vec<HistoricalLoan> = guard
            .values()
            .filter(|loan| loan.customer_id == *id)
            .cloned()
            .collect();
        loans.sort_by_key(|loan| loan.loan_id);
        Ok(loans)
    }
}

pub(super) struct UnavailableCustomerRepository;

impl CustomerRepository for UnavailableCustomerRepository {
    fn insert(&self, _customer: Customer) -> Result<Customer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _customer: Customer) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_phone(&self, _phone_number: u64) -> Result<Option<Customer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _customer: Customer) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
