use super::domain::{Customer, CustomerId, HistoricalLoan, LoanId};

/// Storage abstraction for customer records so the service module can be
/// exercised in isolation.
pub trait CustomerRepository: Send + Sync {
    fn insert(&self, customer: Customer) -> Result<Customer, RepositoryError>;
    /// Insert or replace by id; returns `true` when a new record was created.
    fn upsert(&self, customer: Customer) -> Result<bool, RepositoryError>;
    fn fetch(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError>;
    /// Lookup by phone number, which is unique across customers.
    fn find_by_phone(&self, phone_number: u64) -> Result<Option<Customer>, RepositoryError>;
    fn update(&self, customer: Customer) -> Result<(), RepositoryError>;
}

/// Storage abstraction for the loan ledger.
pub trait LoanRepository: Send + Sync {
    fn insert(&self, loan: HistoricalLoan) -> Result<HistoricalLoan, RepositoryError>;
    /// Insert or replace by id; returns `true` when a new record was created.
    fn upsert(&self, loan: HistoricalLoan) -> Result<bool, RepositoryError>;
    fn fetch(&self, id: &LoanId) -> Result<Option<HistoricalLoan>, RepositoryError>;
    fn for_customer(&self, id: &CustomerId) -> Result<Vec<HistoricalLoan>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
