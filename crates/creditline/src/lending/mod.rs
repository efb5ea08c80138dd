//! Loan eligibility workflow: domain records, the scoring/policy decision
//! engine, repositories, the service facade, CSV ingestion, and the HTTP
//! router.

pub mod domain;
pub mod evaluation;
pub mod finance;
pub mod ingest;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Customer, CustomerId, CustomerRegistration, HistoricalLoan, LoanId, LoanProposal, LoanStatus,
    RegistrationError,
};
pub use evaluation::{DecisionEngine, LoanDecision, PolicyConfig, RejectionReason, ScoreBreakdown};
pub use finance::InvalidInput;
pub use ingest::{CustomerIngest, LedgerImportError, LedgerImporter, LoanIngest};
pub use repository::{CustomerRepository, LoanRepository, RepositoryError};
pub use router::lending_router;
pub use service::{
    CustomerLoanView, CustomerView, EligibilitySummary, LendingService, LoanCreated,
    LoanDetailView, ServiceError,
};
