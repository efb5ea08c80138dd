use creditline::lending::{
    Customer, CustomerId, CustomerRepository, HistoricalLoan, LoanId, LoanRepository,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCustomerRepository {
    records: Arc<Mutex<HashMap<CustomerId, Customer>>>,
}

impl CustomerRepository for InMemoryCustomerRepository {
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
pub(crate) struct InMemoryLoanRepository {
    records: Arc<Mutex<HashMap<LoanId, HistoricalLoan>>>,
}

impl LoanRepository for InMemoryLoanRepository {
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
