use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CustomerId, CustomerRegistration, LoanId, LoanProposal};
use super::repository::{CustomerRepository, LoanRepository};
use super::service::{LendingService, ServiceError};

/// Router builder exposing the lending endpoints.
pub fn lending_router<C, L>(service: Arc<LendingService<C, L>>) -> Router
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    Router::new()
        .route("/api/v1/register", post(register_handler::<C, L>))
        .route(
            "/api/v1/check-eligibility",
            post(check_eligibility_handler::<C, L>),
        )
        .route("/api/v1/create-loan", post(create_loan_handler::<C, L>))
        .route("/api/v1/view-loan/:loan_id", get(view_loan_handler::<C, L>))
        .route(
            "/api/v1/view-loans/:customer_id",
            get(view_customer_loans_handler::<C, L>),
        )
        .with_state(service)
}

/// Proposal terms as they arrive on the wire.
#[derive(Debug, Deserialize)]
pub struct ProposalRequest {
    pub customer_id: u64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
}

impl ProposalRequest {
    fn split(self) -> (CustomerId, LoanProposal) {
        (
            CustomerId(self.customer_id),
            LoanProposal {
                amount: self.loan_amount,
                annual_rate: self.interest_rate,
                tenure_months: self.tenure,
            },
        )
    }
}

pub(crate) async fn register_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    axum::Json(registration): axum::Json<CustomerRegistration>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match service.register_customer(registration) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn check_eligibility_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    axum::Json(request): axum::Json<ProposalRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let (customer_id, proposal) = request.split();
    match service.check_eligibility(customer_id, proposal) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_loan_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    axum::Json(request): axum::Json<ProposalRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let (customer_id, proposal) = request.split();
    match service.create_loan(customer_id, proposal) {
        Ok(created) => {
            // A policy rejection is a successful computation, not a fault.
            let status = if created.loan_approved {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(created)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_loan_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    Path(loan_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match service.loan_details(LoanId(loan_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_customer_loans_handler<C, L>(
    State(service): State<Arc<LendingService<C, L>>>,
    Path(customer_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match service.customer_loans(CustomerId(customer_id)) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::CustomerNotFound(_) | ServiceError::LoanNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Invalid(_) | ServiceError::Registration(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
