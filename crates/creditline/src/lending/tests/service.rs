use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};

use super::common::*;
use crate::lending::domain::{CustomerId, LoanId, LoanProposal, LoanStatus, RegistrationError};
use crate::lending::repository::{CustomerRepository, LoanRepository};
use crate::lending::service::{LendingService, ServiceError};

fn proposal(amount: f64, rate: f64, tenure: u32) -> LoanProposal {
    LoanProposal {
        amount,
        annual_rate: rate,
        tenure_months: tenure,
    }
}

#[test]
fn registration_derives_the_approved_limit() {
    let (service, customers, _) = build_service();

    let view = service
        .register_customer(registration(9_123_456_780))
        .expect("registration succeeds");

    assert_eq!(view.name, "Ravi Iyer");
    assert_eq!(view.approved_limit, 1_800_000.0);

    let stored = customers
        .fetch(&view.customer_id)
        .expect("repository reachable")
        .expect("customer stored");
    assert_eq!(stored.current_debt, 0.0);
    assert_eq!(stored.approved_limit, 1_800_000.0);
}

#[test]
fn registration_rejects_invalid_intake() {
    let (service, _, _) = build_service();

    let mut short_phone = registration(12_345);
    short_phone.phone_number = 12_345;
    match service.register_customer(short_phone) {
        Err(ServiceError::Registration(RegistrationError::PhoneTooShort(_))) => {}
        other => panic!("expected phone rejection, got {other:?}"),
    }

    let mut minor = registration(9_123_456_781);
    minor.age = 17;
    match service.register_customer(minor) {
        Err(ServiceError::Registration(RegistrationError::AgeOutOfRange(17))) => {}
        other => panic!("expected age rejection, got {other:?}"),
    }
}

#[test]
fn duplicate_phone_numbers_are_rejected() {
    let (service, customers, _) = build_service();

    let first = service
        .register_customer(registration(9_876_543_219))
        .expect("first registration succeeds");

    let mut second = registration(9_876_543_219);
    second.first_name = "Kiran".to_string();
    match service.register_customer(second) {
        Err(ServiceError::Registration(RegistrationError::PhoneInUse(9_876_543_219))) => {}
        other => panic!("expected duplicate phone rejection, got {other:?}"),
    }

    let guard = customers.records.lock().expect("repository mutex poisoned");
    assert_eq!(guard.len(), 1);
    assert!(guard.contains_key(&first.customer_id));
}

#[test]
fn eligibility_check_has_no_side_effects() {
    let (service, customers, loans) = build_service();
    customers
        .upsert(customer(7, 100_000.0, 0.0))
        .expect("seed customer");

    let summary = service
        .check_eligibility(CustomerId(7), proposal(300_000.0, 14.0, 24))
        .expect("eligibility computes");

    assert!(summary.approval);
    assert_eq!(summary.interest_rate, 14.0);
    assert!(loans
        .records
        .lock()
        .expect("ledger mutex poisoned")
        .is_empty());

    let untouched = customers
        .fetch(&CustomerId(7))
        .expect("repository reachable")
        .expect("customer present");
    assert_eq!(untouched.current_debt, 0.0);
}

#[test]
fn unknown_customer_is_reported_as_not_found() {
    let (service, _, _) = build_service();

    match service.check_eligibility(CustomerId(99), proposal(100_000.0, 12.0, 12)) {
        Err(ServiceError::CustomerNotFound(CustomerId(99))) => {}
        other => panic!("expected customer not found, got {other:?}"),
    }

    match service.loan_details(LoanId(42)) {
        Err(ServiceError::LoanNotFound(LoanId(42))) => {}
        other => panic!("expected loan not found, got {other:?}"),
    }
}

#[test]
fn approved_loan_is_persisted_and_debt_incremented() {
    let (service, customers, loans) = build_service();
    customers
        .upsert(customer(3, 100_000.0, 0.0))
        .expect("seed customer");

    let created = service
        .create_loan(CustomerId(3), proposal(400_000.0, 14.0, 24))
        .expect("creation succeeds");

    assert!(created.loan_approved);
    let loan_id = created.loan_id.expect("loan id assigned");

    let stored = loans
        .fetch(&loan_id)
        .expect("repository reachable")
        .expect("loan stored");
    assert_eq!(stored.customer_id, CustomerId(3));
    assert_eq!(stored.amount, 400_000.0);
    assert_eq!(stored.status, LoanStatus::Active);
    assert_eq!(stored.emis_paid_on_time, 0);
    assert_eq!(stored.monthly_repayment, created.monthly_installment);

    let debtor = customers
        .fetch(&CustomerId(3))
        .expect("repository reachable")
        .expect("customer present");
    assert_eq!(debtor.current_debt, 400_000.0);
}

#[test]
fn rejected_loan_leaves_no_record_behind() {
    let (service, customers, loans) = build_service();
    // Salary 20,000 caps the installment at 10,000; a 500,000 proposal at
    // the mid-tier floor cannot fit.
    customers
        .upsert(customer(4, 20_000.0, 0.0))
        .expect("seed customer");

    let created = service
        .create_loan(CustomerId(4), proposal(500_000.0, 10.0, 12))
        .expect("decision computes");

    assert!(!created.loan_approved);
    assert!(created.loan_id.is_none());
    assert!(created.message.contains("EMI exceeds"));
    assert!(loans
        .records
        .lock()
        .expect("ledger mutex poisoned")
        .is_empty());

    let untouched = customers
        .fetch(&CustomerId(4))
        .expect("repository reachable")
        .expect("customer present");
    assert_eq!(untouched.current_debt, 0.0);
}

#[test]
fn consecutive_approvals_cannot_break_the_limit() {
    let (service, customers, _) = build_service();
    // Limit 1,800,000.
    customers
        .upsert(customer(5, 50_000.0, 0.0))
        .expect("seed customer");

    let first = service
        .create_loan(CustomerId(5), proposal(1_000_000.0, 14.0, 120))
        .expect("decision computes");
    assert!(first.loan_approved);

    let second = service
        .create_loan(CustomerId(5), proposal(1_000_000.0, 14.0, 120))
        .expect("decision computes");
    assert!(!second.loan_approved);
    assert!(second.message.contains("exceeds approved credit limit"));
}

#[test]
fn new_loans_count_toward_current_year_activity() {
    let (service, customers, _) = build_service();
    customers
        .upsert(customer(6, 200_000.0, 0.0))
        .expect("seed customer");

    let first = service
        .create_loan(CustomerId(6), proposal(200_000.0, 14.0, 24))
        .expect("decision computes");
    assert!(first.loan_approved);
    // The first decision saw an empty ledger.
    assert_eq!(first.decision.score_breakdown.current_year_activity, 10);

    let summary = service
        .check_eligibility(CustomerId(6), proposal(200_000.0, 14.0, 24))
        .expect("eligibility computes");
    assert!(summary.approval);
    // The persisted loan now counts as this year's single new loan.
    assert!(summary.credit_score > 50);
}

#[test]
fn loan_views_expose_ledger_state() {
    let (service, customers, loans) = build_service();
    customers
        .upsert(customer(8, 100_000.0, 0.0))
        .expect("seed customer");
    let this_year = Local::now().date_naive().year();
    loans
        .upsert(running_loan(
            801,
            8,
            300_000.0,
            24,
            6,
            NaiveDate::from_ymd_opt(this_year - 1, 3, 1).expect("valid date"),
        ))
        .expect("seed loan");

    let detail = service.loan_details(LoanId(801)).expect("loan resolves");
    assert_eq!(detail.customer.customer_id, CustomerId(8));
    assert_eq!(detail.repayments_left, 18);
    assert_eq!(detail.status, "active");

    let listing = service
        .customer_loans(CustomerId(8))
        .expect("ledger resolves");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].loan_id, LoanId(801));
}

#[test]
fn sequences_skip_past_ingested_ids() {
    let (service, customers, _) = build_service();
    customers
        .upsert(customer(50, 100_000.0, 0.0))
        .expect("seed customer");
    service.advance_sequences(50, 0);

    let view = service
        .register_customer(registration(9_123_456_782))
        .expect("registration succeeds");
    assert!(view.customer_id.0 > 50);
}

#[test]
fn repository_failures_surface_as_service_errors() {
    let loans = Arc::new(MemoryLoanRepository::default());
    let service = LendingService::new(
        Arc::new(UnavailableCustomerRepository),
        loans,
        policy_config(),
    );

    match service.check_eligibility(CustomerId(1), proposal(100_000.0, 12.0, 12)) {
        Err(ServiceError::Repository(_)) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
}
