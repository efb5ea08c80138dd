//! Credit scoring and loan eligibility engine.
//!
//! The decision core lives in [`lending::evaluation`]: it turns a customer's
//! historical repayment behavior into a 0-100 creditworthiness score, applies
//! the tiered interest-rate policy, and produces the terms an approved loan
//! would carry. Everything else in this crate is the plumbing a running
//! service needs around that core: domain records, repository traits, the
//! lending service facade, bulk CSV ingestion, and the HTTP router.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
