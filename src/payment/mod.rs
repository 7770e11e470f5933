//! Payment routing
//!
//! tythe never moves money itself. A [`PaymentBackend`] per method does the
//! transfer, and the [`PaymentRouter`] hands each backend the batch of
//! addresses the plan assigns to its method. Every address gets its own
//! [`PaymentResult`]: one failed transfer does not stop the rest, and nothing
//! is retried.

pub mod command;

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::distribution::DistributionPlan;
use crate::domain::PaymentMethod;
use crate::domain::destination::{is_valid_paypal_account, is_valid_usdc_address};
use crate::error::{Result, TytheError, payment as payment_error};

pub use command::CommandBackend;

/// Outcome of paying one address
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResult {
    pub method: PaymentMethod,
    pub address: String,
    pub amount: f64,
    /// Transaction id on success
    pub outcome: std::result::Result<String, TytheError>,
}

impl PaymentResult {
    pub fn success(
        method: PaymentMethod,
        address: impl Into<String>,
        amount: f64,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self {
            method,
            address: address.into(),
            amount,
            outcome: Ok(transaction_id.into()),
        }
    }

    pub fn failure(
        method: PaymentMethod,
        address: impl Into<String>,
        amount: f64,
        error: TytheError,
    ) -> Self {
        Self {
            method,
            address: address.into(),
            amount,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Performs transfers for one payment method
pub trait PaymentBackend: Send + Sync {
    fn method(&self) -> PaymentMethod;

    /// Pay every address in `payments`, returning one result per address
    ///
    /// An `Err` means the batch as a whole could not be attempted.
    fn send_batch(
        &self,
        payments: &BTreeMap<String, f64>,
        sandbox: bool,
    ) -> Result<Vec<PaymentResult>>;
}

fn is_valid_address(method: PaymentMethod, address: &str) -> bool {
    match method {
        PaymentMethod::Usdc => is_valid_usdc_address(address),
        PaymentMethod::PayPal => is_valid_paypal_account(address),
    }
}

/// Dispatches plan batches to the backend registered for each method
#[derive(Default)]
pub struct PaymentRouter {
    backends: BTreeMap<PaymentMethod, Box<dyn PaymentBackend>>,
}

impl PaymentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend, replacing any earlier one for the same method
    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn PaymentBackend>) -> Self {
        self.backends.insert(backend.method(), backend);
        self
    }

    pub fn has_backend(&self, method: PaymentMethod) -> bool {
        self.backends.contains_key(&method)
    }

    /// Pay every destination in `plan`
    ///
    /// Results come back grouped by method and sorted by address.
    pub fn route(&self, plan: &DistributionPlan, sandbox: bool) -> Vec<PaymentResult> {
        let mut results = Vec::with_capacity(plan.payment_count());
        for (&method, batch) in &plan.batches {
            results.extend(self.route_batch(method, batch, sandbox));
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            payments = results.len(),
            failed, sandbox, "payments routed"
        );
        results
    }

    fn route_batch(
        &self,
        method: PaymentMethod,
        batch: &BTreeMap<String, f64>,
        sandbox: bool,
    ) -> Vec<PaymentResult> {
        let fail_all = |batch: &BTreeMap<String, f64>, error: &dyn Fn(&str, f64) -> TytheError| {
            batch
                .iter()
                .map(|(address, &amount)| {
                    PaymentResult::failure(method, address, amount, error(address, amount))
                })
                .collect::<Vec<_>>()
        };

        let Some(backend) = self.backends.get(&method) else {
            warn!(%method, "no payment backend configured");
            return fail_all(batch, &|_, _| payment_error::backend_missing(method.to_string()));
        };

        let (valid, invalid): (BTreeMap<String, f64>, BTreeMap<String, f64>) = batch
            .iter()
            .map(|(address, &amount)| (address.clone(), amount))
            .partition(|(address, _)| is_valid_address(method, address));
        let mut results = fail_all(&invalid, &|address, _| {
            payment_error::invalid_address(method.to_string(), address)
        });
        if valid.is_empty() {
            return results;
        }

        info!(%method, payments = valid.len(), sandbox, "sending batch");
        match backend.send_batch(&valid, sandbox) {
            Ok(reported) => {
                // Anything the backend did not report on counts as failed
                for (address, &amount) in &valid {
                    match reported.iter().find(|r| &r.address == address) {
                        Some(result) => results.push(result.clone()),
                        None => results.push(PaymentResult::failure(
                            method,
                            address,
                            amount,
                            payment_error::failed(
                                method.to_string(),
                                address,
                                amount,
                                "backend reported no result",
                            ),
                        )),
                    }
                }
            }
            Err(error) => {
                warn!(%method, "batch failed: {error}");
                results.extend(fail_all(&valid, &|address, amount| {
                    payment_error::failed(method.to_string(), address, amount, error.to_string())
                }));
            }
        }
        results.sort_by(|a, b| a.address.cmp(&b.address));
        results
    }
}
