//! Donation distribution
//!
//! A pure calculation: given the crawled dependencies and a total amount,
//! decide how much each payment destination receives. Nothing here performs
//! I/O.
//!
//! Every dependency has a weight. The total is divided over all weight, and
//! the share of unconfigured dependencies is simply not spent:
//!
//! ```text
//! spend          = total_amount * tythed_weight / total_weight
//! amount(dep)    = total_amount * weight(dep) / total_weight
//! ```
//!
//! so the amounts always sum to `spend`, and `spend == total_amount` exactly
//! when every dependency is configured. Amounts are not rounded here; payment
//! backends format them for their own precision.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::{Dependency, Destination, PaymentMethod};
use crate::error::{Result, TytheError, distribution as distribution_error};

/// Equal weight for every dependency
pub fn flat_weight(_dependency: &Dependency) -> f64 {
    1.0
}

/// What one dependency receives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub identity: String,
    pub destination: Destination,
    pub amount: f64,
}

/// Computed split of a total amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPlan {
    pub total_amount: f64,
    pub spend: f64,
    pub total_weight: f64,
    pub tythed_weight: f64,
    /// Per dependency, sorted by identity
    pub shares: Vec<Share>,
    /// Amount per address, grouped by payment method
    pub batches: BTreeMap<PaymentMethod, BTreeMap<String, f64>>,
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(distribution_error::invalid_amount(amount))
    }
}

impl DistributionPlan {
    /// Plan paying `amount` to one destination
    pub fn single(destination: Destination, amount: f64) -> Result<Self> {
        validate_amount(amount)?;
        let mut batches: BTreeMap<PaymentMethod, BTreeMap<String, f64>> = BTreeMap::new();
        batches
            .entry(destination.method())
            .or_default()
            .insert(destination.address().to_string(), amount);
        Ok(Self {
            total_amount: amount,
            spend: amount,
            total_weight: 1.0,
            tythed_weight: 1.0,
            shares: vec![Share {
                identity: destination.address().to_string(),
                destination,
                amount,
            }],
            batches,
        })
    }

    /// Number of distinct destinations to pay
    pub fn payment_count(&self) -> usize {
        self.batches.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.payment_count() == 0
    }

    /// Amount left unspent because some dependencies have no destination
    pub fn unspent(&self) -> f64 {
        self.total_amount - self.spend
    }
}

/// Split `total_amount` over `dependencies`
///
/// Fails with [`TytheError::DivisionUndefined`] when the total weight is
/// zero, which includes an empty dependency list.
pub fn compute<F>(
    dependencies: &[Dependency],
    total_amount: f64,
    weight_fn: F,
) -> Result<DistributionPlan>
where
    F: Fn(&Dependency) -> f64,
{
    validate_amount(total_amount)?;

    let mut weighted = Vec::with_capacity(dependencies.len());
    for dependency in dependencies {
        let weight = weight_fn(dependency);
        if !weight.is_finite() || weight < 0.0 {
            return Err(distribution_error::invalid_weight(
                &dependency.identity,
                weight,
            ));
        }
        weighted.push((dependency, weight, dependency.destination()));
    }

    // fold from +0.0: an empty f64 sum is -0.0, which prints as "-0.00"
    let total_weight = weighted.iter().fold(0.0, |acc, (_, w, _)| acc + w);
    if total_weight <= 0.0 {
        return Err(TytheError::DivisionUndefined);
    }
    let tythed_weight = weighted
        .iter()
        .filter(|(_, _, destination)| destination.is_some())
        .fold(0.0, |acc, (_, w, _)| acc + w);

    let mut shares: Vec<Share> = weighted
        .into_iter()
        .filter(|(_, weight, _)| *weight > 0.0)
        .filter_map(|(dependency, weight, destination)| {
            destination.map(|destination| Share {
                identity: dependency.identity.clone(),
                destination,
                amount: total_amount * weight / total_weight,
            })
        })
        .collect();
    shares.sort_by(|a, b| a.identity.cmp(&b.identity));

    let mut batches: BTreeMap<PaymentMethod, BTreeMap<String, f64>> = BTreeMap::new();
    for share in &shares {
        *batches
            .entry(share.destination.method())
            .or_default()
            .entry(share.destination.address().to_string())
            .or_insert(0.0) += share.amount;
    }

    // Both sums run over the same weights in the same order when all are tythed
    #[allow(clippy::float_cmp)]
    let spend = if tythed_weight == total_weight {
        total_amount
    } else {
        total_amount * tythed_weight / total_weight
    };
    debug!(
        total_amount,
        spend,
        total_weight,
        tythed_weight,
        destinations = batches.values().map(BTreeMap::len).sum::<usize>(),
        "computed distribution"
    );

    Ok(DistributionPlan {
        total_amount,
        spend,
        total_weight,
        tythed_weight,
        shares,
        batches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DonationConfig;
    use crate::resolver::ResolvedPackage;
    use crate::source::PackageReference;

    const A: &str = "0x52908400098527886e0f7030069857d2e4169ee7";
    const B: &str = "0x8617e340b3d01fa5f11f306f4090fd50e238070d";

    fn dep(identity: &str, usdc: Option<&str>, paypal: Option<&str>) -> Dependency {
        let config = (usdc.is_some() || paypal.is_some()).then(|| DonationConfig {
            usdc_address: usdc.map(str::to_string),
            paypal_account: paypal.map(str::to_string),
        });
        Dependency {
            identity: identity.to_string(),
            package: ResolvedPackage {
                identity: identity.to_string(),
                directory: format!("/pkgs/{identity}").into(),
                reference: PackageReference::local(format!("/pkgs/{identity}")),
                sha: None,
            },
            config,
            required_by: "root".to_string(),
            ecosystem: None,
        }
    }

    fn sum(plan: &DistributionPlan) -> f64 {
        plan.batches.values().flat_map(BTreeMap::values).sum()
    }

    #[test]
    fn test_shared_destination_is_aggregated() {
        let deps = [dep("a", Some(A), None), dep("b", Some(A), None), dep("c", None, None)];
        let plan = compute(&deps, 300.0, flat_weight).unwrap();

        assert!((plan.spend - 200.0).abs() < 1e-9);
        assert_eq!(plan.shares.len(), 2);
        assert!(plan.shares.iter().all(|s| (s.amount - 100.0).abs() < 1e-9));
        assert_eq!(plan.payment_count(), 1);
        assert!((plan.batches[&PaymentMethod::Usdc][A] - 200.0).abs() < 1e-9);
        assert!((plan.unspent() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_address_case_does_not_split_a_destination() {
        let deps = [
            dep("a", Some("0x52908400098527886E0F7030069857D2E4169EE7"), None),
            dep("b", Some(A), None),
            dep("c", None, Some("Dev@Example.com")),
            dep("d", None, Some("dev@example.com")),
        ];
        let plan = compute(&deps, 400.0, flat_weight).unwrap();

        assert_eq!(plan.payment_count(), 2);
        assert!((plan.batches[&PaymentMethod::Usdc][A] - 200.0).abs() < 1e-9);
        assert!((plan.batches[&PaymentMethod::PayPal]["dev@example.com"] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_sum_matches_spend() {
        let deps = [
            dep("a", Some(A), None),
            dep("b", Some(B), None),
            dep("c", None, Some("c@example.com")),
            dep("d", None, None),
            dep("e", None, None),
            dep("f", Some(B), None),
            dep("g", None, None),
        ];
        for total in [0.0, 0.01, 1.0, 99.99, 1234.5678, 1e9] {
            let plan = compute(&deps, total, flat_weight).unwrap();
            assert!((sum(&plan) - plan.spend).abs() < 1e-9 * total.max(1.0));
            assert!(plan.spend <= total);
            assert!(plan.shares.iter().all(|s| s.amount >= 0.0));
        }
    }

    #[test]
    fn test_all_tythed_spends_everything() {
        let deps = [dep("a", Some(A), None), dep("b", None, Some("b@example.com"))];
        let plan = compute(&deps, 10.0, flat_weight).unwrap();
        assert_eq!(plan.spend, 10.0);
        assert_eq!(plan.batches.len(), 2);
        assert!((plan.batches[&PaymentMethod::PayPal]["b@example.com"] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_tythed_spends_nothing() {
        let deps = [dep("a", None, None), dep("b", None, None)];
        let plan = compute(&deps, 50.0, flat_weight).unwrap();
        assert_eq!(plan.spend, 0.0);
        assert!(plan.spend.is_sign_positive());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_empty_is_division_undefined() {
        let result = compute(&[], 100.0, flat_weight);
        assert_eq!(result, Err(TytheError::DivisionUndefined));
    }

    #[test]
    fn test_zero_total_weight_is_division_undefined() {
        let deps = [dep("a", Some(A), None)];
        let result = compute(&deps, 100.0, |_| 0.0);
        assert_eq!(result, Err(TytheError::DivisionUndefined));
    }

    #[test]
    fn test_usdc_takes_precedence() {
        let deps = [dep("a", Some(A), Some("a@example.com"))];
        let plan = compute(&deps, 1.0, flat_weight).unwrap();
        assert_eq!(plan.shares[0].destination, Destination::Usdc(A.to_string()));
        assert!(!plan.batches.contains_key(&PaymentMethod::PayPal));
    }

    #[test]
    fn test_custom_weights() {
        let deps = [dep("heavy", Some(A), None), dep("light", Some(B), None)];
        let plan = compute(&deps, 100.0, |d| if d.identity == "heavy" { 3.0 } else { 1.0 }).unwrap();
        assert!((plan.batches[&PaymentMethod::Usdc][A] - 75.0).abs() < 1e-9);
        assert!((plan.batches[&PaymentMethod::Usdc][B] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        let deps = [dep("a", Some(A), None)];
        assert!(matches!(
            compute(&deps, -1.0, flat_weight),
            Err(TytheError::InvalidAmount { .. })
        ));
        assert!(matches!(
            compute(&deps, f64::NAN, flat_weight),
            Err(TytheError::InvalidAmount { .. })
        ));
        assert!(matches!(
            compute(&deps, 1.0, |_| -2.0),
            Err(TytheError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_single_destination_plan() {
        let plan = DistributionPlan::single(Destination::PayPal("x@example.com".into()), 12.5).unwrap();
        assert_eq!(plan.payment_count(), 1);
        assert_eq!(plan.spend, 12.5);
        assert_eq!(plan.batches[&PaymentMethod::PayPal]["x@example.com"], 12.5);
        assert!(DistributionPlan::single(Destination::Usdc(A.into()), -1.0).is_err());
    }
}
