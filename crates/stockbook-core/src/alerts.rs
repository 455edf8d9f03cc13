//! # Alert Evaluation
//!
//! Classifies a product's current state against configured thresholds.
//!
//! ## Evaluation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Alert Derivation                                   │
//! │                                                                         │
//! │  Stock category (first match wins):                                    │
//! │  ├── stock == 0               → out_of_stock   (critical)              │
//! │  └── stock <= min_stock_level → low_stock      (warning)               │
//! │                                                                         │
//! │  Reorder category (independent, may co-occur):                         │
//! │  └── stock <= reorder_level   → reorder_needed (info)                  │
//! │                                                                         │
//! │  Expiry category (only when an expiry date is tracked):                │
//! │  ├── expiry <  today                    → expired       (critical)    │
//! │  └── expiry <= today + warning window   → expiring_soon (warning)     │
//! │                                                                         │
//! │  A product can emit several alerts of different types at once.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Evaluation is a pure function of `(product, thresholds, now)`: no hidden
//! state, no clock reads. "No alert" is an empty vec, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{AlertCondition, AlertType, Product, Severity};
use crate::validation::validate_stock_thresholds;
use crate::DEFAULT_EXPIRY_WARNING_DAYS;

// =============================================================================
// Thresholds
// =============================================================================

/// Per-deployment alert configuration.
///
/// Product-level thresholds (`reorder_level`, `min_stock_level`) live on the
/// product itself; this struct holds the deployment-wide knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Days before expiry at which a product reports expiring-soon.
    pub expiry_warning_days: i64,
}

impl AlertThresholds {
    /// Creates thresholds with an explicit expiry warning window.
    pub const fn new(expiry_warning_days: i64) -> Self {
        AlertThresholds {
            expiry_warning_days,
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        AlertThresholds::new(DEFAULT_EXPIRY_WARNING_DAYS)
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Derives the current alert set for a product.
///
/// ## Arguments
/// * `product` - Snapshot of the product to classify
/// * `thresholds` - Deployment-wide alert configuration
/// * `now` - Evaluation instant; the expiry rules compare against its date
///
/// ## Errors
/// `InvalidThreshold` when `expiry_warning_days` or a product threshold is
/// negative. Never errors for "no alert" - that is an empty vec.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stockbook_core::alerts::{evaluate, AlertThresholds};
/// # use stockbook_core::types::Product;
/// # fn product_with_stock(stock: i64) -> Product {
/// #     Product {
/// #         id: "p-1".into(), sku: "PARA-500".into(), name: "Paracetamol 500mg".into(),
/// #         pieces_per_sheet: 10, sheets_per_box: 5, stock_quantity: stock,
/// #         reorder_level: 15, min_stock_level: 20, expiry_date: None,
/// #         is_active: true, created_at: Utc::now(), updated_at: Utc::now(),
/// #     }
/// # }
///
/// let product = product_with_stock(0);
/// let alerts = evaluate(&product, &AlertThresholds::default(), Utc::now()).unwrap();
/// assert!(!alerts.is_empty());
/// ```
pub fn evaluate(
    product: &Product,
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> CoreResult<Vec<AlertCondition>> {
    if thresholds.expiry_warning_days < 0 {
        return Err(CoreError::invalid_threshold(
            "expiry_warning_days",
            thresholds.expiry_warning_days,
        ));
    }
    validate_stock_thresholds(product.reorder_level, product.min_stock_level)?;

    let mut alerts = Vec::new();
    let today = now.date_naive();

    // Stock category: out-of-stock shadows low-stock.
    if product.stock_quantity == 0 {
        alerts.push(alert(
            product,
            AlertType::OutOfStock,
            Severity::Critical,
            format!("{} ({}) is out of stock", product.name, product.sku),
            now,
        ));
    } else if product.stock_quantity <= product.min_stock_level {
        alerts.push(alert(
            product,
            AlertType::LowStock,
            Severity::Warning,
            format!(
                "{} ({}) is low on stock: {} pieces left (minimum {})",
                product.name, product.sku, product.stock_quantity, product.min_stock_level
            ),
            now,
        ));
    }

    // Reorder category: independent of the stock category.
    if product.stock_quantity <= product.reorder_level {
        alerts.push(alert(
            product,
            AlertType::ReorderNeeded,
            Severity::Info,
            format!(
                "{} ({}) reached its reorder point: {} pieces left (reorder at {})",
                product.name, product.sku, product.stock_quantity, product.reorder_level
            ),
            now,
        ));
    }

    // Expiry category: only when a batch expiry date is tracked.
    if let Some(expiry) = product.expiry_date {
        if expiry < today {
            alerts.push(alert(
                product,
                AlertType::Expired,
                Severity::Critical,
                format!("{} ({}) expired on {}", product.name, product.sku, expiry),
                now,
            ));
        } else {
            let days_left = (expiry - today).num_days();
            if days_left <= thresholds.expiry_warning_days {
                alerts.push(alert(
                    product,
                    AlertType::ExpiringSoon,
                    Severity::Warning,
                    format!(
                        "{} ({}) expires in {} days (on {})",
                        product.name, product.sku, days_left, expiry
                    ),
                    now,
                ));
            }
        }
    }

    Ok(alerts)
}

fn alert(
    product: &Product,
    alert_type: AlertType,
    severity: Severity,
    message: String,
    computed_at: DateTime<Utc>,
) -> AlertCondition {
    AlertCondition {
        alert_type,
        severity,
        product_id: product.id.clone(),
        message,
        computed_at,
    }
}

// =============================================================================
// Display Ordering
// =============================================================================

/// Sorts alerts for display: critical before warning before info; within
/// equal severity, most recently computed first.
pub fn sort_for_display(alerts: &mut [AlertCondition]) {
    alerts.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| b.computed_at.cmp(&a.computed_at))
    });
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn product(stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            sku: "PARA-500".to_string(),
            name: "Paracetamol 500mg".to_string(),
            pieces_per_sheet: 10,
            sheets_per_box: 5,
            stock_quantity: stock,
            reorder_level: 15,
            min_stock_level: 20,
            expiry_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn types(alerts: &[AlertCondition]) -> Vec<AlertType> {
        alerts.iter().map(|a| a.alert_type).collect()
    }

    #[test]
    fn test_out_of_stock_is_critical() {
        let alerts = evaluate(&product(0), &AlertThresholds::default(), Utc::now()).unwrap();

        let out = alerts
            .iter()
            .find(|a| a.alert_type == AlertType::OutOfStock)
            .unwrap();
        assert_eq!(out.severity, Severity::Critical);
        // Out-of-stock shadows low-stock but not the reorder category.
        assert!(!types(&alerts).contains(&AlertType::LowStock));
        assert!(types(&alerts).contains(&AlertType::ReorderNeeded));
    }

    #[test]
    fn test_low_stock_and_reorder_co_occur() {
        // stock 10, min 20, reorder 15
        let alerts = evaluate(&product(10), &AlertThresholds::default(), Utc::now()).unwrap();

        assert_eq!(alerts.len(), 2);
        assert!(types(&alerts).contains(&AlertType::LowStock));
        assert!(types(&alerts).contains(&AlertType::ReorderNeeded));

        let low = alerts
            .iter()
            .find(|a| a.alert_type == AlertType::LowStock)
            .unwrap();
        assert_eq!(low.severity, Severity::Warning);
        let reorder = alerts
            .iter()
            .find(|a| a.alert_type == AlertType::ReorderNeeded)
            .unwrap();
        assert_eq!(reorder.severity, Severity::Info);
    }

    #[test]
    fn test_healthy_stock_reports_nothing() {
        let alerts = evaluate(&product(500), &AlertThresholds::default(), Utc::now()).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_expired_yesterday_is_critical() {
        let now = Utc::now();
        let mut p = product(500);
        p.expiry_date = Some(now.date_naive() - Duration::days(1));

        let alerts = evaluate(&p, &AlertThresholds::default(), now).unwrap();
        assert_eq!(types(&alerts), vec![AlertType::Expired]);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_expiring_within_window_is_warning() {
        let now = Utc::now();
        let mut p = product(500);
        p.expiry_date = Some(now.date_naive() + Duration::days(10));

        let alerts = evaluate(&p, &AlertThresholds::new(30), now).unwrap();
        assert_eq!(types(&alerts), vec![AlertType::ExpiringSoon]);
        assert_eq!(alerts[0].severity, Severity::Warning);
    }

    #[test]
    fn test_expiry_outside_window_is_quiet() {
        let now = Utc::now();
        let mut p = product(500);
        p.expiry_date = Some(now.date_naive() + Duration::days(90));

        let alerts = evaluate(&p, &AlertThresholds::new(30), now).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_stock_and_expiry_alerts_combine() {
        let now = Utc::now();
        let mut p = product(10);
        p.expiry_date = Some(now.date_naive() + Duration::days(5));

        let alerts = evaluate(&p, &AlertThresholds::default(), now).unwrap();
        assert!(types(&alerts).contains(&AlertType::LowStock));
        assert!(types(&alerts).contains(&AlertType::ReorderNeeded));
        assert!(types(&alerts).contains(&AlertType::ExpiringSoon));
    }

    #[test]
    fn test_negative_thresholds_rejected() {
        let p = product(10);
        assert!(matches!(
            evaluate(&p, &AlertThresholds::new(-1), Utc::now()),
            Err(CoreError::InvalidThreshold { .. })
        ));

        let mut bad = product(10);
        bad.min_stock_level = -5;
        assert!(matches!(
            evaluate(&bad, &AlertThresholds::default(), Utc::now()),
            Err(CoreError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let now = Utc::now();
        let p = product(10);
        let first = evaluate(&p, &AlertThresholds::default(), now).unwrap();
        let second = evaluate(&p, &AlertThresholds::default(), now).unwrap();

        assert_eq!(types(&first), types(&second));
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.message, b.message);
            assert_eq!(a.computed_at, b.computed_at);
        }
    }

    #[test]
    fn test_sort_for_display() {
        let now = Utc::now();
        let earlier = now - Duration::minutes(5);

        let mut alerts = vec![
            AlertCondition {
                alert_type: AlertType::ReorderNeeded,
                severity: Severity::Info,
                product_id: "p-1".to_string(),
                message: "info".to_string(),
                computed_at: now,
            },
            AlertCondition {
                alert_type: AlertType::LowStock,
                severity: Severity::Warning,
                product_id: "p-2".to_string(),
                message: "older warning".to_string(),
                computed_at: earlier,
            },
            AlertCondition {
                alert_type: AlertType::ExpiringSoon,
                severity: Severity::Warning,
                product_id: "p-3".to_string(),
                message: "newer warning".to_string(),
                computed_at: now,
            },
            AlertCondition {
                alert_type: AlertType::OutOfStock,
                severity: Severity::Critical,
                product_id: "p-4".to_string(),
                message: "critical".to_string(),
                computed_at: earlier,
            },
        ];

        sort_for_display(&mut alerts);

        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[1].message, "newer warning");
        assert_eq!(alerts[2].message, "older warning");
        assert_eq!(alerts[3].severity, Severity::Info);
    }
}
