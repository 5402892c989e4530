use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{expiry_report, ExpiringBatch, ExpiryReport, ProductBatch};
use crate::scoring::{ActionProposal, Money};

/// Parameters of a permitted flash-sale price change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashSalePrice {
    pub product_id: String,
    pub batch_code: String,
    pub discount_pct: u8,
    pub current_price: Money,
    pub new_price: Money,
}

/// Price-cut policy: any batch carrying a suggested discount is eligible for a
/// flash sale at the half-up rounded discounted price; everything else is
/// declined outright.
pub fn propose_flash_sale(record: &ExpiringBatch) -> ActionProposal<FlashSalePrice> {
    if record.suggested_discount == 0 {
        return ActionProposal::declined("no action needed");
    }

    ActionProposal::Permitted {
        parameters: FlashSalePrice {
            product_id: record.batch.product_id.clone(),
            batch_code: record.batch.batch_code.clone(),
            discount_pct: record.suggested_discount,
            current_price: record.batch.current_price,
            new_price: record.new_price,
        },
    }
}

/// Record source supplying the current batch collection. Fetched fresh on
/// every report so the engine never classifies stale inventory.
pub trait BatchSource: Send + Sync {
    fn fetch_batches(&self) -> Result<Vec<ProductBatch>, BatchSourceError>;
}

/// Mutation sink performing the effectful price write. The service never
/// retries on its behalf.
pub trait PriceMutator: Send + Sync {
    fn apply_price(&self, change: &FlashSalePrice) -> Result<(), PriceMutationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BatchSourceError {
    #[error("batch source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PriceMutationError {
    #[error("price update rejected: {0}")]
    Rejected(String),
    #[error("pricing backend unavailable: {0}")]
    Unavailable(String),
}

/// Error raised by the flash-sale service.
#[derive(Debug, thiserror::Error)]
pub enum FlashSaleError {
    #[error(transparent)]
    Source(#[from] BatchSourceError),
    #[error(transparent)]
    Mutation(#[from] PriceMutationError),
    #[error("proposal is not permitted: {0}")]
    NotPermitted(String),
}

/// Service composing the record source, the discount policy, and the price
/// mutation sink. Reports are pure; committing a proposal is the explicit,
/// confirmable step.
pub struct FlashSaleService<S, M> {
    source: Arc<S>,
    prices: Arc<M>,
    lookahead_days: i64,
}

impl<S, M> FlashSaleService<S, M>
where
    S: BatchSource + 'static,
    M: PriceMutator + 'static,
{
    pub fn new(source: Arc<S>, prices: Arc<M>, lookahead_days: i64) -> Self {
        Self {
            source,
            prices,
            lookahead_days,
        }
    }

    /// Re-fetch the batch collection and build the windowed expiry report.
    pub fn report(&self, today: NaiveDate) -> Result<ExpiryReport, FlashSaleError> {
        let batches = self.source.fetch_batches()?;
        Ok(expiry_report(batches, today, self.lookahead_days))
    }

    /// Apply a confirmed flash-sale proposal through the mutation sink.
    ///
    /// Declined proposals are refused here rather than silently ignored, so a
    /// caller can never commit a price change the policy did not permit.
    pub fn commit(
        &self,
        proposal: &ActionProposal<FlashSalePrice>,
    ) -> Result<(), FlashSaleError> {
        match proposal {
            ActionProposal::Permitted { parameters } => {
                self.prices.apply_price(parameters)?;
                info!(
                    product_id = %parameters.product_id,
                    batch_code = %parameters.batch_code,
                    discount_pct = parameters.discount_pct,
                    new_price = %parameters.new_price,
                    "flash sale applied"
                );
                Ok(())
            }
            ActionProposal::Declined { reason } => {
                Err(FlashSaleError::NotPermitted(reason.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::freshflow::classify_batch;
    use std::sync::Mutex;

    fn evaluation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    fn batch(days_out: Option<i64>, price: i64) -> ProductBatch {
        ProductBatch {
            batch_code: "bt-01".to_string(),
            product_id: "prod-7".to_string(),
            product_name: "Greek Yogurt 500g".to_string(),
            quantity: 6,
            cost_price: Money::from_major(35),
            current_price: Money::from_major(price),
            expiry_date: days_out.map(|days| evaluation_date() + chrono::Duration::days(days)),
        }
    }

    #[derive(Default)]
    struct MemoryPrices {
        applied: Mutex<Vec<FlashSalePrice>>,
    }

    impl PriceMutator for MemoryPrices {
        fn apply_price(&self, change: &FlashSalePrice) -> Result<(), PriceMutationError> {
            self.applied
                .lock()
                .expect("price mutex poisoned")
                .push(change.clone());
            Ok(())
        }
    }

    struct FixedBatches(Vec<ProductBatch>);

    impl BatchSource for FixedBatches {
        fn fetch_batches(&self) -> Result<Vec<ProductBatch>, BatchSourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn discounted_batches_are_proposed_at_the_rounded_price() {
        let record = classify_batch(batch(Some(1), 200), evaluation_date());
        let proposal = propose_flash_sale(&record);

        let parameters = proposal.parameters().expect("flash sale permitted");
        assert_eq!(parameters.discount_pct, 50);
        assert_eq!(parameters.new_price, Money::from_major(100));
    }

    #[test]
    fn healthy_batches_are_declined_with_no_action_needed() {
        let record = classify_batch(batch(Some(20), 200), evaluation_date());
        let proposal = propose_flash_sale(&record);

        assert!(!proposal.allowed());
        assert_eq!(proposal.reason(), Some("no action needed"));
    }

    #[test]
    fn commit_applies_only_permitted_proposals() {
        let prices = Arc::new(MemoryPrices::default());
        let service = FlashSaleService::new(
            Arc::new(FixedBatches(vec![batch(Some(1), 200)])),
            prices.clone(),
            7,
        );

        let report = service.report(evaluation_date()).expect("report builds");
        let proposal = propose_flash_sale(&report.filtered[0]);
        service.commit(&proposal).expect("commit succeeds");

        let applied = prices.applied.lock().expect("price mutex poisoned");
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].new_price, Money::from_major(100));
    }

    #[test]
    fn commit_refuses_declined_proposals() {
        let service = FlashSaleService::new(
            Arc::new(FixedBatches(Vec::new())),
            Arc::new(MemoryPrices::default()),
            7,
        );

        let declined: ActionProposal<FlashSalePrice> =
            ActionProposal::declined("no action needed");
        let result = service.commit(&declined);

        assert!(matches!(result, Err(FlashSaleError::NotPermitted(_))));
    }
}
