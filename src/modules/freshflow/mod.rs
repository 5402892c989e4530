//! FreshFlow: expiring-batch classification and flash-sale pricing.
//!
//! Batches nearing expiry are bucketed by days left into discount bands, the
//! bucketed set rolls up into spoilage exposure metrics, and batches carrying
//! a discount produce flash-sale price proposals for the POS to apply after
//! operator confirmation.

mod domain;
mod import;
mod pricing;

pub use domain::{
    classify_batch, expiry_report, ExpiringBatch, ExpiryBand, ExpiryReport, ProductBatch,
    CRITICAL_DAYS, DEFAULT_LOOKAHEAD_DAYS,
};
pub use import::{BatchImportError, BatchImporter};
pub use pricing::{
    propose_flash_sale, BatchSource, BatchSourceError, FlashSaleError, FlashSalePrice,
    FlashSaleService, PriceMutator, PriceMutationError,
};
