use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::ProductBatch;
use crate::scoring::Money;

/// Failure to ingest a batch CSV export.
#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("failed to read batch export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid batch CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid {field} value '{value}'")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Imports inventory batches from the POS CSV export.
pub struct BatchImporter;

impl BatchImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ProductBatch>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ProductBatch>, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut batches = Vec::new();
        for (index, record) in csv_reader.deserialize::<BatchRow>().enumerate() {
            let row = record?;
            batches.push(row.into_batch(index + 1)?);
        }

        Ok(batches)
    }
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    #[serde(rename = "Batch Code")]
    batch_code: String,
    #[serde(rename = "Product Id")]
    product_id: String,
    #[serde(rename = "Product Name")]
    product_name: String,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Cost Price")]
    cost_price: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Expiry Date", default, deserialize_with = "empty_string_as_none")]
    expiry_date: Option<String>,
}

impl BatchRow {
    fn into_batch(self, row: usize) -> Result<ProductBatch, BatchImportError> {
        let cost_price = parse_money(&self.cost_price, row, "Cost Price")?;
        let current_price = parse_money(&self.price, row, "Price")?;
        let expiry_date = match self.expiry_date {
            Some(raw) => Some(parse_date(&raw, row)?),
            None => None,
        };

        Ok(ProductBatch {
            batch_code: self.batch_code,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            cost_price,
            current_price,
            expiry_date,
        })
    }
}

fn parse_money(raw: &str, row: usize, field: &'static str) -> Result<Money, BatchImportError> {
    raw.parse().map_err(|_| BatchImportError::InvalidField {
        row,
        field,
        value: raw.to_string(),
    })
}

fn parse_date(raw: &str, row: usize) -> Result<NaiveDate, BatchImportError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        BatchImportError::InvalidField {
            row,
            field: "Expiry Date",
            value: raw.to_string(),
        }
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "\
Batch Code,Product Id,Product Name,Quantity,Cost Price,Price,Expiry Date
bt-101,prod-1,Whole Milk 1L,24,32.50,48.00,2026-03-04
bt-102,prod-2,Paneer 200g,10,55,90.00,
";

    #[test]
    fn imports_batches_with_exact_prices() {
        let batches =
            BatchImporter::from_reader(Cursor::new(EXPORT)).expect("export parses");

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].batch_code, "bt-101");
        assert_eq!(batches[0].cost_price, Money::from_minor(3_250));
        assert_eq!(
            batches[0].expiry_date,
            NaiveDate::from_ymd_opt(2026, 3, 4)
        );
        assert_eq!(batches[1].cost_price, Money::from_major(55));
        assert_eq!(batches[1].expiry_date, None, "blank expiry stays unknown");
    }

    #[test]
    fn rejects_malformed_prices_with_row_context() {
        let export = "\
Batch Code,Product Id,Product Name,Quantity,Cost Price,Price,Expiry Date
bt-1,prod-1,Milk,5,abc,48.00,2026-03-04
";
        let error = BatchImporter::from_reader(Cursor::new(export))
            .expect_err("malformed price rejected");

        match error {
            BatchImportError::InvalidField { row, field, value } => {
                assert_eq!(row, 1);
                assert_eq!(field, "Cost Price");
                assert_eq!(value, "abc");
            }
            other => panic!("expected invalid field error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let export = "\
Batch Code,Product Id,Product Name,Quantity,Cost Price,Price,Expiry Date
bt-1,prod-1,Milk,5,30,48.00,04/03/2026
";
        let error = BatchImporter::from_reader(Cursor::new(export))
            .expect_err("malformed date rejected");
        assert!(matches!(
            error,
            BatchImportError::InvalidField { field: "Expiry Date", .. }
        ));
    }
}
