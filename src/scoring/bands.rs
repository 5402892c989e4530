use thiserror::Error;

/// Direction of the inclusive bound carried by every band in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundDirection {
    /// A band matches when `metric <= bound` (days-until-expiry style axes).
    UpperInclusive,
    /// A band matches when `metric >= bound` (days-since-last-visit style axes).
    LowerInclusive,
}

/// One rung of a threshold ladder: an inclusive bound and the outcome it maps to.
#[derive(Debug, Clone)]
pub struct Band<T> {
    pub bound: f64,
    pub outcome: T,
}

impl<T> Band<T> {
    pub fn new(bound: f64, outcome: T) -> Self {
        Self { bound, outcome }
    }
}

/// Ordered partition of a metric axis, scanned most-severe-first.
///
/// The fallback outcome makes classification total: any finite metric that
/// escapes every explicit band lands there. An optional sentinel value (the
/// churn module reserves 999 for "never seen") short-circuits the scan
/// entirely so it cannot be swallowed by a numeric band.
#[derive(Debug, Clone)]
pub struct BandTable<T> {
    direction: BoundDirection,
    bands: Vec<Band<T>>,
    fallback: T,
    sentinel: Option<(f64, T)>,
}

/// Construction-time validation failures. These indicate a programming error
/// in a statically defined table, not a runtime condition.
#[derive(Debug, Error, PartialEq)]
pub enum BandTableError {
    #[error("band bound {0} is not a finite number")]
    NonFiniteBound(f64),
    #[error("band bounds must widen strictly in scan order ({previous} then {offending})")]
    UnorderedBounds { previous: f64, offending: f64 },
    #[error("sentinel value {0} is not a finite number")]
    NonFiniteSentinel(f64),
}

impl<T> BandTable<T> {
    /// Build a table, rejecting unordered or non-finite bounds.
    ///
    /// Scan order is severity order, so bounds must widen strictly: increasing
    /// for upper-inclusive tables, decreasing for lower-inclusive ones.
    pub fn new(
        direction: BoundDirection,
        bands: Vec<Band<T>>,
        fallback: T,
    ) -> Result<Self, BandTableError> {
        let mut previous: Option<f64> = None;
        for band in &bands {
            if !band.bound.is_finite() {
                return Err(BandTableError::NonFiniteBound(band.bound));
            }
            if let Some(prev) = previous {
                let ordered = match direction {
                    BoundDirection::UpperInclusive => prev < band.bound,
                    BoundDirection::LowerInclusive => prev > band.bound,
                };
                if !ordered {
                    return Err(BandTableError::UnorderedBounds {
                        previous: prev,
                        offending: band.bound,
                    });
                }
            }
            previous = Some(band.bound);
        }

        Ok(Self {
            direction,
            bands,
            fallback,
            sentinel: None,
        })
    }

    /// Reserve an exact metric value that bypasses the numeric bands.
    pub fn with_sentinel(mut self, value: f64, outcome: T) -> Result<Self, BandTableError> {
        if !value.is_finite() {
            return Err(BandTableError::NonFiniteSentinel(value));
        }
        self.sentinel = Some((value, outcome));
        Ok(self)
    }

    /// Map a metric to its outcome. Total over all finite metrics: the first
    /// band whose inclusive bound the metric satisfies wins, otherwise the
    /// fallback.
    pub fn classify(&self, metric: f64) -> &T {
        if let Some((sentinel, outcome)) = &self.sentinel {
            if metric == *sentinel {
                return outcome;
            }
        }

        for band in &self.bands {
            let matched = match self.direction {
                BoundDirection::UpperInclusive => metric <= band.bound,
                BoundDirection::LowerInclusive => metric >= band.bound,
            };
            if matched {
                return &band.outcome;
            }
        }

        &self.fallback
    }
}
