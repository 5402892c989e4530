/// A categorical context tag contributing a signed adjustment to a score.
pub trait ScoreAdjustment {
    fn adjustment(&self) -> i32;
}

/// Additive scoring model: independent axis adjustments sum linearly onto a
/// base, then the result is clamped at a floor. Deliberately not
/// multiplicative; the axes do not interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditiveModel {
    pub base: i32,
    pub floor: i32,
}

impl AdditiveModel {
    pub const fn new(base: i32, floor: i32) -> Self {
        Self { base, floor }
    }

    /// Sum the adjustments onto the base and clamp at the floor.
    pub fn score<'a, I>(&self, adjustments: I) -> i32
    where
        I: IntoIterator<Item = &'a dyn ScoreAdjustment>,
    {
        let raw = adjustments
            .into_iter()
            .fold(self.base, |acc, tag| acc + tag.adjustment());
        raw.max(self.floor)
    }
}
