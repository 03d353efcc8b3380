/// Policy for handling slice requests that fall outside of a sequence
///
/// Negative indices always count from the end of the sequence. The policies only
/// differ in what happens once a normalized index is still out of bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangePolicy {
    /// Clamp indices into `[0, len]` and return an empty sequence for reversed ranges
    #[default]
    Lenient,
    /// Fail with a [`RangeError`](crate::RangeError) on any out-of-bounds or reversed range
    Strict,
}
impl RangePolicy {
    /// Returns true if out-of-bounds ranges are clamped
    #[must_use]
    pub fn is_lenient(&self) -> bool {
        matches!(self, Self::Lenient)
    }
}
