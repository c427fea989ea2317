/// Ratchet invariant enforcement
///
/// **Core Rule:** Stops may tighten, never loosen.
///
/// - Long positions: stop can only rise
/// - Short positions: stop can only fall
use crate::domain::Direction;

/// Apply the ratchet to a proposed stop level.
///
/// Returns the level the stop moves to: the proposal when it tightens the
/// stop, otherwise the current level.
///
/// # Example
/// ```
/// use dualtrend_core::book::tighten;
/// use dualtrend_core::domain::Direction;
///
/// // Tightening: $95 → $100 (allowed)
/// assert_eq!(tighten(Direction::Long, 95.0, 100.0), 100.0);
///
/// // Loosening: $100 → $90 (blocked, stays at $100)
/// assert_eq!(tighten(Direction::Long, 100.0, 90.0), 100.0);
/// ```
pub fn tighten(direction: Direction, current: f64, proposed: f64) -> f64 {
    match direction {
        Direction::Long => current.max(proposed),
        Direction::Short => current.min(proposed),
    }
}
