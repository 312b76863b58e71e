//! Placeholder history for providers without a historical endpoint.

use super::PricePoint;
use chrono::{Days, NaiveDate};
use rand::Rng;

/// Maximum relative deviation from the current price (±5%).
pub(crate) const MAX_DEVIATION: f64 = 0.05;

/// Builds `days` points ending at `today`, oldest first, each the current
/// price perturbed by a uniform factor in ±5%.
pub(crate) fn synthetic_history<R: Rng>(
    current: f64,
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PricePoint> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| {
            let factor = 1.0 + (rng.random::<f64>() - 0.5) * (2.0 * MAX_DEVIATION);
            PricePoint {
                date,
                price: current * factor,
            }
        })
        .collect()
}
