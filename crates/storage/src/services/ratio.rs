//! Percentage and averaging helpers shared by every derived statistic.

/// `numerator / denominator * 100`, or `0.0` when the denominator is zero.
///
/// Every derived percentage in the crate goes through here so a session with
/// no attempts reads as 0%, never NaN or infinity.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }

    let ratio = numerator / denominator * 100.0;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Arithmetic mean, `0.0` for an empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Rounds to one decimal place, the precision used for published averages.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
