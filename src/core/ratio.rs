use anyhow::{Result, bail};

/// Number of decimal digits shown for a conversion ratio.
pub const DISPLAY_PRECISION: usize = 4;

/// Computes how many units of the right currency one unit of the left buys.
///
/// Both ratios are relative to the home currency, so the conversion is
/// `right / left`, formatted to [`DISPLAY_PRECISION`] digits.
pub fn calculate_result(left_ratio: f64, right_ratio: f64) -> Result<String> {
    if left_ratio == 0.0 {
        bail!("cannot convert from a zero-valued currency");
    }

    let ratio = right_ratio / left_ratio;
    if !ratio.is_finite() {
        bail!("conversion ratio is not a finite number");
    }

    Ok(format!("{:.*}", DISPLAY_PRECISION, ratio))
}
