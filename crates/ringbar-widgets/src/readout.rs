//! Textual readout shown in the middle of the gauge.

use crate::options::GaugeOptions;

/// Format the readout for a set of target values.
///
/// Multiple values show their sum, a single value shows itself. With the
/// `"%"` unit the number is expressed as a percentage of `max`. Once the sum
/// reaches `max`, the done text replaces everything if one is configured.
#[must_use]
pub fn readout(targets: &[f64], options: &GaugeOptions) -> String {
    let sum: f64 = targets.iter().sum();
    if let Some(done) = options.done_text() {
        if sum >= options.max {
            return done.to_string();
        }
    }

    let mut value = match targets {
        [single] => *single,
        _ => sum,
    };
    if options.value_unit == "%" {
        value = if options.max > 0.0 {
            value / (options.max / 100.0)
        } else {
            0.0
        };
    }
    if !value.is_finite() {
        value = 0.0;
    }
    // Adding zero folds -0.0 into 0.0.
    format!(
        "{:.*}{}",
        options.value_decimals,
        value + 0.0,
        options.value_unit
    )
}
