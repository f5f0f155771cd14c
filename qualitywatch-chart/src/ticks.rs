//! Axis tick generation.
//!
//! Produces "nice" tick values (1, 2 or 5 times a power of ten) covering a
//! domain, then places them through a scale.

use crate::scale::Scale;

/// Minimum plot width, in pixels, reserved for each tick.
pub const PIXELS_PER_TICK: f64 = 40.0;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// One labelled axis tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick {
    /// Domain value.
    pub value: f64,
    /// Projected pixel position.
    pub position: f64,
    /// Formatted value.
    pub label: String,
}

/// Integer bounds and signed increment for ticks over `[start, stop]`.
///
/// A negative increment means "divide by `-inc`", which keeps fractional
/// steps exact.
fn tick_bounds(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        inc = 10f64.powf(-power) / factor;
        i1 = (start * inc).round();
        i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_bounds(start, stop, count * 2.0);
        }
        (i1, i2, -inc)
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_bounds(start, stop, count * 2.0);
        }
        (i1, i2, inc)
    }
}

/// Nice tick values inside `[start, stop]`, roughly `count` of them.
///
/// A zero-width domain yields the single value; `count == 0` or a
/// non-finite bound yields nothing.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };

    let (i1, i2, inc) = tick_bounds(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect()
}

/// Spacing between consecutive nice ticks for the same arguments.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let t = ticks(start, stop, count);
    match t.as_slice() {
        [a, b, ..] => b - a,
        _ => 0.0,
    }
}

/// Format a tick value with the fewest decimals `step` needs.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10()).ceil().clamp(0.0, 12.0) as usize
    } else {
        0
    };
    let text = format!("{:.*}", decimals, value);
    // "-0" reads badly on an axis
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Number of ticks to aim for on an axis `extent` pixels long.
pub fn tick_count(extent: f64) -> usize {
    ((extent / PIXELS_PER_TICK).floor() as usize).max(2)
}

/// Build labelled ticks for a scale's domain.
pub fn axis_ticks<S: Scale>(scale: &S, count: usize) -> Vec<Tick> {
    let (d0, d1) = scale.domain();
    let values = ticks(d0, d1, count);
    let step = match values.as_slice() {
        [a, b, ..] => b - a,
        _ => 0.0,
    };
    values
        .into_iter()
        .map(|value| Tick {
            value,
            position: scale.project(value),
            label: format_tick(value, step),
        })
        .collect()
}
