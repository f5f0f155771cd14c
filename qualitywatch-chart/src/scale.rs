//! Continuous scales mapping data values to pixel coordinates.
//!
//! Both scales normalise a value over their domain and interpolate into
//! their range. A zero-width domain normalises every value to `0.5`, so a
//! constant series or a single timestamp lands in the middle of the range
//! instead of dividing by zero.

/// A continuous mapping from a data domain to a pixel range.
pub trait Scale {
    /// Map a domain value to the range.
    fn project(&self, value: f64) -> f64;

    /// The `(min, max)` domain.
    fn domain(&self) -> (f64, f64);

    /// The `(start, end)` range. `end` may be smaller than `start`.
    fn range(&self) -> (f64, f64);
}

/// Position of `x` within `[a, b]` as a fraction, `0.5` when `a == b`.
fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        0.5
    } else {
        (x - a) / span
    }
}

fn interpolate(range: (f64, f64), t: f64) -> f64 {
    range.0 + t * (range.1 - range.0)
}

/// Linear scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale mapping `domain` onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }
}

impl Scale for LinearScale {
    fn project(&self, value: f64) -> f64 {
        interpolate(self.range, normalize(self.domain.0, self.domain.1, value))
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Power scale: values are raised to `exponent` (sign preserved) before
/// being normalised, so with an exponent above one the upper end of the
/// domain gets more of the range than the lower end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowScale {
    exponent: f64,
    domain: (f64, f64),
    range: (f64, f64),
}

impl PowScale {
    /// Create a power scale with the given exponent and an empty `[0, 0]`
    /// domain and range.
    pub fn new(exponent: f64) -> Self {
        Self {
            exponent,
            domain: (0.0, 0.0),
            range: (0.0, 0.0),
        }
    }

    /// Set the domain.
    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    /// Set the range.
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self
    }

    /// The exponent applied to domain values.
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    fn raise(&self, v: f64) -> f64 {
        if v < 0.0 {
            -(-v).powf(self.exponent)
        } else {
            v.powf(self.exponent)
        }
    }
}

impl Scale for PowScale {
    fn project(&self, value: f64) -> f64 {
        let d0 = self.raise(self.domain.0);
        let d1 = self.raise(self.domain.1);
        interpolate(self.range, normalize(d0, d1, self.raise(value)))
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}
