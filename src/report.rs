//! Histogram bucketing and outlier report rendering.
//!
//! Reports are plain tab-separated text. The histogram table starts with
//! a `%table` marker line, which the external table viewer interprets as
//! a render directive; everything after it is `<bin_lower>\t<count>` rows.
//!
//! Building and emitting are separated: [`Histogram::from_data`] does the
//! bucketing, [`Histogram::render`] produces the table as a `String`, and
//! [`Histogram::write_to`] pushes it to any [`io::Write`] sink. That keeps
//! the format testable without capturing stdout.

use std::io;

use thiserror::Error;

/// Upper bound on the number of bins a single histogram will allocate.
///
/// A table past this size is useless to a human and a viewer alike, and
/// an unchecked `max` would otherwise turn into a giant allocation.
pub const MAX_BINS: usize = 100_000;

/// Error type for [`Histogram::from_data`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistogramError {
    /// The standard deviation is too small (or not finite) to derive a
    /// positive bin width.
    #[error("standard deviation {std_dev} yields a zero-width bin (need std_dev >= 8)")]
    ZeroBinWidth {
        /// The offending standard deviation.
        std_dev: f64,
    },
    /// The upper bound admits no bins.
    #[error("upper bound {max} admits no bins (need a finite max >= 0)")]
    EmptyRange {
        /// The offending upper bound.
        max: f64,
    },
    /// The upper bound would derive more bins than [`MAX_BINS`].
    #[error("upper bound {max} derives more than {MAX_BINS} bins")]
    TooManyBins {
        /// The offending upper bound.
        max: f64,
    },
}

/// A fixed-width histogram over a numeric sequence.
///
/// The bin width is derived as `floor(std_dev / 8)` and the bins cover
/// `0..=floor(max / bin_width)`, each labeled by its lower bound. Values
/// outside that range (outliers, negatives) are clamped into the edge
/// bins rather than dropped, so the counts always sum to the input
/// length.
///
/// # Examples
/// ```
/// use nbstat::report::Histogram;
///
/// let h = Histogram::from_data(&[10.0, 20.0, 30.0], 80.0, 100.0, "x").unwrap();
/// assert_eq!(h.bin_width(), 10);
/// assert_eq!(h.counts().len(), 11);
/// assert!(h.render().starts_with("%table x\tx\n"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    name: String,
    bin_width: u64,
    counts: Vec<u64>,
}

impl Histogram {
    /// Buckets `data` into fixed-width bins.
    ///
    /// # Arguments
    /// * `data` - The values to bucket.
    /// * `std_dev` - Spread estimate the bin width is derived from
    ///   (`floor(std_dev / 8)`).
    /// * `max` - Upper bound of the binned range; the last bin starts at
    ///   `floor(max / bin_width) * bin_width`.
    /// * `name` - Column label for the report header.
    ///
    /// # Returns
    /// - `Err(ZeroBinWidth)` if `std_dev < 8` or non-finite.
    /// - `Err(EmptyRange)` if `max` is negative or non-finite.
    /// - `Err(TooManyBins)` if `max / bin_width` reaches [`MAX_BINS`].
    pub fn from_data(
        data: &[f64],
        std_dev: f64,
        max: f64,
        name: &str,
    ) -> Result<Self, HistogramError> {
        if !std_dev.is_finite() || std_dev < 8.0 {
            return Err(HistogramError::ZeroBinWidth { std_dev });
        }
        let bin_width = (std_dev / 8.0).floor() as u64;
        if !max.is_finite() || max < 0.0 {
            return Err(HistogramError::EmptyRange { max });
        }
        // Bound the table before the cast: a huge max would saturate the
        // usize conversion and blow up the allocation below.
        if max / bin_width as f64 >= MAX_BINS as f64 {
            return Err(HistogramError::TooManyBins { max });
        }
        let max_bin = (max / bin_width as f64).floor() as usize;

        log::debug!(
            "histogram `{name}`: max={max} max_bin={max_bin} bin_width={bin_width}"
        );

        let mut counts = vec![0_u64; max_bin + 1];
        for &value in data {
            // NaN falls through the clamp and the saturating cast to bin 0.
            let bin = (value / bin_width as f64)
                .floor()
                .clamp(0.0, max_bin as f64) as usize;
            counts[bin] += 1;
        }

        Ok(Histogram {
            name: name.to_owned(),
            bin_width,
            counts,
        })
    }

    /// Returns the derived bin width.
    pub fn bin_width(&self) -> u64 {
        self.bin_width
    }

    /// Returns the per-bin counts, indexed by bin.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Iterates over `(bin_lower_bound, count)` pairs in bin order.
    pub fn bins(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (i as u64 * self.bin_width, count))
    }

    /// Renders the report table.
    ///
    /// Format: a `%table x\t<name>` header line, then one
    /// `<bin_lower>\t<count>` line per bin in increasing order.
    pub fn render(&self) -> String {
        let mut out = format!("%table x\t{}\n", self.name);
        for (lower, count) in self.bins() {
            out.push_str(&format!("{lower}\t{count}\n"));
        }
        out
    }

    /// Writes the rendered report to `out`.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())
    }
}

/// A caller-supplied value → display-label mapping.
///
/// Keys are compared bitwise via [`f64::total_cmp`], so `-0.0` and `0.0`
/// are distinct keys and NaN keys are allowed (if pointless). The map is
/// read-only to the report functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMap {
    entries: Vec<(f64, String)>,
}

impl LabelMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `value` with `label`, replacing any previous label.
    pub fn insert(&mut self, value: f64, label: impl Into<String>) {
        let label = label.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.total_cmp(&value).is_eq())
        {
            Some((_, existing)) => *existing = label,
            None => self.entries.push((value, label)),
        }
    }

    /// Returns the label for `value`, if any.
    pub fn get(&self, value: f64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.total_cmp(&value).is_eq())
            .map(|(_, label)| label.as_str())
    }

    /// Returns the number of labeled values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no values are labeled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(f64, String)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (f64, String)>>(iter: I) -> Self {
        let mut map = LabelMap::new();
        for (value, label) in iter {
            map.insert(value, label);
        }
        map
    }
}

/// Renders the outlier report: an `outliers:` header, then one
/// `<label>:<value>` line per element of `values` strictly greater than
/// `threshold`, in input order.
///
/// A value with no entry in `labels` renders its label as `?`.
///
/// # Examples
/// ```
/// use nbstat::report::{render_outliers, LabelMap};
///
/// let mut labels = LabelMap::new();
/// labels.insert(50.0, "api");
/// labels.insert(500.0, "db");
///
/// let report = render_outliers(&[5.0, 50.0, 500.0], 10.0, &labels);
/// assert_eq!(report, "outliers:\napi:50\ndb:500\n");
/// ```
pub fn render_outliers(values: &[f64], threshold: f64, labels: &LabelMap) -> String {
    let mut out = String::from("outliers:\n");
    for &value in values {
        if value > threshold {
            let label = labels.get(value).unwrap_or("?");
            out.push_str(&format!("{label}:{value}\n"));
        }
    }
    out
}

/// Writes the outlier report to `out`. See [`render_outliers`] for the
/// format.
pub fn write_outliers<W: io::Write>(
    values: &[f64],
    threshold: f64,
    labels: &LabelMap,
    mut out: W,
) -> io::Result<()> {
    out.write_all(render_outliers(values, threshold, labels).as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        // --- counts always sum to the input length (clamping property) ---
        #[test]
        fn histogram_counts_sum_to_input_len(
            data in proptest::collection::vec(-1e6_f64..1e6, 0..100),
            std_dev in 8.0_f64..1e4,
            max in 0.0_f64..1e4,
        ) {
            let h = Histogram::from_data(&data, std_dev, max, "p").unwrap();
            prop_assert_eq!(h.counts().iter().sum::<u64>(), data.len() as u64);
        }

        // --- bin count and width follow the derivation ---
        #[test]
        fn histogram_shape(std_dev in 8.0_f64..1e4, max in 0.0_f64..1e4) {
            let h = Histogram::from_data(&[], std_dev, max, "p").unwrap();
            let expected_width = (std_dev / 8.0).floor() as u64;
            prop_assert_eq!(h.bin_width(), expected_width);
            let expected_bins = (max / expected_width as f64).floor() as usize + 1;
            prop_assert_eq!(h.counts().len(), expected_bins);
        }

        // --- outlier report lists exactly the values above the threshold ---
        #[test]
        fn outliers_are_strictly_above_threshold(
            data in proptest::collection::vec(-1e6_f64..1e6, 0..50),
            threshold in -1e6_f64..1e6,
        ) {
            let report = render_outliers(&data, threshold, &LabelMap::new());
            let expected = data.iter().filter(|&&v| v > threshold).count();
            prop_assert_eq!(report.lines().count(), expected + 1);
        }
    }
}
