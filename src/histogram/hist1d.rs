use serde::Serialize;

use super::variable::VarInfo;

/// Y-axis title of every booked histogram.
pub const Y_AXIS_TITLE: &str = "Number of Entries";

/// A 1D histogram with fixed uniform binning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hist1D {
    /// Histogram name.
    pub name: String,
    /// X-axis title.
    pub x_title: String,
    /// Y-axis title.
    pub y_title: String,
    /// Bin edges (length = n_bins + 1).
    pub bin_edges: Vec<f64>,
    /// Bin contents (length = n_bins, excluding under/overflow).
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin.
    pub sumw2: Vec<f64>,
    /// Content below the first edge.
    pub underflow: f64,
    /// Content at or above the last edge.
    pub overflow: f64,
    /// Number of fills, including under/overflow.
    pub entries: u64,
}

impl Hist1D {
    /// Create an empty histogram. `info` must have at least one bin and
    /// `high > low` (see [`VarInfo::is_valid`]).
    pub fn new(name: impl Into<String>, info: &VarInfo) -> Self {
        let n_bins = info.n_bins.max(1);
        let width = (info.high - info.low) / n_bins as f64;
        let bin_edges = (0..=n_bins)
            .map(|i| {
                if i == n_bins {
                    info.high
                } else {
                    info.low + i as f64 * width
                }
            })
            .collect();

        Self {
            name: name.into(),
            x_title: info.label.clone(),
            y_title: Y_AXIS_TITLE.to_string(),
            bin_edges,
            bin_content: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
        }
    }

    /// Number of bins, excluding under/overflow.
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    /// Lower edge of the first bin.
    pub fn x_min(&self) -> f64 {
        self.bin_edges[0]
    }

    /// Upper edge of the last bin.
    pub fn x_max(&self) -> f64 {
        self.bin_edges[self.bin_edges.len() - 1]
    }

    /// Add one unit-weight entry. NaN is ignored.
    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    /// Add one weighted entry. NaN is ignored.
    pub fn fill_weighted(&mut self, x: f64, weight: f64) {
        if x.is_nan() {
            return;
        }
        self.entries += 1;
        match self.find_bin(x) {
            Some(bin) => {
                self.bin_content[bin] += weight;
                self.sumw2[bin] += weight * weight;
            }
            None if x < self.x_min() => self.underflow += weight,
            None => self.overflow += weight,
        }
    }

    /// Bin holding `x`, `None` for underflow/overflow.
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if !(x >= self.x_min() && x < self.x_max()) {
            return None;
        }
        let upper = self.bin_edges.partition_point(|&edge| edge <= x);
        upper.checked_sub(1).filter(|&bin| bin < self.n_bins())
    }

    /// Center of a bin.
    pub fn bin_center(&self, bin: usize) -> f64 {
        0.5 * (self.bin_edges[bin] + self.bin_edges[bin + 1])
    }

    /// Statistical error of a bin, `sqrt(sumw2)`.
    pub fn bin_error(&self, bin: usize) -> f64 {
        self.sumw2[bin].sqrt()
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Largest bin content plus its error, 0 for an empty histogram.
    pub fn max_with_error(&self) -> f64 {
        (0..self.n_bins())
            .map(|bin| self.bin_content[bin] + self.bin_error(bin))
            .fold(0.0, f64::max)
    }

    /// Reset every bin and counter.
    pub fn reset(&mut self) {
        self.bin_content.iter_mut().for_each(|c| *c = 0.0);
        self.sumw2.iter_mut().for_each(|c| *c = 0.0);
        self.underflow = 0.0;
        self.overflow = 0.0;
        self.entries = 0;
    }
}
