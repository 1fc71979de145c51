use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{info, warn};

use crate::render::{render_histograms, RenderConfig, RenderError, RenderMode};

use super::category::Category;
use super::hist1d::Hist1D;
use super::variable::{VarInfo, Variable};

/// Histograms keyed by category and variable.
///
/// Iteration order is deterministic: by category, then by variable.
#[derive(Debug, Clone, Default)]
pub struct HistogramStore {
    hists: BTreeMap<(Category, Variable), Hist1D>,
}

impl HistogramStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the histogram of a (category, variable) pair.
    pub fn histogram_name(category: &Category, variable: Variable) -> String {
        format!("h_{}_{}", category, variable)
    }

    /// Book one histogram per variable for `category`.
    ///
    /// Pairs that are already booked keep their histogram and binning.
    /// Invalid binnings are skipped with a warning.
    pub fn book(&mut self, category: &Category, variables: &BTreeMap<Variable, VarInfo>) {
        for (&variable, var_info) in variables {
            let key = (category.clone(), variable);
            if self.hists.contains_key(&key) {
                continue;
            }
            let name = Self::histogram_name(category, variable);
            if !var_info.is_valid() {
                warn!(
                    "Skipping histogram {}: invalid binning {} bins on [{}, {}]",
                    name, var_info.n_bins, var_info.low, var_info.high
                );
                continue;
            }
            let hist = Hist1D::new(name.clone(), var_info);
            self.hists.insert(key, hist);
            info!("Added histogram: {}", name);
        }
    }

    /// Fill the histograms of `category`. Unbooked pairs are ignored.
    pub fn fill(&mut self, category: &Category, values: &[(Variable, f64)]) {
        for &(variable, value) in values {
            if let Some(hist) = self.hists.get_mut(&(category.clone(), variable)) {
                hist.fill(value);
            }
        }
    }

    /// Histogram of a (category, variable) pair.
    pub fn get(&self, category: &Category, variable: Variable) -> Option<&Hist1D> {
        self.hists.get(&(category.clone(), variable))
    }

    /// Number of booked histograms.
    pub fn len(&self) -> usize {
        self.hists.len()
    }

    /// Whether no histogram is booked.
    pub fn is_empty(&self) -> bool {
        self.hists.is_empty()
    }

    /// Booked histograms in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, Variable, &Hist1D)> + '_ {
        self.hists
            .iter()
            .map(|((category, variable), hist)| (category, *variable, hist))
    }

    /// Categories with at least one booked histogram.
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.hists.keys().map(|(c, _)| c).collect();
        categories.dedup();
        categories
    }

    /// Render the histograms to PNG images. Returns the written files.
    pub fn render(
        &self,
        mode: &RenderMode,
        config: &RenderConfig,
    ) -> Result<Vec<PathBuf>, RenderError> {
        render_histograms(self.iter(), mode, config)
    }

    /// Drop every histogram.
    pub fn dispose(&mut self) {
        self.hists.clear();
    }
}
