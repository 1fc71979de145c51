use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use log::{debug, info};
use serde::Serialize;

use crate::histogram::{Category, HistogramStore, VarInfo, Variable};
use crate::reader::{ConversionTree, MuonTree, ReaderConfig};
use crate::schema::{ConversionColumn, MuonColumn};

use super::config::{AnalysisConfig, DATA_SAMPLE};
use super::error::AnalysisError;
use super::selection::{dimuon_accepted, Candidate, ConversionRow, MuonRow};

/// Conversion columns read by the selection.
const CONVERSION_COLUMNS: [ConversionColumn; 7] = [
    ConversionColumn::EventRun,
    ConversionColumn::EventNumber,
    ConversionColumn::RecoDiMuonConvMom,
    ConversionColumn::RecoDiMuonConvConversionIdx,
    ConversionColumn::RecoDiMuonConvDiMuonIdx,
    ConversionColumn::RecoChiMass,
    ConversionColumn::RecoChiType,
];

/// Muon columns read by the selection.
const MUON_COLUMNS: [MuonColumn; 6] = [
    MuonColumn::EventRun,
    MuonColumn::EventNumber,
    MuonColumn::RecoDiMuonMom,
    MuonColumn::RecoDiMuonMuon1Idx,
    MuonColumn::RecoDiMuonMuon2Idx,
    MuonColumn::RecoMuonMom,
];

/// Counters of an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    /// Rows read and fully processed, over every sample
    pub rows_processed: u64,
    /// Candidates examined, once per applicable category
    pub candidates_seen: u64,
    /// Candidates that passed the cuts and filled a histogram
    pub candidates_accepted: u64,
    /// Candidates skipped for an out-of-range index
    pub skipped_candidates: u64,
    /// Distinct dimuons used, counted per row and category
    pub dimuons_used: u64,
    /// Distinct conversions used, counted per row and category
    pub conversions_used: u64,
}

/// Result of a complete run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Filled histograms
    pub histograms: HistogramStore,
    /// Run counters
    pub stats: AnalysisStats,
    /// Images written by the final render
    pub images: Vec<PathBuf>,
}

/// Chi_c / chi_b candidate selection over one or more forests.
///
/// The incremental API keeps every histogram filled so far inspectable when
/// a sample aborts.
pub struct ChiAnalysis {
    config: AnalysisConfig,
    variables: BTreeMap<Variable, VarInfo>,
    samples: Vec<String>,
    categories: Vec<Category>,
    histograms: HistogramStore,
    stats: AnalysisStats,
}

impl ChiAnalysis {
    /// Validate `config` and derive the sample labels and categories.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let variables = config.variables()?;
        let samples = sample_labels(&config);
        let categories = categories(&config, &samples);
        Ok(Self {
            config,
            variables,
            samples,
            categories,
            histograms: HistogramStore::new(),
            stats: AnalysisStats::default(),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Labels of the samples with a configured forest, in processing order.
    pub fn sample_labels(&self) -> &[String] {
        &self.samples
    }

    /// Histogram categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Book every (category, variable) histogram.
    pub fn book(&mut self) {
        for category in &self.categories {
            self.histograms.book(category, &self.variables);
        }
    }

    /// Open the forest of `sample` and run the selection over all its rows.
    pub fn process_sample(&mut self, sample: &str) -> Result<(), AnalysisError> {
        let path = self
            .config
            .samples
            .get(sample)
            .ok_or_else(|| AnalysisError::UnknownSample(sample.to_string()))?;
        let reader_config = ReaderConfig {
            batch_size: self.config.batch_size,
        };

        let mut muon = MuonTree::open_with_config(path, reader_config.clone())?;
        let mut conversion = ConversionTree::open_with_config(path, reader_config)?;
        if muon.row_count() != conversion.row_count() {
            return Err(AnalysisError::EntryCountMismatch {
                sample: sample.to_string(),
                muon: muon.row_count(),
                conversion: conversion.row_count(),
            });
        }

        muon.activate(&MUON_COLUMNS)?;
        if self.config.cuts.require_global {
            muon.activate(&[MuonColumn::RecoMuonIsGlobal])?;
        }
        conversion.activate(&CONVERSION_COLUMNS)?;

        self.process_trees(sample, &mut muon, &mut conversion)
    }

    /// Run the selection over already opened and activated trees.
    pub fn process_trees(
        &mut self,
        sample: &str,
        muon: &mut MuonTree,
        conversion: &mut ConversionTree,
    ) -> Result<(), AnalysisError> {
        let rows = muon.row_count();
        let applicable: Vec<Category> = self
            .categories
            .iter()
            .filter(|category| category.matches(sample))
            .cloned()
            .collect();

        for row in 0..rows {
            muon.advance(row)?;
            conversion.advance(row)?;
            check_event_ids(sample, row, muon, conversion)?;
            muon.decode_composites()?;
            conversion.decode_composites()?;
            if row as u64 % self.config.progress_interval == 0 {
                info!("{} : {}/{}", sample, row, rows);
            }

            let run = muon.event_run();
            let muon_row = MuonRow::from_tree(muon);
            let conversion_row = ConversionRow::from_tree(conversion);
            for category in &applicable {
                if !self.keeps_run(category, run) {
                    continue;
                }
                self.select_candidates(sample, row, category, &conversion_row, &muon_row)?;
            }
            self.stats.rows_processed += 1;
        }
        Ok(())
    }

    fn keeps_run(&self, category: &Category, run: u32) -> bool {
        if !category.matches(DATA_SAMPLE) {
            return true;
        }
        self.config
            .gates
            .range(category.beam)
            .map_or(true, |range| range.contains(run))
    }

    fn select_candidates(
        &mut self,
        sample: &str,
        row: usize,
        category: &Category,
        conversion: &ConversionRow<'_>,
        muon: &MuonRow<'_>,
    ) -> Result<(), AnalysisError> {
        let mut used_dimuons = BTreeSet::new();
        let mut used_conversions = BTreeSet::new();

        for index in 0..conversion.len() {
            self.stats.candidates_seen += 1;
            let Some(candidate) = Candidate::resolve(conversion, muon, index) else {
                debug!("{} row {}: candidate {} has an out-of-range index", sample, row, index);
                self.stats.skipped_candidates += 1;
                continue;
            };
            if let Err(expected) = candidate.check_mass(&self.config.sanity) {
                return Err(AnalysisError::MassSanity {
                    sample: sample.to_string(),
                    row,
                    candidate: index,
                    chi_type: candidate.chi_type,
                    mass: candidate.dimuon_mass(),
                    expected,
                });
            }
            let Some(muons) = candidate.muons(muon) else {
                debug!("{} row {}: candidate {} has an out-of-range muon index", sample, row, index);
                self.stats.skipped_candidates += 1;
                continue;
            };
            if !dimuon_accepted(muons, muon, &self.config.cuts) {
                continue;
            }
            let Some(variable) = Variable::for_chi_type(candidate.chi_type) else {
                continue;
            };

            self.histograms
                .fill(category, &[(variable, candidate.chi_mass as f64)]);
            self.stats.candidates_accepted += 1;
            if used_dimuons.insert(candidate.dimuon_idx) {
                self.stats.dimuons_used += 1;
            }
            if used_conversions.insert(candidate.conversion_idx) {
                self.stats.conversions_used += 1;
            }
        }
        Ok(())
    }

    /// Histograms filled so far.
    pub fn histograms(&self) -> &HistogramStore {
        &self.histograms
    }

    /// Counters so far.
    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }

    /// Render the histograms with the configured mode and image settings.
    pub fn render(&self) -> Result<Vec<PathBuf>, AnalysisError> {
        let settings = &self.config.render;
        Ok(self.histograms.render(&settings.mode(), &settings.image)?)
    }

    /// Book, process every sample, log the summary and render.
    pub fn run(mut self) -> Result<AnalysisOutcome, AnalysisError> {
        self.book();
        for sample in self.samples.clone() {
            self.process_sample(&sample)?;
        }
        info!(
            "Number of DiMuons: {} and number of conversions: {}",
            self.stats.dimuons_used, self.stats.conversions_used
        );
        for category in &self.categories {
            info!("{}", category);
        }
        let images = self.render()?;
        Ok(AnalysisOutcome {
            histograms: self.histograms,
            stats: self.stats,
            images,
        })
    }
}

fn check_event_ids(
    sample: &str,
    row: usize,
    muon: &MuonTree,
    conversion: &ConversionTree,
) -> Result<(), AnalysisError> {
    if muon.event_run() != conversion.event_run() {
        return Err(AnalysisError::RunMismatch {
            sample: sample.to_string(),
            row,
            muon: muon.event_run(),
            conversion: conversion.event_run(),
        });
    }
    if muon.event_number() != conversion.event_number() {
        return Err(AnalysisError::EventMismatch {
            sample: sample.to_string(),
            row,
            muon: muon.event_number(),
            conversion: conversion.event_number(),
        });
    }
    Ok(())
}

/// `DATA` when it has a forest, otherwise `<sample>_<beam>` for every beam
/// with a forest.
fn sample_labels(config: &AnalysisConfig) -> Vec<String> {
    let mut labels = Vec::new();
    for sample in &config.sample_types {
        if sample == DATA_SAMPLE && config.samples.contains_key(sample) {
            labels.push(sample.clone());
            continue;
        }
        for beam in &config.beams {
            let label = format!("{}_{}", sample, beam);
            if config.samples.contains_key(&label) {
                labels.push(label);
            }
        }
    }
    labels
}

/// Every `<sample>_<beam>` combination whose label contains a sample label.
fn categories(config: &AnalysisConfig, samples: &[String]) -> Vec<Category> {
    let mut categories = Vec::new();
    for sample in &config.sample_types {
        for &beam in &config.beams {
            let category = Category::new(sample.clone(), beam);
            if samples.iter().any(|label| category.matches(label)) {
                categories.push(category);
            }
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Beam;

    fn config(samples: &[&str], types: &[&str], beams: &[Beam]) -> AnalysisConfig {
        AnalysisConfig {
            samples: samples
                .iter()
                .map(|s| (s.to_string(), PathBuf::from(format!("/{}.zip", s))))
                .collect(),
            sample_types: types.iter().map(|s| s.to_string()).collect(),
            beams: beams.to_vec(),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_data_label_has_no_beam() {
        let config = config(&["DATA"], &["DATA"], &[Beam::PPb, Beam::Pbp]);
        let samples = sample_labels(&config);
        assert_eq!(samples, vec!["DATA".to_string()]);

        let categories = categories(&config, &samples);
        assert_eq!(
            categories,
            vec![Category::new("DATA", Beam::PPb), Category::new("DATA", Beam::Pbp)]
        );
    }

    #[test]
    fn test_mc_labels_need_a_forest_per_beam() {
        let config = config(&["MC_pPb", "DATA_Pbp"], &["DATA", "MC"], &[Beam::PPb, Beam::Pbp]);
        let samples = sample_labels(&config);
        assert_eq!(samples, vec!["DATA_Pbp".to_string(), "MC_pPb".to_string()]);

        let categories = categories(&config, &samples);
        assert_eq!(
            categories,
            vec![Category::new("DATA", Beam::Pbp), Category::new("MC", Beam::PPb)]
        );
    }

    #[test]
    fn test_run_gates_apply_to_data_only() {
        let analysis = ChiAnalysis::new(config(&["DATA"], &["DATA"], &[Beam::PA])).unwrap();
        let data_ppb = Category::new("DATA", Beam::PPb);
        let data_pbp = Category::new("DATA", Beam::Pbp);
        let data_pa = Category::new("DATA", Beam::PA);
        let mc_ppb = Category::new("MC", Beam::PPb);

        assert!(analysis.keeps_run(&data_ppb, 285952));
        assert!(analysis.keeps_run(&data_ppb, 286504));
        assert!(!analysis.keeps_run(&data_ppb, 285951));
        assert!(analysis.keeps_run(&data_pbp, 285410));
        assert!(!analysis.keeps_run(&data_pbp, 285952));
        assert!(analysis.keeps_run(&data_pa, 1));
        assert!(analysis.keeps_run(&mc_ppb, 1));
    }

    #[test]
    fn test_unknown_sample() {
        let mut analysis = ChiAnalysis::new(AnalysisConfig::default()).unwrap();
        assert!(analysis.sample_labels().is_empty());
        assert!(analysis.categories().is_empty());
        let err = analysis.process_sample("DATA").unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownSample(s) if s == "DATA"));
    }

    #[test]
    fn test_stats_serialize() {
        let stats = AnalysisStats {
            rows_processed: 3,
            candidates_accepted: 1,
            ..AnalysisStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["rows_processed"], 3);
        assert_eq!(json["candidates_accepted"], 1);
        assert_eq!(json["skipped_candidates"], 0);
    }
}
