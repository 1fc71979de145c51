//! # Histogram Store
//!
//! One-dimensional histograms keyed by [`Category`] and [`Variable`], with
//! booking, filling and rendering.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chiforest::histogram::{Beam, Category, HistogramStore, Variable};
//!
//! let category = Category::new("DATA", Beam::PA);
//! let variables: BTreeMap<_, _> = Variable::ALL
//!     .into_iter()
//!     .map(|v| (v, v.default_info()))
//!     .collect();
//!
//! let mut store = HistogramStore::new();
//! store.book(&category, &variables);
//! store.fill(&category, &[(Variable::ChicMass, 3.515)]);
//!
//! let hist = store.get(&category, Variable::ChicMass).unwrap();
//! assert_eq!(hist.name, "h_DATA_PA_ChiC_M");
//! assert_eq!(hist.entries, 1);
//! ```

mod category;
mod hist1d;
mod store;
mod variable;


pub use category::{Beam, Category};
pub use hist1d::{Hist1D, Y_AXIS_TITLE};
pub use store::HistogramStore;
pub use variable::{VarInfo, Variable};
