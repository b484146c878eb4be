//! Scenario files
//!
//! A scenario bundles everything one calculation needs — bill, roster,
//! configuration, display currency — into a single YAML document. The demo
//! binary runs them; tests use them as fixtures.

use std::{fs, path::Path};

use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{bill::BillData, config::SplitConfig, members::Member};

/// Errors loading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("failed to read scenario file {path}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file was not a valid scenario document.
    #[error("failed to parse scenario file {path}")]
    Parse {
        /// Path that failed.
        path: String,
        /// Underlying parse error.
        source: serde_norway::Error,
    },

    /// The currency code matched no ISO currency.
    #[error("unknown currency code \"{0}\"")]
    UnknownCurrency(String),
}

fn default_currency() -> String {
    "USD".to_owned()
}

/// An on-disk split scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// ISO 4217 code used for display formatting.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// The captured bill.
    pub bill: BillData,
    /// The group roster.
    pub members: Vec<Member>,
    /// Assignments, strategies, and payment record.
    #[serde(default)]
    pub config: SplitConfig,
}

impl Scenario {
    /// Loads a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// - [`ScenarioError::Io`]: the file could not be read.
    /// - [`ScenarioError::Parse`]: the contents were not a valid scenario.
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_norway::from_str(&text).map_err(|source| ScenarioError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolves the scenario's currency code.
    ///
    /// # Errors
    ///
    /// - [`ScenarioError::UnknownCurrency`]: the code matched no ISO
    ///   currency.
    pub fn currency(&self) -> Result<&'static Currency, ScenarioError> {
        iso::find(&self.currency)
            .ok_or_else(|| ScenarioError::UnknownCurrency(self.currency.clone()))
    }
}
