//! Output formatting and posterior rendering.
//!
//! - **JSON** (`json`): machine-readable results
//! - **Terminal** (`terminal`): human-readable reports and text density plots
//!
//! Rendering goes through [`PosteriorRenderer`] so the comparator never
//! depends on a particular display surface.

pub mod json;
pub mod terminal;

use std::fmt;

use bayes_ttest_core::Trace;

pub use terminal::{format_result, TerminalRenderer};

/// Errors raised by a renderer.
#[derive(Debug)]
pub enum VisualizationError {
    /// Writing to the output sink failed.
    Io(std::io::Error),

    /// A series had no draws to plot.
    EmptyTrace {
        /// Label of the series.
        label: String,
    },

    /// Nothing was asked to be drawn.
    NoPanels,

    /// No renderer is attached to the comparator.
    Unavailable,
}

impl fmt::Display for VisualizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualizationError::Io(e) => write!(f, "IO error: {}", e),
            VisualizationError::EmptyTrace { label } => {
                write!(f, "series '{}' has no draws to plot", label)
            }
            VisualizationError::NoPanels => write!(f, "no panels to render"),
            VisualizationError::Unavailable => write!(f, "no renderer configured"),
        }
    }
}

impl std::error::Error for VisualizationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VisualizationError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VisualizationError {
    fn from(e: std::io::Error) -> Self {
        VisualizationError::Io(e)
    }
}

/// One plot: one or more labelled traces sharing an axis.
#[derive(Debug, Clone)]
pub struct DensityPanel<'a> {
    /// Panel heading.
    pub title: String,

    /// `(label, trace)` pairs drawn on the same axis.
    pub series: Vec<(&'a str, &'a Trace)>,

    /// Value to mark on the axis (e.g. zero for a difference).
    pub reference: Option<f64>,
}

impl<'a> DensityPanel<'a> {
    /// Create an empty panel.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            reference: None,
        }
    }

    /// Add a labelled trace.
    pub fn series(mut self, label: &'a str, trace: &'a Trace) -> Self {
        self.series.push((label, trace));
        self
    }

    /// Mark a reference value.
    pub fn reference(mut self, value: f64) -> Self {
        self.reference = Some(value);
        self
    }
}

/// Visualization collaborator: draws posterior densities somewhere.
///
/// `show = false` prepares the rendering without displaying it.
pub trait PosteriorRenderer: Send + Sync {
    /// Render the panels.
    fn render(&self, panels: &[DensityPanel<'_>], show: bool) -> Result<(), VisualizationError>;
}
