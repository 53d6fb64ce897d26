//! Per-node repricing report for a bootstrapped curve.

use tenor_core::types::Date;

use crate::helpers::HelperKind;

/// Outcome for one helper after a bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeReport {
    /// Helper index in maturity order.
    pub node: usize,
    /// Helper description.
    pub description: String,
    /// Helper type.
    pub kind: HelperKind,
    /// Node date.
    pub maturity: Date,
    /// Solved node value.
    pub value: f64,
    /// Solver evaluations spent on this node.
    pub evaluations: usize,
    /// Market quote.
    pub market_quote: f64,
    /// Quote implied by the finished curve.
    pub implied_quote: f64,
}

impl NodeReport {
    /// Market minus implied quote.
    pub fn error(&self) -> f64 {
        self.market_quote - self.implied_quote
    }
}

/// Repricing of every helper against the finished curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapReport {
    nodes: Vec<NodeReport>,
}

impl BootstrapReport {
    pub(crate) fn new(nodes: Vec<NodeReport>) -> Self {
        Self { nodes }
    }

    /// One entry per helper, in maturity order.
    pub fn nodes(&self) -> &[NodeReport] {
        &self.nodes
    }

    /// Largest absolute quote error.
    pub fn max_error(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.error().abs())
            .fold(0.0, f64::max)
    }

    /// Root mean square quote error.
    pub fn rms_error(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.nodes.iter().map(|n| n.error().powi(2)).sum();
        (sum / self.nodes.len() as f64).sqrt()
    }

    /// Total solver evaluations across nodes.
    pub fn total_evaluations(&self) -> usize {
        self.nodes.iter().map(|n| n.evaluations).sum()
    }

    /// True if every helper reprices within `tolerance`.
    pub fn is_within(&self, tolerance: f64) -> bool {
        self.max_error() <= tolerance
    }
}
