// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch and
// formats the per-epoch console line.
//
// Metrics recorded per epoch:
//   - epoch:         the epoch number (1, 2, 3, ...)
//   - train_loss:    mean binary cross-entropy over train reviews
//   - eval_loss:     mean binary cross-entropy over eval reviews
//   - eval_accuracy: fraction of eval reviews on the right side of 0.5
//   - improved:      whether this epoch wrote a new best checkpoint
//
// Output file: <checkpoint_dir>/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,eval_loss,eval_accuracy,improved
//   1,0.693100,0.690400,0.512000,true
//   2,0.641800,0.655900,0.618000,true
//
// Which metrics show up in the console line is controlled by
// the traced metric list in the pipeline configuration. The CSV
// always carries every column.

use anyhow::{Context, Result};
use std::{
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};
use serde::{Deserialize, Serialize};

pub const METRICS_FILE: &str = "metrics.csv";

const CSV_HEADER: &str = "epoch,train_loss,eval_loss,eval_accuracy,improved";

// ─── TrackedMetric ────────────────────────────────────────────────────────────
/// A metric that can be named in the trace list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedMetric {
    Loss,
    Accuracy,
}

impl fmt::Display for TrackedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loss     => write!(f, "loss"),
            Self::Accuracy => write!(f, "accuracy"),
        }
    }
}

impl FromStr for TrackedMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loss"               => Ok(Self::Loss),
            "accuracy" | "acc"   => Ok(Self::Accuracy),
            other => Err(format!("unknown metric '{other}' (expected 'loss' or 'accuracy')")),
        }
    }
}

// ─── EpochMetrics ─────────────────────────────────────────────────────────────
/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average loss over the training batches of this epoch.
    /// A fresh model sits near ln(2) ≈ 0.693.
    pub train_loss: f64,

    /// Average loss over the evaluation batches
    pub eval_loss: f64,

    /// Fraction of evaluation reviews classified correctly, [0.0, 1.0]
    pub eval_accuracy: f64,

    /// True if this epoch produced a new best checkpoint
    pub improved: bool,
}

impl EpochMetrics {
    /// Console summary restricted to the traced metrics.
    /// Train loss is always shown; it is what the loop optimises.
    pub fn summary(&self, total_epochs: usize, traced: &[TrackedMetric]) -> String {
        let mut line = format!(
            "Epoch {:>3}/{} | train_loss={:.4}",
            self.epoch, total_epochs, self.train_loss
        );
        for metric in traced {
            match metric {
                TrackedMetric::Loss => {
                    line.push_str(&format!(" | eval_loss={:.4}", self.eval_loss));
                }
                TrackedMetric::Accuracy => {
                    line.push_str(&format!(" | eval_accuracy={:.1}%", self.eval_accuracy * 100.0));
                }
            }
        }
        if self.improved {
            line.push_str(" | checkpoint saved");
        }
        line
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.6},{}",
            self.epoch, self.train_loss, self.eval_loss, self.eval_accuracy, self.improved,
        )
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────
/// Appends epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger in `dir`.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join(METRICS_FILE);

        // Appending across runs keeps a history of every training session
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", m.csv_row())?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, eval_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.eval_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
