//! Static source metrics for Solidity contracts.
//!
//! Produces a markdown report of line counts, declarations, a complexity
//! estimate, and security-relevant capabilities for a single `.sol` file or
//! every `.sol` file in a directory.
//!
//! ```text
//! path ──▶ list .sol files ──▶ analyze each ──▶ fold into totals ──▶ markdown
//! ```
//!
//! Each file is parsed with the tree-sitter Solidity grammar. A file the
//! grammar rejects fails the whole run with [`MetricsError::Parse`].

pub mod analyzer;
mod generate;
pub mod report;
pub mod totals;

use std::path::PathBuf;

pub use analyzer::{
    Capabilities, DeclarationMetrics, FileMetrics, LineMetrics, analyze_file, analyze_source,
};
pub use generate::{collect_metrics, generate_metrics};
pub use report::MetricsReport;
pub use totals::MetricsTotals;

/// File extension of Solidity sources.
pub const SOURCE_EXTENSION: &str = ".sol";

/// Errors from metrics generation.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("no .sol files found in {}", path.display())]
    NoSources { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Solidity grammar unavailable: {0}")]
    Grammar(String),

    #[error("parse error in {} at line {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}
