//! Aggregate metrics across files.
//!
//! [`MetricsTotals`] is a plain value folded over per-file results:
//!
//! ```text
//! files.iter().fold(MetricsTotals::default(), MetricsTotals::absorb)
//! ```

use crate::analyzer::{Capabilities, DeclarationMetrics, FileMetrics, LineMetrics};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsTotals {
    pub files: usize,
    pub lines: LineMetrics,
    pub declarations: DeclarationMetrics,
    pub capabilities: Capabilities,
    /// Distinct `pragma solidity` constraints seen across files.
    pub pragmas: BTreeSet<String>,
    pub imports: usize,
    pub complexity: usize,
}

impl MetricsTotals {
    /// Fold one file's metrics into the running totals.
    pub fn absorb(mut self, file: &FileMetrics) -> Self {
        self.files += 1;
        self.lines += file.lines;
        self.declarations += file.declarations;
        self.capabilities += file.capabilities;
        self.pragmas.extend(file.pragmas.iter().cloned());
        self.imports += file.imports;
        self.complexity += file.complexity;
        self
    }

    /// Average complexity per function, 0 when there are none.
    pub fn complexity_per_function(&self) -> f64 {
        if self.declarations.functions == 0 {
            0.0
        } else {
            self.complexity as f64 / self.declarations.functions as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_source;
    use std::path::Path;

    #[test]
    fn absorb_sums_files() {
        let a = analyze_source(
            Path::new("A.sol"),
            "pragma solidity ^0.8.0;\ncontract A {\n function f() public { if (true) {} }\n}\n",
        )
        .unwrap();
        let b = analyze_source(
            Path::new("B.sol"),
            "pragma solidity >=0.7.0 <0.9.0;\n// helper\nlibrary B {\n function g() internal {}\n}\n",
        )
        .unwrap();

        let totals = [&a, &b]
            .into_iter()
            .fold(MetricsTotals::default(), MetricsTotals::absorb);

        assert_eq!(totals.files, 2);
        assert_eq!(totals.lines.total, a.lines.total + b.lines.total);
        assert_eq!(totals.lines.comment, 1);
        assert_eq!(totals.declarations.contracts, 1);
        assert_eq!(totals.declarations.libraries, 1);
        assert_eq!(totals.declarations.functions, 2);
        assert_eq!(totals.complexity, 3);
        assert_eq!(
            totals.pragmas.iter().cloned().collect::<Vec<_>>(),
            vec![">=0.7.0 <0.9.0".to_string(), "^0.8.0".to_string()]
        );
        assert!((totals.complexity_per_function() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_pragmas_collapse() {
        let src = "pragma solidity ^0.8.0;\ncontract A {}\n";
        let a = analyze_source(Path::new("A.sol"), src).unwrap();
        let b = analyze_source(Path::new("B.sol"), src).unwrap();
        let totals = MetricsTotals::default().absorb(&a).absorb(&b);
        assert_eq!(totals.pragmas.len(), 1);
    }

    #[test]
    fn empty_totals() {
        let totals = MetricsTotals::default();
        assert_eq!(totals.files, 0);
        assert_eq!(totals.complexity_per_function(), 0.0);
    }
}
