//! Markdown rendering of collected metrics.

use crate::analyzer::{Capabilities, FileMetrics};
use crate::totals::MetricsTotals;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

/// Metrics for a run: the per-file results and their totals.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// What was analyzed (the input path as given).
    pub title: String,
    pub files: Vec<FileMetrics>,
    pub totals: MetricsTotals,
    pub generated_at: DateTime<Utc>,
}

impl MetricsReport {
    /// Build a report, folding `files` into totals.
    pub fn new(title: impl Into<String>, files: Vec<FileMetrics>) -> Self {
        let totals = files
            .iter()
            .fold(MetricsTotals::default(), MetricsTotals::absorb);
        Self {
            title: title.into(),
            files,
            totals,
            generated_at: Utc::now(),
        }
    }

    pub fn render_markdown(&self) -> String {
        let t = &self.totals;
        let d = &t.declarations;
        let mut out = String::new();

        out.push_str(&format!("# Solidity Metrics for `{}`\n\n", self.title));
        out.push_str(&format!(
            "_Generated {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        out.push_str("## Totals\n\n");
        table_header(&mut out, "Metric", "Value");
        row(&mut out, "Files", t.files);
        row(&mut out, "Total lines", t.lines.total);
        row(&mut out, "Source lines (nSLOC)", t.lines.source);
        row(&mut out, "Comment lines", t.lines.comment);
        row(&mut out, "Blank lines", t.lines.blank);
        row(&mut out, "Comment ratio", format!("{:.2}", t.lines.comment_ratio()));
        row(&mut out, "Complexity score", t.complexity);
        row(
            &mut out,
            "Complexity per function",
            format!("{:.2}", t.complexity_per_function()),
        );
        row(&mut out, "Contracts", d.contracts);
        row(&mut out, "Abstract contracts", d.abstract_contracts);
        row(&mut out, "Interfaces", d.interfaces);
        row(&mut out, "Libraries", d.libraries);
        row(&mut out, "Functions", d.functions);
        row(&mut out, "Modifiers", d.modifiers);
        row(&mut out, "Events", d.events);
        row(&mut out, "Structs", d.structs);
        row(&mut out, "Enums", d.enums);
        row(&mut out, "Imports", t.imports);
        out.push('\n');

        if !t.pragmas.is_empty() {
            let versions: Vec<String> = t.pragmas.iter().map(|p| format!("`{p}`")).collect();
            out.push_str(&format!("**Solidity versions:** {}\n\n", versions.join(", ")));
        }

        out.push_str("### Capabilities\n\n");
        write_capabilities(&mut out, &t.capabilities);

        out.push_str("## Files\n\n");
        for file in &self.files {
            write_file_section(&mut out, file);
        }

        out
    }
}

fn table_header(out: &mut String, left: &str, right: &str) {
    out.push_str(&format!("| {left} | {right} |\n|---|---:|\n"));
}

fn row(out: &mut String, label: &str, value: impl Display) {
    out.push_str(&format!("| {label} | {value} |\n"));
}

fn write_capabilities(out: &mut String, caps: &Capabilities) {
    table_header(out, "Capability", "Occurrences");
    for (label, count) in caps.entries() {
        row(out, label, count);
    }
    out.push('\n');
}

fn write_file_section(out: &mut String, file: &FileMetrics) {
    let d = &file.declarations;

    out.push_str(&format!("### `{}`\n\n", file.display_name()));
    out.push_str(&format!("Path: `{}`\n\n", file.path.display()));
    table_header(out, "Metric", "Value");
    row(out, "Total lines", file.lines.total);
    row(out, "Source lines (nSLOC)", file.lines.source);
    row(out, "Comment lines", file.lines.comment);
    row(out, "Blank lines", file.lines.blank);
    row(out, "Complexity score", file.complexity);
    row(
        out,
        "Contracts / abstract / interfaces / libraries",
        format!(
            "{} / {} / {} / {}",
            d.contracts, d.abstract_contracts, d.interfaces, d.libraries
        ),
    );
    row(out, "Functions", d.functions);
    row(out, "Modifiers", d.modifiers);
    row(out, "Events", d.events);
    row(out, "Structs / enums", format!("{} / {}", d.structs, d.enums));
    row(out, "Imports", file.imports);
    if !file.pragmas.is_empty() {
        row(out, "Pragma", format!("`{}`", file.pragmas.join("`, `")));
    }
    out.push('\n');

    let flagged: Vec<String> = file
        .capabilities
        .entries()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| format!("{label} ({count})"))
        .collect();
    if flagged.is_empty() {
        out.push_str("Capabilities: none detected\n\n");
    } else {
        out.push_str(&format!("Capabilities: {}\n\n", flagged.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_source;
    use std::path::Path;

    fn report() -> MetricsReport {
        let token = analyze_source(
            Path::new("src/Token.sol"),
            "pragma solidity ^0.8.20;\ncontract Token {\n function pay() external payable {}\n}\n",
        )
        .unwrap();
        let lib = analyze_source(
            Path::new("src/SafeMath.sol"),
            "library SafeMath {\n function add(uint a, uint b) internal pure returns (uint) { return a + b; }\n}\n",
        )
        .unwrap();
        MetricsReport::new("src", vec![token, lib])
    }

    #[test]
    fn report_has_totals_and_file_sections() {
        let md = report().render_markdown();
        assert!(md.starts_with("# Solidity Metrics for `src`"));
        assert!(md.contains("## Totals"));
        assert!(md.contains("| Files | 2 |"));
        assert!(md.contains("### `Token.sol`"));
        assert!(md.contains("### `SafeMath.sol`"));
        assert!(md.contains("**Solidity versions:** `^0.8.20`"));
    }

    #[test]
    fn capabilities_listed_per_file() {
        let md = report().render_markdown();
        assert!(md.contains("Capabilities: Payable functions (1)"));
        assert!(md.contains("Capabilities: none detected"));
        assert!(md.contains("| Payable functions | 1 |"));
    }

    #[test]
    fn totals_match_files() {
        let r = report();
        assert_eq!(r.totals.files, 2);
        assert_eq!(r.totals.declarations.functions, 2);
        assert_eq!(
            r.totals.lines.total,
            r.files.iter().map(|f| f.lines.total).sum::<usize>()
        );
    }
}
