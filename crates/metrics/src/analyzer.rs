//! Per-file Solidity metrics.
//!
//! Sources are parsed with the tree-sitter Solidity grammar; every count
//! comes from a walk over the syntax tree, so text inside comments and
//! string literals never matches a declaration or capability.

use crate::MetricsError;
use serde::Serialize;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Line counts for one file or a set of files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineMetrics {
    pub total: usize,
    /// Lines carrying code (nSLOC).
    pub source: usize,
    /// Lines carrying comment text, including mixed code/comment lines.
    pub comment: usize,
    pub blank: usize,
}

impl LineMetrics {
    /// Comment lines per source line; 0 when there is no source.
    pub fn comment_ratio(&self) -> f64 {
        if self.source == 0 {
            0.0
        } else {
            self.comment as f64 / self.source as f64
        }
    }
}

impl AddAssign for LineMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.source += rhs.source;
        self.comment += rhs.comment;
        self.blank += rhs.blank;
    }
}

/// Declaration counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeclarationMetrics {
    pub contracts: usize,
    pub abstract_contracts: usize,
    pub interfaces: usize,
    pub libraries: usize,
    /// Named functions plus constructors, `receive` and `fallback`.
    pub functions: usize,
    pub modifiers: usize,
    pub events: usize,
    pub structs: usize,
    pub enums: usize,
}

impl AddAssign for DeclarationMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.contracts += rhs.contracts;
        self.abstract_contracts += rhs.abstract_contracts;
        self.interfaces += rhs.interfaces;
        self.libraries += rhs.libraries;
        self.functions += rhs.functions;
        self.modifiers += rhs.modifiers;
        self.events += rhs.events;
        self.structs += rhs.structs;
        self.enums += rhs.enums;
    }
}

/// Occurrences of security-relevant constructs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub payable_functions: usize,
    /// `.call`, `.delegatecall`, `.staticcall`, `.send`, `.transfer`
    pub low_level_calls: usize,
    pub assembly_blocks: usize,
    pub selfdestructs: usize,
    pub ecrecovers: usize,
    /// `keccak256`, `sha256`, `ripemd160`, `sha3`
    pub hash_functions: usize,
    pub unchecked_blocks: usize,
    pub tx_origin: usize,
    pub block_timestamp: usize,
}

impl Capabilities {
    /// (label, count) pairs in report order.
    pub fn entries(&self) -> [(&'static str, usize); 9] {
        [
            ("Payable functions", self.payable_functions),
            ("Low-level calls / value transfers", self.low_level_calls),
            ("Inline assembly", self.assembly_blocks),
            ("selfdestruct", self.selfdestructs),
            ("ecrecover", self.ecrecovers),
            ("Hash functions", self.hash_functions),
            ("unchecked blocks", self.unchecked_blocks),
            ("tx.origin", self.tx_origin),
            ("block.timestamp", self.block_timestamp),
        ]
    }
}

impl AddAssign for Capabilities {
    fn add_assign(&mut self, rhs: Self) {
        self.payable_functions += rhs.payable_functions;
        self.low_level_calls += rhs.low_level_calls;
        self.assembly_blocks += rhs.assembly_blocks;
        self.selfdestructs += rhs.selfdestructs;
        self.ecrecovers += rhs.ecrecovers;
        self.hash_functions += rhs.hash_functions;
        self.unchecked_blocks += rhs.unchecked_blocks;
        self.tx_origin += rhs.tx_origin;
        self.block_timestamp += rhs.block_timestamp;
    }
}

/// Everything measured for a single source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetrics {
    pub path: PathBuf,
    pub lines: LineMetrics,
    pub declarations: DeclarationMetrics,
    pub capabilities: Capabilities,
    /// `pragma solidity` constraints, in order of appearance.
    pub pragmas: Vec<String>,
    pub imports: usize,
    /// One per function plus one per decision point.
    pub complexity: usize,
}

impl FileMetrics {
    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Node kinds that declare a function.
const FUNCTION_KINDS: [&str; 3] = [
    "function_definition",
    "constructor_definition",
    "fallback_receive_definition",
];

/// Node kinds that add a branch to the control flow. `case` is the Yul
/// switch arm keyword.
const DECISION_KINDS: [&str; 9] = [
    "if_statement",
    "for_statement",
    "while_statement",
    "do_while_statement",
    "catch_clause",
    "ternary_expression",
    "yul_if_statement",
    "yul_for_statement",
    "case",
];

const LOW_LEVEL_MEMBERS: [&str; 5] = ["call", "delegatecall", "staticcall", "send", "transfer"];

const HASH_FUNCTIONS: [&str; 4] = ["keccak256", "sha256", "ripemd160", "sha3"];

/// Accumulates metrics during a single tree walk.
struct Walker<'s> {
    source: &'s str,
    code_rows: Vec<bool>,
    comment_rows: Vec<bool>,
    declarations: DeclarationMetrics,
    capabilities: Capabilities,
    pragmas: Vec<String>,
    imports: usize,
    complexity: usize,
}

impl<'s> Walker<'s> {
    fn new(source: &'s str) -> Self {
        let rows = source.lines().count();
        Self {
            source,
            code_rows: vec![false; rows],
            comment_rows: vec![false; rows],
            declarations: DeclarationMetrics::default(),
            capabilities: Capabilities::default(),
            pragmas: Vec::new(),
            imports: 0,
            complexity: 0,
        }
    }

    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            "comment" => {
                mark_rows(&mut self.comment_rows, node);
                return;
            }
            "string" | "hex_string_literal" | "unicode_string_literal" => {
                mark_rows(&mut self.code_rows, node);
                return;
            }
            _ => {}
        }
        if node.child_count() == 0 {
            mark_rows(&mut self.code_rows, node);
        }

        self.measure(node);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    fn measure(&mut self, node: Node<'_>) {
        let kind = node.kind();
        let source = self.source;
        let decls = &mut self.declarations;
        let caps = &mut self.capabilities;

        match kind {
            "contract_declaration" => {
                if has_child_kind(node, "abstract") {
                    decls.abstract_contracts += 1;
                } else {
                    decls.contracts += 1;
                }
            }
            "interface_declaration" => decls.interfaces += 1,
            "library_declaration" => decls.libraries += 1,
            "modifier_definition" => decls.modifiers += 1,
            "event_definition" => decls.events += 1,
            "struct_declaration" => decls.structs += 1,
            "enum_declaration" => decls.enums += 1,
            "import_directive" => self.imports += 1,
            "pragma_directive" => {
                if let Some(version) = solidity_version(node_text(node, source)) {
                    self.pragmas.push(version);
                }
            }
            "assembly_statement" => caps.assembly_blocks += 1,
            "unchecked" => caps.unchecked_blocks += 1,
            "binary_expression" => {
                if has_child_kind(node, "&&") || has_child_kind(node, "||") {
                    self.complexity += 1;
                }
            }
            "member_expression" => {
                let (object, property) = member_parts(node, source);
                if LOW_LEVEL_MEMBERS.contains(&property) {
                    caps.low_level_calls += 1;
                }
                match (object, property) {
                    ("tx", "origin") => caps.tx_origin += 1,
                    ("block", "timestamp") => caps.block_timestamp += 1,
                    _ => {}
                }
            }
            "identifier" => match node_text(node, source) {
                "selfdestruct" | "suicide" => caps.selfdestructs += 1,
                "ecrecover" => caps.ecrecovers += 1,
                name if HASH_FUNCTIONS.contains(&name) => caps.hash_functions += 1,
                _ => {}
            },
            _ if FUNCTION_KINDS.contains(&kind) => {
                decls.functions += 1;
                self.complexity += 1;
                if is_payable(node, source) {
                    caps.payable_functions += 1;
                }
            }
            _ if DECISION_KINDS.contains(&kind) => self.complexity += 1,
            _ => {}
        }
    }

    fn line_metrics(&self) -> LineMetrics {
        let mut lines = LineMetrics {
            total: self.code_rows.len(),
            ..LineMetrics::default()
        };
        for (code, comment) in self.code_rows.iter().zip(&self.comment_rows) {
            if *comment {
                lines.comment += 1;
            }
            if *code {
                lines.source += 1;
            } else if !*comment {
                lines.blank += 1;
            }
        }
        lines
    }
}

/// Flag every row the node spans. A node ending at column 0 does not touch
/// its last row.
fn mark_rows(rows: &mut [bool], node: Node<'_>) {
    let start = node.start_position().row;
    let end = node.end_position();
    let last = if end.column == 0 && end.row > start {
        end.row - 1
    } else {
        end.row
    };
    for row in start..=last {
        if let Some(flag) = rows.get_mut(row) {
            *flag = true;
        }
    }
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

/// `payable` as the state mutability of a function, not as part of an
/// `address payable` parameter or return type.
fn is_payable(node: Node<'_>, source: &str) -> bool {
    let mut cursor = node.walk();
    let payable = node.children(&mut cursor).any(|c| {
        matches!(c.kind(), "state_mutability" | "payable") && node_text(c, source) == "payable"
    });
    payable
}

/// Object and property text of `object.property`.
fn member_parts<'s>(node: Node<'_>, source: &'s str) -> (&'s str, &'s str) {
    let object = node.child_by_field_name("object").or_else(|| node.named_child(0));
    let property = node.child_by_field_name("property").or_else(|| {
        node.named_child_count()
            .checked_sub(1)
            .and_then(|last| node.named_child(last))
    });
    (
        object.map(|n| node_text(n, source)).unwrap_or_default(),
        property.map(|n| node_text(n, source)).unwrap_or_default(),
    )
}

/// The constraint of a `pragma solidity ...;` directive, whitespace collapsed.
fn solidity_version(directive: &str) -> Option<String> {
    let rest = directive.trim().strip_prefix("pragma")?.trim_start();
    let constraint = rest.strip_prefix("solidity")?.trim().trim_end_matches(';');
    let version = constraint.split_whitespace().collect::<Vec<_>>().join(" ");
    (!version.is_empty()).then_some(version)
}

/// First error or missing node under `node`.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn describe_error(node: Node<'_>, source: &str) -> String {
    if node.is_missing() {
        return format!("missing `{}`", node.kind());
    }
    let snippet: String = node_text(node, source)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .take(40)
        .collect();
    if snippet.is_empty() {
        "syntax error".to_string()
    } else {
        format!("syntax error near `{snippet}`")
    }
}

/// Analyze Solidity source text. `path` is only used for labeling.
pub fn analyze_source(path: &Path, source: &str) -> Result<FileMetrics, MetricsError> {
    let parse_error = |line: usize, reason: String| MetricsError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_solidity::LANGUAGE.into())
        .map_err(|e| MetricsError::Grammar(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| parse_error(0, "parser returned no tree".into()))?;

    let root = tree.root_node();
    if let Some(node) = first_error(root) {
        return Err(parse_error(
            node.start_position().row + 1,
            describe_error(node, source),
        ));
    }

    let mut walker = Walker::new(source);
    walker.visit(root);

    Ok(FileMetrics {
        path: path.to_path_buf(),
        lines: walker.line_metrics(),
        declarations: walker.declarations,
        capabilities: walker.capabilities,
        pragmas: walker.pragmas,
        imports: walker.imports,
        complexity: walker.complexity,
    })
}

/// Read and analyze a single file.
pub async fn analyze_file(path: &Path) -> Result<FileMetrics, MetricsError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| MetricsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "Analyzing Solidity file");
    analyze_source(path, &source)
}
