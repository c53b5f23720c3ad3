//! Entry point: metrics report for a file or a directory of `.sol` files.

use crate::analyzer::{FileMetrics, analyze_file};
use crate::report::MetricsReport;
use crate::{MetricsError, SOURCE_EXTENSION};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// List the `.sol` files directly inside `dir`, sorted by file name.
/// Symlinks are followed.
async fn list_sources(dir: &Path) -> Result<Vec<PathBuf>, MetricsError> {
    let io_error = |source| MetricsError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error)?;
    let mut sources = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
        let path = entry.path();
        let is_source = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(SOURCE_EXTENSION));
        if !is_source {
            continue;
        }
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| MetricsError::Io {
                path: path.clone(),
                source,
            })?;
        if metadata.is_file() {
            sources.push(path);
        }
    }

    sources.sort();
    Ok(sources)
}

/// Analyze `path` and collect the results without rendering.
///
/// A directory is scanned non-recursively; files are analyzed one at a time
/// and folded into the report totals.
pub async fn collect_metrics(path: &Path) -> Result<MetricsReport, MetricsError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            MetricsError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            MetricsError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let files: Vec<FileMetrics> = if metadata.is_dir() {
        let sources = list_sources(path).await?;
        if sources.is_empty() {
            return Err(MetricsError::NoSources {
                path: path.to_path_buf(),
            });
        }
        debug!(dir = %path.display(), count = sources.len(), "Found Solidity sources");

        let mut files = Vec::with_capacity(sources.len());
        for source in &sources {
            files.push(analyze_file(source).await?);
        }
        files
    } else {
        vec![analyze_file(path).await?]
    };

    let report = MetricsReport::new(path.display().to_string(), files);
    info!(
        path = %path.display(),
        files = report.totals.files,
        nsloc = report.totals.lines.source,
        complexity = report.totals.complexity,
        "Solidity metrics collected"
    );
    Ok(report)
}

/// Produce the markdown metrics report for a file or directory.
pub async fn generate_metrics(path: impl AsRef<Path>) -> Result<String, MetricsError> {
    let report = collect_metrics(path.as_ref()).await?;
    Ok(report.render_markdown())
}
