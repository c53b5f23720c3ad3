//! `solaudit metrics`: Generate a metrics report without the model.

use std::path::PathBuf;

pub async fn run(path: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let report = solaudit_metrics::generate_metrics(&path).await?;

    match output {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&out, &report).await?;
            println!("✅ Metrics report saved at: {}", out.display());
        }
        None => print!("{report}"),
    }

    Ok(())
}
