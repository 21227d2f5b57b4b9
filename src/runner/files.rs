use std::collections::BTreeSet;
use std::path::Path;

/// Expands patterns into a sorted, de-duplicated file list. Directories
/// expand to every file below them with one of `extensions`; anything
/// else is treated as a glob relative to the working directory.
pub async fn resolve_patterns(patterns: &[String], extensions: &[String]) -> anyhow::Result<Vec<String>> {
    let cwd = std::env::current_dir()?;
    let mut all_files = BTreeSet::new();

    for pattern in patterns {
        let files = resolve_pattern(pattern, &cwd, extensions).await?;
        all_files.extend(files);
    }

    Ok(all_files.into_iter().collect())
}

async fn resolve_pattern(pattern: &str, cwd: &Path, extensions: &[String]) -> anyhow::Result<Vec<String>> {
    let resolved = cwd.join(pattern);

    if let Ok(metadata) = tokio::fs::metadata(&resolved).await {
        if metadata.is_file() {
            return Ok(vec![resolved.to_string_lossy().into_owned()]);
        }

        if metadata.is_dir() {
            let mut results = Vec::new();
            for extension in extensions {
                let glob_pattern = format!("{}/**/*.{}", resolved.to_string_lossy(), extension);
                results.extend(glob_files(&glob_pattern)?);
            }
            return Ok(results);
        }
    }

    let glob_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        resolved.to_string_lossy().into_owned()
    };

    glob_files(&glob_pattern)
}

fn glob_files(glob_pattern: &str) -> anyhow::Result<Vec<String>> {
    let paths = glob::glob(glob_pattern)?;
    Ok(paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
        .collect())
}
