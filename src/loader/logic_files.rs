//! Routing logic file discovery and variable substitution

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::{LOGIC_EXTENSION, LogicFile};
use crate::error::{Result, config, deploy, fs};

/// Read every `.vcl` file directly inside each folder
///
/// Files are returned folder by folder, sorted by file name within a folder.
/// The service-side name of a file is its file stem.
pub fn discover_logic_files(folders: &[PathBuf]) -> Result<Vec<LogicFile>> {
    let mut files = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for folder in folders {
        if !folder.is_dir() {
            return Err(fs::read_failed(
                folder.display().to_string(),
                "not a directory",
            ));
        }

        let mut paths = Vec::new();
        let walker = WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(folder.as_path());
                fs::read_failed(path.display().to_string(), e.to_string())
            })?;
            if entry.file_type().is_file() && has_logic_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(first) = seen.get(name) {
                return Err(config::duplicate_logic_file(
                    name,
                    &first.display().to_string(),
                    &path.display().to_string(),
                ));
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|e| fs::read_failed(path.display().to_string(), e.to_string()))?;
            seen.insert(name.to_string(), path.clone());
            files.push(LogicFile::new(name, content));
        }
    }

    Ok(files)
}

fn has_logic_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == LOGIC_EXTENSION)
}

/// Replace `${NAME}` with its value for every name in `vars`
///
/// Every listed variable must have a non-empty value, whether or not a file
/// references it.
pub fn substitute_variables(
    files: Vec<LogicFile>,
    vars: &[String],
    values: &HashMap<String, String>,
) -> Result<Vec<LogicFile>> {
    let mut replacements = Vec::with_capacity(vars.len());
    for var in vars.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        let value = values
            .get(var)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| deploy::missing_variable(var))?;
        replacements.push((format!("${{{var}}}"), value.as_str()));
    }

    Ok(files
        .into_iter()
        .map(|mut file| {
            for (placeholder, value) in &replacements {
                file.content = file.content.replace(placeholder.as_str(), value);
            }
            file
        })
        .collect())
}
