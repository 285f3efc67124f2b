//! Chart definition and loading

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};
use tar::Archive;

use crate::archive::is_chart_archive;
use crate::error::{CoreError, Result};
use crate::ignore::IgnoreRules;

/// Chart metadata file name
pub const CHART_FILE: &str = "Chart.yaml";

/// Chart.yaml contents
///
/// Only the fields helmpush acts on are typed. Everything else is kept
/// verbatim in `extra` so a re-serialized Chart.yaml loses nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// API version (v1 or v2)
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Chart name
    #[serde(default)]
    pub name: String,

    /// Chart version
    ///
    /// Kept as the scalar's text: `1.10` stays `1.10`, and overrides such as
    /// a commit hash are allowed.
    #[serde(default)]
    pub version: String,

    /// Remaining Chart.yaml keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

impl ChartMetadata {
    /// Parse and validate a Chart.yaml document
    pub fn parse(content: &str) -> Result<Self> {
        let metadata: Self = serde_yaml::from_str(content)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Render the document back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidChart {
                message: "Chart.yaml: name is required".to_string(),
            });
        }
        if self.version.trim().is_empty() {
            return Err(CoreError::InvalidChart {
                message: "Chart.yaml: version is required".to_string(),
            });
        }
        Ok(())
    }
}

/// A file belonging to a chart, relative to the chart root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFile {
    /// Relative path using `/` separators
    pub path: String,
    /// File contents
    pub data: Vec<u8>,
}

/// A chart loaded into memory, ready to be packaged
#[derive(Debug, Clone)]
pub struct LoadedChart {
    /// Chart.yaml
    pub metadata: ChartMetadata,

    /// Every other file of the chart, sorted by path
    pub files: Vec<ChartFile>,
}

impl LoadedChart {
    /// Load a chart from a directory or a packaged archive
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CoreError::ChartNotFound {
                path: path.display().to_string(),
            });
        }

        if path.is_dir() {
            Self::load_dir(path)
        } else if is_chart_archive(path) {
            Self::load_archive(path)
        } else {
            Err(CoreError::InvalidChart {
                message: format!(
                    "{} is neither a chart directory nor a .tgz archive",
                    path.display()
                ),
            })
        }
    }

    /// Load a chart directory, honouring `.helmignore`
    pub fn load_dir(root: &Path) -> Result<Self> {
        let chart_file = root.join(CHART_FILE);
        if !chart_file.is_file() {
            return Err(CoreError::InvalidChart {
                message: format!("{} not found in {}", CHART_FILE, root.display()),
            });
        }

        let metadata = ChartMetadata::parse(&std::fs::read_to_string(&chart_file)?)?;
        let rules = IgnoreRules::load(root)?;

        let mut files = Vec::new();
        let walker = walkdir::WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| {
                let rel = relative_path(root, entry.path());
                !rules.is_ignored(&rel, entry.file_type().is_dir())
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = relative_path(root, entry.path());
            if rel == CHART_FILE {
                continue;
            }

            files.push(ChartFile {
                path: rel,
                data: std::fs::read(entry.path())?,
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(
            chart = %metadata.name,
            files = files.len(),
            "loaded chart directory {}",
            root.display()
        );

        Ok(Self { metadata, files })
    }

    /// Load a packaged chart (`<name>/...` entries inside a gzip tarball)
    pub fn load_archive(archive_path: &Path) -> Result<Self> {
        let file = File::open(archive_path)?;
        let mut archive = Archive::new(GzDecoder::new(file));

        let mut top_dir: Option<String> = None;
        let mut chart_yaml = None;
        let mut files = Vec::new();

        for entry in archive.entries()? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let path = entry.path()?.into_owned();
            let (top, rel) = split_top_dir(&path).ok_or_else(|| CoreError::InvalidChart {
                message: format!(
                    "archive entry '{}' is not inside a chart directory",
                    path.display()
                ),
            })?;

            match &top_dir {
                Some(expected) if *expected != top => {
                    return Err(CoreError::InvalidChart {
                        message: format!(
                            "archive contains more than one top-level directory ('{}' and '{}')",
                            expected, top
                        ),
                    });
                }
                Some(_) => {}
                None => top_dir = Some(top),
            }

            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;

            if rel == CHART_FILE {
                chart_yaml = Some(data);
            } else {
                files.push(ChartFile { path: rel, data });
            }
        }

        let chart_yaml = chart_yaml.ok_or_else(|| CoreError::InvalidChart {
            message: format!("{} not found in {}", CHART_FILE, archive_path.display()),
        })?;
        let content = String::from_utf8(chart_yaml).map_err(|e| CoreError::InvalidChart {
            message: format!("{} is not valid UTF-8: {}", CHART_FILE, e),
        })?;
        let metadata = ChartMetadata::parse(&content)?;

        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self { metadata, files })
    }

    /// Chart name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Chart version (after any override)
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Override the chart version before packaging
    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        tracing::debug!(
            chart = %self.metadata.name,
            from = %self.metadata.version,
            to = %version,
            "overriding chart version"
        );
        self.metadata.version = version;
    }
}

/// Path of `path` relative to `root`, joined with `/`
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Split `mychart/templates/a.yaml` into `("mychart", "templates/a.yaml")`
fn split_top_dir(path: &Path) -> Option<(String, String)> {
    let mut parts = path.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    });

    let top = parts.next()?;
    let rest: Vec<String> = parts.collect();
    if rest.is_empty() {
        return None;
    }
    Some((top, rest.join("/")))
}
