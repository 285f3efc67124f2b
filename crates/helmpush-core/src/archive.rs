//! Chart packaging
//!
//! Produces the `<name>-<version>.tgz` layout Helm expects: a gzip tarball
//! whose entries all live under a `<name>/` directory, with `Chart.yaml`
//! written first.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tar::{Builder, Header};

use crate::chart::{CHART_FILE, LoadedChart};
use crate::error::Result;

/// Package a chart into `out_dir`
///
/// Returns the path to the created archive file. `Chart.yaml` is regenerated
/// from `chart.metadata`, so a version set with `LoadedChart::set_version`
/// ends up both in the file name and inside the archive.
pub fn create_archive(chart: &LoadedChart, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let output = out_dir.join(default_archive_name(chart));

    let file = File::create(&output)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    let base = chart.name();
    let chart_yaml = chart.metadata.to_yaml()?;
    add_bytes_to_archive(
        &mut builder,
        &format!("{}/{}", base, CHART_FILE),
        chart_yaml.as_bytes(),
    )?;

    for file in &chart.files {
        add_bytes_to_archive(&mut builder, &format!("{}/{}", base, file.path), &file.data)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    tracing::debug!(
        chart = %chart.name(),
        version = %chart.version(),
        "packaged chart to {}",
        output.display()
    );

    Ok(output)
}

/// Add bytes to a tar archive with a given path
fn add_bytes_to_archive<W: Write>(
    builder: &mut Builder<W>,
    archive_path: &str,
    content: &[u8],
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    header.set_cksum();

    builder.append_data(&mut header, archive_path, content)?;

    Ok(())
}

/// Generate the archive filename for a chart
#[must_use]
pub fn default_archive_name(chart: &LoadedChart) -> String {
    format!("{}-{}.tgz", chart.name(), chart.version())
}

/// Whether a path looks like a packaged chart
#[must_use]
pub fn is_chart_archive(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".tgz") || name.ends_with(".tar.gz")
}
