//! helmpush Core - chart loading and packaging
//!
//! This crate provides the chart side of a push:
//! - `LoadedChart`: a chart read from a directory or a packaged `.tgz`
//! - `ChartMetadata`: the Chart.yaml document, with version override support
//! - `IgnoreRules`: `.helmignore` filtering for chart directories
//! - `create_archive`: writes the `<name>-<version>.tgz` package
//! - `PackagedChart`: an archive in a scratch directory removed on drop

pub mod archive;
pub mod chart;
pub mod error;
pub mod ignore;
pub mod scratch;

pub use archive::{create_archive, default_archive_name, is_chart_archive};
pub use chart::{ChartFile, ChartMetadata, LoadedChart};
pub use error::{CoreError, Result};
pub use ignore::IgnoreRules;
pub use scratch::PackagedChart;
