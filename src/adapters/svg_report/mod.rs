//! SVG chart output.
//!
//! Each chart is written as a standalone `{output_dir}/{name}.svg`. Chart
//! markup is produced by [`chart_svg`]; this module only handles the files.

pub mod chart_svg;

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::domain::error::CrossgateError;
use crate::ports::report_port::{ChartPanel, ReportPort};

pub struct SvgReportAdapter {
    output_dir: PathBuf,
}

impl SvgReportAdapter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn chart_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.svg", name))
    }

    fn write(&self, name: &str, svg: &str) -> Result<(), CrossgateError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| CrossgateError::Report {
            reason: format!("failed to create {}: {}", self.output_dir.display(), e),
        })?;
        let path = self.chart_path(name);
        fs::write(&path, svg).map_err(|e| CrossgateError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;
        info!(path = %path.display(), "chart written");
        Ok(())
    }
}

impl ReportPort for SvgReportAdapter {
    fn render_histogram(
        &self,
        name: &str,
        title: &str,
        values: &[f64],
        bins: usize,
        x_label: &str,
        y_label: &str,
    ) -> Result<(), CrossgateError> {
        if bins == 0 {
            return Err(CrossgateError::Report {
                reason: "histogram needs at least one bin".to_string(),
            });
        }
        let svg = chart_svg::histogram_svg(title, values, bins, x_label, y_label);
        self.write(name, &svg)
    }

    fn render_time_series(
        &self,
        name: &str,
        panels: &[ChartPanel],
    ) -> Result<(), CrossgateError> {
        if panels.is_empty() {
            return Err(CrossgateError::Report {
                reason: format!("chart '{}' has no panels", name),
            });
        }
        let svg = chart_svg::time_series_svg(panels);
        self.write(name, &svg)
    }
}
