use std::{
    fmt,
    path::{Path, PathBuf},
};

use charming::{
    Chart, ImageRenderer,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisType, ItemStyle, NameLocation},
    series::Bar,
};

use crate::{compare::ComparisonResult, core::Result};

/// The two totals that get a chart each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cases,
    Deaths,
}

impl Metric {
    /// Caption under the x-axis
    pub fn caption(&self) -> &'static str {
        match self {
            Metric::Cases => "Total cases of COVID-19",
            Metric::Deaths => "Total deaths from COVID-19",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Metric::Cases => "cases_chart.svg",
            Metric::Deaths => "deaths_chart.svg",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Metric::Cases => "green",
            Metric::Deaths => "red",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cases => write!(f, "cases"),
            Metric::Deaths => write!(f, "deaths"),
        }
    }
}

/// Render the cases chart, then the deaths chart, into `output_dir`
pub fn render(
    result: &ComparisonResult,
    output_dir: &Path,
    renderer: &mut ImageRenderer,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(2);
    for (metric, values) in [
        (Metric::Cases, result.cases),
        (Metric::Deaths, result.deaths),
    ] {
        let chart = metric_chart(metric, values, &result.labels);
        let path = output_dir.join(metric.file_name());

        renderer.save(&chart, &path)?;
        tracing::info!("Chart of {} written to {}", metric, path.display());
        written.push(path);
    }

    Ok(written)
}

/// A two-bar chart of one metric, bar 0 for the first label and bar 1 for the second
pub fn metric_chart(metric: Metric, values: [u64; 2], labels: &[String; 2]) -> Chart {
    let data: Vec<f64> = values.iter().map(|&value| value as f64).collect();

    Chart::new()
        .title(Title::new().text(format!("{} vs {}", labels[0], labels[1])))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("8%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(labels.to_vec())
                .name(metric.caption())
                .name_location(NameLocation::Middle),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter("{value}")),
        )
        .series(
            Bar::new()
                .name(metric.caption())
                .item_style(ItemStyle::new().color(metric.color()))
                .data(data),
        )
}
