use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::Context;
use plotters::{coord::Shift, prelude::*};

use super::aggregate::{Panel, PoolReport};

const FIGURE_SIZE: (u32, u32) = (1500, 1200);

pub fn figure_name(n_addr: u32) -> String {
    format!("dhcp_spoof_results_nAddr_{}.svg", n_addr)
}

/// Render the 2x2 figure of one address pool size into `output_dir`,
/// overwriting an earlier figure of the same pool size.
pub fn render(report: &PoolReport, output_dir: &Path) -> anyhow::Result<PathBuf> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir).with_context(|| {
            format!("failed to create output directory '{}'", output_dir.display())
        })?;
        info!("created output directory {}", output_dir.display());
    }

    let path = output_dir.join(figure_name(report.n_addr));
    {
        let root = SVGBackend::new(&path, FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(
            &format!("DHCP Spoof Attack Results (nAddr={})", report.n_addr),
            ("sans-serif", 32),
        )?;

        for (area, panel) in root.split_evenly((2, 2)).iter().zip(&report.panels) {
            draw_panel(area, panel)?;
        }

        root.present()
            .with_context(|| format!("failed to write figure '{}'", path.display()))?;
    }

    Ok(path)
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, panel: &Panel) -> anyhow::Result<()> {
    let (x_range, y_range) = axis_ranges(panel);

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .x_desc(panel.x_label)
        .y_desc(panel.y_label)
        .draw()?;

    for (idx, series) in panel.series.iter().enumerate() {
        // the ungrouped panel gets a single bold red line
        let (color, width, radius) = match series.label {
            Some(_) => (Palette99::pick(idx).to_rgba(), 2, 4),
            None => (RED.to_rgba(), 3, 6),
        };
        let style = color.stroke_width(width);

        let line = chart.draw_series(LineSeries::new(series.points.iter().copied(), style))?;
        if let Some(label) = &series.label {
            line.label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
        chart.draw_series(
            series
                .points
                .iter()
                .map(|&p| Circle::new(p, radius, color.filled())),
        )?;
    }

    if panel.series.iter().any(|s| s.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

/// Data bounds with some margin. A single distinct x or y value still gets a
/// non-empty range.
fn axis_ranges(panel: &Panel) -> (Range<f64>, Range<f64>) {
    let points = panel.series.iter().flat_map(|s| s.points.iter());
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y_max = f64::NEG_INFINITY;
    let mut y_min = 0.0f64;
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() {
        return (0.0..1.0, 0.0..1.0);
    }

    let x_pad = ((x_max - x_min) * 0.05).max(0.5);
    let y_hi = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    (x_min - x_pad..x_max + x_pad, y_min..y_hi)
}
