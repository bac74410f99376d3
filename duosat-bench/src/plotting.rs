use std::error::Error;
use std::path::Path;
use std::time::Duration;

use itertools::Itertools;
use plotters::prelude::*;

/// Draws a cactus plot: for each engine, its per-instance runtimes
/// sorted ascending, so the flatter line belongs to the faster engine.
pub fn plot_runtimes(
    measurements: &[(String, Vec<Duration>)],
    path: impl AsRef<Path>,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let drawing_area = SVGBackend::new(path.as_ref(), size).into_drawing_area();
    drawing_area.fill(&WHITE)?;

    let max_instances = measurements
        .iter()
        .map(|(_, times)| times.len())
        .max()
        .ok_or("no measurements to plot")?;

    let max_duration = measurements
        .iter()
        .filter_map(|(_, times)| times.iter().max())
        .max()
        .ok_or("no measurements to plot")?
        .as_millis();

    let mut chart = ChartBuilder::on(&drawing_area)
        .x_label_area_size(30)
        .y_label_area_size(80)
        .margin(20)
        .build_cartesian_2d(0..max_instances, 0..max_duration.max(1))?;

    chart
        .configure_mesh()
        .x_desc("Number of solved instances")
        .y_desc("Wall time (ms)")
        .draw()?;

    let mut colors = [RED, BLUE, GREEN, MAGENTA, CYAN].iter().cycle();
    for (name, times) in measurements {
        let color = *colors.next().expect("color cycle is infinite");

        let sorted = times
            .iter()
            .map(|duration| duration.as_millis())
            .sorted()
            .collect::<Vec<_>>();

        chart.draw_series(PointSeries::of_element(
            sorted.iter().cloned().enumerate(),
            4,
            &color,
            &|coordinate, size, style| Circle::new(coordinate, size, style),
        ))?;

        chart
            .draw_series(LineSeries::new(sorted.into_iter().enumerate(), &color))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x - 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}
