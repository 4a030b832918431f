//! SVG chart rendering: return histogram and stacked line panels.

use crate::ports::report_port::ChartPanel;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

const LINE_COLORS: [&str; 4] = ["#2563eb", "#f59e0b", "#16a34a", "#dc2626"];

pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Equal-width bins over [min, max]. The maximum lands in the last bin.
///
/// Returns `(lower_edge, bin_width, counts)`.
pub fn bin_counts(values: &[f64], bins: usize) -> (f64, f64, Vec<usize>) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return (0.0, 0.0, vec![0; bins]);
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min {
        (max - min) / bins as f64
    } else {
        1.0
    };

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (min, width, counts)
}

fn open_svg(svg: &mut String, height: f64) {
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, height, CHART_WIDTH, height
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
}

fn axes(svg: &mut String, top: f64) {
    let bottom = top + CHART_HEIGHT - MARGIN_BOTTOM;
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        top + MARGIN_TOP,
        MARGIN_LEFT,
        bottom
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        bottom,
        CHART_WIDTH - MARGIN_RIGHT,
        bottom
    ));
}

fn label(svg: &mut String, x: f64, y: f64, anchor: &str, size: u32, text: &str) {
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"{}\" font-size=\"{}\" fill=\"#666\">{}</text>\n",
        x,
        y,
        anchor,
        size,
        escape(text)
    ));
}

pub fn histogram_svg(
    title: &str,
    values: &[f64],
    bins: usize,
    x_label: &str,
    y_label: &str,
) -> String {
    let (lower, width, counts) = bin_counts(values, bins);
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bar_width = plot_width / counts.len().max(1) as f64;

    let mut svg = String::new();
    open_svg(&mut svg, CHART_HEIGHT);
    label(&mut svg, CHART_WIDTH / 2.0, 18.0, "middle", 13, title);
    axes(&mut svg, 0.0);

    for (i, &count) in counts.iter().enumerate() {
        let h = count as f64 / max_count as f64 * plot_height;
        svg.push_str(&format!(
            "  <rect class=\"bin\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#2563eb\" stroke=\"white\"/>\n",
            MARGIN_LEFT + i as f64 * bar_width,
            MARGIN_TOP + plot_height - h,
            bar_width,
            h
        ));
    }

    let upper = lower + width * counts.len() as f64;
    label(&mut svg, MARGIN_LEFT, CHART_HEIGHT - 22.0, "middle", 10, &format!("{:.4}", lower));
    label(
        &mut svg,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - 22.0,
        "middle",
        10,
        &format!("{:.4}", upper),
    );
    label(&mut svg, MARGIN_LEFT - 5.0, MARGIN_TOP + 5.0, "end", 10, &max_count.to_string());
    label(&mut svg, CHART_WIDTH / 2.0, CHART_HEIGHT - 5.0, "middle", 11, x_label);
    label(&mut svg, 12.0, MARGIN_TOP + plot_height / 2.0, "start", 11, y_label);
    svg.push_str("</svg>");
    svg
}

fn value_range(panel: &ChartPanel) -> Option<(f64, f64)> {
    let mut values = panel
        .lines
        .iter()
        .flat_map(|l| l.points.iter().flatten().copied())
        .filter(|v| v.is_finite())
        .peekable();
    values.peek()?;
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    Some((min, max))
}

/// Path for one line; `None` points break the line into segments.
fn line_path(points: &[Option<f64>], x_scale: impl Fn(usize) -> f64, y_scale: impl Fn(f64) -> f64) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (i, point) in points.iter().enumerate() {
        match point {
            Some(v) if v.is_finite() => {
                let cmd = if pen_down { " L" } else if path.is_empty() { "M" } else { " M" };
                path.push_str(&format!("{} {:.1} {:.1}", cmd, x_scale(i), y_scale(*v)));
                pen_down = true;
            }
            _ => pen_down = false,
        }
    }
    path
}

/// Stacks `panels` vertically, one chart height each.
pub fn time_series_svg(panels: &[ChartPanel]) -> String {
    let total_height = CHART_HEIGHT * panels.len().max(1) as f64;
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let mut svg = String::new();
    open_svg(&mut svg, total_height);

    for (p, panel) in panels.iter().enumerate() {
        let top = p as f64 * CHART_HEIGHT;
        label(&mut svg, CHART_WIDTH / 2.0, top + 18.0, "middle", 13, &panel.title);
        axes(&mut svg, top);
        label(&mut svg, 12.0, top + MARGIN_TOP + plot_height / 2.0, "start", 11, &panel.y_label);

        let Some((min, max)) = value_range(panel) else {
            label(&mut svg, CHART_WIDTH / 2.0, top + CHART_HEIGHT / 2.0, "middle", 11, "No data");
            continue;
        };
        let range = if max > min { max - min } else { 1.0 };

        label(&mut svg, MARGIN_LEFT - 5.0, top + MARGIN_TOP + 5.0, "end", 10, &format!("{:.2}", max));
        label(
            &mut svg,
            MARGIN_LEFT - 5.0,
            top + CHART_HEIGHT - MARGIN_BOTTOM - 5.0,
            "end",
            10,
            &format!("{:.2}", min),
        );

        for (l, line) in panel.lines.iter().enumerate() {
            let n = line.points.len();
            let x_scale =
                |i: usize| MARGIN_LEFT + (i as f64 / (n.saturating_sub(1)).max(1) as f64) * plot_width;
            let y_scale = |v: f64| top + MARGIN_TOP + plot_height - ((v - min) / range) * plot_height;
            let color = LINE_COLORS[l % LINE_COLORS.len()];

            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
                line_path(&line.points, x_scale, y_scale),
                color
            ));
            svg.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"{}\">{}</text>\n",
                MARGIN_LEFT + 10.0 + l as f64 * 110.0,
                top + MARGIN_TOP + 12.0,
                color,
                escape(&line.label)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}
