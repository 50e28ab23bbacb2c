use std::fmt::Write;

use tracing::{debug, warn};

use crate::color::{team_scales, Interpolator, SequentialScale};
use crate::config::ChartConfig;
use crate::grouping::{Rotation, RowRef};
use crate::loader::PlayerLookup;
use crate::models::Session;
use crate::timeline::{LinearScale, TimeAxis};

const GRID_STROKE: &str = "#d0d0d0";
const AXIS_TEXT_FILL: &str = "#333333";
const AXIS_FONT_SIZE: f64 = 10.0;
const AXIS_TEXT_PADDING: f64 = 3.0;
/// Bars sit this far above the row's text baseline.
const BAR_BASELINE_OFFSET: f64 = -13.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub svg: String,
    pub width: f64,
    pub height: f64,
    pub rows: usize,
}

pub fn render_chart(
    rotation: &Rotation,
    axis: &TimeAxis,
    config: &ChartConfig,
    players: &dyn PlayerLookup,
) -> RenderedChart {
    let layout = &config.layout;
    let margin = layout.margin;
    let rows = rotation.rows();

    // Grow the plot instead of letting rows run off the top of the canvas.
    let rows_height = rows.len() as f64 * layout.row_height;
    let plot_height = layout.height.max(rows_height + margin.top + margin.bottom);
    let width = layout.width + margin.left + margin.right;
    let height = plot_height + margin.top + margin.bottom;

    let x_scale = LinearScale::new((0.0, axis.game_end()), (0.0, layout.width));
    let scales = team_scales(rotation, config.stat, config.palette);
    let fallback_scale = SequentialScale::new(config.stat.domain(), Interpolator::RdBu);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="rotations-chart_container" data-stat="{stat}">"#,
        w = num(width),
        h = num(height),
        stat = config.stat.feed_key(),
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);

    let _ = writeln!(
        svg,
        r#"  <g class="x-axis" transform="translate({}, {})" font-family="{}" font-size="{}" text-anchor="start">"#,
        num(margin.left),
        num(plot_height - margin.bottom),
        escape_xml(&layout.font_family),
        num(AXIS_FONT_SIZE),
    );
    for tick in axis.ticks() {
        let _ = writeln!(
            svg,
            r#"    <g class="tick" transform="translate({}, 0)"><line stroke="{}" y2="{}"/><text fill="{}" y="{}" dy="0.71em">{}</text></g>"#,
            num(x_scale.scale(tick.value)),
            GRID_STROKE,
            num(-(plot_height - margin.top - margin.bottom)),
            AXIS_TEXT_FILL,
            num(AXIS_TEXT_PADDING),
            escape_xml(&tick.label),
        );
    }
    let _ = writeln!(svg, "  </g>");

    let _ = writeln!(
        svg,
        r#"  <g class="chart" transform="translate(0, {})">"#,
        num(plot_height - rows_height)
    );
    for (index, row) in rows.iter().enumerate() {
        let scale = scales.get(&row.team.team_id).unwrap_or(&fallback_scale);
        write_row(&mut svg, index, row, axis, &x_scale, scale, config, players);
    }
    let _ = writeln!(svg, "  </g>");
    let _ = writeln!(svg, "</svg>");

    debug!(rows = rows.len(), width, height, "rendered rotation chart");

    RenderedChart {
        svg,
        width,
        height,
        rows: rows.len(),
    }
}

#[allow(clippy::too_many_arguments)]
fn write_row(
    svg: &mut String,
    index: usize,
    row: &RowRef<'_>,
    axis: &TimeAxis,
    x_scale: &LinearScale,
    scale: &SequentialScale,
    config: &ChartConfig,
    players: &dyn PlayerLookup,
) {
    let layout = &config.layout;
    let player_id = row.player.player_id;
    let label = match players.player_name(player_id) {
        Some(name) => name.to_string(),
        None => {
            warn!(%player_id, "player name not found, labelling row with id");
            player_id.to_string()
        }
    };

    let _ = writeln!(
        svg,
        r#"    <g class="row" transform="translate(-1, {})" data-pid="{}" data-team="{}">"#,
        num(index as f64 * layout.row_height),
        player_id,
        row.team.team_id,
    );
    let _ = writeln!(
        svg,
        r#"      <text x="{}" text-anchor="end" font-family="{}" font-size="{}">{}</text>"#,
        num(layout.margin.left - 2.0),
        escape_xml(&layout.font_family),
        num(layout.font_size),
        escape_xml(&label),
    );

    for session in &row.player.sessions {
        let x = x_scale.scale(axis.session_start(session)) + layout.margin.left + 1.0;
        let bar_width = (x_scale.scale(session.in_time) - x_scale.scale(session.out_time)).max(0.0);
        let fill = scale.color(session.stat(config.stat));
        let _ = writeln!(
            svg,
            r#"      <rect class="session" x="{}" y="{}" width="{}" height="{}" rx="0" fill="{}"><title>{}</title></rect>"#,
            num(x),
            num(BAR_BASELINE_OFFSET),
            num(bar_width),
            num(layout.row_height - 1.0),
            fill,
            escape_xml(&session_tooltip(session)),
        );
    }

    let _ = writeln!(svg, "    </g>");
}

pub fn session_tooltip(session: &Session) -> String {
    format!("{:+} PTS from {:.1} min", session.pt_diff, session.minutes())
}

/// Up to two decimals, trailing zeros trimmed.
fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
