use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::grouping::Rotation;
use crate::loader::PlayerLookup;
use crate::models::{PlayerId, TeamId};
use crate::timeline::TimeAxis;

/// Raster output above this edge length is refused.
const MAX_RASTER_DIM: u32 = 16_384;

#[derive(Debug, Serialize)]
struct SessionRow {
    team_id: TeamId,
    team: String,
    player_id: PlayerId,
    player: String,
    period: u32,
    in_time: f64,
    out_time: f64,
    start: f64,
    end: f64,
    minutes: f64,
    pt_diff: f64,
    player_pts: f64,
    usg_pct: f64,
}

/// One CSV record per session, in chart row order, with absolute timeline offsets.
pub fn write_sessions_csv<W: Write>(
    rotation: &Rotation,
    axis: &TimeAxis,
    players: &dyn PlayerLookup,
    writer: W,
) -> ChartResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0usize;

    for row in rotation.rows() {
        let team = row.team.display_name();
        let player = players
            .player_name(row.player.player_id)
            .map(str::to_string)
            .unwrap_or_else(|| row.player.player_id.to_string());
        for session in &row.player.sessions {
            csv_writer.serialize(SessionRow {
                team_id: row.team.team_id,
                team: team.clone(),
                player_id: row.player.player_id,
                player: player.clone(),
                period: session.period,
                in_time: session.in_time,
                out_time: session.out_time,
                start: axis.session_start(session),
                end: axis.session_end(session),
                minutes: session.minutes(),
                pt_diff: session.pt_diff,
                player_pts: session.player_pts,
                usg_pct: session.usg_pct,
            })?;
            written += 1;
        }
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    debug!(sessions = written, "wrote session csv");
    Ok(written)
}

/// Rasterize an SVG document to a PNG file, `scale` pixels per SVG unit.
pub fn rasterize_png(svg: &str, path: &Path, scale: f32) -> ChartResult<(u32, u32)> {
    if !(scale > 0.0) {
        return Err(ChartError::raster(format!("scale must be positive (got {scale})")));
    }

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let options = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| ChartError::raster(format!("parse svg: {err}")))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        return Err(ChartError::raster(format!(
            "raster size too large: {width}x{height} (max {MAX_RASTER_DIM}x{MAX_RASTER_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ChartError::raster("failed to allocate pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // The chart paints an opaque background, so premultiplied and straight alpha agree.
    let image = image::RgbaImage::from_raw(width, height, pixmap.data().to_vec())
        .ok_or_else(|| ChartError::raster("pixmap size does not match image buffer"))?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|err| ChartError::raster(format!("write {}: {err}", path.display())))?;

    debug!(width, height, path = %path.display(), "wrote png");
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{PlayerDirectory, TeamTable};
    use crate::models::{PlayerInfo, Session};

    fn session(player: u64, period: u32, in_time: f64, out_time: f64) -> Session {
        Session {
            team_id: TeamId(1610612761),
            player_id: PlayerId(player),
            period,
            in_time,
            out_time,
            pt_diff: -2.0,
            player_pts: 5.0,
            usg_pct: 0.18,
        }
    }

    #[test]
    fn csv_has_header_and_one_record_per_session() {
        let sessions = vec![session(7, 1, 7200.0, 3600.0), session(7, 2, 1800.0, 0.0), session(9, 1, 3600.0, 0.0)];
        let rotation = Rotation::from_sessions(&sessions, &TeamTable::new());
        let axis = TimeAxis::new(7200.0, 3000.0, 4);
        let players = PlayerDirectory::new(vec![PlayerInfo {
            id: PlayerId(7),
            name: "Kyle Lowry".to_string(),
        }]);

        let mut out = Vec::new();
        let written = write_sessions_csv(&rotation, &axis, &players, &mut out).unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "team_id,team,player_id,player,period,in_time,out_time,start,end,minutes,pt_diff,player_pts,usg_pct"
        );
        assert!(lines[1].starts_with("1610612761,Team 1610612761,7,Kyle Lowry,1,7200.0,3600.0,0.0,3600.0,6.0,"));
        assert!(lines[2].contains(",2,1800.0,0.0,12600.0,14400.0,3.0,"));
        assert!(lines[3].starts_with("1610612761,Team 1610612761,9,9,1,"));
    }

    #[test]
    fn rasterizes_png_file() {
        let dir = std::env::temp_dir().join("rotation-chart-export");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("chart.png");
        let _ = std::fs::remove_file(&path);

        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="100%" height="100%" fill="white"/><rect x="5" y="5" width="10" height="10" fill="#67001f"/></svg>"##;
        let (width, height) = rasterize_png(svg, &path, 2.0).unwrap();
        assert_eq!((width, height), (80, 40));

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rejects_invalid_scale() {
        let err = rasterize_png("<svg/>", Path::new("unused.png"), 0.0).unwrap_err();
        assert!(err.to_string().contains("scale must be positive"));
    }
}
