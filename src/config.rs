use crate::error::{ChartError, ChartResult};
use crate::loader::validate_box_score;
use crate::models::{BoxScore, Stat, TICKS_PER_MINUTE};

pub const DEFAULT_OVERTIME_MINUTES: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Palette {
    /// Red-blue sequential scheme shared by both teams
    #[default]
    Rdbu,
    /// Ramp towards each team's primary color
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub row_height: f64,
    pub margin: Margin,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 400.0,
            row_height: 18.0,
            margin: Margin {
                top: 10.0,
                right: 50.0,
                bottom: 10.0,
                left: 125.0,
            },
            font_family: "Roboto, sans-serif".to_string(),
            font_size: 12.0,
        }
    }
}

/// User-selectable knobs, before the box score is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub stat: Stat,
    pub palette: Palette,
    pub overtime_minutes: f64,
    pub layout: Layout,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            stat: Stat::default(),
            palette: Palette::default(),
            overtime_minutes: DEFAULT_OVERTIME_MINUTES,
            layout: Layout::default(),
        }
    }
}

/// Resolved chart settings shared by the axis and the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub regulation_length: f64,
    pub overtime_length: f64,
    pub stat: Stat,
    pub palette: Palette,
    pub layout: Layout,
}

impl ChartConfig {
    pub fn from_box_score(box_score: &BoxScore, options: ChartOptions) -> ChartResult<Self> {
        validate_box_score(box_score)?;
        if !(options.overtime_minutes > 0.0) {
            return Err(ChartError::invalid(format!(
                "overtime length must be positive (got {} minutes)",
                options.overtime_minutes
            )));
        }

        // Regulation length comes from the feed so other leagues' quarter lengths work.
        let regulation_length = box_score.periods[0].length();

        Ok(Self {
            regulation_length,
            overtime_length: options.overtime_minutes * TICKS_PER_MINUTE,
            stat: options.stat,
            palette: options.palette,
            layout: options.layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodSpan;

    fn box_score(first_length: f64) -> BoxScore {
        BoxScore {
            game_id: "0041800406".to_string(),
            game_date: None,
            periods: vec![PeriodSpan {
                period: 1,
                start_time: 0.0,
                end_time: first_length,
                text: None,
            }],
        }
    }

    #[test]
    fn lengths_come_from_box_score_and_options() {
        let config = ChartConfig::from_box_score(&box_score(7200.0), ChartOptions::default()).unwrap();
        assert_eq!(config.regulation_length, 7200.0);
        assert_eq!(config.overtime_length, 3000.0);
        assert_eq!(config.stat, Stat::PlayerPts);
        assert_eq!(config.palette, Palette::Rdbu);
    }

    #[test]
    fn rejects_non_positive_overtime() {
        let options = ChartOptions {
            overtime_minutes: 0.0,
            ..ChartOptions::default()
        };
        assert!(ChartConfig::from_box_score(&box_score(7200.0), options).is_err());
    }
}
