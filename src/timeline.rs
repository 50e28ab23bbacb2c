use tracing::warn;

use crate::config::ChartConfig;
use crate::models::{BoxScore, PeriodSpan, Session};

pub const REGULATION_PERIODS: u32 = 4;
/// Longest game the axis will lay out. Larger period numbers are treated as corrupt.
pub const MAX_PERIODS: u32 = REGULATION_PERIODS + 16;
pub const FINAL_LABEL: &str = "FINAL";

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

/// Maps (period, countdown clock) pairs onto a single left-to-right game timeline.
///
/// Every regulation period is assumed to last `regulation_length` ticks and every
/// overtime period `overtime_length` ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    regulation_length: f64,
    overtime_length: f64,
    period_count: u32,
    labels: Vec<PeriodSpan>,
}

impl TimeAxis {
    pub fn new(regulation_length: f64, overtime_length: f64, period_count: u32) -> Self {
        Self {
            regulation_length,
            overtime_length,
            period_count,
            labels: Vec::new(),
        }
    }

    /// Covers every box score period and every period a session refers to.
    pub fn for_game(config: &ChartConfig, box_score: &BoxScore, max_session_period: Option<u32>) -> Self {
        let listed = box_score
            .periods
            .iter()
            .map(|period| period.period)
            .max()
            .unwrap_or(0)
            .max(box_score.periods.len() as u32);
        let mut period_count = listed.max(max_session_period.unwrap_or(0)).max(1);
        if period_count > MAX_PERIODS {
            warn!(period_count, max = MAX_PERIODS, "period count out of range, truncating axis");
            period_count = MAX_PERIODS;
        }

        Self {
            labels: box_score.periods.clone(),
            ..Self::new(config.regulation_length, config.overtime_length, period_count)
        }
    }

    pub fn period_count(&self) -> u32 {
        self.period_count
    }

    pub fn period_length(&self, period: u32) -> f64 {
        if period > REGULATION_PERIODS {
            self.overtime_length
        } else {
            self.regulation_length
        }
    }

    /// Total length of all periods before `period`.
    pub fn period_offset(&self, period: u32) -> f64 {
        let index = period.max(1) - 1;
        let regulation_before = index.min(REGULATION_PERIODS);
        let overtime_before = index.saturating_sub(REGULATION_PERIODS);
        f64::from(regulation_before) * self.regulation_length
            + f64::from(overtime_before) * self.overtime_length
    }

    pub fn session_start(&self, session: &Session) -> f64 {
        self.period_offset(session.period) + (self.period_length(session.period) - session.in_time)
    }

    pub fn session_end(&self, session: &Session) -> f64 {
        self.session_start(session) + session.duration_ticks()
    }

    pub fn game_end(&self) -> f64 {
        self.period_offset(self.period_count.saturating_add(1))
    }

    /// Period starts plus a closing tick at the end of the game.
    pub fn ticks(&self) -> Vec<AxisTick> {
        let mut ticks: Vec<AxisTick> = (1..=self.period_count)
            .map(|period| AxisTick {
                value: self.period_offset(period),
                label: self.period_label(period),
            })
            .collect();
        ticks.push(AxisTick {
            value: self.game_end(),
            label: FINAL_LABEL.to_string(),
        });
        ticks
    }

    pub fn period_label(&self, period: u32) -> String {
        self.labels
            .iter()
            .find(|span| span.period == period)
            .and_then(|span| span.text.clone())
            .unwrap_or_else(|| default_period_label(period))
    }
}

pub fn default_period_label(period: u32) -> String {
    if period > REGULATION_PERIODS {
        format!("OT{}", period - REGULATION_PERIODS)
    } else {
        format!("Q{period}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}
