use std::collections::HashMap;
use std::fmt;

use crate::config::Palette;
use crate::grouping::Rotation;
use crate::models::{Stat, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#rrggbb` or `rrggbb`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let lerp = |a: u8, b: u8| channel(f64::from(a) + (f64::from(b) - f64::from(a)) * t);
        Rgb::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// ColorBrewer RdBu, 11 classes.
const RDBU: [Rgb; 11] = [
    Rgb::new(103, 0, 31),
    Rgb::new(178, 24, 43),
    Rgb::new(214, 96, 77),
    Rgb::new(244, 165, 130),
    Rgb::new(253, 219, 199),
    Rgb::new(247, 247, 247),
    Rgb::new(209, 229, 240),
    Rgb::new(146, 197, 222),
    Rgb::new(67, 147, 195),
    Rgb::new(33, 102, 172),
    Rgb::new(5, 48, 97),
];

/// Share of white mixed into a team color for the low end of its ramp.
const TEAM_TINT: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpolator {
    RdBu,
    Ramp { from: Rgb, to: Rgb },
}

impl Interpolator {
    /// `t` is clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Interpolator::RdBu => rgb_basis(&RDBU, t),
            Interpolator::Ramp { from, to } => from.mix(*to, t),
        }
    }
}

/// Uniform cubic B-spline through the scheme's control colors.
fn rgb_basis(colors: &[Rgb], t: f64) -> Rgb {
    let pick = |f: fn(&Rgb) -> u8| -> Vec<f64> { colors.iter().map(|c| f64::from(f(c))).collect() };
    let r = basis_spline(&pick(|c| c.r), t);
    let g = basis_spline(&pick(|c| c.g), t);
    let b = basis_spline(&pick(|c| c.b), t);
    Rgb::new(channel(r), channel(g), channel(b))
}

fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let i = if t <= 0.0 {
        0
    } else if t >= 1.0 {
        n - 1
    } else {
        ((t * n as f64).floor() as usize).min(n - 1)
    };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    let t1 = (t - i as f64 / n as f64) * n as f64;
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    domain: (f64, f64),
    interpolator: Interpolator,
}

impl SequentialScale {
    pub fn new(domain: (f64, f64), interpolator: Interpolator) -> Self {
        Self {
            domain,
            interpolator,
        }
    }

    pub fn color(&self, value: f64) -> Rgb {
        let (d0, d1) = self.domain;
        let t = if d1 == d0 { 0.5 } else { (value - d0) / (d1 - d0) };
        self.interpolator.at(t)
    }
}

/// One color scale per team in the rotation, all sharing the statistic's domain.
pub fn team_scales(rotation: &Rotation, stat: Stat, palette: Palette) -> HashMap<TeamId, SequentialScale> {
    rotation
        .teams()
        .iter()
        .map(|team| {
            let interpolator = match palette {
                Palette::Rdbu => Interpolator::RdBu,
                Palette::Team => match team.primary_color().and_then(Rgb::parse_hex) {
                    Some(primary) => Interpolator::Ramp {
                        from: primary.mix(Rgb::WHITE, TEAM_TINT),
                        to: primary,
                    },
                    None => Interpolator::RdBu,
                },
            };
            (team.team_id, SequentialScale::new(stat.domain(), interpolator))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TeamTable;
    use crate::models::{PlayerId, Session, TeamDescriptor};

    const RAPTORS: TeamId = TeamId(1610612761);
    const WARRIORS: TeamId = TeamId(1610612744);
    const BUCKS: TeamId = TeamId(1610612749);

    fn descriptor(id: TeamId, name: &str, primary_color: &str) -> TeamDescriptor {
        TeamDescriptor {
            id,
            name: name.to_string(),
            city: None,
            tricode: None,
            primary_color: Some(primary_color.to_string()),
            secondary_color: None,
        }
    }

    fn session(team_id: TeamId) -> Session {
        Session {
            team_id,
            player_id: PlayerId(1),
            period: 1,
            in_time: 7200.0,
            out_time: 6000.0,
            pt_diff: 0.0,
            player_pts: 0.0,
            usg_pct: 0.0,
        }
    }

    #[test]
    fn parses_and_formats_hex() {
        let color = Rgb::parse_hex("#CE1141").unwrap();
        assert_eq!(color, Rgb::new(206, 17, 65));
        assert_eq!(color.to_string(), "#ce1141");
        assert_eq!(Rgb::parse_hex("1d428a"), Some(Rgb::new(29, 66, 138)));
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn rdbu_hits_scheme_ends_and_midpoint() {
        let scale = SequentialScale::new((0.0, 20.0), Interpolator::RdBu);
        assert_eq!(scale.color(0.0).to_string(), "#67001f");
        assert_eq!(scale.color(20.0).to_string(), "#053061");
        assert_eq!(scale.color(10.0), Rgb::new(242, 239, 238));
    }

    #[test]
    fn values_outside_domain_are_clamped() {
        let scale = SequentialScale::new((0.0, 20.0), Interpolator::RdBu);
        assert_eq!(scale.color(-5.0), scale.color(0.0));
        assert_eq!(scale.color(45.0), scale.color(20.0));
    }

    #[test]
    fn ramp_runs_from_tint_to_primary() {
        let primary = Rgb::new(206, 17, 65);
        let scale = SequentialScale::new(
            (0.0, 1.0),
            Interpolator::Ramp {
                from: Rgb::WHITE,
                to: primary,
            },
        );
        assert_eq!(scale.color(0.0), Rgb::WHITE);
        assert_eq!(scale.color(1.0), primary);
    }

    #[test]
    fn team_palette_ramps_to_primary_and_falls_back_to_rdbu() {
        let mut table = TeamTable::new();
        table.insert(RAPTORS, descriptor(RAPTORS, "Raptors", "#ce1141"));
        table.insert(BUCKS, descriptor(BUCKS, "Bucks", "#zzzzzz"));
        let sessions = vec![session(RAPTORS), session(WARRIORS), session(BUCKS)];
        let rotation = Rotation::from_sessions(&sessions, &table);

        let scales = team_scales(&rotation, Stat::PlayerPts, Palette::Team);
        assert_eq!(scales.len(), 3);

        let primary = Rgb::new(206, 17, 65);
        let raptors = scales[&RAPTORS];
        assert_eq!(raptors.color(0.0), primary.mix(Rgb::WHITE, TEAM_TINT));
        assert_eq!(raptors.color(20.0), primary);

        // No descriptor, and an unparseable color.
        for team_id in [WARRIORS, BUCKS] {
            let scale = scales[&team_id];
            assert_eq!(scale.color(0.0).to_string(), "#67001f");
            assert_eq!(scale.color(20.0).to_string(), "#053061");
        }
    }

    #[test]
    fn rdbu_palette_ignores_team_colors() {
        let mut table = TeamTable::new();
        table.insert(RAPTORS, descriptor(RAPTORS, "Raptors", "#ce1141"));
        let rotation = Rotation::from_sessions(&[session(RAPTORS)], &table);

        let scales = team_scales(&rotation, Stat::PlayerPts, Palette::Rdbu);
        assert_eq!(scales[&RAPTORS].color(20.0).to_string(), "#053061");
    }
}
