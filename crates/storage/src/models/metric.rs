use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Sport;
use crate::services::ratio::safe_ratio;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "session_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Game,
    Practice,
    Scrimmage,
    Tournament,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BasketballStats {
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub minutes_played: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub three_pointers_made: u32,
    pub three_pointers_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
}

impl BasketballStats {
    pub fn field_goal_percentage(&self) -> f64 {
        safe_ratio(self.field_goals_made.into(), self.field_goals_attempted.into())
    }

    pub fn three_point_percentage(&self) -> f64 {
        safe_ratio(
            self.three_pointers_made.into(),
            self.three_pointers_attempted.into(),
        )
    }

    pub fn free_throw_percentage(&self) -> f64 {
        safe_ratio(self.free_throws_made.into(), self.free_throws_attempted.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SoccerStats {
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub passes_completed: u32,
    pub passes_attempted: u32,
    pub tackles: u32,
    pub saves: u32,
    pub minutes_played: u32,
}

impl SoccerStats {
    pub fn pass_accuracy(&self) -> f64 {
        safe_ratio(self.passes_completed.into(), self.passes_attempted.into())
    }

    pub fn shot_accuracy(&self) -> f64 {
        safe_ratio(self.shots_on_target.into(), self.shots.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FootballStats {
    pub passing_yards: u32,
    pub rushing_yards: u32,
    pub receiving_yards: u32,
    pub touchdowns: u32,
    pub interceptions: u32,
    pub completions: u32,
    pub pass_attempts: u32,
    pub tackles: u32,
    pub sacks: u32,
}

impl FootballStats {
    pub fn completion_percentage(&self) -> f64 {
        safe_ratio(self.completions.into(), self.pass_attempts.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BaseballStats {
    pub at_bats: u32,
    pub hits: u32,
    pub runs: u32,
    pub runs_batted_in: u32,
    pub home_runs: u32,
    pub strikeouts: u32,
    pub walks: u32,
}

impl BaseballStats {
    /// Hits per at-bat, expressed as a percentage like every other ratio.
    pub fn batting_percentage(&self) -> f64 {
        safe_ratio(self.hits.into(), self.at_bats.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct VolleyballStats {
    pub kills: u32,
    pub attack_attempts: u32,
    pub attack_errors: u32,
    pub aces: u32,
    pub blocks: u32,
    pub digs: u32,
    pub assists: u32,
}

impl VolleyballStats {
    /// (kills - errors) / attempts. Negative efficiency is reported as-is.
    pub fn hitting_percentage(&self) -> f64 {
        safe_ratio(
            f64::from(self.kills) - f64::from(self.attack_errors),
            self.attack_attempts.into(),
        )
    }
}

/// Per-session counters, one fixed schema per sport.
///
/// Serialized with the sport as an inline tag:
/// `{"sport": "basketball", "points": 20, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "sport", rename_all = "lowercase")]
pub enum SportStats {
    Basketball(BasketballStats),
    Soccer(SoccerStats),
    Football(FootballStats),
    Baseball(BaseballStats),
    Volleyball(VolleyballStats),
}

impl SportStats {
    pub fn sport(&self) -> Sport {
        match self {
            Self::Basketball(_) => Sport::Basketball,
            Self::Soccer(_) => Sport::Soccer,
            Self::Football(_) => Sport::Football,
            Self::Baseball(_) => Sport::Baseball,
            Self::Volleyball(_) => Sport::Volleyball,
        }
    }

    pub fn as_basketball(&self) -> Option<&BasketballStats> {
        match self {
            Self::Basketball(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn as_soccer(&self) -> Option<&SoccerStats> {
        match self {
            Self::Soccer(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn as_football(&self) -> Option<&FootballStats> {
        match self {
            Self::Football(stats) => Some(stats),
            _ => None,
        }
    }

    /// Raw counters plotted on the trend chart for this sport.
    pub fn trend_counters(&self) -> BTreeMap<&'static str, u32> {
        match self {
            Self::Basketball(s) => BTreeMap::from([
                ("points", s.points),
                ("rebounds", s.rebounds),
                ("assists", s.assists),
            ]),
            Self::Soccer(s) => BTreeMap::from([
                ("goals", s.goals),
                ("assists", s.assists),
                ("shots", s.shots),
            ]),
            Self::Football(s) => BTreeMap::from([
                ("passing_yards", s.passing_yards),
                ("rushing_yards", s.rushing_yards),
                ("touchdowns", s.touchdowns),
            ]),
            Self::Baseball(s) => BTreeMap::from([
                ("hits", s.hits),
                ("runs", s.runs),
                ("runs_batted_in", s.runs_batted_in),
            ]),
            Self::Volleyball(s) => BTreeMap::from([
                ("kills", s.kills),
                ("aces", s.aces),
                ("digs", s.digs),
            ]),
        }
    }

    pub fn derived_ratios(&self) -> BTreeMap<&'static str, f64> {
        match self {
            Self::Basketball(s) => BTreeMap::from([
                ("field_goal_percentage", s.field_goal_percentage()),
                ("three_point_percentage", s.three_point_percentage()),
                ("free_throw_percentage", s.free_throw_percentage()),
            ]),
            Self::Soccer(s) => BTreeMap::from([
                ("pass_accuracy", s.pass_accuracy()),
                ("shot_accuracy", s.shot_accuracy()),
            ]),
            Self::Football(s) => {
                BTreeMap::from([("completion_percentage", s.completion_percentage())])
            }
            Self::Baseball(s) => BTreeMap::from([("batting_percentage", s.batting_percentage())]),
            Self::Volleyball(s) => BTreeMap::from([("hitting_percentage", s.hitting_percentage())]),
        }
    }

    /// Names of made/attempted pairs where more were made than attempted.
    pub fn inconsistencies(&self) -> Vec<&'static str> {
        let pairs: Vec<(&'static str, u32, u32)> = match self {
            Self::Basketball(s) => vec![
                ("field_goals", s.field_goals_made, s.field_goals_attempted),
                ("three_pointers", s.three_pointers_made, s.three_pointers_attempted),
                ("free_throws", s.free_throws_made, s.free_throws_attempted),
                ("three_pointers_vs_field_goals", s.three_pointers_made, s.field_goals_made),
            ],
            Self::Soccer(s) => vec![
                ("passes", s.passes_completed, s.passes_attempted),
                ("shots_on_target", s.shots_on_target, s.shots),
                ("goals_vs_shots", s.goals, s.shots),
            ],
            Self::Football(s) => vec![("completions", s.completions, s.pass_attempts)],
            Self::Baseball(s) => vec![
                ("hits", s.hits, s.at_bats),
                ("home_runs_vs_hits", s.home_runs, s.hits),
            ],
            Self::Volleyball(s) => vec![
                ("kills", s.kills, s.attack_attempts),
                ("attack_errors", s.attack_errors, s.attack_attempts),
            ],
        };

        pairs
            .into_iter()
            .filter(|(_, made, attempted)| made > attempted)
            .map(|(name, _, _)| name)
            .collect()
    }
}

/// One dated game or practice session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricRecord {
    pub record_id: Uuid,
    pub athlete_id: Uuid,
    pub session_date: NaiveDate,
    pub session_type: SessionType,
    pub opponent: Option<String>,
    pub notes: Option<String>,
    pub stats: SportStats,
    pub verified: bool,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MetricRecord {
    pub fn sport(&self) -> Sport {
        self.stats.sport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_deserialize_with_inline_sport_tag() {
        let stats: SportStats = serde_json::from_value(serde_json::json!({
            "sport": "basketball",
            "points": 20,
            "field_goals_made": 8,
            "field_goals_attempted": 16
        }))
        .unwrap();

        let basketball = stats.as_basketball().unwrap();
        assert_eq!(basketball.points, 20);
        assert_eq!(basketball.rebounds, 0);
        assert_eq!(basketball.field_goal_percentage(), 50.0);
        assert_eq!(stats.sport(), Sport::Basketball);
    }

    #[test]
    fn test_zero_attempts_give_zero_percentages() {
        let stats = BasketballStats::default();
        assert_eq!(stats.field_goal_percentage(), 0.0);
        assert_eq!(stats.three_point_percentage(), 0.0);
        assert_eq!(stats.free_throw_percentage(), 0.0);

        assert_eq!(SoccerStats::default().pass_accuracy(), 0.0);
        assert_eq!(FootballStats::default().completion_percentage(), 0.0);
    }

    #[test]
    fn test_volleyball_hitting_percentage_can_be_negative() {
        let stats = VolleyballStats {
            kills: 2,
            attack_errors: 4,
            attack_attempts: 10,
            ..Default::default()
        };
        assert_eq!(stats.hitting_percentage(), -20.0);
    }

    #[test]
    fn test_inconsistencies_flag_made_over_attempted() {
        let stats = SportStats::Basketball(BasketballStats {
            free_throws_made: 5,
            free_throws_attempted: 4,
            ..Default::default()
        });
        assert_eq!(stats.inconsistencies(), vec!["free_throws"]);

        let clean = SportStats::Soccer(SoccerStats {
            goals: 1,
            shots: 3,
            shots_on_target: 2,
            passes_completed: 30,
            passes_attempted: 40,
            ..Default::default()
        });
        assert!(clean.inconsistencies().is_empty());
    }

    #[test]
    fn test_trend_counters_per_sport() {
        let stats = SportStats::Football(FootballStats {
            passing_yards: 250,
            touchdowns: 3,
            ..Default::default()
        });
        let counters = stats.trend_counters();
        assert_eq!(counters["passing_yards"], 250);
        assert_eq!(counters["rushing_yards"], 0);
        assert_eq!(counters["touchdowns"], 3);
    }
}
