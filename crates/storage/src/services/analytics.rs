//! Per-sport statistical summaries and team rollups.

use crate::dto::analytics::{
    AnalyticsSummary, AthleteAnalytics, BasketballBreakdown, BestGame, FootballBreakdown,
    SoccerBreakdown, SportBreakdown, TeamAnalyticsSummary, TeamBasketballBreakdown,
    TeamBreakdown, TrendPoint,
};
use crate::models::{BasketballStats, FootballStats, MetricRecord, SoccerStats, Sport};
use crate::services::ratio::{mean, round1};

/// Summarizes `records` using the field set of `sport`.
///
/// Counters missing from a record (including every counter of a record from
/// another sport) count as 0; no record is skipped. Percentages are averaged
/// per game, not pooled over makes and attempts.
pub fn summarize(records: &[MetricRecord], sport: Sport) -> AnalyticsSummary {
    if records.is_empty() {
        return AnalyticsSummary::default();
    }

    let breakdown = match sport {
        Sport::Basketball => Some(SportBreakdown::Basketball(basketball(records))),
        Sport::Soccer => Some(SportBreakdown::Soccer(soccer(records))),
        Sport::Football => Some(SportBreakdown::Football(football(records))),
        Sport::Baseball | Sport::Volleyball => None,
    };

    AnalyticsSummary {
        total_games: records.len(),
        breakdown,
    }
}

fn basketball(records: &[MetricRecord]) -> BasketballBreakdown {
    let games: Vec<BasketballStats> = records
        .iter()
        .map(|r| r.stats.as_basketball().cloned().unwrap_or_default())
        .collect();
    let average = |f: fn(&BasketballStats) -> f64| round1(mean(games.iter().map(f)));

    let best_game = records
        .iter()
        .zip(&games)
        .fold(BestGame::default(), |best, (record, stats)| {
            if stats.points > best.points {
                BestGame {
                    record_id: Some(record.record_id),
                    session_date: Some(record.session_date),
                    opponent: record.opponent.clone(),
                    points: stats.points,
                    rebounds: stats.rebounds,
                    assists: stats.assists,
                }
            } else {
                best
            }
        });

    BasketballBreakdown {
        average_points: average(|s| s.points.into()),
        average_rebounds: average(|s| s.rebounds.into()),
        average_assists: average(|s| s.assists.into()),
        average_field_goal_percentage: average(BasketballStats::field_goal_percentage),
        average_three_point_percentage: average(BasketballStats::three_point_percentage),
        average_free_throw_percentage: average(BasketballStats::free_throw_percentage),
        best_game,
    }
}

fn soccer(records: &[MetricRecord]) -> SoccerBreakdown {
    let games: Vec<SoccerStats> = records
        .iter()
        .map(|r| r.stats.as_soccer().cloned().unwrap_or_default())
        .collect();

    SoccerBreakdown {
        total_goals: games.iter().map(|s| u64::from(s.goals)).sum(),
        total_assists: games.iter().map(|s| u64::from(s.assists)).sum(),
        average_pass_accuracy: round1(mean(games.iter().map(SoccerStats::pass_accuracy))),
        average_shots: round1(mean(games.iter().map(|s| f64::from(s.shots)))),
    }
}

fn football(records: &[MetricRecord]) -> FootballBreakdown {
    let games: Vec<FootballStats> = records
        .iter()
        .map(|r| r.stats.as_football().cloned().unwrap_or_default())
        .collect();

    FootballBreakdown {
        total_passing_yards: games.iter().map(|s| u64::from(s.passing_yards)).sum(),
        total_rushing_yards: games.iter().map(|s| u64::from(s.rushing_yards)).sum(),
        total_touchdowns: games.iter().map(|s| u64::from(s.touchdowns)).sum(),
        average_completion_percentage: round1(mean(
            games.iter().map(FootballStats::completion_percentage),
        )),
    }
}

/// Chart series in input order, one point per record.
///
/// Lazy and side-effect free: calling it again on the same slice starts over.
pub fn trend_data(records: &[MetricRecord]) -> impl Iterator<Item = TrendPoint> + '_ {
    records.iter().map(|record| TrendPoint {
        session_date: record.session_date,
        counters: record.stats.trend_counters(),
    })
}

/// Rolls per-athlete summaries into team averages.
///
/// An empty roster yields a zero-valued summary.
pub fn team_summarize(athletes: &[AthleteAnalytics], sport: Sport) -> TeamAnalyticsSummary {
    if athletes.is_empty() {
        return TeamAnalyticsSummary {
            sport,
            athlete_count: 0,
            average_total_games: 0.0,
            average_goal_progress: 0.0,
            breakdown: None,
        };
    }

    let average_total_games = round1(mean(athletes.iter().map(|a| a.summary.total_games as f64)));
    let average_goal_progress = round1(mean(
        athletes
            .iter()
            .map(|a| f64::from(a.goal_progress.average_progress)),
    ));

    let breakdown = match sport {
        Sport::Basketball => Some(TeamBreakdown::Basketball(team_basketball(athletes))),
        Sport::Soccer => Some(TeamBreakdown::Soccer(team_soccer(athletes))),
        Sport::Football => Some(TeamBreakdown::Football(team_football(athletes))),
        Sport::Baseball | Sport::Volleyball => None,
    };

    TeamAnalyticsSummary {
        sport,
        athlete_count: athletes.len(),
        average_total_games,
        average_goal_progress,
        breakdown,
    }
}

fn team_basketball(athletes: &[AthleteAnalytics]) -> TeamBasketballBreakdown {
    let rows: Vec<Option<&BasketballBreakdown>> = athletes
        .iter()
        .map(|a| match &a.summary.breakdown {
            Some(SportBreakdown::Basketball(b)) => Some(b),
            _ => None,
        })
        .collect();
    let average = |f: fn(&BasketballBreakdown) -> f64| {
        round1(mean(rows.iter().map(|row| row.map(f).unwrap_or(0.0))))
    };

    TeamBasketballBreakdown {
        average_points: average(|b| b.average_points),
        average_rebounds: average(|b| b.average_rebounds),
        average_assists: average(|b| b.average_assists),
        average_field_goal_percentage: average(|b| b.average_field_goal_percentage),
    }
}

fn team_soccer(athletes: &[AthleteAnalytics]) -> SoccerBreakdown {
    let rows: Vec<Option<&SoccerBreakdown>> = athletes
        .iter()
        .map(|a| match &a.summary.breakdown {
            Some(SportBreakdown::Soccer(b)) => Some(b),
            _ => None,
        })
        .collect();

    SoccerBreakdown {
        total_goals: rows.iter().flatten().map(|b| b.total_goals).sum(),
        total_assists: rows.iter().flatten().map(|b| b.total_assists).sum(),
        average_pass_accuracy: round1(mean(
            rows.iter()
                .map(|row| row.map_or(0.0, |b| b.average_pass_accuracy)),
        )),
        average_shots: round1(mean(rows.iter().map(|row| row.map_or(0.0, |b| b.average_shots)))),
    }
}

fn team_football(athletes: &[AthleteAnalytics]) -> FootballBreakdown {
    let rows: Vec<Option<&FootballBreakdown>> = athletes
        .iter()
        .map(|a| match &a.summary.breakdown {
            Some(SportBreakdown::Football(b)) => Some(b),
            _ => None,
        })
        .collect();

    FootballBreakdown {
        total_passing_yards: rows.iter().flatten().map(|b| b.total_passing_yards).sum(),
        total_rushing_yards: rows.iter().flatten().map(|b| b.total_rushing_yards).sum(),
        total_touchdowns: rows.iter().flatten().map(|b| b.total_touchdowns).sum(),
        average_completion_percentage: round1(mean(
            rows.iter()
                .map(|row| row.map_or(0.0, |b| b.average_completion_percentage)),
        )),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dto::goal::GoalProgressRollup;
    use crate::models::{BaseballStats, SessionType, SportStats};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    pub(crate) fn record(day: u32, stats: SportStats) -> MetricRecord {
        MetricRecord {
            record_id: Uuid::new_v4(),
            athlete_id: Uuid::nil(),
            session_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            session_type: SessionType::Game,
            opponent: None,
            notes: None,
            stats,
            verified: false,
            verified_by: None,
            verified_at: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, day, 20, 0, 0).unwrap(),
        }
    }

    pub(crate) fn basketball_game(day: u32, points: u32, fgm: u32, fga: u32) -> MetricRecord {
        record(
            day,
            SportStats::Basketball(BasketballStats {
                points,
                field_goals_made: fgm,
                field_goals_attempted: fga,
                ..Default::default()
            }),
        )
    }

    fn soccer_game(
        day: u32,
        goals: u32,
        shots: u32,
        completed: u32,
        attempted: u32,
    ) -> MetricRecord {
        record(
            day,
            SportStats::Soccer(SoccerStats {
                goals,
                shots,
                passes_completed: completed,
                passes_attempted: attempted,
                ..Default::default()
            }),
        )
    }

    fn basketball_breakdown(summary: &AnalyticsSummary) -> &BasketballBreakdown {
        match &summary.breakdown {
            Some(SportBreakdown::Basketball(b)) => b,
            other => panic!("expected basketball breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_two_game_basketball_summary() {
        let records = vec![basketball_game(1, 20, 8, 16), basketball_game(2, 30, 10, 20)];

        let summary = summarize(&records, Sport::Basketball);
        let b = basketball_breakdown(&summary);

        assert_eq!(summary.total_games, 2);
        assert_eq!(b.average_points, 25.0);
        assert_eq!(b.average_field_goal_percentage, 50.0);
        assert_eq!(b.best_game.points, 30);
        assert_eq!(b.best_game.record_id, Some(records[1].record_id));
    }

    #[test]
    fn test_empty_summary_has_only_total_games() {
        let summary = summarize(&[], Sport::Basketball);

        assert_eq!(summary.total_games, 0);
        assert!(summary.breakdown.is_none());
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({ "total_games": 0 })
        );
    }

    #[test]
    fn test_zero_attempts_contribute_zero_percent() {
        let records = vec![basketball_game(1, 10, 8, 16), basketball_game(2, 4, 0, 0)];

        let summary = summarize(&records, Sport::Basketball);
        let b = basketball_breakdown(&summary);

        assert_eq!(b.average_field_goal_percentage, 25.0);
        assert!(!b.average_three_point_percentage.is_nan());
        assert_eq!(b.average_three_point_percentage, 0.0);
    }

    #[test]
    fn test_percentages_average_per_game_not_pooled() {
        // Pooled would be 11/22 = 50%; per game is (100 + 45) / 2.
        let records = vec![basketball_game(1, 2, 1, 1), basketball_game(2, 18, 9, 20)];

        let summary = summarize(&records, Sport::Basketball);

        assert_eq!(basketball_breakdown(&summary).average_field_goal_percentage, 72.5);
    }

    #[test]
    fn test_all_zero_games_return_sentinel_best_game() {
        let records = vec![basketball_game(1, 0, 0, 3), basketball_game(2, 0, 0, 0)];

        let summary = summarize(&records, Sport::Basketball);

        assert_eq!(basketball_breakdown(&summary).best_game, BestGame::default());
    }

    #[test]
    fn test_best_game_keeps_first_of_equal_scores() {
        let records = vec![basketball_game(1, 22, 9, 18), basketball_game(2, 22, 8, 15)];

        let summary = summarize(&records, Sport::Basketball);

        assert_eq!(
            basketball_breakdown(&summary).best_game.record_id,
            Some(records[0].record_id)
        );
    }

    #[test]
    fn test_other_sport_record_counts_as_zero() {
        let records = vec![
            basketball_game(1, 30, 10, 20),
            soccer_game(2, 2, 5, 30, 40),
        ];

        let summary = summarize(&records, Sport::Basketball);
        let b = basketball_breakdown(&summary);

        assert_eq!(summary.total_games, 2);
        assert_eq!(b.average_points, 15.0);
        assert_eq!(b.average_field_goal_percentage, 25.0);
    }

    #[test]
    fn test_soccer_totals_and_averages() {
        let records = vec![soccer_game(1, 2, 5, 30, 40), soccer_game(2, 1, 3, 0, 0)];

        let summary = summarize(&records, Sport::Soccer);

        match summary.breakdown {
            Some(SportBreakdown::Soccer(s)) => {
                assert_eq!(s.total_goals, 3);
                assert_eq!(s.total_assists, 0);
                assert_eq!(s.average_pass_accuracy, 37.5);
                assert_eq!(s.average_shots, 4.0);
            }
            other => panic!("expected soccer breakdown, got {other:?}"),
        }
    }

    fn football_game(
        day: u32,
        passing_yards: u32,
        rushing_yards: u32,
        touchdowns: u32,
        completions: u32,
        pass_attempts: u32,
    ) -> MetricRecord {
        record(
            day,
            SportStats::Football(FootballStats {
                passing_yards,
                rushing_yards,
                touchdowns,
                completions,
                pass_attempts,
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_football_totals_and_completion_average() {
        let records = vec![
            football_game(1, 250, 30, 2, 15, 20),
            football_game(2, 0, 80, 1, 0, 0),
        ];

        let summary = summarize(&records, Sport::Football);

        assert_eq!(summary.total_games, 2);
        match summary.breakdown {
            Some(SportBreakdown::Football(f)) => {
                assert_eq!(f.total_passing_yards, 250);
                assert_eq!(f.total_rushing_yards, 110);
                assert_eq!(f.total_touchdowns, 3);
                // (75 + 0) / 2, the game without attempts counts as 0%
                assert_eq!(f.average_completion_percentage, 37.5);
            }
            other => panic!("expected football breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_football_game_without_attempts_is_zero_percent() {
        let summary = summarize(&[football_game(1, 0, 45, 0, 0, 0)], Sport::Football);

        match summary.breakdown {
            Some(SportBreakdown::Football(f)) => {
                assert_eq!(f.total_rushing_yards, 45);
                assert_eq!(f.average_completion_percentage, 0.0);
            }
            other => panic!("expected football breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_sport_without_field_set_degrades_to_game_count() {
        let records = vec![record(
            1,
            SportStats::Baseball(BaseballStats {
                hits: 2,
                at_bats: 4,
                ..Default::default()
            }),
        )];

        let summary = summarize(&records, Sport::Baseball);

        assert_eq!(summary.total_games, 1);
        assert!(summary.breakdown.is_none());
    }

    #[test]
    fn test_trend_data_is_ordered_and_restartable() {
        let records = vec![
            basketball_game(3, 12, 5, 10),
            basketball_game(1, 20, 8, 16),
            basketball_game(2, 30, 10, 20),
        ];

        let first: Vec<TrendPoint> = trend_data(&records).collect();
        let second: Vec<TrendPoint> = trend_data(&records).collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].session_date, records[0].session_date);
        assert_eq!(first[0].counters["points"], 12);
        assert_eq!(first[2].counters["points"], 30);
    }

    fn athlete(summary: AnalyticsSummary, average_progress: u8) -> AthleteAnalytics {
        AthleteAnalytics {
            athlete_id: Uuid::new_v4(),
            athlete_name: "Test Athlete".to_string(),
            summary,
            goal_progress: GoalProgressRollup {
                total_goals: 1,
                active_goals: 1,
                completed_goals: 0,
                average_progress,
            },
        }
    }

    #[test]
    fn test_team_summary_of_empty_roster_is_zero() {
        let team = team_summarize(&[], Sport::Basketball);

        assert_eq!(team.athlete_count, 0);
        assert_eq!(team.average_total_games, 0.0);
        assert_eq!(team.average_goal_progress, 0.0);
        assert!(team.breakdown.is_none());
    }

    #[test]
    fn test_team_basketball_averages_include_idle_athletes() {
        let busy = summarize(
            &[basketball_game(1, 20, 8, 16), basketball_game(2, 30, 10, 20)],
            Sport::Basketball,
        );
        let idle = summarize(&[], Sport::Basketball);

        let team = team_summarize(&[athlete(busy, 80), athlete(idle, 40)], Sport::Basketball);

        assert_eq!(team.athlete_count, 2);
        assert_eq!(team.average_total_games, 1.0);
        assert_eq!(team.average_goal_progress, 60.0);
        match team.breakdown {
            Some(TeamBreakdown::Basketball(b)) => {
                assert_eq!(b.average_points, 12.5);
                assert_eq!(b.average_field_goal_percentage, 25.0);
            }
            other => panic!("expected basketball breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_team_soccer_sums_totals() {
        let a = summarize(&[soccer_game(1, 2, 5, 30, 40)], Sport::Soccer);
        let b = summarize(&[soccer_game(1, 1, 2, 10, 20)], Sport::Soccer);

        let team = team_summarize(&[athlete(a, 50), athlete(b, 50)], Sport::Soccer);

        match team.breakdown {
            Some(TeamBreakdown::Soccer(s)) => {
                assert_eq!(s.total_goals, 3);
                assert_eq!(s.average_pass_accuracy, 62.5);
                assert_eq!(s.average_shots, 3.5);
            }
            other => panic!("expected soccer breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_team_football_sums_totals_and_averages_completion() {
        let starter = summarize(
            &[
                football_game(1, 250, 30, 2, 15, 20),
                football_game(2, 0, 80, 1, 0, 0),
            ],
            Sport::Football,
        );
        let backup = summarize(&[football_game(1, 120, 0, 1, 17, 40)], Sport::Football);
        let idle = summarize(&[], Sport::Football);

        let team = team_summarize(
            &[athlete(starter, 30), athlete(backup, 30), athlete(idle, 30)],
            Sport::Football,
        );

        assert_eq!(team.athlete_count, 3);
        assert_eq!(team.average_total_games, 1.0);
        match team.breakdown {
            Some(TeamBreakdown::Football(f)) => {
                assert_eq!(f.total_passing_yards, 370);
                assert_eq!(f.total_rushing_yards, 110);
                assert_eq!(f.total_touchdowns, 4);
                // (37.5 + 42.5 + 0) / 3
                assert_eq!(f.average_completion_percentage, 26.7);
            }
            other => panic!("expected football breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_team_volleyball_has_no_breakdown() {
        let team = team_summarize(
            &[athlete(AnalyticsSummary::default(), 10)],
            Sport::Volleyball,
        );

        assert_eq!(team.athlete_count, 1);
        assert_eq!(team.average_goal_progress, 10.0);
        assert!(team.breakdown.is_none());
    }
}
