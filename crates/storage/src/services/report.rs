//! Builds the structured athlete report from analytics and goal rollups.

use chrono::{DateTime, Utc};

use crate::dto::analytics::{AnalyticsSummary, ReportPeriod, SportBreakdown};
use crate::dto::goal::GoalProgressRollup;
use crate::dto::report::{AthleteIdentity, Report};
use crate::models::{Goal, MetricRecord};
use crate::services::{analytics, goal_progress};

pub fn compose(
    athlete: AthleteIdentity,
    records: &[MetricRecord],
    goals: &[Goal],
    period: ReportPeriod,
    generated_at: DateTime<Utc>,
) -> Report {
    let analytics = analytics::summarize(records, athlete.sport);
    let goal_progress = goal_progress::rollup(goals);
    let summary = summary_text(&athlete.name, &period, &analytics, &goal_progress);

    Report {
        athlete,
        period,
        analytics,
        goal_progress,
        summary,
        generated_at,
    }
}

/// One report per athlete, in roster order.
pub fn team_reports<'a, I>(
    roster: I,
    period: ReportPeriod,
    generated_at: DateTime<Utc>,
) -> Vec<Report>
where
    I: IntoIterator<Item = (AthleteIdentity, &'a [MetricRecord], &'a [Goal])>,
{
    roster
        .into_iter()
        .map(|(athlete, records, goals)| compose(athlete, records, goals, period, generated_at))
        .collect()
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn period_phrase(period: &ReportPeriod) -> String {
    match (period.from, period.to) {
        (Some(from), Some(to)) => format!(" between {} and {}", from, to),
        (Some(from), None) => format!(" since {}", from),
        (None, Some(to)) => format!(" up to {}", to),
        (None, None) => String::new(),
    }
}

fn stat_sentence(breakdown: &SportBreakdown) -> String {
    match breakdown {
        SportBreakdown::Basketball(b) => format!(
            "Averaged {} points, {} rebounds and {} assists per game, shooting {}% from the field.",
            b.average_points, b.average_rebounds, b.average_assists, b.average_field_goal_percentage
        ),
        SportBreakdown::Soccer(s) => format!(
            "Scored {} with {} and {}% pass accuracy.",
            plural(s.total_goals as usize, "goal"),
            plural(s.total_assists as usize, "assist"),
            s.average_pass_accuracy
        ),
        SportBreakdown::Football(f) => format!(
            "Accumulated {} passing yards, {} rushing yards and {}.",
            f.total_passing_yards,
            f.total_rushing_yards,
            plural(f.total_touchdowns as usize, "touchdown")
        ),
    }
}

fn summary_text(
    name: &str,
    period: &ReportPeriod,
    analytics: &AnalyticsSummary,
    goals: &GoalProgressRollup,
) -> String {
    let mut sentences = Vec::new();

    if analytics.total_games > 0 {
        sentences.push(format!(
            "{} played {}{}.",
            name,
            plural(analytics.total_games, "game"),
            period_phrase(period)
        ));
    }

    if let Some(breakdown) = &analytics.breakdown {
        sentences.push(stat_sentence(breakdown));
    }

    if goals.total_goals > 0 {
        sentences.push(format!(
            "Tracking {} with {} active and an average progress of {}%.",
            plural(goals.total_goals, "goal"),
            goals.active_goals,
            goals.average_progress
        ));
    }

    if goals.completed_goals > 0 {
        sentences.push(format!("Completed {}.", plural(goals.completed_goals, "goal")));
    }

    sentences.join(" ")
}
