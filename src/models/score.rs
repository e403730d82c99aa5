// src/models/score.rs

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::grader::round_to;

/// One completed attempt. Appended to the score store, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub module: String,
    pub score: f64,
    pub total_questions: u32,
    pub timestamp: DateTime<Utc>,
    /// Time limit in effect for the attempt; `None` means no limit.
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
}

impl ScoreRecord {
    /// Builds a record, rounding the score to 4 decimals for storage.
    pub fn new(
        name: String,
        student_id: Option<String>,
        module: String,
        score: f64,
        total_questions: u32,
        time_limit_minutes: Option<u32>,
    ) -> Self {
        Self {
            name,
            student_id: student_id.filter(|s| !s.trim().is_empty()),
            module,
            score: round_to(score, 4),
            total_questions,
            timestamp: Utc::now(),
            time_limit_minutes,
        }
    }
}

/// A leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub student_id: Option<String>,
    pub module: String,
    pub score: f64,
    pub total_questions: u32,
    pub percentage: f64,
    pub timestamp: DateTime<Utc>,
}

/// Ranks score records for display.
///
/// Drops records that cannot produce a percentage, then sorts by percentage
/// (highest first) and, for ties, by completion time (earliest first).
pub fn build_leaderboard(
    records: Vec<ScoreRecord>,
    module: Option<&str>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = records
        .into_iter()
        .filter(|r| module.is_none_or(|m| r.module == m))
        .filter(|r| r.score.is_finite() && r.total_questions > 0)
        .map(|r| {
            let percentage = round_to(r.score / r.total_questions as f64 * 100.0, 1);
            LeaderboardEntry {
                name: r.name,
                student_id: r.student_id,
                module: r.module,
                score: r.score,
                total_questions: r.total_questions,
                percentage,
                timestamp: r.timestamp,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
            .then(a.timestamp.cmp(&b.timestamp))
    });
    entries.truncate(limit);
    entries
}
