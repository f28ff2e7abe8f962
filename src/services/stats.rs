use std::collections::HashMap;

use serde::Serialize;

use crate::models::domain::{Quiz, QuizCategory, QuizDifficulty, QuizResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub total_attempts: u64,
    /// Mean raw score, rounded to two decimals.
    pub average_score: f64,
    /// Whole percent of attempts that passed.
    pub pass_rate: u32,
}

impl QuizStats {
    /// Fold a set of results. An empty set yields all zeros.
    pub fn aggregate<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a QuizResult>,
    {
        let (count, score_sum, passed) = results
            .into_iter()
            .fold((0u64, 0u64, 0u64), |(count, sum, passed), r| {
                (count + 1, sum + u64::from(r.score), passed + u64::from(r.passed))
            });

        if count == 0 {
            return Self::default();
        }

        let mean = score_sum as f64 / count as f64;
        QuizStats {
            total_attempts: count,
            average_score: (mean * 100.0).round() / 100.0,
            pass_rate: ((passed * 200 + count) / (2 * count)) as u32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_quizzes: u64,
    pub active_quizzes: u64,
    pub inactive_quizzes: u64,
    pub total_attempts: u64,
    pub total_passed: u64,
}

/// Quiz and attempt counts for one category or difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStats<K> {
    #[serde(rename = "_id")]
    pub key: K,
    pub count: u64,
    pub attempts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub overview: StatsOverview,
    pub category_stats: Vec<GroupStats<QuizCategory>>,
    pub difficulty_stats: Vec<GroupStats<QuizDifficulty>>,
    pub totals: QuizStats,
}

/// Per-quiz stats keyed by quiz id.
pub fn stats_by_quiz(results: &[QuizResult]) -> HashMap<&str, QuizStats> {
    let mut grouped: HashMap<&str, Vec<&QuizResult>> = HashMap::new();
    for result in results {
        grouped.entry(result.quiz_id.as_str()).or_default().push(result);
    }

    grouped
        .into_iter()
        .map(|(quiz_id, group)| (quiz_id, QuizStats::aggregate(group)))
        .collect()
}

/// Dashboard report across every quiz.
///
/// Groups keep first-seen order; categories are then ordered by quiz
/// count, largest first.
pub fn build_report(quizzes: &[Quiz], results: &[QuizResult]) -> StatsReport {
    let mut attempts_by_quiz: HashMap<&str, u64> = HashMap::new();
    for result in results {
        *attempts_by_quiz.entry(result.quiz_id.as_str()).or_default() += 1;
    }
    let attempts_of = |quiz: &Quiz| attempts_by_quiz.get(quiz.id.as_str()).copied().unwrap_or(0);

    let active = quizzes.iter().filter(|q| q.is_active).count() as u64;
    let overview = StatsOverview {
        total_quizzes: quizzes.len() as u64,
        active_quizzes: active,
        inactive_quizzes: quizzes.len() as u64 - active,
        total_attempts: results.len() as u64,
        total_passed: results.iter().filter(|r| r.passed).count() as u64,
    };

    let mut category_stats = group_by(quizzes, |q| q.category, attempts_of);
    category_stats.sort_by(|a, b| b.count.cmp(&a.count));
    let difficulty_stats = group_by(quizzes, |q| q.difficulty, attempts_of);

    StatsReport {
        overview,
        category_stats,
        difficulty_stats,
        totals: QuizStats::aggregate(results),
    }
}

fn group_by<K, F, A>(quizzes: &[Quiz], key_of: F, attempts_of: A) -> Vec<GroupStats<K>>
where
    K: PartialEq + Copy,
    F: Fn(&Quiz) -> K,
    A: Fn(&Quiz) -> u64,
{
    let mut groups: Vec<GroupStats<K>> = Vec::new();
    for quiz in quizzes {
        let key = key_of(quiz);
        let attempts = attempts_of(quiz);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => {
                group.count += 1;
                group.attempts += attempts;
            }
            None => groups.push(GroupStats {
                key,
                count: 1,
                attempts,
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn result(quiz_id: &str, score: u32, passed: bool) -> QuizResult {
        QuizResult {
            id: format!("{}-{}", quiz_id, score),
            quiz_id: quiz_id.to_string(),
            student_id: "s".to_string(),
            student_name: "Student".to_string(),
            student_email: "s@example.com".to_string(),
            score,
            total_questions: 40,
            passed,
            answers: Vec::new(),
            time_taken: 60,
            completed_at: Utc::now() - Duration::minutes(i64::from(score)),
        }
    }

    #[test]
    fn empty_results_yield_zeros() {
        let stats = QuizStats::aggregate(&Vec::<QuizResult>::new());
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.pass_rate, 0);
    }

    #[test]
    fn aggregate_rounds_average_to_two_places() {
        let results = vec![result("q", 30, true), result("q", 25, false), result("q", 28, true)];
        let stats = QuizStats::aggregate(&results);

        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.average_score, 27.67);
        assert_eq!(stats.pass_rate, 67);
    }

    #[test]
    fn pass_rate_rounds_half_up() {
        let mut results: Vec<QuizResult> = (0..7).map(|i| result("q", i, false)).collect();
        results.push(result("q", 35, true));
        // 1 of 8 passed = 12.5%
        assert_eq!(QuizStats::aggregate(&results).pass_rate, 13);
    }

    #[test]
    fn stats_by_quiz_groups_results() {
        let results = vec![result("a", 40, true), result("b", 10, false), result("a", 20, false)];
        let by_quiz = stats_by_quiz(&results);

        assert_eq!(by_quiz["a"].total_attempts, 2);
        assert_eq!(by_quiz["a"].average_score, 30.0);
        assert_eq!(by_quiz["a"].pass_rate, 50);
        assert_eq!(by_quiz["b"].pass_rate, 0);
        assert!(!by_quiz.contains_key("c"));
    }

    #[test]
    fn report_counts_quizzes_and_groups() {
        let mut ielts = Quiz::test_quiz("IELTS 1");
        let mut gre_a = Quiz::test_quiz("GRE 1");
        gre_a.category = QuizCategory::GreVocabulary;
        gre_a.difficulty = QuizDifficulty::Hard;
        let mut gre_b = Quiz::test_quiz("GRE 2");
        gre_b.category = QuizCategory::GreVocabulary;
        gre_b.is_active = false;
        ielts.difficulty = QuizDifficulty::Easy;

        let results = vec![
            result(&gre_a.id, 30, true),
            result(&gre_a.id, 12, false),
            result(&ielts.id, 36, true),
        ];
        let quizzes = vec![ielts, gre_a, gre_b];

        let report = build_report(&quizzes, &results);

        assert_eq!(
            report.overview,
            StatsOverview {
                total_quizzes: 3,
                active_quizzes: 2,
                inactive_quizzes: 1,
                total_attempts: 3,
                total_passed: 2,
            }
        );

        assert_eq!(report.category_stats[0].key, QuizCategory::GreVocabulary);
        assert_eq!(report.category_stats[0].count, 2);
        assert_eq!(report.category_stats[0].attempts, 2);
        assert_eq!(report.category_stats[1].key, QuizCategory::IeltsPreparation);

        let difficulties: Vec<_> = report.difficulty_stats.iter().map(|g| g.key).collect();
        assert_eq!(
            difficulties,
            vec![QuizDifficulty::Easy, QuizDifficulty::Hard, QuizDifficulty::Medium]
        );
        assert_eq!(report.totals.total_attempts, 3);
        assert_eq!(report.totals.pass_rate, 67);
    }

    #[test]
    fn group_stats_serialize_with_id_key() {
        let group = GroupStats {
            key: QuizDifficulty::Hard,
            count: 2,
            attempts: 5,
        };
        let json = serde_json::to_value(group).unwrap();
        assert_eq!(json["_id"], "hard");
        assert_eq!(json["attempts"], 5);
    }
}
