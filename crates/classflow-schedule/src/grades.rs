use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::round_to;

/// The grade scale every assignment is normalized onto.
const SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GradeInput {
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
}

impl GradeInput {
    pub fn new(score: f64, max_score: f64, weight: f64) -> Self {
        Self {
            score,
            max_score,
            weight,
        }
    }

    /// Score on the 10-point scale, or `None` when `max_score` is not
    /// positive and the grade cannot be normalized.
    pub fn normalized(&self) -> Option<f64> {
        (self.max_score > 0.0).then(|| self.score / self.max_score * SCALE)
    }
}

/// Weighted average on the 10-point scale, rounded to two decimals.
///
/// `None` means "no data": there are no grades or all weights are zero.
/// Grades that cannot be normalized are left out entirely.
pub fn compute_weighted_average<'a, I>(grades: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a GradeInput>,
{
    let (total, total_weight) = grades
        .into_iter()
        .filter_map(|g| g.normalized().map(|n| (n * g.weight, g.weight)))
        .fold((0.0, 0.0), |(total, weight), (points, w)| {
            (total + points, weight + w)
        });

    if total_weight == 0.0 {
        None
    } else {
        Some(round_to(total / total_weight, 2))
    }
}

/// Sorts `(key, average)` pairs best first; entries without an average go
/// last, keeping their relative order.
pub fn rank_by_average<T>(entries: &mut [(T, Option<f64>)]) {
    entries.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
