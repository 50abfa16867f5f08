use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::round_to;
use crate::status::AttendanceStatus;

/// Per-status counts plus the derived attendance rate (percent, one decimal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceStats {
    pub on_time: i64,
    pub late: i64,
    pub excused: i64,
    pub absent: i64,
    pub total: i64,
    #[schema(example = 75.0)]
    pub rate: f64,
}

impl AttendanceStats {
    /// Builds stats from counts already aggregated elsewhere (e.g. a SQL
    /// `COUNT(*) FILTER` query).
    pub fn from_counts(on_time: i64, late: i64, excused: i64, absent: i64) -> Self {
        let total = on_time + late + excused + absent;
        Self {
            on_time,
            late,
            excused,
            absent,
            total,
            rate: attendance_rate(on_time + late, total),
        }
    }

    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::OnTime => self.on_time += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
        self.total += 1;
        self.rate = attendance_rate(self.on_time + self.late, self.total);
    }

    pub fn attended(&self) -> i64 {
        self.on_time + self.late
    }
}

impl FromIterator<AttendanceStatus> for AttendanceStats {
    fn from_iter<T: IntoIterator<Item = AttendanceStatus>>(iter: T) -> Self {
        let mut stats = Self::default();
        for status in iter {
            stats.record(status);
        }
        stats
    }
}

pub fn compute_attendance_stats<I>(records: I) -> AttendanceStats
where
    I: IntoIterator<Item = AttendanceStatus>,
{
    records.into_iter().collect()
}

/// `attended / total * 100`, rounded to one decimal; `0.0` when nothing was
/// recorded.
pub fn attendance_rate(attended: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round_to(attended as f64 / total as f64 * 100.0, 1)
}
