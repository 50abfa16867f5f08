//! Seed records and seeding configuration.

use chrono::NaiveDate;
use classflow_models::{ClassId, ManagerId, TeacherId};

/// Seed data for a teacher or manager.
pub struct StaffSeed {
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Only used for teachers.
    pub subject: Option<String>,
}

pub struct HolidaySeed {
    pub date: NaiveDate,
    pub name: String,
}

pub struct ClassSeed {
    pub code: String,
    pub name: String,
    pub teacher_id: Option<TeacherId>,
    pub manager_id: Option<ManagerId>,
    pub start_date: NaiveDate,
    pub week_day: i32,
    pub time_slot: String,
    pub color: String,
    pub total_sessions: i32,
}

pub struct StudentSeed {
    pub code: String,
    pub name: String,
    pub email: String,
    pub parent_name: String,
    pub parent_phone: String,
    pub class_id: ClassId,
}

/// How much fake data `seed_all` creates.
#[derive(Clone)]
pub struct SeedConfig {
    pub teachers: usize,
    pub managers: usize,
    pub classes: usize,
    pub students_per_class: usize,
    /// Seed this year's fixed public holidays before generating schedules.
    pub holidays: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 6,
            managers: 2,
            classes: 8,
            students_per_class: 12,
            holidays: true,
        }
    }
}

impl SeedConfig {
    pub fn new(classes: usize) -> Self {
        Self {
            classes,
            ..Default::default()
        }
    }

    pub fn total_students(&self) -> usize {
        self.classes * self.students_per_class
    }
}
