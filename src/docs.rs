use utoipa::OpenApi;

use classflow_core::{ErrorResponse, PaginationMeta, PaginationParams};
use classflow_models::{AssignmentType, ClassStatus};
use classflow_schedule::{
    AttendanceStats, AttendanceStatus, GradeInput, ScheduleRequest, ScheduledSession,
    SessionStatus,
};

use crate::modules::attendance::model::{
    AttendanceEntryDto, AttendanceRecord, AttendanceWithStudent, SaveAttendanceDto,
    SaveAttendanceResponse, StudentAttendanceStats, StudentAttendanceSummary,
};
use crate::modules::classes::model::{
    Class, ClassDetail, ClassWithStats, CreateClassDto, PaginatedClassesResponse,
    SchedulePreviewDto, SchedulePreviewResponse, UpdateClassDto,
};
use crate::modules::comments::model::{
    Comment, CommentEntryDto, CommentWithStudent, ReplaceCommentsDto, UpsertCommentDto,
};
use crate::modules::dashboard::model::{DashboardResponse, EntityCounts, UpcomingSession};
use crate::modules::grades::model::{
    BulkGradesDto, BulkGradesResponse, CreateGradeDto, Grade, GradeWithStudent, StudentAverage,
    StudentGradesResponse, UpdateGradeDto,
};
use crate::modules::holidays::model::{
    BulkCreateHolidaysDto, BulkCreateHolidaysResponse, CreateHolidayDto, Holiday,
    UpdateHolidayDto,
};
use crate::modules::managers::model::{
    CreateManagerDto, Manager, ManagerWithStats, UpdateManagerDto,
};
use crate::modules::sessions::model::{
    ReplaceSessionsDto, Session, SessionInputDto, UpdateSessionDto,
};
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentWithClass, UpdateStudentDto,
};
use crate::modules::teachers::model::{
    CreateTeacherDto, Teacher, TeacherWithStats, UpdateTeacherDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::regenerate_sessions,
        crate::modules::classes::controller::preview_schedule,
        crate::modules::sessions::controller::get_sessions,
        crate::modules::sessions::controller::replace_sessions,
        crate::modules::sessions::controller::update_session,
        crate::modules::attendance::controller::save_attendance,
        crate::modules::attendance::controller::get_class_attendance,
        crate::modules::attendance::controller::get_class_attendance_stats,
        crate::modules::attendance::controller::get_student_summaries,
        crate::modules::attendance::controller::get_student_attendance_stats,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::bulk_upsert_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::grades::controller::get_class_grades,
        crate::modules::grades::controller::get_class_averages,
        crate::modules::grades::controller::get_student_grades,
        crate::modules::holidays::controller::get_holidays,
        crate::modules::holidays::controller::get_upcoming_holidays,
        crate::modules::holidays::controller::get_holidays_in_range,
        crate::modules::holidays::controller::get_holiday,
        crate::modules::holidays::controller::create_holiday,
        crate::modules::holidays::controller::bulk_create_holidays,
        crate::modules::holidays::controller::update_holiday,
        crate::modules::holidays::controller::delete_holiday,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::managers::controller::create_manager,
        crate::modules::managers::controller::get_managers,
        crate::modules::managers::controller::get_manager,
        crate::modules::managers::controller::update_manager,
        crate::modules::managers::controller::delete_manager,
        crate::modules::managers::controller::get_manager_classes,
        crate::modules::comments::controller::get_comments,
        crate::modules::comments::controller::replace_comments,
        crate::modules::comments::controller::upsert_comment,
        crate::modules::comments::controller::delete_comment,
        crate::modules::dashboard::controller::get_dashboard,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            ClassStatus,
            AssignmentType,
            SessionStatus,
            AttendanceStatus,
            ScheduleRequest,
            ScheduledSession,
            AttendanceStats,
            GradeInput,
            Class,
            ClassWithStats,
            ClassDetail,
            CreateClassDto,
            UpdateClassDto,
            PaginatedClassesResponse,
            SchedulePreviewDto,
            SchedulePreviewResponse,
            Session,
            SessionInputDto,
            ReplaceSessionsDto,
            UpdateSessionDto,
            AttendanceRecord,
            AttendanceWithStudent,
            AttendanceEntryDto,
            SaveAttendanceDto,
            SaveAttendanceResponse,
            StudentAttendanceSummary,
            StudentAttendanceStats,
            Grade,
            GradeWithStudent,
            CreateGradeDto,
            UpdateGradeDto,
            BulkGradesDto,
            BulkGradesResponse,
            StudentAverage,
            StudentGradesResponse,
            Holiday,
            CreateHolidayDto,
            UpdateHolidayDto,
            BulkCreateHolidaysDto,
            BulkCreateHolidaysResponse,
            Student,
            StudentWithClass,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Teacher,
            TeacherWithStats,
            CreateTeacherDto,
            UpdateTeacherDto,
            Manager,
            ManagerWithStats,
            CreateManagerDto,
            UpdateManagerDto,
            Comment,
            CommentWithStudent,
            CommentEntryDto,
            ReplaceCommentsDto,
            UpsertCommentDto,
            EntityCounts,
            UpcomingSession,
            DashboardResponse,
        )
    ),
    tags(
        (name = "Classes", description = "Classes and their generated schedules"),
        (name = "Sessions", description = "Session lists of a class"),
        (name = "Attendance", description = "Per-session attendance and rates"),
        (name = "Grades", description = "Grades and weighted averages"),
        (name = "Holidays", description = "Holiday calendar used by the schedule generator"),
        (name = "Students", description = "Student management"),
        (name = "Teachers", description = "Teacher management"),
        (name = "Managers", description = "Manager management"),
        (name = "Comments", description = "Per-student class comments"),
        (name = "Dashboard", description = "Aggregate overview")
    ),
    info(
        title = "ClassFlow API",
        version = "0.1.0",
        description = "Class scheduling, attendance and grading backend built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
