use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A conference registration with its attendance record.
///
/// Attendance flags are written by the on-site attendance process; this
/// service only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registrant {
    pub id: i64,
    pub name: String,
    pub designation: String,
    pub organization: String,
    pub email: String,
    pub mobile: String,
    pub city: String,
    pub mode: String,
    pub attendance_day1: bool,
    pub attendance_day2: bool,
    pub registered_at: DateTime<Utc>,
}

/// Login form: a single identifier matched against id, mobile and email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub identifier: String,
}
