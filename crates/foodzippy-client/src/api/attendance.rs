//! Attendance reports

use super::segment;
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::staff::{
    AttendanceOverviewStats, AttendanceQuery, AttendanceReport, PersonalAttendanceStats,
};

/// Which attendance endpoints to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttendanceSource {
    /// Agents and employees (`/api/admin/users-attendance`)
    #[default]
    Users,
    /// Legacy agents only (`/api/admin/attendance`)
    LegacyAgents,
}

impl AttendanceSource {
    const fn base(self) -> &'static str {
        match self {
            Self::Users => "/api/admin/users-attendance",
            Self::LegacyAgents => "/api/admin/attendance",
        }
    }
}

impl ApiClient {
    /// Attendance of everyone matching the filter
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn attendance_overview(
        &self,
        source: AttendanceSource,
        query: &AttendanceQuery,
    ) -> ClientResult<AttendanceReport<AttendanceOverviewStats>> {
        self.get_with_query(source.base(), &query.to_pairs()).await
    }

    /// Attendance of one account; only month and year apply
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn attendance_for(
        &self,
        source: AttendanceSource,
        person_id: &str,
        query: &AttendanceQuery,
    ) -> ClientResult<AttendanceReport<PersonalAttendanceStats>> {
        let period = AttendanceQuery {
            month: query.month,
            year: query.year,
            ..AttendanceQuery::default()
        };
        self.get_with_query(
            &format!("{}/{}", source.base(), segment(person_id)),
            &period.to_pairs(),
        )
        .await
    }
}
