//! Agents, employees and their attendance

use crate::types::{EntityId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An agent or employee account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    /// Account id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Role, absent on legacy agent records
    #[serde(default)]
    pub role: Option<Role>,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Phone
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// Date of birth as entered
    #[serde(default)]
    pub dob: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Whether the account can sign in
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Agent kind
    #[serde(default)]
    pub agent_type: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

/// Body of `POST /api/admin/users`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffUser {
    /// Full name
    #[validate(length(min = 1))]
    pub name: String,
    /// Login name
    #[validate(length(min = 1))]
    pub username: String,
    /// Initial password
    #[validate(length(min = 1))]
    pub password: String,
    /// Role
    pub role: Role,
    /// Phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    /// Email
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// Date of birth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
}

impl NewStaffUser {
    /// Minimal account with the three required fields
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            username: username.into().trim().to_string(),
            password: password.into(),
            role,
            mobile_number: None,
            email: None,
            dob: None,
        }
    }

    /// Check required fields before anything is sent
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the empty fields.
    pub fn check(&self) -> crate::Result<()> {
        Ok(self.validate()?)
    }
}

/// Body of `POST /api/agents` on the legacy agent endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct NewAgent {
    /// Full name
    #[validate(length(min = 1))]
    pub name: String,
    /// Login name
    #[validate(length(min = 1))]
    pub username: String,
    /// Initial password
    #[validate(length(min = 1))]
    pub password: String,
}

/// Partial account update
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    /// Full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Login name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New password; left out when unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Activation flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    /// Email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Date of birth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
}

impl StaffUpdate {
    /// Check the fields an edit must keep filled
    ///
    /// # Errors
    ///
    /// Returns a validation error when name or username is set to blank.
    pub fn check(&self) -> crate::Result<()> {
        for (field, value) in [("name", &self.name), ("username", &self.username)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(crate::Error::validation(field, "Please fill all required fields"));
            }
        }
        Ok(())
    }

    /// Non-empty fields as strings, for multipart submission
    #[must_use]
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let text = [
            ("name", &self.name),
            ("username", &self.username),
            ("password", &self.password),
            ("mobileNumber", &self.mobile_number),
            ("email", &self.email),
            ("dob", &self.dob),
        ];
        for (key, value) in text {
            if let Some(value) = value {
                fields.push((key, value.clone()));
            }
        }
        if let Some(active) = self.is_active {
            fields.push(("isActive", active.to_string()));
        }
        fields
    }
}

/// Geotag captured at punch-in or punch-out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

/// Punch locations of an attendance record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceLocation {
    /// Where the day started
    #[serde(default)]
    pub check_in_location: Option<LocatedPoint>,
    /// Where the day ended
    #[serde(default)]
    pub check_out_location: Option<LocatedPoint>,
}

/// Geotag with an optional street address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocatedPoint {
    /// Coordinates
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Reverse-geocoded address
    #[serde(default)]
    pub address: Option<String>,
}

impl LocatedPoint {
    /// Address, or the coordinates to four decimals
    #[must_use]
    pub fn describe(&self) -> String {
        self.address.clone().unwrap_or_else(|| {
            format!("{:.4}, {:.4}", self.point.latitude, self.point.longitude)
        })
    }
}

/// Account reference populated on attendance rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceUser {
    /// Account id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Name
    #[serde(default)]
    pub name: String,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Role
    #[serde(default)]
    pub role: Option<String>,
}

/// One day of attendance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Record id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Populated account, when the server expands it
    #[serde(default)]
    pub user_id: Option<AttendanceUser>,
    /// Display name
    #[serde(default, alias = "agentName")]
    pub user_name: String,
    /// Day
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Punch-in
    #[serde(default)]
    pub check_in: Option<DateTime<Utc>>,
    /// Punch-out
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    /// Worked minutes
    #[serde(default)]
    pub duration: u64,
    /// Status label such as `Present` or `Half Day`
    #[serde(default)]
    pub status: String,
    /// Remark
    #[serde(default)]
    pub remark: Option<String>,
    /// Punch locations
    #[serde(default)]
    pub location: Option<AttendanceLocation>,
}

impl AttendanceRecord {
    /// Worked time as `Hh Mm`, or `-` when nothing was logged
    #[must_use]
    pub fn duration_label(&self) -> String {
        format_minutes(self.duration)
    }
}

/// Render minutes as `Hh Mm`, `-` for zero
#[must_use]
pub fn format_minutes(minutes: u64) -> String {
    if minutes == 0 {
        return "-".to_string();
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Totals of the attendance overview
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceOverviewStats {
    /// Rows in range
    #[serde(default)]
    pub total_records: u64,
    /// Distinct accounts, reported as `uniqueUsers` or `uniqueAgents`
    #[serde(default, alias = "uniqueAgents")]
    pub unique_users: u64,
    /// Present days
    #[serde(default)]
    pub present_count: u64,
    /// Half days
    #[serde(default)]
    pub half_day_count: u64,
    /// Minutes logged
    #[serde(default)]
    pub total_duration: f64,
    /// Mean minutes per record
    #[serde(default)]
    pub average_duration: f64,
}

/// Totals of one account's attendance
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalAttendanceStats {
    /// Days in range
    #[serde(default)]
    pub total_days: u64,
    /// Present days
    #[serde(default)]
    pub present_days: u64,
    /// Half days
    #[serde(default)]
    pub half_days: u64,
    /// Hours logged
    #[serde(default)]
    pub total_hours: f64,
}

/// Attendance listing with its totals
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttendanceReport<S> {
    /// Rows
    #[serde(default = "Vec::new")]
    pub attendance: Vec<AttendanceRecord>,
    /// Totals; some deployments name this block `summary`
    #[serde(default, alias = "summary")]
    pub statistics: Option<S>,
}

/// Filter of the attendance endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceQuery {
    /// Restrict to one legacy agent
    pub agent_id: Option<EntityId>,
    /// Restrict to a role
    pub role: Option<Role>,
    /// Month, 1-12
    pub month: Option<u32>,
    /// Year
    pub year: Option<i32>,
    /// Status label
    pub status: Option<String>,
}

impl AttendanceQuery {
    /// Query for one calendar month
    #[must_use]
    pub fn month(year: i32, month: u32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
            ..Self::default()
        }
    }

    /// Query string pairs, skipping unset filters; `all` status is dropped
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(agent_id) = &self.agent_id {
            pairs.push(("agentId", agent_id.clone()));
        }
        if let Some(role) = self.role {
            pairs.push(("role", role.to_string()));
        }
        if let Some(month) = self.month {
            pairs.push(("month", month.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| *s != "all") {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_user_requires_fields() {
        let missing = NewStaffUser::new("", "ravi", "secret", Role::Agent);
        let err = missing.check().unwrap_err();
        assert!(matches!(err, crate::Error::Validation { ref field, .. } if field == "name"));
        assert_eq!(err.user_message(), "Please fill all required fields");

        let blank_password = NewStaffUser::new("Ravi", "ravi", "", Role::Agent);
        assert!(blank_password.check().is_err());

        assert!(NewStaffUser::new("Ravi", "ravi", "secret", Role::Employee).check().is_ok());
    }

    #[test]
    fn test_new_user_body_skips_optional_fields() {
        let body = serde_json::to_value(NewStaffUser::new(" Ravi ", "ravi", "pw", Role::Agent)).unwrap();
        assert_eq!(
            body,
            json!({"name": "Ravi", "username": "ravi", "password": "pw", "role": "agent"})
        );
    }

    #[test]
    fn test_update_form_fields() {
        let update = StaffUpdate {
            name: Some("Ravi K".to_string()),
            is_active: Some(false),
            ..StaffUpdate::default()
        };
        assert_eq!(
            update.to_form_fields(),
            vec![("name", "Ravi K".to_string()), ("isActive", "false".to_string())]
        );

        let blank = StaffUpdate {
            username: Some("  ".to_string()),
            ..StaffUpdate::default()
        };
        assert!(blank.check().is_err());
    }

    #[test]
    fn test_overview_accepts_summary_and_agent_alias() {
        let report: AttendanceReport<AttendanceOverviewStats> = serde_json::from_value(json!({
            "success": true,
            "attendance": [{
                "_id": "a1",
                "userName": "Ravi",
                "date": "2025-03-04T00:00:00.000Z",
                "checkIn": "2025-03-04T09:01:00.000Z",
                "checkOut": null,
                "duration": 275,
                "status": "Present",
                "location": {"checkInLocation": {"latitude": 12.97161, "longitude": 77.59461}}
            }],
            "summary": {"totalRecords": 1, "uniqueAgents": 1, "presentCount": 1}
        }))
        .unwrap();

        let stats = report.statistics.unwrap();
        assert_eq!(stats.unique_users, 1);
        let record = &report.attendance[0];
        assert_eq!(record.duration_label(), "4h 35m");
        assert!(record.check_out.is_none());
        let located = record
            .location
            .as_ref()
            .and_then(|l| l.check_in_location.as_ref())
            .unwrap();
        assert_eq!(located.describe(), "12.9716, 77.5946");
    }

    #[test]
    fn test_attendance_query_pairs() {
        let mut query = AttendanceQuery::month(2025, 3);
        query.role = Some(Role::Agent);
        query.status = Some("all".to_string());
        assert_eq!(
            query.to_pairs(),
            vec![
                ("role", "agent".to_string()),
                ("month", "3".to_string()),
                ("year", "2025".to_string()),
            ]
        );
        assert_eq!(format_minutes(0), "-");
    }
}
