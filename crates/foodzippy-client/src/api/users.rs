//! Agent and employee accounts, plus the legacy agent endpoints

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use foodzippy_core::staff::{NewAgent, NewStaffUser, StaffUpdate, StaffUser};
use foodzippy_core::types::{Ack, Role};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use validator::Validate;

const USERS: &str = "/api/admin/users";
const AGENTS: &str = "/api/agents";

#[derive(Deserialize)]
struct UserList {
    #[serde(default, alias = "agents")]
    users: Vec<StaffUser>,
}

#[derive(Deserialize)]
struct UserPayload {
    #[serde(default, alias = "agent")]
    user: Option<StaffUser>,
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

impl ApiClient {
    /// List accounts, optionally of one role
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_users(&self, role: Option<Role>) -> ClientResult<Vec<StaffUser>> {
        let query: Vec<_> = role.map(|r| ("role", r.to_string())).into_iter().collect();
        let list: UserList = self.get_with_query(USERS, &query).await?;
        Ok(list.users)
    }

    /// Fetch one account
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the account is missing.
    pub async fn get_user(&self, id: &str) -> ClientResult<StaffUser> {
        let payload: UserPayload = self.get(&format!("{USERS}/{}", segment(id))).await?;
        required(payload.user, "user")
    }

    /// Create an agent or employee; required fields are checked first
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server when name,
    /// username or password is empty.
    pub async fn create_user(&self, user: &NewStaffUser) -> ClientResult<StaffUser> {
        user.check()?;
        let payload: UserPayload = self.post(USERS, user).await?;
        let created = required(payload.user, "user")?;
        info!(user_id = %created.id, role = %user.role, "Account created");
        Ok(created)
    }

    /// Update an account, as multipart when a profile image is attached
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank name or username, an I/O error
    /// if the image cannot be read, or the server's error.
    pub async fn update_user(
        &self,
        id: &str,
        update: &StaffUpdate,
        profile_image: Option<&Path>,
    ) -> ClientResult<StaffUser> {
        update.check()?;
        let path = format!("{USERS}/{}", segment(id));

        let payload: UserPayload = match profile_image {
            Some(image) => {
                let bytes = tokio::fs::read(image).await?;
                let file_name = image
                    .file_name()
                    .map_or_else(|| "profile.jpg".to_string(), |n| n.to_string_lossy().into_owned());
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(image_mime(image))
                    .map_err(ClientError::Http)?;
                let form = update
                    .to_form_fields()
                    .into_iter()
                    .fold(Form::new().part("profileImage", part), |form, (key, value)| {
                        form.text(key, value)
                    });
                self.put_multipart(&path, form).await?
            }
            None => self.put(&path, update).await?,
        };
        required(payload.user, "user")
    }

    /// Flip an account's `isActive` flag
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn set_user_active(&self, id: &str, active: bool) -> ClientResult<StaffUser> {
        let update = StaffUpdate {
            is_active: Some(active),
            ..StaffUpdate::default()
        };
        self.update_user(id, &update, None).await
    }

    /// Delete an account
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_user(&self, id: &str) -> ClientResult<Ack> {
        let ack = self.delete(&format!("{USERS}/{}", segment(id))).await?;
        info!(user_id = id, "Account deleted");
        Ok(ack)
    }

    /// List agents on the legacy endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_agents(&self) -> ClientResult<Vec<StaffUser>> {
        let list: UserList = self.get(AGENTS).await?;
        Ok(list.users)
    }

    /// Fetch an agent on the legacy endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the agent is missing.
    pub async fn get_agent(&self, id: &str) -> ClientResult<StaffUser> {
        let payload: UserPayload = self.get(&format!("{AGENTS}/{}", segment(id))).await?;
        required(payload.user, "agent")
    }

    /// Create an agent on the legacy endpoint
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server when a
    /// required field is empty.
    pub async fn create_agent(&self, agent: &NewAgent) -> ClientResult<StaffUser> {
        agent.validate().map_err(foodzippy_core::Error::from)?;
        let payload: UserPayload = self.post(AGENTS, agent).await?;
        required(payload.user, "agent")
    }

    /// Update an agent on the legacy endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_agent(&self, id: &str, update: &StaffUpdate) -> ClientResult<StaffUser> {
        update.check()?;
        let payload: UserPayload = self
            .put(&format!("{AGENTS}/{}", segment(id)), update)
            .await?;
        required(payload.user, "agent")
    }

    /// Delete an agent on the legacy endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_agent(&self, id: &str) -> ClientResult<Ack> {
        self.delete(&format!("{AGENTS}/{}", segment(id))).await
    }
}
