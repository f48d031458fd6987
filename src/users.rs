//! User mutation, the one write surface in the extension.
//!
//! Updates send a sparse patch: only the fields whose value differs from
//! the currently displayed user record go on the wire, and if nothing
//! differs no request is sent at all. Creation has a specialized error
//! parser that pulls the duplicate-email case out of the Zendesk error
//! schema for a friendlier message.

use serde_json::{json, Map, Value};
use tracing::info;

use crate::client::ZendeskClient;
use crate::error::{Result, ZendeskError};
use crate::models::User;

/// Editable field set for the user form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
    pub details: Option<String>,
    pub tags: Vec<String>,
}

impl UserDraft {
    /// Seed the form from the record being displayed.
    pub fn from_user(user: &User) -> Self {
        UserDraft {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role.clone(),
            notes: user.notes.clone(),
            details: user.details.clone(),
            tags: user.tags.clone(),
        }
    }

    /// Sparse changed-fields patch against the displayed record. `None`
    /// means nothing differs and no request should be sent.
    pub fn diff(&self, current: &User) -> Option<Value> {
        let mut changed = Map::new();

        if self.name != current.name {
            changed.insert("name".into(), json!(self.name));
        }
        if self.email != current.email {
            changed.insert("email".into(), json!(self.email));
        }
        if self.phone != current.phone {
            changed.insert("phone".into(), json!(self.phone));
        }
        if self.role != current.role {
            changed.insert("role".into(), json!(self.role));
        }
        if self.notes != current.notes {
            changed.insert("notes".into(), json!(self.notes));
        }
        if self.details != current.details {
            changed.insert("details".into(), json!(self.details));
        }
        if self.tags != current.tags {
            changed.insert("tags".into(), json!(self.tags));
        }

        if changed.is_empty() {
            None
        } else {
            Some(Value::Object(changed))
        }
    }

    /// Full payload for user creation.
    fn create_body(&self) -> Value {
        let mut user = Map::new();
        user.insert("name".into(), json!(self.name));
        if let Some(email) = &self.email {
            user.insert("email".into(), json!(email));
        }
        if let Some(phone) = &self.phone {
            user.insert("phone".into(), json!(phone));
        }
        if let Some(role) = &self.role {
            user.insert("role".into(), json!(role));
        }
        if let Some(notes) = &self.notes {
            user.insert("notes".into(), json!(notes));
        }
        if let Some(details) = &self.details {
            user.insert("details".into(), json!(details));
        }
        if !self.tags.is_empty() {
            user.insert("tags".into(), json!(self.tags));
        }
        json!({ "user": Value::Object(user) })
    }
}

/// `PUT /users/{id}.json` with a sparse patch from [`UserDraft::diff`].
/// Returns `Ok(None)` without issuing a request when the patch is empty.
pub fn update_user(
    client: &ZendeskClient,
    current: &User,
    draft: &UserDraft,
) -> Result<Option<User>> {
    let Some(patch) = draft.diff(current) else {
        info!(user_id = current.id, "No user fields changed, skipping update");
        return Ok(None);
    };

    info!(
        user_id = current.id,
        fields = patch.as_object().map(|o| o.len()).unwrap_or(0),
        "Updating user"
    );
    let value = client.put(
        &format!("/users/{}.json", current.id),
        &json!({ "user": patch }),
    )?;
    Ok(Some(parse_user(&value)?))
}

/// `POST /users.json`.
pub fn create_user(client: &ZendeskClient, draft: &UserDraft) -> Result<User> {
    info!(name = %draft.name, "Creating user");
    let value = client.post("/users.json", &draft.create_body())?;
    parse_user(&value)
}

fn parse_user(value: &Value) -> Result<User> {
    match value.get("user") {
        Some(user) => Ok(serde_json::from_value(user.clone())?),
        None => Err(ZendeskError::Config(
            "user payload missing from response".to_string(),
        )),
    }
}

/// Friendly message for a failed user creation.
///
/// Zendesk reports validation failures as
/// `{"details": {"email": [{"error": "DuplicateValue", ...}]}}`; that one
/// case gets a specific message, everything else the generic template.
pub fn create_error_message(draft: &UserDraft, err: &ZendeskError) -> String {
    if let ZendeskError::Api { body, .. } = err {
        if is_duplicate_email(body) {
            let email = draft.email.as_deref().unwrap_or("that address");
            return format!("A user with email {} already exists.", email);
        }
    }
    format!("Could not create user {}: {}", draft.name, err.user_message())
}

fn is_duplicate_email(body: &str) -> bool {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    parsed
        .get("details")
        .and_then(|d| d.get("email"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries.iter().any(|entry| {
                entry.get("error").and_then(Value::as_str) == Some("DuplicateValue")
            })
        })
        .unwrap_or(false)
}
