use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Instructor,
    #[default]
    Learner,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str, email: &str, full_name: &str, role: UserRole) -> Self {
        User {
            id: None,
            username: username.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            role,
            created_at: Some(Utc::now()),
        }
    }

    /// Claim subject: ObjectId hex when persisted, username otherwise.
    pub fn subject(&self) -> String {
        self.id
            .as_ref()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| self.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("johndoe", "john@example.com", "John Doe", UserRole::Learner);

        assert_eq!(user.username, "johndoe");
        assert_eq!(user.email, "john@example.com");
        assert_eq!(user.role, UserRole::Learner);
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_subject_falls_back_to_username() {
        let user = User::new("johndoe", "john@example.com", "John Doe", UserRole::Learner);
        assert_eq!(user.subject(), "johndoe");

        let mut persisted = user.clone();
        let oid = ObjectId::new();
        persisted.id = Some(oid);
        assert_eq!(persisted.subject(), oid.to_hex());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Instructor).unwrap(),
            "\"instructor\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"learner\"").unwrap(),
            UserRole::Learner
        );
    }
}
