use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserId;

/// The part a user plays in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Rider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Rider => "rider",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub location: Option<String>,
    pub verified: bool,
}

/// Payload for registering a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub location: Option<String>,
}

/// Payload for updating an existing user. Role and email are fixed at registration.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub verified: Option<bool>,
}

impl UserCreate {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            role,
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Checks the registration rules: name and phone required, email must look like one.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("Invalid email: {}", self.email));
        }
        if self.phone.trim().is_empty() {
            return Err("Phone number is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_registration_fields() {
        let ok = UserCreate::new("Alice", "alice@example.com", "0801", Role::Buyer);
        assert!(ok.validate().is_ok());

        let no_name = UserCreate::new(" ", "alice@example.com", "0801", Role::Buyer);
        assert_eq!(no_name.validate(), Err("Name is required".to_string()));

        let bad_email = UserCreate::new("Alice", "alice.example.com", "0801", Role::Buyer);
        assert!(bad_email.validate().unwrap_err().contains("Invalid email"));

        let no_phone = UserCreate::new("Alice", "alice@example.com", "", Role::Rider);
        assert_eq!(no_phone.validate(), Err("Phone number is required".to_string()));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Rider).unwrap(), "\"rider\"");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
