use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserId, UserPatch};

impl Entity for User {
    const KIND: &'static str = "user";

    type Id = UserId;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    /// Registers a user after checking the registration rules.
    ///
    /// New users start unverified.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, String> {
        params.validate()?;
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            role: params.role,
            location: params.location,
            verified: false,
        })
    }

    /// Updates the user's profile information.
    ///
    /// # Fields Updated
    /// - `name`: must stay non-empty
    /// - `phone`: must stay non-empty
    /// - `location`
    /// - `verified`: set by an admin after identity checks
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err("Name is required".to_string());
            }
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            if phone.trim().is_empty() {
                return Err("Phone number is required".to_string());
            }
            self.phone = phone;
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(verified) = patch.verified {
            self.verified = verified;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn alice() -> User {
        User::from_create_params(
            UserId::new("user_1"),
            UserCreate::new("Alice", "alice@example.com", "08012345678", Role::Buyer)
                .with_location("Lagos"),
        )
        .unwrap()
    }

    #[test]
    fn registration_starts_unverified() {
        let user = alice();
        assert!(!user.verified);
        assert_eq!(user.location.as_deref(), Some("Lagos"));
    }

    #[test]
    fn registration_rejects_bad_email() {
        let result = User::from_create_params(
            UserId::new("user_2"),
            UserCreate::new("Bob", "bob", "0801", Role::Seller),
        );
        assert!(result.is_err());
    }

    #[test]
    fn patch_rejects_blank_name() {
        let mut user = alice();
        let patch = UserPatch { name: Some(" ".into()), ..UserPatch::default() };
        assert!(user.on_update(patch).is_err());
        assert_eq!(user.name, "Alice");

        let patch = UserPatch { verified: Some(true), ..UserPatch::default() };
        user.on_update(patch).unwrap();
        assert!(user.verified);
    }
}
