use serde::Deserialize;
use sqlx::FromRow;

/// Represents a user row.
///
/// Users are never hard-deleted: account deactivation flips `is_valid` to
/// false and the row (and all the user's tasks) stays in place.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Fixed-secret SHA-256 digest of the password, never the plaintext.
    pub password: Vec<u8>,
    pub is_valid: bool,
}

/// Registration form payload. Missing fields deserialize as empty strings,
/// matching how an HTML form posts them.
#[derive(Debug, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl NewUserForm {
    /// Validates the form, stopping at the first failing rule and returning
    /// its message. Rule order matters and is part of the contract.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.is_empty() {
            return Err("Username is not provided");
        }
        if self.password.is_empty() {
            return Err("Password is not provided");
        }
        if self.password != self.password_confirm {
            return Err("Password and password confirmation are not same");
        }
        if self.password.len() < 8 {
            return Err("Password is too short");
        }
        if self.password.chars().all(|c| c.is_ascii_digit()) {
            return Err("Password consists of only numbers");
        }
        Ok(())
    }
}

/// Login form payload.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Profile-edit form payload: the current password authorizes the change.
#[derive(Debug, Deserialize)]
pub struct EditUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_new: String,
}

impl EditUserForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.is_empty() {
            return Err("Username is not provided");
        }
        if self.password.is_empty() {
            return Err("Password is not provided");
        }
        if self.password_new.is_empty() {
            return Err("New password is not provided");
        }
        if self.password_new.len() < 8 {
            return Err("Password is too short");
        }
        Ok(())
    }
}

/// Account-deactivation form payload.
#[derive(Debug, Deserialize)]
pub struct DeleteUserForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl DeleteUserForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.password.is_empty() {
            return Err("Password is not provided");
        }
        if self.password != self.password_confirm {
            return Err("Password and password confirmation are not same");
        }
        Ok(())
    }
}
