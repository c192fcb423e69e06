use serde::{Deserialize, Serialize};

/// An account in the floor-plan tool. The email doubles as the identifier
/// every other record is scoped by; the password is stored as-is (there is
/// deliberately no hashing or session handling in this service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub password: String,
}

/// Input model for register and login requests; presence is checked at the
/// boundary so a missing field becomes a 400 instead of a deserialize error.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Both fields, provided and non-empty, or None.
    pub fn into_parts(self) -> Option<(String, String)> {
        let email = self.email.filter(|e| !e.is_empty())?;
        let password = self.password.filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}
