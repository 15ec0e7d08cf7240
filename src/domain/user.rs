//! User and authentication input models.

use serde::{Deserialize, Serialize};

/// The authenticated user as returned by `GET /profile`.
///
/// `email` is the identity key; favorites are stored under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub surname: String,
    /// Movie ids the service tracks for this user, when it sends them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<i64>>,
}

impl User {
    /// Creates a user without server-side favorites.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            surname: surname.into(),
            favorites: None,
        }
    }

    /// Uppercased initials of name and surname, or `"U"` if either is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinemaguide::User;
    ///
    /// assert_eq!(User::new("a@b.c", "anna", "petrova").initials(), "AP");
    /// assert_eq!(User::new("a@b.c", "", "petrova").initials(), "U");
    /// ```
    #[must_use]
    pub fn initials(&self) -> String {
        match (self.name.chars().next(), self.surname.chars().next()) {
            (Some(n), Some(s)) => n.to_uppercase().chain(s.to_uppercase()).collect(),
            _ => "U".to_string(),
        }
    }
}

/// Email and password submitted by the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Fields submitted by the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    /// Password confirmation; must equal `password`.
    pub repeat_password: String,
    pub name: String,
    pub surname: String,
}

impl Registration {
    /// Returns `true` when the password and its confirmation match.
    #[must_use]
    pub fn passwords_match(&self) -> bool {
        self.password == self.repeat_password
    }
}
