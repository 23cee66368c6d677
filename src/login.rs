//! Cosmetic login gate in front of the dashboard.
//!
//! Nothing is verified: any submit with both fields filled grants access.
//! This is a placeholder and must not be treated as authentication.

/// Form fields and the resulting access flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginGate {
    pub username: String,
    pub password: String,
    logged_in: bool,
}

impl LoginGate {
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Grant access when both fields are non-empty. Returns the access flag.
    pub fn submit(&mut self) -> bool {
        if self.username.is_empty() || self.password.is_empty() {
            return self.logged_in;
        }
        tracing::info!("Dashboard unlocked for {}", self.username);
        self.password.clear();
        self.logged_in = true;
        true
    }
}
