use chrono::{DateTime, Utc};

/// Subscription tiers stored as their canonical key ("free" / "paid").
pub const TIER_FREE: &str = "free";
pub const TIER_PAID: &str = "paid";

/// An account as it lives in the `user` table. The core only ever reads
/// users; authentication and billing own the mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Canonical tier key, resolved from either wire representation at
    /// the ingest boundary.
    pub tier: String,
    pub email_verified: bool,
    /// Weekly digest opt-in
    pub email_notifications: bool,
    pub account_created: DateTime<Utc>,
}

impl User {
    /// Name used in digest greetings; falls back to the mailbox part of
    /// the email address when no first name is on record.
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            self.email.split('@').next().unwrap_or(&self.email)
        } else {
            &self.first_name
        }
    }

    pub fn is_paid(&self) -> bool {
        self.tier == TIER_PAID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(first_name: &str, email: &str) -> User {
        User {
            id: 7,
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: String::new(),
            tier: TIER_FREE.to_string(),
            email_verified: true,
            email_notifications: true,
            account_created: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_display_name_prefers_first_name() {
        assert_eq!(user("Ada", "ada@example.org").display_name(), "Ada");
    }

    #[test]
    fn test_display_name_falls_back_to_mailbox() {
        assert_eq!(user("", "ada@example.org").display_name(), "ada");
    }
}
