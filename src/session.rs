//! Signed-in user context, passed explicitly to whatever needs it.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::EntityKind;
use crate::errors::{PanelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Professional,
    Receptionist,
}

impl Role {
    /// Entity views this role may create and edit records in.
    pub fn managed_views(self) -> &'static [EntityKind] {
        match self {
            Role::Admin => &[
                EntityKind::Users,
                EntityKind::Patients,
                EntityKind::Professionals,
                EntityKind::Appointments,
                EntityKind::MedicalHistory,
            ],
            Role::Professional => &[
                EntityKind::Patients,
                EntityKind::Appointments,
                EntityKind::MedicalHistory,
            ],
            Role::Receptionist => &[EntityKind::Patients, EntityKind::Appointments],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::Professional => "professional",
            Role::Receptionist => "receptionist",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Role, user_id: Uuid) -> Self {
        Self {
            token: token.into(),
            role,
            user_id,
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |expires_at| now >= expires_at)
    }

    /// Time left before the token expires, floored at zero. `None` when the
    /// token carries no expiry.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|expires_at| (expires_at - now).max(Duration::zero()))
    }

    pub fn can_manage(&self, kind: EntityKind) -> bool {
        self.role.managed_views().contains(&kind)
    }

    /// Fails when the session can no longer be used for `kind`.
    pub fn authorize(&self, kind: EntityKind, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired(now) {
            return Err(PanelError::SessionExpired);
        }
        if !self.can_manage(kind) {
            return Err(PanelError::Unauthorized(self.role.to_string()));
        }
        Ok(())
    }

    pub fn authorization_header(&self) -> (String, String) {
        ("Authorization".to_string(), format!("Bearer {}", self.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn countdown_floors_at_zero() {
        let session = Session::new("tok", Role::Admin, Uuid::new_v4()).expiring_at(at(10, 30));
        assert_eq!(session.remaining(at(10, 0)), Some(Duration::minutes(30)));
        assert_eq!(session.remaining(at(11, 0)), Some(Duration::zero()));
        assert!(!session.is_expired(at(10, 29)));
        assert!(session.is_expired(at(10, 30)));
    }

    #[test]
    fn sessions_without_expiry_never_expire() {
        let session = Session::new("tok", Role::Receptionist, Uuid::new_v4());
        assert_eq!(session.remaining(at(0, 0)), None);
        assert!(!session.is_expired(at(23, 59)));
    }

    #[test]
    fn roles_gate_views() {
        let session = Session::new("tok", Role::Receptionist, Uuid::new_v4());
        assert!(session.authorize(EntityKind::Appointments, at(9, 0)).is_ok());
        assert!(matches!(
            session.authorize(EntityKind::Users, at(9, 0)),
            Err(PanelError::Unauthorized(role)) if role == "receptionist"
        ));

        let expired =
            Session::new("tok", Role::Admin, Uuid::new_v4()).expiring_at(at(8, 0));
        assert!(matches!(
            expired.authorize(EntityKind::Users, at(9, 0)),
            Err(PanelError::SessionExpired)
        ));
    }

    #[test]
    fn bearer_header_uses_token() {
        let session = Session::new("abc123", Role::Admin, Uuid::new_v4());
        assert_eq!(
            session.authorization_header(),
            ("Authorization".to_string(), "Bearer abc123".to_string())
        );
    }
}
