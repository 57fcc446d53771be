use serde::{Deserialize, Serialize};
use shared::{Family, User, UserRole};

/// Client-side session cache: auth token, current user and family.
///
/// Serializable so the host can mirror it into browser storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub current_user: Option<User>,
    pub family: Option<Family>,
}

impl Session {
    pub fn new(token: impl Into<String>, current_user: User) -> Self {
        Self {
            token: Some(token.into()),
            current_user: Some(current_user),
            family: None,
        }
    }

    /// A session is usable when both a non-blank token and the user are known
    pub fn is_authenticated(&self) -> bool {
        let has_token = self.token.as_deref().is_some_and(|t| !t.trim().is_empty());
        has_token && self.current_user.is_some()
    }

    pub fn is_parent(&self) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.role == UserRole::Parent)
    }

    /// Bearer header value for authenticated requests
    pub fn authorization_header(&self) -> Option<String> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("Bearer {}", t))
    }

    /// Forget everything after the backend reported the session as expired
    pub fn invalidate(&mut self) {
        self.token = None;
        self.current_user = None;
        self.family = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_parent;

    #[test]
    fn test_authentication_requires_token_and_user() {
        assert!(!Session::default().is_authenticated());

        let session = Session::new("token-123", sample_parent());
        assert!(session.is_authenticated());
        assert!(session.is_parent());
        assert_eq!(session.authorization_header().as_deref(), Some("Bearer token-123"));

        let blank = Session::new("   ", sample_parent());
        assert!(!blank.is_authenticated());
        assert_eq!(blank.authorization_header(), None);

        let no_user = Session {
            token: Some("token-123".to_string()),
            ..Session::default()
        };
        assert!(!no_user.is_authenticated());
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let mut session = Session::new("token-123", sample_parent());
        session.family = Some(Family {
            id: "f1".to_string(),
            name: "Ivanovs".to_string(),
        });

        session.invalidate();

        assert_eq!(session, Session::default());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_session_json_round_trip_for_storage() {
        let session = Session::new("token-123", sample_parent());
        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
