use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform role, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Attendee = 0,
    Organizer = 1,
    Admin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Attendee => "attendee",
            Organizer => "organizer",
            Admin => "admin",
        }
    }

    /// Whether this role carries at least the privileges of `required`.
    #[inline]
    pub const fn can_act_as(&self, required: UserRole) -> bool {
        self.id() >= required.id()
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(Attendee),
            1 => Some(Organizer),
            2 => Some(Admin),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "attendee" => Some(Attendee),
            "organizer" => Some(Organizer),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), Some(UserRole::Attendee));
        assert_eq!(UserRole::from_id(1), Some(UserRole::Organizer));
        assert_eq!(UserRole::from_id(2), Some(UserRole::Admin));
        assert_eq!(UserRole::from_id(7), None);
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("attendee"), Some(UserRole::Attendee));
        assert_eq!(UserRole::from_code("organizer"), Some(UserRole::Organizer));
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("root"), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Attendee.to_string(), "attendee");
        assert_eq!(UserRole::Organizer.to_string(), "organizer");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_privilege_ordering() {
        assert!(UserRole::Admin.can_act_as(UserRole::Attendee));
        assert!(UserRole::Admin.can_act_as(UserRole::Organizer));
        assert!(UserRole::Organizer.can_act_as(UserRole::Attendee));
        assert!(!UserRole::Attendee.can_act_as(UserRole::Organizer));
        assert!(!UserRole::Organizer.can_act_as(UserRole::Admin));
        assert!(UserRole::Attendee.can_act_as(UserRole::Attendee));
    }

    #[test]
    fn test_default_is_attendee() {
        assert_eq!(UserRole::default(), UserRole::Attendee);
        assert!(!UserRole::default().is_admin());
    }
}
