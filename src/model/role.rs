use strum_macros::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Roles allowed to resolve leave requests.
    pub fn can_review_leave(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids_only() {
        assert_eq!(Role::from_id(1), Some(Role::Admin));
        assert_eq!(Role::from_id(2), Some(Role::Hr));
        assert_eq!(Role::from_id(3), Some(Role::Employee));
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(9), None);
    }

    #[test]
    fn only_hr_and_admin_review_leave() {
        assert!(Role::Admin.can_review_leave());
        assert!(Role::Hr.can_review_leave());
        assert!(!Role::Employee.can_review_leave());
        assert_eq!(Role::Hr.to_string(), "hr");
    }
}
