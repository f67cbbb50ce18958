// src/authz.rs
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;

/// Emails always treated as administrators regardless of metadata.
const ADMIN_EMAILS: &[&str] = &["admin@pollboard.app", "ops@pollboard.app"];

/// Admin classification, in one place so every action agrees on it.
///
/// A caller is an admin when their email is on the allow-list, when their
/// email contains "admin" anywhere, or when their role metadata says
/// "admin". The substring arm matches addresses like `qa-admin@corp.com`;
/// see DESIGN.md before changing it.
pub fn is_admin(user: &AuthUser) -> bool {
    ADMIN_EMAILS.contains(&user.email.as_str())
        || user.email.contains("admin")
        || user.metadata.role.as_deref() == Some("admin")
}

/// Ownership is an exact id match, no case folding.
pub fn is_owner(user: &AuthUser, owner_id: Uuid) -> bool {
    user.id == owner_id
}

/// Deletion is open to the owner and to admins; everyone else is refused.
pub fn ensure_can_delete(user: &AuthUser, owner_id: Uuid) -> Result<(), AppError> {
    if is_owner(user, owner_id) || is_admin(user) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to delete this poll".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserMetadata;

    fn user(email: &str, role: Option<&str>) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            metadata: UserMetadata {
                name: None,
                role: role.map(str::to_string),
            },
        }
    }

    #[test]
    fn allow_list_emails_are_admins() {
        assert!(is_admin(&user("admin@pollboard.app", None)));
        assert!(is_admin(&user("ops@pollboard.app", None)));
    }

    #[test]
    fn admin_substring_matches() {
        // Not on the allow-list, still classified admin by the substring rule.
        assert!(is_admin(&user("qa-admin@corp.com", None)));
    }

    #[test]
    fn role_metadata_grants_admin() {
        assert!(is_admin(&user("plain@example.com", Some("admin"))));
        assert!(!is_admin(&user("plain@example.com", Some("editor"))));
    }

    #[test]
    fn ordinary_users_are_not_admins() {
        assert!(!is_admin(&user("voter@example.com", None)));
    }

    #[test]
    fn ownership_is_exact_id_match() {
        let owner = user("voter@example.com", None);
        assert!(is_owner(&owner, owner.id));
        assert!(!is_owner(&owner, Uuid::new_v4()));
    }

    #[test]
    fn owner_can_delete() {
        let owner = user("voter@example.com", None);
        assert!(ensure_can_delete(&owner, owner.id).is_ok());
    }

    #[test]
    fn admin_can_delete_any_poll() {
        let admin = user("admin@pollboard.app", None);
        assert!(ensure_can_delete(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn others_are_forbidden() {
        let stranger = user("voter@example.com", None);
        let err = ensure_can_delete(&stranger, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
