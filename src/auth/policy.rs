//! Authorization policy for directory actions.
//!
//! One pure function decides every allow/deny, with no HTTP types in
//! sight. Handlers call [`authorize`] after loading the subject and
//! strictly before mutating anything.
//!
//! Two properties shape the rules:
//! - The configured superadmin account is immune to view-by-email, role
//!   changes, and deletion, no matter who asks. That immunity is checked
//!   before role requirements, so targeting the superadmin always reads
//!   as `SuperAdminProtected`, never as a plain role failure.
//! - Roles are not a pure hierarchy: an admin may delete themself but not
//!   a fellow admin, while the superadmin may delete any admin.

use crate::errors::{Error, Result};
use crate::store::{Employee, Role};

use super::principal::Principal;

/// An action an actor wants to perform, with the subject where one exists.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    /// Look up any employee's record by email.
    ViewByEmail { email: &'a str },
    /// Update the actor's own profile.
    UpdateSelf,
    /// Delete the actor's own account.
    DeleteSelf,
    /// Delete the subject's account.
    DeleteById { subject: &'a Employee },
    /// Set the subject's role to ADMIN.
    Promote { subject: &'a Employee },
    /// Set the subject's role to USER.
    Demote { subject: &'a Employee },
}

/// Decide whether `actor` may perform `action`.
///
/// `superadmin_email` identifies the protected account. Returns the exact
/// denial clients see; callers surface it unchanged.
pub fn authorize(actor: &Principal, action: Action<'_>, superadmin_email: &str) -> Result<()> {
    match action {
        Action::ViewByEmail { email } => {
            if email == superadmin_email {
                return Err(Error::SuperAdminProtected {
                    message: "You are not authorized to access this information.".to_string(),
                });
            }
            Ok(())
        }

        Action::UpdateSelf => {
            if actor.email == superadmin_email {
                return Err(Error::SuperAdminProtected {
                    message: "Cannot update Super Admin account".to_string(),
                });
            }
            Ok(())
        }

        Action::DeleteSelf => {
            if actor.email == superadmin_email {
                return Err(Error::SuperAdminProtected {
                    message: "Cannot delete Super Admin account".to_string(),
                });
            }
            Ok(())
        }

        Action::DeleteById { subject } => {
            protect_superadmin_subject(subject, superadmin_email)?;
            require_role(actor, &[Role::Admin, Role::SuperAdmin])?;

            // An admin may delete themself but not another admin
            if subject.role == Role::Admin && actor.role != Role::SuperAdmin && actor.id != subject.id {
                return Err(Error::Unauthorized {
                    message: "You do not have permission to delete this employee.".to_string(),
                });
            }
            Ok(())
        }

        Action::Promote { subject } => {
            protect_superadmin_subject(subject, superadmin_email)?;
            require_role(actor, &[Role::Admin, Role::SuperAdmin])?;
            Ok(())
        }

        Action::Demote { subject } => {
            protect_superadmin_subject(subject, superadmin_email)?;
            require_role(actor, &[Role::SuperAdmin])?;
            Ok(())
        }
    }
}

fn protect_superadmin_subject(subject: &Employee, superadmin_email: &str) -> Result<()> {
    if subject.email == superadmin_email {
        return Err(Error::SuperAdminProtected {
            message: "Cannot complete this action.".to_string(),
        });
    }
    Ok(())
}

fn require_role(actor: &Principal, allowed: &[Role]) -> Result<()> {
    if !allowed.contains(&actor.role) {
        return Err(Error::unauthorized());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SUPERADMIN_EMAIL: &str = "superadmin@seriouscompany.com";

    fn principal(id: i64, email: &str, role: Role) -> Principal {
        Principal {
            id,
            email: email.to_string(),
            role,
        }
    }

    fn employee(id: i64, email: &str, role: Role) -> Employee {
        Employee {
            id,
            name: format!("Employee {id}"),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn superadmin_subject() -> Employee {
        employee(1, SUPERADMIN_EMAIL, Role::SuperAdmin)
    }

    #[test]
    fn test_users_cannot_delete_promote_or_demote_anyone() {
        let user = principal(5, "user@example.com", Role::User);
        let subject = employee(6, "target@example.com", Role::User);

        for action in [
            Action::DeleteById { subject: &subject },
            Action::Promote { subject: &subject },
            Action::Demote { subject: &subject },
        ] {
            let err = authorize(&user, action, SUPERADMIN_EMAIL).unwrap_err();
            assert!(matches!(err, Error::Unauthorized { .. }), "expected Unauthorized for {action:?}");
        }
    }

    #[test]
    fn test_admins_can_promote_but_not_demote() {
        let admin = principal(2, "admin@example.com", Role::Admin);
        let subject = employee(6, "target@example.com", Role::User);

        assert!(authorize(&admin, Action::Promote { subject: &subject }, SUPERADMIN_EMAIL).is_ok());

        let err = authorize(&admin, Action::Demote { subject: &subject }, SUPERADMIN_EMAIL).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn test_superadmin_can_demote_an_admin() {
        let superadmin = principal(1, SUPERADMIN_EMAIL, Role::SuperAdmin);
        let subject = employee(3, "admin@example.com", Role::Admin);

        assert!(authorize(&superadmin, Action::Demote { subject: &subject }, SUPERADMIN_EMAIL).is_ok());
    }

    #[test]
    fn test_superadmin_subject_is_protected_from_every_actor() {
        let subject = superadmin_subject();
        let actors = [
            principal(5, "user@example.com", Role::User),
            principal(2, "admin@example.com", Role::Admin),
            principal(1, SUPERADMIN_EMAIL, Role::SuperAdmin),
        ];

        for actor in &actors {
            for action in [
                Action::DeleteById { subject: &subject },
                Action::Promote { subject: &subject },
                Action::Demote { subject: &subject },
            ] {
                let err = authorize(actor, action, SUPERADMIN_EMAIL).unwrap_err();
                assert!(
                    matches!(err, Error::SuperAdminProtected { .. }),
                    "expected SuperAdminProtected for {} doing {action:?}",
                    actor.email
                );
            }
        }
    }

    #[test]
    fn test_protection_is_checked_before_the_role_requirement() {
        // Even an actor who would fail the role check gets the protection
        // denial when targeting the superadmin.
        let user = principal(5, "user@example.com", Role::User);
        let subject = superadmin_subject();

        let err = authorize(&user, Action::Demote { subject: &subject }, SUPERADMIN_EMAIL).unwrap_err();
        assert!(matches!(err, Error::SuperAdminProtected { .. }));
    }

    #[test]
    fn test_admin_may_delete_themself_but_not_a_peer() {
        let admin = principal(2, "admin2@example.com", Role::Admin);
        let peer = employee(3, "admin3@example.com", Role::Admin);
        let self_subject = employee(2, "admin2@example.com", Role::Admin);

        let err = authorize(&admin, Action::DeleteById { subject: &peer }, SUPERADMIN_EMAIL).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert_eq!(err.user_message(), "You do not have permission to delete this employee.");

        assert!(authorize(&admin, Action::DeleteById { subject: &self_subject }, SUPERADMIN_EMAIL).is_ok());
    }

    #[test]
    fn test_superadmin_may_delete_an_admin() {
        let superadmin = principal(1, SUPERADMIN_EMAIL, Role::SuperAdmin);
        let subject = employee(3, "admin3@example.com", Role::Admin);

        assert!(authorize(&superadmin, Action::DeleteById { subject: &subject }, SUPERADMIN_EMAIL).is_ok());
    }

    #[test]
    fn test_admin_may_delete_a_regular_user() {
        let admin = principal(2, "admin@example.com", Role::Admin);
        let subject = employee(5, "user@example.com", Role::User);

        assert!(authorize(&admin, Action::DeleteById { subject: &subject }, SUPERADMIN_EMAIL).is_ok());
    }

    #[test]
    fn test_viewing_the_superadmin_by_email_is_denied() {
        let admin = principal(2, "admin@example.com", Role::Admin);

        let err = authorize(&admin, Action::ViewByEmail { email: SUPERADMIN_EMAIL }, SUPERADMIN_EMAIL).unwrap_err();
        assert!(matches!(err, Error::SuperAdminProtected { .. }));
        assert_eq!(err.user_message(), "You are not authorized to access this information.");

        assert!(authorize(&admin, Action::ViewByEmail { email: "user@example.com" }, SUPERADMIN_EMAIL).is_ok());
    }

    #[test]
    fn test_superadmin_self_service_mutation_is_blocked() {
        let superadmin = principal(1, SUPERADMIN_EMAIL, Role::SuperAdmin);

        let update_err = authorize(&superadmin, Action::UpdateSelf, SUPERADMIN_EMAIL).unwrap_err();
        assert_eq!(update_err.user_message(), "Cannot update Super Admin account");

        let delete_err = authorize(&superadmin, Action::DeleteSelf, SUPERADMIN_EMAIL).unwrap_err();
        assert_eq!(delete_err.user_message(), "Cannot delete Super Admin account");
    }

    #[test]
    fn test_ordinary_self_service_is_allowed() {
        let user = principal(5, "user@example.com", Role::User);

        assert!(authorize(&user, Action::UpdateSelf, SUPERADMIN_EMAIL).is_ok());
        assert!(authorize(&user, Action::DeleteSelf, SUPERADMIN_EMAIL).is_ok());
    }
}
