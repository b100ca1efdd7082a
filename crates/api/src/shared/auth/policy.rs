use serde::{Deserialize, Serialize};

/// A Policy decides which actions the bearer of a token can and cannot take.
///
/// The `Policy` is set by the issuer of the json web token in its claims.
/// Every mutating `UseCase` contains a list of `Permission`s that are
/// required to execute it, if the `Policy` does not authorize some of
/// these `Permission`s the request will be rejected. A token without a
/// `Policy` may perform every action.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Policy {
    /// `Permission`s allowed by the `Policy`
    #[serde(default)]
    allow: Option<Vec<Permission>>,
    /// `Permission`s rejected by the `Policy`
    #[serde(default)]
    reject: Option<Vec<Permission>>,
}

impl Policy {
    pub fn new(allow: Option<Vec<Permission>>, reject: Option<Vec<Permission>>) -> Self {
        Self { allow, reject }
    }

    pub fn allow_all() -> Self {
        Self {
            allow: Some(vec![Permission::All]),
            reject: None,
        }
    }

    /// Checks if this `Policy` has the right to list of `Permission`s
    pub fn authorize(&self, permissions: &[Permission]) -> bool {
        if permissions.is_empty() {
            return true;
        }

        if let Some(rejected) = &self.reject {
            for rejected_permission in rejected {
                if *rejected_permission == Permission::All {
                    return false;
                }
                if permissions.contains(rejected_permission) {
                    return false;
                }
            }
        }

        if let Some(allowed) = &self.allow {
            if allowed.contains(&Permission::All) {
                return true;
            }

            // Check that all permissions are in allowed
            for permission in permissions {
                if !allowed.contains(permission) {
                    return false;
                }
            }

            return true;
        }

        false
    }
}

/// `Permission` are different kind of actions that can be performed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Permission {
    #[serde(rename = "*")]
    All,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CreateReminder,
    UpdateReminder,
    DeleteReminder,
    SendReminder,
    CreateTemplate,
    UpdateTemplate,
    CreatePayment,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn permissions() {
        let policy = Policy::default();
        assert!(policy.authorize(&Vec::new()));
        assert!(!policy.authorize(&[Permission::CreateReminder]));

        let policy = Policy::allow_all();
        assert!(policy.authorize(&[Permission::CreateReminder]));

        let policy = Policy::new(
            Some(vec![Permission::All]),
            Some(vec![Permission::SendReminder]),
        );
        assert!(!policy.authorize(&[Permission::SendReminder]));
        assert!(policy.authorize(&[Permission::CreateReminder]));

        let policy = Policy::new(
            Some(vec![Permission::CreateCustomer]),
            Some(vec![Permission::All]),
        );
        assert!(!policy.authorize(&[Permission::CreateCustomer]));

        let policy = Policy::new(
            Some(vec![Permission::CreateReminder, Permission::UpdateReminder]),
            Some(vec![Permission::DeleteReminder]),
        );
        assert!(policy.authorize(&[Permission::CreateReminder]));
        assert!(policy.authorize(&[Permission::CreateReminder, Permission::UpdateReminder]));
        assert!(!policy.authorize(&[Permission::CreateReminder, Permission::DeleteReminder]));
        assert!(!policy.authorize(&[Permission::SendReminder]));
    }

    #[test]
    fn deserializes_wildcard() {
        let policy: Policy = serde_json::from_str(r#"{"allow":["*"]}"#).unwrap();
        assert!(policy.authorize(&[Permission::CreatePayment]));
        let policy: Policy = serde_json::from_str(r#"{"reject":["SendReminder"]}"#).unwrap();
        assert!(!policy.authorize(&[Permission::SendReminder]));
    }
}
