//! Access control.
//!
//! One binary rule shared by both managers: a single configured identity is
//! the administrator and may read and write every record; everybody else is
//! scoped to records carrying their own email.
//!
//! Identity is whatever the caller asserts in a plain `email` field or header.
//! There is no session or token verification behind it.

/// Decides what an asserted identity may see and change.
///
/// Injected into the managers as `Arc<dyn AccessPolicy>` so the privileged
/// identity is configuration rather than a literal in the business logic.
pub trait AccessPolicy: Send + Sync {
    /// Whether `identity` is the administrator.
    fn is_admin(&self, identity: &str) -> bool;

    /// Whether `identity` may act on a record owned by `owner`.
    ///
    /// Owners may always act on their own records; the administrator may act
    /// on everyone's.
    fn may_act_for(&self, identity: &str, owner: &str) -> bool {
        identity == owner || self.is_admin(identity)
    }
}

/// Administrator identified by one configured email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEmail {
    email: String,
}

impl AdminEmail {
    /// Create a policy whose administrator is `email`.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// The configured administrator email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl AccessPolicy for AdminEmail {
    fn is_admin(&self, identity: &str) -> bool {
        identity == self.email
    }
}
