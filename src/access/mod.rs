//! Access gate
//!
//! Stateless per-request mapping of (path, role) to allow / redirect for
//! page routes. Unauthorized page access never produces an error body; it
//! always redirects. JSON API routes enforce hard errors separately.

use crate::domain::Role;

/// Path prefix of the admin area
pub const ADMIN_AREA: &str = "/admin";

/// Path prefix of the member self-service area
pub const MEMBER_AREA: &str = "/member";

/// Login page; unauthenticated visitors are sent here with a callback
pub const LOGIN_PATH: &str = "/login";

/// Non-privileged landing page for authenticated users that are not
/// allowed into the admin area
pub const MEMBER_HOME: &str = "/member/home";

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Let the request through
    Allow,
    /// Send the client to `target` instead
    Redirect(String),
}

impl AccessDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Gate a page request.
///
/// - Admin area: guests are redirected to login with the original
///   destination preserved; authenticated non-admins get a soft redirect to
///   the member landing page; admins pass.
/// - Member area: guests are redirected to login; any authenticated role
///   passes (the member area does not reject admins).
/// - Paths outside both areas pass unconditionally.
pub fn authorize(path: &str, role: Role) -> AccessDecision {
    if in_area(path, ADMIN_AREA) {
        return match role {
            Role::Admin => AccessDecision::Allow,
            Role::Member => AccessDecision::Redirect(MEMBER_HOME.to_string()),
            Role::Guest => AccessDecision::Redirect(login_redirect(path)),
        };
    }

    if in_area(path, MEMBER_AREA) {
        return match role {
            Role::Admin | Role::Member => AccessDecision::Allow,
            Role::Guest => AccessDecision::Redirect(login_redirect(path)),
        };
    }

    AccessDecision::Allow
}

/// Login URL preserving the original destination
fn login_redirect(path: &str) -> String {
    format!("{}?callbackUrl={}", LOGIN_PATH, urlencoding::encode(path))
}

/// Segment-aware prefix match: `/admin` and `/admin/x` are in the admin
/// area, `/administrator` is not.
fn in_area(path: &str, area: &str) -> bool {
    path == area || path.strip_prefix(area).is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_area_guest_redirects_to_login_with_callback() {
        let decision = authorize("/admin/x", Role::Guest);
        assert_eq!(
            decision,
            AccessDecision::Redirect("/login?callbackUrl=%2Fadmin%2Fx".to_string())
        );
    }

    #[test]
    fn test_admin_area_member_soft_redirects_to_landing() {
        let decision = authorize("/admin/x", Role::Member);
        assert_eq!(decision, AccessDecision::Redirect(MEMBER_HOME.to_string()));
    }

    #[test]
    fn test_admin_area_admin_allowed() {
        assert!(authorize("/admin/x", Role::Admin).is_allow());
        assert!(authorize("/admin", Role::Admin).is_allow());
    }

    #[test]
    fn test_member_area_guest_redirects_to_login() {
        let decision = authorize("/member/profile", Role::Guest);
        assert_eq!(
            decision,
            AccessDecision::Redirect("/login?callbackUrl=%2Fmember%2Fprofile".to_string())
        );
    }

    #[test]
    fn test_member_area_does_not_reject_admin() {
        assert!(authorize("/member/x", Role::Admin).is_allow());
        assert!(authorize("/member/x", Role::Member).is_allow());
    }

    #[test]
    fn test_unscoped_paths_allowed_for_everyone() {
        for role in [Role::Admin, Role::Member, Role::Guest] {
            assert!(authorize("/", role).is_allow());
            assert!(authorize("/login", role).is_allow());
            assert!(authorize("/about", role).is_allow());
        }
    }

    #[test]
    fn test_prefix_match_is_segment_aware() {
        // Lexical prefixes of the area name are not inside the area
        assert!(authorize("/administrator", Role::Guest).is_allow());
        assert!(authorize("/membership-info", Role::Guest).is_allow());
    }

    #[test]
    fn test_callback_preserves_query_free_path() {
        let decision = authorize("/admin/members/42", Role::Guest);
        match decision {
            AccessDecision::Redirect(target) => {
                assert!(target.starts_with("/login?callbackUrl="));
                assert!(target.contains("%2Fadmin%2Fmembers%2F42"));
            }
            AccessDecision::Allow => panic!("expected redirect"),
        }
    }
}
