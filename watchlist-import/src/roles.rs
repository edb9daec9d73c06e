//! Blacklists for low-value staff and company roles.
//!
//! Blacklists (not whitelists) so that roles nobody has seen yet are kept by
//! default. Entries are case-insensitive substrings.

/// Creator roles that add noise without identifying a notable contributor.
pub const CREATOR_ROLE_BLACKLIST: &[&str] = &[
    // Production admin
    "assistant producer",
    "associate producer",
    "planning producer",
    "planning",
    "production manager",
    "production assistant",
    "production coordination",
    // Low-level animation
    "2nd key animation",
    "in-between animation",
    "layout",
    // Art, color, photography (Art Director is kept)
    "art design",
    "background art",
    "color design",
    "color setting",
    "photography",
    // Music sub-roles (Theme Song Performance and Music are kept)
    "composition",
    "arrangement",
    "lyrics",
    // Audio technical
    "sound effects",
    "recording engineer",
    // Localization
    "adr script",
    // Misc technical
    "cg animation",
    "prop design",
    "special effects",
    "publicity",
    "editing",
    "finishing",
    "endcard",
    "talent coordination",
];

/// Company roles for distribution and catch-all credits.
pub const COMPANY_ROLE_BLACKLIST: &[&str] = &["other", "licensor"];

pub fn is_creator_role_blocked(role: &str) -> bool {
    is_blocked(role, CREATOR_ROLE_BLACKLIST)
}

pub fn is_company_role_blocked(role: &str) -> bool {
    is_blocked(role, COMPANY_ROLE_BLACKLIST)
}

fn is_blocked(role: &str, blacklist: &[&str]) -> bool {
    let lower = role.to_lowercase();
    blacklist.iter().any(|blocked| lower.contains(blocked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_roles() {
        assert!(is_creator_role_blocked("Theme Song Lyrics"));
        assert!(is_creator_role_blocked("In-Between Animation (eps 3, 7)"));
        assert!(!is_creator_role_blocked("Director"));
        assert!(!is_creator_role_blocked("Original Creator"));
        assert!(!is_creator_role_blocked("Theme Song Performance"));
    }

    #[test]
    fn company_roles() {
        assert!(is_company_role_blocked("Licensor"));
        assert!(is_company_role_blocked("Producer/Other"));
        assert!(!is_company_role_blocked("studio"));
        assert!(!is_company_role_blocked("producer"));
    }
}
