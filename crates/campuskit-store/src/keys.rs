//! Credential store key builders.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the session core uses.

use uuid::Uuid;

/// Prefix applied to all CampusKit store keys.
const PREFIX: &str = "campuskit";

/// Key for the Session Record of a subject.
///
/// Holds the subject's single currently-valid refresh token; a new login or
/// refresh overwrites it.
pub fn session_record(user_id: Uuid) -> String {
    format!("{PREFIX}:session:{user_id}")
}

/// Key for the Revocation Marker of a specific access token.
///
/// The raw token string is the discriminator: logout revokes exactly the
/// token that was presented, not the subject's other tokens.
pub fn revoked_token(access_token: &str) -> String {
    format!("{PREFIX}:revoked:{access_token}")
}

/// Key for a pending email verification code.
pub fn email_verification(email: &str) -> String {
    format!("{PREFIX}:verify:{}", email.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_record_key() {
        let id = Uuid::nil();
        assert_eq!(
            session_record(id),
            "campuskit:session:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_revoked_token_key_embeds_raw_token() {
        assert_eq!(revoked_token("abc.def.ghi"), "campuskit:revoked:abc.def.ghi");
    }

    #[test]
    fn test_email_verification_key_lowercases() {
        assert_eq!(
            email_verification("Kim@snu.ac.kr"),
            "campuskit:verify:kim@snu.ac.kr"
        );
    }
}
