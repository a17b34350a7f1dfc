use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{JwtHeader, SessionClaims, SessionUser};

type HmacSha256 = Hmac<Sha256>;

/// Identity to embed in a freshly issued session credential.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
}

fn sign(signing_input: &str, jwt_secret: &str) -> Result<Vec<u8>, String> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn issue_token(subject: &TokenSubject<'_>, jwt_secret: &str, ttl: Duration) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| "Session lifetime is out of range".to_string())?;
    let claims = SessionClaims {
        sub: subject.user_id.to_string(),
        username: subject.username.to_string(),
        email: subject.email.to_string(),
        iat: now.timestamp().max(0) as u64,
        exp: expires_at.timestamp().max(0) as u64,
    };

    let header_json = serde_json::to_vec(&JwtHeader::default()).map_err(|e| e.to_string())?;
    let claims_json = serde_json::to_vec(&claims).map_err(|e| e.to_string())?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(&signing_input, jwt_secret)?;

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<SessionUser, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    // verify_slice compares in constant time
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => bytes,
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: SessionClaims = match serde_json::from_slice(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    let now = Utc::now().timestamp().max(0) as u64;
    if claims.exp <= now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    if claims.sub.is_empty() {
        return Err("Token has no subject".to_string());
    }

    let user = SessionUser {
        id: claims.sub,
        username: claims.username,
        email: claims.email,
        issued_at: Utc.timestamp_opt(claims.iat as i64, 0).single(),
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            user_id: "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            username: "bob",
            email: "b@x.com",
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let token = issue_token(&subject(), SECRET, Duration::hours(1)).unwrap();
        let user = validate_token(&token, SECRET).unwrap();

        assert_eq!(user.id, "6f9619ff-8b86-d011-b42d-00cf4fc964ff");
        assert_eq!(user.username, "bob");
        assert_eq!(user.email, "b@x.com");
        assert!(user.issued_at.is_some());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&subject(), SECRET, Duration::hours(1)).unwrap();
        assert_eq!(validate_token(&token, "other-secret"), Err("Invalid token signature".to_string()));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(&subject(), SECRET, Duration::hours(-1)).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err("Token expired".to_string()));
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let token = issue_token(&subject(), SECRET, Duration::hours(1)).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            br#"{"sub":"someone-else","username":"eve","email":"e@x.com","iat":0,"exp":99999999999}"#,
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert!(validate_token(&forged, SECRET).is_err());
    }

    #[test]
    fn test_malformed_and_unset_secret() {
        assert_eq!(validate_token("abc", SECRET), Err("Invalid token format".to_string()));
        assert!(issue_token(&subject(), "", Duration::hours(1)).is_err());
        assert!(validate_token("a.b.c", "").is_err());
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        assert_eq!(
            issue_token(&subject(), SECRET, Duration::hours(10_000_000_000)),
            Err("Session lifetime is out of range".to_string())
        );
    }
}
