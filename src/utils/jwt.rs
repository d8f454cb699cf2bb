use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,  // user_id
    pub ver: i32,  // users.token_version au moment de l'émission
    pub exp: i64,  // expiration timestamp
}

/// Génère un token d'accès pour un utilisateur
pub fn generate_token(
    secret: &str,
    user_id: i32,
    token_version: i32,
    ttl_hours: i64,
) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        ver: token_version,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un token (signature + expiration).
/// La comparaison de `ver` avec la base est faite par l'extracteur AuthUser.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_verify_token() {
        let token = generate_token(SECRET, 123, 4, 24).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, 123);
        assert_eq!(claims.ver, 4);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token(SECRET, "invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate_token(SECRET, 1, 0, 24).unwrap();
        assert!(verify_token("another-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token() {
        // Au-delà de la marge par défaut de 60s
        let token = generate_token(SECRET, 1, 0, -2).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
