use super::Policy;
use crate::error::GreentickError;
use actix_web::HttpRequest;
use greentick_domain::ID;
use greentick_infra::GreentickContext;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims of the HS256 signed bearer tokens presented by users
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Expiration time (as UTC timestamp in seconds)
    pub exp: usize,
    /// Issued at (as UTC timestamp in seconds)
    #[serde(default)]
    pub iat: Option<usize>,
    /// The user the token was issued to
    pub user_id: ID,
    #[serde(default)]
    pub policy: Option<Policy>,
}

fn parse_authtoken_header(token_header_value: &str) -> &str {
    let token = token_header_value.trim();
    token
        .strip_prefix("Bearer ")
        .or_else(|| token.strip_prefix("bearer "))
        .unwrap_or(token)
        .trim()
}

fn decode_token(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let claims = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))?.claims;

    Ok(claims)
}

/// Authenticates the user behind the request from its bearer token
pub fn protect_route(
    req: &HttpRequest,
    ctx: &GreentickContext,
) -> Result<(ID, Policy), GreentickError> {
    let token = match req.headers().get("authorization") {
        Some(token) => token.to_str().map_err(|_| {
            GreentickError::Unauthorized("Malformed authorization header provided".into())
        })?,
        None => {
            return Err(GreentickError::Unauthorized(
                "Missing authorization header with bearer token".into(),
            ))
        }
    };

    match decode_token(&ctx.config.jwt_secret, parse_authtoken_header(token)) {
        Ok(claims) => Ok((
            claims.user_id,
            claims.policy.unwrap_or_else(Policy::allow_all),
        )),
        Err(e) => Err(GreentickError::Unauthorized(format!(
            "Unable to verify the bearer token: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::auth::Permission;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, user_id: ID, exp: usize, policy: Option<Policy>) -> String {
        let claims = Claims {
            exp,
            iat: None,
            user_id,
            policy,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn parses_header() {
        assert_eq!(parse_authtoken_header("Bearer abc"), "abc");
        assert_eq!(parse_authtoken_header("bearer  abc "), "abc");
        assert_eq!(parse_authtoken_header("abc"), "abc");
    }

    #[actix_web::main]
    #[test]
    async fn accepts_valid_tokens() {
        let ctx = GreentickContext::create_inmemory().await;
        let user_id = ID::new();

        let req = TestRequest::default()
            .insert_header((
                "authorization",
                format!("Bearer {}", token(&ctx.config.jwt_secret, user_id, far_future(), None)),
            ))
            .to_http_request();
        let (authenticated, policy) = protect_route(&req, &ctx).unwrap();
        assert_eq!(authenticated, user_id);
        assert!(policy.authorize(&[Permission::SendReminder]));

        let restricted = Policy::new(None, Some(vec![Permission::SendReminder]));
        let req = TestRequest::default()
            .insert_header((
                "authorization",
                format!(
                    "Bearer {}",
                    token(&ctx.config.jwt_secret, user_id, far_future(), Some(restricted))
                ),
            ))
            .to_http_request();
        let (_, policy) = protect_route(&req, &ctx).unwrap();
        assert!(!policy.authorize(&[Permission::SendReminder]));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_tokens() {
        let ctx = GreentickContext::create_inmemory().await;

        let req = TestRequest::default().to_http_request();
        assert!(protect_route(&req, &ctx).is_err());

        let forged = token("not-the-secret", ID::new(), far_future(), None);
        let req = TestRequest::default()
            .insert_header(("authorization", format!("Bearer {}", forged)))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_err());

        let expired = token(&ctx.config.jwt_secret, ID::new(), 1000, None);
        let req = TestRequest::default()
            .insert_header(("authorization", format!("Bearer {}", expired)))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_err());
    }
}
