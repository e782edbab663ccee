use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{decode_claims, AuthError};
use crate::error::ApiError;

/// Authenticated caller extracted from the bearer token, valid for one request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
}

/// JWT authentication middleware that validates tokens and injects the caller identity
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authenticate(&headers, &state.config.security.jwt_secret).map_err(|err| {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request: {}",
            err
        );
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = decode_claims(token, secret)?;
    let id = claims.caller_id()?;

    Ok(AuthUser { id })
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::InvalidHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    let rest = auth_str.strip_prefix("Bearer ").ok_or(AuthError::InvalidHeader)?;

    // Only the segment up to the next space is the token
    Ok(rest.split(' ').next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(matches!(extract_bearer_token(&HeaderMap::new()), Err(AuthError::InvalidHeader)));
    }

    #[test]
    fn prefix_is_case_sensitive() {
        assert!(matches!(extract_bearer_token(&headers("bearer abc")), Err(AuthError::InvalidHeader)));
        assert!(matches!(extract_bearer_token(&headers("Token abc")), Err(AuthError::InvalidHeader)));
        assert!(matches!(extract_bearer_token(&headers("Bearerabc")), Err(AuthError::InvalidHeader)));
    }

    #[test]
    fn token_is_the_first_segment_after_prefix() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers("Bearer abc trailing")).unwrap(), "abc");
        assert_eq!(extract_bearer_token(&headers("Bearer  abc")).unwrap(), "");
    }

    #[test]
    fn authenticate_reports_each_failure_stage() {
        let secret = "s3cret";
        assert!(matches!(authenticate(&headers("Bearer nope"), secret), Err(AuthError::InvalidToken(_))));

        let no_id = crate::auth::Claims { id: None, exp: None, iat: None };
        let token = crate::auth::generate_jwt(&no_id, secret).unwrap();
        assert!(matches!(
            authenticate(&headers(&format!("Bearer {}", token)), secret),
            Err(AuthError::InvalidPayload)
        ));

        let token = crate::auth::generate_jwt(&crate::auth::Claims::new(3, 1).unwrap(), secret).unwrap();
        assert_eq!(
            authenticate(&headers(&format!("Bearer {}", token)), secret).unwrap(),
            AuthUser { id: 3 }
        );
    }
}
