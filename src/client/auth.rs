use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use parking_lot::Mutex;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::session::{AuthError, AuthProvider, Session};
use crate::config::ClientConfig;

/// 访问令牌中客户端关心的声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String, // 用户ID
    pub exp: i64,    // 过期时间
    #[serde(default)]
    pub email: Option<String>,
}

/// 只读取声明，不校验签名；签名由认证服务在 /user 接口上校验
pub fn decode_access_token(token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let token_data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(token_data.claims)
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// 由已保存的令牌构造会话
pub fn session_from_token(
    access_token: &str,
    refresh_token: Option<String>,
) -> Result<Session, AuthError> {
    let claims = decode_access_token(access_token)?;
    Ok(Session {
        user_id: claims.sub,
        access_token: access_token.to_string(),
        refresh_token,
        expires_at: timestamp(claims.exp),
        email: claims.email,
    })
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    user: Option<UserBody>,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl AuthErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: serde_json::Value,
}

/// GoTrue 兼容的认证服务客户端（Supabase Auth 使用同一套接口）
pub struct GoTrueAuth {
    client: Client,
    base_url: String,
    anon_key: String,
    stored: Mutex<Option<Session>>,
}

impl GoTrueAuth {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            stored: Mutex::new(None),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.auth_url, &config.auth_anon_key)
    }

    /// 载入上次保存的令牌，供 `current_session` 恢复会话
    pub fn restore(&self, access_token: &str, refresh_token: Option<String>) -> Result<(), AuthError> {
        let session = session_from_token(access_token, refresh_token)?;
        *self.stored.lock() = Some(session);
        Ok(())
    }

    /// 当前持有的会话，调用方可据此持久化令牌
    pub fn stored_session(&self) -> Option<Session> {
        self.stored.lock().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn session_from_response(&self, body: TokenResponse) -> Result<Option<Session>, AuthError> {
        let Some(access_token) = body.access_token else {
            return Ok(None);
        };
        let mut session = session_from_token(&access_token, body.refresh_token)?;
        if let Some(expires_at) = body.expires_at.and_then(timestamp) {
            session.expires_at = Some(expires_at);
        }
        if let Some(user) = body.user {
            session.user_id = user.id;
            session.email = user.email.or(session.email);
        }
        *self.stored.lock() = Some(session.clone());
        Ok(Some(session))
    }
}

async fn error_from(response: Response) -> AuthError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<AuthErrorBody>(&text)
        .ok()
        .and_then(AuthErrorBody::into_message)
        .unwrap_or(text);

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials(message),
        _ => AuthError::Service {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl AuthProvider for GoTrueAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<Option<Session>, AuthError> {
        let response = self
            .client
            .post(self.url("/signup"))
            .header("apikey", &self.anon_key)
            .json(&SignUpBody {
                email,
                password,
                data: metadata,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        // 需要邮箱确认时响应体只有用户信息，没有令牌
        let body: TokenResponse = response.json().await?;
        self.session_from_response(body)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.url("/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let body: TokenResponse = response.json().await?;
        self.session_from_response(body)?
            .ok_or_else(|| AuthError::InvalidCredentials("no access token returned".to_string()))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        self.stored.lock().take();
        let response = self
            .client
            .post(self.url("/logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let stored = self.stored.lock().clone();
        let Some(session) = stored else {
            return Ok(None);
        };

        // 本地已过期就不再请求认证服务
        if session.is_expired(Utc::now()) {
            tracing::debug!("Stored session for {} expired", session.user_id);
            self.stored.lock().take();
            return Ok(None);
        }

        let response = self
            .client
            .get(self.url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => {
                let user: UserBody = response.json().await?;
                Ok(Some(Session {
                    user_id: user.id,
                    email: user.email.or(session.email),
                    ..session
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.stored.lock().take();
                Ok(None)
            }
            _ => Err(error_from(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(sub: &str, exp: i64) -> String {
        let claims = serde_json::json!({
            "sub": sub,
            "exp": exp,
            "aud": "authenticated",
            "email": "tea@example.com",
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_ignores_signature_and_audience() {
        let claims = decode_access_token(&token("u1", 4_102_444_800)).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email.as_deref(), Some("tea@example.com"));
    }

    #[test]
    fn test_session_from_expired_token_is_expired() {
        let session = session_from_token(&token("u1", 1_000), None).unwrap();
        assert!(session.is_expired(Utc::now()));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            session_from_token("not-a-jwt", None),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_restore_resolves_to_no_session_without_network() {
        // 地址不可达：若发起请求会返回传输错误
        let auth = GoTrueAuth::new("http://127.0.0.1:9", "anon");
        auth.restore(&token("u1", 1_000), None).unwrap();
        assert_eq!(auth.current_session().await.unwrap(), None);
        assert!(auth.stored_session().is_none());
    }
}
