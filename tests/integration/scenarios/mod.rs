//! End-to-end issuance and authentication flows

use axum::http::{Method, StatusCode};
use chrono::Utc;
use tollgate_auth::codec;

use crate::common::{claims_for, sign, TestApp, EMAIL, LOGIN, PASSWORD, SECRET, SITE_URL};

mod test_issuance {
    use super::*;

    #[tokio::test]
    async fn test_valid_credentials_issue_token() {
        let app = TestApp::new();
        let before = Utc::now().timestamp();

        let response = app.request_token(LOGIN, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);

        let token = response.body["access_token"].as_str().unwrap();
        let claims = codec::decode(token, SECRET.as_bytes()).unwrap();

        assert_eq!(claims.issuer, SITE_URL);
        assert_eq!(claims.user_id(), Some(app.account.id));
        assert_eq!(claims.data.user.login, LOGIN);
        assert_eq!(claims.data.user.email, EMAIL);
        assert_eq!(claims.data.user.user_type, "registered-user");
        assert!(claims.expires_at.unwrap() > before);
        assert!(claims.not_before <= Utc::now().timestamp());

        // The response carries the same claims that were signed
        assert_eq!(response.body["data"]["iss"], SITE_URL);
        assert_eq!(response.body["data"]["data"]["user"]["id"], app.account.id);
    }

    #[tokio::test]
    async fn test_email_is_accepted_as_username() {
        let app = TestApp::new();
        let response = app.request_token(EMAIL, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let app = TestApp::new();
        let response = app.request_token(LOGIN, "not-the-password").await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.error_code(), Some("incorrect-password"));
        assert!(response.body.get("access_token").is_none());
    }

    #[tokio::test]
    async fn test_unknown_login() {
        let app = TestApp::new();
        let response = app.request_token("nobody", PASSWORD).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.error_code(), Some("invalid-username"));
    }

    #[tokio::test]
    async fn test_missing_password() {
        let app = TestApp::new();
        let response = app.request_token(LOGIN, "").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some("missing-param"));
    }
}

mod test_authenticated_requests {
    use super::*;

    #[tokio::test]
    async fn test_issued_token_authenticates_write() {
        let app = TestApp::new();
        let token = app.token().await;

        let response = app.whoami(Method::POST, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["authenticated"], true);
        assert_eq!(response.body["user_id"], app.account.id);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let app = TestApp::new();
        let token = sign(&claims_for(&app.account, Utc::now().timestamp() - 1));

        let response = app.whoami(Method::POST, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.error_code(), Some("token-expired"));
        assert!(response.body.get("user_id").is_none());
    }

    #[tokio::test]
    async fn test_token_lifetime_is_configurable() {
        let config = crate::common::test_config().with_token_lifetime(chrono::Duration::seconds(60));
        let app = TestApp::with_config(config, |backend| backend);

        let response = app.request_token(LOGIN, PASSWORD).await;
        let claims = &response.body["data"];
        let lifetime = claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap();
        assert_eq!(lifetime, 60);
    }
}
