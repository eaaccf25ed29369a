//! Sign-in, password reset and profile routes.

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{ForgotPasswordForm, LoginForm, ResetPasswordForm, SignupForm, VerifyOtpForm};
use crate::domain::aggregates::{ProfileUpdate, User};
use crate::error::AppError;
use crate::routes::require_user;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-otp", post(verify_otp))
        .route("/reset-password", post(reset_password))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetToken {
    pub reset_token: Uuid,
}

async fn login(State(s): State<AppState>, Json(form): Json<LoginForm>) -> Result<Json<User>, AppError> {
    let user = s.auth().login(&form)?;
    s.store().write().await.set_user(Some(user.clone()));
    Ok(Json(user))
}

async fn signup(State(s): State<AppState>, Json(form): Json<SignupForm>) -> Result<Json<User>, AppError> {
    let user = s.auth().signup(&form)?;
    s.store().write().await.set_user(Some(user.clone()));
    Ok(Json(user))
}

async fn logout(State(s): State<AppState>) -> Json<Value> {
    s.store().write().await.set_user(None);
    Json(json!({ "signedOut": true }))
}

/// The code is never echoed back; it would be emailed.
async fn forgot_password(State(s): State<AppState>, Json(form): Json<ForgotPasswordForm>) -> Result<Json<Value>, AppError> {
    s.auth().forgot_password(&form).await?;
    Ok(Json(json!({ "sent": true, "email": form.email })))
}

async fn verify_otp(State(s): State<AppState>, Json(form): Json<VerifyOtpForm>) -> Result<Json<ResetToken>, AppError> {
    let reset_token = s.auth().verify_otp(&form).await?;
    Ok(Json(ResetToken { reset_token }))
}

async fn reset_password(State(s): State<AppState>, Json(form): Json<ResetPasswordForm>) -> Result<Json<Value>, AppError> {
    let email = s.auth().reset_password(&form).await?;
    Ok(Json(json!({ "reset": true, "email": email })))
}

pub async fn profile(State(s): State<AppState>) -> Result<Json<User>, AppError> {
    let store = s.store().read().await;
    Ok(Json(require_user(&store)?.clone()))
}

pub async fn update_profile(State(s): State<AppState>, Json(update): Json<ProfileUpdate>) -> Result<Json<User>, AppError> {
    let mut store = s.store().write().await;
    store.update_profile(update).cloned().map(Json).ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::auth::ForgotPasswordForm;
    use crate::routes::test_support::{app, login, send};

    #[tokio::test]
    async fn test_login_then_logout() {
        let (app, state) = app();
        login(&app, "asha@example.com").await;
        assert_eq!(state.store().read().await.user().map(|u| u.email.as_str()), Some("asha@example.com"));

        send(&app, "POST", "/api/v1/auth/logout", None).await;
        assert!(state.store().read().await.user().is_none());
    }

    #[tokio::test]
    async fn test_signup_password_mismatch() {
        let (app, _) = app();
        let body = json!({"name": "Asha", "email": "asha@example.com", "password": "secret1", "confirmPassword": "secret2"});
        let (status, body) = send(&app, "POST", "/api/v1/auth/signup", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["fields"].get("confirm_password").is_some());
    }

    #[tokio::test]
    async fn test_profile_requires_sign_in() {
        let (app, _) = app();
        let (status, _) = send(&app, "GET", "/api/v1/profile", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&app, "PUT", "/api/v1/profile", Some(json!({"name": "Asha"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let (app, _) = app();
        login(&app, "asha@example.com").await;
        let (status, body) = send(&app, "PUT", "/api/v1/profile", Some(json!({"name": "Asha", "phone": "98765"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Asha");
        assert_eq!(body["email"], "asha@example.com");
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let (app, state) = app();
        let (_, body) = send(&app, "POST", "/api/v1/auth/forgot-password", Some(json!({"email": "asha@example.com"}))).await;
        assert!(body.get("code").is_none());

        let code = state.auth().forgot_password(&ForgotPasswordForm { email: "asha@example.com".into() }).await.unwrap();
        let wrong = if code == "0000" { "1111" } else { "0000" };
        let (status, _) =
            send(&app, "POST", "/api/v1/auth/verify-otp", Some(json!({"email": "asha@example.com", "code": wrong}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            send(&app, "POST", "/api/v1/auth/verify-otp", Some(json!({"email": "asha@example.com", "code": code}))).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["resetToken"].clone();

        let reset = json!({"token": token, "password": "secret1", "confirmPassword": "secret1"});
        let (status, body) = send(&app, "POST", "/api/v1/auth/reset-password", Some(reset.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "asha@example.com");

        let (status, _) = send(&app, "POST", "/api/v1/auth/reset-password", Some(reset)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
