//! Engine start-up and sign-in.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use catpaw_app::config::ENV_API_URL;
use catpaw_app::request::{LoginReq, LogoutReq, SignupReq};
use catpaw_app::state::{AuthPhase, AuthState, SignupState};
use catpaw_app::{AppConfig, CatPawApp};
use catpaw_client::{CatPawApi, HttpApi};
use tracing::info;

use crate::config::ClientConfig;

/// Login flags as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Settings file, then the current profile, then `CATPAW_API_URL`.
pub fn app_config(client_config_path: &Path, settings: Option<&Path>) -> Result<AppConfig> {
    let base = match settings {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let config = ClientConfig::load(client_config_path)?;
    let app = match config.current() {
        Some(profile) => profile.app_config(base),
        None => base,
    };
    Ok(app.with_api_url(std::env::var(ENV_API_URL).ok()).validated()?)
}

/// Fill missing credentials from the profile or an interactive prompt.
fn resolve(creds: Credentials, profile_email: Option<&str>) -> Result<(String, String)> {
    let email = match creds.email.or_else(|| profile_email.filter(|e| !e.is_empty()).map(String::from)) {
        Some(email) => email,
        None => {
            eprint!("Email: ");
            let mut s = String::new();
            std::io::stdin().read_line(&mut s)?;
            s.trim().to_string()
        }
    };
    let password = match creds.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };
    Ok((email, password))
}

/// Start an engine against `api` and log in.
pub async fn sign_in(
    api: Arc<dyn CatPawApi>,
    config: AppConfig,
    email: String,
    password: String,
) -> Result<CatPawApp> {
    let app = CatPawApp::new(api, config);
    app.emit(LoginReq::PATH, LoginReq { email, password }).await;

    let auth = app
        .flux()
        .get_as::<AuthState>(AuthState::PATH)
        .ok_or_else(|| anyhow::anyhow!("login produced no auth state"))?;
    match (auth.phase, auth.user) {
        (AuthPhase::Authenticated, Some(user)) => {
            info!(user_id = user.user_id, "signed in as {}", user.username);
            Ok(app)
        }
        _ => anyhow::bail!(
            "Login failed: {}",
            auth.error.unwrap_or_else(|| "unknown error".into())
        ),
    }
}

/// Resolve config and credentials, then sign in over HTTP.
pub async fn open(
    client_config_path: &Path,
    settings: Option<&Path>,
    creds: Credentials,
) -> Result<CatPawApp> {
    let config = app_config(client_config_path, settings)?;
    let client_config = ClientConfig::load(client_config_path)?;
    let (email, password) = resolve(creds, client_config.current().map(|p| p.email.as_str()))?;
    let api = Arc::new(HttpApi::new(&config.api_base_url));
    sign_in(api, config, email, password).await
}

/// Create an account, then sign in with it.
pub async fn sign_up(
    api: Arc<dyn CatPawApi>,
    config: AppConfig,
    username: String,
    full_name: String,
    email: String,
    password: String,
) -> Result<CatPawApp> {
    let app = CatPawApp::new(api, config);
    let req = SignupReq { username, email, password, full_name };
    app.emit(SignupReq::PATH, req).await;

    let signup = app.flux().get_as::<SignupState>(SignupState::PATH).unwrap_or_default();
    if let Some(error) = signup.error {
        anyhow::bail!("Signup failed: {error}");
    }
    match app.flux().get_as::<AuthState>(AuthState::PATH) {
        Some(auth) if auth.phase == AuthPhase::Authenticated => Ok(app),
        Some(auth) => anyhow::bail!(
            "Account created but login failed: {}",
            auth.error.unwrap_or_else(|| "unknown error".into())
        ),
        None => anyhow::bail!("signup produced no auth state"),
    }
}

/// Resolve config and credentials, then register over HTTP.
pub async fn register(
    client_config_path: &Path,
    settings: Option<&Path>,
    creds: Credentials,
    username: String,
    full_name: String,
) -> Result<CatPawApp> {
    let config = app_config(client_config_path, settings)?;
    let (email, password) = resolve(creds, None)?;
    let api = Arc::new(HttpApi::new(&config.api_base_url));
    sign_up(api, config, username, full_name, email, password).await
}

/// Log out and stop background work.
pub async fn close(app: CatPawApp) {
    app.emit(LogoutReq::PATH, LogoutReq).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use crate::config::Profile;

    async fn backend() -> String {
        let app = Router::new()
            .route(
                "/register.php",
                post(|Json(body): Json<Value>| async move {
                    if body["username"] == "tom" {
                        Json(json!({ "status": "error", "message": "Username already taken" }))
                    } else {
                        Json(json!({ "status": "success", "message": "Registered" }))
                    }
                }),
            )
            .route(
            "/login.php",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "meow" {
                    Json(json!({
                        "status": "success",
                        "user": {
                            "user_id": "7", "username": "tom",
                            "email": "tom@catpaw.app", "role": "user"
                        }
                    }))
                } else {
                    Json(json!({ "status": "error", "message": "Invalid email or password" }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn sign_in_over_http() {
        let base = backend().await;
        let config = AppConfig { api_base_url: base.clone(), ..AppConfig::default() };
        let app = sign_in(Arc::new(HttpApi::new(&base)), config, "tom@catpaw.app".into(), "meow".into())
            .await
            .unwrap();
        assert_eq!(app.context().session.user_id(), Some(7));
        close(app).await;
    }

    #[tokio::test]
    async fn wrong_password_is_an_error() {
        let base = backend().await;
        let config = AppConfig { api_base_url: base.clone(), ..AppConfig::default() };
        let err = sign_in(Arc::new(HttpApi::new(&base)), config, "tom@catpaw.app".into(), "woof".into())
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Login failed: Invalid email or password");
    }

    #[tokio::test]
    async fn sign_up_then_signed_in() {
        let base = backend().await;
        let config = AppConfig { api_base_url: base.clone(), ..AppConfig::default() };
        let app = sign_up(
            Arc::new(HttpApi::new(&base)),
            config,
            "mia".into(),
            "Mia Wong".into(),
            "mia@catpaw.app".into(),
            "meow".into(),
        )
        .await
        .unwrap();
        assert!(app.context().session.current().is_some());
        close(app).await;

        let config = AppConfig { api_base_url: base.clone(), ..AppConfig::default() };
        let err = sign_up(
            Arc::new(HttpApi::new(&base)),
            config,
            "tom".into(),
            "Tom".into(),
            "tom2@catpaw.app".into(),
            "meow".into(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.to_string(), "Signup failed: Username already taken");
    }

    #[test]
    fn flags_win_over_profile_email() {
        let creds = Credentials { email: Some("mia@catpaw.app".into()), password: Some("x".into()) };
        let (email, password) = resolve(creds, Some("tom@catpaw.app")).unwrap();
        assert_eq!(email, "mia@catpaw.app");
        assert_eq!(password, "x");

        let creds = Credentials { email: None, password: Some("x".into()) };
        assert_eq!(resolve(creds, Some("tom@catpaw.app")).unwrap().0, "tom@catpaw.app");
    }

    #[test]
    fn profile_url_applies_over_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("catpaw.toml");
        std::fs::write(&settings, "api_base_url = \"http://file/api\"\nstory_tick_ms = 33\n").unwrap();

        let client = dir.path().join("config.toml");
        let mut config = ClientConfig::default();
        config.upsert_profile(Profile {
            name: "local".into(),
            api_url: "http://profile/api".into(),
            upload_url: String::new(),
            email: String::new(),
        });
        config.save(&client).unwrap();

        let app = app_config(&client, Some(&settings)).unwrap();
        assert_eq!(app.story_tick_ms, 33);
        if std::env::var(ENV_API_URL).is_err() {
            assert_eq!(app.api_base_url, "http://profile/api");
        }
    }
}
