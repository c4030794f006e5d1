//! Flow and HTTP tests for the auth crate
//!
//! Use cases run against the in-memory repository with explicit clocks;
//! HTTP tests drive the real router with `oneshot`.

#[cfg(test)]
mod flow_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::application::{
        AuthConfig, DeviceInfo, IdentityQuery, RefreshUseCase, SignInInput, SignInOutput,
        SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase, TokenIssuer,
    };
    use crate::domain::entity::{session::Session, user::User};
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::domain::value_object::{
        refresh_token::RefreshToken, user_id::UserId, user_role::UserRole,
    };
    use crate::error::{AuthError, AuthResult, IdentityField};
    use crate::infra::InMemoryAuthRepository;

    struct Harness {
        repo: Arc<InMemoryAuthRepository>,
        config: Arc<AuthConfig>,
        issuer: Arc<TokenIssuer>,
    }

    impl Harness {
        fn new() -> Self {
            let config = AuthConfig::development();
            Self {
                repo: Arc::new(InMemoryAuthRepository::new()),
                issuer: Arc::new(TokenIssuer::new(&config)),
                config: Arc::new(config),
            }
        }

        async fn sign_up(&self, username: &str, email: &str, secret: &str) -> AuthResult<()> {
            SignUpUseCase::new(self.repo.clone(), self.config.clone())
                .execute(
                    SignUpInput {
                        username: username.to_string(),
                        email: email.to_string(),
                        secret: secret.to_string(),
                        role: None,
                    },
                    t0(),
                )
                .await
                .map(|_| ())
        }

        async fn sign_in(
            &self,
            identifier: &str,
            secret: &str,
            now: DateTime<Utc>,
        ) -> AuthResult<SignInOutput> {
            SignInUseCase::new(self.repo.clone(), self.issuer.clone(), self.config.clone())
                .execute(
                    SignInInput {
                        identifier: identifier.to_string(),
                        secret: secret.to_string(),
                    },
                    DeviceInfo::default(),
                    now,
                )
                .await
        }

        fn refresh_use_case(&self) -> RefreshUseCase<InMemoryAuthRepository> {
            RefreshUseCase::new(self.repo.clone(), self.issuer.clone())
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();

        let err = h
            .sign_up("Alice", "other@x.edu", "password1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::DuplicateIdentity(IdentityField::Username)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();

        let err = h
            .sign_up("alice2", "ALICE@x.edu", "password1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::DuplicateIdentity(IdentityField::Email)
        ));
    }

    #[tokio::test]
    async fn test_signup_validation_happens_before_store() {
        let h = Harness::new();

        let cases = [
            ("", "a@x.edu", "password1", "username"),
            ("bob", "not-an-email", "password1", "email"),
            ("bob", "bob@x.edu", "short", "secret"),
        ];
        for (username, email, secret, expected) in cases {
            match h.sign_up(username, email, secret).await {
                Err(AuthError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error on {expected}, got {other:?}"),
            }
        }

        // Nothing was written, so the names are still free
        h.sign_up("bob", "bob@x.edu", "password1").await.unwrap();
    }

    #[tokio::test]
    async fn test_signup_with_role() {
        let h = Harness::new();
        let output = SignUpUseCase::new(h.repo.clone(), h.config.clone())
            .execute(
                SignUpInput {
                    username: "carol".to_string(),
                    email: "carol@x.edu".to_string(),
                    secret: "password1".to_string(),
                    role: Some("alumni".to_string()),
                },
                t0(),
            )
            .await
            .unwrap();
        assert_eq!(output.user_role, UserRole::Alumni);

        let query = IdentityQuery::new(h.repo.clone(), h.config.clone());
        assert_eq!(query.role_of(&output.user_id).await.unwrap(), UserRole::Alumni);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();

        let unknown = h.sign_in("mallory", "password1", t0()).await.err().unwrap();
        let wrong = h.sign_in("alice", "password2", t0()).await.err().unwrap();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.code(), wrong.code());
        assert_eq!(unknown.status_code(), wrong.status_code());

        // A failed login leaves no session behind
        assert_eq!(h.repo.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_validation() {
        let h = Harness::new();
        assert!(matches!(
            h.sign_in("  ", "password1", t0()).await,
            Err(AuthError::Validation {
                field: "identifier",
                ..
            })
        ));
        assert!(matches!(
            h.sign_in("alice", "", t0()).await,
            Err(AuthError::Validation { field: "secret", .. })
        ));
    }

    #[tokio::test]
    async fn test_login_by_username_or_email() {
        let h = Harness::new();
        h.sign_up("Alice", "alice@x.edu", "password1").await.unwrap();

        let by_name = h.sign_in("alice", "password1", t0()).await.unwrap();
        let by_email = h.sign_in("Alice@X.edu", "password1", t0()).await.unwrap();

        assert_eq!(by_name.user_id, by_email.user_id);
        assert_eq!(by_name.user_role, UserRole::Student);
        assert_ne!(by_name.refresh_token, by_email.refresh_token);
        assert_eq!(h.repo.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_fullwidth_email_signs_up_and_logs_in() {
        let h = Harness::new();
        let fullwidth = "\u{FF41}lice@x.edu";
        h.sign_up("alice", fullwidth, "password1").await.unwrap();

        let by_same_form = h.sign_in(fullwidth, "password1", t0()).await.unwrap();
        let by_ascii = h.sign_in("alice@x.edu", "password1", t0()).await.unwrap();
        assert_eq!(by_same_form.user_id, by_ascii.user_id);

        // Folded form is already taken
        assert!(matches!(
            h.sign_up("alice2", "alice@x.edu", "password1").await,
            Err(AuthError::DuplicateIdentity(IdentityField::Email))
        ));
    }

    #[tokio::test]
    async fn test_access_token_from_login_verifies() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();
        let output = h.sign_in("alice", "password1", t0()).await.unwrap();

        let verified = h
            .issuer
            .verify_access_token(&output.access_token.token, t0())
            .unwrap();
        assert_eq!(verified.user_id, output.user_id);
        assert_eq!(verified.role, UserRole::Student);

        let after_ttl = t0() + h.config.access_token_ttl_chrono() + Duration::seconds(1);
        assert!(matches!(
            h.issuer
                .verify_access_token(&output.access_token.token, after_ttl),
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_refresh_validity_window() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();
        let login = h.sign_in("alice", "password1", t0()).await.unwrap();
        let ttl = h.config.refresh_token_ttl_chrono();
        let refresh = h.refresh_use_case();

        for at in [t0(), t0() + Duration::hours(1), t0() + ttl - Duration::seconds(1)] {
            let output = refresh
                .execute(Some(login.refresh_token.clone()), at)
                .await
                .unwrap();
            assert_eq!(output.user_id, login.user_id);
        }

        for at in [t0() + ttl, t0() + ttl + Duration::days(1)] {
            assert!(matches!(
                refresh.execute(Some(login.refresh_token.clone()), at).await,
                Err(AuthError::SessionExpiredOrUnknown)
            ));
        }
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();
        let login = h.sign_in("alice", "password1", t0()).await.unwrap();
        let refresh = h.refresh_use_case();
        let later = t0() + Duration::minutes(5);

        let first = refresh
            .execute(Some(login.refresh_token.clone()), later)
            .await
            .unwrap();
        let second = refresh
            .execute(Some(login.refresh_token.clone()), later)
            .await
            .unwrap();

        assert_ne!(first.access_token.token, second.access_token.token);
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(h.repo.session_count().await, 1);

        for output in [&first, &second] {
            let verified = h
                .issuer
                .verify_access_token(&output.access_token.token, later)
                .unwrap();
            assert_eq!(verified.user_id, login.user_id);
            assert_eq!(verified.role, UserRole::Student);
        }
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_session() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();
        let login = h.sign_in("alice", "password1", t0()).await.unwrap();
        let refresh = h.refresh_use_case();
        let later = t0() + Duration::minutes(1);

        let (first, second) = tokio::join!(
            refresh.execute(Some(login.refresh_token.clone()), later),
            refresh.execute(Some(login.refresh_token.clone()), later),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_ne!(first.access_token.token, second.access_token.token);
        for output in [&first, &second] {
            let verified = h
                .issuer
                .verify_access_token(&output.access_token.token, later)
                .unwrap();
            assert_eq!(verified.user_id, login.user_id);
        }

        // Session survives untouched
        assert_eq!(h.repo.session_count().await, 1);
        let again = refresh
            .execute(Some(login.refresh_token.clone()), later + Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(again.user_id, login.user_id);
    }

    #[tokio::test]
    async fn test_login_with_unreachable_refresh_ttl_fails_cleanly() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig {
            refresh_token_ttl: std::time::Duration::from_secs(10_000_000_000_000),
            ..AuthConfig::development()
        });
        SignUpUseCase::new(repo.clone(), config.clone())
            .execute(
                SignUpInput {
                    username: "alice".to_string(),
                    email: "alice@x.edu".to_string(),
                    secret: "password1".to_string(),
                    role: None,
                },
                t0(),
            )
            .await
            .unwrap();

        let issuer = Arc::new(TokenIssuer::new(&config));
        let result = SignInUseCase::new(repo.clone(), issuer, config)
            .execute(
                SignInInput {
                    identifier: "alice".to_string(),
                    secret: "password1".to_string(),
                },
                DeviceInfo::default(),
                t0(),
            )
            .await;

        assert!(matches!(result, Err(AuthError::Internal(_))));
        assert_eq!(repo.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_refresh_missing_and_unknown_tokens() {
        let h = Harness::new();
        let refresh = h.refresh_use_case();

        assert!(matches!(
            refresh.execute(None, t0()).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            refresh
                .execute(Some(RefreshToken::from_raw("forged")), t0())
                .await,
            Err(AuthError::SessionExpiredOrUnknown)
        ));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_session() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();
        let login = h.sign_in("alice", "password1", t0()).await.unwrap();

        let sign_out = SignOutUseCase::new(h.repo.clone());
        sign_out
            .execute(Some(login.refresh_token.clone()))
            .await
            .unwrap();
        // Idempotent
        sign_out
            .execute(Some(login.refresh_token.clone()))
            .await
            .unwrap();
        sign_out.execute(None).await.unwrap();

        assert!(matches!(
            h.refresh_use_case()
                .execute(Some(login.refresh_token), t0())
                .await,
            Err(AuthError::SessionExpiredOrUnknown)
        ));
    }

    #[tokio::test]
    async fn test_identity_query() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();
        let login = h.sign_in("alice", "password1", t0()).await.unwrap();
        let query = IdentityQuery::new(h.repo.clone(), h.config.clone());

        assert!(query.exists(&login.user_id.to_string()).await.unwrap());
        assert!(!query.exists(&UserId::new().to_string()).await.unwrap());
        assert!(!query.exists("42").await.unwrap());

        assert_eq!(query.role_of(&login.user_id).await.unwrap(), UserRole::Student);
        assert!(matches!(
            query.role_of(&UserId::new()).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_pepper_must_match() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let peppered = Arc::new(AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::development()
        });
        SignUpUseCase::new(repo.clone(), peppered.clone())
            .execute(
                SignUpInput {
                    username: "alice".to_string(),
                    email: "alice@x.edu".to_string(),
                    secret: "password1".to_string(),
                    role: None,
                },
                t0(),
            )
            .await
            .unwrap();

        let unpeppered = Arc::new(AuthConfig::development());
        let issuer = Arc::new(TokenIssuer::new(&unpeppered));
        let result = SignInUseCase::new(repo.clone(), issuer, unpeppered)
            .execute(
                SignInInput {
                    identifier: "alice".to_string(),
                    secret: "password1".to_string(),
                },
                DeviceInfo::default(),
                t0(),
            )
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    /// Store whose first `failures` session inserts report a collision
    #[derive(Clone)]
    struct CollidingRepo {
        inner: InMemoryAuthRepository,
        failures: Arc<AtomicUsize>,
    }

    impl UserRepository for CollidingRepo {
        async fn insert_user(&self, user: &User) -> AuthResult<()> {
            self.inner.insert_user(user).await
        }

        async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            self.inner.find_user_by_id(user_id).await
        }

        async fn find_user_by_identifier(&self, canonical: &str) -> AuthResult<Option<User>> {
            self.inner.find_user_by_identifier(canonical).await
        }

        async fn user_exists(&self, user_id: &UserId) -> AuthResult<bool> {
            self.inner.user_exists(user_id).await
        }
    }

    impl SessionRepository for CollidingRepo {
        async fn insert_session(&self, session: &Session) -> AuthResult<()> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(AuthError::SessionConflict);
            }
            self.inner.insert_session(session).await
        }

        async fn find_active_session(
            &self,
            token: &RefreshToken,
            now: DateTime<Utc>,
        ) -> AuthResult<Option<Session>> {
            self.inner.find_active_session(token, now).await
        }

        async fn delete_session(&self, token: &RefreshToken) -> AuthResult<()> {
            self.inner.delete_session(token).await
        }

        async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64> {
            self.inner.delete_expired_sessions(now).await
        }
    }

    async fn login_with_collisions(failures: usize) -> (AuthResult<SignInOutput>, usize) {
        let config = Arc::new(AuthConfig::development());
        let repo = Arc::new(CollidingRepo {
            inner: InMemoryAuthRepository::new(),
            failures: Arc::new(AtomicUsize::new(failures)),
        });
        SignUpUseCase::new(repo.clone(), config.clone())
            .execute(
                SignUpInput {
                    username: "alice".to_string(),
                    email: "alice@x.edu".to_string(),
                    secret: "password1".to_string(),
                    role: None,
                },
                t0(),
            )
            .await
            .unwrap();

        let issuer = Arc::new(TokenIssuer::new(&config));
        let result = SignInUseCase::new(repo.clone(), issuer, config)
            .execute(
                SignInInput {
                    identifier: "alice".to_string(),
                    secret: "password1".to_string(),
                },
                DeviceInfo::default(),
                t0(),
            )
            .await;
        let stored = repo.inner.session_count().await;
        (result, stored)
    }

    #[tokio::test]
    async fn test_login_retries_refresh_collision() {
        let (result, stored) = login_with_collisions(2).await;
        assert!(result.is_ok());
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn test_login_gives_up_after_repeated_collisions() {
        let (result, stored) = login_with_collisions(10).await;
        assert!(matches!(result, Err(AuthError::SessionConflict)));
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn test_reaper_purges_only_expired_sessions() {
        let h = Harness::new();
        h.sign_up("alice", "alice@x.edu", "password1").await.unwrap();
        h.sign_in("alice", "password1", t0()).await.unwrap();
        let late = h
            .sign_in("alice", "password1", t0() + Duration::days(3))
            .await
            .unwrap();

        let ttl = h.config.refresh_token_ttl_chrono();
        let deleted = h.repo.delete_expired_sessions(t0() + ttl).await.unwrap();
        assert_eq!(deleted, 1);

        assert!(h
            .refresh_use_case()
            .execute(Some(late.refresh_token), t0() + ttl)
            .await
            .is_ok());
    }
}

#[cfg(test)]
mod http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::AuthConfig;
    use crate::infra::InMemoryAuthRepository;
    use crate::presentation::router::auth_router_generic;

    fn app() -> Router {
        auth_router_generic(InMemoryAuthRepository::new(), AuthConfig::development())
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "integration-test")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` part of the first Set-Cookie header
    fn cookie_pair(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Set-Cookie present")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().trim().to_string()
    }

    async fn sign_up_alice(app: &Router) -> Value {
        let response = send(
            app,
            post_json(
                "/auth/signup",
                json!({"username": "alice", "email": "alice@x.edu", "secret": "password1"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    async fn login(app: &Router, identifier: &str) -> Response {
        send(
            app,
            post_json(
                "/auth/login",
                json!({"identifier": identifier, "secret": "password1"}),
            ),
        )
        .await
    }

    #[tokio::test]
    async fn test_signup_login_refresh_scenario() {
        let app = app();

        let created = sign_up_alice(&app).await;
        assert_eq!(created["username"], "alice");
        assert_eq!(created["email"], "alice@x.edu");
        assert_eq!(created["role"], "student");
        assert!(created.get("secret").is_none());

        let response = login(&app, "alice").await;
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("refresh_token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Path=/auth"));
        let cookie = cookie_pair(&response);
        let body = body_json(response).await;
        let t1 = body["accessToken"].as_str().unwrap().to_string();
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["expiresIn"], 900);
        assert_eq!(body["userId"], created["userId"]);

        let response = send(&app, get_with_cookie("/auth/refresh", &cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let t2 = body["accessToken"].as_str().unwrap();
        assert_ne!(t1, t2);

        let response = send(&app, get("/auth/refresh")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_login_with_email_form() {
        let app = app();
        let created = sign_up_alice(&app).await;

        let by_name = login(&app, "alice").await;
        let by_email = login(&app, "alice@x.edu").await;
        assert_eq!(by_name.status(), StatusCode::OK);
        assert_eq!(by_email.status(), StatusCode::OK);

        let by_email = body_json(by_email).await;
        assert_eq!(by_email["userId"], created["userId"]);
        assert_eq!(by_email["role"], "student");
    }

    #[tokio::test]
    async fn test_failed_logins_share_one_response() {
        let app = app();
        sign_up_alice(&app).await;

        let unknown = send(
            &app,
            post_json("/auth/login", json!({"identifier": "bob", "secret": "password1"})),
        )
        .await;
        let wrong = send(
            &app,
            post_json("/auth/login", json!({"identifier": "alice", "secret": "nope-nope"})),
        )
        .await;

        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert!(unknown.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_json(unknown).await, body_json(wrong).await);
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let app = app();
        sign_up_alice(&app).await;

        let response = send(
            &app,
            post_json(
                "/auth/signup",
                json!({"username": "alice", "email": "new@x.edu", "secret": "password1"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "DUPLICATE_IDENTITY");
        assert_eq!(body["field"], "username");

        let response = send(
            &app,
            post_json(
                "/auth/signup",
                json!({"username": "alice2", "email": "alice@x.edu", "secret": "password1"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["field"], "email");
    }

    #[tokio::test]
    async fn test_signup_validation_errors() {
        let app = app();

        let response = send(
            &app,
            post_json(
                "/auth/signup",
                json!({"username": "alice", "email": "nope", "secret": "password1"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field"], "email");

        let response = send(
            &app,
            post_json(
                "/auth/signup",
                json!({"username": "alice", "email": "alice@x.edu", "secret": "password1", "role": "admin"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["field"], "role");

        let response = send(&app, post_json("/auth/signup", json!({"username": "alice"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["field"], "body");
    }

    #[tokio::test]
    async fn test_refresh_with_unknown_cookie() {
        let app = app();
        let response = send(&app, get_with_cookie("/auth/refresh", "refresh_token=forged")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["code"],
            "SESSION_EXPIRED_OR_UNKNOWN"
        );
    }

    #[tokio::test]
    async fn test_logout_revokes_and_clears_cookie() {
        let app = app();
        sign_up_alice(&app).await;
        let cookie = cookie_pair(&login(&app, "alice").await);

        let response = send(
            &app,
            Request::post("/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cleared = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cleared.starts_with("refresh_token=;"));
        assert!(cleared.contains("Max-Age=0"));

        let response = send(&app, get_with_cookie("/auth/refresh", &cookie)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_valid_bearer() {
        let app = app();
        let created = sign_up_alice(&app).await;
        let token = body_json(login(&app, "alice").await).await["accessToken"]
            .as_str()
            .unwrap()
            .to_string();

        let response = send(
            &app,
            Request::get("/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["userId"], created["userId"]);
        assert_eq!(body["role"], "student");

        let response = send(&app, get("/auth/me")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "MISSING_TOKEN");

        let response = send(
            &app,
            Request::get("/auth/me")
                .header(header::AUTHORIZATION, "Bearer garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "TOKEN_MALFORMED");
    }

    #[tokio::test]
    async fn test_identity_endpoints() {
        let app = app();
        let created = sign_up_alice(&app).await;
        let user_id = created["userId"].as_str().unwrap();

        let response = send(&app, get(&format!("/user/{}", user_id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(true));

        let response = send(&app, get("/user/6f1c3a8e-2b0a-4c55-9d67-0f4f2f6d9a10")).await;
        assert_eq!(body_json(response).await, json!(false));

        let response = send(&app, get("/user/not-a-uuid")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(false));

        let response = send(&app, get(&format!("/user/{}/role", user_id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"userId": user_id, "role": "student"})
        );

        let response = send(&app, get("/user/6f1c3a8e-2b0a-4c55-9d67-0f4f2f6d9a10/role")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }
}
