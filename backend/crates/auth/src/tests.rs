//! Use case and router tests for the Auth crate, run against the in-memory
//! identity store.

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use crate::application::{
        AuthConfig, LoginInput, LoginOutput, LoginUseCase, RegisterInput, RegisterUseCase,
        SeedIdentityUseCase, Status,
    };
    use crate::infra::memory::MemoryIdentityRepository;

    pub fn config() -> AuthConfig {
        AuthConfig {
            seed_demo_users: false,
            ..AuthConfig::development()
        }
    }

    pub fn registration(user_name: &str, email: &str, password: &str, role: &str) -> RegisterInput {
        RegisterInput {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            user_name: user_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: password.to_string(),
            role: role.to_string(),
        }
    }

    pub async fn seeded(config: AuthConfig) -> (Arc<MemoryIdentityRepository>, Arc<AuthConfig>) {
        let repo = Arc::new(MemoryIdentityRepository::new());
        let config = Arc::new(config);
        SeedIdentityUseCase::new(repo.clone(), repo.clone(), config.clone())
            .execute()
            .await
            .unwrap();
        (repo, config)
    }

    pub async fn register(
        repo: &Arc<MemoryIdentityRepository>,
        config: &Arc<AuthConfig>,
        input: RegisterInput,
    ) -> Status {
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(input)
            .await
            .unwrap()
    }

    pub async fn login(
        repo: &Arc<MemoryIdentityRepository>,
        config: &Arc<AuthConfig>,
        user_name: &str,
        password: &str,
    ) -> LoginOutput {
        LoginUseCase::new(repo.clone(), repo.clone(), config.clone())
            .execute(LoginInput {
                user_name: user_name.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod register_tests {
    use std::sync::Arc;

    use kernel::id::UserId;

    use super::support::*;
    use crate::application::{RegisterUseCase, StatusKind};
    use crate::domain::entity::user::User;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{email::Email, role_name::RoleName, user_name::UserName};
    use crate::error::AuthResult;
    use crate::infra::memory::MemoryIdentityRepository;

    #[tokio::test]
    async fn test_register_success() {
        let (repo, config) = seeded(config()).await;

        let status = register(
            &repo,
            &config,
            registration("test@x.com", "test@x.com", "Test#1234", "user"),
        )
        .await;

        assert!(status.is_success());
        assert_eq!(status.code(), 1);

        let user = repo.find_by_user_name("TEST@X.COM").await.unwrap().unwrap();
        assert_eq!(user.first_name, "Test");
        assert!(user.has_role(RoleName::User));
        assert!(!user.has_role(RoleName::Admin));
        assert!(user.identity.lockout_enabled);
    }

    #[tokio::test]
    async fn test_password_mismatch_creates_nothing() {
        let (repo, config) = seeded(config()).await;

        let mut input = registration("test@x.com", "test@x.com", "Test#1234", "user");
        input.password_confirm = "Test#12345".to_string();
        let status = register(&repo, &config, input).await;

        assert_eq!(status.kind, StatusKind::PasswordMismatch);
        assert_eq!(status.code(), 0);
        assert!(UserRepository::list(&*repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_is_case_insensitive() {
        let (repo, config) = seeded(config()).await;

        let first = register(
            &repo,
            &config,
            registration("alice", "alice@x.com", "Test#1234", "user"),
        )
        .await;
        assert!(first.is_success());

        let by_name = register(
            &repo,
            &config,
            registration("ALICE", "other@x.com", "Test#1234", "user"),
        )
        .await;
        assert_eq!(by_name.kind, StatusKind::DuplicateUser);

        let by_email = register(
            &repo,
            &config,
            registration("bob", "Alice@X.com", "Test#1234", "user"),
        )
        .await;
        assert_eq!(by_email.kind, StatusKind::DuplicateUser);

        assert_eq!(UserRepository::list(&*repo).await.unwrap().len(), 1);
    }

    /// Store view that skips the existence pre-check, as when a concurrent
    /// registration commits between the check and the insert
    struct LateCheckStore(Arc<MemoryIdentityRepository>);

    impl UserRepository for LateCheckStore {
        async fn create(&self, user: &User) -> AuthResult<()> {
            self.0.create(user).await
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            UserRepository::find_by_id(&*self.0, user_id).await
        }

        async fn find_by_user_name(&self, normalized: &str) -> AuthResult<Option<User>> {
            self.0.find_by_user_name(normalized).await
        }

        async fn exists_by_user_name_or_email(
            &self,
            _user_name: &UserName,
            _email: &Email,
        ) -> AuthResult<bool> {
            Ok(false)
        }

        async fn update(&self, user: &mut User) -> AuthResult<()> {
            self.0.update(user).await
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            UserRepository::list(&*self.0).await
        }
    }

    #[tokio::test]
    async fn test_insert_race_is_reported_as_duplicate() {
        let (repo, config) = seeded(config()).await;
        let use_case = RegisterUseCase::new(Arc::new(LateCheckStore(repo.clone())), config);

        let first = use_case
            .execute(registration("mona", "mona@x.com", "Test#1234", "user"))
            .await
            .unwrap();
        assert!(first.is_success());

        let second = use_case
            .execute(registration("MONA", "mona2@x.com", "Test#1234", "user"))
            .await
            .unwrap();
        assert_eq!(second.kind, StatusKind::DuplicateUser);
        assert_eq!(second.code(), 0);

        let users = UserRepository::list(&*repo).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].identity.email.normalized(), "MONA@X.COM");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_create_one_user() {
        let (repo, config) = seeded(config()).await;

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let use_case = RegisterUseCase::new(repo.clone(), config.clone());
                tokio::spawn(async move {
                    use_case
                        .execute(registration(
                            "nora",
                            &format!("nora{i}@x.com"),
                            "Test#1234",
                            "user",
                        ))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            let status = handle.await.unwrap().unwrap();
            if status.is_success() {
                successes += 1;
            } else {
                assert_eq!(status.kind, StatusKind::DuplicateUser);
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(UserRepository::list(&*repo).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role() {
        let (repo, config) = seeded(config()).await;

        let status = register(
            &repo,
            &config,
            registration("carol", "carol@x.com", "Test#1234", "moderator"),
        )
        .await;

        assert_eq!(status.kind, StatusKind::UnknownRole);
        assert_eq!(status.field, Some("Role"));
    }

    #[tokio::test]
    async fn test_role_is_case_insensitive() {
        let (repo, config) = seeded(config()).await;

        let status = register(
            &repo,
            &config,
            registration("dave", "dave@x.com", "Test#1234", "SuperAdmin"),
        )
        .await;
        assert!(status.is_success());

        let user = repo.find_by_user_name("DAVE").await.unwrap().unwrap();
        assert!(user.has_role(RoleName::SuperAdmin));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let (repo, config) = seeded(config()).await;

        let status = register(
            &repo,
            &config,
            registration("erin", "erin@x.com", "password", "user"),
        )
        .await;

        assert_eq!(status.kind, StatusKind::InvalidInput);
        assert_eq!(status.field, Some("Password"));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let (repo, config) = seeded(config()).await;

        let status = register(
            &repo,
            &config,
            registration("frank", "frank-at-x", "Test#1234", "user"),
        )
        .await;

        assert_eq!(status.kind, StatusKind::InvalidInput);
        assert_eq!(status.field, Some("Email"));
    }
}

#[cfg(test)]
mod login_tests {
    use std::time::Duration;

    use super::support::*;
    use crate::application::config::LockoutOptions;
    use crate::application::{
        CheckSessionUseCase, LoginInput, LoginUseCase, LogoutUseCase, StatusKind,
    };
    use crate::domain::repository::UserRepository;
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_login_success_creates_session() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("validUsername", "valid@x.com", "Valid#1234", "user"),
        )
        .await;

        let output = login(&repo, &config, "validUsername", "Valid#1234").await;
        assert_eq!(output.status.code(), 1);
        let token = output.session_token.unwrap();

        let current = CheckSessionUseCase::new(repo.clone(), config.clone())
            .execute(&token)
            .await
            .unwrap();
        assert_eq!(current.user_name, "validUsername");
        assert!(!current.is_admin_or_higher());
    }

    #[tokio::test]
    async fn test_login_user_name_is_case_insensitive() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("validUsername", "valid@x.com", "Valid#1234", "user"),
        )
        .await;

        let output = login(&repo, &config, "VALIDUSERNAME", "Valid#1234").await;
        assert!(output.status.is_success());
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("validUsername", "valid@x.com", "Valid#1234", "user"),
        )
        .await;

        let unknown = login(&repo, &config, "invalidUsername", "invalidPassword").await;
        let wrong = login(&repo, &config, "validUsername", "invalidPassword").await;

        assert_eq!(unknown.status.code(), 0);
        assert_eq!(wrong.status.code(), 0);
        assert_eq!(unknown.status, wrong.status);
        assert!(unknown.session_token.is_none());
        assert!(wrong.session_token.is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_counts_failures() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("gina", "gina@x.com", "Valid#1234", "user"),
        )
        .await;

        login(&repo, &config, "gina", "nope").await;
        login(&repo, &config, "gina", "nope").await;
        let user = repo.find_by_user_name("GINA").await.unwrap().unwrap();
        assert_eq!(user.identity.access_failed_count, 2);

        assert!(login(&repo, &config, "gina", "Valid#1234").await.status.is_success());
        let user = repo.find_by_user_name("GINA").await.unwrap().unwrap();
        assert_eq!(user.identity.access_failed_count, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_wrong_passwords_are_all_counted() {
        let (repo, config) = seeded(crate::application::AuthConfig {
            lockout: LockoutOptions {
                max_failed_access_attempts: 10,
                ..LockoutOptions::default()
            },
            ..config()
        })
        .await;
        register(
            &repo,
            &config,
            registration("ivan", "ivan@x.com", "Valid#1234", "user"),
        )
        .await;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let use_case = LoginUseCase::new(repo.clone(), repo.clone(), config.clone());
                tokio::spawn(async move {
                    use_case
                        .execute(LoginInput {
                            user_name: "ivan".to_string(),
                            password: "wrong".to_string(),
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            let output = handle.await.unwrap().unwrap();
            assert_eq!(output.status.kind, StatusKind::InvalidCredentials);
            assert_eq!(output.status.code(), 0);
        }

        let user = repo.find_by_user_name("IVAN").await.unwrap().unwrap();
        assert_eq!(user.identity.access_failed_count, 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_successful_logins_all_get_sessions() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("olga", "olga@x.com", "Valid#1234", "user"),
        )
        .await;
        login(&repo, &config, "olga", "wrong").await;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let use_case = LoginUseCase::new(repo.clone(), repo.clone(), config.clone());
                tokio::spawn(async move {
                    use_case
                        .execute(LoginInput {
                            user_name: "olga".to_string(),
                            password: "Valid#1234".to_string(),
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            let output = handle.await.unwrap().unwrap();
            assert!(output.status.is_success());
            assert!(output.session_token.is_some());
        }

        let user = repo.find_by_user_name("OLGA").await.unwrap().unwrap();
        assert_eq!(user.identity.access_failed_count, 0);
    }

    #[tokio::test]
    async fn test_lockout_after_max_failures() {
        let (repo, config) = seeded(crate::application::AuthConfig {
            lockout: LockoutOptions {
                max_failed_access_attempts: 3,
                lockout_duration: Duration::from_secs(600),
                allowed_for_new_users: true,
            },
            ..config()
        })
        .await;
        register(
            &repo,
            &config,
            registration("hank", "hank@x.com", "Valid#1234", "user"),
        )
        .await;

        assert_eq!(
            login(&repo, &config, "hank", "bad").await.status.kind,
            StatusKind::InvalidCredentials
        );
        login(&repo, &config, "hank", "bad").await;
        assert_eq!(
            login(&repo, &config, "hank", "bad").await.status.kind,
            StatusKind::LockedOut
        );

        // Correct password is refused while locked
        let output = login(&repo, &config, "hank", "Valid#1234").await;
        assert_eq!(output.status.kind, StatusKind::LockedOut);
        assert!(output.session_token.is_none());

        let user = repo.find_by_user_name("HANK").await.unwrap().unwrap();
        assert!(user.identity.lockout_end.is_some());
        assert_eq!(user.identity.access_failed_count, 0);
    }

    #[tokio::test]
    async fn test_lockout_disabled_for_new_users() {
        let (repo, config) = seeded(crate::application::AuthConfig {
            lockout: LockoutOptions {
                max_failed_access_attempts: 1,
                allowed_for_new_users: false,
                ..LockoutOptions::default()
            },
            ..config()
        })
        .await;
        register(
            &repo,
            &config,
            registration("ivy", "ivy@x.com", "Valid#1234", "user"),
        )
        .await;

        login(&repo, &config, "ivy", "bad").await;
        login(&repo, &config, "ivy", "bad").await;
        assert!(login(&repo, &config, "ivy", "Valid#1234").await.status.is_success());
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("jack", "jack@x.com", "Valid#1234", "user"),
        )
        .await;
        let token = login(&repo, &config, "jack", "Valid#1234")
            .await
            .session_token
            .unwrap();

        LogoutUseCase::new(repo.clone(), config.clone())
            .execute(Some(&token))
            .await
            .unwrap();

        let result = CheckSessionUseCase::new(repo.clone(), config.clone())
            .execute(&token)
            .await;
        assert!(matches!(result, Err(AuthError::SessionInvalid)));
    }

    #[tokio::test]
    async fn test_logout_without_session_succeeds() {
        let (repo, config) = seeded(config()).await;
        let use_case = LogoutUseCase::new(repo.clone(), config.clone());
        assert!(use_case.execute(None).await.is_ok());
        assert!(use_case.execute(Some("forged.token")).await.is_ok());
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("kate", "kate@x.com", "Valid#1234", "user"),
        )
        .await;

        let mut first = repo.find_by_user_name("KATE").await.unwrap().unwrap();
        let mut stale = first.clone();

        first.first_name = "Katherine".to_string();
        repo.update(&mut first).await.unwrap();

        stale.last_name = "Other".to_string();
        let result = repo.update(&mut stale).await;
        assert!(matches!(result, Err(AuthError::ConcurrencyFailure)));
    }
}

#[cfg(test)]
mod change_password_tests {
    use super::support::*;
    use crate::application::{
        ChangePasswordInput, ChangePasswordUseCase, CheckSessionUseCase, StatusKind,
    };

    fn input(current: &str, new: &str, confirm: &str) -> ChangePasswordInput {
        ChangePasswordInput {
            current_password: current.to_string(),
            new_password: new.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_change_password_revokes_other_sessions() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("liam", "liam@x.com", "Valid#1234", "user"),
        )
        .await;

        let token_a = login(&repo, &config, "liam", "Valid#1234")
            .await
            .session_token
            .unwrap();
        let token_b = login(&repo, &config, "liam", "Valid#1234")
            .await
            .session_token
            .unwrap();

        let check = CheckSessionUseCase::new(repo.clone(), config.clone());
        let current = check.execute(&token_a).await.unwrap();

        let status = ChangePasswordUseCase::new(repo.clone(), repo.clone(), config.clone())
            .execute(&current, input("Valid#1234", "Newer#5678", "Newer#5678"))
            .await
            .unwrap();
        assert!(status.is_success());

        assert!(check.execute(&token_a).await.is_ok());
        assert!(check.execute(&token_b).await.is_err());

        assert_eq!(login(&repo, &config, "liam", "Valid#1234").await.status.code(), 0);
        assert_eq!(login(&repo, &config, "liam", "Newer#5678").await.status.code(), 1);
    }

    #[tokio::test]
    async fn test_change_password_failures() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("mia", "mia@x.com", "Valid#1234", "user"),
        )
        .await;
        let token = login(&repo, &config, "mia", "Valid#1234")
            .await
            .session_token
            .unwrap();
        let current = CheckSessionUseCase::new(repo.clone(), config.clone())
            .execute(&token)
            .await
            .unwrap();
        let use_case = ChangePasswordUseCase::new(repo.clone(), repo.clone(), config.clone());

        let mismatch = use_case
            .execute(&current, input("Valid#1234", "Newer#5678", "Newer#0000"))
            .await
            .unwrap();
        assert_eq!(mismatch.kind, StatusKind::PasswordMismatch);

        let wrong = use_case
            .execute(&current, input("Wrong#1234", "Newer#5678", "Newer#5678"))
            .await
            .unwrap();
        assert_eq!(wrong.kind, StatusKind::InvalidCredentials);
        assert_eq!(wrong.field, Some("CurrentPassword"));

        let weak = use_case
            .execute(&current, input("Valid#1234", "short", "short"))
            .await
            .unwrap();
        assert_eq!(weak.kind, StatusKind::InvalidInput);
        assert_eq!(weak.field, Some("NewPassword"));
    }
}

#[cfg(test)]
mod role_tests {
    use super::support::*;
    use crate::application::{CheckSessionUseCase, ManageRolesUseCase, StatusKind};
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::role_name::RoleName;
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_grant_and_revoke() {
        let (repo, config) = seeded(config()).await;
        register(
            &repo,
            &config,
            registration("nora", "nora@x.com", "Valid#1234", "user"),
        )
        .await;
        let token = login(&repo, &config, "nora", "Valid#1234")
            .await
            .session_token
            .unwrap();

        let use_case = ManageRolesUseCase::new(repo.clone(), repo.clone(), repo.clone());

        let status = use_case.grant("nora", "admin").await.unwrap();
        assert!(status.is_success());
        let user = repo.find_by_user_name("NORA").await.unwrap().unwrap();
        assert!(user.has_role(RoleName::Admin));

        // Existing sessions carry the old role set and are revoked
        let check = CheckSessionUseCase::new(repo.clone(), config.clone());
        assert!(check.execute(&token).await.is_err());

        let token = login(&repo, &config, "nora", "Valid#1234")
            .await
            .session_token
            .unwrap();
        assert!(check.execute(&token).await.unwrap().is_admin_or_higher());

        let status = use_case.revoke("nora", "Admin").await.unwrap();
        assert!(status.is_success());
        let user = repo.find_by_user_name("NORA").await.unwrap().unwrap();
        assert!(!user.has_role(RoleName::Admin));
    }

    #[tokio::test]
    async fn test_unknown_user_and_role() {
        let (repo, _config) = seeded(config()).await;
        let use_case = ManageRolesUseCase::new(repo.clone(), repo.clone(), repo.clone());

        let result = use_case.grant("nobody", "admin").await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));

        let status = use_case.grant("nobody", "moderator").await.unwrap();
        assert_eq!(status.kind, StatusKind::UnknownRole);
    }
}

#[cfg(test)]
mod seed_tests {
    use super::support::*;
    use crate::application::{AuthConfig, DEMO_USERS, SeedIdentityUseCase};
    use crate::domain::repository::{RoleRepository, UserRepository};
    use crate::domain::value_object::role_name::RoleName;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let (repo, config) = seeded(AuthConfig::development()).await;

        assert_eq!(RoleRepository::list(&*repo).await.unwrap().len(), 3);
        assert_eq!(UserRepository::list(&*repo).await.unwrap().len(), 3);

        let report = SeedIdentityUseCase::new(repo.clone(), repo.clone(), config.clone())
            .execute()
            .await
            .unwrap();
        assert_eq!(report.roles_created, 0);
        assert_eq!(report.users_created, 0);

        assert_eq!(RoleRepository::list(&*repo).await.unwrap().len(), 3);
        assert_eq!(UserRepository::list(&*repo).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_roles_only_without_demo_users() {
        let (repo, _config) = seeded(config()).await;

        assert_eq!(RoleRepository::list(&*repo).await.unwrap().len(), 3);
        assert!(UserRepository::list(&*repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_demo_users_roles_and_login() {
        let (repo, config) = seeded(AuthConfig::development()).await;

        let super_admin = repo.find_by_id(&DEMO_USERS[0].id).await.unwrap().unwrap();
        assert_eq!(super_admin.roles.len(), 3);

        let admin = repo
            .find_by_user_name("ADMIN@EXAMPLE.COM")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.has_role(RoleName::Admin));
        assert!(admin.has_role(RoleName::User));
        assert!(!admin.has_role(RoleName::SuperAdmin));

        let output = login(
            &repo,
            &config,
            "SuperAdmin@Example.com",
            &config.demo_user_password,
        )
        .await;
        assert!(output.status.is_success());
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::AuthConfig;
    use crate::infra::memory::MemoryIdentityRepository;
    use crate::presentation::router::auth_router_generic;

    async fn app() -> (Router, Arc<MemoryIdentityRepository>, Arc<AuthConfig>) {
        let (repo, config) = seeded(AuthConfig::development()).await;
        (
            auth_router_generic(repo.clone(), config.clone()),
            repo,
            config,
        )
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_cookie(mut req: Request<Body>, cookie: &str) -> Request<Body> {
        req.headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        req
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    /// `name=value` part of the Set-Cookie header
    async fn login_cookie(app: &Router, user_name: &str, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(form(
                "/Login",
                &format!("Username={user_name}&Password={password}"),
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/Home/Index");
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_get_forms() {
        let (app, _, _) = app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/Registration")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["view"], "UserAuthentication/Registration");
        assert!(json["model"].get("Password").is_none());
    }

    #[tokio::test]
    async fn test_registration_redirects_to_login() {
        let (app, _, _) = app().await;

        let response = app
            .oneshot(form(
                "/Registration",
                "FirstName=Test&LastName=User&Username=test%40x.com&Email=test%40x.com\
                 &Password=Test%231234&PasswordConfirm=Test%231234&Role=user",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/UserAuthentication/Login");
    }

    #[tokio::test]
    async fn test_registration_missing_fields_rerenders() {
        let (app, repo, _) = app().await;

        let response = app
            .oneshot(form("/Registration", "FirstName=Test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["model"]["FirstName"], "Test");
        assert!(json["errors"].get("FirstName").is_none());
        assert_eq!(
            json["errors"]["LastName"][0],
            "The LastName field is required."
        );
        assert_eq!(json["errors"]["Role"][0], "The Role field is required.");

        // Only the seeded demo users exist
        let users = crate::domain::repository::UserRepository::list(&*repo)
            .await
            .unwrap();
        assert_eq!(users.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_registration_shows_form_error() {
        let (app, _, _) = app().await;

        let response = app
            .oneshot(form(
                "/Registration",
                "FirstName=A&LastName=B&Username=admin%40example.com&Email=new%40x.com\
                 &Password=Test%231234&PasswordConfirm=Test%231234&Role=user",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"][""][0], "User already exists");
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let (app, _, config) = app().await;
        let password = config.demo_user_password.replace('#', "%23");

        let cookie = login_cookie(&app, "user%40example.com", &password).await;
        assert!(cookie.starts_with("auth_session="));

        let response = app
            .oneshot(form(
                "/Login",
                "Username=invalidUsername&Password=invalidPassword",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/UserAuthentication/Login");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_protected_route_redirects_without_session() {
        let (app, _, _) = app().await;

        let response = app
            .oneshot(form("/GrantRole", "Username=user%40example.com&Role=admin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/UserAuthentication/Login");
    }

    #[tokio::test]
    async fn test_grant_role_requires_super_admin() {
        let (app, _, config) = app().await;
        let password = config.demo_user_password.replace('#', "%23");

        let admin = login_cookie(&app, "admin%40example.com", &password).await;
        let response = app
            .clone()
            .oneshot(with_cookie(
                form("/GrantRole", "Username=user%40example.com&Role=admin"),
                &admin,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let super_admin = login_cookie(&app, "superadmin%40example.com", &password).await;
        let response = app
            .clone()
            .oneshot(with_cookie(
                form("/GrantRole", "Username=user%40example.com&Role=admin"),
                &super_admin,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(with_cookie(
                form("/RevokeRole", "Username=nobody&Role=admin"),
                &super_admin,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let (app, _, config) = app().await;
        let password = config.demo_user_password.replace('#', "%23");
        let cookie = login_cookie(&app, "user%40example.com", &password).await;

        let response = app
            .clone()
            .oneshot(with_cookie(
                Request::builder()
                    .uri("/Logout")
                    .body(Body::empty())
                    .unwrap(),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/UserAuthentication/Login");
        let cleared = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));

        // The old cookie no longer opens protected routes
        let response = app
            .oneshot(with_cookie(
                Request::builder()
                    .uri("/ChangePassword")
                    .body(Body::empty())
                    .unwrap(),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/UserAuthentication/Login");
    }
}
