// Login pipeline: ordered steps executed against a shared context.
// The first step to fail aborts the run; later steps never execute.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use async_trait::async_trait;
use thiserror::Error;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::user::{User, UserStore};

/// Password marker that can never be verified. Stored on retired accounts;
/// it is not a valid PHC string, so verification fails structurally.
pub const UNUSABLE_PASSWORD: &str = "!";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    AuthFailed(String),

    #[error("{0}")]
    Internal(String),
}

/// Shared state threaded through the pipeline. Steps read what earlier steps
/// produced and write their own augmentation.
#[derive(Debug, Default)]
pub struct PipelineContext {
    pub username: String,
    pub password: String,
    /// Claims of any bearer token presented alongside the login attempt.
    pub session: Option<Claims>,
    /// Populated by credential validation.
    pub user: Option<User>,
    /// Populated by session issuance.
    pub token: Option<String>,
}

impl PipelineContext {
    pub fn new(username: String, password: String, session: Option<Claims>) -> Self {
        Self {
            username,
            password,
            session,
            user: None,
            token: None,
        }
    }
}

#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// Step name for logging and debugging
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError>;
}

/// First step of every login run: refuse to authenticate while the current
/// session is impersonating another user. Pure guard; on success it
/// contributes nothing to the context.
pub struct ForbidHijack;

#[async_trait]
impl PipelineStep for ForbidHijack {
    fn name(&self) -> &'static str {
        "forbid_hijack"
    }

    async fn execute(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        if let Some(session) = &ctx.session {
            if session.hijacked {
                return Err(PipelineError::AuthFailed(
                    "Cannot authenticate while hijacking another user".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Looks up the user and verifies the password. Inactive accounts and
/// unusable passwords fail the same way as a wrong password.
pub struct ValidateCredentials {
    store: UserStore,
}

impl ValidateCredentials {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PipelineStep for ValidateCredentials {
    fn name(&self) -> &'static str {
        "validate_credentials"
    }

    async fn execute(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let user = self
            .store
            .find_by_username(&ctx.username)
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))?
            .ok_or_else(|| PipelineError::AuthFailed("Invalid credentials".to_string()))?;

        if !user.is_active || !verify_password(&ctx.password, &user.password_hash) {
            return Err(PipelineError::AuthFailed("Invalid credentials".to_string()));
        }

        ctx.user = Some(user);
        Ok(())
    }
}

/// Issues the session token for the validated user.
pub struct IssueSession;

#[async_trait]
impl PipelineStep for IssueSession {
    fn name(&self) -> &'static str {
        "issue_session"
    }

    async fn execute(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let user = ctx
            .user
            .as_ref()
            .ok_or_else(|| PipelineError::Internal("no validated user in context".to_string()))?;

        let claims = Claims::new(user.id, user.username.clone(), user.is_staff);
        let token = generate_jwt(&claims).map_err(|e| PipelineError::Internal(e.to_string()))?;

        ctx.token = Some(token);
        Ok(())
    }
}

/// Executes registered steps in order, stopping at the first failure.
pub struct LoginPipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl LoginPipeline {
    /// Standard pipeline: hijack guard first, then credentials, then issuance.
    pub fn standard(store: UserStore) -> Self {
        Self {
            steps: vec![
                Box::new(ForbidHijack),
                Box::new(ValidateCredentials::new(store)),
                Box::new(IssueSession),
            ],
        }
    }

    pub fn with_steps(steps: Vec<Box<dyn PipelineStep>>) -> Self {
        Self { steps }
    }

    pub async fn run(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        for step in &self.steps {
            tracing::debug!("Login pipeline step: {}", step.name());
            if let Err(e) = step.execute(ctx).await {
                tracing::info!("Login pipeline halted at '{}': {}", step.name(), e);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Verify a password against a stored argon2 hash. The unusable marker and
/// any other malformed hash verify as false.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::SaltString;
    use argon2::PasswordHasher;
    use rand_core::OsRng;
    use uuid::Uuid;

    fn hijacked_session() -> Claims {
        Claims::hijacked(Uuid::new_v4(), "target".into(), false, "admin".into())
    }

    #[tokio::test]
    async fn hijacked_session_fails_fast() {
        let mut ctx =
            PipelineContext::new("target".into(), "pw".into(), Some(hijacked_session()));

        let err = ForbidHijack.execute(&mut ctx).await.unwrap_err();
        assert!(matches!(err, PipelineError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn normal_session_passes_with_empty_augmentation() {
        let session = Claims::new(Uuid::new_v4(), "alice".into(), false);
        let mut ctx = PipelineContext::new("alice".into(), "pw".into(), Some(session));

        ForbidHijack.execute(&mut ctx).await.unwrap();
        // Guard contributes nothing and mutates nothing.
        assert!(ctx.user.is_none());
        assert!(ctx.token.is_none());
        assert_eq!(ctx.username, "alice");
    }

    #[tokio::test]
    async fn anonymous_login_passes_the_guard() {
        let mut ctx = PipelineContext::new("alice".into(), "pw".into(), None);
        assert!(ForbidHijack.execute(&mut ctx).await.is_ok());
    }

    #[tokio::test]
    async fn pipeline_halts_before_later_steps_when_hijacked() {
        struct MustNotRun;

        #[async_trait]
        impl PipelineStep for MustNotRun {
            fn name(&self) -> &'static str {
                "must_not_run"
            }

            async fn execute(&self, _ctx: &mut PipelineContext) -> Result<(), PipelineError> {
                panic!("step after the hijack guard must never execute");
            }
        }

        let pipeline =
            LoginPipeline::with_steps(vec![Box::new(ForbidHijack), Box::new(MustNotRun)]);
        let mut ctx =
            PipelineContext::new("target".into(), "pw".into(), Some(hijacked_session()));

        assert!(pipeline.run(&mut ctx).await.is_err());
        assert!(ctx.token.is_none());
    }

    #[test]
    fn verify_password_accepts_matching_hash() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"correct horse", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn unusable_password_never_verifies() {
        assert!(!verify_password("anything", UNUSABLE_PASSWORD));
        assert!(!verify_password("", UNUSABLE_PASSWORD));
    }
}
