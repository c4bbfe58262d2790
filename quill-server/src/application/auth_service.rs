use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::{debug, info};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::session::SessionService;

pub(crate) struct AuthService<'r, R: UserRepository> {
    repo: &'r mut R,
    sessions: &'r SessionService,
}

impl<'r, R: UserRepository> AuthService<'r, R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: &'r mut R, sessions: &'r SessionService) -> Self {
        Self { repo, sessions }
    }

    pub(crate) async fn register(&mut self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;
        let password_hash = hash_password(&req.password)?;

        let user = self
            .repo
            .create_user(NewUser {
                username: req.username,
                password_hash,
            })
            .await?;
        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    pub(crate) async fn login(&mut self, req: LoginRequest) -> Result<String, DomainError> {
        let req = req.validate()?;

        let Some(creds) = self.repo.find_by_username(&req.username).await? else {
            // same amount of hashing work whether or not the user exists
            match verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                Ok(()) | Err(DomainError::InvalidCredentials) => {}
                Err(err) => return Err(err),
            }
            return Err(DomainError::InvalidCredentials);
        };

        verify_password(&req.password, &creds.password_hash)?;

        let session_token = self
            .sessions
            .issue(&creds.user)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        info!(user_id = creds.user.id, "user logged in");
        Ok(session_token)
    }

    // bad tokens and tokens of deleted users both resolve to `None`
    pub(crate) async fn current_user(&mut self, token: &str) -> Result<Option<User>, DomainError> {
        let claims = match self.sessions.verify(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(error = %err, "ignoring invalid session token");
                return Ok(None);
            }
        };
        self.repo.find_by_id(claims.user_id).await
    }
}

pub(crate) fn hash_password(raw_password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(password_hash.to_string())
}

pub(crate) fn verify_password(raw_password: &str, password_hash: &str) -> Result<(), DomainError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    argon2()?
        .verify_password(raw_password.as_bytes(), &parsed_hash)
        .map_err(|err| match err {
            PasswordHashError::Password => DomainError::InvalidCredentials,
            _ => DomainError::Unexpected(err.to_string()),
        })
}

fn argon2() -> Result<Argon2<'static>, DomainError> {
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
