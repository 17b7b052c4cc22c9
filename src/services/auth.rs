use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use anyhow::{Result, anyhow};
use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, LoginInput, Role, User};
use crate::database::repositories::UserRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub role: Role,
    pub location_ids: Vec<Uuid>, // locations a submitter may enter payroll for
    pub exp: usize,              // expiration time
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_submit(&self) -> bool {
        self.role.can_submit()
    }

    pub fn can_review(&self) -> bool {
        self.role.can_review()
    }

    /// Admins see every location; everyone else only their assignments.
    pub fn has_location(&self, location_id: Uuid) -> bool {
        self.is_admin() || self.location_ids.contains(&location_id)
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if auth_str.starts_with("Bearer ") {
                    let token = &auth_str[7..]; // Remove "Bearer " prefix

                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse> {
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| anyhow!("Invalid email or password"))?;

        if !verify(&request.password, &user.password_hash)? {
            return Err(anyhow!("Invalid email or password"));
        }

        let location_ids = self.user_repository.location_ids_for_user(user.id).await?;
        let token = self.generate_token(&user, &location_ids)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
            location_ids,
        })
    }

    pub fn generate_token(&self, user: &User, location_ids: &[Uuid]) -> Result<String> {
        let expiration = Utc::now() + Duration::days(self.config.jwt_expiration_days);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            location_ids: location_ids.to_vec(),
            exp: expiration.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<Option<User>> {
        self.user_repository.find_by_id(claims.sub).await
    }
}
