//! Accounts that can sign in: applicants, mechanics and managers

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Applicant, Manager, Mechanic};

/// The closed set of account kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Applicant,
    Mechanic,
    Manager,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Applicant => "applicant",
            AccountKind::Mechanic => "mechanic",
            AccountKind::Manager => "manager",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "applicant" => Ok(AccountKind::Applicant),
            "mechanic" => Ok(AccountKind::Mechanic),
            "manager" => Ok(AccountKind::Manager),
            _ => Err(format!("Unknown account kind: {}", s)),
        }
    }
}

/// Row types that can sign in. Each one names its table, so repository code
/// is written once and instantiated per kind.
pub trait Account: Send + Unpin + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> {
    const KIND: AccountKind;
    const TABLE: &'static str;

    fn id(&self) -> i32;
    fn password_hash(&self) -> &str;
    fn into_profile(self) -> Profile;
}

impl Account for Applicant {
    const KIND: AccountKind = AccountKind::Applicant;
    const TABLE: &'static str = "applicants";

    fn id(&self) -> i32 {
        self.id
    }

    fn password_hash(&self) -> &str {
        &self.password
    }

    fn into_profile(self) -> Profile {
        Profile::Applicant(self)
    }
}

impl Account for Mechanic {
    const KIND: AccountKind = AccountKind::Mechanic;
    const TABLE: &'static str = "mechanics";

    fn id(&self) -> i32 {
        self.id
    }

    fn password_hash(&self) -> &str {
        &self.password
    }

    fn into_profile(self) -> Profile {
        Profile::Mechanic(self)
    }
}

impl Account for Manager {
    const KIND: AccountKind = AccountKind::Manager;
    const TABLE: &'static str = "managers";

    fn id(&self) -> i32 {
        self.id
    }

    fn password_hash(&self) -> &str {
        &self.password
    }

    fn into_profile(self) -> Profile {
        Profile::Manager(self)
    }
}

/// Public view of any account, tagged with its kind
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Applicant(Applicant),
    Mechanic(Mechanic),
    Manager(Manager),
}

impl Profile {
    pub fn kind(&self) -> AccountKind {
        match self {
            Profile::Applicant(_) => AccountKind::Applicant,
            Profile::Mechanic(_) => AccountKind::Mechanic,
            Profile::Manager(_) => AccountKind::Manager,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Profile::Applicant(a) => a.id(),
            Profile::Mechanic(m) => m.id(),
            Profile::Manager(m) => m.id(),
        }
    }
}

/// JWT claims for a signed-in account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountClaims {
    /// Account id
    pub sub: i32,
    pub kind: AccountKind,
    pub exp: i64,
    pub iat: i64,
}

impl AccountClaims {
    pub fn new(kind: AccountKind, id: i32, ttl_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: id,
            kind,
            exp: now + (ttl_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub kind: AccountKind,
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    #[schema(value_type = Object)]
    pub account: Profile,
}

/// Photo update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePhoto {
    pub photo: Option<String>,
}
