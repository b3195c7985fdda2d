//! Account types shared by the session layer and the header.

use serde::{Deserialize, Deserializer, Serialize};

use super::email::Email;
use super::id::UserId;

/// Role the marketplace API assigns to an account.
///
/// Unknown roles deserialize to [`UserRole::Other`] instead of failing, so a
/// new server-side role never locks a user out of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    #[serde(alias = "user")]
    Customer,
    /// Merchant with listings.
    Seller,
    /// Store administrator.
    Admin,
    /// Any role this client does not know about.
    #[serde(other)]
    Other,
}

impl UserRole {
    /// Returns the role as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "seller",
            Self::Admin => "admin",
            Self::Other => "other",
        }
    }

    /// Whether this role may create, edit or delete catalog products.
    #[must_use]
    pub const fn can_manage_products(&self) -> bool {
        matches!(self, Self::Seller | Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user record returned by login and kept with the session.
///
/// Only `id` and `username` are guaranteed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, deserialize_with = "role_or_default")]
    pub role: UserRole,
}

/// A `null` role reads the same as a missing one.
fn role_or_default<'de, D>(deserializer: D) -> Result<UserRole, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<UserRole>::deserialize(deserializer)?.unwrap_or_default())
}
