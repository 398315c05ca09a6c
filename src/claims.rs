use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::SerializeDisplay;
use std::fmt;

/// A JSON object.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// The state of a user or an organization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, SerializeDisplay)]
pub enum Status {
    /// No status is sent.
    #[default]
    Unspecified,

    /// The user or organization is active.
    Active,

    /// Authentication attempts for a deleted user or organization are refused.
    Deleted,
}

impl Status {
    /// Check whether this status is unspecified.
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Unspecified => "",
            Self::Active => "active",
            Self::Deleted => "deleted",
        };
        write!(f, "{text}")
    }
}

/// The information about a user that is synced to the platform.
///
/// Every field other than `email` is optional and is left out of the token when unset or empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserDetails {
    /// The user's email address. Required.
    pub email: String,

    /// The user's display name.
    #[serde(skip_serializing_if = "is_blank")]
    pub name: Option<String>,

    /// A URL pointing to the user's profile picture.
    #[serde(skip_serializing_if = "is_blank")]
    pub profile_picture_url: Option<String>,

    /// The user's status.
    #[serde(skip_serializing_if = "Status::is_unspecified")]
    pub status: Status,

    /// Legacy first name, accepted for compatibility but never sent.
    #[serde(skip)]
    pub first_name: Option<String>,

    /// Legacy last name, accepted for compatibility but never sent.
    #[serde(skip)]
    pub last_name: Option<String>,

    /// Arbitrary metadata attached to the user.
    #[serde(skip_serializing_if = "JsonObject::is_empty")]
    pub metadata: JsonObject,
}

impl UserDetails {
    /// Construct the details for the user with the given email.
    pub fn new<T: Into<String>>(email: T) -> Self {
        Self { email: email.into(), ..Default::default() }
    }

    /// Set the user's display name.
    pub fn name<T: Into<String>>(mut self, name: T) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the user's profile picture URL.
    pub fn profile_picture_url<T: Into<String>>(mut self, url: T) -> Self {
        self.profile_picture_url = Some(url.into());
        self
    }

    /// Set the user's status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the user's metadata.
    pub fn metadata(mut self, metadata: JsonObject) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the legacy first and last name fields.
    ///
    /// These are accepted so older callers keep working but they are not included in tokens.
    pub fn legacy_names<F: Into<String>, L: Into<String>>(mut self, first_name: F, last_name: L) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }
}

/// The information about an organization that is synced to the platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OrganizationDetails {
    /// The organization's name. Required.
    pub name: String,

    /// The organization's status.
    #[serde(skip_serializing_if = "Status::is_unspecified")]
    pub status: Status,

    /// The identifiers of the users that belong to this organization, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

impl OrganizationDetails {
    /// Construct the details for the organization with the given name.
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Set the organization's status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the organization's members.
    pub fn members<I, T>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }
}

/// The data carried by a client token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientTokenData {
    /// The user's identifier. Required.
    pub user_id: String,

    /// The organization's identifier. Required.
    pub organization_id: String,

    /// The user's profile, synced when present.
    pub user_details: Option<UserDetails>,

    /// The organization's profile, synced when present.
    pub organization_details: Option<OrganizationDetails>,
}

impl ClientTokenData {
    /// Construct the data for the given user within the given organization.
    pub fn new<U: Into<String>, O: Into<String>>(user_id: U, organization_id: O) -> Self {
        Self { user_id: user_id.into(), organization_id: organization_id.into(), ..Default::default() }
    }

    /// Attach the user's profile.
    pub fn user_details(mut self, details: UserDetails) -> Self {
        self.user_details = Some(details);
        self
    }

    /// Attach the organization's profile.
    pub fn organization_details(mut self, details: OrganizationDetails) -> Self {
        self.organization_details = Some(details);
        self
    }
}

/// The claim keys used for the organization in client tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClaimNaming {
    /// `organization_id` and `organization_details`.
    #[default]
    Organization,

    /// `group_id` and `group_details`.
    Group,
}

// The claim structs below declare their fields sorted by key so the encoded payloads are too.

/// The claims in a server token.
#[derive(Debug, Serialize)]
pub(crate) struct ServerClaims<'a> {
    pub(crate) app_id: &'a str,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub(crate) expires_at: DateTime<Utc>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub(crate) issued_at: DateTime<Utc>,
}

/// The claims in an application management token.
#[derive(Debug, Serialize)]
pub(crate) struct ApplicationManagementClaims<'a> {
    pub(crate) customer_id: &'a str,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub(crate) expires_at: DateTime<Utc>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub(crate) issued_at: DateTime<Utc>,
}

/// The claims in a client token.
///
/// Only one of the `group_*` and `organization_*` pairs is ever populated.
#[derive(Debug, Serialize)]
pub(crate) struct ClientClaims<'a> {
    pub(crate) app_id: &'a str,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub(crate) expires_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) group_details: Option<&'a OrganizationDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) group_id: Option<&'a str>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub(crate) issued_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) organization_details: Option<&'a OrganizationDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) organization_id: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user_details: Option<&'a UserDetails>,

    pub(crate) user_id: &'a str,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}
