//! User profile and QR self-card use-cases.

use crate::model::profile::UserProfile;
use crate::qr::{self, QrError};
use crate::repo::prospect_repo::{RepoError, RepoResult};
use crate::repo::settings_repo::SettingsRepository;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Settings key holding the profile name.
pub const PROFILE_NAME_KEY: &str = "name";
/// Settings key holding the profile email address.
pub const PROFILE_EMAIL_KEY: &str = "emailAddress";

/// Service error for profile use-cases.
#[derive(Debug)]
pub enum ProfileServiceError {
    Repo(RepoError),
    Qr(QrError),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Qr(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Qr(err) => Some(err),
        }
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<QrError> for ProfileServiceError {
    fn from(value: QrError) -> Self {
        Self::Qr(value)
    }
}

/// Profile service facade over a settings repository.
pub struct ProfileService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the stored profile, falling back to defaults per field.
    pub fn profile(&self) -> RepoResult<UserProfile> {
        let defaults = UserProfile::default();
        Ok(UserProfile {
            name: self
                .repo
                .get_setting(PROFILE_NAME_KEY)?
                .unwrap_or(defaults.name),
            email_address: self
                .repo
                .get_setting(PROFILE_EMAIL_KEY)?
                .unwrap_or(defaults.email_address),
        })
    }

    /// Overwrites both profile fields.
    pub fn update_profile(&self, profile: &UserProfile) -> RepoResult<()> {
        self.repo.set_setting(PROFILE_NAME_KEY, &profile.name)?;
        self.repo
            .set_setting(PROFILE_EMAIL_KEY, &profile.email_address)?;
        Ok(())
    }

    /// Payload encoded into the self-card.
    pub fn qr_payload(&self) -> RepoResult<String> {
        Ok(self.profile()?.qr_payload())
    }

    /// Renders the self-card as PNG bytes.
    pub fn qr_png(&self, min_size: u32) -> Result<Vec<u8>, ProfileServiceError> {
        let payload = self.qr_payload()?;
        Ok(qr::render_png(&payload, min_size)?)
    }
}
