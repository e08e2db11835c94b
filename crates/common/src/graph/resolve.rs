use std::fmt;
use std::str::FromStr;

use crate::identity::AccessToken;

use super::client::GraphClient;
use super::error::GraphError;
use super::models::{Drive, DriveItem};
use super::requests::{GetSite, ListDrives, ListRootChildren};

/// Where a document library lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLocator {
    /// e.g. `contoso.sharepoint.com`
    pub host: String,
    /// e.g. `/sites/legal`
    pub path: String,
    /// e.g. `Documents`
    pub library: String,
}

/// How to pick a drive out of a site's drive listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveSelection {
    /// Only a drive whose name equals the library name.
    Exact,
    /// A drive whose name equals the library name, otherwise the first
    /// listed drive. This can silently pick the wrong library when the
    /// configured name is absent.
    #[default]
    ExactOrFirst,
}

impl DriveSelection {
    pub fn select<'a>(&self, drives: &'a [Drive], library: &str) -> Option<&'a Drive> {
        let exact = drives.iter().find(|drive| drive.name == library);
        match self {
            DriveSelection::Exact => exact,
            DriveSelection::ExactOrFirst => exact.or_else(|| drives.first()),
        }
    }
}

impl FromStr for DriveSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(DriveSelection::Exact),
            "exact-or-first" | "exact_or_first" => Ok(DriveSelection::ExactOrFirst),
            other => Err(format!(
                "unknown drive selection '{}', expected 'exact' or 'exact-or-first'",
                other
            )),
        }
    }
}

impl fmt::Display for DriveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveSelection::Exact => f.write_str("exact"),
            DriveSelection::ExactOrFirst => f.write_str("exact-or-first"),
        }
    }
}

impl GraphClient {
    pub async fn resolve_site_id(
        &self,
        token: &AccessToken,
        locator: &SiteLocator,
    ) -> Result<String, GraphError> {
        let site = self
            .call(
                token,
                GetSite {
                    host: locator.host.clone(),
                    path: locator.path.clone(),
                },
            )
            .await?;
        tracing::debug!(site_id = %site.id, "resolved site");
        Ok(site.id)
    }

    /// Resolve the site, then pick its document library per `selection`.
    pub async fn resolve_drive(
        &self,
        token: &AccessToken,
        locator: &SiteLocator,
        selection: DriveSelection,
    ) -> Result<Drive, GraphError> {
        let site_id = self.resolve_site_id(token, locator).await?;
        let drives = self.call(token, ListDrives { site_id }).await?.value;

        let drive = selection
            .select(&drives, &locator.library)
            .cloned()
            .ok_or_else(|| GraphError::LibraryNotFound(locator.library.clone()))?;

        if drive.name != locator.library {
            tracing::warn!(
                library = %locator.library,
                selected = %drive.name,
                "document library not found, using first listed drive"
            );
        }
        tracing::debug!(drive_id = %drive.id, name = %drive.name, "resolved drive");
        Ok(drive)
    }

    pub async fn list_root_items(
        &self,
        token: &AccessToken,
        drive_id: &str,
    ) -> Result<Vec<DriveItem>, GraphError> {
        let listing = self
            .call(
                token,
                ListRootChildren {
                    drive_id: drive_id.to_string(),
                },
            )
            .await?;
        if listing.next_link.is_some() {
            tracing::warn!(drive_id, "root listing has more pages, only the first is synced");
        }
        Ok(listing.value)
    }
}
