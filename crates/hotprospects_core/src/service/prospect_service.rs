//! Prospect use-case service.
//!
//! # Responsibility
//! - Provide add/import/edit/toggle/delete/list entry points for callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - An unknown id is a no-op, never an error.
//! - A malformed scan payload is discarded without touching storage.
//! - Every mutation is visible to the next `list_prospects` call.

use crate::model::prospect::{Prospect, ProspectId, ProspectUpdate};
use crate::repo::prospect_repo::{
    ProspectFilter, ProspectListQuery, ProspectRepository, ProspectSort, RepoError, RepoResult,
};
use crate::scan::{import_scan_result, parse_scan_payload, ScanResult};
use log::{info, warn};

/// Use-case service wrapper for prospect operations.
pub struct ProspectService<R: ProspectRepository> {
    repo: R,
}

impl<R: ProspectRepository> ProspectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new uncontacted prospect and returns it.
    pub fn add_prospect(
        &self,
        name: impl Into<String>,
        email_address: impl Into<String>,
    ) -> RepoResult<Prospect> {
        let prospect = Prospect::new(name, email_address);
        self.repo.create_prospect(&prospect)?;
        info!(
            "event=prospect_add module=service status=ok prospect_id={}",
            prospect.id
        );
        Ok(prospect)
    }

    /// Imports a decoded `"name\nemail"` payload.
    ///
    /// Returns `Ok(None)` when the payload is malformed.
    pub fn import_scan(&self, raw: &str) -> RepoResult<Option<Prospect>> {
        match parse_scan_payload(raw) {
            Ok(prospect) => self.insert_scanned(prospect).map(Some),
            Err(err) => {
                warn!("event=scan_import module=service status=skip reason={err}");
                Ok(None)
            }
        }
    }

    /// Imports a scanner outcome; scanner failures are a no-op.
    pub fn import_scan_result(&self, result: &ScanResult) -> RepoResult<Option<Prospect>> {
        match import_scan_result(result) {
            Ok(prospect) => self.insert_scanned(prospect).map(Some),
            Err(err) => {
                warn!("event=scan_import module=service status=skip reason={err}");
                Ok(None)
            }
        }
    }

    /// Gets one prospect by stable ID.
    pub fn get_prospect(&self, id: ProspectId) -> RepoResult<Option<Prospect>> {
        self.repo.get_prospect(id)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Returns `Ok(None)` when the prospect does not exist.
    pub fn update_prospect(
        &self,
        id: ProspectId,
        update: &ProspectUpdate,
    ) -> RepoResult<Option<Prospect>> {
        let Some(mut prospect) = self.repo.get_prospect(id)? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(prospect));
        }

        prospect.apply(update);
        match self.repo.update_prospect(&prospect) {
            Ok(()) => Ok(Some(prospect)),
            Err(RepoError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Flips the contacted flag and returns the new value.
    ///
    /// Returns `Ok(None)` when the prospect does not exist.
    pub fn toggle_contacted(&self, id: ProspectId) -> RepoResult<Option<bool>> {
        let Some(mut prospect) = self.repo.get_prospect(id)? else {
            return Ok(None);
        };
        let is_contacted = prospect.toggle_contacted();
        ignore_not_found(self.repo.set_contacted(id, is_contacted))
            .map(|found| found.then_some(is_contacted))
    }

    /// Sets the contacted flag; returns whether the prospect existed.
    pub fn set_contacted(&self, id: ProspectId, is_contacted: bool) -> RepoResult<bool> {
        ignore_not_found(self.repo.set_contacted(id, is_contacted))
    }

    /// Deletes one prospect; returns whether it existed.
    pub fn delete_prospect(&self, id: ProspectId) -> RepoResult<bool> {
        let found = ignore_not_found(self.repo.delete_prospect(id))?;
        info!(
            "event=prospect_delete module=service status={} prospect_id={}",
            if found { "ok" } else { "skip" },
            id
        );
        Ok(found)
    }

    /// Deletes a selection of prospects; returns how many were removed.
    pub fn delete_prospects(&self, ids: &[ProspectId]) -> RepoResult<usize> {
        let removed = self.repo.delete_prospects(ids)?;
        info!(
            "event=prospect_delete_many module=service status=ok requested={} removed={}",
            ids.len(),
            removed
        );
        Ok(removed)
    }

    /// Lists prospects matching `filter` in `sort` order.
    pub fn list_prospects(
        &self,
        filter: ProspectFilter,
        sort: ProspectSort,
    ) -> RepoResult<Vec<Prospect>> {
        self.repo.list_prospects(&ProspectListQuery { filter, sort })
    }

    fn insert_scanned(&self, prospect: Prospect) -> RepoResult<Prospect> {
        self.repo.create_prospect(&prospect)?;
        info!(
            "event=scan_import module=service status=ok prospect_id={}",
            prospect.id
        );
        Ok(prospect)
    }
}

fn ignore_not_found(result: RepoResult<()>) -> RepoResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(RepoError::NotFound(_)) => Ok(false),
        Err(err) => Err(err),
    }
}
