// File: quizkid-core/src/services/kid_service.rs

use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use tracing::info;
use quizkid_common::models::kid::{Guardian, GuardianLink, GuardianRelationship, Kid, KidSettings};
use quizkid_common::traits::repository_traits::{
    GuardianLinkRepository, GuardianRepository, KidRepository,
};
use crate::Error;

/// A kid can have at most this many linked guardians.
pub const MAX_GUARDIANS_PER_KID: usize = 2;

pub struct KidService {
    kid_repo: Arc<dyn KidRepository + Send + Sync>,
    guardian_repo: Arc<dyn GuardianRepository + Send + Sync>,
    link_repo: Arc<dyn GuardianLinkRepository + Send + Sync>,
}

impl KidService {
    pub fn new(
        kid_repo: Arc<dyn KidRepository + Send + Sync>,
        guardian_repo: Arc<dyn GuardianRepository + Send + Sync>,
        link_repo: Arc<dyn GuardianLinkRepository + Send + Sync>,
    ) -> Self {
        Self {
            kid_repo,
            guardian_repo,
            link_repo,
        }
    }

    pub async fn create_kid(&self, display_name: &str, birth_year: Option<i32>) -> Result<Kid, Error> {
        if display_name.trim().is_empty() {
            return Err(Error::InvalidArgument("Kid name must not be empty".to_string()));
        }
        let kid = Kid::new(display_name, birth_year);
        self.kid_repo.create_kid(&kid).await?;
        info!("Created kid '{}' ({})", kid.display_name, kid.kid_id);
        Ok(kid)
    }

    pub async fn get_kid(&self, kid_id: Uuid) -> Result<Kid, Error> {
        self.kid_repo
            .get_kid(kid_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No kid with id={}", kid_id)))
    }

    pub async fn update_settings(&self, kid_id: Uuid, settings: KidSettings) -> Result<Kid, Error> {
        let mut kid = self.get_kid(kid_id).await?;
        kid.settings = settings;
        kid.updated_at = Utc::now();
        self.kid_repo.update_kid(&kid).await?;
        Ok(kid)
    }

    pub async fn deactivate_kid(&self, kid_id: Uuid) -> Result<(), Error> {
        let mut kid = self.get_kid(kid_id).await?;
        kid.is_active = false;
        kid.updated_at = Utc::now();
        self.kid_repo.update_kid(&kid).await
    }

    /// Permanently removes the kid. The wallet, ledger, results and
    /// redemptions go with it via FK cascade.
    pub async fn delete_kid(&self, kid_id: Uuid) -> Result<(), Error> {
        self.get_kid(kid_id).await?;
        self.kid_repo.delete_kid(kid_id).await
    }

    pub async fn list_active_kids(&self) -> Result<Vec<Kid>, Error> {
        self.kid_repo.list_active_kids().await
    }

    // ------------------------------------------------------------------
    // Guardians
    // ------------------------------------------------------------------

    pub async fn create_guardian(&self, display_name: &str, email: &str) -> Result<Guardian, Error> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(Error::InvalidArgument(format!("Invalid email: '{}'", email)));
        }
        if let Some(existing) = self.guardian_repo.get_guardian_by_email(email).await? {
            return Err(Error::BusinessRule(format!(
                "A guardian with email '{}' already exists ({})",
                email, existing.guardian_id
            )));
        }
        let guardian = Guardian::new(display_name, email);
        self.guardian_repo.create_guardian(&guardian).await?;
        Ok(guardian)
    }

    pub async fn get_guardian(&self, guardian_id: Uuid) -> Result<Guardian, Error> {
        self.guardian_repo
            .get_guardian(guardian_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No guardian with id={}", guardian_id)))
    }

    pub async fn deactivate_guardian(&self, guardian_id: Uuid) -> Result<(), Error> {
        let mut guardian = self.get_guardian(guardian_id).await?;
        guardian.is_active = false;
        guardian.updated_at = Utc::now();
        self.guardian_repo.update_guardian(&guardian).await
    }

    /// Links a guardian to a kid, holding the max-guardians and
    /// single-primary rules.
    pub async fn link_guardian(
        &self,
        kid_id: Uuid,
        guardian_id: Uuid,
        relationship: GuardianRelationship,
        is_primary: bool,
    ) -> Result<GuardianLink, Error> {
        self.get_kid(kid_id).await?;
        self.get_guardian(guardian_id).await?;

        let links = self.link_repo.list_links_for_kid(kid_id).await?;
        if links.iter().any(|l| l.guardian_id == guardian_id) {
            return Err(Error::BusinessRule(format!(
                "Guardian {} is already linked to kid {}",
                guardian_id, kid_id
            )));
        }
        if links.len() >= MAX_GUARDIANS_PER_KID {
            return Err(Error::BusinessRule(format!(
                "Kid {} already has the maximum of {} guardians",
                kid_id, MAX_GUARDIANS_PER_KID
            )));
        }
        if is_primary && links.iter().any(|l| l.is_primary) {
            return Err(Error::BusinessRule(format!(
                "Kid {} already has a primary guardian",
                kid_id
            )));
        }

        let link = GuardianLink {
            kid_id,
            guardian_id,
            relationship,
            is_primary,
            linked_at: Utc::now(),
        };
        self.link_repo.insert_link(&link).await?;
        info!("Linked guardian {} to kid {}", guardian_id, kid_id);
        Ok(link)
    }

    pub async fn unlink_guardian(&self, kid_id: Uuid, guardian_id: Uuid) -> Result<(), Error> {
        let links = self.link_repo.list_links_for_kid(kid_id).await?;
        if !links.iter().any(|l| l.guardian_id == guardian_id) {
            return Err(Error::NotFound(format!(
                "Guardian {} is not linked to kid {}",
                guardian_id, kid_id
            )));
        }
        self.link_repo.delete_link(kid_id, guardian_id).await
    }

    pub async fn list_guardians_for_kid(&self, kid_id: Uuid) -> Result<Vec<GuardianLink>, Error> {
        self.link_repo.list_links_for_kid(kid_id).await
    }

    pub async fn list_kids_for_guardian(&self, guardian_id: Uuid) -> Result<Vec<Kid>, Error> {
        let links = self.link_repo.list_links_for_guardian(guardian_id).await?;
        let mut kids = Vec::with_capacity(links.len());
        for link in links {
            if let Some(kid) = self.kid_repo.get_kid(link.kid_id).await? {
                kids.push(kid);
            }
        }
        Ok(kids)
    }
}
