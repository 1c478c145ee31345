// File: quizkid-core/tests/kid_service_tests.rs

use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use uuid::Uuid;

use quizkid_common::models::kid::{Guardian, GuardianLink, GuardianRelationship, Kid};
use quizkid_common::traits::repository_traits::{
    GuardianLinkRepository, GuardianRepository, KidRepository,
};
use quizkid_core::services::kid_service::{KidService, MAX_GUARDIANS_PER_KID};
use quizkid_core::Error;

mock! {
    KidRepo {}
    #[async_trait]
    impl KidRepository for KidRepo {
        async fn create_kid(&self, kid: &Kid) -> Result<(), Error>;
        async fn get_kid(&self, kid_id: Uuid) -> Result<Option<Kid>, Error>;
        async fn update_kid(&self, kid: &Kid) -> Result<(), Error>;
        async fn delete_kid(&self, kid_id: Uuid) -> Result<(), Error>;
        async fn list_active_kids(&self) -> Result<Vec<Kid>, Error>;
    }
}

mock! {
    GuardianRepo {}
    #[async_trait]
    impl GuardianRepository for GuardianRepo {
        async fn create_guardian(&self, guardian: &Guardian) -> Result<(), Error>;
        async fn get_guardian(&self, guardian_id: Uuid) -> Result<Option<Guardian>, Error>;
        async fn get_guardian_by_email(&self, email: &str) -> Result<Option<Guardian>, Error>;
        async fn update_guardian(&self, guardian: &Guardian) -> Result<(), Error>;
        async fn delete_guardian(&self, guardian_id: Uuid) -> Result<(), Error>;
    }
}

mock! {
    LinkRepo {}
    #[async_trait]
    impl GuardianLinkRepository for LinkRepo {
        async fn insert_link(&self, link: &GuardianLink) -> Result<(), Error>;
        async fn delete_link(&self, kid_id: Uuid, guardian_id: Uuid) -> Result<(), Error>;
        async fn list_links_for_kid(&self, kid_id: Uuid) -> Result<Vec<GuardianLink>, Error>;
        async fn list_links_for_guardian(&self, guardian_id: Uuid) -> Result<Vec<GuardianLink>, Error>;
    }
}

fn service_with(
    kid_repo: MockKidRepo,
    guardian_repo: MockGuardianRepo,
    link_repo: MockLinkRepo,
) -> KidService {
    KidService::new(Arc::new(kid_repo), Arc::new(guardian_repo), Arc::new(link_repo))
}

fn kid_and_guardian_repos(kid: &Kid, guardian: &Guardian) -> (MockKidRepo, MockGuardianRepo) {
    let mut kid_repo = MockKidRepo::new();
    let k = kid.clone();
    kid_repo.expect_get_kid().returning(move |_| Ok(Some(k.clone())));
    let mut guardian_repo = MockGuardianRepo::new();
    let g = guardian.clone();
    guardian_repo
        .expect_get_guardian()
        .returning(move |_| Ok(Some(g.clone())));
    (kid_repo, guardian_repo)
}

fn link(kid_id: Uuid, is_primary: bool) -> GuardianLink {
    GuardianLink {
        kid_id,
        guardian_id: Uuid::new_v4(),
        relationship: GuardianRelationship::Parent,
        is_primary,
        linked_at: Utc::now(),
    }
}

#[tokio::test]
async fn linking_respects_the_guardian_cap() {
    let kid = Kid::new("Mira", Some(2017));
    let guardian = Guardian::new("Sam", "sam@example.com");
    let (kid_repo, guardian_repo) = kid_and_guardian_repos(&kid, &guardian);

    let mut link_repo = MockLinkRepo::new();
    let existing: Vec<GuardianLink> = (0..MAX_GUARDIANS_PER_KID)
        .map(|_| link(kid.kid_id, false))
        .collect();
    link_repo
        .expect_list_links_for_kid()
        .returning(move |_| Ok(existing.clone()));

    let svc = service_with(kid_repo, guardian_repo, link_repo);
    let result = svc
        .link_guardian(kid.kid_id, guardian.guardian_id, GuardianRelationship::Parent, false)
        .await;

    assert!(matches!(result, Err(Error::BusinessRule(_))));
}

#[tokio::test]
async fn linking_rejects_a_second_primary_guardian() {
    let kid = Kid::new("Mira", Some(2017));
    let guardian = Guardian::new("Sam", "sam@example.com");
    let (kid_repo, guardian_repo) = kid_and_guardian_repos(&kid, &guardian);

    let mut link_repo = MockLinkRepo::new();
    let existing = vec![link(kid.kid_id, true)];
    link_repo
        .expect_list_links_for_kid()
        .returning(move |_| Ok(existing.clone()));

    let svc = service_with(kid_repo, guardian_repo, link_repo);
    let result = svc
        .link_guardian(kid.kid_id, guardian.guardian_id, GuardianRelationship::Parent, true)
        .await;

    assert!(matches!(result, Err(Error::BusinessRule(_))));
}

#[tokio::test]
async fn linking_rejects_duplicates() {
    let kid = Kid::new("Mira", Some(2017));
    let guardian = Guardian::new("Sam", "sam@example.com");
    let (kid_repo, guardian_repo) = kid_and_guardian_repos(&kid, &guardian);

    let mut link_repo = MockLinkRepo::new();
    let mut existing = link(kid.kid_id, false);
    existing.guardian_id = guardian.guardian_id;
    let links = vec![existing];
    link_repo
        .expect_list_links_for_kid()
        .returning(move |_| Ok(links.clone()));

    let svc = service_with(kid_repo, guardian_repo, link_repo);
    let result = svc
        .link_guardian(kid.kid_id, guardian.guardian_id, GuardianRelationship::Parent, false)
        .await;

    assert!(matches!(result, Err(Error::BusinessRule(_))));
}

#[tokio::test]
async fn first_link_succeeds() -> Result<(), Error> {
    let kid = Kid::new("Mira", Some(2017));
    let guardian = Guardian::new("Sam", "sam@example.com");
    let (kid_repo, guardian_repo) = kid_and_guardian_repos(&kid, &guardian);

    let mut link_repo = MockLinkRepo::new();
    link_repo.expect_list_links_for_kid().returning(|_| Ok(vec![]));
    link_repo
        .expect_insert_link()
        .withf(|l| l.is_primary)
        .times(1)
        .returning(|_| Ok(()));

    let svc = service_with(kid_repo, guardian_repo, link_repo);
    let created = svc
        .link_guardian(kid.kid_id, guardian.guardian_id, GuardianRelationship::Parent, true)
        .await?;

    assert_eq!(created.kid_id, kid.kid_id);
    assert!(created.is_primary);
    Ok(())
}

#[tokio::test]
async fn guardian_emails_must_be_unique() {
    let existing = Guardian::new("Sam", "sam@example.com");

    let mut guardian_repo = MockGuardianRepo::new();
    let g = existing.clone();
    guardian_repo
        .expect_get_guardian_by_email()
        .returning(move |_| Ok(Some(g.clone())));

    let svc = service_with(MockKidRepo::new(), guardian_repo, MockLinkRepo::new());
    let result = svc.create_guardian("Sam Again", "sam@example.com").await;
    assert!(matches!(result, Err(Error::BusinessRule(_))));
}

#[tokio::test]
async fn kid_names_must_not_be_blank() {
    let svc = service_with(MockKidRepo::new(), MockGuardianRepo::new(), MockLinkRepo::new());
    let result = svc.create_kid("   ", None).await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}
