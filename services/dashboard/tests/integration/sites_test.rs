use siteplane_dashboard::domain::types::{DefaultOrg, SiteChanges};
use siteplane_dashboard::error::DashboardError;
use siteplane_dashboard::usecase::sites::{
    CreateSiteInput, CreateSiteUseCase, DeleteSiteUseCase, GetSiteBySlugUseCase,
    ListSitesUseCase, UpdateSiteUseCase,
};
use siteplane_domain::role::MembershipRole;
use siteplane_domain::site::SiteStatus;

use crate::helpers::{
    DEFAULT_ORG_EXTERNAL_ID, MockMembershipRepo, MockOrganizationRepo, MockSiteRepo,
    MockUserRepo, access_resolver, test_membership, test_organization, test_site, test_user,
};

fn create_input(slug: &str) -> CreateSiteInput {
    CreateSiteInput {
        name: format!("Site {slug}"),
        slug: slug.to_owned(),
        description: None,
        status: SiteStatus::Draft,
    }
}

// ── CreateSiteUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_site_owned_by_caller() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");
    let sites = MockSiteRepo::empty();

    let usecase = CreateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites: sites.clone(),
    };

    let site = usecase
        .execute("user_01A", "org_01B", create_input("launch-blog"))
        .await
        .unwrap();

    assert_eq!(site.organization_id, org.id);
    assert_eq!(site.created_by, user.id);
    assert_eq!(site.slug, "launch-blog");
    assert_eq!(sites.sites.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_duplicate_slug_within_organization() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");
    let sites = MockSiteRepo::new(vec![test_site(org.id, user.id, "launch-blog")]);

    let usecase = CreateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites,
    };

    let result = usecase
        .execute("user_01A", "org_01B", create_input("launch-blog"))
        .await;

    assert!(
        matches!(result, Err(DashboardError::DuplicateSlug)),
        "expected DuplicateSlug, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_same_slug_in_different_organizations() {
    let user = test_user("user_01A");
    let org_a = test_organization("org_01B");
    let org_b = test_organization("org_01C");
    let sites = MockSiteRepo::new(vec![test_site(org_a.id, user.id, "launch-blog")]);

    let usecase = CreateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org_a, org_b.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org_b.id,
                MembershipRole::Member,
            )]),
        ),
        sites: sites.clone(),
    };

    usecase
        .execute("user_01A", "org_01C", create_input("launch-blog"))
        .await
        .unwrap();

    assert_eq!(sites.sites.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_reject_malformed_slug() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");

    let usecase = CreateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites: MockSiteRepo::empty(),
    };

    for slug in ["", "Launch-Blog", "-edge", "edge-", "has space"] {
        let result = usecase.execute("user_01A", "org_01B", create_input(slug)).await;
        assert!(
            matches!(result, Err(DashboardError::InvalidSlug)),
            "slug {slug:?}: expected InvalidSlug, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_refuse_create_for_non_member() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");

    let usecase = CreateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user]),
            MockOrganizationRepo::new(vec![org]),
            MockMembershipRepo::empty(),
        ),
        sites: MockSiteRepo::empty(),
    };

    let result = usecase
        .execute("user_01A", "org_01B", create_input("launch-blog"))
        .await;

    assert!(
        matches!(result, Err(DashboardError::NotAMember)),
        "expected NotAMember, got {result:?}"
    );
}

// ── ListSitesUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_all_sites_for_regular_organization_member() {
    let alice = test_user("user_01A");
    let bob = test_user("user_01C");
    let org = test_organization("org_01B");
    let sites = MockSiteRepo::new(vec![
        test_site(org.id, alice.id, "alpha"),
        test_site(org.id, bob.id, "beta"),
    ]);

    let usecase = ListSitesUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![alice.clone(), bob.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![
                test_membership(alice.id, org.id, MembershipRole::Member),
                test_membership(bob.id, org.id, MembershipRole::Member),
            ]),
        ),
        sites,
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let listed = usecase.execute(Some("user_01A"), "org_01B").await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn should_scope_default_org_listing_to_creator() {
    let alice = test_user("user_01A");
    let bob = test_user("user_01C");
    let default_org = test_organization(DEFAULT_ORG_EXTERNAL_ID);
    let sites = MockSiteRepo::new(vec![
        test_site(default_org.id, alice.id, "alice-notes"),
        test_site(default_org.id, bob.id, "bob-notes"),
    ]);

    let usecase = ListSitesUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![alice.clone(), bob.clone()]),
            MockOrganizationRepo::new(vec![default_org.clone()]),
            MockMembershipRepo::new(vec![
                test_membership(alice.id, default_org.id, MembershipRole::Member),
                test_membership(bob.id, default_org.id, MembershipRole::Member),
            ]),
        ),
        sites,
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let listed = usecase
        .execute(Some("user_01A"), DEFAULT_ORG_EXTERNAL_ID)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].created_by, alice.id);
}

#[tokio::test]
async fn should_return_empty_list_for_anonymous_or_non_member() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");
    let sites = MockSiteRepo::new(vec![test_site(org.id, user.id, "alpha")]);

    let usecase = ListSitesUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user]),
            MockOrganizationRepo::new(vec![org]),
            MockMembershipRepo::empty(),
        ),
        sites,
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    // Anonymous caller.
    assert!(usecase.execute(None, "org_01B").await.unwrap().is_empty());
    // Authenticated but not a member.
    assert!(
        usecase
            .execute(Some("user_01A"), "org_01B")
            .await
            .unwrap()
            .is_empty()
    );
    // Unknown organization.
    assert!(
        usecase
            .execute(Some("user_01A"), "org_ghost")
            .await
            .unwrap()
            .is_empty()
    );
}

// ── GetSiteBySlugUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_default_org_site_from_non_creator() {
    let alice = test_user("user_01A");
    let bob = test_user("user_01C");
    let default_org = test_organization(DEFAULT_ORG_EXTERNAL_ID);
    let sites = MockSiteRepo::new(vec![test_site(default_org.id, bob.id, "bob-notes")]);

    let usecase = GetSiteBySlugUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![alice.clone(), bob.clone()]),
            MockOrganizationRepo::new(vec![default_org.clone()]),
            MockMembershipRepo::new(vec![
                test_membership(alice.id, default_org.id, MembershipRole::Member),
                test_membership(bob.id, default_org.id, MembershipRole::Member),
            ]),
        ),
        sites,
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let found = usecase
        .execute(Some("user_01A"), DEFAULT_ORG_EXTERNAL_ID, "bob-notes")
        .await
        .unwrap();
    assert!(found.is_none(), "creator-only visibility in the default org");

    let found = usecase
        .execute(Some("user_01C"), DEFAULT_ORG_EXTERNAL_ID, "bob-notes")
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn should_return_none_for_unknown_slug() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");

    let usecase = GetSiteBySlugUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites: MockSiteRepo::empty(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let found = usecase
        .execute(Some("user_01A"), "org_01B", "nope")
        .await
        .unwrap();
    assert!(found.is_none());
}

// ── UpdateSiteUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_partial_update_leaving_other_fields_untouched() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");
    let site = test_site(org.id, user.id, "launch-blog");
    let site_id = site.id;
    let sites = MockSiteRepo::new(vec![site]);

    let usecase = UpdateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites: sites.clone(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    usecase
        .execute(
            "user_01A",
            site_id,
            SiteChanges {
                status: Some(SiteStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = sites.sites.lock().unwrap();
    assert_eq!(stored[0].status, SiteStatus::Published);
    assert_eq!(stored[0].slug, "launch-blog");
    assert_eq!(stored[0].name, "Site launch-blog");
}

#[tokio::test]
async fn should_accept_empty_update_and_refresh_timestamp_only() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");
    let site = test_site(org.id, user.id, "launch-blog");
    let site_id = site.id;
    let updated_before = site.updated_at;
    let sites = MockSiteRepo::new(vec![site]);

    let usecase = UpdateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites: sites.clone(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    usecase
        .execute("user_01A", site_id, SiteChanges::default())
        .await
        .unwrap();

    let stored = sites.sites.lock().unwrap();
    assert_eq!(stored[0].slug, "launch-blog");
    assert_eq!(stored[0].name, "Site launch-blog");
    assert_eq!(stored[0].status, SiteStatus::Draft);
    assert!(
        stored[0].updated_at >= updated_before,
        "updated_at must still be refreshed"
    );
}

#[tokio::test]
async fn should_reject_update_to_taken_slug_but_allow_keeping_own() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");
    let site = test_site(org.id, user.id, "launch-blog");
    let site_id = site.id;
    let sites = MockSiteRepo::new(vec![site, test_site(org.id, user.id, "press-kit")]);

    let usecase = UpdateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites,
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let result = usecase
        .execute(
            "user_01A",
            site_id,
            SiteChanges {
                slug: Some("press-kit".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(DashboardError::DuplicateSlug)),
        "expected DuplicateSlug, got {result:?}"
    );

    // Re-sending the current slug is not a collision.
    usecase
        .execute(
            "user_01A",
            site_id,
            SiteChanges {
                slug: Some("launch-blog".to_owned()),
                name: Some("Renamed".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn should_forbid_default_org_update_by_non_creator() {
    let alice = test_user("user_01A");
    let bob = test_user("user_01C");
    let default_org = test_organization(DEFAULT_ORG_EXTERNAL_ID);
    let site = test_site(default_org.id, bob.id, "bob-notes");
    let site_id = site.id;

    let usecase = UpdateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![alice.clone(), bob.clone()]),
            MockOrganizationRepo::new(vec![default_org.clone()]),
            MockMembershipRepo::new(vec![
                test_membership(alice.id, default_org.id, MembershipRole::Member),
                test_membership(bob.id, default_org.id, MembershipRole::Member),
            ]),
        ),
        sites: MockSiteRepo::new(vec![site]),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let result = usecase
        .execute(
            "user_01A",
            site_id,
            SiteChanges {
                name: Some("Hijacked".to_owned()),
                ..Default::default()
            },
        )
        .await;

    assert!(
        matches!(result, Err(DashboardError::NotSiteOwner)),
        "expected NotSiteOwner, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_missing_site_on_update() {
    let user = test_user("user_01A");

    let usecase = UpdateSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user]),
            MockOrganizationRepo::empty(),
            MockMembershipRepo::empty(),
        ),
        sites: MockSiteRepo::empty(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let result = usecase
        .execute(
            "user_01A",
            uuid::Uuid::now_v7(),
            SiteChanges {
                name: Some("Renamed".to_owned()),
                ..Default::default()
            },
        )
        .await;

    assert!(
        matches!(result, Err(DashboardError::SiteNotFound)),
        "expected SiteNotFound, got {result:?}"
    );
}

// ── DeleteSiteUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_site_for_member() {
    let user = test_user("user_01A");
    let org = test_organization("org_01B");
    let site = test_site(org.id, user.id, "launch-blog");
    let site_id = site.id;
    let sites = MockSiteRepo::new(vec![site]);

    let usecase = DeleteSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![user.clone()]),
            MockOrganizationRepo::new(vec![org.clone()]),
            MockMembershipRepo::new(vec![test_membership(
                user.id,
                org.id,
                MembershipRole::Member,
            )]),
        ),
        sites: sites.clone(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    usecase.execute("user_01A", site_id).await.unwrap();
    assert!(sites.sites.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_default_org_delete_by_non_creator() {
    let alice = test_user("user_01A");
    let bob = test_user("user_01C");
    let default_org = test_organization(DEFAULT_ORG_EXTERNAL_ID);
    let site = test_site(default_org.id, bob.id, "bob-notes");
    let site_id = site.id;
    let sites = MockSiteRepo::new(vec![site]);

    let usecase = DeleteSiteUseCase {
        access: access_resolver(
            MockUserRepo::new(vec![alice.clone(), bob.clone()]),
            MockOrganizationRepo::new(vec![default_org.clone()]),
            MockMembershipRepo::new(vec![
                test_membership(alice.id, default_org.id, MembershipRole::Member),
                test_membership(bob.id, default_org.id, MembershipRole::Member),
            ]),
        ),
        sites: sites.clone(),
        default_org: DefaultOrg::new(DEFAULT_ORG_EXTERNAL_ID),
    };

    let result = usecase.execute("user_01A", site_id).await;
    assert!(
        matches!(result, Err(DashboardError::NotSiteOwner)),
        "expected NotSiteOwner, got {result:?}"
    );
    assert_eq!(sites.sites.lock().unwrap().len(), 1);
}
