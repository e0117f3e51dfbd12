use std::sync::Arc;

use badge_groups::{GroupError, MembershipAssigner, SocialGraphClient};
use badge_naming::{Category, Module, Naming, NamingResolver};
use badge_nullables::{GraphOp, NullClock, NullSocialGraph};
use badge_types::{Clock, Handle, Identity, ModuleKey, PolicyParams};

const OWNER: &str = "verified.example";
const WEB: &str = "https://bsky.app";

fn assigner(graph: &Arc<NullSocialGraph>) -> MembershipAssigner {
    let client: Arc<dyn SocialGraphClient> = graph.clone();
    MembershipAssigner::new(
        client,
        Arc::new(NullClock::new(1_700_000_000_000)),
        &PolicyParams::default(),
        OWNER,
        WEB,
    )
}

fn resolve(module: &Module) -> Naming {
    NamingResolver::new(&PolicyParams::default())
        .resolve(module)
        .unwrap()
}

fn stars() -> Naming {
    resolve(&Module::new(
        ModuleKey::parse("ghstar").unwrap(),
        "Github Stars",
        "GitHub Stars",
        "ghstar",
    ))
}

fn mvp() -> Naming {
    resolve(
        &Module::new(
            ModuleKey::parse("mvp").unwrap(),
            "Microsoft Most Valuable Professionals (MVPs)",
            "MVPs",
            "ms-mvp",
        )
        .category(Category::new("AI Platform", ["Azure AI Services"])),
    )
}

fn alice() -> Identity {
    Identity::new(Handle::parse("alice.example").unwrap(), "did:plc:alice")
}

#[tokio::test]
async fn root_only_module_yields_pack_then_list() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.provision(&naming.titles());

    let links = assigner(&graph)
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(links[0].title, "Starter pack Verified GitHub Stars");
    assert!(links[0].url.starts_with("https://bsky.app/starter-pack/verified.example/"));
    assert_eq!(links[1].title, "List Verified GitHub Stars");
    assert!(links[1].url.starts_with("https://bsky.app/profile/verified.example/lists/"));

    let list = graph.list_named("Verified GitHub Stars").unwrap();
    assert!(graph.is_member(&list.uri, "did:plc:alice"));
    assert_eq!(graph.labels("did:plc:alice"), vec!["ghstar".to_string()]);
    assert_eq!(graph.follows(), vec!["did:plc:alice".to_string()]);
}

#[tokio::test]
async fn links_follow_node_order() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = mvp();
    graph.provision(&naming.titles());

    let links = assigner(&graph)
        .assign_all(&naming, &alice(), "ms-mvp")
        .await
        .unwrap();

    let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Starter pack Verified MVPs",
            "List Verified MVPs",
            "Starter pack Verified MVPs: AI Platform",
            "List Verified MVPs: AI Platform",
            "Starter pack Verified MVPs: AI Platform - Azure AI Services",
            "List Verified MVPs: AI Platform - Azure AI Services",
        ]
    );
}

#[tokio::test]
async fn pack_below_threshold_is_reused() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.add_list("Verified GitHub Stars");
    let existing = graph.add_starter_pack("Verified GitHub Stars", 148);

    let links = assigner(&graph)
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap();

    assert!(links[0].url.ends_with(badge_groups::links::rkey(&existing)));
    assert_eq!(graph.starter_packs_named("Verified GitHub Stars").len(), 1);
    assert_eq!(graph.refreshed(), vec![existing]);
}

#[tokio::test]
async fn full_pack_overflows_into_a_new_one() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.add_list("Verified GitHub Stars");
    let full = graph.add_starter_pack("Verified GitHub Stars", 149);

    let links = assigner(&graph)
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap();

    let packs = graph.starter_packs_named("Verified GitHub Stars");
    assert_eq!(packs.len(), 2);
    let created = packs.iter().find(|sp| sp.uri != full).unwrap();
    assert!(links[0].url.ends_with(badge_groups::links::rkey(&created.uri)));
    assert!(graph.is_member(&created.list_uri, "did:plc:alice"));
    assert!(graph.members(&packs[0].list_uri).is_empty());
}

#[tokio::test]
async fn overflow_pack_is_stamped_with_the_clock() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.add_list("Verified GitHub Stars");
    let full = graph.add_starter_pack("Verified GitHub Stars", 149);
    let clock = Arc::new(NullClock::new(1_700_000_000_000));
    clock.advance(60_000);
    let client: Arc<dyn SocialGraphClient> = graph.clone();
    let assigner = MembershipAssigner::new(
        client,
        clock.clone(),
        &PolicyParams::default(),
        OWNER,
        WEB,
    );

    assigner
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap();

    let created = graph
        .starter_packs_named("Verified GitHub Stars")
        .into_iter()
        .find(|sp| sp.uri != full)
        .unwrap();
    assert_eq!(created.created_at, clock.now().to_rfc3339());
}

#[tokio::test]
async fn missing_starter_pack_is_created() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.add_list("Verified GitHub Stars");

    assigner(&graph)
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap();

    assert_eq!(graph.starter_packs_named("Verified GitHub Stars").len(), 1);
}

#[tokio::test]
async fn second_assignment_changes_nothing() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = mvp();
    graph.provision(&naming.titles());
    let assigner = assigner(&graph);

    let first = assigner.assign_all(&naming, &alice(), "ms-mvp").await.unwrap();
    let second = assigner.assign_all(&naming, &alice(), "ms-mvp").await.unwrap();

    assert_eq!(first, second);
    for list in graph.lists() {
        assert!(graph.members(&list.uri).len() <= 1, "{}", list.name);
    }
}

#[tokio::test]
async fn existing_member_of_a_full_pack_stays_put() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.add_list("Verified GitHub Stars");
    let first = graph.add_starter_pack("Verified GitHub Stars", 148);
    let assigner = assigner(&graph);

    assigner.assign_all(&naming, &alice(), "ghstar").await.unwrap();
    // alice took the last seat; the pack now holds 149 members.
    let links = assigner.assign_all(&naming, &alice(), "ghstar").await.unwrap();

    assert!(links[0].url.ends_with(badge_groups::links::rkey(&first)));
    assert_eq!(graph.starter_packs_named("Verified GitHub Stars").len(), 1);
}

#[tokio::test]
async fn missing_list_is_an_error() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.add_starter_pack("Verified GitHub Stars", 0);

    let err = assigner(&graph)
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap_err();

    match err {
        GroupError::ListNotFound(title) => assert_eq!(title, "Verified GitHub Stars"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(graph.labels("did:plc:alice").is_empty());
}

#[tokio::test]
async fn backing_list_does_not_stand_in_for_a_list() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    // Only the starter pack's reference list carries the title.
    graph.add_starter_pack("Verified GitHub Stars", 0);

    let result = assigner(&graph).assign_all(&naming, &alice(), "ghstar").await;
    assert!(matches!(result, Err(GroupError::ListNotFound(_))));
}

#[tokio::test]
async fn follow_failure_is_not_fatal() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.provision(&naming.titles());
    graph.fail(GraphOp::Follow, true);

    let links = assigner(&graph)
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap();

    assert_eq!(links.len(), 2);
    assert!(graph.follows().is_empty());
    assert_eq!(graph.labels("did:plc:alice"), vec!["ghstar".to_string()]);
}

#[tokio::test]
async fn label_failure_is_fatal() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.provision(&naming.titles());
    graph.fail(GraphOp::SetLabel, true);

    let result = assigner(&graph).assign_all(&naming, &alice(), "ghstar").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn pagination_reaches_later_groups() {
    let graph = Arc::new(NullSocialGraph::new().with_page_size(2));
    for i in 0..5 {
        graph.add_list(&format!("Unrelated {i}"));
        graph.add_starter_pack(&format!("Unrelated {i}"), 0);
    }
    let naming = stars();
    graph.provision(&naming.titles());

    let links = assigner(&graph)
        .assign_all(&naming, &alice(), "ghstar")
        .await
        .unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(graph.starter_packs_named("Verified GitHub Stars").len(), 1);
}

#[tokio::test]
async fn remove_all_undoes_assignment() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = mvp();
    graph.provision(&naming.titles());
    let assigner = assigner(&graph);
    assigner.assign_all(&naming, &alice(), "ms-mvp").await.unwrap();
    let refreshed_before = graph.refreshed().len();

    let removed = assigner
        .remove_all(&naming.titles(), &alice(), "ms-mvp")
        .await
        .unwrap();

    assert_eq!(removed, 6);
    for list in graph.lists() {
        assert!(!graph.is_member(&list.uri, "did:plc:alice"), "{}", list.name);
    }
    assert!(graph.labels("did:plc:alice").is_empty());
    assert_eq!(graph.refreshed().len(), refreshed_before + 3);
}

#[tokio::test]
async fn remove_all_without_memberships_is_a_no_op() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.provision(&naming.titles());

    let removed = assigner(&graph)
        .remove_all(&naming.titles(), &alice(), "ghstar")
        .await
        .unwrap();

    assert_eq!(removed, 0);
    assert!(graph.refreshed().is_empty());
}

#[tokio::test]
async fn remove_all_reports_failure_after_trying_everything() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = stars();
    graph.provision(&naming.titles());
    let assigner = assigner(&graph);
    assigner.assign_all(&naming, &alice(), "ghstar").await.unwrap();
    graph.fail(GraphOp::RemoveMember, true);

    let result = assigner.remove_all(&naming.titles(), &alice(), "ghstar").await;

    assert!(result.is_err());
    // The label is still retracted.
    assert!(graph.labels("did:plc:alice").is_empty());
}

#[tokio::test]
async fn provision_creates_only_missing_groups() {
    let graph = Arc::new(NullSocialGraph::new());
    let naming = mvp();
    graph.add_list("Verified MVPs");
    graph.add_starter_pack("Verified MVPs", 0);

    let report = assigner(&graph).provision_all(&naming).await.unwrap();

    assert_eq!(
        report.created_lists,
        vec![
            "Verified MVPs: AI Platform".to_string(),
            "Verified MVPs: AI Platform - Azure AI Services".to_string(),
        ]
    );
    assert_eq!(report.created_starter_packs, report.created_lists);
    for title in naming.titles() {
        assert!(graph.list_named(&title).is_some(), "{title}");
        assert_eq!(graph.starter_packs_named(&title).len(), 1, "{title}");
    }

    let again = assigner(&graph).provision_all(&naming).await.unwrap();
    assert!(again.created_lists.is_empty());
    assert!(again.created_starter_packs.is_empty());
}

#[tokio::test]
async fn groups_for_title_lists_every_pack() {
    let graph = Arc::new(NullSocialGraph::new());
    graph.add_list("Verified GitHub Stars");
    graph.add_starter_pack("Verified GitHub Stars", 150);
    graph.add_starter_pack("Verified GitHub Stars", 3);

    let groups = assigner(&graph)
        .groups_for_title("Verified GitHub Stars")
        .await
        .unwrap();

    assert!(groups.list.is_some());
    assert_eq!(groups.starter_packs.len(), 2);

    let none = assigner(&graph).groups_for_title("Nothing").await.unwrap();
    assert!(none.list.is_none());
    assert!(none.starter_packs.is_empty());
}
