#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use badge_lifecycle::{Engine, EngineSettings};
use badge_modules::ModuleRegistry;
use badge_naming::{Category, Module, NamingResolver};
use badge_nullables::{NullClock, NullKvStore, NullSocialGraph, NullVerifier};
use badge_types::{Handle, ModuleKey, PolicyParams};

pub const ALICE_DID: &str = "did:plc:alice";

pub struct Harness {
    pub graph: Arc<NullSocialGraph>,
    pub records: Arc<NullKvStore>,
    pub failures: Arc<NullKvStore>,
    pub stars: Arc<NullVerifier>,
    pub mvp: Arc<NullVerifier>,
    pub engine: Engine,
}

pub fn stars_module() -> Module {
    Module::new(key("ghstar"), "Github Stars", "GitHub Stars", "ghstar")
        .explanation("Your GitHub Stars profile ID.")
}

pub fn mvp_module() -> Module {
    Module::new(
        key("mvp"),
        "Microsoft Most Valuable Professionals (MVPs)",
        "MVPs",
        "ms-mvp",
    )
    .category(Category::new("AI Platform", ["Azure AI Services"]))
}

pub fn key(s: &str) -> ModuleKey {
    ModuleKey::parse(s).unwrap()
}

pub fn handle(s: &str) -> Handle {
    Handle::parse(s).unwrap()
}

pub fn alice() -> Handle {
    handle("alice.example")
}

pub fn harness() -> Harness {
    harness_with(PolicyParams::default())
}

pub fn harness_with(params: PolicyParams) -> Harness {
    let graph = Arc::new(NullSocialGraph::new());
    graph.add_profile("alice.example", ALICE_DID);
    graph.add_profile("bob.example", "did:plc:bob");

    let resolver = NamingResolver::new(&params);
    for module in [stars_module(), mvp_module()] {
        graph.provision(&resolver.resolve(&module).unwrap().titles());
    }

    let stars = Arc::new(NullVerifier::new(stars_module()).verified("alice"));
    let mvp = Arc::new(NullVerifier::new(mvp_module()).verified("5003"));
    let mut registry = ModuleRegistry::new();
    registry.register(stars.clone());
    registry.register(mvp.clone());

    let records = Arc::new(NullKvStore::new());
    let failures = Arc::new(NullKvStore::new());
    let engine = Engine::new(
        Arc::new(registry),
        graph.clone(),
        records.clone(),
        failures.clone(),
        Arc::new(NullClock::new(1_700_000_000_000)),
        &params,
        EngineSettings {
            operator_handle: "verified.example".into(),
            web_base_url: "https://bsky.app".into(),
            site_url: "https://verifiedbsky.net".into(),
            blacklist: HashSet::from([handle("blocked.example")]),
        },
    );

    Harness {
        graph,
        records,
        failures,
        stars,
        mvp,
        engine,
    }
}

pub fn short_timeout() -> PolicyParams {
    PolicyParams {
        external_call_timeout: Duration::from_millis(50),
        ..PolicyParams::default()
    }
}

impl Harness {
    pub async fn enroll_alice(&self) {
        self.engine
            .enrollment
            .enroll(&key("ghstar"), "alice", &alice())
            .await
            .unwrap();
    }

    /// Groups (lists and backing lists) `did` is currently a member of.
    pub fn memberships_of(&self, did: &str) -> usize {
        self.graph
            .lists()
            .iter()
            .filter(|l| self.graph.is_member(&l.uri, did))
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.graph
            .messages()
            .iter()
            .filter(|m| m.text.starts_with("⚠️"))
            .count()
    }

    pub fn removal_notices(&self) -> usize {
        self.graph
            .messages()
            .iter()
            .filter(|m| m.text.starts_with("❌"))
            .count()
    }
}
