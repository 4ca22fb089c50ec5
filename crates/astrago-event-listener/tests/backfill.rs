//! End-to-end tests: events dispatched through the listener manager to the
//! Astrago listener, backed by the in-memory user store.

use std::collections::HashMap;
use std::sync::Arc;

use astrago_event_listener::PROVIDER_ID;
use kc_core::event::{AdminEvent, Event, EventType, OperationType, ResourceType};
use kc_core::EventsConfig;
use kc_model::User;
use kc_spi::{EventListenerManager, KeycloakSession, SpiRegistry};
use kc_storage::{InMemoryUserProvider, UserProvider};

const ATTRIBUTES: [&str; 3] = ["workspaceCreateLimit", "signUpPath", "approvalYN"];

/// Test environment with the listener registered and enabled.
struct TestEnv {
    users: Arc<InMemoryUserProvider>,
    manager: EventListenerManager,
    session: KeycloakSession,
}

impl TestEnv {
    async fn new(users: impl IntoIterator<Item = User>) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("astrago_event_listener=debug,kc_spi=debug")
            .with_test_writer()
            .try_init();

        let registry = Arc::new(SpiRegistry::new());
        astrago_event_listener::register(&registry, &HashMap::<String, String>::new())
            .await
            .expect("listener registers");

        let users = Arc::new(InMemoryUserProvider::with_users(users));
        let session = KeycloakSession::new(
            Arc::clone(&registry),
            Arc::clone(&users) as Arc<dyn UserProvider>,
        );
        let manager = EventListenerManager::new(
            registry,
            EventsConfig::with_listeners([PROVIDER_ID]),
        );
        manager.validate().expect("listener enabled");

        Self {
            users,
            manager,
            session,
        }
    }

    async fn send(&self, event: &Event) {
        assert_eq!(self.manager.send(&self.session, event).await, 1);
    }

    async fn user(&self, realm_id: &str, id: &str) -> User {
        self.users
            .get_by_id(realm_id, id)
            .await
            .expect("lookup succeeds")
            .expect("user exists")
    }

    async fn all_users(&self, realm_id: &str, ids: &[&str]) -> Vec<User> {
        let mut users = Vec::new();
        for id in ids {
            users.push(self.user(realm_id, id).await);
        }
        users
    }
}

fn federated(id: &str, realm_id: &str) -> User {
    User::with_id(id, realm_id, format!("{id}-name")).with_federation_link("ldap-1")
}

fn values(user: &User, name: &str) -> Option<Vec<String>> {
    user.get_attribute(name).cloned()
}

fn single(value: &str) -> Option<Vec<String>> {
    Some(vec![value.to_string()])
}

#[tokio::test]
async fn other_event_types_do_not_mutate() {
    let env = TestEnv::new([federated("u1", "r1")]).await;
    let before = env.user("r1", "u1").await;

    for event_type in [
        EventType::LoginError,
        EventType::Logout,
        EventType::RegisterError,
        EventType::UpdateProfile,
        EventType::CodeToToken,
        EventType::RefreshToken,
        EventType::IdentityProviderFirstLogin,
    ] {
        env.send(&Event::builder(event_type, "r1").user("u1").build())
            .await;
    }

    assert_eq!(env.user("r1", "u1").await.attributes, before.attributes);
}

#[tokio::test]
async fn missing_user_id_does_not_mutate() {
    let env = TestEnv::new([federated("u1", "r1")]).await;

    env.send(&Event::builder(EventType::Login, "r1").build()).await;
    env.send(&Event::builder(EventType::Register, "r1").build()).await;

    assert!(env.user("r1", "u1").await.attributes.is_empty());
}

#[tokio::test]
async fn unknown_user_does_not_mutate() {
    let env = TestEnv::new([federated("u1", "r1")]).await;

    env.send(&Event::builder(EventType::Login, "r1").user("ghost").build())
        .await;
    // Same ID, different realm.
    env.send(&Event::builder(EventType::Login, "r2").user("u1").build())
        .await;

    assert!(env.user("r1", "u1").await.attributes.is_empty());
    assert_eq!(env.users.len(), 1);
}

#[tokio::test]
async fn local_user_does_not_mutate() {
    let env = TestEnv::new([User::with_id("local", "r1", "local")]).await;

    env.send(&Event::builder(EventType::Login, "r1").user("local").build())
        .await;
    env.send(&Event::builder(EventType::Register, "r1").user("local").build())
        .await;

    let user = env.user("r1", "local").await;
    assert!(user.attributes.is_empty());
    assert!(user.federation_link.is_none());
}

#[tokio::test]
async fn login_backfills_all_defaults() {
    let env = TestEnv::new([federated("u1", "r1")]).await;

    env.send(&Event::builder(EventType::Login, "r1").user("u1").build())
        .await;

    let user = env.user("r1", "u1").await;
    assert_eq!(values(&user, "workspaceCreateLimit"), single("2"));
    assert_eq!(values(&user, "signUpPath"), single("ASTRAGO"));
    assert_eq!(values(&user, "approvalYN"), single("true"));
    assert_eq!(user.federation_link.as_deref(), Some("ldap-1"));
}

#[tokio::test]
async fn second_login_changes_nothing() {
    let env = TestEnv::new([federated("u1", "r1")]).await;
    let event = Event::builder(EventType::Login, "r1").user("u1").build();

    env.send(&event).await;
    let first = env.user("r1", "u1").await;

    env.send(&Event::builder(EventType::Login, "r1").user("u1").build())
        .await;
    let second = env.user("r1", "u1").await;

    for name in ATTRIBUTES {
        assert_eq!(values(&first, name), values(&second, name));
    }
    assert_eq!(first.updated_at, second.updated_at);
}

#[tokio::test]
async fn existing_values_are_kept() {
    let user = federated("u1", "r1").with_attribute("approvalYN", vec!["false".to_string()]);
    let env = TestEnv::new([user]).await;

    env.send(&Event::builder(EventType::Login, "r1").user("u1").build())
        .await;

    let user = env.user("r1", "u1").await;
    assert_eq!(values(&user, "approvalYN"), single("false"));
    assert_eq!(values(&user, "workspaceCreateLimit"), single("2"));
    assert_eq!(values(&user, "signUpPath"), single("ASTRAGO"));
}

#[tokio::test]
async fn empty_values_are_backfilled() {
    let user = federated("u1", "r1")
        .with_attribute("signUpPath", Vec::new())
        .with_attribute("workspaceCreateLimit", vec!["7".to_string(), "8".to_string()]);
    let env = TestEnv::new([user]).await;

    env.send(&Event::builder(EventType::Login, "r1").user("u1").build())
        .await;

    let user = env.user("r1", "u1").await;
    assert_eq!(values(&user, "signUpPath"), single("ASTRAGO"));
    assert_eq!(
        values(&user, "workspaceCreateLimit"),
        Some(vec!["7".to_string(), "8".to_string()])
    );
}

#[tokio::test]
async fn register_event_backfills_ldap_user() {
    let env = TestEnv::new([User::with_id("u1", "r1", "jdoe").with_federation_link("ldap-1")]).await;

    env.send(&Event::builder(EventType::Register, "r1").user("u1").build())
        .await;

    let user = env.user("r1", "u1").await;
    let expected: HashMap<String, Vec<String>> = [
        ("workspaceCreateLimit", "2"),
        ("signUpPath", "ASTRAGO"),
        ("approvalYN", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
    .collect();
    assert_eq!(user.attributes, expected);
}

#[tokio::test]
async fn unrelated_attributes_survive() {
    let user = federated("u1", "r1").with_attribute("department", vec!["ml".to_string()]);
    let env = TestEnv::new([user]).await;

    env.send(&Event::builder(EventType::Login, "r1").user("u1").build())
        .await;

    let user = env.user("r1", "u1").await;
    assert_eq!(values(&user, "department"), single("ml"));
    assert_eq!(user.attributes.len(), 4);
}

#[tokio::test]
async fn admin_events_are_ignored() {
    let env = TestEnv::new([federated("u1", "r1")]).await;
    let event = AdminEvent::new("r1", OperationType::Create, ResourceType::User, "users/u1")
        .with_representation("{\"username\":\"u1-name\"}");

    assert_eq!(env.manager.send_admin(&env.session, &event, true).await, 1);
    assert!(env.user("r1", "u1").await.attributes.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_logins_converge_on_defaults() {
    let ids = ["a", "b", "c", "d"];
    let env = Arc::new(TestEnv::new(ids.iter().map(|id| federated(id, "r1"))).await);

    let mut handles = Vec::new();
    for round in 0..3 {
        for id in ids {
            let env = Arc::clone(&env);
            let event_type = if round == 0 {
                EventType::Register
            } else {
                EventType::Login
            };
            handles.push(tokio::spawn(async move {
                let event = Event::builder(event_type, "r1").user(id).build();
                env.manager.send(&env.session, &event).await
            }));
        }
    }
    for handle in handles {
        assert_eq!(handle.await.expect("task completes"), 1);
    }

    for user in env.all_users("r1", &ids).await {
        assert_eq!(values(&user, "workspaceCreateLimit"), single("2"));
        assert_eq!(values(&user, "signUpPath"), single("ASTRAGO"));
        assert_eq!(values(&user, "approvalYN"), single("true"));
    }
}
