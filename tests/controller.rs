use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use adoption::client::{
    ActionError, ApiError, AuthError, AuthEvent, AuthProvider, Controller, Gateway, Mounted,
    Notice, Origin, Screen, Session, SessionManager, ToggleOutcome, View,
};
use adoption::models::{
    Application, ApplicationStatus, Category, FavoriteMark, Message, MessageKind, Pet, PetStatus,
    Shelter,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Notify;

fn pet(id: &str, name: &str, category: Category) -> Pet {
    Pet {
        id: id.to_string(),
        name: name.to_string(),
        breed: "田园猫".to_string(),
        age: None,
        gender: None,
        location: None,
        distance: None,
        image: format!("https://example.com/{id}.jpg"),
        category,
        description: String::new(),
        vaccinated: false,
        neutered: false,
        status: PetStatus::Available,
        tags: Vec::new(),
        gallery: Vec::new(),
        created_at: Utc::now(),
    }
}

fn message(id: &str, user_id: &str, is_read: bool) -> Message {
    Message {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: "欢迎".to_string(),
        content: "欢迎使用".to_string(),
        kind: MessageKind::System,
        is_read,
        created_at: Utc::now(),
    }
}

fn session(user_id: &str) -> Session {
    Session {
        user_id: user_id.to_string(),
        access_token: format!("token-{user_id}"),
        refresh_token: None,
        expires_at: None,
        email: None,
    }
}

/// 内存网关：记录调用次数，可按操作名注入失败或挂起一次调用
#[derive(Default)]
struct FakeGateway {
    pets: Mutex<Vec<Pet>>,
    favorites: Mutex<Vec<String>>,
    applications: Mutex<Vec<Application>>,
    messages: Mutex<Vec<Message>>,
    failing: Mutex<HashSet<&'static str>>,
    conflicting: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeGateway {
    fn with_pets(pets: Vec<Pet>) -> Self {
        let gateway = Self::default();
        *gateway.pets.lock() = pets;
        gateway
    }

    fn fail(&self, op: &'static str) {
        self.failing.lock().insert(op);
    }

    fn conflict(&self, op: &'static str) {
        self.conflicting.lock().insert(op);
    }

    fn gate(&self, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert(op, Arc::clone(&gate));
        gate
    }

    fn calls(&self, op: &'static str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    async fn enter(&self, op: &'static str) -> Result<(), ApiError> {
        *self.calls.lock().entry(op).or_default() += 1;
        // 只挂起设置之后的第一次调用
        let gate = self.gates.lock().remove(op);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.conflicting.lock().contains(op) {
            return Err(ApiError::Conflict(format!("{op} already exists")));
        }
        if self.failing.lock().contains(op) {
            return Err(ApiError::Server {
                status: 500,
                message: format!("{op} failed"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn pets(&self) -> Result<Vec<Pet>, ApiError> {
        self.enter("pets").await?;
        Ok(self.pets.lock().clone())
    }

    async fn pet(&self, id: &str) -> Result<Pet, ApiError> {
        self.enter("pet").await?;
        let found = self.pets.lock().iter().find(|p| p.id == id).cloned();
        found.ok_or_else(|| ApiError::NotFound("Pet not found".into()))
    }

    async fn favorites(&self, _user_id: &str) -> Result<Vec<Pet>, ApiError> {
        self.enter("favorites").await?;
        let ids = self.favorites.lock().clone();
        Ok(self
            .pets
            .lock()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn add_favorite(&self, user_id: &str, pet_id: &str) -> Result<FavoriteMark, ApiError> {
        self.enter("add_favorite").await?;
        self.favorites.lock().push(pet_id.to_string());
        Ok(FavoriteMark {
            id: format!("fav-{pet_id}"),
            user_id: user_id.to_string(),
            pet_id: pet_id.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn remove_favorite(&self, _user_id: &str, pet_id: &str) -> Result<(), ApiError> {
        self.enter("remove_favorite").await?;
        self.favorites.lock().retain(|id| id != pet_id);
        Ok(())
    }

    async fn submit_application(&self, user_id: &str, pet: &Pet) -> Result<Application, ApiError> {
        self.enter("submit_application").await?;
        let application = Application {
            id: format!("app-{}", pet.id),
            user_id: user_id.to_string(),
            pet_id: pet.id.clone(),
            pet_name: pet.name.clone(),
            pet_image: Some(pet.image.clone()),
            status: ApplicationStatus::PendingReview,
            date: Utc::now(),
        };
        self.applications.lock().insert(0, application.clone());
        // 服务端同时写入的系统通知
        self.messages
            .lock()
            .insert(0, message(&format!("srv-{}", pet.id), user_id, false));
        Ok(application)
    }

    async fn applications(&self, _user_id: &str) -> Result<Vec<Application>, ApiError> {
        self.enter("applications").await?;
        Ok(self.applications.lock().clone())
    }

    async fn messages(&self, _user_id: &str) -> Result<Vec<Message>, ApiError> {
        self.enter("messages").await?;
        Ok(self.messages.lock().clone())
    }

    async fn mark_message_read(&self, message_id: &str, is_read: bool) -> Result<Message, ApiError> {
        self.enter("mark_message_read").await?;
        let mut messages = self.messages.lock();
        let found = messages.iter_mut().find(|m| m.id == message_id);
        match found {
            Some(m) => {
                m.is_read = is_read;
                Ok(m.clone())
            }
            None => Err(ApiError::NotFound("Message not found".into())),
        }
    }
}

struct StaticAuth {
    stored: Option<Session>,
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        _metadata: serde_json::Value,
    ) -> Result<Option<Session>, AuthError> {
        Ok(Some(session(email)))
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        Ok(session(email))
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.stored.clone())
    }
}

async fn mount(
    gateway: &Arc<FakeGateway>,
    user: Option<&str>,
) -> (Arc<Controller>, SessionManager, Mounted) {
    let sessions = SessionManager::new(Arc::new(StaticAuth {
        stored: user.map(session),
    }));
    let controller = Arc::new(Controller::new(Arc::clone(gateway) as Arc<dyn Gateway>));
    let mounted = controller.mount(&sessions).await;
    (controller, sessions, mounted)
}

fn sample_gateway() -> Arc<FakeGateway> {
    Arc::new(FakeGateway::with_pets(vec![
        pet("p1", "奶茶", Category::Cat),
        pet("p2", "旺财", Category::Dog),
    ]))
}

#[tokio::test]
async fn test_mount_without_session_shows_welcome() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, None).await;

    assert!(!controller.is_loading());
    assert!(!controller.is_authenticated());
    assert_eq!(controller.view(), View::Welcome);
    assert_eq!(gateway.calls("pets"), 0);
}

#[tokio::test]
async fn test_mount_with_session_bootstraps() {
    let gateway = sample_gateway();
    gateway.favorites.lock().push("p2".into());
    gateway.messages.lock().push(message("m1", "u1", false));

    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    assert!(controller.is_authenticated());
    assert_eq!(controller.screen(), Screen::Discovery);
    let cache = controller.cache();
    assert_eq!(cache.pets().len(), 2);
    assert_eq!(cache.favorites().to_vec(), vec!["p2".to_string()]);
    assert_eq!(cache.unread_count(), 1);
    match controller.view() {
        View::Discovery { pets, .. } => assert_eq!(pets.len(), 2),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[tokio::test]
async fn test_bootstrap_tolerates_partial_failure() {
    let gateway = sample_gateway();
    gateway.fail("applications");
    gateway.messages.lock().push(message("m1", "u1", false));

    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    let cache = controller.cache();
    assert_eq!(cache.pets().len(), 2);
    assert!(cache.applications().is_empty());
    assert_eq!(cache.messages().len(), 1);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_sign_in_event_bootstraps_once_per_user() {
    let gateway = sample_gateway();
    let (controller, sessions, mut mounted) = mount(&gateway, None).await;

    sessions.sign_in("u1", "secret").await.unwrap();
    assert_eq!(mounted.pump().await, 1);
    assert_eq!(controller.user_id().as_deref(), Some("u1"));
    assert_eq!(gateway.calls("pets"), 1);

    // 同一用户重复事件不会重新加载
    mounted
        .controller()
        .handle_auth_event(AuthEvent::SignedIn(session("u1")))
        .await;
    assert_eq!(gateway.calls("pets"), 1);
    assert_eq!(controller.screen(), Screen::Discovery);
}

#[tokio::test]
async fn test_sign_out_clears_user_data() {
    let gateway = sample_gateway();
    gateway.favorites.lock().push("p1".into());
    gateway.messages.lock().push(message("m1", "u1", false));
    let (controller, sessions, mut mounted) = mount(&gateway, Some("u1")).await;
    controller
        .add_application(&pet("p2", "旺财", Category::Dog))
        .await
        .unwrap();

    sessions.sign_out().await.unwrap();
    mounted.pump().await;

    let cache = controller.cache();
    assert!(cache.favorites().is_empty());
    assert!(cache.applications().is_empty());
    assert!(cache.messages().is_empty());
    assert_eq!(cache.pets().len(), 2);
    assert!(!controller.is_authenticated());
    assert_eq!(controller.user_id(), None);
    assert_eq!(controller.screen(), Screen::Welcome);
    assert_eq!(controller.view(), View::Welcome);
}

#[tokio::test]
async fn test_unmounted_controller_ignores_events() {
    let gateway = sample_gateway();
    let (controller, sessions, mounted) = mount(&gateway, None).await;
    mounted.unmount();

    sessions.sign_in("u1", "secret").await.unwrap();
    assert!(!controller.is_authenticated());
}

#[tokio::test]
async fn test_actions_require_sign_in() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, None).await;
    controller.navigate_to(Screen::Discovery, None);

    let result = controller.toggle_favorite("p1").await;
    assert!(matches!(result, Err(ActionError::NotSignedIn)));
    let result = controller.add_application(&pet("p1", "奶茶", Category::Cat)).await;
    assert!(matches!(result, Err(ActionError::NotSignedIn)));

    assert_eq!(
        controller.take_notices(),
        vec![Notice::SignInRequired, Notice::SignInRequired]
    );
    assert_eq!(controller.screen(), Screen::Welcome);
    assert_eq!(gateway.calls("add_favorite"), 0);
    assert_eq!(gateway.calls("submit_application"), 0);
}

#[tokio::test]
async fn test_toggle_favorite_adds_then_removes() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    let outcome = controller.toggle_favorite("p1").await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Added);
    assert!(controller.cache().is_favorite("p1"));

    let outcome = controller.toggle_favorite("p1").await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert!(!controller.cache().is_favorite("p1"));
    assert_eq!(gateway.calls("add_favorite"), 1);
    assert_eq!(gateway.calls("remove_favorite"), 1);
}

#[tokio::test]
async fn test_toggle_favorite_rolls_back_on_failure() {
    let gateway = sample_gateway();
    gateway.favorites.lock().push("p2".into());
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.fail("add_favorite");
    gateway.fail("remove_favorite");

    assert!(controller.toggle_favorite("p1").await.is_err());
    assert!(!controller.cache().is_favorite("p1"));

    assert!(controller.toggle_favorite("p2").await.is_err());
    assert!(controller.cache().is_favorite("p2"));

    assert_eq!(
        controller.take_notices(),
        vec![Notice::OperationFailed, Notice::OperationFailed]
    );
}

#[tokio::test]
async fn test_toggle_favorite_conflict_is_reported() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.conflict("add_favorite");

    let result = controller.toggle_favorite("p1").await;
    assert!(matches!(result, Err(ActionError::AlreadyExists(_))));
    assert!(!controller.cache().is_favorite("p1"));
    assert_eq!(controller.take_notices(), vec![Notice::AlreadyFavorited]);
}

#[tokio::test]
async fn test_double_toggle_issues_single_request() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    let gate = gateway.gate("add_favorite");
    controller.navigate_to(Screen::Detail, Some(pet("p1", "奶茶", Category::Cat)));

    let (first, second) = tokio::join!(controller.toggle_favorite("p1"), async {
        tokio::task::yield_now().await;
        // 请求进行中：本地已切换，按钮处于进行中状态
        match controller.view() {
            View::Detail {
                is_favorite,
                toggling,
                ..
            } => assert!(is_favorite && toggling),
            other => panic!("unexpected view: {other:?}"),
        }
        let second = controller.toggle_favorite("p1").await;
        gate.notify_one();
        second
    });

    assert_eq!(first.unwrap(), ToggleOutcome::Added);
    assert_eq!(second.unwrap(), ToggleOutcome::InFlight);
    assert_eq!(gateway.calls("add_favorite"), 1);
    assert!(controller.cache().is_favorite("p1"));
    match controller.view() {
        View::Detail { toggling, .. } => assert!(!toggling),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[tokio::test]
async fn test_sign_out_discards_late_rollback() {
    let gateway = sample_gateway();
    gateway.favorites.lock().push("p1".into());
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.fail("remove_favorite");
    let gate = gateway.gate("remove_favorite");

    let (result, _) = tokio::join!(controller.toggle_favorite("p1"), async {
        tokio::task::yield_now().await;
        controller.handle_auth_event(AuthEvent::SignedOut).await;
        gate.notify_one();
    });

    assert!(result.is_err());
    // 失败回滚发生在登出之后，不能把上个会话的收藏写回来
    assert!(controller.cache().favorites().is_empty());
}

#[tokio::test]
async fn test_add_application_inserts_application_and_notice() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    let naicha = pet("p1", "奶茶", Category::Cat);

    let application = controller.add_application(&naicha).await.unwrap();
    assert_eq!(application.status, ApplicationStatus::PendingReview);

    let cache = controller.cache();
    assert_eq!(cache.applications()[0].pet_name, "奶茶");
    assert_eq!(cache.applications()[0].status, ApplicationStatus::PendingReview);
    // 重新拉取后只剩服务端的通知
    assert_eq!(cache.messages().len(), 1);
    assert_eq!(cache.messages()[0].origin, Origin::Confirmed);
    assert_eq!(gateway.calls("messages"), 2);
}

#[tokio::test]
async fn test_provisional_notice_visible_before_refetch() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    let gate = gateway.gate("messages");
    let naicha = pet("p1", "奶茶", Category::Cat);

    let (result, _) = tokio::join!(controller.add_application(&naicha), async {
        tokio::task::yield_now().await;
        let cache = controller.cache();
        assert_eq!(cache.applications().len(), 1);
        assert_eq!(cache.messages().len(), 1);
        let entry = &cache.messages()[0];
        assert_eq!(entry.origin, Origin::Provisional);
        assert_eq!(entry.message.title, "申请提交成功");
        assert_eq!(
            entry.message.content,
            "您对\"奶茶\"的领养申请已成功提交，请耐心等待审核。"
        );
        assert!(!entry.message.is_read);
        gate.notify_one();
    });

    result.unwrap();
    assert_eq!(controller.cache().messages()[0].origin, Origin::Confirmed);
}

#[tokio::test]
async fn test_refetch_failure_keeps_provisional_notice() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.fail("messages");

    controller
        .add_application(&pet("p1", "奶茶", Category::Cat))
        .await
        .unwrap();

    let cache = controller.cache();
    assert_eq!(cache.messages().len(), 1);
    assert_eq!(cache.messages()[0].origin, Origin::Provisional);
    assert_eq!(cache.unread_count(), 1);
}

#[tokio::test]
async fn test_duplicate_application_leaves_cache_unchanged() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.conflict("submit_application");

    let result = controller
        .add_application(&pet("p1", "奶茶", Category::Cat))
        .await;

    assert!(matches!(result, Err(ActionError::AlreadyExists(_))));
    let cache = controller.cache();
    assert!(cache.applications().is_empty());
    assert!(cache.messages().is_empty());
    assert_eq!(controller.take_notices(), vec![Notice::AlreadyApplied]);
}

#[tokio::test]
async fn test_application_failure_notice() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.fail("submit_application");

    let result = controller
        .add_application(&pet("p1", "奶茶", Category::Cat))
        .await;

    assert!(matches!(result, Err(ActionError::Api(_))));
    assert_eq!(controller.take_notices(), vec![Notice::ApplicationFailed]);
    assert_eq!(Notice::ApplicationFailed.text(), "提交申请失败，请稍后重试");
}

#[tokio::test]
async fn test_navigation_keeps_selection() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    let wangcai = pet("p2", "旺财", Category::Dog);

    controller.navigate_to(Screen::Detail, Some(wangcai.clone()));
    controller.set_scroll_offset(320.0);
    controller.navigate_to(Screen::Form, None);

    assert_eq!(controller.selected_pet(), Some(wangcai.clone()));
    assert_eq!(controller.scroll_offset(), 0.0);
    assert_eq!(controller.view(), View::Form { pet: wangcai });
}

#[tokio::test]
async fn test_detail_without_selection_shows_first_pet() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    controller.navigate_to(Screen::Detail, None);
    match controller.view() {
        View::Detail { pet, .. } => assert_eq!(pet.id, "p1"),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_form_goes_to_profile() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    controller.navigate_to(Screen::Form, Some(pet("p2", "旺财", Category::Dog)));
    let application = controller.submit_application_form().await.unwrap();

    assert_eq!(application.pet_id, "p2");
    assert_eq!(controller.screen(), Screen::Profile);
    match controller.view() {
        View::Profile {
            user_id,
            applications,
        } => {
            assert_eq!(user_id, "u1");
            assert_eq!(applications.len(), 1);
        }
        other => panic!("unexpected view: {other:?}"),
    }
}

#[tokio::test]
async fn test_discovery_filter() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    controller.set_discovery_category(Some(Category::Dog));
    match controller.view() {
        View::Discovery { pets, .. } => {
            assert_eq!(pets.len(), 1);
            assert_eq!(pets[0].name, "旺财");
        }
        other => panic!("unexpected view: {other:?}"),
    }

    controller.set_discovery_category(None);
    controller.set_search_query("奶");
    match controller.view() {
        View::Discovery { pets, .. } => assert_eq!(pets[0].id, "p1"),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[tokio::test]
async fn test_mark_message_read() {
    let gateway = sample_gateway();
    gateway.messages.lock().push(message("m1", "u1", false));
    gateway.messages.lock().push(message("m2", "u1", false));
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    controller.mark_message_read("m1").await.unwrap();
    assert_eq!(controller.cache().unread_count(), 1);

    gateway.fail("mark_message_read");
    assert!(controller.mark_message_read("m2").await.is_err());
    assert_eq!(controller.cache().unread_count(), 1);
    assert_eq!(controller.take_notices(), vec![Notice::OperationFailed]);
}

#[tokio::test]
async fn test_provisional_message_read_stays_local() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.fail("messages");
    controller
        .add_application(&pet("p1", "奶茶", Category::Cat))
        .await
        .unwrap();

    let id = controller.cache().messages()[0].message.id.clone();
    controller.mark_message_read(&id).await.unwrap();

    assert_eq!(controller.cache().unread_count(), 0);
    assert_eq!(gateway.calls("mark_message_read"), 0);
}

#[tokio::test]
async fn test_toggles_on_different_pets_are_independent() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    let gate = gateway.gate("add_favorite");

    let (first, second) = tokio::join!(controller.toggle_favorite("p1"), async {
        tokio::task::yield_now().await;
        // p1 的请求仍在进行
        assert_eq!(gateway.calls("add_favorite"), 1);
        let second = controller.toggle_favorite("p2").await;
        gate.notify_one();
        second
    });

    assert_eq!(first.unwrap(), ToggleOutcome::Added);
    assert_eq!(second.unwrap(), ToggleOutcome::Added);
    assert_eq!(gateway.calls("add_favorite"), 2);
    let cache = controller.cache();
    assert!(cache.is_favorite("p1"));
    assert!(cache.is_favorite("p2"));
}

#[tokio::test]
async fn test_detail_shows_placeholder_shelter() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;

    controller.navigate_to(Screen::Detail, Some(pet("p2", "旺财", Category::Dog)));
    match controller.view() {
        View::Detail { shelter, .. } => {
            assert_eq!(shelter, Shelter::default());
            assert_eq!(shelter.name, "暂无数据");
        }
        other => panic!("unexpected view: {other:?}"),
    }
}

#[tokio::test]
async fn test_open_pet_loads_latest_detail() {
    let gateway = sample_gateway();
    let (controller, _sessions, _mounted) = mount(&gateway, Some("u1")).await;
    gateway.pets.lock()[1].status = PetStatus::Pending;

    let loaded = controller.open_pet("p2").await.unwrap();
    assert_eq!(loaded.status, PetStatus::Pending);
    assert_eq!(controller.screen(), Screen::Detail);
    assert_eq!(controller.selected_pet(), Some(loaded));

    let result = controller.open_pet("missing").await;
    assert!(matches!(result, Err(ActionError::Api(ApiError::NotFound(_)))));
    assert_eq!(controller.take_notices(), vec![Notice::OperationFailed]);
    // 失败时停留在原页面
    assert_eq!(controller.selected_pet().map(|p| p.id), Some("p2".to_string()));
}
