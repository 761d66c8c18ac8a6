//! 页面/会话控制器。
//!
//! 控制器是本地缓存唯一的写入方。所有修改先在锁内完成，锁从不跨越
//! `.await`；网络请求期间其他操作照常进行。
//!
//! 乐观更新分两步：先记录旧值并写入新值，请求失败时恢复旧值。每次
//! 登录/登出都会递增会话纪元，旧纪元的响应到达时直接丢弃，不会写进
//! 已经被登出清空的缓存。

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use futures_util::future::join4;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::api::{ApiError, Gateway};
use super::cache::{ClientCache, Origin, provisional_submission_message};
use super::session::{AuthEvent, Session, SessionManager, Subscription};
use super::view::{DiscoveryFilter, Screen, View};
use crate::models::{Application, Category, Pet, Shelter};

/// 需要展示给用户的提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SignInRequired,
    OperationFailed,
    AlreadyFavorited,
    ApplicationFailed,
    AlreadyApplied,
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Notice::SignInRequired => "请先登录",
            Notice::OperationFailed => "操作失败，请稍后重试",
            Notice::AlreadyFavorited => "已经收藏过该宠物",
            Notice::ApplicationFailed => "提交申请失败，请稍后重试",
            Notice::AlreadyApplied => "您已提交过该宠物的领养申请",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("sign in required")]
    NotSignedIn,
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("no pet selected")]
    NoSelection,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for ActionError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Conflict(message) => ActionError::AlreadyExists(message),
            other => ActionError::Api(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// 同一宠物已有请求在进行，本次调用被忽略
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum EntityKey {
    Favorite(String),
    Message(String),
}

struct State {
    screen: Screen,
    loading: bool,
    authenticated: bool,
    user_id: Option<String>,
    selected_pet: Option<Pet>,
    scroll_offset: f64,
    filter: DiscoveryFilter,
    cache: ClientCache,
    epoch: u64,
    in_flight: HashSet<EntityKey>,
    notices: VecDeque<Notice>,
}

impl State {
    fn navigate(&mut self, screen: Screen, pet: Option<Pet>) {
        // 不传宠物时保留上一次的选择
        if let Some(pet) = pet {
            self.selected_pet = Some(pet);
        }
        self.screen = screen;
        self.scroll_offset = 0.0;
    }

    /// 表单和详情页展示的宠物：优先当前选择，否则取列表第一只
    fn shown_pet(&self) -> Option<Pet> {
        self.selected_pet
            .clone()
            .or_else(|| self.cache.pets().first().cloned())
    }

    fn discovery_view(&self) -> View {
        View::Discovery {
            pets: self
                .filter
                .apply(self.cache.pets())
                .into_iter()
                .cloned()
                .collect(),
            filter: self.filter.clone(),
        }
    }
}

/// 在所有退出路径上释放进行中标记
struct InFlightGuard<'a> {
    state: &'a Mutex<State>,
    key: EntityKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().in_flight.remove(&self.key);
    }
}

pub struct Controller {
    gateway: Arc<dyn Gateway>,
    state: Mutex<State>,
}

impl Controller {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(State {
                screen: Screen::Welcome,
                loading: true,
                authenticated: false,
                user_id: None,
                selected_pet: None,
                scroll_offset: 0.0,
                filter: DiscoveryFilter::default(),
                cache: ClientCache::default(),
                epoch: 0,
                in_flight: HashSet::new(),
                notices: VecDeque::new(),
            }),
        }
    }

    pub fn screen(&self) -> Screen {
        self.state.lock().screen
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().authenticated
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.lock().user_id.clone()
    }

    pub fn selected_pet(&self) -> Option<Pet> {
        self.state.lock().selected_pet.clone()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.state.lock().scroll_offset
    }

    pub fn set_scroll_offset(&self, offset: f64) {
        self.state.lock().scroll_offset = offset;
    }

    /// 缓存快照，界面只读
    pub fn cache(&self) -> ClientCache {
        self.state.lock().cache.clone()
    }

    /// 取出待展示的提示
    pub fn take_notices(&self) -> Vec<Notice> {
        self.state.lock().notices.drain(..).collect()
    }

    pub fn navigate_to(&self, screen: Screen, pet: Option<Pet>) {
        self.state.lock().navigate(screen, pet);
    }

    /// 从网关取最新的宠物详情并打开详情页
    pub async fn open_pet(&self, pet_id: &str) -> Result<Pet, ActionError> {
        match self.gateway.pet(pet_id).await {
            Ok(pet) => {
                self.navigate_to(Screen::Detail, Some(pet.clone()));
                Ok(pet)
            }
            Err(e) => {
                tracing::error!("Failed to load pet {}: {}", pet_id, e);
                self.state.lock().notices.push_back(Notice::OperationFailed);
                Err(e.into())
            }
        }
    }

    pub fn set_discovery_category(&self, category: Option<Category>) {
        self.state.lock().filter.category = category;
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.state.lock().filter.query = query.into();
    }

    pub fn view(&self) -> View {
        let state = self.state.lock();
        if state.loading {
            return View::Loading;
        }
        // 未登录时无论当前页面是什么都显示欢迎页
        if !state.authenticated {
            return View::Welcome;
        }

        match state.screen {
            Screen::Welcome => View::Welcome,
            Screen::Discovery => state.discovery_view(),
            Screen::Favorites => View::Favorites {
                pets: state.cache.favorite_pets().into_iter().cloned().collect(),
            },
            Screen::Messages => View::Messages {
                messages: state.cache.messages().to_vec(),
                unread: state.cache.unread_count(),
            },
            Screen::Detail => match state.shown_pet() {
                Some(pet) => View::Detail {
                    is_favorite: state.cache.is_favorite(&pet.id),
                    toggling: state
                        .in_flight
                        .contains(&EntityKey::Favorite(pet.id.clone())),
                    shelter: Shelter::default(),
                    pet,
                },
                None => state.discovery_view(),
            },
            Screen::Form => match state.shown_pet() {
                Some(pet) => View::Form { pet },
                None => state.discovery_view(),
            },
            Screen::Profile => View::Profile {
                user_id: state.user_id.clone().unwrap_or_default(),
                applications: state.cache.applications().to_vec(),
            },
        }
    }

    /// 订阅会话变更并查询当前会话。
    ///
    /// 会话事件经由通道送回控制器自己的事件循环，由 [`Mounted`] 处理。
    pub async fn mount(self: &Arc<Self>, sessions: &SessionManager) -> Mounted {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = sessions.subscribe(move |event| {
            // 接收端已卸载时丢弃事件
            let _ = tx.send(event.clone());
        });

        let initial = match sessions.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to query current session: {}", e);
                None
            }
        };
        self.resume(initial).await;

        Mounted {
            controller: Arc::clone(self),
            events: rx,
            subscription,
        }
    }

    /// 应用初始会话查询的结果，之后无论结果如何都结束加载状态
    pub async fn resume(&self, session: Option<Session>) {
        let bootstrap = self.apply_session(session.as_ref());
        self.state.lock().loading = false;
        if let Some((user_id, epoch)) = bootstrap {
            self.bootstrap_for(&user_id, epoch).await;
        }
    }

    pub async fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) => {
                if let Some((user_id, epoch)) = self.apply_session(Some(&session)) {
                    self.bootstrap_for(&user_id, epoch).await;
                }
            }
            AuthEvent::SignedOut => {
                self.apply_session(None);
            }
        }
    }

    /// 更新登录状态；(user_id, authenticated) 变为新的有效组合时返回需要加载的用户
    fn apply_session(&self, session: Option<&Session>) -> Option<(String, u64)> {
        let mut state = self.state.lock();
        match session {
            Some(session) => {
                let unchanged = state.authenticated
                    && state.user_id.as_deref() == Some(session.user_id.as_str());
                state.authenticated = true;
                state.navigate(Screen::Discovery, None);
                if unchanged {
                    return None;
                }

                // 换了用户，不能保留上一个用户的数据
                if state.user_id.is_some() {
                    state.cache.clear_user_data();
                }
                state.user_id = Some(session.user_id.clone());
                state.epoch += 1;
                tracing::info!("Session started for user {}", session.user_id);
                Some((session.user_id.clone(), state.epoch))
            }
            None => {
                if state.authenticated {
                    tracing::info!("Session ended");
                }
                state.user_id = None;
                state.authenticated = false;
                state.cache.clear_user_data();
                state.epoch += 1;
                state.navigate(Screen::Welcome, None);
                None
            }
        }
    }

    /// 重新加载当前用户的全部数据
    pub async fn refresh(&self) -> Result<(), ActionError> {
        let (user_id, epoch) = self.require_user()?;
        self.bootstrap_for(&user_id, epoch).await;
        Ok(())
    }

    // 四个请求并发执行，任何一个失败只影响对应的数据，不回滚其他数据
    async fn bootstrap_for(&self, user_id: &str, epoch: u64) {
        let gateway = &self.gateway;
        let (pets, favorites, applications, messages) = join4(
            gateway.pets(),
            gateway.favorites(user_id),
            gateway.applications(user_id),
            gateway.messages(user_id),
        )
        .await;

        let mut state = self.state.lock();
        if state.epoch != epoch {
            tracing::debug!("Discarding stale bootstrap for user {}", user_id);
            return;
        }

        match pets {
            Ok(pets) => state.cache.replace_pets(pets),
            Err(e) => tracing::warn!("Failed to load pets: {}", e),
        }
        match favorites {
            Ok(pets) => state
                .cache
                .replace_favorites(pets.into_iter().map(|pet| pet.id)),
            Err(e) => tracing::warn!("Failed to load favorites: {}", e),
        }
        match applications {
            Ok(applications) => state.cache.replace_applications(applications),
            Err(e) => tracing::warn!("Failed to load applications: {}", e),
        }
        match messages {
            Ok(messages) => state.cache.replace_messages(messages),
            Err(e) => tracing::warn!("Failed to load messages: {}", e),
        }
        state.loading = false;
    }

    /// 未登录时提示并跳回欢迎页
    fn require_user(&self) -> Result<(String, u64), ActionError> {
        let mut state = self.state.lock();
        match state.user_id.clone() {
            Some(user_id) => Ok((user_id, state.epoch)),
            None => {
                state.notices.push_back(Notice::SignInRequired);
                state.navigate(Screen::Welcome, None);
                Err(ActionError::NotSignedIn)
            }
        }
    }

    /// 切换收藏状态。
    ///
    /// 先修改本地状态再发请求，失败时恢复原值。同一宠物同时只允许一个
    /// 请求，进行中再次调用直接返回 [`ToggleOutcome::InFlight`]。
    pub async fn toggle_favorite(&self, pet_id: &str) -> Result<ToggleOutcome, ActionError> {
        let (user_id, epoch) = self.require_user()?;
        let key = EntityKey::Favorite(pet_id.to_string());

        let was_favorite = {
            let mut state = self.state.lock();
            if !state.in_flight.insert(key.clone()) {
                tracing::debug!("Favorite toggle for {} already in flight", pet_id);
                return Ok(ToggleOutcome::InFlight);
            }
            let was_favorite = state.cache.is_favorite(pet_id);
            state.cache.set_favorite(pet_id, !was_favorite);
            was_favorite
        };
        let _guard = InFlightGuard {
            state: &self.state,
            key,
        };

        let result = if was_favorite {
            self.gateway
                .remove_favorite(&user_id, pet_id)
                .await
                .map(|_| ToggleOutcome::Removed)
        } else {
            self.gateway
                .add_favorite(&user_id, pet_id)
                .await
                .map(|_| ToggleOutcome::Added)
        };

        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!("Failed to toggle favorite {}: {}", pet_id, e);
                let mut state = self.state.lock();
                if state.epoch == epoch {
                    state.cache.set_favorite(pet_id, was_favorite);
                }
                state.notices.push_back(if e.is_conflict() {
                    Notice::AlreadyFavorited
                } else {
                    Notice::OperationFailed
                });
                Err(e.into())
            }
        }
    }

    /// 详情页的收藏按钮
    pub async fn toggle_selected_favorite(&self) -> Result<ToggleOutcome, ActionError> {
        let pet = self.state.lock().shown_pet();
        match pet {
            Some(pet) => self.toggle_favorite(&pet.id).await,
            None => Err(ActionError::NoSelection),
        }
    }

    /// 提交领养申请。
    ///
    /// 成功后立即把申请和一条本地合成的通知插到列表最前面，再拉取服务端
    /// 消息列表整体替换；拉取失败时保留本地通知。
    pub async fn add_application(&self, pet: &Pet) -> Result<Application, ActionError> {
        let (user_id, epoch) = self.require_user()?;

        let application = match self.gateway.submit_application(&user_id, pet).await {
            Ok(application) => application,
            Err(e) => {
                tracing::error!("Failed to submit application for {}: {}", pet.id, e);
                self.state.lock().notices.push_back(if e.is_conflict() {
                    Notice::AlreadyApplied
                } else {
                    Notice::ApplicationFailed
                });
                return Err(e.into());
            }
        };

        {
            let mut state = self.state.lock();
            if state.epoch != epoch {
                return Ok(application);
            }
            state.cache.prepend_application(application.clone());
            state
                .cache
                .prepend_provisional_message(provisional_submission_message(&user_id, &pet.name));
        }

        // 服务端通知与上面的本地通知独立写入，这里重新拉取以收敛
        match self.gateway.messages(&user_id).await {
            Ok(messages) => {
                let mut state = self.state.lock();
                if state.epoch == epoch {
                    state.cache.replace_messages(messages);
                }
            }
            Err(e) => tracing::warn!("Failed to reload messages: {}", e),
        }

        Ok(application)
    }

    /// 申请表单提交：跳转到个人页后提交当前展示的宠物
    pub async fn submit_application_form(&self) -> Result<Application, ActionError> {
        let pet = self.state.lock().shown_pet();
        let Some(pet) = pet else {
            return Err(ActionError::NoSelection);
        };
        self.navigate_to(Screen::Profile, None);
        self.add_application(&pet).await
    }

    /// 标记消息已读，同样先改本地再请求，失败时恢复。
    /// 本地合成的消息没有服务端记录，只修改本地。
    pub async fn mark_message_read(&self, message_id: &str) -> Result<(), ActionError> {
        let (_, epoch) = self.require_user()?;
        let key = EntityKey::Message(message_id.to_string());

        {
            let mut state = self.state.lock();
            if state.in_flight.contains(&key) {
                return Ok(());
            }
            match state.cache.message_origin(message_id) {
                None => return Ok(()),
                Some(Origin::Provisional) => {
                    state.cache.set_message_read(message_id, true);
                    return Ok(());
                }
                Some(Origin::Confirmed) => {}
            }
            if state.cache.set_message_read(message_id, true) == Some(true) {
                return Ok(());
            }
            state.in_flight.insert(key.clone());
        }
        let _guard = InFlightGuard {
            state: &self.state,
            key,
        };

        match self.gateway.mark_message_read(message_id, true).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!("Failed to mark message {} as read: {}", message_id, e);
                let mut state = self.state.lock();
                if state.epoch == epoch {
                    state.cache.set_message_read(message_id, false);
                }
                state.notices.push_back(Notice::OperationFailed);
                Err(e.into())
            }
        }
    }
}

/// 已挂载的控制器，持有会话订阅和事件接收端
pub struct Mounted {
    controller: Arc<Controller>,
    events: mpsc::UnboundedReceiver<AuthEvent>,
    subscription: Subscription,
}

impl Mounted {
    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    /// 处理当前已到达的全部事件，返回处理的数量
    pub async fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.controller.handle_auth_event(event).await;
            handled += 1;
        }
        handled
    }

    /// 持续处理事件，直到会话组件被销毁
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.controller.handle_auth_event(event).await;
        }
    }

    pub fn unmount(self) {
        self.subscription.unsubscribe();
    }
}
