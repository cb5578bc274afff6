//! Client orchestration
//!
//! Wires the API, the state reducer and the map renderer together. Every
//! caught failure becomes a [`Notice`] for the UI; the location list is only
//! changed by a successful server round trip.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use footprint_common::config::ClientSection;
use footprint_common::{CoupleCode, LatLng, Location};
use tokio::sync::watch;
use tracing::{error, info};

use crate::api_client::FootprintApi;
use crate::cache::{self, AutoSaver, LocalCache};
use crate::draft::RegistrationDraft;
use crate::map::{Geocoder, MapProvider, MapRenderer, PlaceResult};
use crate::migration::{self, MigrationReport};
use crate::state::{Action, ClientState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Short message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub struct FootprintApp<M: MapProvider> {
    api: Arc<dyn FootprintApi>,
    geocoder: Arc<dyn Geocoder>,
    renderer: MapRenderer<M>,
    state: ClientState,
    code: Option<CoupleCode>,
    cache: Option<Arc<LocalCache>>,
    snapshot: watch::Sender<Vec<Location>>,
    notices: Vec<Notice>,
}

impl<M: MapProvider> FootprintApp<M> {
    pub fn new(
        api: Arc<dyn FootprintApi>,
        geocoder: Arc<dyn Geocoder>,
        renderer: MapRenderer<M>,
    ) -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            api,
            geocoder,
            renderer,
            state: ClientState::new(),
            code: None,
            cache: None,
            snapshot,
            notices: Vec::new(),
        }
    }

    /// Attach a local cache; a couple code remembered there is picked up
    pub fn with_cache(mut self, cache: Arc<LocalCache>) -> Self {
        if self.code.is_none() {
            self.code = cache.couple_code();
        }
        self.cache = Some(cache);
        self
    }

    /// Start periodic saving of the location list to the attached cache
    pub fn start_autosave(&self, period: Duration) -> Option<AutoSaver> {
        let cache = self.cache.as_ref()?;
        Some(AutoSaver::spawn(
            Arc::clone(cache),
            self.snapshot.subscribe(),
            period,
        ))
    }

    /// Start auto-save with the period from `[client] autosave_secs`
    pub fn start_autosave_from_config(&self, section: &ClientSection) -> Option<AutoSaver> {
        self.start_autosave(cache::autosave_period(section))
    }

    pub fn couple_code(&self) -> Option<&CoupleCode> {
        self.code.as_ref()
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn renderer(&self) -> &MapRenderer<M> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut MapRenderer<M> {
        &mut self.renderer
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        if level == NoticeLevel::Error {
            error!("{}", message);
        }
        self.notices.push(Notice { level, message });
    }

    fn require_code(&mut self) -> Option<CoupleCode> {
        if self.code.is_none() {
            self.notify(NoticeLevel::Error, "먼저 커플 코드를 연결해주세요.");
        }
        self.code.clone()
    }

    fn remember_code(&mut self, code: CoupleCode) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_couple_code(&code) {
                error!("Failed to cache couple code: {}", e);
            }
        }
        self.code = Some(code);
    }

    /// Issue a new couple code and switch to it
    pub async fn create_couple(&mut self, anniversary: Option<NaiveDate>) -> Option<CoupleCode> {
        match self.api.create_couple(anniversary).await {
            Ok(code) => {
                if let (Some(cache), Some(date)) = (&self.cache, anniversary) {
                    if let Err(e) = cache.set_anniversary_date(date) {
                        error!("Failed to cache anniversary date: {}", e);
                    }
                }
                self.remember_code(code.clone());
                self.dispatch(Action::Loaded(Vec::new()));
                self.notify(
                    NoticeLevel::Success,
                    format!("커플 코드가 생성되었습니다! 💕 ({})", code),
                );
                Some(code)
            }
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("커플 코드 생성에 실패했습니다: {}", e),
                );
                None
            }
        }
    }

    /// Join with a code typed by the partner, then load its records
    pub async fn connect(&mut self, raw_code: &str) -> bool {
        match self.api.join_couple(raw_code).await {
            Ok(couple) => {
                info!("Connected to couple {}", couple.couple_code);
                if let (Some(cache), Some(date)) = (&self.cache, couple.anniversary_date) {
                    if let Err(e) = cache.set_anniversary_date(date) {
                        error!("Failed to cache anniversary date: {}", e);
                    }
                }
                self.remember_code(couple.couple_code);
                self.reload().await
            }
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("커플 코드를 찾을 수 없습니다: {}", e),
                );
                false
            }
        }
    }

    /// Replace the list with the server's
    pub async fn reload(&mut self) -> bool {
        let Some(code) = self.require_code() else {
            return false;
        };

        match self.api.list_locations(&code).await {
            Ok(locations) => {
                self.dispatch(Action::Loaded(locations));
                true
            }
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("맛집 목록을 불러올 수 없습니다: {}", e),
                );
                false
            }
        }
    }

    /// Submit a registration draft
    pub async fn add_location(&mut self, draft: RegistrationDraft) -> Option<Location> {
        let code = self.require_code()?;

        if let Err(e) = draft.validate() {
            self.notify(NoticeLevel::Error, format!("입력 내용을 확인해주세요: {}", e));
            return None;
        }

        let request = draft.into_request(&code);
        match self.api.create_location(&request).await {
            Ok(location) => {
                self.renderer.clear_selection();
                self.dispatch(Action::Added(location.clone()));
                self.notify(
                    NoticeLevel::Success,
                    format!("새로운 추억이 저장되었습니다! 💕 ({})", location.name),
                );
                Some(location)
            }
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("저장 중 오류가 발생했습니다. 다시 시도해주세요. ({})", e),
                );
                None
            }
        }
    }

    pub async fn remove_location(&mut self, id: i64) -> bool {
        let Some(code) = self.require_code() else {
            return false;
        };

        match self.api.delete_location(id, &code).await {
            Ok(0) => {
                self.notify(NoticeLevel::Info, "삭제할 맛집을 찾지 못했습니다.");
                false
            }
            Ok(_) => {
                self.dispatch(Action::Removed(id));
                self.notify(NoticeLevel::Success, "맛집이 삭제되었습니다.");
                true
            }
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("맛집 삭제에 실패했습니다: {}", e),
                );
                false
            }
        }
    }

    /// Apply an action, publish the new list and redraw
    pub fn dispatch(&mut self, action: Action) {
        let list_changed = matches!(
            action,
            Action::Loaded(_) | Action::Added(_) | Action::Removed(_)
        );

        self.state.apply(action);

        if list_changed {
            self.snapshot.send_replace(self.state.locations().to_vec());
        }
        self.redraw();
    }

    /// Draw markers and date lines for the visible records
    pub fn redraw(&mut self) {
        let visible = self.state.visible();
        let result = self
            .renderer
            .render_markers(visible.iter().copied())
            .and_then(|_| self.renderer.render_date_lines(visible.iter().copied()));

        if let Err(e) = result {
            self.notify(NoticeLevel::Error, format!("지도 오류: {}", e));
        }
    }

    /// Click on empty map surface
    pub async fn map_clicked(
        &mut self,
        position: LatLng,
        today: NaiveDate,
    ) -> Option<RegistrationDraft> {
        match self
            .renderer
            .handle_map_click(position, self.geocoder.as_ref(), today)
            .await
        {
            Ok(draft) => Some(draft),
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("주소를 찾을 수 없습니다: {}", e),
                );
                None
            }
        }
    }

    /// Focus a search result; returns a draft pre-filled from it
    pub fn select_search_result(
        &mut self,
        place: &PlaceResult,
        today: NaiveDate,
    ) -> Option<RegistrationDraft> {
        match self.renderer.select_place(place) {
            Ok(()) => Some(RegistrationDraft::from_place(place, today)),
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("지도 오류: {}", e));
                None
            }
        }
    }

    /// Push cached records to the server once, then reload
    pub async fn migrate_cache(&mut self, today: NaiveDate) -> Option<MigrationReport> {
        let code = self.require_code()?;
        let Some(cache) = self.cache.clone() else {
            self.notify(NoticeLevel::Error, "옮길 로컬 데이터가 없습니다.");
            return None;
        };

        let result = migration::migrate_cache(
            &cache,
            self.api.as_ref(),
            self.geocoder.as_ref(),
            &code,
            today,
        )
        .await;

        match result {
            Ok(report) if report.already_done => {
                self.notify(NoticeLevel::Info, "로컬 데이터는 이미 옮겨졌습니다.");
                Some(report)
            }
            Ok(report) => {
                if report.is_complete() {
                    self.notify(
                        NoticeLevel::Success,
                        format!(
                            "{}곳을 옮겼습니다 (건너뜀 {}곳)",
                            report.migrated(),
                            report.skipped()
                        ),
                    );
                } else {
                    self.notify(
                        NoticeLevel::Error,
                        format!(
                            "{}곳을 옮겼고 {}곳은 다음에 다시 시도합니다",
                            report.migrated(),
                            report.deferred()
                        ),
                    );
                }
                self.reload().await;
                Some(report)
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("데이터 이전에 실패했습니다: {}", e));
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{ClientError, MapError};
    use crate::map::{HeadlessMap, MapEventBus};
    use async_trait::async_trait;
    use chrono::Utc;
    use footprint_common::{Category, Couple, NewLocation};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory backend double
    #[derive(Default)]
    pub(crate) struct FakeApi {
        locations: Mutex<Vec<Location>>,
        couples: Mutex<Vec<CoupleCode>>,
        fail: bool,
    }

    impl FakeApi {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub(crate) fn stored(&self) -> Vec<Location> {
            self.locations.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), ClientError> {
            if self.fail {
                Err(ClientError::Rejected {
                    status: 500,
                    message: "맛집 등록에 실패했습니다.".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl FootprintApi for FakeApi {
        async fn create_couple(&self, _: Option<NaiveDate>) -> Result<CoupleCode, ClientError> {
            self.check()?;
            let code = CoupleCode::generate();
            self.couples.lock().unwrap().push(code.clone());
            Ok(code)
        }

        async fn get_couple(&self, code: &CoupleCode) -> Result<Couple, ClientError> {
            self.join_couple(code.as_str()).await
        }

        async fn join_couple(&self, code: &str) -> Result<Couple, ClientError> {
            self.check()?;
            let parsed =
                CoupleCode::parse(code).map_err(|_| ClientError::NotFound(code.to_string()))?;
            if !self.couples.lock().unwrap().contains(&parsed) {
                return Err(ClientError::NotFound(code.to_string()));
            }
            Ok(Couple {
                couple_code: parsed,
                anniversary_date: NaiveDate::from_ymd_opt(2023, 3, 14),
                created_at: Utc::now(),
            })
        }

        async fn list_locations(&self, code: &CoupleCode) -> Result<Vec<Location>, ClientError> {
            self.check()?;
            Ok(self
                .locations
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|l| &l.couple_code == code)
                .cloned()
                .collect())
        }

        async fn create_location(&self, request: &NewLocation) -> Result<Location, ClientError> {
            self.check()?;
            let code = request
                .validate()
                .map_err(|e| ClientError::Rejected {
                    status: 400,
                    message: e.to_string(),
                })?;
            let mut locations = self.locations.lock().unwrap();
            let location = Location {
                id: locations.len() as i64 + 1,
                couple_code: code,
                name: request.name.clone(),
                address: request.address.clone(),
                category: request.category,
                rating: request.rating as u8,
                visit_date: request.date,
                visit_time: request.time,
                memo: request.memo_trimmed(),
                photos: request.photos.clone(),
                latitude: request.lat,
                longitude: request.lng,
                created_at: Utc::now(),
            };
            locations.push(location.clone());
            Ok(location)
        }

        async fn delete_location(&self, id: i64, code: &CoupleCode) -> Result<u64, ClientError> {
            self.check()?;
            let mut locations = self.locations.lock().unwrap();
            let before = locations.len();
            locations.retain(|l| !(l.id == id && &l.couple_code == code));
            Ok((before - locations.len()) as u64)
        }
    }

    /// Geocoder that knows one address
    #[derive(Default)]
    pub(crate) struct FakeGeocoder {
        pub(crate) down: bool,
    }

    impl FakeGeocoder {
        pub(crate) const KNOWN_POSITION: LatLng = LatLng {
            lat: 37.5512,
            lng: 126.9882,
        };
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<LatLng>, MapError> {
            if self.down {
                return Err(MapError::Geocoding("service unavailable".to_string()));
            }
            Ok(address
                .contains("남산공원길")
                .then_some(Self::KNOWN_POSITION))
        }

        async fn reverse_geocode(&self, _: LatLng) -> Result<Option<String>, MapError> {
            if self.down {
                return Err(MapError::Geocoding("service unavailable".to_string()));
            }
            Ok(Some("서울 용산구 남산공원길 105".to_string()))
        }
    }

    fn app_with(api: Arc<FakeApi>, geocoder: FakeGeocoder) -> FootprintApp<HeadlessMap> {
        FootprintApp::new(
            api,
            Arc::new(geocoder),
            MapRenderer::new(HeadlessMap::new(), MapEventBus::new(16)),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
    }

    fn draft(name: &str, category: Category) -> RegistrationDraft {
        let mut draft = RegistrationDraft::at(
            FakeGeocoder::KNOWN_POSITION,
            "서울 용산구 남산공원길 105".to_string(),
            today(),
        );
        draft.name = name.to_string();
        draft.category = category;
        draft.rating = 4;
        draft
    }

    #[tokio::test]
    async fn test_create_add_and_render() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api.clone(), FakeGeocoder::default());

        let code = app.create_couple(None).await.unwrap();
        assert_eq!(app.couple_code(), Some(&code));

        app.add_location(draft("lunch", Category::Restaurant)).await.unwrap();
        app.add_location(draft("coffee", Category::Cafe)).await.unwrap();

        assert_eq!(app.state().locations().len(), 2);
        assert_eq!(app.state().locations()[0].name, "coffee");
        assert_eq!(app.renderer().marker_count(), 2);
        // Same date, two visits: one line
        assert_eq!(app.renderer().line_count(), 1);

        app.dispatch(Action::ToggleCategory(crate::state::FilterChip::Category(
            Category::Cafe,
        )));
        assert_eq!(app.renderer().marker_count(), 1);
        assert_eq!(app.renderer().line_count(), 0);
    }

    #[tokio::test]
    async fn test_connect_unknown_code_leaves_state() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api, FakeGeocoder::default());

        assert!(!app.connect("ZZZZ9999").await);
        assert_eq!(app.couple_code(), None);
        let notices = app.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_connect_loads_partner_records() {
        let api = Arc::new(FakeApi::default());
        let mut first = app_with(api.clone(), FakeGeocoder::default());
        let code = first.create_couple(None).await.unwrap();
        first.add_location(draft("tower", Category::Travel)).await.unwrap();

        let mut second = app_with(api, FakeGeocoder::default());
        assert!(second.connect(&code.as_str().to_lowercase()).await);
        assert_eq!(second.couple_code(), Some(&code));
        assert_eq!(second.state().locations().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_never_touch_the_list() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api, FakeGeocoder::default());
        app.create_couple(None).await.unwrap();
        app.add_location(draft("kept", Category::Etc)).await.unwrap();
        app.take_notices();

        // Validation failure
        let mut invalid = draft("", Category::Etc);
        invalid.rating = 0;
        assert!(app.add_location(invalid).await.is_none());

        // Map provider failure
        app.renderer_mut().map_mut().set_unavailable(true);
        app.dispatch(Action::SetQuery("kept".to_string()));
        app.renderer_mut().map_mut().set_unavailable(false);

        // Delete with nothing removed
        assert!(!app.remove_location(999).await);

        assert_eq!(app.state().locations().len(), 1);
        let levels: Vec<NoticeLevel> = app.take_notices().iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![NoticeLevel::Error, NoticeLevel::Error, NoticeLevel::Info]
        );
    }

    #[tokio::test]
    async fn test_notices_use_korean_messages() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api, FakeGeocoder::default());
        app.create_couple(None).await.unwrap();
        app.add_location(draft("남산타워", Category::Travel)).await.unwrap();

        let notices = app.take_notices();
        assert_eq!(notices.len(), 2);
        assert!(notices[0].message.starts_with("커플 코드가 생성되었습니다! 💕"));
        assert!(notices[1].message.starts_with("새로운 추억이 저장되었습니다! 💕"));
        assert!(notices[1].message.contains("남산타워"));
    }

    #[tokio::test]
    async fn test_backend_failure_is_a_notice() {
        let api = Arc::new(FakeApi::failing());
        let mut app = app_with(api, FakeGeocoder::default());

        assert!(app.create_couple(None).await.is_none());
        assert!(!app.reload().await);
        assert_eq!(app.take_notices().len(), 2);
        assert!(app.state().locations().is_empty());
    }

    #[tokio::test]
    async fn test_remove_location() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api, FakeGeocoder::default());
        app.create_couple(None).await.unwrap();
        let stored = app.add_location(draft("gone", Category::Etc)).await.unwrap();

        assert!(app.remove_location(stored.id).await);
        assert!(app.state().locations().is_empty());
        assert_eq!(app.renderer().marker_count(), 0);
    }

    #[tokio::test]
    async fn test_map_click_and_search_selection() {
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api.clone(), FakeGeocoder::default());

        let draft = app
            .map_clicked(LatLng::new(37.55, 126.98), today())
            .await
            .unwrap();
        assert_eq!(draft.address, "서울 용산구 남산공원길 105");
        assert!(api.stored().is_empty());

        let place = PlaceResult {
            id: "p1".to_string(),
            name: "남산서울타워".to_string(),
            address: "서울 용산구 용산동2가 산1-3".to_string(),
            road_address: None,
            phone: None,
            category_name: "여행 > 관광,명소".to_string(),
            position: FakeGeocoder::KNOWN_POSITION,
        };
        let draft = app.select_search_result(&place, today()).unwrap();
        assert_eq!(draft.category, Category::Travel);
        assert!(app.renderer().has_selection());
        assert!(app.state().locations().is_empty());

        let mut broken = app_with(api, FakeGeocoder { down: true });
        assert!(broken
            .map_clicked(LatLng::new(37.55, 126.98), today())
            .await
            .is_none());
        assert_eq!(broken.take_notices()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_cache_remembers_code_and_migrates() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(LocalCache::open(dir.path()).unwrap());
        let api = Arc::new(FakeApi::default());

        let mut app = app_with(api.clone(), FakeGeocoder::default()).with_cache(cache.clone());
        let code = app
            .create_couple(NaiveDate::from_ymd_opt(2023, 3, 14))
            .await
            .unwrap();
        assert_eq!(cache.couple_code(), Some(code.clone()));
        assert_eq!(cache.anniversary_date(), NaiveDate::from_ymd_opt(2023, 3, 14));

        cache
            .save(&[crate::cache::CachedRecord {
                id: None,
                name: "남산타워".to_string(),
                address: "서울 용산구 남산공원길 105".to_string(),
                category: Category::Travel,
                rating: 5,
                visit_date: Some(today()),
                time: None,
                memo: None,
                photos: vec![],
                lat: None,
                lng: None,
                created_at: None,
            }])
            .unwrap();

        let report = app.migrate_cache(today()).await.unwrap();
        assert_eq!(report.migrated(), 1);
        assert_eq!(app.state().locations().len(), 1);

        // A fresh app picks the code up from the cache
        let reopened = app_with(api, FakeGeocoder::default()).with_cache(cache);
        assert_eq!(reopened.couple_code(), Some(&code));
    }

    #[tokio::test]
    async fn test_interrupted_migration_is_retried() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(LocalCache::open(dir.path()).unwrap());
        let api = Arc::new(FakeApi::default());

        let mut app = app_with(api.clone(), FakeGeocoder { down: true }).with_cache(cache.clone());
        app.create_couple(None).await.unwrap();
        cache
            .save(&[crate::cache::CachedRecord {
                id: None,
                name: "남산타워".to_string(),
                address: "서울 용산구 남산공원길 105".to_string(),
                category: Category::Travel,
                rating: 5,
                visit_date: Some(today()),
                time: None,
                memo: None,
                photos: vec![],
                lat: None,
                lng: None,
                created_at: None,
            }])
            .unwrap();
        app.take_notices();

        let report = app.migrate_cache(today()).await.unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.deferred(), 1);
        assert_eq!(app.take_notices()[0].level, NoticeLevel::Error);
        assert!(cache.migration_completed_at().is_none());

        let mut restarted = app_with(api.clone(), FakeGeocoder::default()).with_cache(cache.clone());
        let report = restarted.migrate_cache(today()).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.migrated(), 1);
        assert_eq!(restarted.take_notices()[0].level, NoticeLevel::Success);
        assert_eq!(api.stored().len(), 1);
        assert_eq!(restarted.state().locations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_follows_list_changes() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(LocalCache::open(dir.path()).unwrap());
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api, FakeGeocoder::default()).with_cache(cache.clone());

        let saver = app.start_autosave(Duration::from_secs(30)).unwrap();
        app.create_couple(None).await.unwrap();
        app.add_location(draft("saved", Category::Etc)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(cache.load().locations.len(), 1);

        saver.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_period_comes_from_config() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(LocalCache::open(dir.path()).unwrap());
        let api = Arc::new(FakeApi::default());
        let mut app = app_with(api, FakeGeocoder::default()).with_cache(cache.clone());
        let section = ClientSection {
            autosave_secs: Some(5),
            ..Default::default()
        };

        let saver = app.start_autosave_from_config(&section).unwrap();
        app.create_couple(None).await.unwrap();
        app.add_location(draft("saved", Category::Etc)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(cache.load().locations.len(), 1);

        saver.shutdown();
    }
}
