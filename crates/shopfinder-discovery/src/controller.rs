//! Shop discovery state machine.
//!
//! [`DiscoveryController`] owns all discovery state: the viewer position,
//! the nearby/all mode, the fetched shop list and the filter inputs. It is
//! driven through `&mut self`, so every transition is applied in order.
//!
//! ## Endpoint selection
//!
//! | Mode     | Location            | Endpoint                      |
//! |----------|---------------------|-------------------------------|
//! | `All`    | any                 | `/api/shops`                  |
//! | `Nearby` | denied / pending    | `/api/shops`                  |
//! | `Nearby` | `(0, 0)` sentinel   | `/api/shops`                  |
//! | `Nearby` | real coordinate     | `/api/shops/coordinates`      |
//!
//! ## Superseded requests
//!
//! Each fetch is stamped with a request generation. A response is applied
//! only if no newer fetch was started after it (last request wins). Hosts
//! that run fetches concurrently use [`DiscoveryController::begin_fetch`] and
//! [`DiscoveryController::complete_fetch`]; [`DiscoveryController::refresh`]
//! does both back to back.

use shopfinder_client::{ClientError, ShopQuery};
use shopfinder_core::{
    annotate_distances, collect_categories, Coordinate, MovementGate, Shop, ShopFilter, SortOrder,
    DEFAULT_MOVEMENT_THRESHOLD_KM,
};

use crate::location::{LocationError, LocationSource, PermissionState, PositionOptions};
use crate::source::ShopSource;
use crate::view::{DiscoveryView, LocationNotice, ShopCard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryMode {
    #[default]
    Nearby,
    All,
}

impl std::fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryMode::Nearby => write!(f, "nearby"),
            DiscoveryMode::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationStatus {
    /// No lookup has completed yet.
    Pending,
    Available(Coordinate),
    Denied(LocationError),
}

impl LocationStatus {
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, LocationStatus::Denied(_))
    }

    /// The real viewer coordinate, or the `(0, 0)` sentinel.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        match self {
            LocationStatus::Available(c) => *c,
            LocationStatus::Pending | LocationStatus::Denied(_) => Coordinate::UNSET,
        }
    }
}

/// Picks the endpoint for `mode` given what is known about the viewer.
#[must_use]
pub fn select_query(mode: DiscoveryMode, location: &LocationStatus) -> ShopQuery {
    let coord = location.coordinate();
    if mode == DiscoveryMode::All || location.is_denied() || !coord.is_set() {
        ShopQuery::All
    } else {
        ShopQuery::Near(coord)
    }
}

/// Result of the "Enable Location Access" action.
#[derive(Debug, Clone, PartialEq)]
pub enum EnableOutcome {
    /// Position acquired and nearby shops fetched.
    Enabled(Coordinate),
    /// Permission is blocked; the viewer has to change it in settings.
    Blocked,
    /// Permission looked grantable but the lookup still failed.
    StillUnavailable(LocationError),
}

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub position: PositionOptions,
    pub movement_threshold_km: f64,
    pub initial_mode: DiscoveryMode,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            position: PositionOptions::default(),
            movement_threshold_km: DEFAULT_MOVEMENT_THRESHOLD_KM,
            initial_mode: DiscoveryMode::Nearby,
        }
    }
}

/// Ticket for an issued fetch; hand it back to
/// [`DiscoveryController::complete_fetch`] with the result.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct PendingFetch {
    pub generation: u64,
    pub query: ShopQuery,
}

pub struct DiscoveryController<S, L> {
    shops_source: S,
    location_source: L,
    position_options: PositionOptions,
    mode: DiscoveryMode,
    location: LocationStatus,
    gate: MovementGate,
    shops: Vec<Shop>,
    categories: Vec<String>,
    filter: ShopFilter,
    sort: SortOrder,
    loading: bool,
    error: Option<String>,
    notice: Option<LocationNotice>,
    latest_generation: u64,
    last_query: Option<ShopQuery>,
}

impl<S, L> DiscoveryController<S, L>
where
    S: ShopSource,
    L: LocationSource,
{
    pub fn new(shops_source: S, location_source: L, options: DiscoveryOptions) -> Self {
        Self {
            shops_source,
            location_source,
            position_options: options.position,
            mode: options.initial_mode,
            location: LocationStatus::Pending,
            gate: MovementGate::new(options.movement_threshold_km),
            shops: Vec::new(),
            categories: Vec::new(),
            filter: ShopFilter::default(),
            sort: SortOrder::default(),
            loading: false,
            error: None,
            notice: None,
            latest_generation: 0,
            last_query: None,
        }
    }

    /// Acquire the position, then load shops for the current mode.
    pub async fn start(&mut self) {
        self.acquire_location().await;
        self.refresh().await;
    }

    /// Ask the location source for a fix, bounded by the configured timeout.
    ///
    /// Returns `true` when a position was obtained; a `(0, 0)` reading does not
    /// count. On failure the controller falls back to denied behaviour:
    /// all-shops fetches and no distances.
    pub async fn acquire_location(&mut self) -> bool {
        let timeout = self.position_options.timeout;
        let lookup = self.location_source.current_position(&self.position_options);
        let result = match tokio::time::timeout(timeout, lookup).await {
            Ok(Ok(coord)) if !coord.is_set() => Err(LocationError::Unavailable(
                "location source reported the (0, 0) placeholder".to_string(),
            )),
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout(timeout)),
        };

        match result {
            Ok(coord) => {
                tracing::info!(%coord, "location acquired");
                self.location = LocationStatus::Available(coord);
                self.notice = None;
                annotate_distances(&mut self.shops, coord);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "location unavailable, falling back to all shops");
                self.location = LocationStatus::Denied(err);
                self.notice = Some(LocationNotice::Denied);
                annotate_distances(&mut self.shops, Coordinate::UNSET);
                false
            }
        }
    }

    /// Issue a fetch for the currently selected query.
    pub fn begin_fetch(&mut self) -> PendingFetch {
        let query = select_query(self.mode, &self.location);
        self.begin_fetch_for(query)
    }

    fn begin_fetch_for(&mut self, query: ShopQuery) -> PendingFetch {
        self.latest_generation += 1;
        self.loading = true;
        self.error = None;
        self.last_query = Some(query);
        if let ShopQuery::Near(coord) = query {
            self.gate.mark_fetched(coord);
        }
        tracing::debug!(generation = self.latest_generation, %query, "fetch issued");
        PendingFetch {
            generation: self.latest_generation,
            query,
        }
    }

    /// Apply the outcome of `pending`.
    ///
    /// Returns `false` (and changes nothing) when a newer fetch has been
    /// issued since `pending`.
    pub fn complete_fetch(
        &mut self,
        pending: PendingFetch,
        result: Result<Vec<Shop>, ClientError>,
    ) -> bool {
        if pending.generation != self.latest_generation {
            tracing::debug!(
                generation = pending.generation,
                latest = self.latest_generation,
                "discarding superseded shops response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(mut shops) => {
                annotate_distances(&mut shops, self.location.coordinate());
                self.categories = collect_categories(&shops);
                tracing::info!(count = shops.len(), query = %pending.query, "shops loaded");
                self.shops = shops;
                self.error = None;
            }
            Err(err) => {
                tracing::error!(error = %err, query = %pending.query, "failed to load shops");
                self.shops.clear();
                self.categories.clear();
                self.error = Some(format!("Failed to load shops: {err}"));
            }
        }
        true
    }

    /// Fetch and apply shops for the current mode and location.
    pub async fn refresh(&mut self) {
        let pending = self.begin_fetch();
        self.run(pending).await;
    }

    /// "Try Again": repeat the last query, or the current one if none ran.
    pub async fn retry(&mut self) {
        let pending = match self.last_query {
            Some(query) => self.begin_fetch_for(query),
            None => self.begin_fetch(),
        };
        self.run(pending).await;
    }

    async fn run(&mut self, pending: PendingFetch) {
        let result = self.shops_source.fetch_shops(pending.query).await;
        self.complete_fetch(pending, result);
    }

    /// Switch between nearby and all shops. Changing the mode always fetches.
    ///
    /// Returns `true` if a fetch was made.
    pub async fn set_mode(&mut self, mode: DiscoveryMode) -> bool {
        if mode == self.mode {
            return false;
        }
        tracing::info!(from = %self.mode, to = %mode, "discovery mode changed");
        self.mode = mode;
        self.refresh().await;
        true
    }

    /// New viewer position from a GPS update or a map drag/click.
    ///
    /// Distances are recomputed immediately. A nearby fetch is made only if the
    /// movement gate lets the new position through. Returns `true` if a fetch
    /// was made.
    pub async fn observe_position(&mut self, coord: Coordinate) -> bool {
        if !coord.is_set() {
            tracing::debug!("ignoring sentinel position update");
            return false;
        }

        self.location = LocationStatus::Available(coord);
        self.notice = None;
        annotate_distances(&mut self.shops, coord);

        if self.mode != DiscoveryMode::Nearby || !self.gate.should_fetch(coord) {
            return false;
        }
        self.refresh().await;
        true
    }

    /// The "Enable Location Access" action.
    pub async fn enable_location_access(&mut self) -> EnableOutcome {
        let permission = self.location_source.query_permission().await;
        tracing::info!(?permission, "location permission queried");

        match permission {
            Ok(PermissionState::Denied) => {
                self.notice = Some(LocationNotice::Blocked);
                EnableOutcome::Blocked
            }
            Ok(PermissionState::Granted | PermissionState::Prompt) => {
                if self.acquire_location().await {
                    let coord = self.location.coordinate();
                    self.mode = DiscoveryMode::Nearby;
                    self.refresh().await;
                    EnableOutcome::Enabled(coord)
                } else {
                    match &self.location {
                        LocationStatus::Denied(err) => EnableOutcome::StillUnavailable(err.clone()),
                        _ => EnableOutcome::StillUnavailable(LocationError::Unavailable(
                            "no position reported".to_string(),
                        )),
                    }
                }
            }
            Err(err) => {
                self.notice = Some(LocationNotice::Unsupported);
                EnableOutcome::StillUnavailable(err)
            }
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    #[must_use]
    pub fn mode(&self) -> DiscoveryMode {
        self.mode
    }

    #[must_use]
    pub fn location(&self) -> &LocationStatus {
        &self.location
    }

    /// All fetched shops, unfiltered, with distances attached.
    #[must_use]
    pub fn shops(&self) -> &[Shop] {
        &self.shops
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn last_query(&self) -> Option<ShopQuery> {
        self.last_query
    }

    #[must_use]
    pub fn gate(&self) -> &MovementGate {
        &self.gate
    }

    /// Shops passing the filter, in display order.
    #[must_use]
    pub fn visible_shops(&self) -> Vec<&Shop> {
        let mut visible = self.filter.apply(&self.shops);
        self.sort.sort(&mut visible);
        visible
    }

    #[must_use]
    pub fn view(&self) -> DiscoveryView {
        let shops: Vec<ShopCard> = self.visible_shops().into_iter().map(ShopCard::from).collect();
        DiscoveryView {
            mode: self.mode,
            location_available: self.location.coordinate().is_set(),
            show_enable_location: self.location.is_denied(),
            notice: self.notice.map(|n| n.message().to_string()),
            loading: self.loading,
            error: self.error.clone(),
            show_retry: self.error.is_some(),
            categories: self.categories.clone(),
            selected_category: self.filter.category.clone(),
            search_term: self.filter.search_term.clone(),
            total_count: self.shops.len(),
            shops,
        }
    }
}
