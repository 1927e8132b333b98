//! Store-discovery orchestration.
//!
//! Single-pass, request-scoped pipeline: resolve the user's location, run the
//! physical-store and online-store search phrases through search + extraction,
//! de-duplicate by URL, cap each bucket, attach distances, rank, and truncate.
//! Per-phrase and per-URL failures are logged and skipped; only an unexpected
//! top-level failure escapes to the caller.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tintaloc_geo::{haversine, GeoResolver, Location, PositionEstimate};

use crate::error::DiscoveryError;
use crate::extract::{extract_online_store, extract_store};
use crate::fetch::fetch_page;
use crate::search::SearchClient;
use crate::types::{DiscoveryRequest, StoreCandidate, StoreResult};

/// Tuning knobs for one pipeline instance.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Result URLs taken from each search phrase.
    pub results_per_query: usize,
    /// Courtesy pause between search phrases. Not a retry backoff.
    pub inter_query_delay_ms: u64,
    /// Locale hint forwarded to the search engine.
    pub locale: String,
    /// Physical candidates kept after de-duplication.
    pub physical_cap: usize,
    /// Online candidates kept after de-duplication.
    pub online_cap: usize,
    /// Final response size after merging both buckets.
    pub merged_cap: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            results_per_query: 3,
            inter_query_delay_ms: 1000,
            locale: "pt-BR".to_owned(),
            physical_cap: 8,
            online_cap: 6,
            merged_cap: 10,
        }
    }
}

/// The store-discovery pipeline. Collaborators are injected at construction;
/// the pipeline holds no per-request state, so one instance serves concurrent
/// requests without coordination.
pub struct StoreDiscovery {
    search: SearchClient,
    page_client: reqwest::Client,
    resolver: Arc<GeoResolver>,
    position: Box<dyn PositionEstimate>,
    opts: DiscoveryOptions,
}

impl StoreDiscovery {
    /// Builds a pipeline with the given collaborators. `timeout_secs` bounds
    /// every candidate-page fetch; `user_agent` is sent on those fetches.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the page-fetch `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        search: SearchClient,
        resolver: Arc<GeoResolver>,
        position: Box<dyn PositionEstimate>,
        timeout_secs: u64,
        user_agent: &str,
        opts: DiscoveryOptions,
    ) -> Result<Self, DiscoveryError> {
        let page_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            search,
            page_client,
            resolver,
            position,
            opts,
        })
    }

    /// Runs one discovery request end to end and returns the ranked, merged,
    /// capped result list (physical ascending by distance, then online).
    ///
    /// # Errors
    ///
    /// Sub-stage failures (location lookup, individual search phrases,
    /// individual pages) degrade gracefully and never surface here; an error
    /// return means the whole request failed with no partial results.
    pub async fn discover_stores(
        &self,
        request: &DiscoveryRequest,
    ) -> Result<Vec<StoreResult>, DiscoveryError> {
        let user_location = self
            .resolver
            .resolve(
                request.user_cep.as_deref(),
                request.user_lat,
                request.user_lng,
            )
            .await;

        let mut physical = self
            .collect_physical(request, user_location.as_ref())
            .await;
        dedup_by_url(&mut physical);
        physical.truncate(self.opts.physical_cap);

        let mut online = self.collect_online(request).await;
        dedup_by_url(&mut online);
        // URL uniqueness holds across the whole response, not per bucket: a
        // store surfacing in both stages is reported once, as physical.
        remove_urls_already_kept(&mut online, &physical);
        online.truncate(self.opts.online_cap);

        if let Some(user) = user_location.as_ref() {
            attach_distances(&mut physical, user);
        }

        let mut results: Vec<StoreResult> =
            physical.into_iter().map(StoreResult::physical).collect();
        sort_physical_by_distance(&mut results);
        results.extend(online.into_iter().map(StoreResult::online));
        results.truncate(self.opts.merged_cap);

        tracing::info!(
            color = %request.color_name,
            model = %request.car_model,
            count = results.len(),
            "store discovery finished"
        );
        Ok(results)
    }

    /// Physical-store stage: three color/model phrase variants, city-suffixed
    /// when the user's city is known. Candidate coordinates come from the
    /// injected position estimator whenever a user location exists.
    async fn collect_physical(
        &self,
        request: &DiscoveryRequest,
        user_location: Option<&Location>,
    ) -> Vec<StoreCandidate> {
        let color = &request.color_name;
        let model = &request.car_model;

        let mut phrases = vec![
            format!("loja tinta automotiva \"{color}\" \"{model}\""),
            format!("pintura automotiva \"{model}\" loja"),
            format!("tinta \"{color}\" automóvel \"{model}\""),
        ];
        if let Some(city) = user_location.and_then(|l| l.city.as_deref()) {
            for phrase in &mut phrases {
                phrase.push(' ');
                phrase.push_str(city);
            }
        }

        let mut candidates = Vec::new();
        for (i, phrase) in phrases.iter().enumerate() {
            if i > 0 {
                self.inter_query_pause().await;
            }

            let urls = match self
                .search
                .search(phrase, self.opts.results_per_query, &self.opts.locale)
                .await
            {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::warn!(phrase, error = %e, "physical-store search failed");
                    continue;
                }
            };

            for url in urls {
                let Some(mut candidate) = self.extract_candidate(&url, color, model, false).await
                else {
                    continue;
                };
                if let Some(user) = user_location {
                    let (lat, lng) = self.position.estimate(user);
                    candidate.lat = Some(lat);
                    candidate.lng = Some(lng);
                }
                candidates.push(candidate);
            }
        }
        candidates
    }

    /// Online-store stage: two color-code/model phrase variants, online
    /// extraction rules (product or shipping signal required).
    async fn collect_online(&self, request: &DiscoveryRequest) -> Vec<StoreCandidate> {
        let code = &request.color_code;
        let model = &request.car_model;

        let phrases = [
            format!("comprar tinta automotiva \"{code}\" \"{model}\" online"),
            format!("tinta \"{code}\" \"{model}\" venda online"),
        ];

        let mut candidates = Vec::new();
        for (i, phrase) in phrases.iter().enumerate() {
            if i > 0 {
                self.inter_query_pause().await;
            }

            let urls = match self
                .search
                .search(phrase, self.opts.results_per_query, &self.opts.locale)
                .await
            {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::warn!(phrase, error = %e, "online-store search failed");
                    continue;
                }
            };

            for url in urls {
                if let Some(candidate) = self.extract_candidate(&url, code, model, true).await {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    async fn extract_candidate(
        &self,
        url: &str,
        color_term: &str,
        model_term: &str,
        online: bool,
    ) -> Option<StoreCandidate> {
        let html = match fetch_page(&self.page_client, url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url, error = %e, "candidate page fetch failed");
                return None;
            }
        };

        if online {
            extract_online_store(&html, url, color_term, model_term)
        } else {
            extract_store(&html, url, color_term, model_term)
        }
    }

    async fn inter_query_pause(&self) {
        if self.opts.inter_query_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.opts.inter_query_delay_ms)).await;
        }
    }
}

/// Removes candidates whose URL was already seen; first occurrence wins.
pub(crate) fn dedup_by_url(candidates: &mut Vec<StoreCandidate>) {
    let mut seen: HashSet<String> = HashSet::new();
    candidates.retain(|c| seen.insert(c.url.clone()));
}

/// Drops candidates whose URL already appears in `kept`.
pub(crate) fn remove_urls_already_kept(candidates: &mut Vec<StoreCandidate>, kept: &[StoreCandidate]) {
    let seen: HashSet<&str> = kept.iter().map(|c| c.url.as_str()).collect();
    candidates.retain(|c| !seen.contains(c.url.as_str()));
}

/// Attaches haversine distance/time to every candidate that has coordinates.
pub(crate) fn attach_distances(candidates: &mut [StoreCandidate], user: &Location) {
    for candidate in candidates {
        if let (Some(lat), Some(lng)) = (candidate.lat, candidate.lng) {
            let estimate = haversine(user.lat, user.lng, lat, lng);
            candidate.distance_km = Some(estimate.distance_km);
            candidate.time_min = Some(estimate.time_min);
        }
    }
}

/// Sorts physical results ascending by distance; entries without a distance
/// sort last. The sort is stable, so equal-distance entries keep their
/// extraction order.
pub(crate) fn sort_physical_by_distance(results: &mut [StoreResult]) {
    results.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::INFINITY);
        let db = b.distance_km.unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });
}
