//! The sync engine: staged per-account synchronization.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entity::sentiment_label::SentimentLabel;
use crate::entity::{insight, post, reaction_summary};
use crate::graph::types::{RemoteComment, RemotePost, RemoteReaction};
use crate::graph::{
    is_transient_error, to_comment_model, to_post_model, to_reaction_model, GraphClient,
};
use crate::metrics::{self, REACTIONS_BY_TYPE_METRIC};
use crate::reconcile;
use crate::repository::{self, AccountContext, PostRef, RepositoryError};
use crate::retry::with_retry;
use crate::sentiment::SentimentClassifier;

use super::error::SyncError;
use super::types::{
    AccountSyncResult, CancelFlag, ClassifiedComment, StageStats, SyncOptions, SyncReport,
    SyncStage, COMMENT_FIELDS, POST_FIELDS, REACTION_FIELDS,
};

/// Start of the current UTC day; the lower bound of the `only_today` metric
/// filter.
#[must_use]
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Outcome of processing one post inside a fan-out stage.
struct PostOutcome<M> {
    fetched: usize,
    models: Vec<M>,
    errors: Vec<String>,
    persistence: Option<RepositoryError>,
}

impl<M> PostOutcome<M> {
    fn new() -> Self {
        Self {
            fetched: 0,
            models: Vec::new(),
            errors: Vec::new(),
            persistence: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        let mut outcome = Self::new();
        outcome.errors.push(message.into());
        outcome
    }
}

/// Minimal post shape for the non-persisting comment preview.
#[derive(Debug, Deserialize)]
struct RemotePostId {
    id: String,
}

/// Per-account synchronization engine.
///
/// Explicitly constructed with its collaborators (database pool, Graph
/// client, sentiment classifier) and shared process-wide; accounts are fully
/// independent, so one engine can drive many concurrent runs.
#[derive(Clone)]
pub struct SyncEngine {
    db: Arc<DatabaseConnection>,
    graph: GraphClient,
    classifier: Arc<SentimentClassifier>,
    options: SyncOptions,
    cancel: CancelFlag,
}

impl SyncEngine {
    pub fn new(
        db: Arc<DatabaseConnection>,
        graph: GraphClient,
        classifier: Arc<SentimentClassifier>,
        options: SyncOptions,
    ) -> Self {
        Self {
            db,
            graph,
            classifier,
            options,
            cancel: CancelFlag::new(),
        }
    }

    /// Share a cancellation flag with the caller (e.g. a Ctrl+C handler).
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the staged pipeline for one account.
    ///
    /// Stage sequence: posts, comments, individual reactions (when enabled),
    /// reaction summaries, page metrics. Per-item remote failures are
    /// contained in the returned report; a missing account aborts
    /// immediately, and a storage failure aborts its stage, lets the
    /// remaining stages run, and is returned as the run's error.
    #[tracing::instrument(skip(self), fields(account_id = %account_id))]
    pub async fn sync(&self, account_id: Uuid) -> Result<SyncReport, SyncError> {
        let ctx = self.resolve(account_id).await?;
        info!(page = %ctx.remote_page_id, "starting sync run");

        let mut report = SyncReport::default();
        let mut failure: Option<SyncError> = None;
        let mut record = |stage: SyncStage, result: Result<StageStats, SyncError>| -> StageStats {
            match result {
                Ok(stats) => stats,
                Err(e) => {
                    warn!(%stage, error = %e, "stage aborted");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                    StageStats::default()
                }
            }
        };

        report.posts = record(SyncStage::Posts, self.sync_posts(&ctx).await);
        report.comments = record(SyncStage::Comments, self.sync_comments(&ctx).await);
        if self.options.include_reactions {
            report.reactions = record(SyncStage::Reactions, self.sync_reactions(&ctx).await);
        }
        report.reaction_summaries = record(
            SyncStage::ReactionSummaries,
            self.sync_reaction_summaries(&ctx).await,
        );
        report.page_metrics = record(SyncStage::PageMetrics, self.sync_page_metrics(&ctx).await);

        if self.cancel.is_cancelled() {
            info!("sync run cancelled; committed stages remain valid");
        }
        info!(
            inserted = report.total_inserted(),
            contained_errors = report.error_count(),
            "sync run finished"
        );

        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Sync several accounts concurrently under a bounded worker pool.
    ///
    /// Accounts share no mutable state, so failures are fully independent;
    /// each result carries its own report or error.
    #[tracing::instrument(skip_all, fields(account_count = account_ids.len()))]
    pub async fn sync_accounts(
        &self,
        account_ids: &[Uuid],
        concurrency: usize,
    ) -> Vec<AccountSyncResult> {
        if account_ids.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut handles = Vec::with_capacity(account_ids.len());

        for &account_id in account_ids {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return AccountSyncResult {
                            account_id,
                            report: SyncReport::default(),
                            error: Some("semaphore closed unexpectedly".to_string()),
                        };
                    }
                };

                match engine.sync(account_id).await {
                    Ok(report) => AccountSyncResult {
                        account_id,
                        report,
                        error: None,
                    },
                    Err(e) => AccountSyncResult {
                        account_id,
                        report: SyncReport::default(),
                        error: Some(e.to_string()),
                    },
                }
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => results.push(AccountSyncResult {
                    account_id: Uuid::nil(),
                    report: SyncReport::default(),
                    error: Some(format!("task panic: {e}")),
                }),
            }
        }
        results
    }

    // ─── Query surface ───────────────────────────────────────────────────

    /// List an account's stored posts, newest first.
    pub async fn list_posts(&self, account_id: Uuid) -> Result<Vec<post::Model>, SyncError> {
        let ctx = self.resolve(account_id).await?;
        Ok(repository::posts::list_by_page(&self.db, ctx.page_id).await?)
    }

    /// Fetch one stored page metric, ordered by end time descending,
    /// optionally restricted to the current UTC day.
    pub async fn get_metric(
        &self,
        account_id: Uuid,
        metric_name: &str,
        only_today: bool,
    ) -> Result<Vec<insight::Model>, SyncError> {
        let ctx = self.resolve(account_id).await?;
        let since = only_today.then(|| start_of_utc_day(Utc::now()));
        Ok(repository::insights::find_by_metric(&self.db, ctx.page_id, metric_name, since).await?)
    }

    /// Fetch and classify an account's live comments without persisting
    /// anything.
    pub async fn preview_comments(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<ClassifiedComment>, SyncError> {
        let ctx = self.resolve(account_id).await?;

        let posts = self
            .graph
            .get_page::<RemotePostId>(
                &format!("/{}/posts", ctx.remote_page_id),
                &[("fields", "id")],
                &ctx.access_token,
            )
            .await?
            .items;

        let mut classified = Vec::new();
        for post in posts {
            if self.cancel.is_cancelled() {
                break;
            }
            let comments = self
                .graph
                .fetch_all::<RemoteComment>(
                    &format!("/{}/comments", post.id),
                    &[("fields", COMMENT_FIELDS)],
                    &ctx.access_token,
                )
                .await?;

            for comment in comments {
                let text = comment.message.clone().unwrap_or_default();
                let sentiment = match self.classifier.classify(&text).await {
                    Ok(result) => result.label,
                    Err(e) => {
                        warn!(comment = %comment.id, error = %e, "classification failed");
                        SentimentLabel::Error
                    }
                };
                classified.push(ClassifiedComment { text, sentiment });
            }
        }
        Ok(classified)
    }

    // ─── Stages ──────────────────────────────────────────────────────────

    async fn resolve(&self, account_id: Uuid) -> Result<AccountContext, SyncError> {
        repository::accounts::find_account_context(&self.db, account_id)
            .await?
            .ok_or(SyncError::AccountNotFound { account_id })
    }

    /// Stage: fetch the page's posts, reconcile by remote post id and insert
    /// the new ones.
    async fn sync_posts(&self, ctx: &AccountContext) -> Result<StageStats, SyncError> {
        let mut stats = StageStats::default();
        if self.cancel.is_cancelled() {
            return Ok(stats);
        }

        let path = format!("/{}/posts", ctx.remote_page_id);
        let batch = match self
            .graph
            .get_page::<RemotePost>(&path, &[("fields", POST_FIELDS)], &ctx.access_token)
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                warn!(page = %ctx.remote_page_id, error = %e, "post fetch failed");
                stats.errors.push(format!("posts: {e}"));
                return Ok(stats);
            }
        };
        stats.fetched = batch.items.len();

        let existing = repository::posts::existing_remote_ids(&self.db, ctx.page_id)
            .await
            .map_err(|e| SyncError::persistence(SyncStage::Posts, e))?;
        let fresh = reconcile::new_items(batch.items, &existing, |p| p.id.clone());

        let synced_at = Utc::now().fixed_offset();
        let mut models = Vec::with_capacity(fresh.len());
        for remote in &fresh {
            match to_post_model(ctx.page_id, remote, synced_at) {
                Ok(model) => models.push(model),
                Err(e) => {
                    warn!(post = %remote.id, error = %e, "skipping undecodable post");
                    stats.errors.push(format!("post {}: {}", remote.id, e));
                }
            }
        }

        stats.inserted = repository::posts::insert_many(&self.db, models)
            .await
            .map_err(|e| SyncError::persistence(SyncStage::Posts, e))?;
        Ok(stats)
    }

    /// Stage: for every stored post, fetch its comments (paginated),
    /// reconcile per post, classify new comment text and insert.
    async fn sync_comments(&self, ctx: &AccountContext) -> Result<StageStats, SyncError> {
        self.fan_out_posts(ctx, SyncStage::Comments, |engine, ctx, post| async move {
            engine.collect_post_comments(&ctx, &post).await
        })
        .await
    }

    /// Stage: for every stored post, fetch individual reactions, reconcile
    /// by (user, reaction type) and insert.
    async fn sync_reactions(&self, ctx: &AccountContext) -> Result<StageStats, SyncError> {
        self.fan_out_posts(ctx, SyncStage::Reactions, |engine, ctx, post| async move {
            engine.collect_post_reactions(&ctx, &post).await
        })
        .await
    }

    /// Shared fan-out driver for the per-post stages: bounded workers fetch
    /// and reconcile, the driver inserts each post's batch and aggregates
    /// stats. A worker's storage failure aborts the stage; its fetch
    /// failures are contained.
    async fn fan_out_posts<M, F, Fut>(
        &self,
        ctx: &AccountContext,
        stage: SyncStage,
        collect: F,
    ) -> Result<StageStats, SyncError>
    where
        M: Send + 'static,
        F: Fn(SyncEngine, AccountContext, PostRef) -> Fut + Clone + Send + 'static,
        Fut: std::future::Future<Output = PostOutcome<M>> + Send + 'static,
        Vec<M>: InsertBatch,
    {
        let mut stats = StageStats::default();
        if self.cancel.is_cancelled() {
            return Ok(stats);
        }

        let posts = repository::posts::post_refs(&self.db, ctx.page_id)
            .await
            .map_err(|e| SyncError::persistence(stage, e))?;

        let semaphore = Arc::new(Semaphore::new(self.options.post_concurrency.max(1)));
        let mut handles = Vec::with_capacity(posts.len());

        for post in posts {
            if self.cancel.is_cancelled() {
                break;
            }
            let engine = self.clone();
            let ctx = ctx.clone();
            let semaphore = Arc::clone(&semaphore);
            let collect = collect.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return PostOutcome::failed("semaphore closed unexpectedly"),
                };
                collect(engine, ctx, post).await
            }));
        }

        for handle in handles {
            match handle.await {
                Ok(outcome) => {
                    stats.fetched += outcome.fetched;
                    stats.errors.extend(outcome.errors);
                    if let Some(e) = outcome.persistence {
                        return Err(SyncError::persistence(stage, e));
                    }
                    let inserted = outcome
                        .models
                        .insert_batch(&self.db)
                        .await
                        .map_err(|e| SyncError::persistence(stage, e))?;
                    stats.inserted += inserted;
                }
                Err(e) => stats.errors.push(format!("task panic: {e}")),
            }
        }
        Ok(stats)
    }

    async fn collect_post_comments(
        &self,
        ctx: &AccountContext,
        post: &PostRef,
    ) -> PostOutcome<crate::entity::comment::ActiveModel> {
        let mut outcome = PostOutcome::new();
        let path = format!("/{}/comments", post.remote_post_id);
        let params = [("fields", COMMENT_FIELDS)];

        let fetched = with_retry(
            || self.graph.fetch_all::<RemoteComment>(&path, &params, &ctx.access_token),
            is_transient_error,
            &path,
        )
        .await;

        let fetched = match fetched {
            Ok(comments) => comments,
            Err(e) => {
                warn!(post = %post.remote_post_id, error = %e, "comment fetch failed");
                outcome
                    .errors
                    .push(format!("post {}: {}", post.remote_post_id, e));
                return outcome;
            }
        };
        outcome.fetched = fetched.len();

        let existing = match repository::comments::existing_remote_ids(&self.db, post.id).await {
            Ok(set) => set,
            Err(e) => {
                outcome.persistence = Some(e);
                return outcome;
            }
        };
        let fresh = reconcile::new_items(fetched, &existing, |c| c.id.clone());

        let synced_at = Utc::now().fixed_offset();
        for comment in &fresh {
            if self.cancel.is_cancelled() {
                break;
            }
            let text = comment.message.as_deref().unwrap_or("");
            let sentiment = match self.classifier.classify(text).await {
                Ok(result) => result.label,
                Err(e) => {
                    warn!(comment = %comment.id, error = %e, "classification failed, storing sentinel");
                    SentimentLabel::Error
                }
            };
            match to_comment_model(post.id, comment, sentiment, synced_at) {
                Ok(model) => outcome.models.push(model),
                Err(e) => {
                    warn!(comment = %comment.id, error = %e, "skipping undecodable comment");
                    outcome.errors.push(format!("comment {}: {}", comment.id, e));
                }
            }
        }
        outcome
    }

    async fn collect_post_reactions(
        &self,
        ctx: &AccountContext,
        post: &PostRef,
    ) -> PostOutcome<crate::entity::reaction::ActiveModel> {
        let mut outcome = PostOutcome::new();
        let path = format!("/{}/reactions", post.remote_post_id);
        let params = [("fields", REACTION_FIELDS)];

        let fetched = with_retry(
            || self.graph.fetch_all::<RemoteReaction>(&path, &params, &ctx.access_token),
            is_transient_error,
            &path,
        )
        .await;

        let fetched = match fetched {
            Ok(reactions) => reactions,
            Err(e) => {
                warn!(post = %post.remote_post_id, error = %e, "reaction fetch failed");
                outcome
                    .errors
                    .push(format!("post {}: {}", post.remote_post_id, e));
                return outcome;
            }
        };
        outcome.fetched = fetched.len();

        let existing = match repository::reactions::existing_type_keys(&self.db, post.id).await {
            Ok(set) => set,
            Err(e) => {
                outcome.persistence = Some(e);
                return outcome;
            }
        };
        let fresh = reconcile::new_items(fetched, &existing, |r| {
            (r.id.clone(), r.reaction_type.clone())
        });

        let observed_at = Utc::now().fixed_offset();
        outcome.models = fresh
            .iter()
            .map(|remote| to_reaction_model(post.id, remote, observed_at))
            .collect();
        outcome
    }

    /// Stage: snapshot per-type reaction counts for every stored post.
    /// No reconciliation; each run appends a fresh snapshot set.
    async fn sync_reaction_summaries(&self, ctx: &AccountContext) -> Result<StageStats, SyncError> {
        let mut stats = StageStats::default();
        if self.cancel.is_cancelled() {
            return Ok(stats);
        }

        let posts = repository::posts::post_refs(&self.db, ctx.page_id)
            .await
            .map_err(|e| SyncError::persistence(SyncStage::ReactionSummaries, e))?;

        for post in &posts {
            if self.cancel.is_cancelled() {
                break;
            }

            let path = format!("/{}/insights", post.remote_post_id);
            let series = match self
                .graph
                .get_series(
                    &path,
                    &[("metric", REACTIONS_BY_TYPE_METRIC), ("period", "lifetime")],
                    &ctx.access_token,
                )
                .await
            {
                Ok(series) => series,
                Err(e) => {
                    warn!(post = %post.remote_post_id, error = %e, "reaction summary fetch failed");
                    stats
                        .errors
                        .push(format!("post {}: {}", post.remote_post_id, e));
                    continue;
                }
            };
            stats.fetched += series.len();

            let rows = metrics::flatten_reaction_totals(&series, Utc::now());
            let models: Vec<reaction_summary::ActiveModel> = rows
                .into_iter()
                .map(|row| reaction_summary::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    post_id: Set(post.id),
                    reaction_type: Set(row.reaction_type),
                    reaction_count: Set(row.count),
                    collected_at: Set(row.collected_at),
                })
                .collect();

            stats.inserted += repository::reactions::insert_many_summaries(&self.db, models)
                .await
                .map_err(|e| SyncError::persistence(SyncStage::ReactionSummaries, e))?;
        }
        Ok(stats)
    }

    /// Stage: collect the configured daily page metrics. A failure on one
    /// metric name does not block the others.
    async fn sync_page_metrics(&self, ctx: &AccountContext) -> Result<StageStats, SyncError> {
        let mut stats = StageStats::default();
        if self.cancel.is_cancelled() {
            return Ok(stats);
        }

        let path = format!("/{}/insights", ctx.remote_page_id);
        for metric_name in &self.options.page_metrics {
            if self.cancel.is_cancelled() {
                break;
            }

            let series = match self
                .graph
                .get_series(
                    &path,
                    &[("metric", metric_name.as_str()), ("period", "day")],
                    &ctx.access_token,
                )
                .await
            {
                Ok(series) => series,
                Err(e) => {
                    warn!(metric = %metric_name, error = %e, "page metric fetch failed");
                    stats.errors.push(format!("{metric_name}: {e}"));
                    continue;
                }
            };
            stats.fetched += series.iter().map(|s| s.values.len()).sum::<usize>();

            let rows = metrics::flatten_metric_series(&series);
            let models: Vec<insight::ActiveModel> = rows
                .into_iter()
                .map(|row| insight::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    page_id: Set(ctx.page_id),
                    metric_name: Set(row.name),
                    period: Set(row.period),
                    value: Set(row.value),
                    end_time: Set(row.end_time),
                })
                .collect();

            stats.inserted += repository::insights::insert_many(&self.db, models)
                .await
                .map_err(|e| SyncError::persistence(SyncStage::PageMetrics, e))?;
        }
        Ok(stats)
    }
}

/// Bulk-insert dispatch for the fan-out driver: each per-post stage feeds a
/// different entity's batch through the same loop.
#[async_trait]
trait InsertBatch: Sized {
    async fn insert_batch(self, db: &DatabaseConnection) -> Result<u64, RepositoryError>;
}

#[async_trait]
impl InsertBatch for Vec<crate::entity::comment::ActiveModel> {
    async fn insert_batch(self, db: &DatabaseConnection) -> Result<u64, RepositoryError> {
        repository::comments::insert_many(db, self).await
    }
}

#[async_trait]
impl InsertBatch for Vec<crate::entity::reaction::ActiveModel> {
    async fn insert_batch(self, db: &DatabaseConnection) -> Result<u64, RepositoryError> {
        repository::reactions::insert_many(db, self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn start_of_utc_day_truncates_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 17, 45, 12).unwrap();
        let start = start_of_utc_day(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn start_of_utc_day_is_idempotent() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(start_of_utc_day(midnight), midnight);
    }

    #[test]
    fn post_outcome_failed_records_the_message() {
        let outcome: PostOutcome<()> = PostOutcome::failed("post p1: boom");
        assert_eq!(outcome.errors, vec!["post p1: boom"]);
        assert_eq!(outcome.fetched, 0);
        assert!(outcome.models.is_empty());
        assert!(outcome.persistence.is_none());
    }
}
