//! Background task spawning.
//!
//! Every network call runs on its own tokio task and reports back through
//! the `AppEvent` channel; the event loop applies the result. Article
//! reloads carry the generation returned by `App::begin_reload`, so a
//! response that arrives after a newer reload was issued is dropped by
//! `App::apply_articles` instead of overwriting a fresher render.

use crate::api::{ApiClient, ArticleStatus, StatusChange};
use crate::app::{App, AppEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Reload the article list for the current filter.
pub fn spawn_reload(app: &mut App, client: &Arc<ApiClient>, tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_reload();
    let filter = app.filter.clone();
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.articles(&filter).await;
        let event = AppEvent::ArticlesLoaded { generation, result };
        if tx.send(event).await.is_err() {
            tracing::warn!("Failed to send article page (receiver dropped)");
        }
    });
}

/// Fetch the source list.
pub fn spawn_sources_load(client: &Arc<ApiClient>, tx: &mpsc::Sender<AppEvent>) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.sources().await;
        if tx.send(AppEvent::SourcesLoaded { result }).await.is_err() {
            tracing::warn!("Failed to send source list (receiver dropped)");
        }
    });
}

/// Flip an article's read or read-later flag: optimistic local update first,
/// then the PUT. The prior status travels with the task so the event handler
/// can roll back or adjust counters.
pub fn spawn_status_toggle(
    app: &mut App,
    article_id: String,
    change: StatusChange,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    let Some(current) = app.articles.iter().find(|a| a.id == article_id) else {
        return;
    };
    let target: ArticleStatus = current.status().with(change);
    let Some(prior) = app.apply_status_optimistic(&article_id, target) else {
        return;
    };
    app.needs_redraw = true;

    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match client.update_status(&article_id, change).await {
            Ok(status) => AppEvent::StatusUpdated {
                article_id,
                prior,
                status,
            },
            Err(e) => AppEvent::StatusUpdateFailed {
                article_id,
                prior,
                error: e.to_string(),
            },
        };
        if tx.send(event).await.is_err() {
            tracing::warn!("Failed to send status result (receiver dropped)");
        }
    });
}

/// Register a new source from the add-source form.
pub fn spawn_add_source(
    name: String,
    url: String,
    category: String,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.add_source(&name, &url, &category).await;
        if tx.send(AppEvent::SourceAdded { result }).await.is_err() {
            tracing::warn!("Failed to send add-source result (receiver dropped)");
        }
    });
}

/// Permanently remove a source. Callers must have confirmed with the user.
pub fn spawn_delete_source(name: String, client: &Arc<ApiClient>, tx: &mpsc::Sender<AppEvent>) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.delete_source(&name).await;
        let event = AppEvent::SourceRemoved { name, result };
        if tx.send(event).await.is_err() {
            tracing::warn!("Failed to send delete-source result (receiver dropped)");
        }
    });
}

/// Toggle a source's active flag.
pub fn spawn_toggle_source(
    name: String,
    active: bool,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.set_source_active(&name, active).await;
        let event = AppEvent::SourceToggled { name, result };
        if tx.send(event).await.is_err() {
            tracing::warn!("Failed to send toggle-source result (receiver dropped)");
        }
    });
}

/// Ask the backend to re-poll all active feeds.
pub fn spawn_refresh(app: &mut App, client: &Arc<ApiClient>, tx: &mpsc::Sender<AppEvent>) {
    if app.refresh_in_flight {
        return;
    }
    app.refresh_in_flight = true;
    app.set_status("Refreshing feeds...");

    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.refresh().await;
        if tx.send(AppEvent::RefreshComplete { result }).await.is_err() {
            tracing::warn!("Failed to send refresh result (receiver dropped)");
        }
    });
}
