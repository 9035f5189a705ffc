//! Application event handling.
//!
//! Applies background-task results to the state. Source mutations that
//! succeed trigger the required follow-up loads: the source list and the
//! article list, since an active-source change affects which articles the
//! backend aggregates.

use crate::api::ApiClient;
use crate::app::{App, AppEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::tasks::{spawn_reload, spawn_sources_load};

pub(super) fn handle_app_event(
    app: &mut App,
    event: AppEvent,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    match event {
        AppEvent::ArticlesLoaded { generation, result } => {
            app.apply_articles(generation, result);
        }
        AppEvent::SourcesLoaded { result } => {
            app.apply_sources(result);
        }
        AppEvent::StatusUpdated {
            article_id,
            prior,
            status,
        } => {
            app.confirm_status(&article_id, prior, status);
        }
        AppEvent::StatusUpdateFailed {
            article_id,
            prior,
            error,
        } => {
            app.rollback_status(&article_id, prior, &error);
        }
        AppEvent::SourceAdded { result } => match result {
            Ok(source) => {
                app.set_status(format!("Source '{}' added", source.name));
                spawn_sources_load(client, tx);
                spawn_reload(app, client, tx);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Add source failed");
                app.set_status(format!("Add source failed: {}", e));
            }
        },
        AppEvent::SourceRemoved { name, result } => match result {
            Ok(()) => {
                // The deleted source may still be the active filter; drop it.
                if app.filter.source() == Some(name.as_str()) {
                    app.filter.clear_source();
                }
                app.set_status(format!("Source '{}' removed", name));
                spawn_sources_load(client, tx);
                spawn_reload(app, client, tx);
            }
            Err(e) => {
                tracing::warn!(source = %name, error = %e, "Delete source failed");
                app.set_status(format!("Delete failed: {}", e));
            }
        },
        AppEvent::SourceToggled { name, result } => match result {
            Ok(source) => {
                let state = if source.active { "active" } else { "paused" };
                app.set_status(format!("Source '{}' is now {}", source.name, state));
                spawn_sources_load(client, tx);
                spawn_reload(app, client, tx);
            }
            Err(e) => {
                tracing::warn!(source = %name, error = %e, "Toggle source failed");
                app.set_status(format!("Toggle failed: {}", e));
            }
        },
        AppEvent::RefreshComplete { result } => {
            app.refresh_in_flight = false;
            match result {
                Ok(summary) => {
                    app.set_status(format!(
                        "Refreshed {} sources, {} articles",
                        summary.sources_count, summary.articles_count
                    ));
                    spawn_reload(app, client, tx);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Backend refresh failed");
                    app.set_status(format!("Refresh failed: {}", e));
                }
            }
        }
    }
}
