//! Keyboard input handling.
//!
//! Each rendered view owns its bindings: browse-mode keys mutate the filter
//! or the selection and trigger reloads; the modal modes (search, add-source
//! form, delete confirmation) capture text until committed or cancelled.

use crate::api::{ApiClient, StatusChange};
use crate::app::{App, Focus, FormField, Mode, SourceForm};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::loop_runner::Action;
use super::tasks::{
    spawn_add_source, spawn_delete_source, spawn_refresh, spawn_reload, spawn_status_toggle,
    spawn_toggle_source,
};
use crate::app::AppEvent;

/// Maximum accepted search query length.
const MAX_SEARCH_LENGTH: usize = 256;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(Action::Quit);
    }

    match app.mode.clone() {
        Mode::Browse => handle_browse(app, code, client, tx),
        Mode::Search { input } => {
            handle_search(app, code, input, client, tx);
            Ok(Action::Continue)
        }
        Mode::AddSource { form } => {
            handle_add_source(app, code, form, client, tx);
            Ok(Action::Continue)
        }
        Mode::ConfirmDelete { name } => {
            handle_confirm_delete(app, code, name, client, tx);
            Ok(Action::Continue)
        }
    }
}

fn handle_browse(
    app: &mut App,
    code: KeyCode,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Articles => Focus::Sources,
                Focus::Sources => Focus::Articles,
            };
        }

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            Focus::Articles => app.select_next_article(),
            Focus::Sources => app.select_next_source(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            Focus::Articles => app.select_prev_article(),
            Focus::Sources => app.select_prev_source(),
        },

        KeyCode::Enter => match app.focus {
            // Open the selected article in the browser.
            Focus::Articles => {
                if let Some(article) = app.selected_article() {
                    let link = article.link.clone();
                    if let Err(e) = open::that_detached(&link) {
                        tracing::warn!(link = %link, error = %e, "Failed to open browser");
                        app.set_status("Could not open browser");
                    }
                }
            }
            // Filter by the selected source (radio semantics).
            Focus::Sources => {
                if let Some(source) = app.selected_source() {
                    let name = source.name.clone();
                    app.filter.select_source(&name);
                    app.republish_tag_highlight();
                    spawn_reload(app, client, tx);
                }
            }
        },

        // Pagination
        KeyCode::Char('n') | KeyCode::Right => {
            let page = app.filter.page();
            if page < app.total_pages() {
                app.filter.set_page(page + 1);
                spawn_reload(app, client, tx);
            }
        }
        KeyCode::Char('p') | KeyCode::Left => {
            let page = app.filter.page();
            if page > 1 {
                app.filter.set_page(page - 1);
                spawn_reload(app, client, tx);
            }
        }

        // Filter dimensions
        KeyCode::Char('/') => {
            app.mode = Mode::Search {
                input: app.filter.search().unwrap_or_default().to_string(),
            };
        }
        KeyCode::Char('L') => {
            app.filter.toggle_read_later();
            app.republish_tag_highlight();
            spawn_reload(app, client, tx);
        }
        KeyCode::Char('u') => {
            let next = app.filter.read().next();
            app.filter.set_read(next);
            app.set_status(format!("Showing {} articles", next));
            spawn_reload(app, client, tx);
        }
        KeyCode::Char(c @ '1'..='9') => {
            // Toggle a tag facet by its position in the facet strip.
            let index = c as usize - '1' as usize;
            if let Some(facet) = app.tag_facets.get(index) {
                let name = facet.name.clone();
                app.filter.select_tag(&name);
                app.republish_tag_highlight();
                spawn_reload(app, client, tx);
            }
        }

        // Status toggles on the selected card
        KeyCode::Char('r') => {
            if let Some(article) = app.selected_article() {
                let id = article.id.clone();
                let change = StatusChange::read(!article.read);
                spawn_status_toggle(app, id, change, client, tx);
            }
        }
        KeyCode::Char('b') => {
            if let Some(article) = app.selected_article() {
                let id = article.id.clone();
                let change = StatusChange::read_later(!article.read_later);
                spawn_status_toggle(app, id, change, client, tx);
            }
        }

        // Source management
        KeyCode::Char('a') => {
            app.mode = Mode::AddSource {
                form: SourceForm::default(),
            };
        }
        KeyCode::Char('d') => {
            if app.focus == Focus::Sources {
                if let Some(source) = app.selected_source() {
                    app.mode = Mode::ConfirmDelete {
                        name: source.name.clone(),
                    };
                }
            }
        }
        KeyCode::Char('x') => {
            if app.focus == Focus::Sources {
                if let Some(source) = app.selected_source() {
                    spawn_toggle_source(source.name.clone(), !source.active, client, tx);
                }
            }
        }

        // Backend ingestion refresh
        KeyCode::Char('R') => {
            spawn_refresh(app, client, tx);
        }

        // Retry after a failed reload
        KeyCode::Char('g') => {
            spawn_reload(app, client, tx);
        }

        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_search(
    app: &mut App,
    code: KeyCode,
    mut input: String,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Esc => {
            app.mode = Mode::Browse;
        }
        KeyCode::Enter => {
            app.mode = Mode::Browse;
            app.filter.set_search(&input);
            spawn_reload(app, client, tx);
        }
        KeyCode::Backspace => {
            input.pop();
            app.mode = Mode::Search { input };
        }
        KeyCode::Char(c) => {
            if input.len() < MAX_SEARCH_LENGTH {
                input.push(c);
            }
            app.mode = Mode::Search { input };
        }
        _ => {}
    }
}

fn handle_add_source(
    app: &mut App,
    code: KeyCode,
    mut form: SourceForm,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Esc => {
            app.mode = Mode::Browse;
        }
        KeyCode::Tab => {
            form.field = form.field.next();
            app.mode = Mode::AddSource { form };
        }
        KeyCode::Enter => {
            // Same checks the client performs, but caught here so the form
            // stays open for a fix instead of bouncing an error back.
            if form.name.trim().is_empty() || form.url.trim().is_empty() {
                app.set_status("Name and URL are required");
                let field = if form.name.trim().is_empty() {
                    FormField::Name
                } else {
                    FormField::Url
                };
                form.field = field;
                app.mode = Mode::AddSource { form };
                return;
            }
            app.set_status(format!("Adding source '{}'...", form.name.trim()));
            spawn_add_source(form.name, form.url, form.category, client, tx);
            app.mode = Mode::Browse;
        }
        KeyCode::Backspace => {
            form.active_field_mut().pop();
            app.mode = Mode::AddSource { form };
        }
        KeyCode::Char(c) => {
            form.active_field_mut().push(c);
            app.mode = Mode::AddSource { form };
        }
        _ => {}
    }
}

fn handle_confirm_delete(
    app: &mut App,
    code: KeyCode,
    name: String,
    client: &Arc<ApiClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.mode = Mode::Browse;
            spawn_delete_source(name, client, tx);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.mode = Mode::Browse;
        }
        _ => {}
    }
}
