//! Widget rendering from view models.

use crate::app::{App, Focus, FormField, Mode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::view::{paginate, render_article, PageItem};

pub(super) fn render(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // main
            Constraint::Length(1), // pagination
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(rows[0]);

    render_sources(f, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[1]);

    render_tag_facets(f, app, right[0]);
    render_articles(f, app, right[1]);
    render_pagination(f, app, rows[1]);
    render_status_bar(f, app, rows[2]);

    match &app.mode {
        Mode::AddSource { form } => render_add_source_form(f, form),
        Mode::ConfirmDelete { name } => render_confirm_delete(f, name),
        _ => {}
    }
}

fn render_sources(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Sources;

    let items: Vec<ListItem> = if app.sources.is_empty() {
        vec![ListItem::new("No sources configured")]
    } else {
        app.sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let mut spans = Vec::new();
                let marker = if source.active { "● " } else { "○ " };
                let marker_color = if source.active {
                    Color::Green
                } else {
                    Color::DarkGray
                };
                spans.push(Span::styled(marker, Style::default().fg(marker_color)));

                let mut style = if app.filter.source() == Some(source.name.as_str()) {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                if is_focused && i == app.selected_source {
                    style = style.bg(Color::DarkGray).fg(Color::White);
                }
                spans.push(Span::styled(source.name.clone(), style));
                spans.push(Span::styled(
                    format!("  {}", source.category),
                    Style::default().fg(Color::DarkGray),
                ));
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Sources"),
    );
    f.render_widget(list, area);
}

fn render_tag_facets(f: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    if app.tag_facets.is_empty() {
        spans.push(Span::styled("no tags", Style::default().fg(Color::DarkGray)));
    }
    for (i, facet) in app.tag_facets.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if facet.active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, facet.name), style));
    }
    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Tags"));
    f.render_widget(paragraph, area);
}

fn render_articles(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Articles;

    let title = articles_title(app);
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    if app.articles.is_empty() {
        let message = if app.loading {
            "Loading articles..."
        } else if app.load_error.is_some() {
            "Could not load articles. Press g to retry."
        } else if app.has_loaded_once {
            "No articles match the current filters."
        } else {
            ""
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let card = render_article(article);
            let selected = is_focused && i == app.selected_article;

            let mut head = Vec::new();
            if card.read_later {
                head.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
            }
            let title_style = if selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if !card.read {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            head.push(Span::styled(truncate(&card.title, width), title_style));
            head.push(Span::styled(
                format!("  {}", card.published),
                Style::default().fg(Color::DarkGray),
            ));

            let mut meta = vec![Span::styled(
                format!("  {}", card.source),
                Style::default().fg(Color::Magenta),
            )];
            for tag in &card.tags {
                meta.push(Span::styled(
                    format!(" #{}", tag),
                    Style::default().fg(Color::Cyan),
                ));
            }

            ListItem::new(vec![Line::from(head), Line::from(meta)])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn articles_title(app: &App) -> String {
    if let Mode::Search { input } = &app.mode {
        return format!("Search: {}_", input);
    }
    let mut parts = vec![format!("Articles ({})", app.total)];
    if let Some(source) = app.filter.source() {
        parts.push(format!("source: {}", source));
    }
    if let Some(tag) = app.filter.tag() {
        parts.push(format!("tag: {}", tag));
    }
    if let Some(search) = app.filter.search() {
        parts.push(format!("search: {}", search));
    }
    if app.filter.read_later_only() {
        parts.push("read later".to_string());
    }
    match app.filter.read() {
        crate::filter::ReadFilter::Either => {}
        other => parts.push(other.to_string()),
    }
    if app.loading {
        parts.push("loading...".to_string());
    }
    parts.join(" | ")
}

fn render_pagination(f: &mut Frame, app: &App, area: Rect) {
    let items = paginate(app.loaded_page, app.loaded_page_size, app.total);
    let mut spans: Vec<Span> = Vec::new();
    for item in items {
        match item {
            PageItem::Previous { enabled } => {
                let color = if enabled { Color::White } else { Color::DarkGray };
                spans.push(Span::styled("« ", Style::default().fg(color)));
            }
            PageItem::Page { number, current } => {
                let style = if current {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                spans.push(Span::styled(format!(" {} ", number), style));
            }
            PageItem::Ellipsis => {
                spans.push(Span::styled(" … ", Style::default().fg(Color::DarkGray)));
            }
            PageItem::Next { enabled } => {
                let color = if enabled { Color::White } else { Color::DarkGray };
                spans.push(Span::styled(" »", Style::default().fg(color)));
            }
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some((message, _)) = &app.status_message {
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let counters = format!(
            " {} unread · {} saved ",
            app.unread_count, app.saved_count
        );
        Line::from(vec![
            Span::styled(counters, Style::default().fg(Color::Green)),
            Span::styled(
                "q quit · / search · r read · b bookmark · L later · u unread · n/p page · a add · R refresh",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_add_source_form(f: &mut Frame, form: &crate::app::SourceForm) {
    let area = centered_rect(50, 9, f.area());
    f.render_widget(Clear, area);

    let field_line = |label: &str, value: &str, active: bool| {
        let style = if active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<10}", label), style),
            Span::raw(format!("{}{}", value, cursor)),
        ])
    };

    let lines = vec![
        field_line("Name", &form.name, form.field == FormField::Name),
        field_line("URL", &form.url, form.field == FormField::Url),
        field_line("Category", &form.category, form.field == FormField::Category),
        Line::from(""),
        Line::from(Span::styled(
            "Tab next field · Enter submit · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Add source"));
    f.render_widget(paragraph, area);
}

fn render_confirm_delete(f: &mut Frame, name: &str) {
    let area = centered_rect(50, 5, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(vec![
        Line::from(format!("Delete source '{}'?", name)),
        Line::from(""),
        Line::from(Span::styled(
            "y confirm · n cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Confirm"))
    .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// A centered popup rectangle of fixed size, clamped to the frame.
fn centered_rect(width: u16, height: u16, frame: Rect) -> Rect {
    let width = width.min(frame.width);
    let height = height.min(frame.height);
    Rect {
        x: frame.x + (frame.width - width) / 2,
        y: frame.y + (frame.height - height) / 2,
        width,
        height,
    }
}

/// Truncate a title to the available columns, unicode-aware.
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthStr::width(c.to_string().as_str());
        if used + w + 3 > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
