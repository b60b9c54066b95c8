use super::input::{Panel, UiState};
use popcorn_core::{DetailPanel, ResultsPanel, SidePanel, ViewModel, WatchedSummary, NO_MOVIES_FOUND};
use popcorn_models::{MovieDetail, WatchedEntry};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const ACCENT: Color = Color::Rgb(103, 65, 217);

pub fn render(f: &mut Frame, view: &ViewModel, ui: &UiState) {
    let [top, main, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_nav(f, top, view);

    let [left, right] = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(main);
    let results_active = !view.search_focused && ui.panel == Panel::Results;
    let side_active = !view.search_focused && ui.panel == Panel::Side;
    if ui.is_collapsed(Panel::Results) {
        f.render_widget(panel_block(panel_title("Results", true), results_active), left);
    } else {
        render_results(f, left, view, ui, results_active);
    }
    match &view.side {
        SidePanel::Detail(_) if ui.is_collapsed(Panel::Side) => {
            f.render_widget(panel_block(panel_title("Movie", true), side_active), right);
        }
        SidePanel::Watched { .. } if ui.is_collapsed(Panel::Side) => {
            f.render_widget(panel_block(panel_title("Watched", true), side_active), right);
        }
        SidePanel::Detail(panel) => render_detail(f, right, panel, side_active),
        SidePanel::Watched { summary, entries } => render_watched(f, right, summary, entries, ui, side_active),
    }

    f.render_widget(Paragraph::new(help_line(view)).dark_gray(), help);
}

fn panel_block<'a>(title: impl Into<Line<'a>>, active: bool) -> Block<'a> {
    let border = if active { Style::default().fg(ACCENT) } else { Style::default().fg(Color::DarkGray) };
    Block::default().title(title).borders(Borders::ALL).border_style(border)
}

/// Titles carry the fold marker the `-` key toggles
fn panel_title(title: &str, collapsed: bool) -> String {
    format!("[{}] {}", if collapsed { "+" } else { "–" }, title)
}

/// Column for the input cursor, pinned inside the box however long the query gets
fn cursor_x(area: Rect, query: &str) -> u16 {
    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}

fn render_nav(f: &mut Frame, area: Rect, view: &ViewModel) {
    let [logo, search, count] = Layout::horizontal([
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(24),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(Line::from(vec![Span::raw("🍿 "), Span::raw("usePopcorn").bold()]))
            .block(Block::default().borders(Borders::ALL)),
        logo,
    );

    let text = if view.query.is_empty() && !view.search_focused {
        Span::raw("Search movies...").dark_gray()
    } else {
        Span::raw(view.query.as_str())
    };
    f.render_widget(
        Paragraph::new(text).block(panel_block("Search", view.search_focused)),
        search,
    );
    if view.search_focused {
        f.set_cursor_position((cursor_x(search, &view.query), search.y.saturating_add(1)));
    }

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Found "),
            Span::raw(view.result_count.to_string()).bold(),
            Span::raw(" results"),
        ]))
        .block(Block::default().borders(Borders::ALL)),
        count,
    );
}

fn render_results(f: &mut Frame, area: Rect, view: &ViewModel, ui: &UiState, active: bool) {
    let block = panel_block(panel_title("Results", false), active);
    match &view.results {
        ResultsPanel::Idle => {
            f.render_widget(
                Paragraph::new("Type at least two characters to search").dark_gray().block(block),
                area,
            );
        }
        ResultsPanel::Loading => f.render_widget(Paragraph::new(loading_line()).block(block), area),
        ResultsPanel::Error(message) => f.render_widget(Paragraph::new(error_line(message)).block(block), area),
        ResultsPanel::NoMoviesFound => f.render_widget(Paragraph::new(NO_MOVIES_FOUND).block(block), area),
        ResultsPanel::List(items) => {
            let rows: Vec<ListItem> = items
                .iter()
                .map(|item| {
                    ListItem::new(Line::from(vec![
                        Span::raw(item.title.as_str()).bold(),
                        Span::raw(format!("  🗓 {}", item.year)).dark_gray(),
                    ]))
                })
                .collect();
            let mut state = ListState::default().with_selected(Some(ui.results_cursor));
            let list = List::new(rows).block(block).highlight_style(highlight(active));
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn render_detail(f: &mut Frame, area: Rect, panel: &DetailPanel, active: bool) {
    match panel {
        DetailPanel::Loading { .. } => {
            f.render_widget(Paragraph::new(loading_line()).block(panel_block(panel_title("Movie", false), active)), area);
        }
        DetailPanel::Error { message, .. } => {
            f.render_widget(Paragraph::new(error_line(message)).block(panel_block(panel_title("Movie", false), active)), area);
        }
        DetailPanel::Loaded {
            detail,
            watched_rating,
            draft_rating,
        } => {
            let mut lines = detail_header(detail);
            lines.push(Line::raw(""));
            match watched_rating {
                Some(rating) => lines.push(Line::raw(format!("You have rated this movie: {} ⭐", rating))),
                None => {
                    lines.push(Line::from(vec![
                        Span::raw("Your rating: "),
                        Span::raw(rating_stars(*draft_rating)).yellow(),
                        Span::raw(draft_rating.map(|r| format!(" {}", r)).unwrap_or_default()),
                    ]));
                    if panel.can_add() {
                        lines.push(Line::from(vec![Span::raw("[a]").fg(ACCENT).bold(), Span::raw(" + Add to list")]));
                    }
                }
            }
            lines.push(Line::raw(""));
            lines.push(Line::raw(detail.plot.as_str()).italic());
            lines.push(Line::raw(""));
            lines.push(Line::raw(format!("Starring {}", detail.actors)));
            lines.push(Line::raw(format!("Directed by {}", detail.director)));

            let paragraph = Paragraph::new(lines)
                .block(panel_block(panel_title("Movie", false), active))
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, area);
        }
    }
}

fn detail_header(detail: &MovieDetail) -> Vec<Line<'_>> {
    vec![
        Line::raw(detail.title.as_str()).bold(),
        Line::raw(format!("{} • {}", detail.released, detail.runtime)),
        Line::raw(detail.genre.as_str()),
        Line::raw(format!("⭐️ {} IMDb rating", detail.imdb_rating)),
    ]
}

fn render_watched(
    f: &mut Frame,
    area: Rect,
    summary: &WatchedSummary,
    entries: &[WatchedEntry],
    ui: &UiState,
    active: bool,
) {
    let [head, body] = Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).areas(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::raw("MOVIES YOU WATCHED").bold(),
            Line::raw(summary_line(summary)),
        ])
        .block(Block::default().borders(Borders::ALL).style(Style::default().bg(Color::Rgb(52, 58, 64)))),
        head,
    );

    let block = panel_block(panel_title("Watched", false), active);
    if entries.is_empty() {
        f.render_widget(
            Paragraph::new("Rate a movie to add it here").dark_gray().block(block),
            body,
        );
        return;
    }

    let rows: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            ListItem::new(vec![
                Line::raw(entry.title.as_str()).bold(),
                Line::raw(format!(
                    "⭐️ {}  🌟 {}  ⏳ {} min",
                    entry.imdb_rating, entry.user_rating, entry.runtime
                )),
            ])
        })
        .collect();
    let mut state = ListState::default().with_selected(Some(ui.watched_cursor));
    let list = List::new(rows).block(block).highlight_style(highlight(active));
    f.render_stateful_widget(list, body, &mut state);
}

fn highlight(active: bool) -> Style {
    if active {
        Style::default().bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

fn loading_line() -> Line<'static> {
    Line::raw("Loading...").bold()
}

fn error_line(message: &str) -> Line<'_> {
    Line::from(vec![Span::raw("⛔ "), Span::raw(message)]).red()
}

fn summary_line(summary: &WatchedSummary) -> String {
    format!(
        "#️⃣ {} movies  ⭐️ {}  🌟 {}  ⏳ {}",
        summary.count,
        summary.imdb_rating_display(),
        summary.user_rating_display(),
        summary.runtime_display()
    )
}

/// Ten-star row filled up to `rating`
fn rating_stars(rating: Option<u8>) -> String {
    let filled = usize::from(rating.unwrap_or(0).min(10));
    format!("{}{}", "★".repeat(filled), "☆".repeat(10 - filled))
}

fn help_line(view: &ViewModel) -> &'static str {
    if view.search_focused {
        " type to search · Tab/↓ results · Enter clear · Esc close movie · Ctrl-C quit"
    } else if matches!(view.side, SidePanel::Detail(_)) {
        " ↑/↓ move · →/o open · 1-9,0 rate · a add · Esc/← close · - fold · / search · q quit"
    } else {
        " ↑/↓ move · →/o open · Tab switch · d remove · - fold · / search · Enter new search · q quit"
    }
}
