//! UI rendering helpers for the terminal user interface.
//!
//! This module applies a [`DisplayState`] to a `ratatui` frame. It reads
//! nothing else from the player: every value shown comes from the view
//! projection, the app model or the settings.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::playlist::{Playlist, format_optional_time};
use crate::view::DisplayState;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // ←/→ and [/] are filled dynamically from config.
    map.insert("↑/↓".to_string(), "volume".to_string());
    map.insert("a".to_string(), "add files".to_string());
    map.insert("d".to_string(), "remove".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("r".to_string(), "repeat".to_string());
    map.insert("K".to_string(), "metadata".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "←/→", "[/]", "↑/↓", "enter", "space/p", "gg/G", "a", "d", "s", "r", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "←/→" => Some(format!("[←/→] seek -/+{seek_seconds}s")),
            "[/]" => Some(format!("[[/]] drag -/+{seek_seconds}s (enter commits, esc cancels)")),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}")),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the time text next to the progress bar per `UiSettings`.
fn time_text(display: &DisplayState, ui: &UiSettings) -> String {
    let parts: Vec<&str> = ui
        .time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => display.elapsed.as_str(),
            TimeField::Total => display.now_playing.duration.as_str(),
            TimeField::Remaining => display.remaining.as_str(),
        })
        .filter(|s| !s.is_empty())
        .collect();
    parts.join(&ui.time_separator)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Render the entire UI into `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &DisplayState,
    playlist: &Playlist,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let np = &display.now_playing;
    let cover = if display.spinning {
        format!("{} {}", app.spinner_glyph(), np.cover)
    } else {
        np.cover.clone()
    };
    let now_playing = Paragraph::new(vec![
        Line::from(np.title.as_str().bold()),
        Line::from(np.artist.as_str()),
        Line::from(np.album.as_str().italic()),
        Line::from(cover.dim()),
    ])
    .block(padded(" now playing "));
    frame.render_widget(now_playing, chunks[1]);

    // Progress
    let mut gauge_title = String::from(" progress ");
    if display.dragging {
        gauge_title.push_str("(dragging) ");
    }
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(gauge_title))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio((display.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(time_text(display, ui_settings));
    frame.render_widget(gauge, chunks[2]);

    // Playlist. Only build ListItems for the visible window, centred on the cursor.
    {
        let total = display.rows.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = display.rows[start..end]
            .iter()
            .map(|row| {
                let marker = if row.active {
                    display.play_icon.glyph()
                } else {
                    " "
                };
                let line = Line::from(vec![
                    Span::raw(format!("{marker} ")),
                    Span::raw(row.title.clone()),
                    Span::raw(format!("  {}", row.duration)).dim(),
                ]);
                if row.active {
                    ListItem::new(line).bold()
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(format!(" playlist ({total}) ")))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Transport line, with the status message when there is one.
    let mut transport = vec![
        Span::raw(format!("{} {}", display.play_icon.glyph(), display.play_icon.label())),
        Span::raw(format!(
            "  •  {} {:>3}%",
            display.volume_icon.glyph(),
            (display.volume * 100.0).round() as u32
        )),
        Span::raw(format!("  •  Shuffle: {}", on_off(display.shuffle))),
        Span::raw(format!("  •  Repeat: {}", on_off(display.repeat))),
    ];
    if display.importing {
        transport.push(Span::raw("  •  importing…").dim());
    }
    if let Some(status) = display.status.as_deref() {
        transport.push(Span::raw(format!("  •  {status}")).italic());
    }
    let status_par = Paragraph::new(Line::from(transport))
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[4]);

    // Overlay metadata popup for the track under the cursor.
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 9, chunks[3]);
        frame.render_widget(Clear, popup_area);

        let meta = match playlist.get(app.selected) {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nCover: {}\nSource: {}{}",
                track.title,
                track.artist,
                track.album,
                format_optional_time(track.duration),
                track.cover.label(),
                track.source,
                if track.is_transient() { " (in memory)" } else { "" },
            ),
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(padded(" metadata (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    // Add-files prompt
    if app.is_prompting() {
        let popup_area = centered_rect_sized(72, 3, chunks[3]);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{}▏", app.prompt))
            .block(padded(" add files: paths separated by ; (enter adds, esc cancels) "));
        frame.render_widget(prompt, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
