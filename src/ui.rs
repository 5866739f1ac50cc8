use crate::card::{PokemonCard, TypeBadge};
use crate::controller::{Key, Modifiers};
use crate::images::CardImage;
use crate::ports::DisplayPort;
use crate::utils::{suggest, COMMON_POKEMON};
use crate::view::DisplayState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Terminal;
use std::io;
use std::io::Stdout;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Everything the screen shows. Written by the explorer through `TuiDisplay`,
/// read by the draw loop every tick.
#[derive(Debug, Default)]
pub struct ViewModel {
    pub display: DisplayState,
    pub busy: bool,
    pub input: String,
    pub input_focused: bool,
    pub show_help: bool,
}

pub type SharedView = Arc<Mutex<ViewModel>>;

pub fn lock_view(view: &SharedView) -> MutexGuard<'_, ViewModel> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Display port backed by the shared view model.
pub struct TuiDisplay {
    view: SharedView,
}

impl TuiDisplay {
    pub fn new(view: SharedView) -> Self {
        Self { view }
    }
}

impl DisplayPort for TuiDisplay {
    fn set_display_state(&self, state: DisplayState) {
        lock_view(&self.view).display = state;
    }

    fn set_search_busy(&self, busy: bool) {
        lock_view(&self.view).busy = busy;
    }

    fn clear_input(&self) {
        lock_view(&self.view).input.clear();
    }

    fn focus_input(&self) {
        lock_view(&self.view).input_focused = true;
    }

    fn set_help_visible(&self, visible: bool) {
        lock_view(&self.view).show_help = visible;
    }
}

/// Input-side state owned by the event loop.
pub struct App {
    pub view: SharedView,
}

impl App {
    pub fn new(view: SharedView) -> Self {
        lock_view(&view).input_focused = true;
        Self { view }
    }

    pub fn input_focused(&self) -> bool {
        lock_view(&self.view).input_focused
    }

    pub fn set_input_focused(&self, focused: bool) {
        lock_view(&self.view).input_focused = focused;
    }

    pub fn is_busy(&self) -> bool {
        lock_view(&self.view).busy
    }

    pub fn input(&self) -> String {
        lock_view(&self.view).input.clone()
    }

    pub fn type_char(&self, c: char) {
        lock_view(&self.view).input.push(c);
    }

    pub fn backspace(&self) {
        lock_view(&self.view).input.pop();
    }
}

/// Map a terminal key event onto the explorer's key model.
pub fn to_core_key(event: &KeyEvent) -> (Key, Modifiers) {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::F(n) => Key::F(n),
        _ => Key::Other,
    };
    let m = event.modifiers;
    let modifiers = Modifiers {
        ctrl: m.contains(KeyModifiers::CONTROL),
        meta: m.contains(KeyModifiers::SUPER) || m.contains(KeyModifiers::META),
    };
    (key, modifiers)
}

/// The character a key press types into the search box. Control chords
/// that are not shortcuts type nothing.
pub fn typed_char(event: &KeyEvent) -> Option<char> {
    match event.code {
        KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => Some(c),
        _ => None,
    }
}

/// Submit control label for the current busy flag.
pub fn submit_label(busy: bool) -> &'static str {
    if busy {
        "Searching..."
    } else {
        "Search Pokémon"
    }
}

fn type_colors(kind: &str) -> (Color, Color) {
    let (r, g, b) = match kind {
        "normal" => (168, 168, 120),
        "fire" => (240, 128, 48),
        "water" => (104, 144, 240),
        "grass" => (120, 200, 80),
        "electric" => (248, 208, 48),
        "ice" => (152, 216, 216),
        "fighting" => (192, 48, 40),
        "poison" => (160, 64, 160),
        "ground" => (224, 192, 104),
        "flying" => (168, 144, 240),
        "psychic" => (248, 88, 136),
        "bug" => (168, 184, 32),
        "rock" => (184, 160, 56),
        "ghost" => (112, 88, 152),
        "dragon" => (112, 56, 248),
        "dark" => (112, 88, 72),
        "steel" => (184, 184, 208),
        "fairy" => (238, 153, 172),
        _ => (200, 200, 200),
    };
    // choose contrasting foreground (black or white)
    let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
    let fg = if lum > 160.0 { Color::Black } else { Color::White };
    (fg, Color::Rgb(r, g, b))
}

fn badge_spans(badges: &[TypeBadge]) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw("Types: ")];
    for (i, badge) in badges.iter().enumerate() {
        let (fg, bg) = type_colors(&badge.kind);
        spans.push(Span::styled(
            format!(" {} ", badge.label),
            Style::default().fg(fg).bg(bg),
        ));
        if i + 1 < badges.len() {
            spans.push(Span::raw(" "));
        }
    }
    spans
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}

fn sprite_paragraph(image: &CardImage, rect: Rect) -> Paragraph<'static> {
    let block = Block::default().borders(Borders::ALL).title("Sprite");
    match image {
        CardImage::Resolved(img) => {
            let w = std::cmp::min(rect.width.saturating_sub(2).max(1) as u32, 64);
            let h = std::cmp::min(rect.height.saturating_sub(2).max(1) as u32, 64);
            let lines: Vec<Spans> = img
                .sprite
                .rows(w, h)
                .into_iter()
                .map(|row| {
                    Spans::from(
                        row.into_iter()
                            .map(|(r, g, b)| {
                                Span::styled(" ", Style::default().bg(Color::Rgb(r, g, b)))
                            })
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            Paragraph::new(lines).block(block.title(img.alt.clone()))
        }
        // Hidden rather than broken.
        CardImage::Unavailable => Paragraph::new("").block(block),
    }
}

fn info_lines(card: &PokemonCard) -> Vec<Spans<'static>> {
    vec![
        Spans::from(Span::styled(
            format!("{} {}", card.name, card.number),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(badge_spans(&card.types)),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw(format!("Height: {}", card.height))),
        Spans::from(Span::raw(format!("Weight: {}", card.weight))),
        Spans::from(Span::raw(format!("Base EXP: {}", card.base_experience))),
    ]
}

fn ability_lines(card: &PokemonCard) -> Vec<Spans<'static>> {
    let mut spans = Vec::new();
    for (i, ability) in card.abilities.iter().enumerate() {
        spans.push(Span::styled(
            format!(" {} ", ability),
            Style::default().fg(Color::Black).bg(Color::Rgb(220, 220, 235)),
        ));
        if i + 1 < card.abilities.len() {
            spans.push(Span::raw(" "));
        }
    }
    vec![Spans::from(spans)]
}

pub fn draw_ui(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &App) -> io::Result<()> {
    let view = lock_view(&app.view);
    terminal
        .draw(|f| {
            let size = f.size();
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(size);

            let left_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(3),
                ])
                .split(chunks[0]);

            let input_style = if view.busy {
                Style::default().fg(Color::DarkGray)
            } else if view.input_focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let cursor = if view.input_focused { "_" } else { "" };
            let input_para = Paragraph::new(vec![Spans::from(Span::raw(format!(
                "{}{}",
                view.input, cursor
            )))])
            .style(input_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(submit_label(view.busy)),
            );
            f.render_widget(input_para, left_chunks[0]);

            let suggestions = suggest(&view.input, &COMMON_POKEMON);
            let suggest_para = Paragraph::new(suggestions.join(", "))
                .block(Block::default().borders(Borders::ALL).title("Suggestions"));
            f.render_widget(suggest_para, left_chunks[1]);

            let hints = Paragraph::new(vec![
                Spans::from(Span::raw("Enter   Search")),
                Spans::from(Span::raw("Ctrl+R  Random Pokémon")),
                Spans::from(Span::raw("Ctrl+K  Focus search")),
                Spans::from(Span::raw("F1      Help")),
            ])
            .block(Block::default().borders(Borders::ALL).title("Keys"));
            f.render_widget(hints, left_chunks[2]);

            match &view.display {
                DisplayState::Idle => {
                    let para = Paragraph::new(
                        "Type a Pokémon name or Pokédex number and press Enter, or press Ctrl+R for a random one.",
                    )
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("Pokémon Explorer"));
                    f.render_widget(para, chunks[1]);
                }
                DisplayState::Loading => {
                    let para = Paragraph::new("Loading...")
                        .block(Block::default().borders(Borders::ALL).title("Pokémon Explorer"));
                    f.render_widget(para, chunks[1]);
                }
                DisplayState::Error(msg) => {
                    let para = Paragraph::new(msg.to_string())
                        .style(Style::default().fg(Color::Red))
                        .wrap(Wrap { trim: true })
                        .block(Block::default().borders(Borders::ALL).title("Error"));
                    f.render_widget(para, chunks[1]);
                }
                DisplayState::Showing(shown) => {
                    let detail_chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(12), Constraint::Min(3)])
                        .split(chunks[1]);

                    let top_chunks = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Length(24), Constraint::Min(10)])
                        .split(detail_chunks[0]);

                    f.render_widget(sprite_paragraph(&shown.image, top_chunks[0]), top_chunks[0]);

                    let info_para = Paragraph::new(info_lines(&shown.card))
                        .block(Block::default().borders(Borders::ALL).title("Info"))
                        .wrap(Wrap { trim: true });
                    f.render_widget(info_para, top_chunks[1]);

                    let abilities_para = Paragraph::new(ability_lines(&shown.card))
                        .block(Block::default().borders(Borders::ALL).title("Abilities"))
                        .wrap(Wrap { trim: false });
                    f.render_widget(abilities_para, detail_chunks[1]);
                }
            }

            if view.show_help {
                let popup = centered_rect(60, 50, size);
                let help_lines = vec![
                    Spans::from(Span::styled(
                        "Keybindings",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Spans::from(Span::raw("")),
                    Spans::from(Span::raw("Enter      Search for the typed name or ID")),
                    Spans::from(Span::raw("Esc        Close help / leave the search box")),
                    Spans::from(Span::raw("/          Focus the search box")),
                    Spans::from(Span::raw("Ctrl+K     Focus the search box")),
                    Spans::from(Span::raw("r, Ctrl+R  Random Pokémon")),
                    Spans::from(Span::raw("h, F1      Toggle this help")),
                    Spans::from(Span::raw("q          Quit (outside the search box)")),
                    Spans::from(Span::raw("Ctrl+C     Quit")),
                ];
                let help_para = Paragraph::new(help_lines)
                    .block(Block::default().borders(Borders::ALL).title("Help"))
                    .wrap(Wrap { trim: true });
                f.render_widget(ratatui::widgets::Clear, popup);
                f.render_widget(help_para, popup);
            }
        })
        .map(|_| ())
}
