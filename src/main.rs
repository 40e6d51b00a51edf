//! Teller TUI - Actor-based terminal client for the teller payments API
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

mod models;
mod storage;
mod ui;
mod messages;
mod app;
mod network;
mod constants;

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
use messages::ui_events::{key_to_ui_event, FormField, InputMode, Section};
use app::AppActor;
use network::{ApiClient, NetworkActor};
use ui::{notice_color, render_tabs, transaction_line};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "teller.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let base_url = std::env::var(constants::API_URL_ENV)
        .unwrap_or_else(|_| constants::DEFAULT_API_URL.to_string());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(ApiClient::new(base_url), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.section,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        } else {
            // Idle tick drives notice expiry
            let _ = ui_tx.send(UiEvent::Tick);
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    // Main layout with tab bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Section bar
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Notice line
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_section_bar(f, state, main_chunks[0]);

    match state.section {
        Section::Register => draw_register_section(f, state, main_chunks[1]),
        Section::Login => draw_login_section(f, state, main_chunks[1]),
        Section::Payment => draw_payment_section(f, state, main_chunks[1]),
        Section::Transactions => draw_transactions_section(f, state, main_chunks[1]),
    }

    draw_notice_line(f, state, main_chunks[2]);
    draw_status_bar(f, state, main_chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

/// Section bar - only the sections reachable in the current session
/// state are offered, like the original client's two nav blocks
fn draw_section_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let (titles, selected) = if state.logged_in {
        (
            vec![" 3:Payment ", " 4:Transactions "],
            match state.section {
                Section::Transactions => 1,
                _ => 0,
            },
        )
    } else {
        (
            vec![" 1:Register ", " 2:Login "],
            match state.section {
                Section::Login => 1,
                _ => 0,
            },
        )
    };

    let tabs = render_tabs(&titles, selected);
    f.render_widget(tabs, area);
}

fn draw_register_section(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = form_chunks(area, 2);
    draw_field(
        f,
        state,
        chunks[0],
        FormField::Email,
        &state.register_form.email,
        false,
    );
    draw_field(
        f,
        state,
        chunks[1],
        FormField::Password,
        &state.register_form.password,
        true,
    );
}

fn draw_login_section(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = form_chunks(area, 2);
    draw_field(
        f,
        state,
        chunks[0],
        FormField::Email,
        &state.login_form.email,
        false,
    );
    draw_field(
        f,
        state,
        chunks[1],
        FormField::Password,
        &state.login_form.password,
        true,
    );
}

fn draw_payment_section(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = form_chunks(area, 3);
    draw_field(
        f,
        state,
        chunks[0],
        FormField::Amount,
        &state.payment_form.amount,
        false,
    );
    draw_field(
        f,
        state,
        chunks[1],
        FormField::Currency,
        &state.payment_form.currency,
        false,
    );
    draw_field(
        f,
        state,
        chunks[2],
        FormField::MerchantId,
        &state.payment_form.merchant_id,
        false,
    );
}

/// Split a content area into stacked 3-row field slots
fn form_chunks(area: Rect, fields: usize) -> std::rc::Rc<[Rect]> {
    let mut constraints: Vec<Constraint> = vec![Constraint::Length(3); fields];
    constraints.push(Constraint::Min(0));
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
}

/// Draw a single bordered form field, with cursor when it is being edited
fn draw_field(
    f: &mut Frame,
    state: &RenderState,
    area: Rect,
    field: FormField,
    value: &str,
    masked: bool,
) {
    let is_focused = state.active_field == field;
    let border_style = if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", field.label()));

    let display = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let input = Paragraph::new(display).block(block);
    f.render_widget(input, area);

    // Cursor
    if is_focused && state.input_mode == InputMode::Editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_transactions_section(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = if state.is_loading {
        " Transactions [...] "
    } else {
        " Transactions (r:refresh, ↑/↓:scroll) "
    };

    let block = Block::default().borders(Borders::ALL).title(title);

    let mut lines: Vec<Line> = Vec::new();
    if state.transactions.is_empty() {
        let text = if state.is_loading {
            "Loading..."
        } else if state.transactions_loaded {
            "No transactions yet."
        } else {
            "Press 'r' to load transactions."
        };
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for t in &state.transactions {
            lines.push(Line::from(transaction_line(t)));
        }
    }

    let list = Paragraph::new(lines)
        .block(block)
        .scroll((state.transactions_scroll, 0));
    f.render_widget(list, area);
}

fn draw_notice_line(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(notice) = &state.notice {
        let line = Paragraph::new(format!(" {}", notice.text))
            .style(Style::default().fg(notice_color(notice.kind)).bold());
        f.render_widget(line, area);
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Tab:next field | Enter:submit "
    } else if state.section == Section::Transactions {
        " r:refresh | ↑/↓:scroll | 3:payment | l:logout | ?:help | q:quit "
    } else if state.logged_in {
        " Tab:field | e:edit | s:submit | 3/4:section | l:logout | ?:help | q:quit "
    } else {
        " Tab:field | e:edit | s:submit | 1/2:section | ?:help | q:quit "
    };

    let bar = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 TELLER TUI - Keyboard Shortcuts

 NAVIGATION
   1 / 2              Register / Login (logged out)
   3 / 4              Payment / Transactions (logged in)
   Tab / Shift+Tab    Switch form fields

 FORMS
   e / Enter          Edit current field
   ESC                Stop editing
   s / Enter          Submit (Enter while editing)

 TRANSACTIONS
   r / Enter          Refresh list
   ↑ / ↓              Scroll

 SESSION
   l                  Log out

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
