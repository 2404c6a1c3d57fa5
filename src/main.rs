use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use recite::app::{App, AppScreen};
use recite::config::Config;
use recite::event::{AppEvent, EventHandler};
use recite::store::json_store::{self, JsonStore};
use recite::ui::components::diff_view::DiffView;
use recite::ui::components::input_box::InputBox;
use recite::ui::components::session_header::SessionHeader;
use recite::ui::layout::{AppLayout, pack_hint_lines, split_practice};
use recite::ui::text_input::InputResult;
use recite::ui::theme::Theme;
use recite::{logging, speech};

#[derive(Parser)]
#[command(name = "recite", version, about = "Terminal sentence recall trainer with adaptive sampling")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Load sentences from a text file and start practicing")]
    source: Option<PathBuf>,

    #[arg(long, help = "Seed for sentence selection (reproducible sessions)")]
    seed: Option<u64>,

    #[arg(long, help = "Text-to-speech command, e.g. espeak-ng or say")]
    speech: Option<String>,

    #[arg(long, help = "Always show the sentence text")]
    reveal: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init(&json_store::data_dir()) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "invalid config file, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(speech) = cli.speech {
        config.speech_command = Some(speech);
    }
    if cli.reveal {
        config.reveal_sentence = true;
    }

    let source = match &cli.source {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let theme = Theme::load(&config.theme).unwrap_or_default();
    let speaker = speech::from_config(config.speech_program(), &config.speech_args);
    let store = JsonStore::new()
        .inspect_err(|err| tracing::warn!(%err, "source store unavailable"))
        .ok();

    let autostart = source.is_some();
    let mut app = App::new(config, theme, speaker, store, rng, source);
    if autostart {
        app.commit_source();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => app.handle_paste(&text),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.screen {
        AppScreen::Source => handle_source_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Feedback => handle_feedback_key(app, key),
    }
}

fn handle_source_key(app: &mut App, key: KeyEvent) {
    match app.source_input.handle(key) {
        InputResult::Submit => app.commit_source(),
        InputResult::Cancel => app.quit(),
        InputResult::Continue => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('p') => return app.repeat_audio(),
            KeyCode::Char('r') => return app.toggle_reveal(),
            _ => {}
        }
    }
    match app.attempt_input.handle(key) {
        InputResult::Submit => app.submit_attempt(),
        InputResult::Cancel => app.close_session(),
        InputResult::Continue => {}
    }
}

fn handle_feedback_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char(' ') => app.next_sentence(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('p') => app.repeat_audio(),
        KeyCode::Char('q') | KeyCode::Esc => app.close_session(),
        _ => {}
    }
}

fn screen_hints(screen: AppScreen) -> &'static [&'static str] {
    match screen {
        AppScreen::Source => &["[Ctrl+S] Start practicing", "[Enter] New line", "[Esc] Quit"],
        AppScreen::Practice => &[
            "[Enter] Check",
            "[Ctrl+P] Repeat audio",
            "[Ctrl+R] Show/hide sentence",
            "[Esc] End session",
        ],
        AppScreen::Feedback => &[
            "[Enter] Next sentence",
            "[r] Try again",
            "[p] Repeat audio",
            "[Esc] End session",
        ],
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hints = pack_hint_lines(screen_hints(app.screen), area.width.saturating_sub(2) as usize);
    let layout = AppLayout::new(area, hints.len() as u16 + 1);

    let title = match app.screen {
        AppScreen::Source => "Sentences",
        AppScreen::Practice => "Listen and type",
        AppScreen::Feedback => "Result",
    };
    frame.render_widget(
        SessionHeader {
            screen_title: title,
            sentence_count: app.sentence_count(),
            summary: app.session.summary(),
            theme: &app.theme,
        },
        layout.header,
    );

    match app.screen {
        AppScreen::Source => render_source(frame, app, layout.main),
        AppScreen::Practice => render_practice(frame, app, layout.main),
        AppScreen::Feedback => render_feedback(frame, app, layout.main),
    }

    let mut footer_lines: Vec<Line> = Vec::new();
    match &app.status {
        Some(status) => {
            let color = if status.is_error { colors.error() } else { colors.success() };
            footer_lines.push(Line::from(Span::styled(
                format!("  {}", status.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }
        None => footer_lines.push(Line::from("")),
    }
    for hint in hints {
        footer_lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.text_muted()),
        )));
    }
    let footer = Paragraph::new(footer_lines).block(
        Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg())),
    );
    frame.render_widget(footer, layout.footer);
}

fn render_source(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let editor = InputBox::new(
        &app.source_input,
        &app.theme,
        "Enter the sentences you want to practise (split on . ? ! or new lines)",
    );
    frame.render_widget(editor, area);
}

fn prompt_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::bordered()
        .title(title)
        .border_style(Style::default().fg(app.theme.colors.border()))
        .style(Style::default().bg(app.theme.colors.bg()))
}

fn render_practice(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let (prompt_area, input_area) = split_practice(area);

    let prompt_line = match (app.reveal, app.session.current()) {
        (true, Some(entry)) => Line::from(Span::styled(
            entry.text.as_str(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        (false, Some(_)) => Line::from(Span::styled(
            "Listen... press Ctrl+P to hear it again, Ctrl+R to show it",
            Style::default().fg(colors.text_muted()),
        )),
        (_, None) => Line::from(""),
    };
    let prompt = Paragraph::new(vec![Line::from(""), prompt_line])
        .block(prompt_block(app, " Sentence "))
        .wrap(Wrap { trim: false });
    frame.render_widget(prompt, prompt_area);

    let input = InputBox::new(&app.attempt_input, &app.theme, "Your attempt");
    frame.render_widget(input, input_area);
}

fn render_feedback(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let (summary_area, diff_area) = split_practice(area);

    let Some(result) = app.session.last_result() else {
        return;
    };
    let sentence = app.session.current().map(|e| e.text.as_str()).unwrap_or("");
    let attempt = app.session.last_attempt().unwrap_or("");

    let (verdict, verdict_color) = if result.correct {
        ("\u{2713} Correct", colors.success())
    } else {
        ("\u{2717} Not quite", colors.error())
    };
    let label = Style::default().fg(colors.text_muted());
    let lines = vec![
        Line::from(Span::styled(
            verdict,
            Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Sentence:  ", label),
            Span::styled(sentence, Style::default().fg(colors.fg())),
        ]),
        Line::from(vec![
            Span::styled("You typed: ", label),
            Span::styled(attempt, Style::default().fg(colors.fg())),
        ]),
        Line::from(Span::styled(
            format!("Selection weight is now {:.4}", result.updated_weight),
            label,
        )),
    ];
    let summary = Paragraph::new(lines)
        .block(prompt_block(app, " Result "))
        .wrap(Wrap { trim: false });
    frame.render_widget(summary, summary_area);

    match &result.diff {
        Some(runs) => frame.render_widget(DiffView::new(runs, &app.theme, "Differences"), diff_area),
        None => {
            let done = Paragraph::new(Line::from(Span::styled(
                "Word for word. This sentence will come up less often.",
                Style::default().fg(colors.success()),
            )))
            .block(prompt_block(app, " Differences "));
            frame.render_widget(done, diff_area);
        }
    }
}
