use clap::Parser;
use masked_edit::controller::EditOutcome;
use masked_edit::core::text_edit;
use masked_edit::logging;
use masked_edit::surface::{MemorySurface, TextSurface};
use masked_edit::terminal::{Cell, KeyCode, KeyModifiers, Terminal, TerminalEvent};
use masked_edit::{MaskOptions, MaskedEditController};
use simplelog::LevelFilter;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const IDLE_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(version, about = "Edit one value through an input mask")]
struct Args {
    /// Mask pattern, e.g. "(111) 111-1111"
    #[arg(long, short)]
    pattern: Option<String>,

    /// YAML or JSON options file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Initial value
    #[arg(long)]
    value: Option<String>,

    /// Placeholder shown in empty slots
    #[arg(long)]
    placeholder: Option<char>,

    /// Write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

enum Exit {
    Submitted(String),
    Cancelled,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        logging::init(path, LevelFilter::Debug)?;
    }

    let options = build_options(&args)?;
    let mut controller = MaskedEditController::new(options, MemorySurface::default())?;
    controller.on_focus();

    let mut terminal = Terminal::new()?;
    terminal.enter()?;
    let result = event_loop(&mut terminal, &mut controller);
    terminal.exit()?;

    match result? {
        Exit::Submitted(clean) => println!("{clean}"),
        Exit::Cancelled => std::process::exit(130),
    }
    Ok(())
}

fn build_options(args: &Args) -> Result<MaskOptions, Box<dyn std::error::Error>> {
    let mut options = match &args.config {
        Some(path) => MaskOptions::from_path(path)?,
        None => MaskOptions::default(),
    };
    if let Some(pattern) = &args.pattern {
        options.pattern = pattern.clone();
    }
    if let Some(value) = &args.value {
        options.value = value.clone();
    }
    if let Some(placeholder) = args.placeholder {
        options.placeholder_char = placeholder;
    }
    Ok(options)
}

fn event_loop(
    terminal: &mut Terminal,
    controller: &mut MaskedEditController<MemorySurface>,
) -> io::Result<Exit> {
    let mut last = EditOutcome::Unchanged;

    loop {
        controller.tick();
        render(terminal, controller, last)?;

        let timeout = controller.poll_timeout(IDLE_TIMEOUT);
        match terminal.poll_event(timeout)? {
            Some(TerminalEvent::Key(key)) => match key.code {
                KeyCode::Enter => return Ok(Exit::Submitted(controller.clean_value())),
                KeyCode::Esc => return Ok(Exit::Cancelled),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Exit::Cancelled);
                }
                _ => last = controller.handle_key(key),
            },
            Some(TerminalEvent::Paste(text)) => last = controller.handle_paste(&text),
            Some(TerminalEvent::Resize { .. }) | None => {}
        }
    }
}

fn render(
    terminal: &mut Terminal,
    controller: &MaskedEditController<MemorySurface>,
    last: EditOutcome,
) -> io::Result<()> {
    let status = match last {
        EditOutcome::Rejected(reason) => format!("rejected ({reason:?})"),
        _ => format!("value: {}", controller.clean_value()),
    };
    terminal.render_line(1, &[Cell::dim(status)], None)?;

    let surface = controller.surface();
    let value = surface.value();
    if value.is_empty() {
        let placeholder = Cell::dim(surface.attributes().placeholder.clone());
        return terminal.render_line(0, &[placeholder], Some(0));
    }

    let selection = surface.selection();
    let cells = [
        Cell::plain(text_edit::prefix(value, selection.start)),
        Cell::highlighted(text_edit::slice(value, selection)),
        Cell::plain(value.chars().skip(selection.end).collect::<String>()),
    ];
    let head = text_edit::prefix(value, surface.head());
    let col = u16::try_from(UnicodeWidthStr::width(head.as_str())).unwrap_or(u16::MAX);
    terminal.render_line(0, &cells, Some(col))
}
