// SPDX-License-Identifier: Apache-2.0

//! Interactive picker shown when one level holds several environments.
//!
//! `Selection` is a plain state machine (`Active` → `Chosen` | `Cancelled`)
//! fed with `PickerEvent`s. The terminal sits behind the `Frontend` trait so
//! the loop in `pick` can be driven by a scripted frontend in tests and by
//! `TermFrontend` (crossterm raw mode on stderr) for real.
//!
//! Everything is drawn on stderr, leaving stdout free for the command that a
//! calling shell captures.

use crate::types::Candidate;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use dialoguer::console;
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal as _, Write};
use tracing::debug;

const TITLE: &str = "Multiple environments found. Please choose one:";

/// Lines per row: name, description, spacer.
const ROW_HEIGHT: usize = 3;

// =============================================================================
// EVENTS
// =============================================================================

/// Input the picker reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// Terminal size changed. Layout only.
    Resize { width: u16, height: u16 },
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// Begin editing the filter.
    StartFilter,
    /// Append to the filter.
    Input(char),
    /// Drop the last filter character.
    Backspace,
    /// Take the highlighted candidate.
    Confirm,
    /// Leave without a choice.
    Cancel,
}

/// Maps a key press to an event.
///
/// Escape and Ctrl-C always cancel. While the filter is being edited,
/// printable keys (including `q`, `j`, `k`, `/`) go into the filter.
pub fn event_for_key(key: &KeyEvent, editing: bool) -> Option<PickerEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let event = match key.code {
        KeyCode::Esc => PickerEvent::Cancel,
        KeyCode::Char('c') if ctrl => PickerEvent::Cancel,
        KeyCode::Enter => PickerEvent::Confirm,
        KeyCode::Up => PickerEvent::Up,
        KeyCode::Down => PickerEvent::Down,
        KeyCode::PageUp => PickerEvent::PageUp,
        KeyCode::PageDown => PickerEvent::PageDown,
        KeyCode::Home => PickerEvent::Home,
        KeyCode::End => PickerEvent::End,
        KeyCode::Backspace if editing => PickerEvent::Backspace,
        // Unlike a bare list, `q` here is filter text, so filters may contain it.
        KeyCode::Char(c) if editing && !ctrl => PickerEvent::Input(c),
        KeyCode::Char('q') if !editing => PickerEvent::Cancel,
        KeyCode::Char('k') if !editing => PickerEvent::Up,
        KeyCode::Char('j') if !editing => PickerEvent::Down,
        KeyCode::Char('g') if !editing => PickerEvent::Home,
        KeyCode::Char('G') if !editing => PickerEvent::End,
        KeyCode::Char('/') if !editing => PickerEvent::StartFilter,
        _ => return None,
    };
    Some(event)
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Where the picker is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickState {
    Active,
    Chosen(Candidate),
    Cancelled,
}

/// Candidates, the filtered view over them, and the highlight.
#[derive(Debug, Clone)]
pub struct Selection {
    candidates: Vec<Candidate>,
    /// Indices into `candidates` that match the filter.
    visible: Vec<usize>,
    /// Position in `visible`.
    cursor: usize,
    filter: Option<String>,
    editing: bool,
    width: u16,
    height: u16,
    state: PickState,
}

impl Selection {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        let visible = (0..candidates.len()).collect();
        Self {
            candidates,
            visible,
            cursor: 0,
            filter: None,
            editing: false,
            width: 80,
            height: 24,
            state: PickState::Active,
        }
    }

    pub fn state(&self) -> &PickState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PickState::Active
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Candidates that pass the current filter, in original order.
    pub fn visible(&self) -> impl Iterator<Item = &Candidate> {
        self.visible.iter().map(|&i| &self.candidates[i])
    }

    pub fn highlighted(&self) -> Option<&Candidate> {
        self.visible.get(self.cursor).map(|&i| &self.candidates[i])
    }

    /// The chosen candidate, or `None` if cancelled or still active.
    pub fn into_choice(self) -> Option<Candidate> {
        match self.state {
            PickState::Chosen(c) => Some(c),
            PickState::Active | PickState::Cancelled => None,
        }
    }

    /// Rows that fit on one page.
    pub fn per_page(&self) -> usize {
        let chrome = 5 + usize::from(self.filter.is_some());
        (usize::from(self.height).saturating_sub(chrome) / ROW_HEIGHT).max(1)
    }

    pub fn apply(&mut self, event: PickerEvent) {
        if !self.is_active() {
            return;
        }

        let last = self.visible.len().saturating_sub(1);
        match event {
            PickerEvent::Resize { width, height } => {
                self.width = width;
                self.height = height;
            }
            PickerEvent::Up => self.cursor = self.cursor.saturating_sub(1),
            PickerEvent::Down => self.cursor = (self.cursor + 1).min(last),
            PickerEvent::PageUp => self.cursor = self.cursor.saturating_sub(self.per_page()),
            PickerEvent::PageDown => self.cursor = (self.cursor + self.per_page()).min(last),
            PickerEvent::Home => self.cursor = 0,
            PickerEvent::End => self.cursor = last,
            PickerEvent::StartFilter => {
                self.editing = true;
                self.filter.get_or_insert_with(String::new);
            }
            PickerEvent::Input(c) => {
                self.editing = true;
                self.filter.get_or_insert_with(String::new).push(c);
                self.refilter();
            }
            PickerEvent::Backspace => {
                if let Some(filter) = self.filter.as_mut() {
                    filter.pop();
                    self.refilter();
                }
            }
            PickerEvent::Confirm => {
                self.state = match self.highlighted() {
                    Some(c) => PickState::Chosen(c.clone()),
                    None => PickState::Cancelled,
                };
            }
            PickerEvent::Cancel => self.state = PickState::Cancelled,
        }
    }

    fn refilter(&mut self) {
        let needle = self.filter.as_deref().unwrap_or("");
        self.visible = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.description().contains(needle))
            .map(|(i, _)| i)
            .collect();
        self.cursor = 0;
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    /// Screen lines for the current state, truncated to the terminal width.
    pub fn view(&self) -> Vec<String> {
        let mut lines = vec![format!("{}", TITLE.bold().magenta()), String::new()];

        if let Some(filter) = &self.filter {
            let cursor = if self.editing { "▏" } else { "" };
            lines.push(format!("{} {}{}", "Filter:".cyan(), filter, cursor));
        }

        let per_page = self.per_page();
        let page = self.cursor / per_page;
        let pages = self.visible.len().div_ceil(per_page).max(1);

        if self.visible.is_empty() {
            lines.push(format!("  {}", "No matches.".dimmed()));
        }

        let start = page * per_page;
        for (offset, &idx) in self.visible.iter().skip(start).take(per_page).enumerate() {
            let candidate = &self.candidates[idx];
            if start + offset == self.cursor {
                lines.push(format!(
                    "{} {}",
                    "│".magenta(),
                    candidate.display_name().magenta().bold()
                ));
                lines.push(format!(
                    "{} {}",
                    "│".magenta(),
                    candidate.description().magenta().dimmed()
                ));
            } else {
                lines.push(format!("  {}", candidate.display_name()));
                lines.push(format!("  {}", candidate.description().dimmed()));
            }
            lines.push(String::new());
        }

        if pages > 1 {
            lines.push(format!("  {}", pagination(page, pages)));
        }
        let help = if self.editing {
            "↑/↓ move • type to filter • enter select • esc quit"
        } else {
            "↑/k up • ↓/j down • / filter • enter select • q quit"
        };
        lines.push(format!("  {}", help.dimmed()));

        let width = usize::from(self.width);
        lines
            .into_iter()
            .map(|line| console::truncate_str(&line, width, "…").into_owned())
            .collect()
    }
}

fn pagination(page: usize, pages: usize) -> String {
    if pages <= 10 {
        (0..pages)
            .map(|p| if p == page { "•" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        format!("{}/{}", page + 1, pages)
    }
}

// =============================================================================
// FRONTEND
// =============================================================================

/// The terminal the picker runs on.
pub trait Frontend {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);
    /// Prepare the screen.
    fn enter(&mut self) -> io::Result<()>;
    /// Replace the screen contents.
    fn draw(&mut self, lines: &[String]) -> io::Result<()>;
    /// Block for the next input. `None` means the input had no binding.
    fn next_event(&mut self, editing: bool) -> io::Result<Option<PickerEvent>>;
    /// Restore the screen. Called even when the loop failed.
    fn leave(&mut self) -> io::Result<()>;
}

/// Runs the picker until the user chooses or cancels.
pub fn pick<F: Frontend>(
    candidates: Vec<Candidate>,
    frontend: &mut F,
) -> io::Result<Option<Candidate>> {
    let mut selection = Selection::new(candidates);
    let (width, height) = frontend.size();
    selection.apply(PickerEvent::Resize { width, height });

    frontend.enter()?;
    let result = drive(&mut selection, frontend);
    let restored = frontend.leave();
    result?;
    restored?;

    debug!(state = ?selection.state(), "picker finished");
    Ok(selection.into_choice())
}

fn drive<F: Frontend>(selection: &mut Selection, frontend: &mut F) -> io::Result<()> {
    while selection.is_active() {
        frontend.draw(&selection.view())?;
        if let Some(event) = frontend.next_event(selection.is_editing())? {
            selection.apply(event);
        }
    }
    Ok(())
}

/// Raw-mode crossterm on stderr, using the alternate screen.
pub struct TermFrontend {
    out: io::Stderr,
    size: (u16, u16),
}

impl TermFrontend {
    /// Fails if stderr is not attached to a terminal.
    pub fn stderr() -> io::Result<Self> {
        let out = io::stderr();
        if !out.is_terminal() {
            return Err(io::Error::other("stderr is not a terminal"));
        }
        let size = terminal::size()?;
        Ok(Self { out, size })
    }
}

fn restore_terminal() {
    let _ = execute!(io::stderr(), Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

impl Frontend for TermFrontend {
    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn enter(&mut self) -> io::Result<()> {
        // Raw mode turns Ctrl-C into a key; this covers a SIGINT sent from
        // elsewhere. Treated as a cancelled pick.
        ctrlc::set_handler(|| {
            restore_terminal();
            std::process::exit(0);
        })
        .ok();

        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide)
    }

    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        let height = usize::from(self.size.1);
        self.out
            .write_all(lines[..lines.len().min(height)].join("\r\n").as_bytes())?;
        self.out.flush()
    }

    fn next_event(&mut self, editing: bool) -> io::Result<Option<PickerEvent>> {
        match event::read()? {
            Event::Key(key) => Ok(event_for_key(&key, editing)),
            Event::Resize(width, height) => {
                self.size = (width, height);
                Ok(Some(PickerEvent::Resize { width, height }))
            }
            _ => Ok(None),
        }
    }

    fn leave(&mut self) -> io::Result<()> {
        execute!(self.out, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}
