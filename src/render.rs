use crate::field::{Age, Field, CAP};
use anyhow::Context;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Stdout, Write};

// 232..=255 is the xterm grayscale ramp; intensities 1..=CAP land on 232..=252
const GRAY_BASE: u8 = 231;

/// Background shade for a cell of the given age. Younger is brighter.
pub(crate) fn shade(age: Age) -> Color {
    let level = CAP.saturating_sub(age).max(1);
    Color::AnsiValue(GRAY_BASE + level)
}

/// One shade per terminal column. `None` is the terminal's own background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Frame {
    cols: u16,
    rows: u16,
    shades: Vec<Option<Color>>,
}

impl Frame {
    fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            shades: vec![None; usize::from(cols) * usize::from(rows)],
        }
    }

    fn at(&self, col: u16, row: u16) -> Option<Color> {
        if col < self.cols && row < self.rows {
            self.shades[usize::from(row) * usize::from(self.cols) + usize::from(col)]
        } else {
            None
        }
    }

    /// Paints both terminal columns of field cell `(x, y)`. A half cell past
    /// the right edge is dropped.
    fn paint(&mut self, x: i32, y: i32, color: Color) {
        let (Ok(row), Ok(col)) = (u16::try_from(y), u16::try_from(x * 2)) else {
            return;
        };
        if row >= self.rows {
            return;
        }
        let line = usize::from(row) * usize::from(self.cols);
        for c in [col, col.saturating_add(1)] {
            if c < self.cols {
                self.shades[line + usize::from(c)] = Some(color);
            }
        }
    }
}

/// Owns the last two frames and the output; the only thing that writes to
/// the screen.
pub(crate) struct Renderer<W: Write> {
    out: W,
    shown: Frame,
    next: Frame,
}

impl<W: Write> Renderer<W> {
    pub(crate) fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            shown: Frame::new(cols, rows),
            next: Frame::new(cols, rows),
        }
    }

    /// Rebuild the next frame from the field's visible cells.
    pub(crate) fn compose(&mut self, field: &dyn Field) {
        self.next.shades.fill(None);
        for (x, y, age) in field.visible() {
            self.next.paint(x, y, shade(age));
        }
    }

    /// Compose the field, then repaint each run of changed columns with one
    /// cursor move, all inside a single synchronized update.
    pub(crate) fn draw(&mut self, field: &dyn Field) -> anyhow::Result<()> {
        self.compose(field);
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut pen: Option<Option<Color>> = None;
        for row in 0..self.next.rows {
            let mut col = 0;
            while col < self.next.cols {
                if self.next.at(col, row) == self.shown.at(col, row) {
                    col += 1;
                    continue;
                }
                queue!(self.out, cursor::MoveTo(col, row))?;
                while col < self.next.cols && self.next.at(col, row) != self.shown.at(col, row) {
                    let want = self.next.at(col, row);
                    if pen != Some(want) {
                        queue!(self.out, SetBackgroundColor(want.unwrap_or(Color::Reset)))?;
                        pen = Some(want);
                    }
                    queue!(self.out, Print(' '))?;
                    col += 1;
                }
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.shown.clone_from(&self.next);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn shade_at(&self, col: u16, row: u16) -> Option<Color> {
        self.next.at(col, row)
    }

    #[cfg(test)]
    pub(crate) fn frame(&self) -> &Frame {
        &self.next
    }

    #[cfg(test)]
    pub(crate) fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the app.
/// `end` restores the terminal once; dropping an un-ended guard does it too.
pub(crate) struct TermGuard {
    out: Stdout,
    cols: u16,
    rows: u16,
    active: bool,
}

impl TermGuard {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let mut guard = Self {
            out: io::stdout(),
            cols: 0,
            rows: 0,
            active: true,
        };
        execute!(
            guard.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )
        .context("failed to enter alternate screen")?;

        let (cols, rows) = terminal::size().context("failed to query terminal size")?;
        guard.cols = cols;
        guard.rows = rows;
        Ok(guard)
    }

    pub(crate) fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        if let Err(err) = self.end() {
            tracing::error!(?err, "failed to restore terminal");
        }
    }
}
