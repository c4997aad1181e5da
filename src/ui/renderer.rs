/// Presentation layer: crossterm renderer for the box board.
///
/// Implements the engine's `View` contract. Draw commands from the engine
/// only mutate internal state; the frame loop calls `draw()` once per frame
/// and a repaint happens only when something changed (or the terminal was
/// resized).
///
/// Layout: boxes are placed left-to-right, top-to-bottom on a centered
/// board. The row width follows a divisor rule: the largest divisor of the
/// box count below the configured maximum, so rows always come out even.
/// Counts with no such divisor get a single row.
///
/// The reveal fades every decoy toward the terminal background over
/// `reveal_ms`, leaving only the target visible, then holds for
/// `restart_delay_ms` before reporting completion.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::{TimingConfig, UiConfig};
use crate::game::color::Color;
use crate::game::engine::{Activation, View};
use crate::game::round::{self, BoxSpec};

// ── Board geometry (terminal cells) ──

const BOX_W: u16 = 6;
const BOX_H: u16 = 2;
const GAP_X: u16 = 2;
const GAP_Y: u16 = 1;

const SCORE_ROW: u16 = 0;
const BOARD_ROW: u16 = 2;

/// Matches the explicit background used for every painted cell, so box
/// edges blend into the cleared screen.
const BASE_BG: TermColor = TermColor::Rgb { r: 24, g: 24, b: 32 };
const BASE_BG_RGB: (u8, u8, u8) = (24, 24, 32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BoxRect {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl BoxRect {
    fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x + self.w && row >= self.y && row < self.y + self.h
    }
}

struct Reveal {
    elapsed: u32,
}

pub struct TermRenderer {
    writer: BufWriter<io::Stdout>,
    term_w: u16,
    term_h: u16,

    boxes: Vec<BoxSpec>,
    layout: Vec<BoxRect>,
    level: u32,
    highscore: u32,

    reveal: Option<Reveal>,
    fade_ticks: u32,
    delay_ticks: u32,

    max_boxes_per_row: usize,
    dirty: bool,
}

impl TermRenderer {
    pub fn new(timing: &TimingConfig, ui: &UiConfig) -> Self {
        let tick = timing.tick_rate_ms.max(1);
        TermRenderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            term_w: 0,
            term_h: 0,
            boxes: vec![],
            layout: vec![],
            level: 0,
            highscore: 0,
            reveal: None,
            fade_ticks: ((timing.reveal_ms / tick) as u32).max(1),
            delay_ticks: (timing.restart_delay_ms / tick) as u32,
            max_boxes_per_row: ui.max_boxes_per_row,
            dirty: true,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw;
        self.term_h = th;
        self.dirty = true;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Classify a click: the target box, a decoy, or nothing. Clicks that
    /// land outside every box are ignored by the caller.
    pub fn activation_at(&self, col: u16, row: u16) -> Option<Activation> {
        let idx = self.layout.iter().position(|r| r.contains(col, row))?;
        if self.boxes[idx].is_target {
            Some(Activation::Target)
        } else {
            Some(Activation::Decoy)
        }
    }

    /// Repaint if anything changed since the last frame.
    pub fn draw(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.relayout();
            self.dirty = true;
        }

        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        self.draw_score()?;
        self.draw_boxes()?;
        self.draw_help()?;
        self.writer.flush()
    }

    fn relayout(&mut self) {
        self.layout = compute_layout(
            self.boxes.len(),
            self.max_boxes_per_row,
            self.term_w,
            self.term_h,
        );
    }

    fn draw_score(&mut self) -> io::Result<()> {
        let text = if self.highscore > 0 {
            format!("Score: {}    Best: {}", self.level, self.highscore)
        } else {
            format!("Score: {}", self.level)
        };
        let x = centered_x(self.term_w, text.len() as u16);
        queue!(
            self.writer,
            MoveTo(x, SCORE_ROW),
            SetBackgroundColor(BASE_BG),
            SetForegroundColor(TermColor::White),
            Print(text)
        )
    }

    fn draw_boxes(&mut self) -> io::Result<()> {
        let fade = self.decoy_fade();
        for (spec, rect) in self.boxes.iter().zip(self.layout.iter()) {
            let color = if spec.is_target {
                spec.color
            } else {
                fade_toward_bg(spec.color, fade)
            };
            let bg = TermColor::Rgb { r: color.red, g: color.green, b: color.blue };
            for dy in 0..rect.h {
                queue!(
                    self.writer,
                    MoveTo(rect.x, rect.y + dy),
                    SetBackgroundColor(bg),
                    Print(" ".repeat(rect.w as usize))
                )?;
            }
        }
        Ok(())
    }

    fn draw_help(&mut self) -> io::Result<()> {
        let text = match self.reveal {
            Some(_) => "That was the one...",
            None => "Click the box with the odd shade  ·  [Q] quit",
        };
        let x = centered_x(self.term_w, text.len() as u16);
        queue!(
            self.writer,
            MoveTo(x, self.term_h.saturating_sub(1)),
            SetBackgroundColor(BASE_BG),
            SetForegroundColor(TermColor::DarkGrey),
            Print(text)
        )
    }

    /// How far the decoys have faded: 0.0 = fully visible, 1.0 = gone.
    fn decoy_fade(&self) -> f32 {
        match &self.reveal {
            None => 0.0,
            Some(r) => (r.elapsed as f32 / self.fade_ticks as f32).min(1.0),
        }
    }
}

impl View for TermRenderer {
    fn clear_boxes(&mut self) -> io::Result<()> {
        self.boxes.clear();
        self.layout.clear();
        self.reveal = None;
        self.dirty = true;
        Ok(())
    }

    fn add_boxes(&mut self, count: usize, base: Color, deviation: u8) -> io::Result<()> {
        self.boxes = round::build_boxes(count, base, deviation, &mut rand::thread_rng());
        self.relayout();
        self.dirty = true;
        Ok(())
    }

    fn set_score(&mut self, level: u32, highscore: u32) -> io::Result<()> {
        self.level = level;
        self.highscore = highscore;
        self.dirty = true;
        Ok(())
    }

    fn begin_reveal(&mut self) -> io::Result<()> {
        self.reveal = Some(Reveal { elapsed: 0 });
        self.dirty = true;
        Ok(())
    }

    fn tick_reveal(&mut self) -> io::Result<()> {
        if let Some(reveal) = &mut self.reveal {
            reveal.elapsed += 1;
            // Past the fade, the frame is static; skip repaints in the hold.
            if reveal.elapsed <= self.fade_ticks {
                self.dirty = true;
            }
        }
        Ok(())
    }

    fn reveal_finished(&self) -> bool {
        match &self.reveal {
            Some(r) => r.elapsed >= self.fade_ticks + self.delay_ticks,
            None => false,
        }
    }
}

// ── Layout helpers ──

fn centered_x(term_w: u16, width: u16) -> u16 {
    (term_w.saturating_sub(width)) / 2
}

/// Boxes per row: the largest divisor of `count` below `max`, so every row
/// is full. Counts with no divisor under the cap land on a single row.
fn boxes_per_row(count: usize, max: usize) -> usize {
    let mut per_row = max;
    for i in 1..max {
        if count % i == 0 {
            per_row = i;
        }
    }
    if per_row == 1 {
        count
    } else {
        per_row
    }
}

fn compute_layout(count: usize, max_per_row: usize, term_w: u16, term_h: u16) -> Vec<BoxRect> {
    if count == 0 {
        return vec![];
    }

    let mut per_row = boxes_per_row(count, max_per_row);

    // Last resort for narrow terminals: shrink the row until it fits.
    let fit = ((term_w.saturating_sub(GAP_X) / (BOX_W + GAP_X)) as usize).max(1);
    if per_row > fit {
        per_row = fit;
    }

    let rows = count.div_ceil(per_row);
    let board_w = per_row as u16 * (BOX_W + GAP_X) - GAP_X;
    let board_h = rows as u16 * (BOX_H + GAP_Y) - GAP_Y;

    let x0 = centered_x(term_w, board_w);
    let board_area = term_h.saturating_sub(BOARD_ROW + 1);
    let y0 = BOARD_ROW + centered_x(board_area, board_h).min(board_area);

    (0..count)
        .map(|i| {
            let col = (i % per_row) as u16;
            let row = (i / per_row) as u16;
            BoxRect {
                x: x0 + col * (BOX_W + GAP_X),
                y: y0 + row * (BOX_H + GAP_Y),
                w: BOX_W,
                h: BOX_H,
            }
        })
        .collect()
}

/// Linear blend from a box color toward the screen background.
fn fade_toward_bg(c: Color, t: f32) -> Color {
    let blend = |from: u8, to: u8| -> u8 {
        (from as f32 + (to as f32 - from as f32) * t).round() as u8
    };
    Color::new(
        blend(c.red, BASE_BG_RGB.0),
        blend(c.green, BASE_BG_RGB.1),
        blend(c.blue, BASE_BG_RGB.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_rule_matches_hand_checked_counts() {
        assert_eq!(boxes_per_row(3, 8), 3);
        assert_eq!(boxes_per_row(4, 8), 4);
        assert_eq!(boxes_per_row(9, 8), 3);
        assert_eq!(boxes_per_row(12, 8), 6);
        assert_eq!(boxes_per_row(49, 8), 7);
        // 13 has no divisor below 8: one long row.
        assert_eq!(boxes_per_row(13, 8), 13);
    }

    #[test]
    fn layout_produces_one_rect_per_box_without_overlap() {
        let rects = compute_layout(12, 8, 120, 40);
        assert_eq!(rects.len(), 12);
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                let disjoint = a.x + a.w <= b.x
                    || b.x + b.w <= a.x
                    || a.y + a.h <= b.y
                    || b.y + b.h <= a.y;
                assert!(disjoint, "rects {a:?} and {b:?} overlap");
            }
        }
    }

    #[test]
    fn layout_rows_are_even() {
        let rects = compute_layout(12, 8, 120, 40);
        let top = rects[0].y;
        let first_row = rects.iter().filter(|r| r.y == top).count();
        assert_eq!(first_row, 6);
    }

    #[test]
    fn narrow_terminal_shrinks_rows_instead_of_clipping() {
        let rects = compute_layout(12, 8, 30, 40);
        let per_row = {
            let top = rects[0].y;
            rects.iter().filter(|r| r.y == top).count()
        };
        assert!(per_row <= 3);
        for r in &rects {
            assert!(r.x + r.w <= 30);
        }
    }

    #[test]
    fn rect_hit_testing() {
        let r = BoxRect { x: 10, y: 5, w: 6, h: 2 };
        assert!(r.contains(10, 5));
        assert!(r.contains(15, 6));
        assert!(!r.contains(16, 5));
        assert!(!r.contains(10, 7));
        assert!(!r.contains(9, 5));
    }

    #[test]
    fn fade_endpoints() {
        let c = Color::new(200, 180, 160);
        assert_eq!(fade_toward_bg(c, 0.0), c);
        let gone = fade_toward_bg(c, 1.0);
        assert_eq!((gone.red, gone.green, gone.blue), BASE_BG_RGB);
    }
}
