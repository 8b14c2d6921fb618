//! Terminal front-end
//!
//! Draws frames with crossterm and turns terminal key/mouse events into
//! simulation input. The field is scaled to whatever size the terminal is;
//! row 0 is the HUD.

use std::collections::HashMap;
use std::io::{self, BufWriter, Stdout, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use rocket_barrage::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use rocket_barrage::frame::{Frame, Hud, Presenter, RenderSink};
use rocket_barrage::sim::{ExplosionKind, GamePhase, GameState, InputEvent, Key};
use rocket_barrage::{GameLoop, Settings};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD: Color = Color::White;
const C_PLAYER: Color = Color::Blue;
const C_ENEMY: Color = Color::Red;
const C_BULLET: Color = Color::Yellow;
const C_ROCKET: Color = Color::Magenta;
const C_BANNER: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Drawing surface ───────────────────────────────────────────────────────────

/// Character grid covering the play area (everything below the HUD row)
struct Canvas {
    cols: i32,
    rows: i32,
    cells: Vec<(char, Color)>,
}

impl Canvas {
    fn new(cols: u16, rows: u16) -> Self {
        let (cols, rows) = (cols as i32, rows as i32);
        Self {
            cols,
            rows,
            cells: vec![(' ', Color::Reset); (cols * rows).max(0) as usize],
        }
    }

    fn scale(&self) -> Vec2 {
        Vec2::new(self.cols as f32 / FIELD_WIDTH, self.rows as f32 / FIELD_HEIGHT)
    }

    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let c = p * self.scale();
        (c.x.floor() as i32, c.y.floor() as i32)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if (0..self.cols).contains(&col) && (0..self.rows).contains(&row) {
            self.cells[(row * self.cols + col) as usize] = (ch, color);
        }
    }

    /// Fill every cell a field-space box touches (at least one cell)
    fn fill(&mut self, pos: Vec2, size: Vec2, ch: char, color: Color) {
        let (c0, r0) = self.to_cell(pos);
        let end = (pos + size) * self.scale();
        let c1 = (end.x.ceil() as i32).max(c0 + 1);
        let r1 = (end.y.ceil() as i32).max(r0 + 1);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, ch, color);
            }
        }
    }

    fn text(&mut self, center: Vec2, text: &str, color: Color) {
        let (col, row) = self.to_cell(center);
        let start = col - text.chars().count() as i32 / 2;
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, row, ch, color);
        }
    }

    fn burst(&mut self, center: Vec2, radius: f32, alpha: f32, kind: ExplosionKind) {
        let scale = self.scale();
        let r = Vec2::splat(radius) * scale;
        let (cc, cr) = self.to_cell(center);
        let (rc, rr) = (r.x.ceil() as i32, r.y.ceil() as i32);
        for row in cr - rr..=cr + rr {
            for col in cc - rc..=cc + rc {
                let d = Vec2::new(
                    (col - cc) as f32 / r.x.max(0.5),
                    (row - cr) as f32 / r.y.max(0.5),
                )
                .length_squared();
                if d > 1.0 {
                    continue;
                }
                let ch = if alpha > 0.5 { '*' } else { '.' };
                let color = match kind {
                    ExplosionKind::Large if d < 0.2 => Color::Yellow,
                    ExplosionKind::Large if d < 0.5 => Color::DarkYellow,
                    ExplosionKind::Large => Color::Red,
                    ExplosionKind::Small => Color::Yellow,
                };
                self.put(col, row, ch, color);
            }
        }
    }
}

/// Arrow for a rocket heading (screen-space atan2 angle)
fn rocket_glyph(angle: f32) -> char {
    let (sin, cos) = angle.sin_cos();
    if cos.abs() > 2.0 * sin.abs() {
        if cos > 0.0 { '>' } else { '<' }
    } else if sin.abs() > 2.0 * cos.abs() {
        if sin < 0.0 { '^' } else { 'v' }
    } else if (cos > 0.0) == (sin < 0.0) {
        '/'
    } else {
        '\\'
    }
}

fn bullet_glyph(vel: Vec2) -> char {
    if vel.x > 1.0 {
        '/'
    } else if vel.x < -1.0 {
        '\\'
    } else {
        '|'
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self { out, cols, rows }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    fn hud_line(&self, frame: &Frame<'_>) -> String {
        let Hud {
            score,
            lives,
            level,
        } = frame.hud;
        let status = match frame.phase {
            GamePhase::Idle => "Enter: start",
            GamePhase::Running => "",
            GamePhase::Over => "GAME OVER",
        };
        format!(" Score: {score:<7} Lives: {lives:<3} Level: {level:<4} {status}")
    }

    fn draw_overlay(canvas: &mut Canvas, frame: &Frame<'_>) {
        let mid = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        let line = Vec2::new(0.0, FIELD_HEIGHT / canvas.rows.max(1) as f32);
        match frame.phase {
            GamePhase::Idle => {
                canvas.text(mid - line, "ROCKET BARRAGE", C_BANNER);
                canvas.text(mid + line, "Enter: start   +/-: level   q: quit", C_HINT);
                canvas.text(
                    mid + line * 2.0,
                    "mouse: steer   up/down: move   space: fire",
                    C_HINT,
                );
            }
            GamePhase::Over => {
                canvas.text(mid - line, "GAME OVER", C_ENEMY);
                let score = format!("Final score: {}", frame.final_score.unwrap_or(frame.hud.score));
                canvas.text(mid, &score, C_HUD);
                canvas.text(mid + line, "Enter: restart   +/-: level   q: quit", C_HINT);
            }
            GamePhase::Running => {}
        }
    }
}

impl<W: Write> RenderSink for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let mut canvas = Canvas::new(self.cols, self.rows.saturating_sub(1));

        for enemy in frame.enemies {
            canvas.fill(enemy.pos, enemy.size, '#', C_ENEMY);
        }
        for bullet in frame.bullets {
            let (col, row) = canvas.to_cell(bullet.pos);
            canvas.put(col, row, bullet_glyph(bullet.vel), C_BULLET);
        }
        for rocket in frame.rockets {
            let (col, row) = canvas.to_cell(rocket.pos);
            canvas.put(col, row, rocket_glyph(rocket.angle), C_ROCKET);
        }
        for explosion in &frame.explosions {
            canvas.burst(explosion.pos, explosion.radius, explosion.alpha, explosion.kind);
        }
        canvas.fill(frame.player.pos, frame.player.size, 'A', C_PLAYER);
        for banner in frame.banners {
            if banner.alpha > 0.25 {
                canvas.text(banner.pos, &banner.text, C_BANNER);
            }
        }
        Self::draw_overlay(&mut canvas, frame);

        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD))?;
        let hud = self.hud_line(frame);
        self.out
            .queue(Print(format!("{hud:<width$}", width = self.cols as usize)))?;

        for row in 0..canvas.rows {
            self.out.queue(cursor::MoveTo(0, row as u16 + 1))?;
            let mut current = None;
            for col in 0..canvas.cols {
                let (ch, color) = canvas.cells[(row * canvas.cols + col) as usize];
                if current != Some(color) {
                    self.out.queue(style::SetForegroundColor(color))?;
                    current = Some(color);
                }
                self.out.queue(Print(ch))?;
            }
        }

        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

/// Logs HUD changes; the renderer draws the HUD itself
#[derive(Debug, Default)]
pub struct HudLog;

impl Presenter for HudLog {
    fn show_hud(&mut self, hud: Hud) {
        log::debug!("Score {} | Lives {} | Level {}", hud.score, hud.lives, hud.level);
    }

    fn show_game_over(&mut self, final_score: u32) {
        log::info!("Final score: {}", final_score);
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Tracks held keys. Terminals without key-release reporting only send
/// presses (plus OS key-repeat), so there a key is treated as released once
/// it has been quiet for the hold window.
pub struct KeyTracker {
    hold: Option<Duration>,
    last_seen: HashMap<Key, Instant>,
}

impl KeyTracker {
    pub fn new(hold: Option<Duration>) -> Self {
        Self {
            hold,
            last_seen: HashMap::new(),
        }
    }

    /// Press or repeat. Every one is forwarded, so a key held through a
    /// session start latches again on its next repeat.
    pub fn press(&mut self, key: Key, now: Instant) -> InputEvent {
        self.last_seen.insert(key, now);
        InputEvent::KeyDown(key)
    }

    /// Keys currently considered down
    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        self.last_seen.keys().copied()
    }

    pub fn release(&mut self, key: Key) -> Option<InputEvent> {
        self.last_seen
            .remove(&key)
            .map(|_| InputEvent::KeyUp(key))
    }

    /// Key-ups for keys that have gone quiet
    pub fn expire(&mut self, now: Instant) -> Vec<InputEvent> {
        let Some(hold) = self.hold else {
            return Vec::new();
        };
        let stale: Vec<Key> = self
            .last_seen
            .iter()
            .filter(|(_, seen)| now.duration_since(**seen) > hold)
            .map(|(key, _)| *key)
            .collect();
        stale
            .into_iter()
            .filter_map(|key| self.release(key))
            .collect()
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char(c) => Some(Key::Other(c)),
        _ => None,
    }
}

/// Map a terminal column to field x (cell center)
fn column_to_field(column: u16, cols: u16) -> f32 {
    (column as f32 + 0.5) / cols.max(1) as f32 * FIELD_WIDTH
}

enum Flow {
    Continue,
    Quit,
}

type Game<W> = GameLoop<TerminalRenderer<W>, HudLog>;

/// Begin or restart a session, then re-send keys that are still down so a
/// held fire key keeps firing
fn begin_session<W: Write>(game: &mut Game<W>, keys: &KeyTracker) {
    match game.state().phase {
        GamePhase::Idle => game.start(),
        GamePhase::Over => game.restart(),
        GamePhase::Running => return,
    }
    for key in keys.held() {
        game.handle_input(InputEvent::KeyDown(key));
    }
}

/// Session and host controls; everything else goes to the simulation
fn handle_event<W: Write>(
    game: &mut Game<W>,
    keys: &mut KeyTracker,
    size: &mut (u16, u16),
    event: Event,
    now: Instant,
) -> Flow {
    match event {
        Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) => {
            if kind == KeyEventKind::Press {
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Flow::Quit;
                    }
                    KeyCode::Enter => begin_session(game, keys),
                    KeyCode::Char('+') | KeyCode::Char('=') => game.change_level(1),
                    KeyCode::Char('-') => game.change_level(-1),
                    KeyCode::Char('p') | KeyCode::Char('P') => {
                        if game.is_paused() {
                            game.resume();
                        } else {
                            game.pause();
                        }
                    }
                    _ => {}
                }
            }
            if let Some(key) = map_key(code) {
                let input = match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => Some(keys.press(key, now)),
                    KeyEventKind::Release => keys.release(key),
                };
                if let Some(input) = input {
                    game.handle_input(input);
                }
            }
        }
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
            column,
            ..
        }) => {
            game.handle_input(InputEvent::PointerMoved(column_to_field(column, size.0)));
        }
        Event::Resize(cols, rows) => {
            *size = (cols, rows);
            game.renderer_mut().resize(cols, rows);
        }
        _ => {}
    }
    Flow::Continue
}

fn play(settings: &Settings, seed: u64, enhanced: bool, rx: &mpsc::Receiver<Event>) -> io::Result<Option<u32>> {
    let mut size = terminal::size()?;
    let renderer = TerminalRenderer::new(BufWriter::new(io::stdout()), size.0, size.1);
    let mut game: Game<BufWriter<Stdout>> = GameLoop::new(GameState::new(seed), renderer, HudLog, settings.stop_policy());
    let hold = (!enhanced).then(|| Duration::from_millis(settings.key_hold_ms));
    let mut keys = KeyTracker::new(hold);
    let frame_time = Duration::from_secs_f64(settings.frame_ms() / 1000.0);
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();

        while let Ok(event) = rx.try_recv() {
            if let Flow::Quit = handle_event(&mut game, &mut keys, &mut size, event, frame_start) {
                return Ok(game.state().final_score);
            }
        }
        for input in keys.expire(frame_start) {
            game.handle_input(input);
        }

        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        if !game.frame(now_ms)? {
            return Ok(game.state().final_score);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// Puts the terminal back the way it was when dropped, including while
/// unwinding from a panic
struct TerminalGuard<W: Write> {
    out: W,
    enhanced: bool,
}

impl<W: Write> TerminalGuard<W> {
    /// Raw mode must already be on; it is switched off again on drop
    fn new(out: W) -> Self {
        Self {
            out,
            enhanced: false,
        }
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = self.out.queue(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.queue(DisableMouseCapture);
        let _ = self.out.queue(cursor::Show);
        let _ = self.out.queue(terminal::LeaveAlternateScreen);
        let _ = self.out.flush();
        let _ = terminal::disable_raw_mode();
    }
}

/// Take over the terminal, play until the user quits, then restore it.
/// Returns the last final score, if a session ended.
pub fn run(settings: &Settings, seed: u64) -> io::Result<Option<u32>> {
    terminal::enable_raw_mode()?;
    let mut guard = TerminalGuard::new(io::stdout());
    guard.out.execute(terminal::EnterAlternateScreen)?;
    guard.out.execute(cursor::Hide)?;
    guard.out.execute(EnableMouseCapture)?;

    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        guard.out.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
        guard.enhanced = true;
    }
    log::info!("Terminal ready (key release events: {})", enhanced);

    // Blocking reads happen on their own thread so the frame loop never waits
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(event) = event::read() {
            if tx.send(event).is_err() {
                break;
            }
        }
    });

    play(settings, seed, enhanced, &rx)
}
