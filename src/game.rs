use std::{collections::HashSet, thread::sleep, time::Instant};

use crate::board::{Board, Pos};
use crate::config::{Settings, StartHeading};
use crate::error::{Result, SnekError};
use crate::snake::{Snake, Direction::{*, self}, MoveResult};
use crate::term::{CellColor, Screen};

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use rand::Rng;
use tracing::{debug, info};

const BORDER_CHAR: char = '#';
const SNAKE_BODY_CHAR: char = '%';
const APPLE_CHAR: char = '@';
const EMPTY_CHAR: char = ' ';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    WallCollision,
    SelfCollision,
    /// No free cell was left for the next apple.
    BoardFull,
    Quit,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::BoardFull
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver(Outcome),
}

pub struct SnakeGame<S, R> {
    screen: S,
    rng: R,
    board: Board,
    snake: Snake,
    apple: Pos,
    settings: Settings,
    state: GameState,
}

impl<S: Screen, R: Rng> SnakeGame<S, R> {
    /// Sizes the board to the screen, drops the snake and the first apple on
    /// random free cells and draws the starting frame.
    pub fn new(mut screen: S, mut rng: R, settings: Settings) -> Result<Self> {
        let (height, width) = screen.bounds();
        let board = Board::new(height, width)?;
        let too_small = || SnekError::BoardTooSmall { height, width };

        let start = board.choose_free_cell(&mut rng, &HashSet::new()).ok_or_else(too_small)?;
        let apple = board.choose_free_cell(&mut rng, &HashSet::from([start])).ok_or_else(too_small)?;
        let heading = match settings.start_heading {
            StartHeading::Fixed(dir) => dir,
            StartHeading::FirstKey => Up,
        };

        screen.hide_cursor()?;

        let mut game = SnakeGame {
            screen,
            rng,
            board,
            snake: Snake::new(start, heading),
            apple,
            settings,
            state: GameState::Running,
        };

        game.frame(|game| {
            game.draw_borders()?;
            game.draw_apple()?;
            game.draw_snake()
        })?;

        info!(height, width, head = ?start, apple = ?apple, "session started");
        Ok(game)
    }

    pub fn score(&self) -> usize {
        self.snake.score()
    }

    /// Plays until the session ends, holding a fixed tick period.
    pub fn run(&mut self) -> Result<Outcome> {
        if self.settings.start_heading == StartHeading::FirstKey {
            self.await_heading()?;
        }

        loop {
            if let GameState::GameOver(outcome) = self.state {
                info!(?outcome, score = self.score(), "session over");
                return Ok(outcome);
            }

            let started = Instant::now();
            self.tick()?;

            // Late ticks just run late, there is no catch-up.
            sleep(self.settings.tick_period.saturating_sub(started.elapsed()));
        }
    }

    /// One step of the simulation. Does nothing once the game is over.
    pub fn tick(&mut self) -> Result<GameState> {
        if self.state != GameState::Running {
            return Ok(self.state);
        }

        let input = self.screen.poll_key()?.and_then(|ev| key_to_input(&ev));
        let turn = match input {
            Some(Input::Quit) => return Ok(self.end(Outcome::Quit)),
            Some(Input::Turn(dir)) => Some(dir),
            None => None,
        };

        let state = self.frame(|game| game.step(turn))?;
        self.state = state;
        Ok(state)
    }

    fn step(&mut self, turn: Option<Direction>) -> Result<GameState> {
        self.clear_snake()?;

        let (head, grew) = match self.snake.advance(turn, self.apple) {
            MoveResult::Moved { head, grew } => (head, grew),
            MoveResult::Crashed { head } => (head, false),
        };

        if !self.board.contains(head) {
            self.snake.kill();
            return Ok(self.end(Outcome::WallCollision));
        }

        if grew {
            let occupied: HashSet<Pos> = self.snake.footprint().collect();
            match self.board.choose_free_cell(&mut self.rng, &occupied) {
                Some(apple) => {
                    self.apple = apple;
                    debug!(score = self.score(), apple = ?apple, "apple eaten");
                    self.draw_apple()?;
                }
                None => {
                    self.draw_snake()?;
                    return Ok(self.end(Outcome::BoardFull));
                }
            }
        }

        if !self.snake.is_alive() {
            return Ok(self.end(Outcome::SelfCollision));
        }

        self.draw_snake()?;
        Ok(GameState::Running)
    }

    fn await_heading(&mut self) -> Result<()> {
        loop {
            match key_to_input(&self.screen.wait_key()?) {
                Some(Input::Turn(dir)) => {
                    self.snake = Snake::new(self.snake.head(), dir);
                    return self.frame(|game| game.draw_snake());
                }
                Some(Input::Quit) => {
                    self.end(Outcome::Quit);
                    return Ok(());
                }
                None => {}
            }
        }
    }

    fn end(&mut self, outcome: Outcome) -> GameState {
        debug!(?outcome, head = ?self.snake.head(), direction = ?self.snake.direction(), "game over");
        self.state = GameState::GameOver(outcome);
        self.state
    }

    /// Runs `draw` and then presents exactly once, whether or not it failed.
    fn frame<T>(&mut self, draw: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let res = draw(self);
        let presented = self.screen.present();
        let out = res?;
        presented?;
        Ok(out)
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (height, width) = (self.board.height(), self.board.width());

        for col in 0..width {
            self.screen.draw_cell(0, col, BORDER_CHAR, CellColor::Default)?;
            self.screen.draw_cell(height - 1, col, BORDER_CHAR, CellColor::Default)?;
        }

        for row in 1..height - 1 {
            self.screen.draw_cell(row, 0, BORDER_CHAR, CellColor::Default)?;
            self.screen.draw_cell(row, width - 1, BORDER_CHAR, CellColor::Default)?;
        }

        Ok(())
    }

    fn clear_snake(&mut self) -> Result<()> {
        let cells: Vec<Pos> = self.snake.footprint().collect();
        for pos in cells {
            self.put(pos, EMPTY_CHAR, CellColor::Default)?;
        }
        Ok(())
    }

    fn draw_snake(&mut self) -> Result<()> {
        let tail: Vec<Pos> = self.snake.tail().collect();
        for pos in tail {
            self.put(pos, SNAKE_BODY_CHAR, CellColor::Snek)?;
        }
        self.put(self.snake.head(), self.snake.head_char(), CellColor::Snek)
    }

    fn draw_apple(&mut self) -> Result<()> {
        self.put(self.apple, APPLE_CHAR, CellColor::Apple)
    }

    fn put(&mut self, pos: Pos, ch: char, color: CellColor) -> Result<()> {
        if let Some((row, col)) = self.board.to_screen(pos) {
            self.screen.draw_cell(row, col, ch, color)?;
        }
        Ok(())
    }
}

pub fn key_to_input(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Quit);
    }

    let dir = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Up,
        KeyCode::Char('a') | KeyCode::Left => Left,
        KeyCode::Char('s') | KeyCode::Down => Down,
        KeyCode::Char('d') | KeyCode::Right => Right,
        _ => return None,
    };

    Some(Input::Turn(dir))
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
