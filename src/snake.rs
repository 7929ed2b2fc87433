use std::collections::VecDeque;

use crate::board::Pos;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step as `(dy, dx)` in simulation space.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Up => (1, 0),
            Down => (-1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { head: Pos, grew: bool },
    Crashed { head: Pos },
}

#[derive(Clone, Debug)]
pub struct Snake {
    direction: Direction,
    head: Pos,
    // Front is the cell right behind the head, back is the oldest segment.
    tail: VecDeque<Pos>,
    alive: bool,
}

impl Snake {
    pub fn new(head: Pos, direction: Direction) -> Self {
        Snake { direction, head, tail: VecDeque::new(), alive: true }
    }

    /// Turns (unless `input` is `None` or a reversal), steps once, and grows
    /// if the new head lands on `apple`. Running into the tail kills the snake;
    /// a dead snake no longer moves.
    pub fn advance(&mut self, input: Option<Direction>, apple: Pos) -> MoveResult {
        if !self.alive {
            return Crashed { head: self.head };
        }

        if let Some(dir) = input {
            if dir != self.direction.opposite() {
                self.direction = dir;
            }
        }

        self.tail.push_front(self.head);
        self.head = self.head.offset(self.direction.delta());

        let grew = self.head == apple;
        if !grew {
            self.tail.pop_back();
        }

        if self.tail.contains(&self.head) {
            self.alive = false;
            return Crashed { head: self.head };
        }

        Moved { head: self.head, grew }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn head(&self) -> Pos {
        self.head
    }

    pub fn tail(&self) -> impl Iterator<Item = Pos> + '_ {
        self.tail.iter().copied()
    }

    /// Apples eaten so far.
    pub fn score(&self) -> usize {
        self.tail.len()
    }

    /// Head first, then the tail from neck to tip.
    pub fn footprint(&self) -> impl Iterator<Item = Pos> + '_ {
        std::iter::once(self.head).chain(self.tail())
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAR_APPLE: Pos = Pos::new(100, 100);

    fn coiled(head: Pos, direction: Direction, tail: &[Pos]) -> Snake {
        Snake { direction, head, tail: tail.iter().copied().collect(), alive: true }
    }

    #[test]
    fn opposites_pair_up() {
        for dir in [Up, Down, Left, Right] {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dy, dx) = dir.delta();
            assert_eq!(dir.opposite().delta(), (-dy, -dx));
            assert_eq!(dy.abs() + dx.abs(), 1);
        }
    }

    #[test]
    fn none_keeps_heading_and_slides() {
        let mut snake = Snake::new(Pos::new(5, 5), Up);

        let res = snake.advance(None, Pos::new(5, 6));

        assert_eq!(res, Moved { head: Pos::new(6, 5), grew: false });
        assert_eq!(snake.head(), Pos::new(6, 5));
        assert_eq!(snake.direction(), Up);
        assert_eq!(snake.score(), 0);
        assert!(snake.is_alive());
    }

    #[test]
    fn eating_grows_tail_by_old_head() {
        let mut snake = Snake::new(Pos::new(5, 5), Up);

        let res = snake.advance(None, Pos::new(6, 5));

        assert_eq!(res, Moved { head: Pos::new(6, 5), grew: true });
        assert_eq!(snake.tail().collect::<Vec<_>>(), vec![Pos::new(5, 5)]);
        assert!(snake.is_alive());

        snake.advance(Some(Right), FAR_APPLE);
        assert_eq!(snake.head(), Pos::new(6, 6));
        assert_eq!(snake.tail().collect::<Vec<_>>(), vec![Pos::new(6, 5)]);
    }

    #[test]
    fn reversal_is_ignored_even_without_tail() {
        for dir in [Up, Down, Left, Right] {
            let mut snake = Snake::new(Pos::new(5, 5), dir);
            snake.advance(Some(dir.opposite()), FAR_APPLE);

            assert_eq!(snake.direction(), dir);
            assert_eq!(snake.head(), Pos::new(5, 5).offset(dir.delta()));
        }

        let mut snake = coiled(Pos::new(5, 5), Left, &[Pos::new(5, 6), Pos::new(5, 7)]);
        snake.advance(Some(Right), FAR_APPLE);
        assert_eq!(snake.direction(), Left);
        assert!(snake.is_alive());
    }

    #[test]
    fn turns_take_effect_immediately() {
        let mut snake = Snake::new(Pos::new(5, 5), Up);

        snake.advance(Some(Left), FAR_APPLE);

        assert_eq!(snake.direction(), Left);
        assert_eq!(snake.head(), Pos::new(5, 4));
        assert_eq!(snake.head_char(), '<');
    }

    #[test]
    fn tail_length_tracks_apples_eaten() {
        let mut snake = Snake::new(Pos::new(1, 1), Right);

        for step in 1..=6 {
            let apple = if step % 2 == 0 { snake.head().offset(Right.delta()) } else { FAR_APPLE };
            let before = snake.score();
            snake.advance(None, apple);
            let expected = if step % 2 == 0 { before + 1 } else { before };
            assert_eq!(snake.score(), expected);
        }
        assert_eq!(snake.score(), 3);
        assert_eq!(snake.footprint().count(), 4);
    }

    #[test]
    fn biting_the_tail_is_fatal_and_final() {
        // Heading left with the body wrapped around below-right.
        let mut snake = coiled(
            Pos::new(5, 5),
            Left,
            &[Pos::new(5, 6), Pos::new(4, 6), Pos::new(4, 5), Pos::new(4, 4)],
        );

        let res = snake.advance(Some(Down), FAR_APPLE);

        assert_eq!(res, Crashed { head: Pos::new(4, 5) });
        assert!(!snake.is_alive());

        let frozen: Vec<Pos> = snake.footprint().collect();
        for dir in [None, Some(Up), Some(Left)] {
            assert_eq!(snake.advance(dir, FAR_APPLE), Crashed { head: Pos::new(4, 5) });
            assert!(!snake.is_alive());
        }
        assert_eq!(snake.footprint().collect::<Vec<_>>(), frozen);
    }

    #[test]
    fn chasing_the_tail_tip_is_safe() {
        // The tip moves out of the way in the same step.
        let mut snake = coiled(Pos::new(5, 5), Left, &[Pos::new(5, 6), Pos::new(4, 6), Pos::new(4, 5)]);

        snake.advance(Some(Down), FAR_APPLE);

        assert!(snake.is_alive());
        assert_eq!(snake.head(), Pos::new(4, 5));
    }

    #[test]
    fn head_never_overlaps_tail_while_alive() {
        let mut snake = Snake::new(Pos::new(10, 10), Up);
        let turns = [Some(Up), Some(Left), Some(Down), Some(Right), None, Some(Down), Some(Left)];

        for (i, turn) in turns.iter().cycle().take(60).enumerate() {
            let apple = if i % 3 == 0 { snake.head().offset(snake.direction().delta()) } else { FAR_APPLE };
            snake.advance(*turn, apple);
            if !snake.is_alive() {
                break;
            }
            assert!(snake.tail().all(|pos| pos != snake.head()));
        }
    }

    #[test]
    fn kill_is_unconditional() {
        let mut snake = Snake::new(Pos::new(3, 3), Down);

        snake.kill();

        assert!(!snake.is_alive());
        assert!(matches!(snake.advance(None, FAR_APPLE), Crashed { .. }));
        assert_eq!(snake.head(), Pos::new(3, 3));
    }
}
