//! Human vs engine game loop.
//!
//! The session is generic over its input and output so whole games, replays
//! included, can be scripted in tests.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use engine_core::{Game, Outcome};
use games_tictactoe::{Mark, Move, TicTacToe};
use mcts::{MctsConfig, MctsSearch, MctsTree, SearchError, SearchResult};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::board_view::{parse_move, render, render_tree, HumanInput};
use crate::config::StartingPlayer;

/// The human always plays O.
pub const HUMAN: Mark = Mark::O;
/// The engine always plays X.
pub const ENGINE: Mark = Mark::X;

/// Everything the session needs from the configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub mcts: MctsConfig,
    pub starting_player: StartingPlayer,
    pub reuse_tree: bool,
    pub show_tree: bool,
    /// Levels of the search tree shown after an engine move
    pub tree_depth: u32,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    HumanWon,
    EngineWon,
    Draw,
    Quit,
}

impl GameResult {
    fn from_outcome(outcome: Outcome<Mark>) -> Option<Self> {
        match outcome {
            Outcome::Win(HUMAN) => Some(GameResult::HumanWon),
            Outcome::Win(_) => Some(GameResult::EngineWon),
            Outcome::Draw => Some(GameResult::Draw),
            Outcome::InProgress => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GameResult::HumanWon => "You win!",
            GameResult::EngineWon => "You lose!",
            GameResult::Draw => "Tie!",
            GameResult::Quit => "Goodbye.",
        }
    }
}

pub struct GameSession<R, W> {
    input: R,
    output: W,
    settings: SessionSettings,
    rng: ChaCha20Rng,
    /// Search tree kept between moves when tree reuse is on.
    tree: Option<MctsTree<TicTacToe>>,
    /// Rendered summary of the engine's last search.
    last_tree_view: Option<String>,
}

impl<R: BufRead, W: Write> GameSession<R, W> {
    pub fn new(input: R, output: W, settings: SessionSettings) -> Self {
        let rng = settings.mcts.rng();
        Self {
            input,
            output,
            settings,
            rng,
            tree: None,
            last_tree_view: None,
        }
    }

    /// Play games until the human declines a rematch, quits, or input ends.
    pub fn play(&mut self) -> Result<Vec<GameResult>> {
        let mut results = Vec::new();
        loop {
            let result = self.run()?;
            results.push(result);
            if result == GameResult::Quit || !self.ask_replay()? {
                break;
            }
        }

        if results.len() > 1 {
            let count = |r: GameResult| results.iter().filter(|&&x| x == r).count();
            writeln!(
                self.output,
                "Score: you {}, engine {}, ties {}",
                count(GameResult::HumanWon),
                count(GameResult::EngineWon),
                count(GameResult::Draw)
            )?;
            self.output.flush()?;
        }
        Ok(results)
    }

    /// Play one game to completion (or until the human quits).
    pub fn run(&mut self) -> Result<GameResult> {
        let mut state = TicTacToe::with_first_player(self.settings.starting_player.first_mark());
        self.tree = None;
        self.last_tree_view = None;

        writeln!(self.output, "You are {}, the engine is {}.", HUMAN, ENGINE)?;
        write!(self.output, "{}", render(&state))?;

        let result = loop {
            if let Some(result) = GameResult::from_outcome(state.outcome()) {
                break result;
            }

            let mv = if state.to_move() == HUMAN {
                match self.read_human_move(&state)? {
                    Some(mv) => mv,
                    None => break GameResult::Quit,
                }
            } else {
                let result = self.engine_move(&state)?;
                writeln!(self.output, "Engine plays {}", result.best_move)?;
                if self.settings.show_tree {
                    self.write_tree_view()?;
                }
                result.best_move
            };

            state = state
                .apply_move(mv)
                .with_context(|| format!("applying move {}", mv))?;
            self.advance_tree(mv);
            write!(self.output, "{}", render(&state))?;
        };

        info!(?result, moves = state.moves_played(), "Game finished");
        writeln!(self.output, "{}", result.message())?;
        self.output.flush()?;
        Ok(result)
    }

    /// Ask the engine for a move from `state`.
    pub fn engine_move(&mut self, state: &TicTacToe) -> Result<SearchResult<Move>> {
        let config = self.settings.mcts.clone();
        let mut search = match self.tree.take() {
            Some(tree) if self.settings.reuse_tree && tree.get(tree.root()).state == *state => {
                debug!(nodes = tree.len(), "Reusing search tree");
                MctsSearch::from_tree(tree, config)?
            }
            Some(_) => {
                debug!("Kept tree is rooted at another position, searching afresh");
                MctsSearch::new(*state, config)?
            }
            None => MctsSearch::new(*state, config)?,
        };

        let result = match search.run(&mut self.rng) {
            Ok(result) => result,
            Err(SearchError::NoMoveAvailable) => bail!("game already over"),
            Err(e) => return Err(e.into()),
        };

        info!(
            best_move = %result.best_move,
            iterations = result.iterations,
            visits = result.visits,
            win_rate = result.win_rate,
            "Engine move selected"
        );

        self.last_tree_view = Some(format!(
            "Search: {} iterations, {} root visits, {:.1} ms\n{}",
            result.iterations,
            result.root_visits,
            result.elapsed.as_secs_f64() * 1000.0,
            render_tree(search.tree(), result.best_move, self.settings.tree_depth)
        ));

        if self.settings.reuse_tree {
            self.tree = Some(search.into_tree());
        }
        Ok(result)
    }

    /// Re-root the kept tree after a move; drop it if the move was never explored.
    fn advance_tree(&mut self, mv: Move) {
        self.tree = self.tree.take().and_then(|tree| tree.advance(mv));
    }

    /// Prompt until the human enters a legal move. `None` means quit (or end of input).
    fn read_human_move(&mut self, state: &TicTacToe) -> Result<Option<Move>> {
        loop {
            write!(self.output, "Your move (row,col): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }

            match parse_move(&line) {
                Ok(HumanInput::Quit) => return Ok(None),
                Ok(HumanInput::ShowTree) => self.write_tree_view()?,
                Ok(HumanInput::Move(mv)) if state.is_legal(mv) => return Ok(Some(mv)),
                Ok(HumanInput::Move(mv)) => {
                    writeln!(self.output, "Cell {} is already taken", mv)?;
                }
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    fn write_tree_view(&mut self) -> Result<()> {
        match &self.last_tree_view {
            Some(view) => write!(self.output, "{}", view)?,
            None => writeln!(self.output, "The engine has not searched yet")?,
        }
        Ok(())
    }

    /// `true` to start another game; end of input counts as no.
    fn ask_replay(&mut self) -> Result<bool> {
        loop {
            write!(self.output, "Play again? [y/n]: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "r" => return Ok(true),
                "n" | "no" | "q" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n")?,
            }
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}
