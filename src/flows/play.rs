//! Command handlers
//!
//! Each handler runs one session: restore from `.geocoin/`, apply the
//! command, save, and print the outcome as a ResultSet.

use anyhow::Result;
use std::path::Path;

use crate::core::config::GameConfig;
use crate::core::luck::HashLuck;
use crate::core::model::{Issue, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::world::{CellKey, LatLng};
use crate::flows::game::Game;
use crate::session::storage::FileStorage;

/// Direction of a one-tile step
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Tile delta as (lat, lng)
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

/// Which way coins flow in a transfer command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Withdraw,
    Deposit,
}

fn open_session(root: &Path, config: GameConfig) -> (FileStorage, Game) {
    let storage = FileStorage::new(root);
    let game = Game::restore(config, Box::new(HashLuck), &storage);
    (storage, game)
}

fn print(result_set: &ResultSet, render_config: RenderConfig) {
    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(result_set));
}

/// Player plus every visible cache
fn view_items(game: &Game) -> ResultSet {
    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::player(game.player()));
    result_set.extend(
        game.visible_caches()
            .into_iter()
            .map(|(cache, bounds)| ResultItem::cache(cache, bounds)),
    );
    result_set
}

/// Show the player and the caches in view
pub fn run_look(root: &Path, config: GameConfig, render_config: RenderConfig) -> Result<()> {
    let (mut storage, mut game) = open_session(root, config);
    let result_set = view_items(&game);
    game.save(&mut storage)?;
    print(&result_set, render_config);
    Ok(())
}

/// Summarize the session
pub fn run_status(root: &Path, config: GameConfig, render_config: RenderConfig) -> Result<()> {
    let (mut storage, mut game) = open_session(root, config);

    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::player(game.player()));
    result_set.push(
        ResultItem::session("session status").with_data(serde_json::json!({
            "visible_caches": game.store().active_keys().len(),
            "dormant_caches": game.store().dormant_table().len(),
            "coins_in_world": game.coin_census(),
        })),
    );

    game.save(&mut storage)?;
    print(&result_set, render_config);
    Ok(())
}

/// Step `steps` tiles in `direction`
pub fn run_move(
    root: &Path,
    direction: Direction,
    steps: u32,
    config: GameConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let (mut storage, mut game) = open_session(root, config);

    let mut result_set = ResultSet::new();
    let (d_lat, d_lng) = direction.delta();
    for _ in 0..steps {
        if let Err(err) = game.move_by(d_lat, d_lng) {
            result_set.push(ResultItem::error(Issue::from(&err)));
            break;
        }
    }

    result_set.extend(view_items(&game).items);
    game.save(&mut storage)?;
    print(&result_set, render_config);
    Ok(())
}

/// Jump to an absolute position
pub fn run_goto(
    root: &Path,
    to: LatLng,
    config: GameConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let (mut storage, mut game) = open_session(root, config);

    let mut result_set = ResultSet::new();
    if let Err(err) = game.move_to(to) {
        result_set.push(ResultItem::error(Issue::from(&err)));
    }
    result_set.extend(view_items(&game).items);
    game.save(&mut storage)?;
    print(&result_set, render_config);
    Ok(())
}

/// Move up to `count` coins between the player and the cache at `key`
pub fn run_transfer(
    root: &Path,
    kind: TransferKind,
    key: &str,
    count: u32,
    config: GameConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let mut result_set = ResultSet::new();

    let key: CellKey = match key.parse() {
        Ok(key) => key,
        Err(err) => {
            result_set.push(ResultItem::error(Issue::from(&err)));
            print(&result_set, render_config);
            return Ok(());
        }
    };

    let (mut storage, mut game) = open_session(root, config);
    let label = match kind {
        TransferKind::Withdraw => "withdrew",
        TransferKind::Deposit => "deposited",
    };

    for _ in 0..count {
        let outcome = match kind {
            TransferKind::Withdraw => game.withdraw(key),
            TransferKind::Deposit => game.deposit(key),
        };
        match outcome {
            Ok(Some(coin)) => {
                result_set.push(ResultItem::transfer(label, &key.to_string(), Some(&coin)))
            }
            Ok(None) => {
                result_set.push(ResultItem::transfer(label, &key.to_string(), None));
                break;
            }
            Err(err) => {
                result_set.push(ResultItem::error(Issue::from(&err)));
                break;
            }
        }
    }

    if let Some((cache, bounds)) = game
        .visible_caches()
        .into_iter()
        .find(|(cache, _)| cache.key == key)
    {
        result_set.push(ResultItem::cache(cache, bounds));
    }
    result_set.push(ResultItem::player(game.player()));

    game.save(&mut storage)?;
    print(&result_set, render_config);
    Ok(())
}

/// Clear the saved session and start over at the origin
pub fn run_reset(root: &Path, config: GameConfig, render_config: RenderConfig) -> Result<()> {
    let (mut storage, mut game) = open_session(root, config);
    game.reset(&mut storage)?;

    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::session("session reset"));
    result_set.extend(view_items(&game).items);

    game.save(&mut storage)?;
    print(&result_set, render_config);
    Ok(())
}
