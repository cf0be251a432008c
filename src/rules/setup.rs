//! Building the opening position from a session.
//!
//! Free cells are filled in row-major order with floor tiles drawn from a
//! freshly filled bag, then one more tile is drawn as the held tile. Fixed
//! tiles and voids come straight from the level. The RNG is seeded from the
//! session, so equal sessions produce equal boards.

use tracing::{debug, info};

use crate::bag::{BagError, SilkBag};
use crate::board::{Board, Cell, Pos};
use crate::core::config::GameSession;
use crate::core::player::{Player, PlayerId};
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::level::LevelError;
use crate::tiles::{FloorTile, TileCategory};

/// Lay out the board, seat the players and fill the bag.
pub fn build_state(session: &GameSession) -> Result<GameState, LevelError> {
    let level = &session.level;
    let mut rng = GameRng::new(session.seed);
    let mut bag = SilkBag::from_counts(level.tile_counts());

    let needed = level.floor_tiles_needed();
    let available = bag.remaining_in(TileCategory::Floor);
    let short = |_: BagError| LevelError::NotEnoughFloorTiles { needed, available };

    let mut cells = Vec::with_capacity(level.cell_count().unwrap_or_default());
    for y in 0..level.height {
        for x in 0..level.width {
            let pos = Pos::new(x, y);
            let cell = if level.is_void(pos) {
                Cell::Void
            } else if let Some(fixed) = level.fixed_at(pos) {
                Cell::Floor(FloorTile::fixed(fixed.shape, fixed.orientation))
            } else {
                Cell::Floor(bag.draw_floor_tile(&mut rng).map_err(short)?)
            };
            cells.push(cell);
        }
    }
    let held = bag.draw_floor_tile(&mut rng).map_err(short)?;
    let mut board = Board::new(level.width, level.height, cells, held)
        .map_err(|err| LevelError::invalid(err.to_string()))?;

    let mut players = Vec::with_capacity(session.player_count());
    for (seat, (slot, profile)) in level.players.iter().zip(&session.profiles).enumerate() {
        let id = u8::try_from(seat)
            .map(PlayerId::new)
            .map_err(|_| LevelError::invalid(format!("seat {seat} has no player id")))?;
        board
            .place_player(id, slot.start)
            .map_err(|err| LevelError::invalid(err.to_string()))?;
        players.push(Player::new(id, slot.start, slot.objective, *profile));
    }

    debug!(
        floor_left = bag.remaining_in(TileCategory::Floor),
        action_left = bag.remaining_in(TileCategory::Action),
        "board laid out"
    );
    info!(level = %level.name, players = players.len(), seed = session.seed, "new game");

    Ok(GameState::new(
        level.name.clone(),
        session.rules.clone(),
        players,
        board,
        bag,
        rng,
    ))
}
