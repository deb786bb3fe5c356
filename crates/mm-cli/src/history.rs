use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mm_core::GameMode;
use mm_core::TradeSide;
use mm_core::game::round::RoundRecord;
use mm_core::model::item::Item;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write round history at {path:?}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to encode round history: {0}")]
    Json(#[from] serde_json::Error),
}

/// One JSONL row per archived round.
#[derive(Debug, Serialize)]
struct RoundRow<'a> {
    game: usize,
    round: u32,
    mode: GameMode,
    hand: &'a [Item],
    revealed: &'a [usize],
    bid: f64,
    ask: f64,
    estimated_ev: f64,
    side: TradeSide,
    size: u32,
    true_total: Option<u32>,
    exec_price: Option<f64>,
    pnl: Option<f64>,
    guess: Option<f64>,
    correct: Option<bool>,
}

/// Appends finished games to a JSONL file, one row per round.
pub struct HistoryWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    games_written: usize,
}

impl HistoryWriter {
    pub fn create(path: &Path) -> Result<Self, HistoryError> {
        let io_err = |source| HistoryError::Io {
            source,
            path: path.to_path_buf(),
        };
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            games_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every record of one game and flushes; returns the row count.
    pub fn append_game(&mut self, records: &[RoundRecord]) -> Result<usize, HistoryError> {
        let game = self.games_written;
        for record in records {
            let result = record.result.as_ref();
            let row = RoundRow {
                game,
                round: record.round_number,
                mode: record.mode,
                hand: record.hand.items(),
                revealed: record.revealed.indices(),
                bid: record.quote.bid,
                ask: record.quote.ask,
                estimated_ev: record.quote.estimated_ev,
                side: record.trade.side,
                size: record.trade.size.get(),
                true_total: result.map(|r| r.true_total),
                exec_price: result.map(|r| r.exec_price),
                pnl: result.map(|r| r.actual_pnl),
                guess: result.and_then(|r| r.user_guess),
                correct: result.map(|r| r.is_correct),
            };
            serde_json::to_writer(&mut self.writer, &row)?;
            self.writer.write_all(b"\n").map_err(|source| self.io_error(source))?;
        }
        self.writer.flush().map_err(|source| self.io_error(source))?;
        self.games_written += 1;
        Ok(records.len())
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            source,
            path: self.path.clone(),
        }
    }
}
