//! Negamax with alpha-beta / PVS, pruning, and quiescence search — the
//! recursive core driven by the iterative-deepening loop in `mod.rs`.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::eval::Evaluator;
use crate::movegen::{self, GenMode, StagedGenerator};
use crate::moves::Move;
use crate::position::Position;
use crate::tt::{BoundType, TranspositionTable};
use crate::types::{mate_in, mated_in, Value, MAX_PLY, VALUE_DRAW, VALUE_INF};

use super::time::TimeCheck;

const NODE_CHECK_INTERVAL: u64 = 1024;
const REVERSE_FUTILITY_MARGIN: i32 = 300;
const RAZOR_MARGIN: i32 = 600;
const NULL_MOVE_REDUCTION: i32 = 2;
const IID_REDUCTION: i32 = 4;
const ASPIRATION_DELTA: i32 = 30;
const QSEARCH_MAX_EXTRA_DEPTH: i32 = 20;

pub struct SearchWorker<'a> {
    pub position: Position,
    pub tt: &'a mut TranspositionTable,
    pub evaluator: &'a dyn Evaluator,
    pub stop: &'a AtomicBool,
    pub node_limit: Option<u64>,
    pub nodes: u64,
    pub sel_depth: u32,
    generators: Vec<StagedGenerator>,
    pv_table: Vec<Vec<Move>>,
    time_check: TimeCheck,
    aborted: bool,
}

pub struct SearchOutcome {
    pub value: Value,
    pub pv: Vec<Move>,
}

impl<'a> SearchWorker<'a> {
    pub fn new(
        position: Position,
        tt: &'a mut TranspositionTable,
        evaluator: &'a dyn Evaluator,
        stop: &'a AtomicBool,
        time_check: TimeCheck,
        node_limit: Option<u64>,
    ) -> Self {
        SearchWorker {
            position,
            tt,
            evaluator,
            stop,
            node_limit,
            nodes: 0,
            sel_depth: 0,
            generators: (0..MAX_PLY).map(|_| StagedGenerator::new()).collect(),
            pv_table: vec![Vec::new(); MAX_PLY],
            time_check,
            aborted: false,
        }
    }

    #[must_use]
    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.stop.load(Ordering::Acquire) {
            self.aborted = true;
            return true;
        }
        if self.nodes % NODE_CHECK_INTERVAL == 0 {
            if let Some(limit) = self.node_limit {
                if self.nodes >= limit {
                    self.aborted = true;
                    return true;
                }
            }
            if self.time_check.past_hard() {
                self.aborted = true;
                return true;
            }
        }
        false
    }

    #[must_use]
    pub fn time_check(&self) -> &TimeCheck {
        &self.time_check
    }

    pub fn time_check_mut(&mut self) -> &mut TimeCheck {
        &mut self.time_check
    }

    /// One iterative-deepening iteration with an aspiration window seeded
    /// from `previous_value`.
    pub fn aspiration_search(&mut self, depth: i32, previous_value: Option<Value>) -> Option<SearchOutcome> {
        let mut delta = ASPIRATION_DELTA;
        let (mut alpha, mut beta) = match previous_value {
            Some(v) if depth > 1 => (v - delta, v + delta),
            _ => (-VALUE_INF, VALUE_INF),
        };

        loop {
            let value = self.negamax(depth, 0, alpha, beta, true);
            if self.aborted {
                return None;
            }
            if value <= alpha {
                alpha = (alpha - delta).max(-VALUE_INF);
                delta *= 2;
            } else if value >= beta {
                beta = (beta + delta).min(VALUE_INF);
                delta *= 2;
            } else {
                return Some(SearchOutcome {
                    value,
                    pv: self.pv_table[0].clone(),
                });
            }
            if delta > VALUE_INF {
                alpha = -VALUE_INF;
                beta = VALUE_INF;
            }
        }
    }

    fn negamax(&mut self, depth: i32, ply: i32, mut alpha: Value, beta: Value, is_pv: bool) -> Value {
        self.pv_table[ply as usize].clear();
        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        self.sel_depth = self.sel_depth.max(ply as u32);

        if ply > 0 {
            if self.position.check_fifty_move_rule() || self.position.is_draw_by_repetition() {
                return VALUE_DRAW;
            }
            if self.position.is_insufficient_material() {
                return VALUE_DRAW;
            }
        }

        if ply > 0 {
            alpha = alpha.max(mated_in(ply));
            let beta_bound = mate_in(ply + 1);
            let beta = beta.min(beta_bound);
            if alpha >= beta {
                return alpha;
            }
        }

        let hash = self.position.hash();
        let probe = self.tt.probe(hash, depth as i16, alpha, beta, is_pv, ply);
        if probe.hit && ply > 0 {
            return probe.value;
        }
        let tt_move = probe.best_move;

        if depth <= 0 {
            return self.quiescence(ply, alpha, beta, 0);
        }

        let in_check = self.position.has_check();
        let static_eval = if in_check {
            -VALUE_INF
        } else {
            self.evaluator.evaluate(&self.position)
        };

        if !is_pv && !in_check && depth <= 3 {
            if static_eval - REVERSE_FUTILITY_MARGIN * depth >= beta {
                return static_eval;
            }
        }

        if !is_pv && !in_check && depth <= 2 && static_eval + RAZOR_MARGIN <= alpha {
            return self.quiescence(ply, alpha, beta, 0);
        }

        if !is_pv
            && !in_check
            && depth >= 3
            && ply > 0
            && self.side_has_non_pawn_material()
        {
            self.position.do_null_move();
            let reduced = depth - 1 - NULL_MOVE_REDUCTION;
            let value = -self.negamax(reduced.max(0), ply + 1, -beta, -beta + 1, false);
            self.position.undo_null_move();
            if !self.aborted && value >= beta {
                return beta;
            }
        }

        let mut tt_move = tt_move;
        if tt_move.is_none() && is_pv && depth >= 5 {
            self.negamax(depth - IID_REDUCTION, ply, alpha, beta, is_pv);
            let probe = self.tt.probe(hash, depth as i16, alpha, beta, is_pv, ply);
            tt_move = probe.best_move;
        }

        self.generators[ply as usize].set_pv(tt_move);

        let mut best_value = -VALUE_INF;
        let mut best_move = Move::NONE;
        let mut moves_searched = 0;
        let mut legal_moves = 0;

        loop {
            let mv = {
                let (position, generators) = (&self.position, &mut self.generators);
                generators[ply as usize].next(position, GenMode::All)
            };
            let Some(mv) = mv else { break };
            if !self.position.is_legal_move(mv) {
                continue;
            }
            legal_moves += 1;

            let gives_check = self.position.gives_check(mv);
            let is_quiet = !is_capture_or_promo(&self.position, mv);

            if !is_pv
                && !in_check
                && depth == 1
                && is_quiet
                && !gives_check
                && moves_searched > 0
                && static_eval + 150 <= alpha
            {
                continue;
            }

            let mut child_depth = depth - 1;
            if gives_check {
                child_depth += 1;
            }

            self.position.do_move(mv);

            let value = if moves_searched == 0 {
                -self.negamax(child_depth, ply + 1, -beta, -alpha, is_pv)
            } else {
                let reduction = if moves_searched >= 3
                    && depth >= 3
                    && is_quiet
                    && !in_check
                    && !gives_check
                {
                    lmr_reduction(moves_searched, depth)
                } else {
                    0
                };
                let mut v = -self.negamax(
                    (child_depth - reduction).max(0),
                    ply + 1,
                    -alpha - 1,
                    -alpha,
                    false,
                );
                if !self.aborted && v > alpha && (reduction > 0 || (v < beta && is_pv)) {
                    v = -self.negamax(child_depth, ply + 1, -beta, -alpha, is_pv);
                }
                v
            };

            self.position.undo_move();
            moves_searched += 1;

            if self.aborted {
                return 0;
            }

            if value > best_value {
                best_value = value;
                best_move = mv;
                if value > alpha {
                    alpha = value;
                    let (head, tail) = self.pv_table.split_at_mut(ply as usize + 1);
                    head[ply as usize].clear();
                    head[ply as usize].push(mv);
                    head[ply as usize].extend_from_slice(&tail[0]);
                }
            }

            if alpha >= beta {
                if is_quiet {
                    self.generators[ply as usize].store_killer(mv);
                }
                self.tt.put(
                    hash,
                    depth as i16,
                    mv,
                    beta,
                    BoundType::LowerBound,
                    false,
                    ply,
                    true,
                );
                return beta;
            }
        }

        if legal_moves == 0 {
            return if in_check { mated_in(ply) } else { VALUE_DRAW };
        }

        let bound = if best_value >= beta {
            BoundType::LowerBound
        } else if best_move.is_none() {
            BoundType::UpperBound
        } else {
            BoundType::Exact
        };
        self.tt.put(hash, depth as i16, best_move, best_value, bound, false, ply, false);
        best_value
    }

    fn quiescence(&mut self, ply: i32, mut alpha: Value, beta: Value, qdepth: i32) -> Value {
        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        self.sel_depth = self.sel_depth.max(ply as u32);

        let in_check = self.position.has_check();
        let stand_pat = if in_check {
            -VALUE_INF
        } else {
            self.evaluator.evaluate(&self.position)
        };

        if !in_check {
            if stand_pat >= beta {
                return beta;
            }
            alpha = alpha.max(stand_pat);
        }

        if qdepth >= QSEARCH_MAX_EXTRA_DEPTH {
            return alpha;
        }

        let mode = if in_check { GenMode::All } else { GenMode::CapturesOnly };
        let moves = movegen::generate_pseudo_legal(&self.position, mode);

        let mut best = stand_pat;
        let mut any_legal = false;
        for &mv in moves.iter() {
            if !in_check && !crate::see::is_good_capture(&self.position, mv) {
                continue;
            }
            if !self.position.is_legal_move(mv) {
                continue;
            }
            any_legal = true;
            self.position.do_move(mv);
            let value = -self.quiescence(ply + 1, -beta, -alpha, qdepth + 1);
            self.position.undo_move();

            if self.aborted {
                return 0;
            }
            if value > best {
                best = value;
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                return beta;
            }
        }

        if in_check && !any_legal && !movegen::has_legal_move(&mut self.position) {
            return mated_in(ply);
        }
        best
    }

    fn side_has_non_pawn_material(&self) -> bool {
        use crate::types::PieceType;
        let us = self.position.side_to_move();
        [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
        ]
        .iter()
        .any(|&pt| !self.position.pieces(us, pt).is_empty())
    }
}

fn is_capture_or_promo(pos: &Position, mv: Move) -> bool {
    mv.is_promotion() || mv.is_en_passant() || pos.piece_at(mv.to()) != crate::types::Piece::None
}

fn lmr_reduction(move_index: usize, depth: i32) -> i32 {
    let base = (move_index as f64).ln() * (depth as f64).ln() / 2.5;
    (base as i32).clamp(0, depth - 1)
}
