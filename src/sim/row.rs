//! Row entity store
//!
//! A fixed row of slots; index 0 is the entry end, the last index the exit.
//! A shift is two-step: [`RowField::begin_shift`] stages the incoming token
//! while the slide plays, [`RowField::commit_shift`] applies it. Until the
//! commit lands, hits resolve against the pre-shift slots.

use serde::{Deserialize, Serialize};

use super::token::Token;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowField {
    slots: Vec<Option<Token>>,
    shift_timer: u32,
    pending: Option<Token>,
}

impl RowField {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len.max(1)],
            shift_timer: 0,
            pending: None,
        }
    }

    pub fn slots(&self) -> &[Option<Token>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn exit_index(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn is_exit_occupied(&self) -> bool {
        self.slots[self.exit_index()].is_some()
    }

    /// Token staged by a shift that has not committed yet
    pub fn pending(&self) -> Option<&Token> {
        self.pending.as_ref()
    }

    /// Place a token directly into the entry slot (round opening)
    pub fn place_entry(&mut self, mut token: Token) {
        token.position = 0.0;
        self.slots[0] = Some(token);
    }

    /// Count one tick toward the next shift; true when a shift is due
    pub fn tick_shift_timer(&mut self, interval: u32) -> bool {
        self.shift_timer += 1;
        if self.shift_timer >= interval {
            self.shift_timer = 0;
            return true;
        }
        false
    }

    /// Stage `incoming` for the entry slot. A shift still pending is
    /// committed first so two shifts never overlap.
    pub fn begin_shift(&mut self, incoming: Token) {
        if self.pending.is_some() {
            self.commit_shift();
        }
        self.pending = Some(incoming);
    }

    /// Apply the staged shift: every slot moves one step toward the exit and
    /// the staged token takes the entry slot. Returns false if nothing was staged.
    pub fn commit_shift(&mut self) -> bool {
        let Some(incoming) = self.pending.take() else {
            return false;
        };
        self.slots.rotate_right(1);
        self.slots[0] = Some(incoming);
        self.sync_positions();
        true
    }

    /// Clear the first slot (from the entry end) holding `digit` and close
    /// the gap by moving everything before it one step toward the exit.
    /// Returns the slot index and the removed token.
    pub fn take_first(&mut self, digit: u8) -> Option<(usize, Token)> {
        let index = self
            .slots
            .iter()
            .position(|s| s.is_some_and(|t| t.value == digit))?;
        let token = self.slots[index].take()?;
        self.slots[..=index].rotate_right(1);
        self.sync_positions();
        Some((index, token))
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.pending = None;
        self.shift_timer = 0;
    }

    /// Digits per slot, `None` for empty
    pub fn values(&self) -> Vec<Option<u8>> {
        self.slots.iter().map(|s| s.map(|t| t.value)).collect()
    }

    fn sync_positions(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(token) = slot {
                token.position = i as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::token::TokenId;

    fn tok(id: u32, value: u8) -> Token {
        Token::new(TokenId(id), value, 0.0, 0.0, 0.0)
    }

    fn row_of(values: &[Option<u8>]) -> RowField {
        let mut row = RowField::new(values.len());
        for (i, v) in values.iter().enumerate() {
            if let Some(v) = v {
                let mut t = tok(i as u32, *v);
                t.position = i as f32;
                row.slots[i] = Some(t);
            }
        }
        row
    }

    #[test]
    fn test_shift_moves_toward_exit() {
        let mut row = row_of(&[Some(4), None, Some(2), None]);
        row.begin_shift(tok(10, 8));
        // Nothing moves until the commit
        assert_eq!(row.values(), vec![Some(4), None, Some(2), None]);
        assert!(row.commit_shift());
        assert_eq!(row.values(), vec![Some(8), Some(4), None, Some(2)]);
        assert_eq!(row.slots()[3].unwrap().position, 3.0);
        assert!(!row.commit_shift());
    }

    #[test]
    fn test_overlapping_shift_commits_previous() {
        let mut row = RowField::new(3);
        row.begin_shift(tok(1, 1));
        row.begin_shift(tok(2, 2));
        assert_eq!(row.values(), vec![Some(1), None, None]);
        row.commit_shift();
        assert_eq!(row.values(), vec![Some(2), Some(1), None]);
    }

    #[test]
    fn test_take_first_from_entry_end() {
        let mut row = row_of(&[Some(1), Some(5), Some(3), Some(5), None]);
        let (index, token) = row.take_first(5).unwrap();
        assert_eq!(index, 1);
        assert_eq!(token.id, TokenId(1));
        // Slot 0 moved into the gap
        assert_eq!(row.values(), vec![None, Some(1), Some(3), Some(5), None]);
        assert_eq!(row.slots()[1].unwrap().position, 1.0);
    }

    #[test]
    fn test_take_first_leaves_exit_side_alone() {
        let mut row = row_of(&[Some(2), Some(6), Some(9)]);
        row.take_first(9).unwrap();
        assert_eq!(row.values(), vec![None, Some(2), Some(6)]);
    }

    #[test]
    fn test_take_first_no_match() {
        let mut row = row_of(&[Some(2), None]);
        assert!(row.take_first(7).is_none());
        assert_eq!(row.values(), vec![Some(2), None]);
    }

    #[test]
    fn test_hit_during_pending_shift_uses_current_slots() {
        let mut row = row_of(&[Some(3), Some(4), None]);
        row.begin_shift(tok(9, 7));
        let (index, _) = row.take_first(4).unwrap();
        assert_eq!(index, 1);
        row.commit_shift();
        assert_eq!(row.values(), vec![Some(7), None, Some(3)]);
    }

    #[test]
    fn test_exit_occupied() {
        assert!(row_of(&[None, Some(1)]).is_exit_occupied());
        assert!(!row_of(&[Some(1), None]).is_exit_occupied());
    }
}
