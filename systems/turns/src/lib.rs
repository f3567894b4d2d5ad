#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round and turn sequencing for living mobs.

use hexmage_core::MobId;
use hexmage_world::MobManager;
use log::debug;

/// Where the turn manager is within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// No round started yet, or nobody was alive to queue.
    AwaitingRound,
    /// A mob is acting.
    InProgress,
    /// Every queued mob acted; a new round must be started explicitly.
    Done,
}

/// Orders living mobs into a turn queue each round and tracks whose turn it
/// is.
#[derive(Clone, Debug, Default)]
pub struct TurnManager {
    turn_order: Vec<MobId>,
    current: usize,
    round: u32,
}

impl TurnManager {
    /// Creates a turn manager with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new round.
    ///
    /// Refills every living mob's action points, queues the living mobs in
    /// ascending action point order and rewinds the cursor. Mobs with equal
    /// action points keep their identifier order.
    pub fn start_next_turn(&mut self, mob_manager: &mut MobManager) {
        mob_manager.refill_action_points();

        let mut living: Vec<(i32, MobId)> = mob_manager
            .mobs()
            .iter()
            .filter(|mob| mob.is_alive())
            .map(|mob| (mob.ap(), mob.id()))
            .collect();
        living.sort_by_key(|(ap, _)| *ap);

        self.turn_order.clear();
        self.turn_order.extend(living.into_iter().map(|(_, id)| id));
        self.current = 0;
        self.round = self.round.saturating_add(1);

        debug!(
            "round {} starts with {} mobs",
            self.round,
            self.turn_order.len()
        );
    }

    /// Mob whose turn it is.
    ///
    /// # Panics
    ///
    /// Panics when the queue is empty or exhausted.
    #[must_use]
    pub fn current_mob(&self) -> MobId {
        assert!(
            self.current < self.turn_order.len(),
            "no current mob: cursor {} with {} queued",
            self.current,
            self.turn_order.len()
        );
        self.turn_order[self.current]
    }

    /// Mob whose turn it is, or `None` when nobody is queued to act.
    #[must_use]
    pub fn try_current_mob(&self) -> Option<MobId> {
        self.turn_order.get(self.current).copied()
    }

    /// Advances the cursor unless the round is already done and reports
    /// whether it is done now.
    pub fn move_next(&mut self) -> bool {
        if !self.is_turn_done() {
            self.current += 1;
        }
        self.is_turn_done()
    }

    /// Reports whether every queued mob has acted.
    #[must_use]
    pub fn is_turn_done(&self) -> bool {
        self.current >= self.turn_order.len()
    }

    /// Current phase of the round. An empty queue counts as awaiting a round.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        if self.turn_order.is_empty() {
            TurnPhase::AwaitingRound
        } else if self.is_turn_done() {
            TurnPhase::Done
        } else {
            TurnPhase::InProgress
        }
    }

    /// Acting order of the current round.
    #[must_use]
    pub fn turn_order(&self) -> &[MobId] {
        &self.turn_order
    }

    /// Index of the acting mob within [`TurnManager::turn_order`].
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.current
    }

    /// Number of rounds started so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmage_world::MobSpec;

    fn mobs_with_ap(max_aps: &[i32]) -> (MobManager, Vec<MobId>) {
        let mut mobs = MobManager::new();
        let team = mobs.add_team();
        let ids = max_aps
            .iter()
            .map(|max_ap| {
                mobs.add_mob(MobSpec::new(10, *max_ap, team))
                    .expect("team exists")
            })
            .collect();
        (mobs, ids)
    }

    #[test]
    fn fresh_manager_is_done_and_awaiting() {
        let turns = TurnManager::new();
        assert!(turns.is_turn_done());
        assert_eq!(turns.phase(), TurnPhase::AwaitingRound);
        assert_eq!(turns.try_current_mob(), None);
    }

    #[test]
    #[should_panic(expected = "no current mob")]
    fn current_mob_on_empty_queue_panics() {
        let turns = TurnManager::new();
        let _ = turns.current_mob();
    }

    #[test]
    fn queue_is_sorted_by_action_points() {
        let (mut mobs, ids) = mobs_with_ap(&[4, 2, 3, 2]);
        let mut turns = TurnManager::new();

        turns.start_next_turn(&mut mobs);

        assert_eq!(turns.turn_order(), &[ids[1], ids[3], ids[2], ids[0]]);
        assert_eq!(turns.current_mob(), ids[1]);
        assert_eq!(turns.round(), 1);
    }

    #[test]
    fn move_next_walks_to_the_end_and_stays_there() {
        let (mut mobs, ids) = mobs_with_ap(&[1, 2]);
        let mut turns = TurnManager::new();
        turns.start_next_turn(&mut mobs);
        assert_eq!(turns.phase(), TurnPhase::InProgress);

        assert!(!turns.move_next());
        assert_eq!(turns.current_mob(), ids[1]);
        assert_eq!(turns.phase(), TurnPhase::InProgress);

        assert!(turns.move_next());
        assert_eq!(turns.phase(), TurnPhase::Done);
        assert!(turns.move_next());
        assert_eq!(turns.cursor(), 2);
    }

    #[test]
    fn restarting_rewinds_the_cursor() {
        let (mut mobs, ids) = mobs_with_ap(&[1]);
        let mut turns = TurnManager::new();
        turns.start_next_turn(&mut mobs);
        assert!(turns.move_next());

        turns.start_next_turn(&mut mobs);

        assert_eq!(turns.cursor(), 0);
        assert_eq!(turns.current_mob(), ids[0]);
        assert_eq!(turns.round(), 2);
    }
}
