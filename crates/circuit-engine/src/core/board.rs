use serde::Serialize;

use crate::api::types::{ConnectionStatus, SocketId, WireId};
use crate::core::question::Question;
use crate::core::rng::Rng;
use crate::error::{ConfigError, QuizError, QuizResult, Transition};

/// The current pairing of one wire to (at most) one socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub wire_id: WireId,
    pub socket_id: Option<SocketId>,
}

/// What a connection attempt did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOutcome {
    /// The wire is now bound to the requested socket.
    pub connected: bool,
    /// The bound socket holds the wire's answer.
    pub correct: bool,
    /// Another wire that was unplugged to make room.
    pub evicted: Option<WireId>,
    pub points_awarded: u32,
    /// This attempt completed the round.
    pub completed: bool,
    /// This attempt used up the last life.
    pub failed: bool,
}

/// Owns the wire→socket mapping and judges it.
///
/// Connections are stored parallel to `questions`; slot `i` of `slots` is
/// socket `i + 1`. A wire is locked while it sits in its correct socket.
#[derive(Debug, Clone)]
pub struct ConnectionBoard {
    questions: Vec<Question>,
    slots: Vec<String>,
    connections: Vec<Connection>,
    score: u32,
    lives: u32,
    lives_total: u32,
    complete: bool,
    failed: bool,
}

impl ConnectionBoard {
    /// Start a round: every wire unplugged, answers dealt in a fresh random order.
    pub fn new(questions: Vec<Question>, lives_total: u32, rng: &mut Rng) -> Self {
        let mut slots: Vec<String> = questions.iter().map(|q| q.answer.clone()).collect();
        rng.shuffle(&mut slots);
        log::debug!("dealt {} answer slots", slots.len());
        Self::with_slots(questions, slots, lives_total)
    }

    /// Start a round with a caller-chosen socket order.
    pub fn arranged(
        questions: Vec<Question>,
        slots: Vec<String>,
        lives_total: u32,
    ) -> Result<Self, ConfigError> {
        let mut expected: Vec<&str> = questions.iter().map(|q| q.answer.as_str()).collect();
        let mut given: Vec<&str> = slots.iter().map(String::as_str).collect();
        expected.sort_unstable();
        given.sort_unstable();
        if expected != given {
            return Err(ConfigError::NotAPermutation);
        }
        Ok(Self::with_slots(questions, slots, lives_total))
    }

    fn with_slots(questions: Vec<Question>, slots: Vec<String>, lives_total: u32) -> Self {
        let connections = questions
            .iter()
            .map(|q| Connection { wire_id: q.id, socket_id: None })
            .collect();
        Self {
            questions,
            slots,
            connections,
            score: 0,
            lives: lives_total,
            lives_total,
            complete: false,
            failed: false,
        }
    }

    fn wire_index(&self, wire: WireId) -> QuizResult<usize> {
        self.questions
            .iter()
            .position(|q| q.id == wire)
            .ok_or(QuizError::InvalidReference(wire))
    }

    fn check_slot(&self, socket: SocketId) -> QuizResult<usize> {
        match socket.index() {
            Some(i) if i < self.slots.len() => Ok(i),
            _ => Err(QuizError::InvalidSlot { socket, slots: self.slots.len() }),
        }
    }

    fn is_correct_index(&self, idx: usize) -> bool {
        self.connections[idx]
            .socket_id
            .and_then(|s| self.answer_at(s))
            .is_some_and(|answer| answer == self.questions[idx].answer)
    }

    fn holder_index(&self, socket: SocketId) -> Option<usize> {
        self.connections.iter().position(|c| c.socket_id == Some(socket))
    }

    /// Plug `wire` into `socket`. `None` is a drop onto nothing and changes nothing.
    ///
    /// Whoever held the socket before is unplugged first, so a socket never
    /// holds two plugs.
    pub fn attempt_connect(
        &mut self,
        wire: WireId,
        socket: Option<SocketId>,
    ) -> QuizResult<ConnectOutcome> {
        let idx = self.wire_index(wire)?;
        if let Some(s) = socket {
            self.check_slot(s)?;
        }
        if self.failed || self.complete {
            return Err(QuizError::RoundOver);
        }
        let Some(socket) = socket else {
            return Ok(ConnectOutcome::default());
        };
        if self.is_correct_index(idx) {
            return Err(Transition::WireLocked(wire).into());
        }

        let evicted = self.holder_index(socket).filter(|&i| i != idx).map(|i| {
            self.connections[i].socket_id = None;
            self.connections[i].wire_id
        });
        self.connections[idx].socket_id = Some(socket);

        let correct = self.is_correct_index(idx);
        let mut outcome = ConnectOutcome {
            connected: true,
            correct,
            evicted,
            ..ConnectOutcome::default()
        };

        if correct {
            let points = self.questions[idx].points;
            self.score = self.score.saturating_add(points);
            outcome.points_awarded = points;
        } else {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.failed = true;
                outcome.failed = true;
                log::info!("no lives left, round failed");
            }
        }

        if !self.complete && self.is_round_complete() {
            self.complete = true;
            outcome.completed = true;
            log::info!("every wire connected correctly, score {}", self.score);
        }

        log::debug!(
            "{} -> {}: {}",
            wire,
            socket,
            if correct { "correct" } else { "incorrect" }
        );
        Ok(outcome)
    }

    /// Unplug a wire. Returns whether anything changed; locked or unplugged
    /// wires are left alone.
    pub fn disconnect(&mut self, wire: WireId) -> QuizResult<bool> {
        let idx = self.wire_index(wire)?;
        if self.failed || self.complete {
            return Err(QuizError::RoundOver);
        }
        if self.is_correct_index(idx) {
            return Ok(false);
        }
        Ok(self.connections[idx].socket_id.take().is_some())
    }

    /// Number of wires sitting in their correct socket.
    pub fn correct_count(&self) -> usize {
        (0..self.connections.len())
            .filter(|&i| self.is_correct_index(i))
            .count()
    }

    /// Every wire plugged in, and every one correct.
    pub fn is_round_complete(&self) -> bool {
        !self.connections.is_empty()
            && self.connections.iter().all(|c| c.socket_id.is_some())
            && self.correct_count() == self.connections.len()
    }

    /// Latched once the round completes.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn is_locked(&self, wire: WireId) -> bool {
        self.wire_index(wire)
            .map(|i| self.is_correct_index(i))
            .unwrap_or(false)
    }

    /// A socket is locked while it holds a correct plug.
    pub fn is_socket_locked(&self, socket: SocketId) -> bool {
        self.holder_index(socket)
            .is_some_and(|i| self.is_correct_index(i))
    }

    pub fn status(&self, wire: WireId) -> Option<ConnectionStatus> {
        let idx = self.wire_index(wire).ok()?;
        Some(match self.connections[idx].socket_id {
            None => ConnectionStatus::Disconnected,
            Some(_) if self.is_correct_index(idx) => ConnectionStatus::Correct,
            Some(_) => ConnectionStatus::Incorrect,
        })
    }

    pub fn socket_of(&self, wire: WireId) -> Option<SocketId> {
        let idx = self.wire_index(wire).ok()?;
        self.connections[idx].socket_id
    }

    pub fn holder_of(&self, socket: SocketId) -> Option<WireId> {
        self.holder_index(socket).map(|i| self.connections[i].wire_id)
    }

    pub fn answer_at(&self, socket: SocketId) -> Option<&str> {
        socket
            .index()
            .and_then(|i| self.slots.get(i))
            .map(String::as_str)
    }

    pub fn question(&self, wire: WireId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == wire)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn lives_total(&self) -> u32 {
        self.lives_total
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Fraction of wires correctly connected, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        if self.connections.is_empty() {
            return 0.0;
        }
        self.correct_count() as f32 / self.connections.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::new(1, "a?", "A").with_points(100),
            Question::new(2, "b?", "B").with_points(50),
            Question::new(3, "c?", "C").with_points(25),
            Question::new(4, "d?", "D").with_points(10),
        ]
    }

    /// Answers [A,B,C,D] dealt as [C,A,D,B].
    fn scenario_board() -> ConnectionBoard {
        let slots = ["C", "A", "D", "B"].iter().map(|s| s.to_string()).collect();
        ConnectionBoard::arranged(questions(), slots, 3).unwrap()
    }

    fn assert_unique(board: &ConnectionBoard) {
        let mut seen = std::collections::HashSet::new();
        for c in board.connections() {
            if let Some(s) = c.socket_id {
                assert!(seen.insert(s), "{} held twice", s);
            }
        }
    }

    #[test]
    fn new_board_is_unplugged_and_shuffled() {
        let mut rng = Rng::new(5);
        let board = ConnectionBoard::new(questions(), 3, &mut rng);
        assert!(board.connections().iter().all(|c| c.socket_id.is_none()));
        assert_eq!(board.score(), 0);
        assert_eq!(board.lives(), 3);

        let mut dealt = board.slots().to_vec();
        dealt.sort();
        assert_eq!(dealt, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn arranged_rejects_foreign_answers() {
        let slots = ["C", "A", "D", "X"].iter().map(|s| s.to_string()).collect();
        let err = ConnectionBoard::arranged(questions(), slots, 3).unwrap_err();
        assert!(matches!(err, ConfigError::NotAPermutation));
    }

    #[test]
    fn scenario_correct_then_evicted_by_wrong_wire() {
        let mut board = scenario_board();

        let first = board.attempt_connect(WireId(1), Some(SocketId(2))).unwrap();
        assert!(first.connected && first.correct);
        assert_eq!(board.score(), 100);

        let second = board.attempt_connect(WireId(2), Some(SocketId(2))).unwrap();
        assert_eq!(second.evicted, Some(WireId(1)));
        assert!(!second.correct);
        assert_eq!(board.socket_of(WireId(1)), None);
        assert_eq!(board.socket_of(WireId(2)), Some(SocketId(2)));
        assert_eq!(board.lives(), 2);
        assert_eq!(board.score(), 100);
    }

    #[test]
    fn correctness_matches_slot_contents_for_every_pair() {
        for w in 1..=4u32 {
            for s in 1..=4u32 {
                let mut board = scenario_board();
                let outcome = board.attempt_connect(WireId(w), Some(SocketId(s))).unwrap();
                let expected = board.question(WireId(w)).unwrap().answer
                    == board.slots()[s as usize - 1];
                assert_eq!(outcome.correct, expected, "wire {} socket {}", w, s);
            }
        }
    }

    #[test]
    fn drop_onto_nothing_keeps_existing_binding() {
        let mut board = scenario_board();
        board.attempt_connect(WireId(2), Some(SocketId(1))).unwrap();
        let outcome = board.attempt_connect(WireId(2), None).unwrap();
        assert!(!outcome.connected);
        assert_eq!(board.socket_of(WireId(2)), Some(SocketId(1)));
        assert_eq!(board.lives(), 2);
    }

    #[test]
    fn invalid_references_change_nothing() {
        let mut board = scenario_board();
        assert_eq!(
            board.attempt_connect(WireId(9), Some(SocketId(1))),
            Err(QuizError::InvalidReference(WireId(9)))
        );
        assert_eq!(
            board.attempt_connect(WireId(1), Some(SocketId(5))),
            Err(QuizError::InvalidSlot { socket: SocketId(5), slots: 4 })
        );
        assert!(matches!(
            board.attempt_connect(WireId(1), Some(SocketId(0))),
            Err(QuizError::InvalidSlot { .. })
        ));
        assert_eq!(board.disconnect(WireId(9)), Err(QuizError::InvalidReference(WireId(9))));
        assert_eq!(board.lives(), 3);
        assert!(board.connections().iter().all(|c| c.socket_id.is_none()));
    }

    #[test]
    fn locked_wire_cannot_move_or_disconnect() {
        let mut board = scenario_board();
        board.attempt_connect(WireId(1), Some(SocketId(2))).unwrap();
        assert!(board.is_locked(WireId(1)));
        assert!(board.is_socket_locked(SocketId(2)));
        assert_eq!(
            board.attempt_connect(WireId(1), Some(SocketId(3))),
            Err(QuizError::IllegalTransition(Transition::WireLocked(WireId(1))))
        );
        assert_eq!(board.disconnect(WireId(1)), Ok(false));
        assert_eq!(board.socket_of(WireId(1)), Some(SocketId(2)));
    }

    #[test]
    fn incorrect_wire_can_be_disconnected() {
        let mut board = scenario_board();
        board.attempt_connect(WireId(3), Some(SocketId(4))).unwrap();
        assert_eq!(board.status(WireId(3)), Some(ConnectionStatus::Incorrect));
        assert_eq!(board.disconnect(WireId(3)), Ok(true));
        assert_eq!(board.status(WireId(3)), Some(ConnectionStatus::Disconnected));
        assert_eq!(board.disconnect(WireId(3)), Ok(false));
    }

    #[test]
    fn moving_a_wire_frees_its_old_socket() {
        let mut board = scenario_board();
        board.attempt_connect(WireId(4), Some(SocketId(1))).unwrap();
        board.attempt_connect(WireId(4), Some(SocketId(3))).unwrap();
        assert_eq!(board.holder_of(SocketId(1)), None);
        assert_eq!(board.holder_of(SocketId(3)), Some(WireId(4)));
    }

    #[test]
    fn completes_exactly_once_on_last_correct_wire() {
        let mut board = scenario_board();
        let plan = [(1, 2), (2, 4), (3, 1)];
        for (w, s) in plan {
            let o = board.attempt_connect(WireId(w), Some(SocketId(s))).unwrap();
            assert!(o.correct && !o.completed);
        }
        assert!(!board.is_round_complete());
        let last = board.attempt_connect(WireId(4), Some(SocketId(3))).unwrap();
        assert!(last.completed);
        assert!(board.is_complete());
        assert_eq!(board.score(), 185);
        assert_eq!(board.progress(), 1.0);
        assert_eq!(
            board.attempt_connect(WireId(4), Some(SocketId(3))),
            Err(QuizError::RoundOver)
        );
    }

    #[test]
    fn all_plugged_with_one_wrong_is_not_complete() {
        let mut board = scenario_board();
        board.attempt_connect(WireId(1), Some(SocketId(2))).unwrap();
        board.attempt_connect(WireId(2), Some(SocketId(4))).unwrap();
        board.attempt_connect(WireId(3), Some(SocketId(3))).unwrap();
        board.attempt_connect(WireId(4), Some(SocketId(1))).unwrap();
        assert!(board.connections().iter().all(|c| c.socket_id.is_some()));
        assert!(!board.is_round_complete());
        assert_eq!(board.correct_count(), 2);
    }

    #[test]
    fn three_wrong_connections_fail_the_round() {
        let mut board = scenario_board();
        for (w, s) in [(1, 1), (2, 2), (3, 3)] {
            let o = board.attempt_connect(WireId(w), Some(SocketId(s))).unwrap();
            assert!(!o.correct);
        }
        assert_eq!(board.lives(), 0);
        assert!(board.is_failed());
        assert_eq!(
            board.attempt_connect(WireId(4), Some(SocketId(3))),
            Err(QuizError::RoundOver)
        );
        assert_eq!(board.disconnect(WireId(1)), Err(QuizError::RoundOver));
        assert_eq!(board.lives(), 0);
    }

    #[test]
    fn random_play_keeps_invariants() {
        let mut rng = Rng::new(1234);
        for round in 0..50 {
            let mut board = ConnectionBoard::new(questions(), 1000, &mut rng);
            let mut last_score = 0;
            for _ in 0..40 {
                let wire = WireId(rng.below(5) as u32 + 1);
                let socket = match rng.below(6) {
                    0 => None,
                    n => Some(SocketId(n as u32)),
                };
                let before = board.lives();
                match board.attempt_connect(wire, socket) {
                    Ok(o) if o.connected && !o.correct => assert_eq!(board.lives(), before - 1),
                    Ok(_) | Err(_) => assert_eq!(board.lives(), before),
                }
                if rng.below(4) == 0 {
                    let _ = board.disconnect(WireId(rng.below(4) as u32 + 1));
                }
                assert_unique(&board);
                assert!(board.score() >= last_score, "round {}", round);
                last_score = board.score();
                assert_eq!(board.is_round_complete(), board.correct_count() == 4);
            }
        }
    }
}
