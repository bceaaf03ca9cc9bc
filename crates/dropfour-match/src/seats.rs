//! Seat assignment: which identity plays which side.

use dropfour_engine::Seat;
use dropfour_protocol::PlayerId;

use crate::MatchError;

/// The fixed mapping from authenticated identities to the two seats.
///
/// Assignment is first-come: the first identity to claim gets
/// [`Seat::One`], the second gets [`Seat::Two`], a third is refused. A
/// claim is idempotent — an identity that already holds a seat gets the
/// same seat back, which is what lets a disconnected player reconnect
/// without losing their side. Seats are never reassigned or swapped for
/// the lifetime of the match.
#[derive(Debug, Clone, Default)]
pub struct SeatMap {
    one: Option<PlayerId>,
    two: Option<PlayerId>,
}

impl SeatMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a seat for `player`, or returns the seat it already holds.
    ///
    /// # Errors
    ///
    /// [`MatchError::MatchFull`] when both seats belong to other
    /// identities.
    pub fn claim(&mut self, player: PlayerId) -> Result<Seat, MatchError> {
        if let Some(seat) = self.seat_of(player) {
            return Ok(seat);
        }
        if self.one.is_none() {
            self.one = Some(player);
            Ok(Seat::One)
        } else if self.two.is_none() {
            self.two = Some(player);
            Ok(Seat::Two)
        } else {
            Err(MatchError::MatchFull)
        }
    }

    /// The seat held by `player`, if any.
    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        if self.one == Some(player) {
            Some(Seat::One)
        } else if self.two == Some(player) {
            Some(Seat::Two)
        } else {
            None
        }
    }

    /// The identity holding `seat`, if it has been claimed.
    pub fn occupant(&self, seat: Seat) -> Option<PlayerId> {
        match seat {
            Seat::One => self.one,
            Seat::Two => self.two,
        }
    }

    /// Number of claimed seats (0, 1, or 2).
    pub fn seated(&self) -> usize {
        self.one.iter().count() + self.two.iter().count()
    }
}
