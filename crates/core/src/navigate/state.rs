use crate::{
    config::NavigationConfig,
    grid::{Grid, HexIndex},
    navigate::{locate_hexagon, orbit_step, select_target_corner},
    util::unit::{CornerId, Point2},
};
use anyhow::Context;
use derive_more::Display;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use validator::Validate;

/// Once the navigator is within this many hex radii of the destination, it
/// has arrived
pub const ARRIVAL_RADIUS_FACTOR: f64 = 0.5;

/// Once the navigator is within this distance of the corner it's routing
/// around, that corner is done with
pub const CORNER_REACHED_DISTANCE: f64 = 1.0;

/// Mutable state of a single navigation run. Created at the start of the run
/// and advanced one tick at a time by [Navigator::step].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    position: Point2,
    destination: Point2,
    /// Hexagon that `position` was on as of the last tick. Only `None` for an
    /// empty grid.
    current_hex: Option<HexIndex>,
    /// Corners still to route around before heading for the destination. In
    /// practice this never holds more than one corner, because it gets
    /// replaced wholesale every time we enter a new hexagon.
    corners_to_raise: VecDeque<CornerId>,
    /// Number of ticks that have been stepped so far
    ticks: u32,
}

impl NavigationState {
    /// Initialize a new navigation run. This locates the starting hexagon and
    /// picks the first corner to route around, if there is one.
    pub fn new(start: Point2, destination: Point2, grid: &Grid) -> Self {
        let current_hex = locate_hexagon(start, grid);
        let corners_to_raise: VecDeque<CornerId> = current_hex
            .and_then(|_| select_target_corner(start, destination, grid))
            .into_iter()
            .collect();
        debug!(
            "Starting at {} on hexagon {:?}, initial corners to raise: {:?}",
            start, current_hex, corners_to_raise
        );

        Self {
            position: start,
            destination,
            current_hex,
            corners_to_raise,
            ticks: 0,
        }
    }

    pub fn position(&self) -> Point2 {
        self.position
    }

    pub fn destination(&self) -> Point2 {
        self.destination
    }

    pub fn current_hex(&self) -> Option<HexIndex> {
        self.current_hex
    }

    /// The corners still to be routed around, in order
    pub fn corners_to_raise(&self) -> impl Iterator<Item = CornerId> + '_ {
        self.corners_to_raise.iter().copied()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Straight-line distance left to the destination
    pub fn distance_remaining(&self) -> f64 {
        self.position.distance_to(self.destination)
    }
}

/// Something notable that happened during a single tick. If more than one
/// thing happened in the same tick, the most significant one is reported:
/// [Self::Arrived] beats [Self::EnteredHex], which beats
/// [Self::CornerReached]. [Trace] doesn't rely on these events, so it still
/// records every hexagon entry.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    /// The position moved, nothing else changed
    Moved,
    /// The position got close enough to the corner being routed around, so
    /// that corner was dropped from the queue
    CornerReached(CornerId),
    /// The position crossed into a new hexagon, and a new corner was picked
    /// (or not, if there were no candidates)
    EnteredHex {
        hex: HexIndex,
        corner: Option<CornerId>,
    },
    /// The position is within range of the destination. Once this happens,
    /// stepping has no more effect.
    Arrived,
}

/// How a navigation run ended
#[derive(
    Copy, Clone, Debug, Display, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Outcome {
    /// Made it to the destination
    #[display(fmt = "arrived after {} ticks", ticks)]
    Arrived { ticks: u32 },
    /// The caller told us to stop before we got there
    #[display(fmt = "stopped after {} ticks", ticks)]
    Stopped { ticks: u32 },
    /// Hit the tick limit before reaching the destination. This is what
    /// happens when the stepping heuristic gets stuck orbiting.
    #[display(fmt = "gave up after {} ticks", ticks)]
    TickLimit { ticks: u32 },
}

/// A record of a complete navigation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub start: Point2,
    pub destination: Point2,
    /// Position after every tick, **including** the starting position. So
    /// there is always one more position than ticks.
    pub positions: Vec<Point2>,
    /// Every hexagon the run passed through, in order, starting with the
    /// starting hexagon. Re-entering a hexagon adds it again.
    pub hexes: Vec<HexIndex>,
    /// Every corner that was picked to route around, in order
    pub raised_corners: Vec<CornerId>,
    pub outcome: Outcome,
}

impl Trace {
    fn new(state: &NavigationState) -> Self {
        Self {
            start: state.position,
            destination: state.destination,
            positions: vec![state.position],
            hexes: state.current_hex.into_iter().collect(),
            raised_corners: state.corners_to_raise.iter().copied().collect(),
            // This gets overwritten when the run finishes
            outcome: Outcome::Stopped { ticks: state.ticks },
        }
    }

    /// Record the state after a tick. Hexagon entries are detected from the
    /// state itself rather than the tick's [StepEvent], since an arrival in
    /// the same tick would hide the entry.
    fn record(&mut self, state: &NavigationState) {
        self.positions.push(state.position);
        if let Some(hex) = state.current_hex {
            if self.hexes.last() != Some(&hex) {
                self.hexes.push(hex);
                // Entering a hexagon replaces the queue with the new selection
                self.raised_corners.extend(state.corners_to_raise.front());
            }
        }
    }

    /// Number of ticks the run took
    pub fn ticks(&self) -> usize {
        self.positions.len() - 1
    }

    /// Closest the run ever got to its destination
    pub fn closest_approach(&self) -> f64 {
        self.positions
            .iter()
            .map(|position| position.distance_to(self.destination))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Steps navigation runs across a particular grid. The navigator itself
/// holds no run state, that all lives in [NavigationState], so one navigator
/// can drive any number of runs.
#[derive(Clone, Debug)]
pub struct Navigator<'a> {
    grid: &'a Grid,
    config: NavigationConfig,
}

impl<'a> Navigator<'a> {
    /// Create a navigator for a grid. Returns an error if the navigation
    /// config is invalid.
    pub fn new(grid: &'a Grid, config: NavigationConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid navigation config")?;
        Ok(Self { grid, config })
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Initialize state for a run from the configured start to the configured
    /// destination
    pub fn start(&self) -> NavigationState {
        NavigationState::new(
            self.config.start,
            self.config.destination,
            self.grid,
        )
    }

    /// Distance from the destination at which a run counts as arrived
    pub fn arrival_distance(&self) -> f64 {
        self.grid.hex_radius() * ARRIVAL_RADIUS_FACTOR
    }

    pub fn has_arrived(&self, state: &NavigationState) -> bool {
        state.distance_remaining() < self.arrival_distance()
    }

    /// Advance a run by one tick. If there's a corner queued up, we move
    /// perpendicular to the line from the current hexagon's center to that
    /// corner. Otherwise we do the same, but relative to the destination.
    /// Then if the move took us into a new hexagon, we throw out the queue
    /// and pick a new corner from there.
    ///
    /// Once the state has arrived, this does nothing.
    pub fn step(&self, state: &mut NavigationState) -> StepEvent {
        if self.has_arrived(state) {
            return StepEvent::Arrived;
        }

        let mut event = StepEvent::Moved;
        let pivot = state.current_hex.and_then(|hex| self.grid.center(hex));
        let raising = state
            .corners_to_raise
            .front()
            .and_then(|&id| Some((id, self.grid.corner(id)?)));

        if let Some(pivot) = pivot {
            let target = match raising {
                Some((_, corner)) => corner,
                None => state.destination,
            };
            state.position = orbit_step(
                state.position,
                target,
                pivot,
                self.config.step_size,
            );
        }
        state.ticks += 1;
        trace!("Tick {}: moved to {}", state.ticks, state.position);

        if let Some((id, corner)) = raising {
            if state.position.distance_to(corner) < CORNER_REACHED_DISTANCE {
                debug!("Reached corner {}", id);
                state.corners_to_raise.pop_front();
                event = StepEvent::CornerReached(id);
            }
        }

        let new_hex = locate_hexagon(state.position, self.grid);
        if new_hex != state.current_hex {
            state.current_hex = new_hex;
            let corner =
                select_target_corner(state.position, state.destination, self.grid);
            state.corners_to_raise = corner.into_iter().collect();
            debug!(
                "Entered hexagon {:?}, selected corner to raise: {:?}",
                new_hex, corner
            );
            if let Some(hex) = new_hex {
                event = StepEvent::EnteredHex { hex, corner };
            }
        }

        if self.has_arrived(state) {
            debug!("Reached destination {}", state.destination);
            StepEvent::Arrived
        } else {
            event
        }
    }

    /// Drive a run to completion. This is the tick loop: `should_continue`
    /// is checked before every tick, and the run stops as soon as it returns
    /// `false`. The run also stops when we arrive, or after the configured
    /// maximum number of ticks.
    pub fn run(
        &self,
        state: &mut NavigationState,
        mut should_continue: impl FnMut(&NavigationState) -> bool,
    ) -> Trace {
        let mut trace = Trace::new(state);

        let outcome = loop {
            if self.has_arrived(state) {
                break Outcome::Arrived { ticks: state.ticks };
            }
            if state.ticks >= self.config.max_ticks {
                warn!(
                    "Navigation did not converge; {:.2} from destination {} \
                    after {} ticks",
                    state.distance_remaining(),
                    state.destination,
                    state.ticks
                );
                break Outcome::TickLimit { ticks: state.ticks };
            }
            if !should_continue(state) {
                break Outcome::Stopped { ticks: state.ticks };
            }

            self.step(state);
            trace.record(state);
        };

        info!("Navigation {}", outcome);
        trace.outcome = outcome;
        trace
    }

    /// Run from the configured start to the configured destination, with
    /// nothing to stop it early besides the tick limit
    pub fn simulate(&self) -> Trace {
        let mut state = self.start();
        self.run(&mut state, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::build_grid, util::unit::Size2, GridConfig};
    use assert_approx_eq::assert_approx_eq;

    fn default_grid() -> Grid {
        Grid::generate(GridConfig::default()).unwrap()
    }

    fn config(start: Point2, destination: Point2) -> NavigationConfig {
        NavigationConfig {
            start,
            destination,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_state() {
        let grid = default_grid();
        let start = grid.center(0).unwrap();
        let destination = start + Point2::new(0.0, -200.0);
        let state = NavigationState::new(start, destination, &grid);
        assert_eq!(state.current_hex(), Some(0));
        assert_eq!(state.ticks(), 0);
        // Same selection as select_target_corner
        assert_eq!(
            state.corners_to_raise().collect::<Vec<_>>(),
            vec![grid.hex_corner_ids(0).unwrap()[1]]
        );
    }

    #[test]
    fn test_step_moves_one_unit() {
        let grid = default_grid();
        let start = grid.center(44).unwrap();
        let navigator =
            Navigator::new(&grid, config(start, start + Point2::new(0.0, 300.0)))
                .unwrap();
        let mut state = navigator.start();
        navigator.step(&mut state);
        assert_approx_eq!(state.position().distance_to(start), 1.0);
        assert_eq!(state.ticks(), 1);
    }

    #[test]
    fn test_step_after_arrival_is_noop() {
        let grid = default_grid();
        let start = grid.center(55).unwrap();
        // Already within half a radius
        let destination = start + Point2::new(3.0, 4.0);
        let navigator =
            Navigator::new(&grid, config(start, destination)).unwrap();
        let mut state = navigator.start();
        assert!(navigator.has_arrived(&state));
        assert_eq!(navigator.step(&mut state), StepEvent::Arrived);
        assert_eq!(state.position(), start);
        assert_eq!(state.ticks(), 0);

        let trace = navigator.run(&mut state, |_| true);
        assert_eq!(trace.outcome, Outcome::Arrived { ticks: 0 });
        assert_eq!(trace.positions, vec![start]);
    }

    #[test]
    fn test_step_on_empty_grid() {
        let grid = build_grid(Point2::ORIGIN, 10.0, 0, 0, Size2::new(0.0, 0.0));
        let navigator = Navigator::new(
            &grid,
            config(Point2::ORIGIN, Point2::new(100.0, 0.0)),
        )
        .unwrap();
        let mut state = navigator.start();
        assert_eq!(state.current_hex(), None);
        assert_eq!(navigator.step(&mut state), StepEvent::Moved);
        // Nothing to pivot around, so we can't move
        assert_eq!(state.position(), Point2::ORIGIN);
        assert_eq!(state.ticks(), 1);
    }

    #[test]
    fn test_step_reaches_corner() {
        let grid = default_grid();
        let center = grid.center(0).unwrap();
        // Hexagon 0's E corner. Orbiting it from the center of hexagon 0
        // moves straight down (+y)
        let corner_id = grid.hex_corner_ids(0).unwrap()[0];
        let corner = grid.corner(corner_id).unwrap();
        assert_approx_eq!(corner.x, center.x + 20.0);

        let start = corner + Point2::new(0.0, -1.5);
        let navigator =
            Navigator::new(&grid, config(start, Point2::new(600.0, 400.0)))
                .unwrap();
        let mut state = navigator.start();
        assert_eq!(state.current_hex(), Some(0));
        state.corners_to_raise = vec![corner_id].into();

        assert_eq!(
            navigator.step(&mut state),
            StepEvent::CornerReached(corner_id)
        );
        assert_approx_eq!(state.position().x, corner.x);
        assert_approx_eq!(state.position().y, corner.y - 0.5);
        assert_eq!(state.current_hex(), Some(0));
        assert_eq!(state.corners_to_raise().count(), 0);
    }

    #[test]
    fn test_step_into_hex_without_candidates() {
        let grid = default_grid();
        // Hexagon 99 is in the bottom-right corner, so the only corners it
        // owns are its E, SSE and SSW ones. With the destination down and to
        // the right, none of them are behind us.
        let center = grid.center(99).unwrap();
        let destination = center + Point2::new(40.0, 60.0);
        let navigator =
            Navigator::new(&grid, config(center, destination)).unwrap();

        // Pretend we were just on hexagon 89, routing around one of its
        // corners
        let mut state = navigator.start();
        let stale_corner = grid.hex_corner_ids(89).unwrap()[0];
        state.current_hex = Some(89);
        state.corners_to_raise = vec![stale_corner].into();

        let event = navigator.step(&mut state);
        assert_eq!(
            event,
            StepEvent::EnteredHex {
                hex: 99,
                corner: None
            }
        );
        assert_eq!(
            select_target_corner(state.position(), destination, &grid),
            None
        );
        // The old queue is thrown out, not kept
        assert_eq!(state.corners_to_raise().count(), 0);
    }

    #[test]
    fn test_trace_records_hex_entry_on_arrival() {
        let grid = default_grid();
        let start = grid.center(0).unwrap();
        let mut state = NavigationState::new(start, start, &grid);
        let mut trace = Trace::new(&state);
        assert_eq!(trace.hexes, vec![0]);

        // Entering hexagon 1 on the same tick that we arrive
        state.position = grid.center(1).unwrap();
        state.current_hex = Some(1);
        state.corners_to_raise.clear();
        trace.record(&state);
        assert_eq!(trace.hexes, vec![0, 1]);
        assert_eq!(trace.positions.len(), 2);

        // Staying put doesn't add anything
        trace.record(&state);
        assert_eq!(trace.hexes, vec![0, 1]);
    }

    #[test]
    fn test_run_stopped_by_caller() {
        let grid = default_grid();
        let navigator =
            Navigator::new(&grid, NavigationConfig::default()).unwrap();
        let mut state = navigator.start();
        let trace = navigator.run(&mut state, |state| state.ticks() < 5);
        assert_eq!(trace.outcome, Outcome::Stopped { ticks: 5 });
        assert_eq!(trace.ticks(), 5);
        assert_eq!(trace.positions.len(), 6);
        assert_eq!(trace.positions[0], NavigationConfig::default().start);
    }

    #[test]
    fn test_run_tick_limit() {
        let grid = default_grid();
        let navigator = Navigator::new(
            &grid,
            NavigationConfig {
                max_ticks: 3,
                ..Default::default()
            },
        )
        .unwrap();
        let trace = navigator.simulate();
        assert_eq!(trace.outcome, Outcome::TickLimit { ticks: 3 });
        assert_eq!(trace.ticks(), 3);
    }

    #[test]
    fn test_invalid_config() {
        let grid = default_grid();
        let result = Navigator::new(
            &grid,
            NavigationConfig {
                step_size: 0.0,
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            Outcome::Arrived { ticks: 12 }.to_string(),
            "arrived after 12 ticks"
        );
        assert_eq!(
            Outcome::TickLimit { ticks: 3 }.to_string(),
            "gave up after 3 ticks"
        );
    }
}
