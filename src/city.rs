//! The city facade: grid, scheduler, zones, counters, and the PRNG
//!
//! Construction seeds the scheduler with the two period-boundary actions.
//! `step` advances the simulation one step, dispatching whatever has come
//! due; build and bulldoze are the externally driven region operations.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::debug;

use crate::cell::Cell;
use crate::clock::{SimTime, STEPS_PER_PERIOD, WEEK};
use crate::grid::{Grid, GridError, GridLocation, GridRect};
use crate::scheduler::{Reschedule, Scheduler};
use crate::zone::{Residential, ZoneId, ZoneLedger};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("region {rect} is not buildable")]
    NotBuildable { rect: GridRect },
    #[error("region {rect} cannot be bulldozed")]
    IllegalBulldoze { rect: GridRect },
}

/// Everything the scheduler can dispatch. Actions are handles, not
/// closures: the dispatch table in `City::step` holds the state they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Resets the accumulating population counter at step 0 of each period.
    PeriodStart,
    /// Publishes the accumulated counter at the last step of each period.
    PeriodEnd,
    /// Periodic update for one zone.
    ZoneTick(ZoneId),
}

pub struct City {
    grid: Grid,
    scheduler: Scheduler<Action>,
    zones: ZoneLedger,
    rng: ChaCha8Rng,
    /// Population published at the end of the last completed period.
    current_population: u64,
    /// Population accumulating over the period in progress.
    accumulating_population: u64,
}

impl City {
    /// Build a city with an all-dirt grid and the period-boundary actions
    /// registered: period-start anchored at step-in-period 0, period-end at
    /// the period's last step.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(SimTime::ZERO, Action::PeriodStart);
        scheduler.schedule(SimTime::new(STEPS_PER_PERIOD - 1), Action::PeriodEnd);
        Self {
            grid: Grid::filled(width, height, Cell::Dirt),
            scheduler,
            zones: ZoneLedger::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_population: 0,
            accumulating_population: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn time(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Population as of the last completed period.
    pub fn population(&self) -> u64 {
        self.current_population
    }

    /// Population accumulated so far in the period in progress.
    pub fn accumulating_population(&self) -> u64 {
        self.accumulating_population
    }

    /// Read-only view of the pending action set.
    pub fn scheduler(&self) -> &Scheduler<Action> {
        &self.scheduler
    }

    pub fn zones(&self) -> &ZoneLedger {
        &self.zones
    }

    /// Random integer in `[0, bound)` from the city's seeded generator.
    pub fn next_int(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }

    /// Advance the simulation one step. The clock, pending set, cells and
    /// counters are all consistent when this returns.
    pub fn step(&mut self) -> Result<(), SimError> {
        let Self {
            scheduler,
            zones,
            rng,
            current_population,
            accumulating_population,
            ..
        } = self;
        scheduler.step(|_sched, action| match *action {
            Action::PeriodStart => {
                *accumulating_population = 0;
                Ok(Reschedule::After(STEPS_PER_PERIOD))
            }
            Action::PeriodEnd => {
                *current_population = *accumulating_population;
                debug!(population = *current_population, "period closed");
                Ok(Reschedule::After(STEPS_PER_PERIOD))
            }
            Action::ZoneTick(id) => {
                // A zone bulldozed earlier in this pass has no record left.
                let Some(zone) = zones.get_mut(id) else {
                    return Ok(Reschedule::Never);
                };
                zone.periodic_update(rng);
                *accumulating_population += u64::from(zone.population());
                Ok(Reschedule::After(WEEK * STEPS_PER_PERIOD))
            }
        })
    }

    /// True iff `rect` is valid and every cell in it can be built on.
    pub fn is_buildable(&self, rect: GridRect) -> bool {
        self.region_satisfies(rect, Cell::is_buildable)
    }

    /// True iff `rect` is valid and every cell in it can be bulldozed.
    pub fn is_bulldozeable(&self, rect: GridRect) -> bool {
        self.region_satisfies(rect, Cell::is_bulldozeable)
    }

    /// Place a residential zone centered at `center`. The 3x3 footprint
    /// must be fully buildable. The zone's first periodic action is due one
    /// step ahead, so it runs during the second `step` from now.
    pub fn build_residential(&mut self, center: GridLocation) -> Result<ZoneId, SimError> {
        let rect = GridRect::zone_footprint(center);
        if !self.is_buildable(rect) {
            return Err(SimError::NotBuildable { rect });
        }
        let id = self.zones.insert(Residential::new(center));
        for (col, row) in rect.cells() {
            self.grid.set_cell_at(col, row, Cell::Residential(id))?;
        }
        self.scheduler.schedule_in(1, Action::ZoneTick(id));
        debug!(zone = id.raw(), %center, "placed residential zone");
        Ok(id)
    }

    /// Clear a region back to dirt. All-or-nothing: if any cell in `rect`
    /// refuses (water, or the rect is invalid), nothing is modified. A zone
    /// reached through any of its cells is torn down whole: its pending
    /// action is cancelled and its entire footprint reverts to dirt.
    pub fn bulldoze(&mut self, rect: GridRect) -> Result<(), SimError> {
        if !self.is_bulldozeable(rect) {
            return Err(SimError::IllegalBulldoze { rect });
        }
        for (col, row) in rect.cells() {
            match self.grid.cell_at(col, row)? {
                Cell::Residential(id) => self.bulldoze_zone(id)?,
                Cell::Dirt | Cell::Woods => self.grid.set_cell_at(col, row, Cell::Dirt)?,
                // Excluded by the region check above.
                Cell::Water => return Err(SimError::IllegalBulldoze { rect }),
            }
        }
        debug!(%rect, "bulldozed region");
        Ok(())
    }

    /* Tear down one zone: unschedule it, then rewrite its whole footprint.
     * After this the grid holds no reference to the handle, so a second
     * bulldoze through another cell of the same rect sees plain dirt. */
    fn bulldoze_zone(&mut self, id: ZoneId) -> Result<(), SimError> {
        self.scheduler.cancel(&Action::ZoneTick(id));
        if let Some(zone) = self.zones.remove(id) {
            for (col, row) in GridRect::zone_footprint(zone.center()).cells() {
                self.grid.set_cell_at(col, row, Cell::Dirt)?;
            }
            debug!(zone = id.raw(), "bulldozed zone");
        }
        Ok(())
    }

    fn region_satisfies(&self, rect: GridRect, pred: impl Fn(Cell) -> bool) -> bool {
        if !self.grid.valid_region(rect) {
            return false;
        }
        rect.cells().all(|(col, row)| {
            self.grid
                .cell_at(col, row)
                .map(&pred)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellClass;

    fn dirt_city() -> City {
        City::new(10, 10, 7)
    }

    #[test]
    fn zone_occupies_nine_cells_with_one_identity() {
        let mut city = dirt_city();
        let id = city.build_residential(GridLocation::new(5, 5)).unwrap();

        for (col, row) in GridRect::new(4, 4, 3, 3).cells() {
            assert_eq!(city.grid().cell_at(col, row).unwrap(), Cell::Residential(id));
        }
        // Mutation through the ledger is visible via every cell's handle.
        let via_cell = city.grid().cell_at(6, 4).unwrap().zone().unwrap();
        assert_eq!(via_cell, id);
        assert_eq!(city.zones().get(via_cell).unwrap().population(), 0);
    }

    #[test]
    fn build_requires_a_fully_buildable_footprint() {
        let mut city = dirt_city();
        city.grid_mut().set_cell_at(4, 4, Cell::Water).unwrap();

        let err = city.build_residential(GridLocation::new(5, 5)).unwrap_err();
        assert!(matches!(err, SimError::NotBuildable { .. }));
        // Footprint off the edge is rejected the same way.
        assert!(city.build_residential(GridLocation::new(0, 5)).is_err());
    }

    #[test]
    fn bulldozing_one_cell_tears_down_the_whole_zone() {
        let mut city = dirt_city();
        let id = city.build_residential(GridLocation::new(5, 5)).unwrap();

        // Bulldoze a single corner cell of the footprint.
        city.bulldoze(GridRect::new(4, 4, 1, 1)).unwrap();
        for (col, row) in GridRect::new(4, 4, 3, 3).cells() {
            assert_eq!(city.grid().cell_at(col, row).unwrap(), Cell::Dirt);
        }
        assert!(city.zones().get(id).is_none());

        // Its action never fires again.
        for _ in 0..(3 * STEPS_PER_PERIOD) {
            city.step().unwrap();
        }
        assert_eq!(city.population(), 0);
    }

    #[test]
    fn bulldoze_is_all_or_nothing_around_water() {
        let mut city = dirt_city();
        city.grid_mut().set_cell_at(3, 3, Cell::Water).unwrap();
        city.grid_mut().set_cell_at(2, 2, Cell::Woods).unwrap();

        let err = city.bulldoze(GridRect::new(2, 2, 3, 3)).unwrap_err();
        assert!(matches!(err, SimError::IllegalBulldoze { .. }));
        // Fully unmodified.
        assert_eq!(city.grid().cell_at(2, 2).unwrap(), Cell::Woods);
        assert_eq!(city.grid().cell_at(3, 3).unwrap(), Cell::Water);
        assert_eq!(city.grid().cell_at(4, 4).unwrap().class(), CellClass::Dirt);
    }

    #[test]
    fn region_checks_reject_invalid_rects() {
        let city = dirt_city();
        assert!(city.is_buildable(GridRect::new(0, 0, 10, 10)));
        assert!(!city.is_buildable(GridRect::new(8, 8, 3, 3)));
        assert!(!city.is_bulldozeable(GridRect::new(-1, 0, 2, 2)));
        assert!(!city.is_bulldozeable(GridRect::new(0, 0, 0, 1)));
    }

    #[test]
    fn period_counters_publish_at_period_end() {
        let mut city = dirt_city();
        city.build_residential(GridLocation::new(5, 5)).unwrap();

        // Nothing published until a period has completed.
        for _ in 0..(STEPS_PER_PERIOD - 1) {
            city.step().unwrap();
        }
        assert_eq!(city.population(), 0);
        city.step().unwrap();

        // The zone ticks once per period before period-end, so the published
        // value tracks the ledger exactly, this period and every later one.
        let ledger_total = |city: &City| -> u64 {
            city.zones().iter().map(|(_, z)| u64::from(z.population())).sum()
        };
        assert_eq!(city.population(), ledger_total(&city));
        for _ in 0..STEPS_PER_PERIOD {
            city.step().unwrap();
        }
        assert_eq!(city.population(), ledger_total(&city));
    }
}
