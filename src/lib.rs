pub mod cell;
pub mod city;
pub mod clock;
pub mod grid;
pub mod scenario;
pub mod scheduler;
pub mod snapshot;
pub mod zone;

pub use cell::{Cell, CellClass};
pub use city::{Action, City, SimError};
pub use clock::{SimTime, MONTH, STEPS_PER_PERIOD, WEEK, YEAR};
pub use grid::{Grid, GridError, GridLocation, GridRect};
pub use scheduler::{Reschedule, Scheduler};
pub use zone::{Residential, ZoneId, ZoneLedger};
