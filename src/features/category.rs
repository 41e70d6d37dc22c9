//! Label-to-code tables for the categorical inputs

use crate::{ParkingError, Result};

/// Immutable mapping from a presentation label to its model code
///
/// Entries keep presentation order so front ends can list them as options.
#[derive(Debug, Clone, Copy)]
pub struct CategoryMap {
    name: &'static str,
    entries: &'static [(&'static str, u32)],
}

impl CategoryMap {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, u32)]) -> Self {
        CategoryMap { name, entries }
    }

    /// Name of the input dimension this map encodes
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve a label, failing on anything outside the map
    pub fn code(&self, label: &str) -> Result<u32> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|&(_, code)| code)
            .ok_or_else(|| ParkingError::UnknownLabel {
                map: self.name,
                label: label.to_string(),
            })
    }

    /// Reverse lookup
    pub fn label(&self, code: u32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|&&(_, c)| c == code)
            .map(|&(l, _)| l)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(l, _)| l)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub static MONTHS: CategoryMap = CategoryMap::new(
    "month",
    &[
        ("Enero", 1),
        ("Febrero", 2),
        ("Marzo", 3),
        ("Abril", 4),
        ("Mayo", 5),
        ("Junio", 6),
        ("Julio", 7),
        ("Agosto", 8),
        ("Septiembre", 9),
        ("Octubre", 10),
        ("Noviembre", 11),
        ("Diciembre", 12),
    ],
);

pub static HOURS: CategoryMap = CategoryMap::new(
    "hour",
    &[
        ("00:00", 0),
        ("01:00", 1),
        ("02:00", 2),
        ("03:00", 3),
        ("04:00", 4),
        ("05:00", 5),
        ("06:00", 6),
        ("07:00", 7),
        ("08:00", 8),
        ("09:00", 9),
        ("10:00", 10),
        ("11:00", 11),
        ("12:00", 12),
        ("13:00", 13),
        ("14:00", 14),
        ("15:00", 15),
        ("16:00", 16),
        ("17:00", 17),
        ("18:00", 18),
        ("19:00", 19),
        ("20:00", 20),
        ("21:00", 21),
        ("22:00", 22),
        ("23:00", 23),
    ],
);

pub static FACILITIES: CategoryMap = CategoryMap::new(
    "facility",
    &[
        ("RINCÓN", 1),
        ("ELDER", 2),
        ("SAN BERNARDO", 3),
        ("SANAPÚ", 4),
        ("MATA", 5),
        ("VEGUETA", 6),
        ("METROPOL", 7),
    ],
);

pub static PRECIPITATION: CategoryMap =
    CategoryMap::new("precipitation", &[("Sin lluvia", 0), ("lluvioso", 1)]);

pub static DAY_TYPES: CategoryMap =
    CategoryMap::new("day type", &[("Festivo", 0), ("Laboral", 1)]);
