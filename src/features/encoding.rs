//! Feature vector encoding
//!
//! Turns the five user selections into the integer vector the occupancy
//! models were trained on.

use serde::{Deserialize, Serialize};

use super::calendar::HolidayCalendar;
use super::category::{DAY_TYPES, FACILITIES, HOURS, MONTHS, PRECIPITATION};
use crate::{DayType, ParkingError, Result, Selection};

/// Model input in training order: month, day, hour, precipitation, day type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 5]", into = "[i32; 5]")]
pub struct FeatureVector {
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub precipitation: i32,
    /// 0 = holiday, 1 = workday
    pub day_type: i32,
}

impl FeatureVector {
    /// Number of features in this struct
    pub const DIM: usize = 5;

    pub fn to_array(&self) -> [i32; Self::DIM] {
        [
            self.month,
            self.day,
            self.hour,
            self.precipitation,
            self.day_type,
        ]
    }

    /// Convert to flat float vector for model input
    pub fn to_vec(&self) -> Vec<f32> {
        self.to_array().iter().map(|&v| v as f32).collect()
    }

    pub fn day_type(&self) -> DayType {
        if self.day_type == 0 {
            DayType::Holiday
        } else {
            DayType::Workday
        }
    }
}

impl From<[i32; 5]> for FeatureVector {
    fn from(v: [i32; 5]) -> Self {
        FeatureVector {
            month: v[0],
            day: v[1],
            hour: v[2],
            precipitation: v[3],
            day_type: v[4],
        }
    }
}

impl From<FeatureVector> for [i32; 5] {
    fn from(v: FeatureVector) -> Self {
        v.to_array()
    }
}

/// Encodes selections against a holiday calendar
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    calendar: HolidayCalendar,
}

impl FeatureEncoder {
    pub fn new(calendar: HolidayCalendar) -> Self {
        FeatureEncoder { calendar }
    }

    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Encode one set of selections
    ///
    /// The facility is validated but not encoded; it selects the model. The
    /// day is not checked against the month's length.
    pub fn encode(
        &self,
        month: &str,
        day: &str,
        hour: &str,
        facility: &str,
        precipitation: &str,
    ) -> Result<FeatureVector> {
        let month_code = MONTHS.code(month)?;
        let day_num: i32 = day
            .trim()
            .parse()
            .map_err(|_| ParkingError::InvalidDay(day.to_string()))?;
        let hour_code = HOURS.code(hour)?;
        FACILITIES.code(facility)?;
        let precip_code = PRECIPITATION.code(precipitation)?;

        let day_type = match u32::try_from(day_num) {
            Ok(d) => self.calendar.day_type(month_code, d),
            Err(_) => DayType::Workday,
        };
        let day_type_code = DAY_TYPES.code(day_type.label())?;

        Ok(FeatureVector {
            month: month_code as i32,
            day: day_num,
            hour: hour_code as i32,
            precipitation: precip_code as i32,
            day_type: day_type_code as i32,
        })
    }

    pub fn encode_selection(&self, selection: &Selection) -> Result<FeatureVector> {
        self.encode(
            &selection.month,
            &selection.day,
            &selection.hour,
            &selection.facility,
            &selection.precipitation,
        )
    }
}
