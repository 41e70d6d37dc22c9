use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct CalendarOptions {
    /// Month label, e.g. "Febrero"
    pub month: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionOptions {
    pub months: Vec<String>,
    pub days: Vec<String>,
    pub hours: Vec<String>,
    pub facilities: Vec<String>,
    pub precipitation: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: String,
    /// Day options for the month
    pub days: Vec<String>,
    pub holidays: Vec<u32>,
}
