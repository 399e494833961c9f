pub mod analysis;
pub mod dashboard_state;
pub mod month_day;
pub mod observation;
pub mod raw_rad;
pub mod station;
pub mod view;
pub mod year_group;
