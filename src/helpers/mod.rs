pub mod hours;
pub mod pdf;
