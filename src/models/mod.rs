pub mod week_grid;
pub mod work_package;
