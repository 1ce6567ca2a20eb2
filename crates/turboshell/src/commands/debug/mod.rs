pub mod events;
pub mod work_area;
