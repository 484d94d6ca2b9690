pub mod global_id;
pub mod keyed_mutex;
pub mod validation;
