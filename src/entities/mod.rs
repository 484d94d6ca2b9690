pub mod prelude;

pub mod actualities;
pub mod actuality_images;
pub mod actuality_tags;
pub mod photos;
pub mod productions;
pub mod tags;
pub mod videos;
