pub use super::actualities::Entity as Actualities;
pub use super::actuality_images::Entity as ActualityImages;
pub use super::actuality_tags::Entity as ActualityTags;
pub use super::photos::Entity as Photos;
pub use super::productions::Entity as Productions;
pub use super::tags::Entity as Tags;
pub use super::videos::Entity as Videos;
