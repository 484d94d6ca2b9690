pub mod actuality_model;
