pub mod israeli_id;
pub mod user;
pub mod validation;
