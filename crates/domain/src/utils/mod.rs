//! Pure helpers shared by the service, storage and command layers.

pub mod date;
pub mod duration;
pub mod token;
