pub mod entries;
pub mod habits;
pub mod health;
