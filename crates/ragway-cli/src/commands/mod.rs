pub mod health;
pub mod reseed;
pub mod search;
pub mod serve;
pub mod status;
