pub mod generate;
pub mod onboard;
pub mod serve;
