pub mod impression;
pub mod time;

pub use impression::*;
pub use time::*;
