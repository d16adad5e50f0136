mod lottery;
mod ticket;

pub use lottery::*;
pub use ticket::*;
