pub use frontier::*;

mod frontier;
