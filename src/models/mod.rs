pub mod question;

pub use question::{Choice, ParsedQuestion, SolveResult};
