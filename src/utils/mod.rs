pub mod code_generator;
pub mod password;
pub mod validation;

pub use code_generator::*;
pub use password::*;
pub use validation::*;
