mod chips;
mod input;

pub use chips::ChipRow;
pub use input::{InputResult, TextInput};
