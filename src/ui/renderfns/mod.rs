mod utils;

pub use utils::{rating_color, rating_stars, truncate};
