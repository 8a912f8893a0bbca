pub mod model;
pub mod spatial;
pub mod util;
