pub mod location;
pub mod post;

pub use location::{Coordinates, Location};
pub use post::Post;
