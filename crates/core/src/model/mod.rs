pub mod call_node;
pub mod profile;

pub use call_node::CallNode;
pub use profile::{MAX_CALL_DEPTH, ProfileError, ProfileSnapshot};
