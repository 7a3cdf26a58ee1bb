pub mod condition;
pub mod graph;
pub mod mutation;
pub mod node;
pub mod value;

pub use condition::*;
pub use graph::*;
pub use mutation::*;
pub use node::*;
pub use value::*;
