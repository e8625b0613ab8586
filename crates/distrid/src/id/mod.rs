mod distributed;

pub use distributed::*;
