pub mod classpath;
pub mod task;

pub use classpath::{join_classpath, ClassScope};
pub use task::{launch, EntryPoint, JvmEntryPoint, LaunchConfig, ENTRY_CLASS, SERVER_SIDE};
