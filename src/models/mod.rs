pub mod priority;
pub mod project;
pub mod task;
pub mod user;

pub use priority::Priority;
pub use project::{Project, ProjectInput};
pub use task::{NewTask, Task, TaskInput, TaskUpdate};
pub use user::{RenameInput, User, UserInput};
