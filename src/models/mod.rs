pub mod task;
pub mod user;

pub use task::{EditTaskForm, NewTaskForm, Task, TaskQuery};
pub use user::{DeleteUserForm, EditUserForm, LoginForm, NewUserForm, User};
