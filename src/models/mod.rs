pub mod bookmark;
pub mod category;
pub mod note;
pub mod reminder;
pub mod todo;
pub mod user;

pub use bookmark::{Bookmark, NewBookmark};
pub use category::Category;
pub use note::{NewNote, Note};
pub use reminder::{NewReminder, Reminder, Repeat};
pub use todo::{NewTodo, Priority, Todo, TodoUpdate};
pub use user::{NewUser, User};
