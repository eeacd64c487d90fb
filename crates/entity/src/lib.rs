pub mod comment;

pub use comment::Entity as Comment;
