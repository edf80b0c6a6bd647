pub mod format;
pub mod movie;
pub mod user;

pub use format::{Format, FormatInput};
pub use movie::{Movie, MovieInput};
pub use user::{User, UserInput};
