pub mod interaction;
pub mod plan;
pub mod quiz;
pub mod resource;
pub mod student;

pub use interaction::*;
pub use plan::*;
pub use quiz::*;
pub use resource::*;
pub use student::*;
