pub mod ids;
pub mod user;
pub mod product;
pub mod order;
pub mod summary;

pub use ids::*;
pub use user::*;
pub use product::*;
pub use order::*;
pub use summary::*;
