mod expense;
mod integrity;
mod money;
mod summary;

pub use expense::*;
pub use integrity::*;
pub use money::*;
pub use summary::*;
