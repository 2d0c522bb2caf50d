pub mod guard;
pub mod operator;
pub mod trace;
pub mod value;

pub use guard::*;
pub use operator::*;
pub use trace::*;
pub use value::*;
