pub mod normalize;
pub mod validate;

pub use normalize::normalize;
pub use validate::validate;
