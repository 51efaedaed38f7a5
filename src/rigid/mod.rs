mod body;
mod data;

pub use body::RigidBody;
pub use data::RigidData;
pub(crate) use data::write_body;
