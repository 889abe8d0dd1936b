pub mod codec;
pub mod services;
