pub mod init;
pub mod tensor;

pub use init::Initializer;
pub use tensor::Tensor;
