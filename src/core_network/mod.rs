pub mod pasv;
pub mod pipe;
pub mod transfer;
