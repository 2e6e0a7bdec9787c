use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("document error: {0}")]
    Source(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("page {0} not found")]
    PageNotFound(usize),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
