pub mod gzip_csv;
pub mod json;
pub mod s3;
pub mod store;
