//! Canvas LMS implementation of [`CourseDataSource`](crate::services::CourseDataSource).

mod client;

pub use client::CanvasClient;
