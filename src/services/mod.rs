pub mod course_source;

pub use course_source::{Account, CourseDataSource, CourseMetadata, EnrollmentRecord};
