pub mod admission;
pub mod validator;

pub use admission::{AdmissionController, AdmissionPolicy, Decision, RequestLog, admit};
pub use validator::{InputValidator, ValidText};
