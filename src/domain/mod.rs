// Domain layer - Program records and page output
pub mod family;
pub mod record;
pub mod report;
pub mod student;
pub mod tutor;
pub mod view;
pub mod volunteer;
pub mod woman;
