//! Grade records and the distribution reports built from them.
//!
//! This crate sits between stored grade records and the statistics engine in
//! [`gradestat_stats`]:
//!
//! 1. **Validate** ([`validation`]): grade payloads are checked by explicit
//!    guard functions before anything is stored
//! 2. **Store** ([`store::GradeStore`]): records are looked up and changed
//!    through a small persistence trait; [`store::MemoryStore`] keeps a whole
//!    [`model::Dataset`] in memory
//! 3. **Report** ([`service::GradeService`]): access rules are enforced, grade
//!    values are extracted and summarized, and serializable reports
//!    ([`report`]) are assembled
//!
//! [`seed`] generates a demo dataset.
//!
//! # Examples
//!
//! ```
//! use gradestat_records::{
//!     model::{Course, Dataset, Role, User},
//!     service::GradeService,
//!     store::MemoryStore,
//!     validation::NewGrade,
//! };
//!
//! let dataset = Dataset {
//!     users: vec![User {
//!         id: "s1".to_owned(),
//!         email: "student1@example.com".to_owned(),
//!         name: "Student 1".to_owned(),
//!         role: Role::Student,
//!         enrolled_course_ids: vec![],
//!     }],
//!     courses: vec![Course {
//!         id: "math".to_owned(),
//!         name: "Mathematics".to_owned(),
//!         description: None,
//!         is_public: true,
//!         accepting_grades: true,
//!         group_ids: vec![],
//!     }],
//!     ..Dataset::default()
//! };
//!
//! let mut service = GradeService::new(MemoryStore::new(dataset));
//! for value in [62.0, 75.5, 88.0] {
//!     service.record_grade(NewGrade {
//!         value,
//!         student_id: "s1".to_owned(),
//!         course_id: "math".to_owned(),
//!         group_id: None,
//!     })?;
//! }
//!
//! let report = service.course_distribution("math")?;
//! assert_eq!(report.total_grades, 3);
//! assert_eq!(report.overall.median, 75.5);
//! # Ok::<(), gradestat_records::service::ServiceError>(())
//! ```

pub mod model;
pub mod report;
pub mod seed;
pub mod service;
pub mod store;
pub mod validation;
