mod memory_assessment_repository;
mod pg_assessment_repository;
mod pg_pool;

pub use memory_assessment_repository::InMemoryAssessmentRepository;
pub use pg_assessment_repository::PgAssessmentRepository;
pub use pg_pool::create_pool;
