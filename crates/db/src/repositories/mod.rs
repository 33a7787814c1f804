pub mod job_repo;
pub mod voice_repo;

pub use job_repo::JobRepo;
pub use voice_repo::VoiceRepo;
