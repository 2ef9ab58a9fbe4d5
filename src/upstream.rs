pub mod cache;
pub mod client;
pub use cache::QueryCache;
pub use client::{EntityClient, EntityTransport, HttpTransport, UpstreamRequest};

pub mod activity_repo;
pub use activity_repo::ActivityRepository;
pub mod directory_repo;
pub use directory_repo::DirectoryRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod org_repo;
pub use org_repo::OrganizationRepository;
pub mod saved_filter_repo;
pub use saved_filter_repo::SavedFilterRepository;
