pub mod export_service;
pub mod lead_filter;
pub mod lead_page;
pub mod lead_service;
pub mod lead_sort;
pub mod saved_filter_service;
pub mod selection;
pub mod settings_service;

pub use lead_service::LeadService;
pub use saved_filter_service::SavedFilterService;
pub use settings_service::SettingsService;
