pub mod legacy_notes;
pub mod occupancy_service;
pub mod pricing_service;
pub mod quote_document_service;
pub mod quote_service;
