pub mod dokumen_service;
pub mod generate_service;
pub mod layanan_service;
pub mod pilar_service;
pub mod santri_service;
pub mod wali_service;

pub use dokumen_service::DokumenService;
pub use generate_service::GenerateService;
pub use layanan_service::LayananService;
pub use pilar_service::PilarService;
pub use santri_service::SantriService;
pub use wali_service::WaliService;

use uuid::Uuid;

use crate::errors::StoreError;
use crate::periode::Periode;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("no eligible santri for pillar `{pilar}` in period {periode}")]
    EmptyPopulation { periode: Periode, pilar: String },
    #[error("pillar `{0}` is computed per transaction and cannot be flat-divided")]
    UnsupportedPilar(String),
    #[error("Santri not found: {0}")]
    SantriNotFound(Uuid),
    #[error("Wali not found: {0}")]
    WaliNotFound(Uuid),
    #[error("Dokumen not found: {0}")]
    DokumenNotFound(Uuid),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
