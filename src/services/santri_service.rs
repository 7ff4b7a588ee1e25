use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Dataset, Santri, SantriStatus};

use super::{ServiceError, ServiceResult};

pub struct SantriService;

impl SantriService {
    pub fn tambah(dataset: &mut Dataset, santri: Santri) -> ServiceResult<Uuid> {
        if santri.nama_lengkap.trim().is_empty() {
            return Err(ServiceError::Validation("student name is required".into()));
        }
        if santri.kategori.trim().is_empty() {
            return Err(ServiceError::Validation(
                "enrollment category is required".into(),
            ));
        }
        Ok(dataset.add_santri(santri))
    }

    /// Applies an edit while keeping the identity fields untouched.
    pub fn perbarui(dataset: &mut Dataset, id: Uuid, mut updated: Santri) -> ServiceResult<()> {
        if updated.nama_lengkap.trim().is_empty() {
            return Err(ServiceError::Validation("student name is required".into()));
        }
        let existing = dataset
            .santri_mut(id)
            .ok_or(ServiceError::SantriNotFound(id))?;
        updated.id = existing.id;
        updated.created_at = existing.created_at;
        updated.updated_at = chrono::Utc::now();
        *existing = updated;
        dataset.touch();
        Ok(())
    }

    /// Soft lifecycle change; records are never removed.
    pub fn ubah_status(
        dataset: &mut Dataset,
        id: Uuid,
        status: SantriStatus,
    ) -> ServiceResult<()> {
        let santri = dataset
            .santri_mut(id)
            .ok_or(ServiceError::SantriNotFound(id))?;
        santri.status = status;
        santri.updated_at = chrono::Utc::now();
        dataset.touch();
        Ok(())
    }

    /// Active resident-sponsored students enrolled on or before `as_of`,
    /// name-sorted. This is the population snapshot the generator and the
    /// realization report share.
    pub fn populasi_binaan_mukim(dataset: &Dataset, as_of: NaiveDate) -> Vec<&Santri> {
        let mut populasi: Vec<&Santri> = dataset
            .santri
            .iter()
            .filter(|s| s.is_aktif() && s.is_binaan_mukim())
            .filter(|s| s.created_at.date_naive() <= as_of)
            .collect();
        populasi.sort_by(|a, b| a.nama_lengkap.cmp(&b.nama_lengkap));
        populasi
    }
}
