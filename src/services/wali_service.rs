use uuid::Uuid;

use crate::domain::{Dataset, Wali};

use super::{ServiceError, ServiceResult};

pub struct WaliService;

impl WaliService {
    /// Adds a guardian. The first guardian of a student always becomes the
    /// primary; adding a new primary demotes the previous one in the same
    /// mutation.
    pub fn tambah(dataset: &mut Dataset, mut wali: Wali) -> ServiceResult<Uuid> {
        if wali.nama_lengkap.trim().is_empty() {
            return Err(ServiceError::Validation("guardian name is required".into()));
        }
        let santri_id = wali.santri_id;
        if dataset.santri(santri_id).is_none() {
            return Err(ServiceError::SantriNotFound(santri_id));
        }
        let has_existing = dataset.wali.iter().any(|w| w.santri_id == santri_id);
        if !has_existing {
            wali.is_utama = true;
        } else if wali.is_utama {
            Self::turunkan_utama(dataset, santri_id);
        }
        Ok(dataset.add_wali(wali))
    }

    /// Guardians of one student, primary first, then oldest first.
    pub fn daftar(dataset: &Dataset, santri_id: Uuid) -> Vec<&Wali> {
        let mut rows: Vec<&Wali> = dataset
            .wali
            .iter()
            .filter(|w| w.santri_id == santri_id)
            .collect();
        rows.sort_by(|a, b| {
            b.is_utama
                .cmp(&a.is_utama)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        rows
    }

    pub fn wali_utama(dataset: &Dataset, santri_id: Uuid) -> Option<&Wali> {
        dataset
            .wali
            .iter()
            .find(|w| w.santri_id == santri_id && w.is_utama)
    }

    /// Promotes a guardian to primary, demoting the current primary in the
    /// same mutation so the at-most-one invariant can never be observed
    /// broken.
    pub fn jadikan_utama(dataset: &mut Dataset, wali_id: Uuid) -> ServiceResult<()> {
        let santri_id = dataset
            .wali
            .iter()
            .find(|w| w.id == wali_id)
            .map(|w| w.santri_id)
            .ok_or(ServiceError::WaliNotFound(wali_id))?;
        for wali in dataset
            .wali
            .iter_mut()
            .filter(|w| w.santri_id == santri_id)
        {
            wali.is_utama = wali.id == wali_id;
        }
        dataset.touch();
        Ok(())
    }

    /// Removes a guardian. If the primary was removed, the oldest remaining
    /// guardian takes over so the student keeps a primary contact.
    pub fn hapus(dataset: &mut Dataset, wali_id: Uuid) -> ServiceResult<()> {
        let removed = dataset
            .wali
            .iter()
            .find(|w| w.id == wali_id)
            .map(|w| (w.santri_id, w.is_utama))
            .ok_or(ServiceError::WaliNotFound(wali_id))?;
        dataset.wali.retain(|w| w.id != wali_id);
        let (santri_id, was_utama) = removed;
        if was_utama {
            if let Some(next) = dataset
                .wali
                .iter_mut()
                .filter(|w| w.santri_id == santri_id)
                .min_by_key(|w| w.created_at)
            {
                next.is_utama = true;
            }
        }
        dataset.touch();
        Ok(())
    }

    fn turunkan_utama(dataset: &mut Dataset, santri_id: Uuid) {
        for wali in dataset
            .wali
            .iter_mut()
            .filter(|w| w.santri_id == santri_id)
        {
            wali.is_utama = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Santri;

    fn dataset_with_santri() -> (Dataset, Uuid) {
        let mut dataset = Dataset::new("Wali");
        let santri_id = dataset.add_santri(Santri::new("Budi", "Santri Binaan Mukim"));
        (dataset, santri_id)
    }

    fn utama_count(dataset: &Dataset, santri_id: Uuid) -> usize {
        dataset
            .wali
            .iter()
            .filter(|w| w.santri_id == santri_id && w.is_utama)
            .count()
    }

    #[test]
    fn first_guardian_becomes_primary() {
        let (mut dataset, santri_id) = dataset_with_santri();
        let id = WaliService::tambah(&mut dataset, Wali::new(santri_id, "Hasan", "Ayah")).unwrap();
        assert_eq!(WaliService::wali_utama(&dataset, santri_id).unwrap().id, id);
    }

    #[test]
    fn promotion_demotes_the_previous_primary() {
        let (mut dataset, santri_id) = dataset_with_santri();
        WaliService::tambah(&mut dataset, Wali::new(santri_id, "Hasan", "Ayah")).unwrap();
        let ibu = WaliService::tambah(&mut dataset, Wali::new(santri_id, "Aminah", "Ibu")).unwrap();

        WaliService::jadikan_utama(&mut dataset, ibu).unwrap();
        assert_eq!(utama_count(&dataset, santri_id), 1);
        assert_eq!(
            WaliService::wali_utama(&dataset, santri_id).unwrap().id,
            ibu
        );
    }

    #[test]
    fn adding_a_new_primary_keeps_the_invariant() {
        let (mut dataset, santri_id) = dataset_with_santri();
        WaliService::tambah(&mut dataset, Wali::new(santri_id, "Hasan", "Ayah")).unwrap();
        let mut paman = Wali::new(santri_id, "Umar", "Paman");
        paman.is_utama = true;
        WaliService::tambah(&mut dataset, paman).unwrap();
        assert_eq!(utama_count(&dataset, santri_id), 1);
    }

    #[test]
    fn removing_the_primary_promotes_the_oldest_remaining() {
        let (mut dataset, santri_id) = dataset_with_santri();
        let ayah = WaliService::tambah(&mut dataset, Wali::new(santri_id, "Hasan", "Ayah")).unwrap();
        let ibu = WaliService::tambah(&mut dataset, Wali::new(santri_id, "Aminah", "Ibu")).unwrap();

        WaliService::hapus(&mut dataset, ayah).unwrap();
        assert_eq!(utama_count(&dataset, santri_id), 1);
        assert_eq!(
            WaliService::wali_utama(&dataset, santri_id).unwrap().id,
            ibu
        );
    }
}
