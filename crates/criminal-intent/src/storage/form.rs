//! Draft submission on top of the storage gateway.

use tracing::debug;

use super::CrimeStorage;
use crate::crime::{Crime, CrimeFormData};
use crate::error::Result;

/// Submit a draft, creating a record or updating the one with `crime_id`.
///
/// The draft is validated and trimmed first. Without `crime_id` a fresh id is
/// minted. Returns the record as stored.
///
/// # Errors
///
/// Returns [`Error::Validation`](crate::Error::Validation) for a blank title,
/// or any error from [`CrimeStorage::save_crime`].
pub async fn submit_form(
    storage: &CrimeStorage,
    crime_id: Option<&str>,
    form: CrimeFormData,
) -> Result<Crime> {
    form.validate()?;
    let form = form.trimmed();

    let id = crime_id.map_or_else(|| storage.new_id(), str::to_string);
    debug!(%id, new = crime_id.is_none(), "Submitting crime form");

    let crime = Crime::from_form(id, form, storage.now());
    storage.save_crime(crime).await
}

/// Load an existing record into a draft for editing.
///
/// # Errors
///
/// Propagates any error from [`CrimeStorage::get_crime_by_id`].
pub async fn load_form(storage: &CrimeStorage, crime_id: &str) -> Result<Option<CrimeFormData>> {
    let crime = storage.get_crime_by_id(crime_id).await?;
    Ok(crime.as_ref().map(CrimeFormData::from))
}
