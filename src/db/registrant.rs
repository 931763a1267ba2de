//! Registrant lookup queries.

use super::AppState;
use crate::registrant::Registrant;

const REGISTRANT_COLUMNS: &str = "id, name, designation, organization, email, mobile, city, \
                                  mode, attendance_day1, attendance_day2, registered_at";

impl AppState {
    /// Primary-key lookup used by the certificate endpoint.
    pub async fn find_registrant_by_id(&self, id: i64) -> Result<Option<Registrant>, sqlx::Error> {
        let query = format!("SELECT {REGISTRANT_COLUMNS} FROM registrants WHERE id = $1");
        sqlx::query_as::<_, Registrant>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Equality match against id, mobile and email. All matches are
    /// returned, ordered by id ascending; callers needing a single record
    /// take the first.
    pub async fn find_registrants_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<Registrant>, sqlx::Error> {
        let id_guess: Option<i64> = identifier.parse().ok();
        let query = format!(
            "SELECT {REGISTRANT_COLUMNS} FROM registrants \
             WHERE mobile = $1 OR email = $1 OR ($2::bigint IS NOT NULL AND id = $2) \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Registrant>(&query)
            .bind(identifier)
            .bind(id_guess)
            .fetch_all(&self.pool)
            .await
    }
}
