//! Climate action repository: the event catalog contract.

use domain::models::action::{CreateActionRequest, ListActionsQuery};
use sqlx::{PgConnection, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::entities::{ActionStatusDb, ActionTypeDb, ActionWithCountEntity, ClimateActionEntity};
use crate::metrics::QueryTimer;

const ACTION_COLUMNS: &str = "id, title, description, action_type, status, location_name, \
     latitude, longitude, country, city, start_time, end_time, organizer_id, \
     organization_name, max_participants, registration_deadline, tags, created_at, updated_at";

/// Repository for climate action rows.
#[derive(Clone)]
pub struct ActionRepository {
    pool: PgPool,
}

impl ActionRepository {
    /// Creates a new ActionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new action with the current user as organizer.
    pub async fn create(
        &self,
        tx: &mut PgConnection,
        organizer_id: Uuid,
        request: &CreateActionRequest,
    ) -> Result<ClimateActionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_action");
        let result = sqlx::query_as::<_, ClimateActionEntity>(&format!(
            r#"
            INSERT INTO climate_actions
                (title, description, action_type, location_name, latitude, longitude,
                 country, city, start_time, end_time, organizer_id, organization_name,
                 max_participants, registration_deadline, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {ACTION_COLUMNS}
            "#
        ))
        .bind(&request.title)
        .bind(&request.description)
        .bind(ActionTypeDb::from(request.action_type))
        .bind(&request.location_name)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.country)
        .bind(&request.city)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(organizer_id)
        .bind(&request.organization_name)
        .bind(request.max_participants)
        .bind(request.registration_deadline)
        .bind(&request.tags)
        .fetch_one(&mut *tx)
        .await;
        timer.record();
        result
    }

    /// Find an action by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ClimateActionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_action_by_id");
        let result = sqlx::query_as::<_, ClimateActionEntity>(&format!(
            "SELECT {ACTION_COLUMNS} FROM climate_actions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an action with its derived participant count.
    pub async fn find_with_count(
        &self,
        id: Uuid,
    ) -> Result<Option<ActionWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_action_with_count");
        let result = sqlx::query_as::<_, ActionWithCountEntity>(
            r#"
            SELECT a.*,
                   (SELECT COUNT(*) FROM action_participations p
                     WHERE p.action_id = a.id AND p.kind <> 'cancelled') AS participant_count
            FROM climate_actions a
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lock the action row for the rest of the transaction.
    ///
    /// Joins serialise on this lock so the capacity check and the insert
    /// behave as one unit per action.
    pub async fn lock_for_registration(
        &self,
        tx: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<ClimateActionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_action_for_registration");
        let result = sqlx::query_as::<_, ClimateActionEntity>(&format!(
            "SELECT {ACTION_COLUMNS} FROM climate_actions WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;
        timer.record();
        result
    }

    /// Count non-cancelled participations for an action.
    ///
    /// When run on the join transaction's connection, this sees rows
    /// inserted under the action lock but not yet committed.
    pub async fn active_participant_count<'e>(
        &self,
        executor: impl sqlx::PgExecutor<'e>,
        action_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("active_participant_count");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM action_participations
            WHERE action_id = $1 AND kind <> 'cancelled'
            "#,
        )
        .bind(action_id)
        .fetch_one(executor)
        .await;
        timer.record();
        result
    }

    /// List actions with optional type/status/location/upcoming filters,
    /// ordered by start time.
    pub async fn list(
        &self,
        query: &ListActionsQuery,
    ) -> Result<Vec<ActionWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_actions");

        let mut builder = QueryBuilder::new(
            r#"
            SELECT a.*,
                   (SELECT COUNT(*) FROM action_participations p
                     WHERE p.action_id = a.id AND p.kind <> 'cancelled') AS participant_count
            FROM climate_actions a
            WHERE 1 = 1
            "#,
        );

        if let Some(action_type) = query.action_type {
            builder.push(" AND a.action_type = ");
            builder.push_bind(ActionTypeDb::from(action_type));
        }

        if let Some(status) = query.status {
            builder.push(" AND a.status = ");
            builder.push_bind(ActionStatusDb::from(status));
        }

        if let Some(location) = &query.location {
            let pattern = format!("%{}%", location);
            builder.push(" AND (a.city ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR a.country ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if query.upcoming {
            builder.push(" AND a.start_time > NOW()");
        }

        builder.push(" ORDER BY a.start_time");

        let result = builder
            .build_query_as::<ActionWithCountEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Upcoming and ongoing actions for the map view.
    pub async fn map_actions(&self) -> Result<Vec<ActionWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("map_actions");
        let result = sqlx::query_as::<_, ActionWithCountEntity>(
            r#"
            SELECT a.*,
                   (SELECT COUNT(*) FROM action_participations p
                     WHERE p.action_id = a.id AND p.kind <> 'cancelled') AS participant_count
            FROM climate_actions a
            WHERE a.status IN ('upcoming', 'ongoing')
            ORDER BY a.start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Actions organized by a user, newest start first.
    pub async fn list_organized_by(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ClimateActionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_actions_organized_by");
        let result = sqlx::query_as::<_, ClimateActionEntity>(&format!(
            r#"
            SELECT {ACTION_COLUMNS} FROM climate_actions
            WHERE organizer_id = $1
            ORDER BY start_time DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Actions a user holds a non-cancelled participation in.
    pub async fn list_participated_by(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ClimateActionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_actions_participated_by");
        let result = sqlx::query_as::<_, ClimateActionEntity>(
            r#"
            SELECT a.id, a.title, a.description, a.action_type, a.status, a.location_name,
                   a.latitude, a.longitude, a.country, a.city, a.start_time, a.end_time,
                   a.organizer_id, a.organization_name, a.max_participants,
                   a.registration_deadline, a.tags, a.created_at, a.updated_at
            FROM climate_actions a
            JOIN action_participations p ON p.action_id = a.id
            WHERE p.user_id = $1 AND p.kind <> 'cancelled'
            ORDER BY a.start_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
