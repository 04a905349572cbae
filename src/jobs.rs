use crate::email::{digest_body, DigestEntry, EmailClient};
use crate::entities;
use crate::errors::LodgeError;
use crate::settings::Settings;
use crate::storage;
use crate::warranty::{classify_stored, ExpirationStatus};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Initialize and start the job scheduler with all background tasks
pub async fn init_scheduler(
    db: DatabaseConnection,
    settings: Arc<Settings>,
) -> Result<JobScheduler, LodgeError> {
    let sched = JobScheduler::new()
        .await
        .map_err(|e| LodgeError::Other(format!("Failed to create job scheduler: {}", e)))?;

    let db_clone = db.clone();
    let settings_clone = settings.clone();

    // Warranty expiration digest - runs daily at 07:00
    let digest_job = Job::new_async("0 0 7 * * *", move |_uuid, _l| {
        let db = db_clone.clone();
        let settings = settings_clone.clone();
        Box::pin(async move {
            info!("Running warranty_expiration_digest job");
            let execution_id = start_job_execution(&db, "warranty_expiration_digest")
                .await
                .ok();

            match run_warranty_digest(&db, &settings).await {
                Ok(count) => {
                    info!("Warranty digest covered {} warranties", count);
                    if let Some(id) = execution_id {
                        let _ =
                            complete_job_execution(&db, id, true, None, Some(count as i64)).await;
                    }
                }
                Err(e) => {
                    error!("Failed to send warranty digest: {}", e);
                    if let Some(id) = execution_id {
                        let _ =
                            complete_job_execution(&db, id, false, Some(e.to_string()), None).await;
                    }
                }
            }
        })
    })
    .map_err(|e| LodgeError::Other(format!("Failed to create warranty digest job: {}", e)))?;

    sched
        .add(digest_job)
        .await
        .map_err(|e| LodgeError::Other(format!("Failed to add warranty digest job: {}", e)))?;

    sched
        .start()
        .await
        .map_err(|e| LodgeError::Other(format!("Failed to start job scheduler: {}", e)))?;

    info!("Job scheduler started with {} jobs", 1);

    Ok(sched)
}

/// Record the start of a job execution
pub async fn start_job_execution(
    db: &DatabaseConnection,
    job_name: &str,
) -> Result<i64, LodgeError> {
    use entities::job_execution;

    let now = Utc::now().timestamp();

    let execution = job_execution::ActiveModel {
        job_name: Set(job_name.to_string()),
        started_at: Set(now),
        completed_at: Set(None),
        success: Set(None),
        error_message: Set(None),
        records_processed: Set(None),
        ..Default::default()
    };

    let result = execution.insert(db).await?;
    Ok(result.id)
}

/// Record the completion of a job execution
pub async fn complete_job_execution(
    db: &DatabaseConnection,
    execution_id: i64,
    success: bool,
    error_message: Option<String>,
    records_processed: Option<i64>,
) -> Result<(), LodgeError> {
    use entities::job_execution::{Column, Entity};

    let now = Utc::now().timestamp();

    if let Some(execution) = Entity::find()
        .filter(Column::Id.eq(execution_id))
        .one(db)
        .await?
    {
        let mut active: entities::job_execution::ActiveModel = execution.into_active_model();
        active.completed_at = Set(Some(now));
        active.success = Set(Some(if success { 1 } else { 0 }));
        active.error_message = Set(error_message);
        active.records_processed = Set(records_processed);
        active.update(db).await?;
    }

    Ok(())
}

/// Warranties whose stored expiration falls inside the expiring-soon
/// window, shaped for the digest email.
pub async fn collect_digest_entries(
    db: &DatabaseConnection,
) -> Result<Vec<DigestEntry>, LodgeError> {
    let today = Utc::now().date_naive();
    let names = storage::property_names(db).await?;
    let warranties = storage::list_warranties(db, None).await?;

    Ok(warranties
        .iter()
        .filter(|w| {
            classify_stored(w.expiration_date.as_deref(), today)
                == Some(ExpirationStatus::ExpiringSoon)
        })
        .map(|w| DigestEntry {
            product_name: w.product_name.clone(),
            expiration_date: w.expiration_date.clone().unwrap_or_default(),
            property_name: w.property_id.as_ref().and_then(|p| names.get(p).cloned()),
        })
        .collect())
}

/// Deliver the expiring-soon digest to the configured recipient. Returns
/// the number of warranties covered; a missing recipient means zero work.
pub async fn run_warranty_digest(
    db: &DatabaseConnection,
    settings: &Settings,
) -> Result<u64, LodgeError> {
    let Some(digest_to) = settings.email.digest_to.as_deref() else {
        info!("No digest recipient configured; skipping warranty digest");
        return Ok(0);
    };

    let entries = collect_digest_entries(db).await?;

    if entries.is_empty() {
        info!("No warranties expiring soon; skipping digest email");
        return Ok(0);
    }

    let email = EmailClient::new(settings.email.clone());
    email
        .send(
            digest_to,
            "Warranties expiring soon",
            &digest_body(&entries),
        )
        .await?;

    Ok(entries.len() as u64)
}

/// Assign orphaned records to the configured backfill property.
pub async fn run_backfill(
    db: &DatabaseConnection,
    settings: &Settings,
) -> Result<u64, LodgeError> {
    let Some(property_id) = settings.backfill.property_id.as_deref() else {
        return Err(LodgeError::Validation(
            "backfill.property_id is not configured".to_string(),
        ));
    };

    if storage::get_property(db, property_id).await?.is_none() {
        return Err(LodgeError::NotFound(format!("property {property_id}")));
    }

    storage::backfill_unassigned(db, property_id).await
}

/// Manually trigger a job by name (useful for admin API)
pub async fn trigger_job_manually(
    db: &DatabaseConnection,
    settings: &Settings,
    job_name: &str,
) -> Result<(), LodgeError> {
    info!("Manually triggering job: {}", job_name);
    let execution_id = start_job_execution(db, job_name).await?;

    let result = match job_name {
        "warranty_expiration_digest" => run_warranty_digest(db, settings).await,
        "backfill_property_links" => run_backfill(db, settings).await,
        _ => {
            return Err(LodgeError::Other(format!("Unknown job name: {}", job_name)));
        }
    };

    match result {
        Ok(count) => {
            info!(
                "Manually triggered job {} completed: {} records",
                job_name, count
            );
            complete_job_execution(db, execution_id, true, None, Some(count as i64)).await?;
        }
        Err(e) => {
            error!("Manually triggered job {} failed: {}", job_name, e);
            complete_job_execution(db, execution_id, false, Some(e.to_string()), None).await?;
            return Err(e);
        }
    }

    Ok(())
}
