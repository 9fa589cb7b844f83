use crate::database::{MongoDB, CONSTRUCTION_PROJECTS};
use crate::models::{
    AddMaterialRequest, AddMilestoneRequest, AddWorkerRequest, ConstructionProject,
    CreateProjectRequest, Material, Milestone, ProjectResponse, UpdateProjectRequest, Worker,
};
use crate::services::auth_service::Claims;
use crate::utils::AppError;
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use uuid::Uuid;

const PROJECT_TYPES: &[&str] = &["residential", "commercial", "renovation", "interior"];

fn parse_project_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest("Invalid project ID".to_string()))
}

/// Allow-listed $set document for PATCH. The approved* fields are never
/// client-settable through this path; progress is clamped to the display
/// bound 0..=100.
pub fn build_update_doc(request: &UpdateProjectRequest, now: i64) -> Document {
    let mut update_doc = doc! { "updated_at": now };

    if let Some(title) = &request.title {
        update_doc.insert("title", title);
    }
    if let Some(description) = &request.description {
        update_doc.insert("description", description);
    }
    if let Some(location) = &request.location {
        update_doc.insert("location", location);
    }
    if let Some(budget) = request.budget {
        update_doc.insert("budget", budget);
    }
    if let Some(timeline) = &request.timeline {
        update_doc.insert("timeline", timeline);
    }
    if let Some(status) = &request.status {
        update_doc.insert("status", status);
    }
    if let Some(progress) = request.progress {
        update_doc.insert("progress", progress.clamp(0, 100));
    }

    update_doc
}

pub async fn create_project(
    db: &MongoDB,
    claims: &Claims,
    request: CreateProjectRequest,
) -> Result<ProjectResponse, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("title is required".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "description is required".to_string(),
        ));
    }
    if request.location.trim().is_empty() {
        return Err(AppError::InvalidRequest("location is required".to_string()));
    }
    if request.timeline.trim().is_empty() {
        return Err(AppError::InvalidRequest("timeline is required".to_string()));
    }
    if !PROJECT_TYPES.contains(&request.project_type.as_str()) {
        return Err(AppError::InvalidRequest(format!(
            "Invalid project type: {}. Supported: residential, commercial, renovation, interior",
            request.project_type
        )));
    }
    if request.budget <= 0.0 {
        return Err(AppError::InvalidRequest(
            "budget must be positive".to_string(),
        ));
    }

    let now = Utc::now().timestamp();
    let project = ConstructionProject {
        id: None,
        user_id: claims.sub.clone(),
        title: request.title,
        description: request.description,
        project_type: request.project_type,
        location: request.location,
        budget: request.budget,
        timeline: request.timeline,
        status: "pending".to_string(),
        progress: 0,
        approved: false,
        approved_by: None,
        approved_at: None,
        milestones: vec![],
        materials: vec![],
        workers: vec![],
        created_at: now,
        updated_at: now,
    };

    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);
    let result = collection
        .insert_one(&project)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create project: {}", e)))?;

    let mut created = project;
    created.id = result.inserted_id.as_object_id();

    Ok(ProjectResponse::from(created))
}

/// Caller's own projects; admins see the whole collection.
pub async fn list_projects(
    db: &MongoDB,
    claims: &Claims,
) -> Result<Vec<ProjectResponse>, AppError> {
    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);

    let filter = if claims.is_admin() {
        doc! {}
    } else {
        doc! { "user_id": &claims.sub }
    };

    let mut cursor = collection
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut projects = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(project) => projects.push(ProjectResponse::from(project)),
            Err(e) => log::warn!("⚠️ Skipping malformed project document: {}", e),
        }
    }

    Ok(projects)
}

/// Loads the project and runs the owner-or-admin check in one place.
async fn load_owned_project(
    db: &MongoDB,
    claims: &Claims,
    object_id: ObjectId,
) -> Result<ConstructionProject, AppError> {
    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);

    let project = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if !claims.can_access(&project.user_id) {
        return Err(AppError::Forbidden(
            "Not the owner of this project".to_string(),
        ));
    }

    Ok(project)
}

pub async fn get_project(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
) -> Result<ProjectResponse, AppError> {
    let object_id = parse_project_id(id)?;
    let project = load_owned_project(db, claims, object_id).await?;
    Ok(ProjectResponse::from(project))
}

pub async fn update_project(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
    request: &UpdateProjectRequest,
) -> Result<ProjectResponse, AppError> {
    let object_id = parse_project_id(id)?;
    load_owned_project(db, claims, object_id).await?;

    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);
    let update_doc = build_update_doc(request, Utc::now().timestamp());

    collection
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let updated = load_owned_project(db, claims, object_id).await?;
    Ok(ProjectResponse::from(updated))
}

/// Admin-only flag flip. No ordering is enforced against milestones: a
/// project may carry completed milestones before it is approved.
pub async fn approve_project(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
) -> Result<ProjectResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can approve projects".to_string(),
        ));
    }

    let object_id = parse_project_id(id)?;
    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);

    let now = Utc::now().timestamp();
    let result = collection
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": {
                "approved": true,
                "approved_by": &claims.sub,
                "approved_at": now,
                "updated_at": now,
            }},
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    let project = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    log::info!("✅ Project {} approved by {}", id, claims.sub);

    Ok(ProjectResponse::from(project))
}

pub async fn add_milestone(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
    request: AddMilestoneRequest,
) -> Result<ProjectResponse, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("title is required".to_string()));
    }

    let object_id = parse_project_id(id)?;
    load_owned_project(db, claims, object_id).await?;

    let milestone = Milestone {
        milestone_id: Uuid::new_v4().to_string(),
        title: request.title,
        description: request.description,
        completed: false,
        completed_at: None,
    };

    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);
    let milestone_bson = mongodb::bson::to_bson(&milestone)
        .map_err(|e| AppError::Database(format!("Failed to encode milestone: {}", e)))?;

    collection
        .update_one(
            doc! { "_id": object_id },
            doc! {
                "$push": { "milestones": milestone_bson },
                "$set": { "updated_at": Utc::now().timestamp() },
            },
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let updated = load_owned_project(db, claims, object_id).await?;
    Ok(ProjectResponse::from(updated))
}

/// Positional update of one embedded milestone. Completion is legal at any
/// time relative to approval.
pub async fn complete_milestone(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
    milestone_id: &str,
) -> Result<ProjectResponse, AppError> {
    let object_id = parse_project_id(id)?;
    load_owned_project(db, claims, object_id).await?;

    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);

    let now = Utc::now().timestamp();
    let result = collection
        .update_one(
            doc! { "_id": object_id, "milestones.milestone_id": milestone_id },
            doc! { "$set": {
                "milestones.$.completed": true,
                "milestones.$.completed_at": now,
                "updated_at": now,
            }},
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Milestone not found".to_string()));
    }

    let updated = load_owned_project(db, claims, object_id).await?;
    Ok(ProjectResponse::from(updated))
}

pub async fn add_material(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
    request: AddMaterialRequest,
) -> Result<ProjectResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name is required".to_string()));
    }

    let object_id = parse_project_id(id)?;
    load_owned_project(db, claims, object_id).await?;

    let material = Material {
        name: request.name,
        quantity: request.quantity,
        unit: request.unit,
        cost: request.cost,
    };

    push_embedded(db, object_id, "materials", &material).await?;

    let updated = load_owned_project(db, claims, object_id).await?;
    Ok(ProjectResponse::from(updated))
}

pub async fn add_worker(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
    request: AddWorkerRequest,
) -> Result<ProjectResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name is required".to_string()));
    }

    let object_id = parse_project_id(id)?;
    load_owned_project(db, claims, object_id).await?;

    let worker = Worker {
        name: request.name,
        role: request.role,
        phone: request.phone,
    };

    push_embedded(db, object_id, "workers", &worker).await?;

    let updated = load_owned_project(db, claims, object_id).await?;
    Ok(ProjectResponse::from(updated))
}

pub async fn delete_project(db: &MongoDB, claims: &Claims, id: &str) -> Result<(), AppError> {
    let object_id = parse_project_id(id)?;
    load_owned_project(db, claims, object_id).await?;

    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);
    let result = collection
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    Ok(())
}

async fn push_embedded<T: serde::Serialize>(
    db: &MongoDB,
    object_id: ObjectId,
    field: &str,
    value: &T,
) -> Result<(), AppError> {
    let collection = db.collection::<ConstructionProject>(CONSTRUCTION_PROJECTS);
    let bson = mongodb::bson::to_bson(value)
        .map_err(|e| AppError::Database(format!("Failed to encode {}: {}", field, e)))?;

    collection
        .update_one(
            doc! { "_id": object_id },
            doc! {
                "$push": { field: bson },
                "$set": { "updated_at": Utc::now().timestamp() },
            },
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_doc_allow_list() {
        let request = UpdateProjectRequest {
            status: Some("in_progress".to_string()),
            progress: Some(40),
            budget: Some(650000.0),
            ..Default::default()
        };

        let update_doc = build_update_doc(&request, 5);
        assert_eq!(update_doc.get_str("status").unwrap(), "in_progress");
        assert_eq!(update_doc.get_i32("progress").unwrap(), 40);
        assert_eq!(update_doc.get_f64("budget").unwrap(), 650000.0);
        // Approval state never passes through the generic PATCH
        assert!(update_doc.get("approved").is_none());
        assert!(update_doc.get("approved_by").is_none());
        assert!(update_doc.get("user_id").is_none());
    }

    #[test]
    fn test_progress_clamped_to_display_bound() {
        let over = UpdateProjectRequest {
            progress: Some(250),
            ..Default::default()
        };
        assert_eq!(build_update_doc(&over, 0).get_i32("progress").unwrap(), 100);

        let under = UpdateProjectRequest {
            progress: Some(-10),
            ..Default::default()
        };
        assert_eq!(build_update_doc(&under, 0).get_i32("progress").unwrap(), 0);
    }

    #[test]
    fn test_project_type_allow_list() {
        assert!(PROJECT_TYPES.contains(&"residential"));
        assert!(PROJECT_TYPES.contains(&"commercial"));
        assert!(!PROJECT_TYPES.contains(&"industrial"));
    }
}
