use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Construction project stored in the `construction_projects` collection.
/// Milestones, materials and workers are embedded sub-document arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructionProject {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner (stamped from the creator's claims)
    pub user_id: String,

    pub title: String,
    pub description: String,

    /// "residential", "commercial", "renovation" or "interior"
    pub project_type: String,
    pub location: String,
    pub budget: f64,
    /// Free-form, e.g. "6 months"
    pub timeline: String,

    #[serde(default = "default_status")]
    pub status: String,

    /// Operator-set display value, 0..=100. Not derived from milestones;
    /// the completion ratio is computed separately into ProjectStats.
    #[serde(default)]
    pub progress: i32,

    /// Admin approval flags, only mutated by the approve endpoint
    #[serde(default)]
    pub approved: bool,
    pub approved_by: Option<String>,
    pub approved_at: Option<i64>,

    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub workers: Vec<Worker>,

    pub created_at: i64,
    pub updated_at: i64,
}

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Milestone {
    /// Generated uuid, addressable by the complete endpoint
    pub milestone_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Material {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Worker {
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

impl ConstructionProject {
    /// Milestone completion ratio for the stats block. Does not touch the
    /// stored progress field.
    pub fn milestone_stats(&self) -> ProjectStats {
        let total = self.milestones.len();
        let completed = self.milestones.iter().filter(|m| m.completed).count();
        let completion_ratio = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };

        ProjectStats {
            total_milestones: total,
            completed_milestones: completed,
            completion_ratio,
            total_material_cost: self
                .materials
                .iter()
                .filter_map(|m| m.cost)
                .sum(),
            worker_count: self.workers.len(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectStats {
    pub total_milestones: usize,
    pub completed_milestones: usize,
    pub completion_ratio: f64,
    pub total_material_cost: f64,
    pub worker_count: usize,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "type", alias = "project_type")]
    pub project_type: String,
    pub location: String,
    pub budget: f64,
    pub timeline: String,
}

/// Client-mutable project fields. The approved* fields are never settable
/// through this request; progress is clamped to 0..=100 by the service.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub budget: Option<f64>,
    pub timeline: Option<String>,
    pub status: Option<String>,
    pub progress: Option<i32>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddMilestoneRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddMaterialRequest {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub cost: Option<f64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddWorkerRequest {
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub project_type: String,
    pub location: String,
    pub budget: f64,
    pub timeline: String,
    pub status: String,
    pub progress: i32,
    pub approved: bool,
    pub approved_by: Option<String>,
    pub approved_at: Option<i64>,
    pub milestones: Vec<Milestone>,
    pub materials: Vec<Material>,
    pub workers: Vec<Worker>,
    pub stats: ProjectStats,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ConstructionProject> for ProjectResponse {
    fn from(project: ConstructionProject) -> Self {
        let stats = project.milestone_stats();
        ProjectResponse {
            id: project.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: project.user_id,
            title: project.title,
            description: project.description,
            project_type: project.project_type,
            location: project.location,
            budget: project.budget,
            timeline: project.timeline,
            status: project.status,
            progress: project.progress,
            approved: project.approved,
            approved_by: project.approved_by,
            approved_at: project.approved_at,
            milestones: project.milestones,
            materials: project.materials,
            workers: project.workers,
            stats,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with_milestones(milestones: Vec<Milestone>) -> ConstructionProject {
        ConstructionProject {
            id: None,
            user_id: "builder-1".to_string(),
            title: "Lakeside villa".to_string(),
            description: "Two-storey residential build".to_string(),
            project_type: "residential".to_string(),
            location: "Pune".to_string(),
            budget: 500000.0,
            timeline: "6 months".to_string(),
            status: "pending".to_string(),
            progress: 0,
            approved: false,
            approved_by: None,
            approved_at: None,
            milestones,
            materials: vec![],
            workers: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn milestone(title: &str, completed: bool) -> Milestone {
        Milestone {
            milestone_id: format!("m-{}", title),
            title: title.to_string(),
            description: None,
            completed,
            completed_at: completed.then_some(100),
        }
    }

    #[test]
    fn test_stats_empty_project() {
        let stats = project_with_milestones(vec![]).milestone_stats();
        assert_eq!(stats.total_milestones, 0);
        assert_eq!(stats.completed_milestones, 0);
        assert_eq!(stats.completion_ratio, 0.0);
    }

    #[test]
    fn test_stats_partial_completion() {
        let stats = project_with_milestones(vec![
            milestone("foundation", true),
            milestone("framing", true),
            milestone("roofing", false),
            milestone("finishing", false),
        ])
        .milestone_stats();

        assert_eq!(stats.total_milestones, 4);
        assert_eq!(stats.completed_milestones, 2);
        assert_eq!(stats.completion_ratio, 0.5);
    }

    #[test]
    fn test_stats_do_not_touch_progress() {
        let mut project = project_with_milestones(vec![milestone("foundation", true)]);
        project.progress = 10;

        let stats = project.milestone_stats();
        assert_eq!(stats.completion_ratio, 1.0);
        // progress stays the operator-set value
        assert_eq!(project.progress, 10);
    }

    #[test]
    fn test_material_cost_sum() {
        let mut project = project_with_milestones(vec![]);
        project.materials = vec![
            Material {
                name: "cement".to_string(),
                quantity: 200.0,
                unit: Some("bags".to_string()),
                cost: Some(90000.0),
            },
            Material {
                name: "sand".to_string(),
                quantity: 3.0,
                unit: Some("trucks".to_string()),
                cost: None,
            },
        ];

        assert_eq!(project.milestone_stats().total_material_cost, 90000.0);
    }
}
