//! Task and assignment endpoints.

use super::ChefApi;
use super::client::ApiClient;
use crate::error::ApiError;
use crate::model::{
    CreateTaskAssignmentRequest, CreateTaskRequest, DeleteAssignmentResponse, ProjectTask,
    Supervisor, TaskAssignment, TaskAssignmentBulkRequest, TaskAssignmentBulkResponse,
    TaskCreationResult,
};

impl ApiClient {
    pub async fn fetch_task(&self, task_id: i64) -> Result<ProjectTask, ApiError> {
        self.get(&format!("/api/app/chef/tasks/{task_id}"), &[]).await
    }

    pub async fn fetch_task_assignments(&self, task_id: i64) -> Result<Vec<TaskAssignment>, ApiError> {
        self.get(
            "/api/app/chef/task-assignments",
            &[("task_id", task_id.to_string())],
        )
        .await
    }

    pub async fn create_task(
        &self,
        project_id: i64,
        request: &CreateTaskRequest,
    ) -> Result<ProjectTask, ApiError> {
        let task: ProjectTask = self
            .post_long(&format!("/api/app/chef/projects/{project_id}/tasks"), request)
            .await?;
        tracing::info!(task_id = task.id, project_id, title = %task.title, "Task created");
        Ok(task)
    }

    pub async fn assign_workers(
        &self,
        task_id: i64,
        assignments: &[CreateTaskAssignmentRequest],
    ) -> Result<Vec<TaskAssignment>, ApiError> {
        let body = TaskAssignmentBulkRequest {
            task_id,
            assignments,
        };
        let response: TaskAssignmentBulkResponse =
            self.post_long("/api/app/chef/task-assignments", &body).await?;

        for error in &response.errors {
            tracing::warn!(task_id, %error, "Worker assignment rejected");
        }
        tracing::info!(
            task_id,
            requested = assignments.len(),
            created = response.created_assignments.len(),
            "Workers assigned"
        );
        Ok(response.created_assignments)
    }

    pub async fn remove_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<DeleteAssignmentResponse, ApiError> {
        let response: DeleteAssignmentResponse = self
            .delete(
                "/api/app/chef/task-assignments",
                &[("assignment_id", assignment_id.to_string())],
            )
            .await?;
        tracing::info!(assignment_id, message = %response.message, "Assignment removed");
        Ok(response)
    }

    /// The backend has no assignment update route; callers remove and re-assign.
    pub async fn update_assignment(&self, assignment_id: i64) -> Result<TaskAssignment, ApiError> {
        tracing::warn!(assignment_id, "Assignment update requested but not supported");
        Err(ApiError::Unsupported(
            "Assignment update not supported. Remove worker and assign again to change crane."
                .to_string(),
        ))
    }

    pub async fn fetch_supervisors(&self, include_external: bool) -> Result<Vec<Supervisor>, ApiError> {
        self.get(
            "/api/app/chef/employees/supervisors",
            &[("include_external", include_external.to_string())],
        )
        .await
    }
}

/// Create a task, then assign workers to it.
///
/// Once the task exists, an assignment failure no longer fails the whole
/// operation: the result carries the created task and the error message.
pub async fn create_task_with_workers(
    api: &dyn ChefApi,
    project_id: i64,
    task: &CreateTaskRequest,
    assignments: &[CreateTaskAssignmentRequest],
) -> Result<TaskCreationResult, ApiError> {
    let created = api.create_task(project_id, task).await?;

    if assignments.is_empty() {
        return Ok(TaskCreationResult {
            task: created,
            assignments: Vec::new(),
            assignment_errors: Vec::new(),
        });
    }

    match api.assign_workers(created.id, assignments).await {
        Ok(assigned) => Ok(TaskCreationResult {
            task: created,
            assignments: assigned,
            assignment_errors: Vec::new(),
        }),
        Err(e) => {
            tracing::warn!(task_id = created.id, error = %e, "Task created but assignment failed");
            Ok(TaskCreationResult {
                task: created,
                assignments: Vec::new(),
                assignment_errors: vec![e.to_string()],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubApi;
    use crate::config::ApiConfig;

    fn request(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn assign(employee_id: i64) -> CreateTaskAssignmentRequest {
        CreateTaskAssignmentRequest {
            employee_id,
            crane_model_id: None,
            skip_certificate_validation: false,
            skip_crane_type_validation: false,
            work_date: None,
            status: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn creates_task_and_assigns() {
        let api = StubApi::default();
        let result = create_task_with_workers(&api, 3, &request("Lift"), &[assign(1), assign(2)])
            .await
            .unwrap();
        assert!(result.is_fully_successful());
        assert_eq!(result.task.project_id, 3);
        assert_eq!(result.assignments.len(), 2);
        assert_eq!(api.assigned.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn no_workers_skips_assignment_call() {
        let api = StubApi {
            fail_assign: Some(500),
            ..Default::default()
        };
        let result = create_task_with_workers(&api, 3, &request("Lift"), &[]).await.unwrap();
        assert!(result.is_fully_successful());
        assert!(result.assignments.is_empty());
    }

    #[tokio::test]
    async fn assignment_failure_yields_partial_result() {
        let api = StubApi {
            fail_assign: Some(422),
            ..Default::default()
        };
        let result = create_task_with_workers(&api, 3, &request("Lift"), &[assign(1)])
            .await
            .unwrap();
        assert!(!result.is_fully_successful());
        assert_eq!(result.assignment_errors.len(), 1);
        assert!(result.assignment_errors[0].contains("assign failed"));
        assert_eq!(api.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_failure_is_an_error() {
        let api = StubApi {
            fail_create: Some(409),
            ..Default::default()
        };
        let err = create_task_with_workers(&api, 3, &request("Lift"), &[assign(1)])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(api.assigned.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_assignment_is_unsupported() {
        let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client.update_assignment(4).await.unwrap_err();
        assert!(matches!(err, ApiError::Unsupported(_)));
    }
}
