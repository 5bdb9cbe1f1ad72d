//! Tag and project catalog operations.

use mockable::Clock;

use super::{TaskWorkflowController, WorkflowResult};
use crate::board::{
    domain::{HexColor, Project, ProjectDraft, Tag, Task, ValidationError},
    ports::{Collection, ListQuery, Notification, Notifier, RecordStore},
    services::{
        OperationKey, OperationKind,
        normalizer::{self, PROJECT_FIELDS, TAG_FIELDS},
    },
};

const CREATE_TAG: &str = "create tag";
const CREATE_PROJECT: &str = "create project";
const LOAD_TAGS: &str = "load tags";
const LOAD_PROJECTS: &str = "load projects";

impl<S, N, C> TaskWorkflowController<S, N, C>
where
    S: RecordStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Replaces the tag registry with the tags held by the store.
    ///
    /// Returns the number of tags loaded.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Remote`](super::WorkflowError::Remote) when the store
    /// query fails; the registry is left unchanged.
    pub async fn load_tags(&self) -> WorkflowResult<usize> {
        let query = ListQuery::new()
            .with_fields(TAG_FIELDS)
            .ordered_by(self.ordering.tags.clone());
        let records = self
            .store
            .list(Collection::Tags, &query)
            .await
            .map_err(|source| self.report_remote(LOAD_TAGS, source))?;
        let tags = self.normalizer.tags(records);
        let mut registry = self.tags.write();
        registry.replace_all(tags);
        Ok(registry.len())
    }

    /// Replaces the project registry with the projects held by the store.
    ///
    /// Returns the number of projects loaded.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Remote`](super::WorkflowError::Remote) when the store
    /// query fails; the registry is left unchanged.
    pub async fn load_projects(&self) -> WorkflowResult<usize> {
        let query = ListQuery::new()
            .with_fields(PROJECT_FIELDS)
            .ordered_by(self.ordering.projects.clone());
        let records = self
            .store
            .list(Collection::Projects, &query)
            .await
            .map_err(|source| self.report_remote(LOAD_PROJECTS, source))?;
        let projects = self.normalizer.projects(records);
        let mut registry = self.projects.write();
        registry.replace_all(projects);
        Ok(registry.len())
    }

    /// Returns the selectable tags.
    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        self.tags.read().entries().to_vec()
    }

    /// Returns the selectable projects.
    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        self.projects.read().entries().to_vec()
    }

    /// Resolves the tags of `task`, omitting identifiers that are not in
    /// the registry.
    #[must_use]
    pub fn resolve_tags(&self, task: &Task) -> Vec<Tag> {
        self.tags.read().resolve(task)
    }

    /// Resolves the project of `task`.
    #[must_use]
    pub fn project_for(&self, task: &Task) -> Option<Project> {
        self.projects.read().resolve(task)
    }

    /// Creates a tag named `name`.
    ///
    /// Without an explicit colour the tag gets a uniformly random one. The
    /// new tag joins the registry and, when the composer is open, the
    /// draft.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`](super::WorkflowError::Validation) for a blank
    /// name (no store call is made) and
    /// [`WorkflowError::Remote`](super::WorkflowError::Remote) when the store fails.
    pub async fn create_tag(&self, name: &str, color: Option<HexColor>) -> WorkflowResult<Tag> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(self.reject(ValidationError::EmptyTagName));
        }
        let guard = self.begin(OperationKey::untargeted(OperationKind::CreateTag))?;
        let chosen = color.unwrap_or_else(|| HexColor::random(&mut rand::rng()));

        let record = normalizer::tag_record(trimmed, &chosen);
        let stored = match self.create_one(Collection::Tags, record).await {
            Ok(stored) => stored,
            Err(source) => return Err(self.fail(guard, CREATE_TAG, source)),
        };
        let Some(tag) = self.normalizer.tag(&stored) else {
            return Err(self.malformed(guard, CREATE_TAG, Collection::Tags));
        };

        self.tags.write().add(tag.clone());
        self.lock_ui().attach_to_open_draft(tag.id());
        guard.succeed();
        tracing::info!(tag_id = %tag.id(), color = %tag.color(), "tag created");
        Ok(tag)
    }

    /// Creates a project from `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`](super::WorkflowError::Validation)
    /// carrying field-level errors when the draft is invalid (no store call
    /// is made), and [`WorkflowError::Remote`](super::WorkflowError::Remote)
    /// when the store fails.
    pub async fn create_project(&self, draft: &ProjectDraft) -> WorkflowResult<Project> {
        draft.validate()?;
        let guard = self.begin(OperationKey::untargeted(OperationKind::CreateProject))?;

        let record = normalizer::project_record(draft);
        let stored = match self.create_one(Collection::Projects, record).await {
            Ok(stored) => stored,
            Err(source) => return Err(self.fail(guard, CREATE_PROJECT, source)),
        };
        let Some(project) = self.normalizer.project(&stored) else {
            return Err(self.malformed(guard, CREATE_PROJECT, Collection::Projects));
        };

        self.projects.write().add(project.clone());
        guard.succeed();
        tracing::info!(project_id = %project.id(), "project created");
        self.notifier.notify(Notification::success(format!(
            "Project \"{}\" created successfully",
            project.name()
        )));
        Ok(project)
    }
}
